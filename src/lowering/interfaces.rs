use super::ClassLowerer;
use crate::ast::ClassDecl;
use crate::symbols::MethodSig;
use crate::typechecker::{Diagnostic, DiagnosticCode};

impl ClassLowerer<'_> {
    /// Interface conformance: after the class's methods are known, every
    /// declared interface is checked method by method with differentiated
    /// diagnostics for the distinct failure modes.
    pub(crate) fn validate_interfaces(&mut self, class: &ClassDecl) {
        for iface in &class.implements {
            if let Err(message) = self.symbols().validate_implements(&class.name, iface) {
                self.errors.push(Diagnostic::new(
                    class.position.clone(),
                    DiagnosticCode::InterfaceNotImplemented,
                    message,
                ));
                continue;
            }

            let required: Vec<MethodSig> = self
                .symbols()
                .interface_methods(iface)
                .into_iter()
                .cloned()
                .collect();
            for req in required {
                self.validate_interface_method(class, iface, &req);
            }
        }
    }

    fn validate_interface_method(&mut self, class: &ClassDecl, iface: &str, req: &MethodSig) {
        let Some(actual) = self
            .symbols()
            .get_method(&class.name, &req.name, req.arity())
            .cloned()
        else {
            self.errors.push(Diagnostic::new(
                class.position.clone(),
                DiagnosticCode::InterfaceMethodMissing,
                format!(
                    "class '{}' does not implement method '{}' of interface '{iface}'",
                    class.name, req.name
                ),
            ));
            return;
        };

        if actual.is_static != req.is_static {
            let expectation = if req.is_static { "static" } else { "an instance method" };
            self.errors.push(Diagnostic::new(
                class.position.clone(),
                DiagnosticCode::InterfaceMethodStaticMismatch,
                format!(
                    "method '{}' of class '{}' must be {expectation} to implement interface '{iface}'",
                    req.name, class.name
                ),
            ));
            return;
        }

        if actual.arity() != req.arity() {
            self.errors.push(Diagnostic::new(
                class.position.clone(),
                DiagnosticCode::InterfaceMethodParamMismatch,
                format!(
                    "method '{}' of class '{}' takes {} parameter(s) but interface '{iface}' requires {}",
                    req.name,
                    class.name,
                    actual.arity(),
                    req.arity()
                ),
            ));
            return;
        }

        // contravariant where the subtyping oracle knows the types,
        // strict-equal otherwise (is_compatible covers both)
        for (impl_param, req_param) in actual.params.iter().zip(&req.params) {
            if !self.symbols().is_compatible(&req_param.ty, &impl_param.ty) {
                self.errors.push(Diagnostic::new(
                    class.position.clone(),
                    DiagnosticCode::InterfaceMethodParamMismatch,
                    format!(
                        "parameter '{}' of '{}::{}' has type '{}' but interface '{iface}' requires '{}'",
                        impl_param.name, class.name, req.name, impl_param.ty, req_param.ty
                    ),
                ));
                return;
            }
        }

        if !self
            .symbols()
            .is_compatible(&actual.return_type, &req.return_type)
        {
            self.errors.push(Diagnostic::new(
                class.position.clone(),
                DiagnosticCode::InterfaceMethodReturnMismatch,
                format!(
                    "method '{}' of class '{}' returns '{}' but interface '{iface}' requires '{}'",
                    req.name, class.name, actual.return_type, req.return_type
                ),
            ));
        }
    }
}
