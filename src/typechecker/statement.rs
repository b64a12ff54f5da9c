use super::{Diagnostic, DiagnosticCode, Type, TypeChecker, VarInfo};
use crate::ast::{
    DoWhile, Echo, For, Foreach, If, MultiVarDecl, Return, Statement, Switch, Throw, Try, VarDecl,
    While,
};

impl TypeChecker<'_> {
    pub(crate) fn check_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Block(block) => {
                self.scope.enter();
                for inner in &block.statements {
                    self.check_statement(inner);
                }
                self.scope.exit();
            }
            Statement::VarDecl(decl) => self.check_var_decl(decl),
            Statement::MultiVarDecl(MultiVarDecl { decls, .. }) => {
                for decl in decls {
                    self.check_var_decl(decl);
                }
            }
            Statement::Expression(stmt) => {
                self.check_expression(&stmt.expression);
            }
            Statement::If(if_stmt) => self.check_if(if_stmt),
            Statement::While(while_stmt) => self.check_while(while_stmt),
            Statement::DoWhile(do_while) => self.check_do_while(do_while),
            Statement::For(for_stmt) => self.check_for(for_stmt),
            Statement::Foreach(foreach) => self.check_foreach(foreach),
            Statement::Switch(switch) => self.check_switch(switch),
            Statement::Return(ret) => self.check_return(ret),
            Statement::Break(_) | Statement::Continue(_) => {}
            Statement::Try(try_stmt) => self.check_try(try_stmt),
            Statement::Throw(throw) => self.check_throw(throw),
            Statement::Echo(Echo { values, .. }) => {
                for value in values {
                    self.check_expression(value);
                }
            }
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl) {
        let initializer_ty = decl.init.as_ref().map(|init| self.check_expression(init));

        let declared = match (&decl.ty, &initializer_ty) {
            (Some(annotation), _) => Type::from(annotation),
            // no annotation: infer from the initializer
            (None, Some(inferred)) => inferred.clone(),
            (None, None) => Type::Any,
        };

        if let (Some(init), Some(actual)) = (&decl.init, &initializer_ty) {
            if !self.symbols().is_compatible(actual, &declared) {
                self.errors
                    .push(Diagnostic::type_mismatch(&declared, actual, init.position()));
            }
        }

        self.scope.declare(
            &decl.name,
            VarInfo {
                declared,
                initialized: decl.init.is_some(),
                position: decl.position.clone(),
            },
        );
    }

    fn check_if(&mut self, if_stmt: &If) {
        self.check_expression(&if_stmt.condition);

        let narrowed = self.extract_narrowings(&if_stmt.condition, true);
        self.scope.enter();
        for (name, ty) in narrowed {
            self.scope.narrow(name, ty);
        }
        for statement in &if_stmt.then_body {
            self.check_statement(statement);
        }
        self.scope.exit();

        for else_if in &if_stmt.else_ifs {
            self.check_expression(&else_if.condition);
            let narrowed = self.extract_narrowings(&else_if.condition, true);
            self.scope.enter();
            for (name, ty) in narrowed {
                self.scope.narrow(name, ty);
            }
            for statement in &else_if.body {
                self.check_statement(statement);
            }
            self.scope.exit();
        }

        if let Some(else_body) = &if_stmt.else_body {
            let narrowed = self.extract_narrowings(&if_stmt.condition, false);
            self.scope.enter();
            for (name, ty) in narrowed {
                self.scope.narrow(name, ty);
            }
            for statement in else_body {
                self.check_statement(statement);
            }
            self.scope.exit();
        }
    }

    fn check_while(&mut self, while_stmt: &While) {
        self.check_expression(&while_stmt.condition);

        let narrowed = self.extract_narrowings(&while_stmt.condition, true);
        self.scope.enter();
        for (name, ty) in narrowed {
            self.scope.narrow(name, ty);
        }
        for statement in &while_stmt.body {
            self.check_statement(statement);
        }
        self.scope.exit();
    }

    fn check_do_while(&mut self, do_while: &DoWhile) {
        // the body runs before the guard is first evaluated, so no
        // narrowing applies inside it
        self.scope.enter();
        for statement in &do_while.body {
            self.check_statement(statement);
        }
        self.scope.exit();
        self.check_expression(&do_while.condition);
    }

    fn check_for(&mut self, for_stmt: &For) {
        self.scope.enter();
        if let Some(init) = &for_stmt.init {
            self.check_statement(init);
        }
        if let Some(condition) = &for_stmt.condition {
            self.check_expression(condition);
        }

        let narrowed = for_stmt
            .condition
            .as_ref()
            .map(|condition| self.extract_narrowings(condition, true))
            .unwrap_or_default();
        self.scope.enter();
        for (name, ty) in narrowed {
            self.scope.narrow(name, ty);
        }
        for statement in &for_stmt.body {
            self.check_statement(statement);
        }
        self.scope.exit();

        if let Some(post) = &for_stmt.post {
            self.check_expression(post);
        }
        self.scope.exit();
    }

    fn check_foreach(&mut self, foreach: &Foreach) {
        let iterable_ty = self.check_expression(&foreach.iterable);

        let (key_ty, value_ty) = match iterable_ty {
            Type::Array(element) => (Type::Int, *element),
            Type::Map(key, value) => (*key, *value),
            _ => (Type::Any, Type::Any),
        };

        self.scope.enter();
        if let Some(key_var) = &foreach.key_var {
            self.scope.declare(
                key_var,
                VarInfo {
                    declared: key_ty,
                    initialized: true,
                    position: foreach.position.clone(),
                },
            );
        }
        self.scope.declare(
            &foreach.value_var,
            VarInfo {
                declared: value_ty,
                initialized: true,
                position: foreach.position.clone(),
            },
        );
        for statement in &foreach.body {
            self.check_statement(statement);
        }
        self.scope.exit();
    }

    fn check_switch(&mut self, switch: &Switch) {
        let subject_ty = self.check_expression(&switch.subject);

        for case in &switch.cases {
            let case_ty = self.check_expression(&case.value);
            // either direction suffices: subjects are often wider than the
            // individual case labels
            if !self.symbols().is_compatible(&case_ty, &subject_ty)
                && !self.symbols().is_compatible(&subject_ty, &case_ty)
            {
                self.errors.push(Diagnostic::type_mismatch(
                    &subject_ty,
                    &case_ty,
                    case.value.position(),
                ));
            }

            self.scope.enter();
            for statement in &case.body {
                self.check_statement(statement);
            }
            self.scope.exit();
        }

        if let Some(default) = &switch.default {
            self.scope.enter();
            for statement in &default.body {
                self.check_statement(statement);
            }
            self.scope.exit();
        }
    }

    fn check_return(&mut self, ret: &Return) {
        let value_types: Vec<Type> = ret
            .values
            .iter()
            .map(|value| self.check_expression(value))
            .collect();

        let Some(function) = self.function.clone() else {
            return;
        };

        if function.is_void {
            if !ret.values.is_empty() {
                self.errors.push(Diagnostic::new(
                    ret.position.clone(),
                    DiagnosticCode::NoReturnExpected,
                    format!("'{}' does not return a value", function.name),
                ));
            }
            return;
        }

        if ret.values.is_empty() {
            self.errors.push(Diagnostic::new(
                ret.position.clone(),
                DiagnosticCode::ReturnTypeMismatch,
                format!(
                    "'{}' must return a value of type '{}'",
                    function.name, function.return_type
                ),
            ));
            return;
        }

        // tuple-typed functions return one value per element
        if let Type::Tuple(elements) = &function.return_type {
            if elements.len() == ret.values.len() {
                for ((value, actual), expected) in
                    ret.values.iter().zip(&value_types).zip(elements)
                {
                    if !self.symbols().is_compatible(actual, expected) {
                        self.errors.push(Diagnostic::new(
                            value.position(),
                            DiagnosticCode::ReturnTypeMismatch,
                            format!("expected return type '{expected}' but got '{actual}'"),
                        ));
                    }
                }
                return;
            }
        }

        for (value, actual) in ret.values.iter().zip(&value_types) {
            if !self
                .symbols()
                .is_compatible(actual, &function.return_type)
            {
                self.errors.push(Diagnostic::new(
                    value.position(),
                    DiagnosticCode::ReturnTypeMismatch,
                    format!(
                        "expected return type '{}' but got '{actual}'",
                        function.return_type
                    ),
                ));
            }
        }
    }

    fn check_try(&mut self, try_stmt: &Try) {
        self.scope.enter();
        for statement in &try_stmt.body {
            self.check_statement(statement);
        }
        self.scope.exit();

        for catch in &try_stmt.catches {
            self.scope.enter();
            self.scope.declare(
                &catch.variable,
                VarInfo {
                    declared: Type::Object(catch.class.clone()),
                    initialized: true,
                    position: catch.position.clone(),
                },
            );
            for statement in &catch.body {
                self.check_statement(statement);
            }
            self.scope.exit();
        }

        if let Some(finally) = &try_stmt.finally {
            self.scope.enter();
            for statement in finally {
                self.check_statement(statement);
            }
            self.scope.exit();
        }
    }

    fn check_throw(&mut self, throw: &Throw) {
        let ty = self.check_expression(&throw.value);
        let throwable = matches!(ty, Type::Object(_) | Type::Any | Type::Mixed | Type::Error)
            || ty.base_object().is_some();
        if !throwable {
            self.errors.push(Diagnostic::new(
                throw.value.position(),
                DiagnosticCode::TypeMismatch,
                format!("cannot throw a value of type '{ty}'"),
            ));
        }
    }
}
