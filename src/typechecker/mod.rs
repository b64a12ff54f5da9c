//! Static type checker. Walks the AST against the symbol table, synthesizes
//! a semantic [`Type`] for every expression, narrows variable types along
//! branch guards and drives the control-flow analyses over each function
//! body. Diagnostics are accumulated as values; checking always continues
//! past an error so one broken construct does not mask its siblings.

mod error;
mod expression;
mod narrowing;
mod scope;
mod statement;
mod types;

pub use self::error::{Diagnostic, DiagnosticCode};
pub use self::scope::{TypeScope, VarInfo};
pub use self::types::{declared_or_any, Type};

use std::collections::HashSet;

use log::debug;

use crate::ast::{
    AccessorBody, ClassDecl, Declaration, File, FunctionDecl, Param, Span, Statement, TypeName,
};
use crate::cfg::{all_paths_return, build_cfg, check_initialization, unreachable_blocks};
use crate::symbols::SymbolTable;

/// State of the function body currently being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
    pub is_void: bool,
}

pub struct TypeChecker<'a> {
    symbols: &'a SymbolTable,
    pub(crate) scope: TypeScope,
    pub(crate) errors: Vec<Diagnostic>,
    pub(crate) warnings: Vec<Diagnostic>,
    pub(crate) current_class: Option<String>,
    current_namespace: Option<String>,
    pub(crate) function: Option<FunctionContext>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(symbols: &'a SymbolTable) -> TypeChecker<'a> {
        TypeChecker {
            symbols,
            scope: TypeScope::new(),
            errors: vec![],
            warnings: vec![],
            current_class: None,
            current_namespace: None,
            function: None,
        }
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_diagnostics(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.errors, self.warnings)
    }

    /// Entry point: check every declaration and top-level statement of a
    /// file, in source order.
    pub fn check_file(&mut self, file: &File) {
        self.current_namespace = file.namespace.clone();

        for declaration in &file.declarations {
            match declaration {
                Declaration::Class(class) => self.check_class(class),
                Declaration::Function(function) => self.check_function(function),
                // interfaces carry no bodies; enums, aliases and newtypes
                // are handled entirely by registration and lowering
                Declaration::Interface(_)
                | Declaration::Enum(_)
                | Declaration::TypeAlias(_)
                | Declaration::NewType(_) => {}
            }
        }

        for statement in &file.statements {
            self.check_statement(statement);
        }

        self.current_namespace = None;
    }

    fn check_class(&mut self, class: &ClassDecl) {
        let enclosing = self.current_class.replace(class.name.clone());
        debug!("checking class {}", class.name);

        for property in &class.properties {
            if let Some(default) = &property.default {
                let default_ty = self.check_expression(default);
                if let Some(annotation) = &property.ty {
                    let declared = Type::from(annotation);
                    if !self.symbols.is_compatible(&default_ty, &declared) {
                        self.errors.push(Diagnostic::type_mismatch(
                            &declared,
                            &default_ty,
                            default.position(),
                        ));
                    }
                }
            }

            let property_ty = declared_or_any(property.ty.as_ref());
            if let Some(getter) = &property.getter {
                match &getter.body {
                    AccessorBody::Expression(expr) => {
                        self.check_accessor_expression(expr, &property_ty);
                    }
                    AccessorBody::Block(body) => self.check_body(
                        &format!("get_{}", property.name),
                        getter.position.clone(),
                        &[],
                        property.ty.as_ref(),
                        body,
                    ),
                }
            }
            if let Some(setter) = &property.setter {
                let value_param = Param {
                    name: "value".into(),
                    ty: property.ty.clone(),
                    default: None,
                    variadic: false,
                    position: setter.position.clone(),
                };
                match &setter.body {
                    AccessorBody::Expression(expr) => {
                        self.scope.enter();
                        self.scope.declare(
                            "value",
                            VarInfo {
                                declared: property_ty.clone(),
                                initialized: true,
                                position: setter.position.clone(),
                            },
                        );
                        self.check_expression(expr);
                        self.scope.exit();
                    }
                    AccessorBody::Block(body) => self.check_body(
                        &format!("set_{}", property.name),
                        setter.position.clone(),
                        std::slice::from_ref(&value_param),
                        None,
                        body,
                    ),
                }
            }
        }

        for method in &class.methods {
            if let Some(body) = &method.body {
                self.check_body(
                    &method.name,
                    method.position.clone(),
                    &method.params,
                    method.return_type.as_ref(),
                    body,
                );
            }
        }

        self.current_class = enclosing;
    }

    /// Expression-bodied getter: the expression must produce the declared
    /// property type.
    fn check_accessor_expression(&mut self, expr: &crate::ast::Expression, expected: &Type) {
        let actual = self.check_expression(expr);
        if !self.symbols.is_compatible(&actual, expected) {
            self.errors
                .push(Diagnostic::type_mismatch(expected, &actual, expr.position()));
        }
    }

    fn check_function(&mut self, function: &FunctionDecl) {
        self.check_body(
            &function.name,
            function.position.clone(),
            &function.params,
            function.return_type.as_ref(),
            &function.body,
        );
    }

    /// Per-body pipeline: scope setup, CFG construction, the flow analyses
    /// and finally recursive statement checking.
    pub(crate) fn check_body(
        &mut self,
        name: &str,
        name_position: Span,
        params: &[Param],
        return_annotation: Option<&TypeName>,
        body: &[Statement],
    ) {
        let return_type = declared_or_any(return_annotation);
        let is_void = return_annotation.is_none() || return_type == Type::Void;
        let enclosing = self.function.replace(FunctionContext {
            name: name.to_string(),
            return_type: return_type.clone(),
            is_void,
        });

        self.scope.enter();
        for param in params {
            self.scope.declare(
                &param.name,
                VarInfo {
                    declared: declared_or_any(param.ty.as_ref()),
                    initialized: true,
                    position: param.position.clone(),
                },
            );
        }

        let mut cfg = build_cfg(body);
        {
            let entry = cfg.entry;
            let entry_block = cfg.block_mut(entry);
            for param in params {
                entry_block.defs.insert(param.name.clone());
            }
        }

        if !is_void && !all_paths_return(&cfg) {
            self.errors.push(Diagnostic::new(
                name_position,
                DiagnosticCode::ReturnTypeMismatch,
                format!(
                    "not all paths of '{name}' return a value of type '{return_type}'"
                ),
            ));
        }

        for position in unreachable_blocks(&cfg) {
            self.warnings.push(Diagnostic::unreachable_code(position));
        }

        // variables the body never assigns at all are left to the precise
        // use-site check during statement checking; the flow analysis covers
        // the conditionally-assigned ones
        let assigned: HashSet<String> = cfg
            .blocks()
            .iter()
            .flat_map(|b| b.defs.iter().cloned())
            .collect();
        for (position, variable) in check_initialization(&mut cfg) {
            if assigned.contains(&variable) {
                self.errors
                    .push(Diagnostic::uninitialized_variable(&variable, position));
            }
        }

        for statement in body {
            self.check_statement(statement);
        }

        self.scope.exit();
        self.function = enclosing;
    }
}
