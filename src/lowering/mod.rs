//! Class lowering: walks declarations into the bytecode object model.
//! Modifier validation, constant folding, accessor-property synthesis,
//! generics erasure and interface conformance all happen here.

mod fold;
mod interfaces;

pub use self::fold::fold_constant;

use log::debug;

use crate::ast::{
    AccessorBody, Annotation, ClassDecl, Declaration, EnumDecl, File, FunctionDecl, MethodDecl,
    Param, PropertyDecl, Statement, TypeName, TypeParamDecl,
};
use crate::bytecode::{
    AnnotationValue, Chunk, CompiledClass, CompiledEnum, CompiledMethod, CompiledProperty, OpCode,
    Program, TypeParam, Value, Visibility,
};
use crate::codegen;
use crate::symbols::SymbolTable;
use crate::typechecker::{declared_or_any, Diagnostic, DiagnosticCode, Type};

/// Compilation state scoped to one method body. Swapped out and restored
/// around every body so nested compilation never leaks state.
#[derive(Debug, Clone, Default)]
struct CompileState {
    locals: Vec<String>,
    expected_return: Type,
    return_arity: usize,
    class_name: Option<String>,
}

pub struct ClassLowerer<'a> {
    symbols: &'a SymbolTable,
    errors: Vec<Diagnostic>,
    current_namespace: Option<String>,
    current_class: Option<String>,
    compile: CompileState,
}

impl<'a> ClassLowerer<'a> {
    pub fn new(symbols: &'a SymbolTable) -> ClassLowerer<'a> {
        ClassLowerer {
            symbols,
            errors: vec![],
            current_namespace: None,
            current_class: None,
            compile: CompileState::default(),
        }
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.errors
    }

    pub(crate) fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    pub fn lower_file(&mut self, file: &File) -> Program {
        self.current_namespace = file.namespace.clone();

        let mut program = Program::default();
        for declaration in &file.declarations {
            match declaration {
                Declaration::Class(class) => {
                    let lowered = self.lower_class(class);
                    program.classes.insert(lowered.name.clone(), lowered);
                }
                Declaration::Enum(decl) => {
                    let lowered = self.lower_enum(decl);
                    program.enums.insert(lowered.name.clone(), lowered);
                }
                Declaration::Function(function) => {
                    let lowered = self.lower_function(function);
                    program.functions.insert(lowered.name.clone(), lowered);
                }
                // interfaces, aliases and newtypes produce no bytecode
                Declaration::Interface(_)
                | Declaration::TypeAlias(_)
                | Declaration::NewType(_) => {}
            }
        }

        self.current_namespace = None;
        program
    }

    /// Run `f` with a fresh compile state, restoring the surrounding state
    /// on the way out regardless of how `f` exits.
    fn with_compile_state<R>(
        &mut self,
        state: CompileState,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = std::mem::replace(&mut self.compile, state);
        let result = f(self);
        self.compile = saved;
        result
    }

    fn qualified_class_name(&self, name: &str) -> String {
        match &self.current_namespace {
            Some(ns) => format!("{ns}\\{name}"),
            None => name.to_string(),
        }
    }

    pub fn lower_class(&mut self, class: &ClassDecl) -> CompiledClass {
        let qualified = self.qualified_class_name(&class.name);
        let enclosing = self.current_class.replace(qualified);
        debug!("lowering class {}", class.name);

        let mut lowered = CompiledClass::new(&class.name);
        lowered.namespace = self.current_namespace.clone();
        lowered.parent = class.parent.clone();
        lowered.interfaces = class.implements.clone();
        lowered.annotations = self.lower_annotations(&class.annotations);

        if class.is_abstract && class.is_final {
            self.errors.push(Diagnostic::new(
                class.position.clone(),
                DiagnosticCode::FinalAndAbstractConflict,
                format!("class '{}' cannot be both abstract and final", class.name),
            ));
        }
        lowered.is_abstract = class.is_abstract;
        lowered.is_final = class.is_final;

        lowered.type_params = class
            .type_params
            .iter()
            .chain(class.where_clause.iter())
            .map(|decl| self.lower_type_param(decl))
            .collect();

        for constant in &class.constants {
            let value = fold_constant(&constant.value).unwrap_or(Value::Null);
            lowered.constants.insert(constant.name.clone(), value);
        }

        for property in &class.properties {
            if property.has_accessors() {
                self.lower_accessor_property(&mut lowered, property);
            } else {
                let compiled = CompiledProperty {
                    default: property
                        .default
                        .as_ref()
                        .and_then(fold_constant)
                        .unwrap_or(Value::Null),
                    visibility: property.visibility,
                    is_final: property.is_final,
                    annotations: self.lower_annotations(&property.annotations),
                };
                if property.is_static {
                    lowered
                        .static_properties
                        .insert(property.name.clone(), compiled);
                } else {
                    lowered.properties.insert(property.name.clone(), compiled);
                }
            }
        }

        for method in &class.methods {
            let compiled = self.lower_method(method);
            lowered.add_method(compiled);
        }

        self.validate_interfaces(class);

        self.current_class = enclosing;
        lowered
    }

    fn lower_type_param(&self, decl: &TypeParamDecl) -> TypeParam {
        TypeParam {
            name: decl.name.clone(),
            constraint: decl.constraint.as_ref().map(Type::from),
            // erasure: implemented interfaces survive as base names only
            implements: decl
                .implements
                .iter()
                .map(TypeName::base_name)
                .collect(),
        }
    }

    fn lower_annotations(&self, annotations: &[Annotation]) -> Vec<AnnotationValue> {
        annotations
            .iter()
            .map(|annotation| AnnotationValue {
                name: annotation.name.clone(),
                args: annotation
                    .args
                    .iter()
                    .map(|arg| fold_constant(arg).unwrap_or(Value::Null))
                    .collect(),
            })
            .collect()
    }

    /// Each accessor becomes a synthetic method: `get_<name>` with zero
    /// parameters, `set_<name>` with a single `value` parameter. Both
    /// inherit the property's visibility and staticness; the getter's
    /// return type is the property's declared type.
    fn lower_accessor_property(&mut self, lowered: &mut CompiledClass, property: &PropertyDecl) {
        let class_name = self.current_class.clone().unwrap_or_default();
        let property_ty = declared_or_any(property.ty.as_ref());

        if let Some(getter) = &property.getter {
            let locals = self.receiver_locals(property.is_static, &[]);
            let mut chunk = Chunk::new();
            match &getter.body {
                AccessorBody::Expression(expr) => {
                    // expression-bodied: the value is left on the stack and
                    // returned explicitly
                    codegen::emit_expression(&mut chunk, &locals, expr);
                    chunk.emit(OpCode::Return);
                }
                AccessorBody::Block(body) => {
                    codegen::emit_statements(&mut chunk, &locals, body);
                    chunk.emit(OpCode::ReturnNull);
                }
            }
            lowered.add_method(CompiledMethod {
                class_name: class_name.clone(),
                name: format!("get_{}", property.name),
                arity: 0,
                min_arity: 0,
                variadic: false,
                is_static: property.is_static,
                visibility: property.visibility,
                defaults: vec![],
                annotations: vec![],
                locals: locals.len(),
                return_type: property_ty.clone(),
                return_arity: 1,
                chunk,
            });
        }

        if let Some(setter) = &property.setter {
            let locals = self.receiver_locals(property.is_static, &["value".to_string()]);
            let mut chunk = Chunk::new();
            match &setter.body {
                AccessorBody::Expression(expr) => {
                    codegen::emit_expression(&mut chunk, &locals, expr);
                    chunk.emit(OpCode::Pop);
                    chunk.emit(OpCode::ReturnNull);
                }
                AccessorBody::Block(body) => {
                    codegen::emit_statements(&mut chunk, &locals, body);
                    chunk.emit(OpCode::ReturnNull);
                }
            }
            lowered.add_method(CompiledMethod {
                class_name,
                name: format!("set_{}", property.name),
                arity: 1,
                min_arity: 1,
                variadic: false,
                is_static: property.is_static,
                visibility: property.visibility,
                defaults: vec![],
                annotations: vec![],
                locals: locals.len(),
                return_type: Type::Void,
                return_arity: 0,
                chunk,
            });
        }
    }

    /// Slot 0 belongs to the receiver; an anonymous placeholder keeps the
    /// numbering stable for static methods.
    fn receiver_locals(&self, is_static: bool, params: &[String]) -> Vec<String> {
        let receiver = if is_static { "" } else { "this" };
        let mut locals = vec![receiver.to_string()];
        locals.extend(params.iter().cloned());
        locals
    }

    fn lower_method(&mut self, method: &MethodDecl) -> CompiledMethod {
        let class_name = self.current_class.clone().unwrap_or_default();
        let body = method.body.as_deref().unwrap_or(&[]);
        self.compile_callable(
            &class_name,
            &method.name,
            &method.params,
            method.return_type.as_ref(),
            body,
            method.is_static,
            method.visibility,
            &method.annotations,
        )
    }

    fn lower_function(&mut self, function: &FunctionDecl) -> CompiledMethod {
        self.compile_callable(
            "",
            &function.name,
            &function.params,
            function.return_type.as_ref(),
            &function.body,
            true,
            Visibility::Public,
            &[],
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn compile_callable(
        &mut self,
        class_name: &str,
        name: &str,
        params: &[Param],
        return_annotation: Option<&TypeName>,
        body: &[Statement],
        is_static: bool,
        visibility: Visibility,
        annotations: &[Annotation],
    ) -> CompiledMethod {
        let arity = params.len();
        let min_arity = params
            .iter()
            .position(|p| p.default.is_some() || p.variadic)
            .unwrap_or(arity);
        let variadic = params.iter().any(|p| p.variadic);
        let defaults: Vec<Value> = params
            .iter()
            .filter_map(|p| p.default.as_ref())
            .map(|d| fold_constant(d).unwrap_or(Value::Null))
            .collect();

        let return_type = declared_or_any(return_annotation);
        let return_arity = expected_return_arity(return_annotation, &return_type);

        let param_names: Vec<String> = params.iter().map(|p| p.name.clone()).collect();
        let locals = self.receiver_locals(is_static, &param_names);

        let state = CompileState {
            locals: locals.clone(),
            expected_return: return_type.clone(),
            return_arity,
            class_name: Some(class_name.to_string()),
        };

        let chunk = self.with_compile_state(state, |lowerer| {
            debug!(
                "compiling {}::{name}: {} slot(s), returns '{}' ({} value(s))",
                lowerer.compile.class_name.as_deref().unwrap_or("<file>"),
                lowerer.compile.locals.len(),
                lowerer.compile.expected_return,
                lowerer.compile.return_arity,
            );
            let mut chunk = Chunk::new();
            codegen::emit_statements(&mut chunk, &lowerer.compile.locals, body);
            chunk.emit(OpCode::ReturnNull);
            chunk
        });

        CompiledMethod {
            class_name: class_name.to_string(),
            name: name.to_string(),
            arity,
            min_arity,
            variadic,
            is_static,
            visibility,
            defaults,
            annotations: self.lower_annotations(annotations),
            locals: locals.len() + count_local_decls(body),
            return_type,
            return_arity,
            chunk,
        }
    }

    fn lower_enum(&mut self, decl: &EnumDecl) -> CompiledEnum {
        let cases = decl
            .cases
            .iter()
            .enumerate()
            .map(|(index, case)| {
                let value = case
                    .value
                    .as_ref()
                    .and_then(fold_constant)
                    .unwrap_or(Value::Int(index as i64));
                (case.name.clone(), value)
            })
            .collect();

        CompiledEnum {
            name: decl.name.clone(),
            namespace: self.current_namespace.clone(),
            cases,
            annotations: self.lower_annotations(&decl.annotations),
        }
    }
}

/// How many values a `return` in this body is expected to push.
fn expected_return_arity(annotation: Option<&TypeName>, return_type: &Type) -> usize {
    if annotation.is_none() || *return_type == Type::Void {
        return 0;
    }
    match return_type {
        Type::Tuple(elements) => elements.len(),
        _ => 1,
    }
}

/// Slots the body's own declarations need beyond receiver and parameters.
fn count_local_decls(statements: &[Statement]) -> usize {
    statements.iter().map(count_in_statement).sum()
}

fn count_in_statement(statement: &Statement) -> usize {
    match statement {
        Statement::VarDecl(_) => 1,
        Statement::MultiVarDecl(multi) => multi.decls.len(),
        Statement::Block(block) => count_local_decls(&block.statements),
        Statement::If(if_stmt) => {
            count_local_decls(&if_stmt.then_body)
                + if_stmt
                    .else_ifs
                    .iter()
                    .map(|e| count_local_decls(&e.body))
                    .sum::<usize>()
                + if_stmt
                    .else_body
                    .as_deref()
                    .map(count_local_decls)
                    .unwrap_or(0)
        }
        Statement::While(while_stmt) => count_local_decls(&while_stmt.body),
        Statement::DoWhile(do_while) => count_local_decls(&do_while.body),
        Statement::For(for_stmt) => {
            for_stmt
                .init
                .as_deref()
                .map(count_in_statement)
                .unwrap_or(0)
                + count_local_decls(&for_stmt.body)
        }
        Statement::Foreach(foreach) => {
            // key and value variables occupy slots
            1 + foreach.key_var.is_some() as usize + count_local_decls(&foreach.body)
        }
        Statement::Switch(switch) => {
            switch
                .cases
                .iter()
                .map(|c| count_local_decls(&c.body))
                .sum::<usize>()
                + switch
                    .default
                    .as_ref()
                    .map(|d| count_local_decls(&d.body))
                    .unwrap_or(0)
        }
        Statement::Try(try_stmt) => {
            count_local_decls(&try_stmt.body)
                + try_stmt
                    .catches
                    .iter()
                    .map(|c| 1 + count_local_decls(&c.body))
                    .sum::<usize>()
                + try_stmt
                    .finally
                    .as_deref()
                    .map(count_local_decls)
                    .unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::ClassLowerer;
    use crate::ast::{
        AccessorBody, AccessorDecl, BinaryExpr, BinaryOperator, ClassDecl, Expression, IntLiteral,
        MethodDecl, Param, PropertyAccess, PropertyDecl, Span, ThisExpr, TypeName,
    };
    use crate::bytecode::{OpCode, Value, Visibility};
    use crate::symbols::SymbolTable;
    use crate::typechecker::{DiagnosticCode, Type};

    fn empty_class(name: &str) -> ClassDecl {
        ClassDecl {
            name: name.into(),
            parent: None,
            implements: vec![],
            is_abstract: false,
            is_final: false,
            type_params: vec![],
            where_clause: vec![],
            constants: vec![],
            properties: vec![],
            methods: vec![],
            annotations: vec![],
            position: Span::default(),
        }
    }

    #[test]
    fn test_abstract_final_conflict() {
        let symbols = SymbolTable::new();
        let mut lowerer = ClassLowerer::new(&symbols);
        let mut class = empty_class("C");
        class.is_abstract = true;
        class.is_final = true;

        lowerer.lower_class(&class);

        assert!(lowerer
            .errors()
            .iter()
            .any(|d| d.code == DiagnosticCode::FinalAndAbstractConflict));
    }

    #[test]
    fn test_expression_bodied_getter_synthesis() {
        // int X { get => this.n + 1; }
        let symbols = SymbolTable::new();
        let mut lowerer = ClassLowerer::new(&symbols);
        let mut class = empty_class("C");
        class.properties.push(PropertyDecl {
            name: "X".into(),
            ty: Some(TypeName::Simple("int".into(), Span::default())),
            default: None,
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            getter: Some(AccessorDecl {
                body: AccessorBody::Expression(Expression::Binary(Box::new(BinaryExpr {
                    left: Expression::PropertyAccess(Box::new(PropertyAccess {
                        object: Expression::This(ThisExpr {
                            position: Span::default(),
                        }),
                        property: "n".into(),
                        position: Span::default(),
                    })),
                    right: Expression::Int(IntLiteral {
                        value: 1,
                        position: Span::default(),
                    }),
                    operator: BinaryOperator::Add,
                    position: Span::default(),
                }))),
                position: Span::default(),
            }),
            setter: None,
            annotations: vec![],
            position: Span::default(),
        });

        let lowered = lowerer.lower_class(&class);
        let getter = lowered.find_method("get_X", 0).expect("getter missing");

        assert_eq!(getter.arity, 0);
        assert_eq!(getter.return_type, Type::Int);
        assert_eq!(getter.chunk.last_op(), Some(OpCode::Return));
        assert!(lowered.properties.is_empty());
    }

    #[test]
    fn test_min_arity_accounts_for_defaults() {
        let symbols = SymbolTable::new();
        let mut lowerer = ClassLowerer::new(&symbols);
        let mut class = empty_class("C");
        class.methods.push(MethodDecl {
            name: "m".into(),
            params: vec![
                Param {
                    name: "a".into(),
                    ty: None,
                    default: None,
                    variadic: false,
                    position: Span::default(),
                },
                Param {
                    name: "b".into(),
                    ty: None,
                    default: Some(Expression::Int(IntLiteral {
                        value: 5,
                        position: Span::default(),
                    })),
                    variadic: false,
                    position: Span::default(),
                },
            ],
            return_type: None,
            body: Some(vec![]),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            annotations: vec![],
            position: Span::default(),
        });

        let lowered = lowerer.lower_class(&class);
        let method = lowered.find_method("m", 1).expect("method missing");

        assert_eq!(method.arity, 2);
        assert_eq!(method.min_arity, 1);
        assert_eq!(method.defaults, vec![Value::Int(5)]);
        assert_eq!(method.return_arity, 0);
        // receiver plus two parameters
        assert_eq!(method.locals, 3);
        assert_eq!(method.chunk.last_op(), Some(OpCode::ReturnNull));
    }

    #[test]
    fn test_tuple_return_arity() {
        let symbols = SymbolTable::new();
        let mut lowerer = ClassLowerer::new(&symbols);
        let mut class = empty_class("C");
        class.methods.push(MethodDecl {
            name: "pair".into(),
            params: vec![],
            return_type: Some(TypeName::Tuple(
                vec![
                    TypeName::Simple("int".into(), Span::default()),
                    TypeName::Simple("string".into(), Span::default()),
                ],
                Span::default(),
            )),
            body: Some(vec![]),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            annotations: vec![],
            position: Span::default(),
        });

        let lowered = lowerer.lower_class(&class);
        let method = lowered.find_method("pair", 0).expect("method missing");
        assert_eq!(method.return_arity, 2);
    }

    #[test]
    fn test_namespace_prefixes_class_context() {
        let symbols = SymbolTable::new();
        let mut lowerer = ClassLowerer::new(&symbols);
        lowerer.current_namespace = Some("app".into());
        let mut class = empty_class("C");
        class.methods.push(MethodDecl {
            name: "m".into(),
            params: vec![],
            return_type: None,
            body: Some(vec![]),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_final: false,
            annotations: vec![],
            position: Span::default(),
        });

        let lowered = lowerer.lower_class(&class);
        let method = lowered.find_method("m", 0).expect("method missing");
        assert_eq!(method.class_name, "app\\C");
    }
}
