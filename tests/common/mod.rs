#![allow(dead_code)]

use vela_lang::ast::*;
use vela_lang::bytecode::Visibility;
use vela_lang::{analyze, Analysis};

pub fn span() -> Span {
    Span::default()
}

pub fn int(value: i64) -> Expression {
    Expression::Int(IntLiteral {
        value,
        position: span(),
    })
}

pub fn string(value: &str) -> Expression {
    Expression::String(StringLiteral {
        value: value.into(),
        position: span(),
    })
}

pub fn boolean(value: bool) -> Expression {
    Expression::Bool(BoolLiteral {
        value,
        position: span(),
    })
}

pub fn null() -> Expression {
    Expression::Null(NullLiteral { position: span() })
}

pub fn var(name: &str) -> Expression {
    Expression::Variable(Variable {
        name: name.into(),
        position: span(),
    })
}

pub fn this() -> Expression {
    Expression::This(ThisExpr { position: span() })
}

pub fn simple_ty(name: &str) -> TypeName {
    TypeName::Simple(name.into(), span())
}

pub fn nullable_ty(name: &str) -> TypeName {
    TypeName::Nullable(Box::new(simple_ty(name)), span())
}

pub fn array_ty(name: &str) -> TypeName {
    TypeName::Array(Box::new(simple_ty(name)), span())
}

pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
    Expression::Binary(Box::new(BinaryExpr {
        left,
        right,
        operator,
        position: span(),
    }))
}

pub fn assign(target: Expression, value: Expression) -> Expression {
    Expression::Assign(Box::new(AssignExpr {
        target,
        value,
        position: span(),
    }))
}

pub fn method_call(object: Expression, method: &str, args: Vec<Expression>) -> Expression {
    Expression::MethodCall(Box::new(MethodCall {
        object,
        method: method.into(),
        args,
        position: span(),
    }))
}

pub fn prop_access(object: Expression, property: &str) -> Expression {
    Expression::PropertyAccess(Box::new(PropertyAccess {
        object,
        property: property.into(),
        position: span(),
    }))
}

pub fn expr_stmt(expression: Expression) -> Statement {
    Statement::Expression(ExprStmt {
        expression,
        position: span(),
    })
}

pub fn ret(values: Vec<Expression>) -> Statement {
    Statement::Return(Return {
        values,
        position: span(),
    })
}

pub fn echo(values: Vec<Expression>) -> Statement {
    Statement::Echo(Echo {
        values,
        position: span(),
    })
}

pub fn var_decl(name: &str, ty: Option<TypeName>, init: Option<Expression>) -> Statement {
    Statement::VarDecl(VarDecl {
        name: name.into(),
        ty,
        init,
        position: span(),
    })
}

pub fn if_stmt(
    condition: Expression,
    then_body: Vec<Statement>,
    else_body: Option<Vec<Statement>>,
) -> Statement {
    Statement::If(If {
        condition,
        then_body,
        else_ifs: vec![],
        else_body,
        position: span(),
    })
}

pub fn while_stmt(condition: Expression, body: Vec<Statement>) -> Statement {
    Statement::While(While {
        condition,
        body,
        position: span(),
    })
}

pub fn param(name: &str, ty: TypeName) -> Param {
    Param {
        name: name.into(),
        ty: Some(ty),
        default: None,
        variadic: false,
        position: span(),
    }
}

pub fn function(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeName>,
    body: Vec<Statement>,
) -> Declaration {
    Declaration::Function(FunctionDecl {
        name: name.into(),
        params,
        return_type,
        body,
        position: span(),
    })
}

pub fn method(
    name: &str,
    params: Vec<Param>,
    return_type: Option<TypeName>,
    body: Option<Vec<Statement>>,
) -> MethodDecl {
    MethodDecl {
        name: name.into(),
        params,
        return_type,
        body,
        visibility: Visibility::Public,
        is_static: false,
        is_abstract: false,
        is_final: false,
        annotations: vec![],
        position: span(),
    }
}

pub fn class_decl(name: &str) -> ClassDecl {
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
        position: span(),
    }
}

pub fn file(declarations: Vec<Declaration>, statements: Vec<Statement>) -> File {
    File {
        namespace: None,
        declarations,
        statements,
    }
}

pub fn run(file: &File) -> Analysis {
    analyze(file)
}

pub fn error_codes(analysis: &Analysis) -> Vec<&'static str> {
    analysis.errors.iter().map(|d| d.code.as_str()).collect()
}

pub fn warning_codes(analysis: &Analysis) -> Vec<&'static str> {
    analysis.warnings.iter().map(|d| d.code.as_str()).collect()
}
