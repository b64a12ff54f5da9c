use super::Expression;
use crate::ast::Span;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CallExpr {
    pub callee: Expression,
    pub args: Vec<Expression>,
    pub position: Span,
}

/// `obj.m(args)`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MethodCall {
    pub object: Expression,
    pub method: String,
    pub args: Vec<Expression>,
    pub position: Span,
}

/// `obj?.m(args)`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SafeMethodCall {
    pub object: Expression,
    pub method: String,
    pub args: Vec<Expression>,
    pub position: Span,
}

/// `new C(args)`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewExpr {
    pub class: String,
    pub args: Vec<Expression>,
    pub position: Span,
}
