use super::Annotation;
use crate::ast::{Expression, Span};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub cases: Vec<EnumCase>,
    pub annotations: Vec<Annotation>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnumCase {
    pub name: String,
    pub value: Option<Expression>,
    pub position: Span,
}
