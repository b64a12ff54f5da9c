use super::Expression;
use crate::ast::Span;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapLiteral {
    pub entries: Vec<(Expression, Expression)>,
    pub position: Span,
}
