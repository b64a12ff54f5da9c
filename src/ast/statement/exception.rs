use super::Statement;
use crate::ast::Span;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Try {
    pub body: Vec<Statement>,
    pub catches: Vec<Catch>,
    pub finally: Option<Vec<Statement>>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Catch {
    /// Name of the caught exception class
    pub class: String,
    /// Variable the exception is bound to inside the handler
    pub variable: String,
    pub body: Vec<Statement>,
    pub position: Span,
}
