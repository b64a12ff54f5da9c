use super::{Annotation, MethodDecl};
use crate::ast::Span;

/// Interface declarations reuse [`MethodDecl`] with empty bodies.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InterfaceDecl {
    pub name: String,
    pub extends: Vec<String>,
    pub methods: Vec<MethodDecl>,
    pub annotations: Vec<Annotation>,
    pub position: Span,
}
