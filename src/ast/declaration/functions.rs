use super::Param;
use crate::ast::{Span, Statement, TypeName};

/// Free function at the top level of a file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeName>,
    pub body: Vec<Statement>,
    pub position: Span,
}

/// `type Name = T;`, a transparent alias.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeAliasDecl {
    pub name: String,
    pub target: TypeName,
    pub position: Span,
}

/// `newtype Name = T;`, registered like an alias; the distinction matters
/// to the runtime, not to static checking.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NewTypeDecl {
    pub name: String,
    pub target: TypeName,
    pub position: Span,
}
