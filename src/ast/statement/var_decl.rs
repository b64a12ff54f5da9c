use crate::ast::{Expression, Span, TypeName};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub ty: Option<TypeName>,
    pub init: Option<Expression>,
    pub position: Span,
}

/// `var a, b: int;` style declarations: several declarators sharing one
/// statement.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MultiVarDecl {
    pub decls: Vec<VarDecl>,
    pub position: Span,
}
