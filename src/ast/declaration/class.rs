use crate::ast::{Expression, Span, Statement, TypeName};
use crate::bytecode::Visibility;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub parent: Option<String>,
    pub implements: Vec<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub type_params: Vec<TypeParamDecl>,
    /// Additional constraints spelled in a trailing `where` clause; merged
    /// with `type_params` during lowering.
    pub where_clause: Vec<TypeParamDecl>,
    pub constants: Vec<ConstDecl>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub annotations: Vec<Annotation>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeParamDecl {
    pub name: String,
    pub constraint: Option<TypeName>,
    pub implements: Vec<TypeName>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConstDecl {
    pub name: String,
    pub value: Expression,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: Option<TypeName>,
    pub default: Option<Expression>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub getter: Option<AccessorDecl>,
    pub setter: Option<AccessorDecl>,
    pub annotations: Vec<Annotation>,
    pub position: Span,
}

impl PropertyDecl {
    /// A property with at least one accessor lowers to synthetic methods
    /// instead of a stored field.
    pub fn has_accessors(&self) -> bool {
        self.getter.is_some() || self.setter.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccessorDecl {
    pub body: AccessorBody,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum AccessorBody {
    /// `get => expr;`
    Expression(Expression),
    /// `get { ... }`
    Block(Vec<Statement>),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeName>,
    /// Abstract and interface methods carry no body
    pub body: Option<Vec<Statement>>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub annotations: Vec<Annotation>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<TypeName>,
    pub default: Option<Expression>,
    pub variadic: bool,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    pub name: String,
    pub args: Vec<Expression>,
    pub position: Span,
}
