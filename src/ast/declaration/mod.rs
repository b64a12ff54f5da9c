mod class;
mod enums;
mod functions;
mod interface;

pub use self::class::*;
pub use self::enums::*;
pub use self::functions::*;
pub use self::interface::*;

use super::{Span, Statement};

/// One parsed compilation unit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct File {
    pub namespace: Option<String>,
    pub declarations: Vec<Declaration>,
    /// Top-level script statements outside any declaration
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Declaration {
    Class(ClassDecl),
    Interface(InterfaceDecl),
    Enum(EnumDecl),
    TypeAlias(TypeAliasDecl),
    NewType(NewTypeDecl),
    Function(FunctionDecl),
}

impl Declaration {
    pub fn position(&self) -> Span {
        match self {
            Declaration::Class(ClassDecl { position, .. }) => position.clone(),
            Declaration::Interface(InterfaceDecl { position, .. }) => position.clone(),
            Declaration::Enum(EnumDecl { position, .. }) => position.clone(),
            Declaration::TypeAlias(TypeAliasDecl { position, .. }) => position.clone(),
            Declaration::NewType(NewTypeDecl { position, .. }) => position.clone(),
            Declaration::Function(FunctionDecl { position, .. }) => position.clone(),
        }
    }
}
