mod control_flow;
mod exception;
mod jumps;
mod var_decl;

pub use self::control_flow::*;
pub use self::exception::*;
pub use self::jumps::*;
pub use self::var_decl::*;

use super::{Expression, Span};

/// Statement algebra as handed over by the parser.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Statement {
    Block(Block),
    VarDecl(VarDecl),
    MultiVarDecl(MultiVarDecl),
    Expression(ExprStmt),
    If(If),
    While(While),
    DoWhile(DoWhile),
    For(For),
    Foreach(Foreach),
    Switch(Switch),
    Return(Return),
    Break(Break),
    Continue(Continue),
    Try(Try),
    Throw(Throw),
    Echo(Echo),
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: Span,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExprStmt {
    pub expression: Expression,
    pub position: Span,
}

impl Statement {
    pub fn position(&self) -> Span {
        match self {
            Statement::Block(Block { position, .. }) => position.clone(),
            Statement::VarDecl(VarDecl { position, .. }) => position.clone(),
            Statement::MultiVarDecl(MultiVarDecl { position, .. }) => position.clone(),
            Statement::Expression(ExprStmt { position, .. }) => position.clone(),
            Statement::If(If { position, .. }) => position.clone(),
            Statement::While(While { position, .. }) => position.clone(),
            Statement::DoWhile(DoWhile { position, .. }) => position.clone(),
            Statement::For(For { position, .. }) => position.clone(),
            Statement::Foreach(Foreach { position, .. }) => position.clone(),
            Statement::Switch(Switch { position, .. }) => position.clone(),
            Statement::Return(Return { position, .. }) => position.clone(),
            Statement::Break(Break { position }) => position.clone(),
            Statement::Continue(Continue { position }) => position.clone(),
            Statement::Try(Try { position, .. }) => position.clone(),
            Statement::Throw(Throw { position, .. }) => position.clone(),
            Statement::Echo(Echo { position, .. }) => position.clone(),
        }
    }
}
