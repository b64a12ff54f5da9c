mod access;
mod call;
mod collections;
mod literals;
mod operators;
mod primary;

pub use self::access::*;
pub use self::call::*;
pub use self::collections::*;
pub use self::literals::*;
pub use self::operators::*;
pub use self::primary::*;

use super::Span;

/// Expression algebra as handed over by the parser. Every node carries its
/// source position; compound nodes box their children to keep the enum flat.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Expression {
    Int(IntLiteral),
    Float(FloatLiteral),
    String(StringLiteral),
    InterpString(InterpString),
    Bool(BoolLiteral),
    Null(NullLiteral),
    Variable(Variable),
    This(ThisExpr),
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Assign(Box<AssignExpr>),
    Call(Box<CallExpr>),
    PropertyAccess(Box<PropertyAccess>),
    MethodCall(Box<MethodCall>),
    SafePropertyAccess(Box<SafePropertyAccess>),
    SafeMethodCall(Box<SafeMethodCall>),
    Index(Box<IndexExpr>),
    Array(ArrayLiteral),
    Map(MapLiteral),
    New(Box<NewExpr>),
    Is(Box<IsExpr>),
    Cast(Box<TypeCastExpr>),
    Ternary(Box<TernaryExpr>),
    StaticAccess(Box<StaticAccess>),
    NullCoalesce(Box<NullCoalesceExpr>),
}

impl Expression {
    pub fn position(&self) -> Span {
        match self {
            Expression::Int(IntLiteral { position, .. }) => position.clone(),
            Expression::Float(FloatLiteral { position, .. }) => position.clone(),
            Expression::String(StringLiteral { position, .. }) => position.clone(),
            Expression::InterpString(InterpString { position, .. }) => position.clone(),
            Expression::Bool(BoolLiteral { position, .. }) => position.clone(),
            Expression::Null(NullLiteral { position }) => position.clone(),
            Expression::Variable(Variable { position, .. }) => position.clone(),
            Expression::This(ThisExpr { position }) => position.clone(),
            Expression::Binary(binary) => binary.position.clone(),
            Expression::Unary(unary) => unary.position.clone(),
            Expression::Assign(assign) => assign.position.clone(),
            Expression::Call(call) => call.position.clone(),
            Expression::PropertyAccess(access) => access.position.clone(),
            Expression::MethodCall(call) => call.position.clone(),
            Expression::SafePropertyAccess(access) => access.position.clone(),
            Expression::SafeMethodCall(call) => call.position.clone(),
            Expression::Index(index) => index.position.clone(),
            Expression::Array(ArrayLiteral { position, .. }) => position.clone(),
            Expression::Map(MapLiteral { position, .. }) => position.clone(),
            Expression::New(new) => new.position.clone(),
            Expression::Is(is) => is.position.clone(),
            Expression::Cast(cast) => cast.position.clone(),
            Expression::Ternary(ternary) => ternary.position.clone(),
            Expression::StaticAccess(access) => access.position.clone(),
            Expression::NullCoalesce(coalesce) => coalesce.position.clone(),
        }
    }

    /// True for `null` literals, used by narrowing extraction on
    /// `x != null` style guards.
    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expression::Null(_))
    }
}
