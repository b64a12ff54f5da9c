use super::Expression;
use crate::ast::Span;

/// `obj.prop`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyAccess {
    pub object: Expression,
    pub property: String,
    pub position: Span,
}

/// `obj?.prop`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SafePropertyAccess {
    pub object: Expression,
    pub property: String,
    pub position: Span,
}

/// `obj[index]`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexExpr {
    pub object: Expression,
    pub index: Expression,
    pub position: Span,
}

/// The member side of a `Target::member` access.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StaticMember {
    /// `C::m(args)`
    Method { name: String, args: Vec<Expression> },
    /// `C::NAME`
    Constant { name: String },
    /// `C::$prop`
    Property { name: String },
}

/// `C::...`, `self::...` or `parent::...`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaticAccess {
    pub target: String,
    pub member: StaticMember,
    pub position: Span,
}
