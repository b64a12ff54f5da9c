//! AST consumed by the semantic-analysis core. The parser producing these
//! nodes lives outside this crate; everything here is plain data with a
//! source [`Span`] per node, serializable so a parser dump can be loaded
//! by the `velac` driver.

mod declaration;
mod expression;
mod span;
mod statement;
mod type_name;

pub use self::declaration::*;
pub use self::expression::*;
pub use self::span::Span;
pub use self::statement::*;
pub use self::type_name::TypeName;
