use std::fmt::Display;

use super::Span;

/// Parsed type annotation as produced by the parser. Converting one of
/// these into a semantic [`Type`](crate::typechecker::Type) is the type
/// encoder's job; this enum only mirrors source syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeName {
    /// A bare name: `int`, `string`, `User`
    Simple(String, Span),
    /// `T?`
    Nullable(Box<TypeName>, Span),
    /// `T[]`
    Array(Box<TypeName>, Span),
    /// `map[K]V`
    Map(Box<TypeName>, Box<TypeName>, Span),
    /// `(T1, T2, ...)`
    Tuple(Vec<TypeName>, Span),
    /// `A|B|...`
    Union(Vec<TypeName>, Span),
    /// A class reference, possibly with (erased) type arguments: `List<T>`
    Class(String, Vec<TypeName>, Span),
}

impl TypeName {
    pub fn position(&self) -> Span {
        match self {
            TypeName::Simple(_, position) => position.clone(),
            TypeName::Nullable(_, position) => position.clone(),
            TypeName::Array(_, position) => position.clone(),
            TypeName::Map(_, _, position) => position.clone(),
            TypeName::Tuple(_, position) => position.clone(),
            TypeName::Union(_, position) => position.clone(),
            TypeName::Class(_, _, position) => position.clone(),
        }
    }

    /// Base name of the annotation with generic arguments and nullability
    /// stripped, as used by generics erasure.
    pub fn base_name(&self) -> String {
        match self {
            TypeName::Simple(name, _) => name.clone(),
            TypeName::Class(name, _, _) => name.clone(),
            TypeName::Nullable(inner, _) => inner.base_name(),
            TypeName::Array(inner, _) => inner.base_name(),
            TypeName::Map(_, value, _) => value.base_name(),
            TypeName::Tuple(_, _) => String::new(),
            TypeName::Union(variants, _) => variants
                .first()
                .map(|v| v.base_name())
                .unwrap_or_default(),
        }
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeName::Simple(name, _) => f.write_str(name),
            TypeName::Nullable(inner, _) => write!(f, "{inner}?"),
            TypeName::Array(inner, _) => write!(f, "{inner}[]"),
            TypeName::Map(key, value, _) => write!(f, "map[{key}]{value}"),
            TypeName::Tuple(elements, _) => {
                let inner = elements
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({inner})")
            }
            TypeName::Union(variants, _) => {
                let inner = variants
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("|");
                f.write_str(&inner)
            }
            TypeName::Class(name, args, _) => {
                if args.is_empty() {
                    f.write_str(name)
                } else {
                    let inner = args
                        .iter()
                        .map(|a| a.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "{name}<{inner}>")
                }
            }
        }
    }
}
