use std::collections::HashSet;
use std::fmt::Display;

use once_cell::sync::Lazy;

use crate::ast::TypeName;

/// Names of the scalar numeric types beyond the core `int`/`float` pair.
static NUMERIC_TYPE_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "int", "i8", "i16", "i32", "i64", "uint", "u8", "u16", "u32", "u64", "float", "f32",
        "f64", "byte",
    ])
});

/// Semantic type representation used throughout checking and lowering.
/// Nullability is structural: a nullable `T` is a union containing `Null`,
/// so a class name can never collide with the rendered `|null` marker.
/// The canonical textual grammar (`T|null`, `T[]`, `map[K]V`, `(T, U)`,
/// `A|B`) is produced by `Display` and appears only in diagnostics and
/// signature comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Null,
    Void,
    /// Unknown or intentionally dynamic
    Any,
    Mixed,
    /// Sentinel produced after reporting an error; compatible with
    /// everything to suppress cascading diagnostics
    Error,
    /// Named scalar type outside the core set (`i8`, `u64`, `byte`, ...)
    Simple(String),
    /// Class, interface or enum reference by raw (possibly dotted) name
    Object(String),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Tuple(Vec<Type>),
    Union(Vec<Type>),
}

impl Default for Type {
    fn default() -> Self {
        Type::Void
    }
}

impl Type {
    /// Normalising union constructor: flattens nested unions, removes
    /// duplicates and unwraps single-element results.
    pub fn union(types: Vec<Type>) -> Type {
        let mut flat: Vec<Type> = vec![];
        for t in types {
            match t {
                Type::Union(inner) => {
                    for i in inner {
                        if !flat.contains(&i) {
                            flat.push(i);
                        }
                    }
                }
                other => {
                    if !flat.contains(&other) {
                        flat.push(other);
                    }
                }
            }
        }
        match flat.len() {
            1 => flat.remove(0),
            _ => Type::Union(flat),
        }
    }

    /// `T` -> `T|null`; already-nullable types are returned unchanged.
    pub fn nullable(self) -> Type {
        if self.is_nullable() {
            return self;
        }
        Type::union(vec![self, Type::Null])
    }

    /// A type admits `null` iff it is a union with a `null` arm.
    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Union(arms) => arms.contains(&Type::Null),
            _ => false,
        }
    }

    /// Remove the `null` arm from a union; other types pass through.
    pub fn strip_null(&self) -> Type {
        match self {
            Type::Union(arms) => {
                let rest: Vec<Type> = arms.iter().filter(|a| **a != Type::Null).cloned().collect();
                match rest.len() {
                    0 => Type::Null,
                    1 => rest.into_iter().next().unwrap(),
                    _ => Type::Union(rest),
                }
            }
            other => other.clone(),
        }
    }

    /// Class name behind this type once nullability is stripped.
    pub fn base_object(&self) -> Option<&str> {
        match self {
            Type::Object(name) => Some(name),
            Type::Union(arms) => arms.iter().find_map(|a| match a {
                Type::Object(name) => Some(name.as_str()),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Type::Int | Type::Float => true,
            Type::Simple(name) => NUMERIC_TYPE_NAMES.contains(name.as_str()),
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::String => f.write_str("string"),
            Type::Null => f.write_str("null"),
            Type::Void => f.write_str("void"),
            Type::Any => f.write_str("any"),
            Type::Mixed => f.write_str("mixed"),
            Type::Error => f.write_str("error"),
            Type::Simple(name) | Type::Object(name) => f.write_str(name),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Map(key, value) => write!(f, "map[{key}]{value}"),
            Type::Tuple(elements) => {
                let inner = elements
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({inner})")
            }
            Type::Union(arms) => {
                // render the null arm last so nullable types read `T|null`
                let mut rendered: Vec<String> = arms
                    .iter()
                    .filter(|a| **a != Type::Null)
                    .map(|a| a.to_string())
                    .collect();
                if arms.contains(&Type::Null) {
                    rendered.push("null".into());
                }
                f.write_str(&rendered.join("|"))
            }
        }
    }
}

impl From<&TypeName> for Type {
    fn from(value: &TypeName) -> Self {
        match value {
            TypeName::Simple(name, _) => match name.as_str() {
                "int" => Type::Int,
                "float" => Type::Float,
                "bool" => Type::Bool,
                "string" => Type::String,
                "null" => Type::Null,
                "void" => Type::Void,
                "any" => Type::Any,
                "mixed" => Type::Mixed,
                other if NUMERIC_TYPE_NAMES.contains(other) => Type::Simple(other.to_string()),
                other => Type::Object(other.to_string()),
            },
            TypeName::Nullable(inner, _) => Type::from(inner.as_ref()).nullable(),
            TypeName::Array(inner, _) => Type::Array(Box::new(Type::from(inner.as_ref()))),
            TypeName::Map(key, value, _) => Type::Map(
                Box::new(Type::from(key.as_ref())),
                Box::new(Type::from(value.as_ref())),
            ),
            TypeName::Tuple(elements, _) => {
                Type::Tuple(elements.iter().map(Type::from).collect())
            }
            TypeName::Union(variants, _) => {
                Type::union(variants.iter().map(Type::from).collect())
            }
            // generics are erased: only the base name survives
            TypeName::Class(name, _, _) => Type::Object(name.clone()),
        }
    }
}

/// Declared type of an optional annotation, `any` when absent.
pub fn declared_or_any(annotation: Option<&TypeName>) -> Type {
    annotation.map(Type::from).unwrap_or(Type::Any)
}

#[cfg(test)]
mod tests {
    use super::Type;
    use crate::ast::{Span, TypeName};

    #[test]
    fn test_canonical_rendering() {
        assert_eq!(Type::Int.to_string(), "int");
        assert_eq!(
            Type::Array(Box::new(Type::String)).to_string(),
            "string[]"
        );
        assert_eq!(
            Type::Map(Box::new(Type::String), Box::new(Type::Int)).to_string(),
            "map[string]int"
        );
        assert_eq!(
            Type::Tuple(vec![Type::Int, Type::Float]).to_string(),
            "(int, float)"
        );
        assert_eq!(Type::String.clone().nullable().to_string(), "string|null");
    }

    #[test]
    fn test_null_arm_renders_last() {
        let t = Type::union(vec![Type::Null, Type::String]);
        assert_eq!(t.to_string(), "string|null");
    }

    #[test]
    fn test_nullable_is_idempotent() {
        let once = Type::String.nullable();
        let twice = once.clone().nullable();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_null() {
        let t = Type::Object("User".into()).nullable();
        assert!(t.is_nullable());
        assert_eq!(t.strip_null(), Type::Object("User".into()));
        assert!(!Type::Int.is_nullable());
        assert_eq!(Type::Int.strip_null(), Type::Int);
    }

    #[test]
    fn test_union_flattens_and_dedups() {
        let t = Type::union(vec![
            Type::Int,
            Type::Union(vec![Type::Int, Type::String]),
        ]);
        assert_eq!(t, Type::Union(vec![Type::Int, Type::String]));

        let single = Type::union(vec![Type::Int, Type::Int]);
        assert_eq!(single, Type::Int);
    }

    #[test]
    fn test_numeric_set() {
        assert!(Type::Int.is_numeric());
        assert!(Type::Float.is_numeric());
        assert!(Type::Simple("u16".into()).is_numeric());
        assert!(Type::Simple("byte".into()).is_numeric());
        assert!(!Type::String.is_numeric());
        assert!(!Type::Object("User".into()).is_numeric());
    }

    #[test]
    fn test_from_type_name() {
        let name = TypeName::Nullable(
            Box::new(TypeName::Simple("string".into(), Span::default())),
            Span::default(),
        );
        assert_eq!(Type::from(&name), Type::String.nullable());

        let class = TypeName::Class(
            "List".into(),
            vec![TypeName::Simple("int".into(), Span::default())],
            Span::default(),
        );
        assert_eq!(Type::from(&class), Type::Object("List".into()));
    }

    #[test]
    fn test_base_object() {
        let t = Type::Object("User".into()).nullable();
        assert_eq!(t.base_object(), Some("User"));
        assert_eq!(Type::Int.base_object(), None);
    }
}
