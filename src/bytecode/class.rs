use std::collections::BTreeMap;

use super::{Chunk, Value, Visibility};
use crate::typechecker::Type;

/// Annotation carried over onto lowered entities; arguments are folded to
/// constants during lowering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnnotationValue {
    pub name: String,
    pub args: Vec<Value>,
}

/// Erased generic parameter: only base names survive lowering.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeParam {
    pub name: String,
    pub constraint: Option<Type>,
    pub implements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompiledProperty {
    pub default: Value,
    pub visibility: Visibility,
    pub is_final: bool,
    pub annotations: Vec<AnnotationValue>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompiledMethod {
    pub class_name: String,
    pub name: String,
    pub arity: usize,
    /// Smallest argument count that can call this method, accounting for
    /// defaulted and variadic parameters.
    pub min_arity: usize,
    pub variadic: bool,
    pub is_static: bool,
    pub visibility: Visibility,
    /// Folded default values in declaration order
    pub defaults: Vec<Value>,
    pub annotations: Vec<AnnotationValue>,
    /// Number of local slots the body needs, receiver included
    pub locals: usize,
    pub return_type: Type,
    /// How many values a `return` is expected to push (0 for void,
    /// element count for tuple returns, 1 otherwise)
    pub return_arity: usize,
    pub chunk: Chunk,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompiledClass {
    pub name: String,
    pub namespace: Option<String>,
    pub parent: Option<String>,
    /// Base names of implemented interfaces (generics erased)
    pub interfaces: Vec<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub type_params: Vec<TypeParam>,
    pub constants: BTreeMap<String, Value>,
    pub properties: BTreeMap<String, CompiledProperty>,
    pub static_properties: BTreeMap<String, CompiledProperty>,
    /// Method name to overload list, ordered by declaration
    pub methods: BTreeMap<String, Vec<CompiledMethod>>,
    pub annotations: Vec<AnnotationValue>,
}

impl CompiledClass {
    pub fn new(name: impl ToString) -> CompiledClass {
        CompiledClass {
            name: name.to_string(),
            namespace: None,
            parent: None,
            interfaces: vec![],
            is_abstract: false,
            is_final: false,
            type_params: vec![],
            constants: BTreeMap::new(),
            properties: BTreeMap::new(),
            static_properties: BTreeMap::new(),
            methods: BTreeMap::new(),
            annotations: vec![],
        }
    }

    pub fn add_method(&mut self, method: CompiledMethod) {
        self.methods
            .entry(method.name.clone())
            .or_default()
            .push(method);
    }

    /// Find an overload able to accept `arg_count` arguments.
    pub fn find_method(&self, name: &str, arg_count: usize) -> Option<&CompiledMethod> {
        let overloads = self.methods.get(name)?;
        overloads
            .iter()
            .find(|m| {
                arg_count >= m.min_arity && (arg_count <= m.arity || m.variadic)
            })
            .or_else(|| overloads.first())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompiledEnum {
    pub name: String,
    pub namespace: Option<String>,
    /// Case name and folded constant value, in declaration order
    pub cases: Vec<(String, Value)>,
    pub annotations: Vec<AnnotationValue>,
}
