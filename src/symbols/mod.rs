//! Symbol table: the name-resolution oracle consulted by the type checker
//! and the class lowerer. Populated by a registration pass over the file's
//! declarations before any checking starts, so forward references resolve.

use std::collections::{HashMap, HashSet};

use crate::ast::{
    ClassDecl, Declaration, EnumDecl, File, FunctionDecl, InterfaceDecl, MethodDecl, Param,
};
use crate::bytecode::Visibility;
use crate::typechecker::{declared_or_any, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSig {
    pub name: String,
    pub ty: Type,
    pub has_default: bool,
    pub variadic: bool,
}

/// Signature of a method or free function.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub name: String,
    pub params: Vec<ParamSig>,
    pub return_type: Type,
    pub is_static: bool,
    pub visibility: Visibility,
}

impl MethodSig {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Smallest argument count this signature accepts.
    pub fn min_arity(&self) -> usize {
        self.params
            .iter()
            .position(|p| p.has_default || p.variadic)
            .unwrap_or(self.params.len())
    }

    pub fn is_variadic(&self) -> bool {
        self.params.iter().any(|p| p.variadic)
    }

    pub fn accepts(&self, arg_count: usize) -> bool {
        arg_count >= self.min_arity() && (arg_count <= self.arity() || self.is_variadic())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySig {
    pub ty: Type,
    pub visibility: Visibility,
    pub is_static: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClassEntry {
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    pub is_interface: bool,
    pub is_abstract: bool,
    pub methods: HashMap<String, Vec<MethodSig>>,
    pub properties: HashMap<String, PropertySig>,
    pub constants: HashMap<String, Type>,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    functions: HashMap<String, MethodSig>,
    classes: HashMap<String, ClassEntry>,
    aliases: HashMap<String, Type>,
}

fn param_sig(param: &Param) -> ParamSig {
    ParamSig {
        name: param.name.clone(),
        ty: declared_or_any(param.ty.as_ref()),
        has_default: param.default.is_some(),
        variadic: param.variadic,
    }
}

fn method_sig(method: &MethodDecl) -> MethodSig {
    MethodSig {
        name: method.name.clone(),
        params: method.params.iter().map(param_sig).collect(),
        return_type: declared_or_any(method.return_type.as_ref()),
        is_static: method.is_static,
        visibility: method.visibility,
    }
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Register every declaration of `file` before checking begins.
    pub fn register_file(&mut self, file: &File) {
        for declaration in &file.declarations {
            match declaration {
                Declaration::Class(class) => self.register_class(class),
                Declaration::Interface(iface) => self.register_interface(iface),
                Declaration::Enum(decl) => self.register_enum(decl),
                Declaration::TypeAlias(alias) => {
                    self.aliases
                        .insert(alias.name.clone(), Type::from(&alias.target));
                }
                Declaration::NewType(newtype) => {
                    self.aliases
                        .insert(newtype.name.clone(), Type::from(&newtype.target));
                }
                Declaration::Function(function) => self.register_function(function),
            }
        }
    }

    fn register_class(&mut self, class: &ClassDecl) {
        let mut entry = ClassEntry {
            name: class.name.clone(),
            parent: class.parent.clone(),
            interfaces: class.implements.clone(),
            is_abstract: class.is_abstract,
            ..ClassEntry::default()
        };

        for property in &class.properties {
            entry.properties.insert(
                property.name.clone(),
                PropertySig {
                    ty: declared_or_any(property.ty.as_ref()),
                    visibility: property.visibility,
                    is_static: property.is_static,
                },
            );
        }

        for constant in &class.constants {
            // constant types are synthesized from the folded literal later;
            // any covers non-literal initialisers
            entry
                .constants
                .insert(constant.name.clone(), Type::Any);
        }

        for method in &class.methods {
            entry
                .methods
                .entry(method.name.clone())
                .or_default()
                .push(method_sig(method));
        }

        self.classes.insert(class.name.clone(), entry);
    }

    fn register_interface(&mut self, iface: &InterfaceDecl) {
        let mut entry = ClassEntry {
            name: iface.name.clone(),
            interfaces: iface.extends.clone(),
            is_interface: true,
            ..ClassEntry::default()
        };

        for method in &iface.methods {
            entry
                .methods
                .entry(method.name.clone())
                .or_default()
                .push(method_sig(method));
        }

        self.classes.insert(iface.name.clone(), entry);
    }

    fn register_enum(&mut self, decl: &EnumDecl) {
        let mut entry = ClassEntry {
            name: decl.name.clone(),
            ..ClassEntry::default()
        };
        for case in &decl.cases {
            entry.constants.insert(case.name.clone(), Type::Int);
        }
        self.classes.insert(decl.name.clone(), entry);
    }

    fn register_function(&mut self, function: &FunctionDecl) {
        self.functions.insert(
            function.name.clone(),
            MethodSig {
                name: function.name.clone(),
                params: function.params.iter().map(param_sig).collect(),
                return_type: declared_or_any(function.return_type.as_ref()),
                is_static: false,
                visibility: Visibility::Public,
            },
        );
    }

    pub fn get_function(&self, name: &str) -> Option<&MethodSig> {
        self.functions.get(name)
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn class_parent(&self, name: &str) -> Option<&str> {
        self.classes
            .get(name)?
            .parent
            .as_deref()
            .filter(|p| !p.is_empty())
    }

    /// Property lookup walking the parent chain, guarded against cycles.
    pub fn get_property(&self, class: &str, name: &str) -> Option<&PropertySig> {
        let mut current = Some(class);
        let mut visited = HashSet::new();
        while let Some(cls) = current {
            if !visited.insert(cls.to_string()) {
                return None;
            }
            if let Some(prop) = self.classes.get(cls).and_then(|e| e.properties.get(name)) {
                return Some(prop);
            }
            current = self.class_parent(cls);
        }
        None
    }

    /// Method lookup by `(class, name, arg_count)`: overloads are resolved
    /// by arity, walking the parent chain.
    pub fn get_method(&self, class: &str, name: &str, arg_count: usize) -> Option<&MethodSig> {
        let mut current = Some(class);
        let mut visited = HashSet::new();
        while let Some(cls) = current {
            if !visited.insert(cls.to_string()) {
                return None;
            }
            if let Some(overloads) = self.classes.get(cls).and_then(|e| e.methods.get(name)) {
                if let Some(sig) = overloads.iter().find(|m| m.accepts(arg_count)) {
                    return Some(sig);
                }
                return overloads.first();
            }
            current = self.class_parent(cls);
        }
        None
    }

    pub fn get_constant(&self, class: &str, name: &str) -> Option<&Type> {
        let mut current = Some(class);
        let mut visited = HashSet::new();
        while let Some(cls) = current {
            if !visited.insert(cls.to_string()) {
                return None;
            }
            if let Some(ty) = self.classes.get(cls).and_then(|e| e.constants.get(name)) {
                return Some(ty);
            }
            current = self.class_parent(cls);
        }
        None
    }

    /// Conformance oracle: fails when `iface` is unknown or not an
    /// interface. Per-method checks happen in the lowerer.
    pub fn validate_implements(&self, class: &str, iface: &str) -> Result<(), String> {
        match self.classes.get(iface) {
            Some(entry) if entry.is_interface => Ok(()),
            Some(_) => Err(format!("'{iface}' is not an interface")),
            None => Err(format!(
                "class '{class}' implements unknown interface '{iface}'"
            )),
        }
    }

    /// Methods a conforming implementor of `iface` must provide, including
    /// those of extended interfaces.
    pub fn interface_methods(&self, iface: &str) -> Vec<&MethodSig> {
        let mut out = vec![];
        let mut queue = vec![iface.to_string()];
        let mut visited = HashSet::new();
        while let Some(name) = queue.pop() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(entry) = self.classes.get(&name) {
                for overloads in entry.methods.values() {
                    out.extend(overloads.iter());
                }
                queue.extend(entry.interfaces.iter().cloned());
            }
        }
        out
    }

    /// Transitive subclass test over the parent chain; the visited set
    /// terminates cyclic hierarchies.
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        let mut current = self.class_parent(class);
        let mut visited = HashSet::new();
        while let Some(cls) = current {
            if cls == ancestor {
                return true;
            }
            if !visited.insert(cls.to_string()) {
                return false;
            }
            current = self.class_parent(cls);
        }
        false
    }

    fn resolve_alias<'a>(&'a self, ty: &'a Type) -> &'a Type {
        if let Type::Object(name) = ty {
            if let Some(target) = self.aliases.get(name) {
                return target;
            }
        }
        ty
    }

    /// `actual` is acceptable where `expected` is required.
    pub fn is_compatible(&self, actual: &Type, expected: &Type) -> bool {
        let actual = self.resolve_alias(actual);
        let expected = self.resolve_alias(expected);

        if actual == expected {
            return true;
        }
        if actual.is_error() || expected.is_error() {
            return true;
        }
        if matches!(expected, Type::Any | Type::Mixed) {
            return true;
        }
        if *actual == Type::Null && expected.is_nullable() {
            return true;
        }
        if *actual == Type::Int && *expected == Type::Float {
            return true;
        }
        if let (Type::Array(a), Type::Array(e)) = (actual, expected) {
            return self.is_compatible(a, e);
        }
        // a union target accepts anything one of its arms accepts; a union
        // source must be acceptable through every arm
        if let Type::Union(arms) = expected {
            if arms.iter().any(|arm| self.is_compatible(actual, arm)) {
                return true;
            }
        }
        if let Type::Union(arms) = actual {
            if arms.iter().all(|arm| self.is_compatible(arm, expected)) {
                return true;
            }
        }
        if let (Type::Object(a), Type::Object(e)) = (actual, expected) {
            return self.is_subclass_of(a, e) || self.implements_interface(a, e);
        }
        false
    }

    /// True when `class` (or an ancestor) declares `iface` among its
    /// implemented interfaces.
    pub fn implements_interface(&self, class: &str, iface: &str) -> bool {
        let mut current = Some(class.to_string());
        let mut visited = HashSet::new();
        while let Some(cls) = current {
            if !visited.insert(cls.clone()) {
                return false;
            }
            if let Some(entry) = self.classes.get(&cls) {
                if entry.interfaces.iter().any(|i| i == iface) {
                    return true;
                }
            }
            current = self.class_parent(&cls).map(str::to_string);
        }
        false
    }

    /// Structural equality of two signatures: arity, parameter types,
    /// return type and staticness all match.
    pub fn compare_method_signatures(&self, a: &MethodSig, b: &MethodSig) -> bool {
        a.arity() == b.arity()
            && a.is_static == b.is_static
            && a.return_type == b.return_type
            && a.params
                .iter()
                .zip(b.params.iter())
                .all(|(pa, pb)| pa.ty == pb.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::{MethodSig, ParamSig, SymbolTable};
    use crate::ast::{ClassDecl, Declaration, File, Span, TypeAliasDecl, TypeName};
    use crate::bytecode::Visibility;
    use crate::typechecker::Type;

    fn class(name: &str, parent: Option<&str>) -> ClassDecl {
        ClassDecl {
            name: name.into(),
            parent: parent.map(str::to_string),
            implements: vec![],
            is_abstract: false,
            is_final: false,
            type_params: vec![],
            where_clause: vec![],
            constants: vec![],
            properties: vec![],
            methods: vec![],
            annotations: vec![],
            position: Span::default(),
        }
    }

    fn file_with(declarations: Vec<Declaration>) -> File {
        File {
            namespace: None,
            declarations,
            statements: vec![],
        }
    }

    #[test]
    fn test_subclass_walk() {
        let mut symbols = SymbolTable::new();
        symbols.register_file(&file_with(vec![
            Declaration::Class(class("A", None)),
            Declaration::Class(class("B", Some("A"))),
            Declaration::Class(class("C", Some("B"))),
        ]));

        assert!(symbols.is_subclass_of("C", "A"));
        assert!(symbols.is_subclass_of("B", "A"));
        assert!(!symbols.is_subclass_of("A", "C"));
    }

    #[test]
    fn test_subclass_walk_terminates_on_cycle() {
        let mut symbols = SymbolTable::new();
        symbols.register_file(&file_with(vec![
            Declaration::Class(class("A", Some("B"))),
            Declaration::Class(class("B", Some("A"))),
        ]));

        assert!(!symbols.is_subclass_of("A", "C"));
        assert!(symbols.is_subclass_of("A", "B"));
    }

    #[test]
    fn test_compatibility_rules() {
        let mut symbols = SymbolTable::new();
        symbols.register_file(&file_with(vec![
            Declaration::Class(class("Base", None)),
            Declaration::Class(class("Derived", Some("Base"))),
        ]));

        // reflexive
        assert!(symbols.is_compatible(&Type::Int, &Type::Int));
        // widening
        assert!(symbols.is_compatible(&Type::Int, &Type::Float));
        assert!(!symbols.is_compatible(&Type::Float, &Type::Int));
        // error absorbs
        assert!(symbols.is_compatible(&Type::Error, &Type::Int));
        assert!(symbols.is_compatible(&Type::Int, &Type::Error));
        // null into nullable
        assert!(symbols.is_compatible(&Type::Null, &Type::String.nullable()));
        assert!(!symbols.is_compatible(&Type::Null, &Type::String));
        // plain value into its nullable form
        assert!(symbols.is_compatible(&Type::String, &Type::String.nullable()));
        // arrays are covariant in the element
        assert!(symbols.is_compatible(
            &Type::Array(Box::new(Type::Int)),
            &Type::Array(Box::new(Type::Float))
        ));
        // subclassing
        assert!(symbols.is_compatible(
            &Type::Object("Derived".into()),
            &Type::Object("Base".into())
        ));
        assert!(!symbols.is_compatible(
            &Type::Object("Base".into()),
            &Type::Object("Derived".into())
        ));
    }

    #[test]
    fn test_alias_resolution_in_compatibility() {
        let mut symbols = SymbolTable::new();
        symbols.register_file(&file_with(vec![Declaration::TypeAlias(TypeAliasDecl {
            name: "UserId".into(),
            target: TypeName::Simple("int".into(), Span::default()),
            position: Span::default(),
        })]));

        assert!(symbols.is_compatible(&Type::Object("UserId".into()), &Type::Int));
        assert!(symbols.is_compatible(&Type::Int, &Type::Object("UserId".into())));
    }

    #[test]
    fn test_compare_method_signatures() {
        let symbols = SymbolTable::new();
        let sig = |ret: Type, is_static: bool| MethodSig {
            name: "f".into(),
            params: vec![ParamSig {
                name: "x".into(),
                ty: Type::Int,
                has_default: false,
                variadic: false,
            }],
            return_type: ret,
            is_static,
            visibility: Visibility::Public,
        };

        assert!(symbols.compare_method_signatures(&sig(Type::Int, false), &sig(Type::Int, false)));
        assert!(!symbols.compare_method_signatures(&sig(Type::Int, false), &sig(Type::Bool, false)));
        assert!(!symbols.compare_method_signatures(&sig(Type::Int, false), &sig(Type::Int, true)));
    }

    #[test]
    fn test_min_arity() {
        let sig = MethodSig {
            name: "f".into(),
            params: vec![
                ParamSig {
                    name: "a".into(),
                    ty: Type::Int,
                    has_default: false,
                    variadic: false,
                },
                ParamSig {
                    name: "b".into(),
                    ty: Type::Int,
                    has_default: true,
                    variadic: false,
                },
            ],
            return_type: Type::Void,
            is_static: false,
            visibility: Visibility::Public,
        };

        assert_eq!(sig.arity(), 2);
        assert_eq!(sig.min_arity(), 1);
        assert!(sig.accepts(1));
        assert!(sig.accepts(2));
        assert!(!sig.accepts(0));
        assert!(!sig.accepts(3));
    }
}
