use std::collections::HashMap;

use super::types::Type;
use crate::ast::Span;

/// Metadata tracked for each declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInfo {
    pub declared: Type,
    pub initialized: bool,
    pub position: Span,
}

/// A single lexical frame: variable bindings plus the narrowings active in
/// this frame. Narrowings live in the frame that installed them; leaving
/// the branch discards them.
#[derive(Debug, Clone, Default)]
struct Frame {
    variables: HashMap<String, VarInfo>,
    narrowings: HashMap<String, Type>,
}

/// Lexical scope chain for one function body. Lookups walk from the
/// innermost frame outward; narrowing lookups consult only the innermost
/// frame.
#[derive(Debug, Clone)]
pub struct TypeScope {
    frames: Vec<Frame>,
}

impl Default for TypeScope {
    fn default() -> Self {
        TypeScope {
            frames: vec![Frame::default()],
        }
    }
}

impl TypeScope {
    pub fn new() -> TypeScope {
        Self::default()
    }

    pub fn enter(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Declare or shadow a variable in the innermost frame.
    pub fn declare(&mut self, name: impl ToString, info: VarInfo) {
        if let Some(frame) = self.frames.last_mut() {
            frame.variables.insert(name.to_string(), info);
        }
    }

    /// Resolve a variable walking outward through the frames.
    pub fn lookup(&self, name: &str) -> Option<&VarInfo> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.variables.get(name))
    }

    /// Mark the closest binding of `name` as initialized.
    pub fn mark_initialized(&mut self, name: &str) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(info) = frame.variables.get_mut(name) {
                info.initialized = true;
                return;
            }
        }
    }

    /// Record a narrowing for `name` in the innermost frame.
    pub fn narrow(&mut self, name: impl ToString, ty: Type) {
        if let Some(frame) = self.frames.last_mut() {
            frame.narrowings.insert(name.to_string(), ty);
        }
    }

    /// Active narrowing for `name`, innermost frame only.
    pub fn narrowing(&self, name: &str) -> Option<&Type> {
        self.frames
            .last()
            .and_then(|frame| frame.narrowings.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeScope, VarInfo};
    use crate::ast::Span;
    use crate::typechecker::Type;

    fn var(ty: Type) -> VarInfo {
        VarInfo {
            declared: ty,
            initialized: true,
            position: Span::default(),
        }
    }

    #[test]
    fn test_lookup_walks_outward() {
        let mut scope = TypeScope::new();
        scope.declare("x", var(Type::Int));
        scope.enter();

        assert_eq!(scope.lookup("x").map(|v| v.declared.clone()), Some(Type::Int));

        scope.exit();
        assert!(scope.lookup("x").is_some());
    }

    #[test]
    fn test_inner_frame_shadows() {
        let mut scope = TypeScope::new();
        scope.declare("x", var(Type::Int));
        scope.enter();
        scope.declare("x", var(Type::String));

        assert_eq!(
            scope.lookup("x").map(|v| v.declared.clone()),
            Some(Type::String)
        );

        scope.exit();
        assert_eq!(scope.lookup("x").map(|v| v.declared.clone()), Some(Type::Int));
    }

    #[test]
    fn test_bindings_dropped_on_exit() {
        let mut scope = TypeScope::new();
        scope.enter();
        scope.declare("tmp", var(Type::Bool));
        scope.exit();

        assert!(scope.lookup("tmp").is_none());
    }

    #[test]
    fn test_narrowing_is_per_frame() {
        let mut scope = TypeScope::new();
        scope.declare("a", var(Type::String.nullable()));
        scope.enter();
        scope.narrow("a", Type::String);

        assert_eq!(scope.narrowing("a"), Some(&Type::String));

        scope.enter();
        // inner frame does not inherit the narrowing
        assert_eq!(scope.narrowing("a"), None);
        scope.exit();

        scope.exit();
        assert_eq!(scope.narrowing("a"), None);
    }

    #[test]
    fn test_narrowing_is_idempotent() {
        let mut scope = TypeScope::new();
        scope.enter();
        scope.narrow("a", Type::String);
        scope.narrow("a", Type::String);

        assert_eq!(scope.narrowing("a"), Some(&Type::String));
    }

    #[test]
    fn test_mark_initialized_hits_closest_binding() {
        let mut scope = TypeScope::new();
        scope.declare(
            "x",
            VarInfo {
                declared: Type::Int,
                initialized: false,
                position: Span::default(),
            },
        );
        scope.enter();
        scope.mark_initialized("x");
        scope.exit();

        assert!(scope.lookup("x").map(|v| v.initialized).unwrap_or(false));
    }
}
