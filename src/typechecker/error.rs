use std::fmt::Display;

use super::types::Type;
use crate::ast::Span;

/// Stable diagnostic codes. The wire form (`as_str`) is what external
/// tooling matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiagnosticCode {
    ReturnTypeMismatch,
    NoReturnExpected,
    CannotAssign,
    TypeMismatch,
    UndefinedVariable,
    OperandsMustBeNumbers,
    OperandMustBeNumber,
    FinalAndAbstractConflict,
    InterfaceNotImplemented,
    InterfaceMethodMissing,
    InterfaceMethodParamMismatch,
    InterfaceMethodReturnMismatch,
    InterfaceMethodStaticMismatch,
    UninitializedVariable,
    NullableAccess,
    UnreachableCode,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ReturnTypeMismatch => "ErrReturnTypeMismatch",
            DiagnosticCode::NoReturnExpected => "ErrNoReturnExpected",
            DiagnosticCode::CannotAssign => "ErrCannotAssign",
            DiagnosticCode::TypeMismatch => "ErrTypeMismatch",
            DiagnosticCode::UndefinedVariable => "ErrUndefinedVariable",
            DiagnosticCode::OperandsMustBeNumbers => "ErrOperandsMustBeNumbers",
            DiagnosticCode::OperandMustBeNumber => "ErrOperandMustBeNumber",
            DiagnosticCode::FinalAndAbstractConflict => "ErrFinalAndAbstractConflict",
            DiagnosticCode::InterfaceNotImplemented => "ErrInterfaceNotImplemented",
            DiagnosticCode::InterfaceMethodMissing => "ErrInterfaceMethodMissing",
            DiagnosticCode::InterfaceMethodParamMismatch => "ErrInterfaceMethodParamMismatch",
            DiagnosticCode::InterfaceMethodReturnMismatch => "ErrInterfaceMethodReturnMismatch",
            DiagnosticCode::InterfaceMethodStaticMismatch => "ErrInterfaceMethodStaticMismatch",
            DiagnosticCode::UninitializedVariable => "compiler.uninitialized_variable",
            DiagnosticCode::NullableAccess => "compiler.nullable_access",
            DiagnosticCode::UnreachableCode => "compiler.unreachable_code",
        }
    }
}

impl Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported problem. Diagnostics are plain values accumulated on the
/// checker and the lowerer; they never travel through `Err`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub position: Span,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(position: Span, code: DiagnosticCode, message: impl ToString) -> Diagnostic {
        Diagnostic {
            position,
            code,
            message: message.to_string(),
        }
    }

    pub fn type_mismatch(expected: &Type, actual: &Type, position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::TypeMismatch,
            format!("expected type '{expected}' but got '{actual}'"),
        )
    }

    pub fn cannot_assign(target: &Type, value: &Type, position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::CannotAssign,
            format!("cannot assign '{value}' to '{target}'"),
        )
    }

    pub fn undefined_variable(name: &str, position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::UndefinedVariable,
            format!("undefined variable '{name}'"),
        )
    }

    pub fn uninitialized_variable(name: &str, position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::UninitializedVariable,
            format!("variable '{name}' may be used before it is assigned"),
        )
    }

    pub fn nullable_access(ty: &Type, position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::NullableAccess,
            format!("accessing member of possibly-null value of type '{ty}'"),
        )
    }

    pub fn unreachable_code(position: Span) -> Diagnostic {
        Diagnostic::new(
            position,
            DiagnosticCode::UnreachableCode,
            "unreachable code",
        )
    }

    /// Render this diagnostic with its annotated source excerpt.
    pub fn render(&self) -> String {
        self.position
            .annotate(format!("{} [{}]", self.message, self.code))
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
