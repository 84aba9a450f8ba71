use super::Error;
use crate::stmt::Type;

/// Error when the operand types of a node do not unify, or a node is used
/// where its type is not accepted.
#[derive(Debug)]
pub(super) struct TypeMismatch {
    message: Box<str>,
}

impl std::error::Error for TypeMismatch {}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "type mismatch: {}", self.message)
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatch {
            message: message.into().into(),
        }))
    }

    /// Creates a type mismatch error for an operator applied to two types.
    pub fn type_mismatch_between(lhs: &Type, rhs: &Type, op: impl core::fmt::Display) -> Error {
        Error::type_mismatch(format!("cannot apply `{op}` to {lhs} and {rhs}"))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::TypeMismatch(_))
    }
}
