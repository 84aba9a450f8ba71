use super::Error;

/// Error when an identifier is not bound by any namespace of the scope.
#[derive(Debug)]
pub(super) struct UnknownName {
    identifier: Box<str>,
}

impl std::error::Error for UnknownName {}

impl core::fmt::Display for UnknownName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown name `{}`", self.identifier)
    }
}

impl Error {
    /// Creates an unknown name error.
    pub fn unknown_name(identifier: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownName(UnknownName {
            identifier: identifier.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown name error.
    pub fn is_unknown_name(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownName(_))
    }
}
