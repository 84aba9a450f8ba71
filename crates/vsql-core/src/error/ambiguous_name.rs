use super::Error;

/// Error when a scope rejects conflicts and an identifier is bound by more
/// than one namespace.
#[derive(Debug)]
pub(super) struct AmbiguousName {
    identifier: Box<str>,
    matches: usize,
}

impl std::error::Error for AmbiguousName {}

impl core::fmt::Display for AmbiguousName {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous name `{}` is bound by {} namespaces",
            self.identifier, self.matches
        )
    }
}

impl Error {
    /// Creates an ambiguous name error.
    pub fn ambiguous_name(identifier: impl Into<String>, matches: usize) -> Error {
        Error::from(super::ErrorKind::AmbiguousName(AmbiguousName {
            identifier: identifier.into().into(),
            matches,
        }))
    }

    /// Returns `true` if this error is an ambiguous name error.
    pub fn is_ambiguous_name(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::AmbiguousName(_))
    }
}
