use super::Error;

/// Error when a dotted path continues into something that has no such member.
///
/// This occurs when:
/// - The target table of a relationship has no field with the given name
/// - A prefixed namespace (`r.name`, `params.lang`) has no such entry
/// - A scalar value has no attribute with the given name
#[derive(Debug)]
pub(super) struct UnknownField {
    identifier: Box<str>,
    owner: Box<str>,
}

impl std::error::Error for UnknownField {}

impl core::fmt::Display for UnknownField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "`{}` has no field `{}`", self.owner, self.identifier)
    }
}

impl Error {
    /// Creates an unknown field error for `owner.identifier`.
    pub fn unknown_field(identifier: impl Into<String>, owner: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownField(UnknownField {
            identifier: identifier.into().into(),
            owner: owner.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown field error.
    pub fn is_unknown_field(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::UnknownField(_))
    }
}
