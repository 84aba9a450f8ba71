use super::Error;

/// Error when a schema definition handed to the engine is invalid.
///
/// This occurs when:
/// - A table or field name is declared twice
/// - A relationship targets a table that does not exist
/// - A SQL template uses a placeholder that is not allowed at its position
/// - A field is declared with a collection type
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvalidSchema(_))
    }
}
