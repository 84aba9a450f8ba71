use super::Error;

/// Error when an offset or limit is negative.
#[derive(Debug)]
pub(super) struct InvalidPaging {
    what: &'static str,
    value: i64,
}

impl std::error::Error for InvalidPaging {}

impl core::fmt::Display for InvalidPaging {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid paging: {} must be non-negative, got {}",
            self.what, self.value
        )
    }
}

impl Error {
    /// Creates an invalid paging error; `what` is `"offset"` or `"limit"`.
    pub fn invalid_paging(what: &'static str, value: i64) -> Error {
        Error::from(super::ErrorKind::InvalidPaging(InvalidPaging { what, value }))
    }

    /// Returns `true` if this error is an invalid paging error.
    pub fn is_invalid_paging(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::InvalidPaging(_))
    }
}
