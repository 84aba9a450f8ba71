use super::Error;

/// Error when a function or method is unknown or called with the wrong
/// number or types of arguments.
#[derive(Debug)]
pub(super) struct ArityError {
    name: Box<str>,
    expected: Box<str>,
    actual: usize,
}

impl std::error::Error for ArityError {}

impl core::fmt::Display for ArityError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.expected.is_empty() {
            write!(f, "unknown function `{}`", self.name)
        } else {
            write!(
                f,
                "`{}` expects {}, got {} argument{}",
                self.name,
                self.expected,
                self.actual,
                if self.actual == 1 { "" } else { "s" }
            )
        }
    }
}

impl Error {
    /// Creates an arity error: `name` was called with `actual` arguments but
    /// accepts what `expected` describes.
    pub fn arity(name: impl Into<String>, expected: impl Into<String>, actual: usize) -> Error {
        Error::from(super::ErrorKind::Arity(ArityError {
            name: name.into().into(),
            expected: expected.into().into(),
            actual,
        }))
    }

    /// Creates an arity error for a function name that is not in the
    /// built-in table.
    pub fn unknown_function(name: impl Into<String>, actual: usize) -> Error {
        Error::arity(name, "", actual)
    }

    /// Returns `true` if this error is an arity error.
    pub fn is_arity(&self) -> bool {
        matches!(self.root_kind(), super::ErrorKind::Arity(_))
    }
}
