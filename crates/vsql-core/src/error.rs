mod adhoc;
mod ambiguous_name;
mod arity;
mod duplicate_alias;
mod invalid_paging;
mod invalid_schema;
mod type_mismatch;
mod unknown_field;
mod unknown_name;

use adhoc::AdhocError;
use ambiguous_name::AmbiguousName;
use arity::ArityError;
use duplicate_alias::DuplicateAlias;
use invalid_paging::InvalidPaging;
use invalid_schema::InvalidSchema;
use type_mismatch::TypeMismatch;
use unknown_field::UnknownField;
use unknown_name::UnknownName;

use crate::stmt::Expr;
use std::sync::Arc;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while resolving, validating or rendering a vSQL expression.
///
/// Every error is local and recoverable. The caller decides whether to abort
/// the surrounding operation or attach the error to the expression's author.
/// Errors raised for a specific AST node carry that node, see [`Error::node`].
#[derive(Clone)]
pub struct Error {
    inner: Arc<ErrorInner>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    node: Option<Box<Expr>>,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let ErrorInner { kind, node, cause } = match Arc::try_unwrap(consequent.inner) {
            Ok(inner) => inner,
            Err(shared) => ErrorInner {
                kind: ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
                node: shared.node.clone(),
                cause: shared.cause.clone(),
            },
        };
        assert!(
            cause.is_none(),
            "consequent error must not already have a cause"
        );
        Error {
            inner: Arc::new(ErrorInner {
                kind,
                node,
                cause: Some(self),
            }),
        }
    }

    /// Attaches the offending node to this error.
    ///
    /// A node that is already attached is kept: the innermost node is the most
    /// specific one.
    pub fn at(mut self, node: &Expr) -> Error {
        if let Some(inner) = Arc::get_mut(&mut self.inner) {
            if inner.node.is_none() {
                inner.node = Some(Box::new(node.clone()));
            }
        }
        self
    }

    /// The AST node the error was raised for, if any.
    ///
    /// Walks the context chain and returns the first node found.
    pub fn node(&self) -> Option<&Expr> {
        self.chain().find_map(|err| err.inner.node.as_deref())
    }

    /// Human-readable reason for this error, without the context chain.
    pub fn detail(&self) -> String {
        self.kind().to_string()
    }

    #[doc(hidden)]
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(args)))
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.cause.as_ref()?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        &self.inner.kind
    }

    /// The kind of the root cause. Context added on the way up does not
    /// change what went wrong.
    fn root_kind(&self) -> &ErrorKind {
        self.chain().last().map_or(&self.inner.kind, |err| &err.inner.kind)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => self
                .inner
                .cause
                .as_ref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            f.debug_struct("Error")
                .field("kind", &self.inner.kind)
                .field("node", &self.inner.node)
                .field("cause", &self.inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    UnknownName(UnknownName),
    UnknownField(UnknownField),
    TypeMismatch(TypeMismatch),
    Arity(ArityError),
    DuplicateAlias(DuplicateAlias),
    InvalidPaging(InvalidPaging),
    AmbiguousName(AmbiguousName),
    InvalidSchema(InvalidSchema),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            UnknownName(err) => core::fmt::Display::fmt(err, f),
            UnknownField(err) => core::fmt::Display::fmt(err, f),
            TypeMismatch(err) => core::fmt::Display::fmt(err, f),
            Arity(err) => core::fmt::Display::fmt(err, f),
            DuplicateAlias(err) => core::fmt::Display::fmt(err, f),
            InvalidPaging(err) => core::fmt::Display::fmt(err, f),
            AmbiguousName(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Arc::new(ErrorInner {
                kind,
                node: None,
                cause: None,
            }),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::{Expr, Type};

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("test error: {}", 42));
        assert_eq!(err.to_string(), "test error: 42");
    }

    #[test]
    fn error_chain_display() {
        let root = err!("root cause");
        let mid = err!("middle context");
        let top = err!("top context");

        let chained = root.context(mid).context(top);
        assert_eq!(
            chained.to_string(),
            "top context: middle context: root cause"
        );
    }

    #[test]
    fn anyhow_bridge() {
        let our_err: Error = anyhow::anyhow!("something failed").into();
        assert_eq!(our_err.to_string(), "something failed");
        assert!(std::error::Error::source(&our_err).is_some());
    }

    #[test]
    fn node_is_attached_once() {
        let inner = Expr::name("a");
        let outer = Expr::name("b");

        let err = Error::unknown_name("a").at(&inner).at(&outer);
        assert_eq!(err.node(), Some(&inner));
    }

    #[test]
    fn predicates_see_the_root_cause() {
        let err = Error::type_mismatch("int and str have no common type")
            .context(err!("filter"));

        assert!(err.is_type_mismatch());
        assert!(!err.is_unknown_name());
    }

    #[test]
    fn node_survives_context() {
        let node = Expr::name("price");
        let err = Error::unknown_name("price")
            .at(&node)
            .context(err!("select item 1"));

        assert_eq!(err.node(), Some(&node));
        assert_eq!(err.detail(), "select item 1");
        assert_eq!(err.to_string(), "select item 1: unknown name `price`");
    }

    #[test]
    fn kind_predicates() {
        assert!(Error::unknown_name("x").is_unknown_name());
        assert!(Error::unknown_field("x", "parent").is_unknown_field());
        assert!(Error::type_mismatch("no").is_type_mismatch());
        assert!(Error::arity("len", "1 argument", 2).is_arity());
        assert!(Error::duplicate_alias("c1").is_duplicate_alias());
        assert!(Error::invalid_paging("offset", -1).is_invalid_paging());
        assert!(Error::ambiguous_name("x", 2).is_ambiguous_name());
        assert!(Error::invalid_schema("dup").is_invalid_schema());
        assert!(!Error::invalid_schema("dup").is_type_mismatch());
    }

    #[test]
    fn type_mismatch_between_types() {
        let err = Error::type_mismatch_between(&Type::Date, &Type::DateTime, "==");
        assert_eq!(
            err.to_string(),
            "type mismatch: cannot apply `==` to date and datetime"
        );
    }
}
