mod error;
pub use error::{Error, IntoError};

mod options;
pub use options::{NullOrder, Options};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

/// A Result type alias that uses vSQL's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
