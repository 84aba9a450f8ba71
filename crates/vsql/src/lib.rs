//! vSQL: a small, statically typed expression language compiled to SQL.
//!
//! Expressions are built as trees, resolved against a [`Schema`] and
//! validated when added to a [`Query`]. A frozen query renders to every
//! supported [`Dialect`] with the same semantics.
//!
//! ```
//! use vsql::{schema::Schema, stmt::{Expr, Query, Type}, Dialect};
//!
//! let mut builder = Schema::builder();
//! builder
//!     .table("persons", "persons")
//!     .key("id")
//!     .field("id", Type::Int, "{a}.id")
//!     .field("name", Type::String, "{a}.name");
//! let schema = builder.build().unwrap();
//!
//! let mut query = Query::new(&schema, "persons").unwrap();
//! query.filter(Expr::eq(Expr::name("name"), "Ann")).unwrap();
//!
//! let rendered = vsql::render(&query.freeze(), Dialect::Postgresql).unwrap();
//! assert_eq!(
//!     rendered.text,
//!     "SELECT t0.id AS \"id\", t0.name AS \"name\" FROM persons t0 \
//!      WHERE t0.name IS NOT DISTINCT FROM $1"
//! );
//! ```

pub use vsql_core::{bail, err, schema, stmt, Error, NullOrder, Options, Result, Schema};
pub use vsql_js::{to_json, Emitter};
pub use vsql_sql::Serializer;

pub use stmt::{Expr, Frozen, Generator, Query, Rendered, Type, Value};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rendering target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgresql,
    Sqlite,
    Mysql,
    Oracle,

    /// A JavaScript function evaluating the query on records, see [`Emitter`].
    Javascript,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Postgresql,
        Dialect::Sqlite,
        Dialect::Mysql,
        Dialect::Oracle,
        Dialect::Javascript,
    ];

    pub fn is_sql(self) -> bool {
        !matches!(self, Dialect::Javascript)
    }

    /// The SQL serializer for the dialect, `None` for JavaScript.
    pub fn serializer(self) -> Option<Serializer> {
        match self {
            Dialect::Postgresql => Some(Serializer::postgresql()),
            Dialect::Sqlite => Some(Serializer::sqlite()),
            Dialect::Mysql => Some(Serializer::mysql()),
            Dialect::Oracle => Some(Serializer::oracle()),
            Dialect::Javascript => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::Postgresql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::Mysql => "mysql",
            Dialect::Oracle => "oracle",
            Dialect::Javascript => "javascript",
        })
    }
}

/// Renders a frozen query for `dialect`.
pub fn render(query: &Frozen<'_>, dialect: Dialect) -> Result<Rendered> {
    let rendered = match dialect.serializer() {
        Some(serializer) => query.render(&serializer)?,
        None => query.render(&Emitter)?,
    };

    tracing::trace!(%dialect, text = %rendered.text, params = rendered.params.len(), "rendered query");
    Ok(rendered)
}
