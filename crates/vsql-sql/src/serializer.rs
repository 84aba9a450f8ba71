#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
use flavor::Flavor;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod arith;
mod expr;
mod func;
mod query;
mod value;

use vsql_core::{
    schema::Schema,
    stmt::{Frozen, Generator, Rendered, Value},
    Result,
};

/// Serializes a frozen vSQL query to SQL for one database flavor.
///
/// Values taken from expressions are never inlined: literals and variables
/// become bind parameters, reported in placeholder order. The only SQL copied
/// into the output is the schema's own (table sources, field templates, join
/// conditions and SQL-sourced variables).
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// The query being serialized
    query: &'a Frozen<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    pub fn serialize(&self, query: &Frozen<'_>, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            query,
            dst: &mut ret,
            params,
        };

        query.to_sql(&mut fmt);

        tracing::debug!(flavor = ?self.flavor, sql = %ret, "serialized query");
        ret
    }
}

impl Generator for Serializer {
    fn render(&self, query: &Frozen<'_>) -> Result<Rendered> {
        let mut params = vec![];
        let text = self.serialize(query, &mut params);
        Ok(Rendered { text, params })
    }
}

impl<T: Params> Formatter<'_, T> {
    fn flavor(&self) -> Flavor {
        self.serializer.flavor
    }

    fn schema(&self) -> &Schema {
        self.query.schema()
    }

    /// Binds a value as a parameter and writes its placeholder.
    fn bind(&mut self, value: &Value) {
        let value = self.flavor().convert(value);
        let placeholder = self.params.push(&value);
        fmt!(self, placeholder);
    }
}
