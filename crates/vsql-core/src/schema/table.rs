use super::{Field, FieldId};
use indexmap::IndexMap;
use std::fmt;

/// A table that expressions can be evaluated against.
#[derive(Debug)]
pub struct Table {
    /// Uniquely identifies a table
    pub id: TableId,

    /// Name of the table in the schema
    pub name: String,

    /// SQL for the `FROM` clause: a table name or a parenthesized subquery.
    /// The generator appends the alias.
    pub sql: String,

    /// The table's fields, keyed by identifier, in declaration order
    pub fields: IndexMap<String, Field>,

    /// Field that uniquely identifies a record, used as a sort tiebreaker
    pub key: Option<FieldId>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl Table {
    pub fn field(&self, id: impl Into<FieldId>) -> &Field {
        &self.fields[id.into().index]
    }

    pub fn field_by_name(&self, identifier: &str) -> Option<&Field> {
        self.fields.get(identifier)
    }

    pub fn key_field(&self) -> Option<&Field> {
        self.key.map(|id| self.field(id))
    }
}

impl From<&Table> for TableId {
    fn from(value: &Table) -> Self {
        value.id
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}
