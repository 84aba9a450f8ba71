mod builder;
pub use builder::{Builder, TableBuilder};

mod field;
pub use field::{Field, FieldId, Relation};

mod scope;
pub use scope::{Conflict, Namespace, NamespaceKind, Scope};

mod table;
pub use table::{Table, TableId};

mod template;
pub use template::{Placeholder, Template};

mod var;
pub use var::{VarSource, Variable};

use indexmap::IndexMap;

/// Describes the tables vSQL expressions are evaluated against: their SQL
/// sources, their fields and the relationships between them.
///
/// A schema is immutable once built and can be shared by any number of
/// queries.
#[derive(Debug)]
pub struct Schema {
    tables: Vec<Table>,

    /// Maps table names to identifiers
    table_lookup: IndexMap<String, TableId>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, id: impl Into<TableId>) -> &Table {
        &self.tables[id.into().0]
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.table_lookup.get(name).map(|id| self.table(*id))
    }

    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Table> + '_ {
        self.tables.iter()
    }

    pub fn field(&self, id: FieldId) -> &Field {
        self.table(id.table).field(id)
    }

    /// Looks up a field by identifier, returning `None` for identifiers that
    /// do not belong to this schema.
    pub fn get_field(&self, id: FieldId) -> Option<&Field> {
        self.tables.get(id.table.0)?.fields.get_index(id.index).map(|(_, field)| field)
    }
}
