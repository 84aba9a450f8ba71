use super::{TableId, Template};
use crate::stmt::Type;
use std::fmt;

/// A named, typed value of a table's record.
#[derive(Debug)]
pub struct Field {
    /// Uniquely identifies the field
    pub id: FieldId,

    /// Name the field is referenced by in expressions
    pub identifier: String,

    /// The field's type. Relationships have type [`Type::Ref`].
    pub ty: Type,

    /// SQL reading the field, with `{a}` standing for the table alias
    pub sql: Template,

    /// Set if the field is a relationship to another table
    pub relation: Option<Relation>,
}

/// How a relationship field reaches its target table.
#[derive(Debug)]
pub struct Relation {
    pub target: TableId,

    /// Join condition, with `{m}` standing for the alias of the table holding
    /// the field and `{d}` for the alias of the target table.
    pub join: Template,
}

/// Uniquely identifies a field
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct FieldId {
    pub table: TableId,
    pub index: usize,
}

impl Field {
    pub fn is_relation(&self) -> bool {
        self.relation.is_some()
    }
}

impl From<&Field> for FieldId {
    fn from(value: &Field) -> Self {
        value.id
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({}/{})", self.table.0, self.index)
    }
}
