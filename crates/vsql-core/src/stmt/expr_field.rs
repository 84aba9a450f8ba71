use super::{Alias, Expr, Type};
use crate::schema::FieldId;

/// A resolved reference to a field, read through a specific table alias.
///
/// `parent.name` resolves to the `name` field of the table `parent` points
/// to, read from the alias the join registry assigned to that relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprField {
    /// The dotted path as written, used for diagnostics and source text.
    pub path: Vec<String>,

    /// The referenced field.
    pub field: FieldId,

    /// The alias of the table instance the field is read from.
    pub alias: Alias,

    /// The declared type of the field.
    pub ty: Type,
}

impl ExprField {
    /// Returns true if the field is a relationship to another table.
    pub fn is_ref(&self) -> bool {
        self.ty.is_ref()
    }
}

impl From<ExprField> for Expr {
    fn from(value: ExprField) -> Self {
        Self::Field(value)
    }
}
