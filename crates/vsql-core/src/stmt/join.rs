use crate::schema::{Field, FieldId, TableId};
use crate::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// Alias of a table instance in a query. The root table is `t0`, joined
/// tables are numbered in registration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alias(pub usize);

impl Alias {
    pub const ROOT: Alias = Alias(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Records without a related record are kept, the joined fields read as
    /// `None`.
    LeftOuter,

    /// Records without a related record are dropped.
    Inner,
}

/// A table joined through a relationship field.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub alias: Alias,

    /// Alias of the table holding the relationship field
    pub parent: Alias,

    /// The relationship field
    pub field: FieldId,

    /// The table the relationship points to
    pub target: TableId,

    pub kind: JoinKind,
}

/// The joins of a query, keyed by `(parent alias, relationship field)`.
///
/// Registering the same relationship from the same parent again returns the
/// existing alias, so a path used in several expressions is joined once.
/// Iteration order is registration order, which puts every join after the
/// join of its parent.
#[derive(Debug, Clone)]
pub struct Joins {
    root: TableId,
    entries: IndexMap<(Alias, FieldId), Join>,
}

impl Joins {
    pub fn new(root: TableId) -> Joins {
        Joins {
            root,
            entries: IndexMap::new(),
        }
    }

    pub fn root(&self) -> TableId {
        self.root
    }

    /// Returns the alias for `field` followed from `parent`, registering a
    /// new join on first use.
    pub fn join(&mut self, parent: Alias, field: &Field, kind: JoinKind) -> Result<Alias> {
        let Some(relation) = &field.relation else {
            return Err(Error::type_mismatch(format!(
                "`{}` is not a relationship",
                field.identifier
            )));
        };

        if self.table(parent) != Some(field.id.table) {
            return Err(Error::unknown_field(&field.identifier, parent.to_string()));
        }

        let alias = Alias(self.entries.len() + 1);
        let join = self
            .entries
            .entry((parent, field.id))
            .or_insert_with(|| {
                tracing::trace!(%parent, %alias, field = %field.identifier, "registered join");
                Join {
                    alias,
                    parent,
                    field: field.id,
                    target: relation.target,
                    kind,
                }
            });

        if kind == JoinKind::Inner {
            join.kind = JoinKind::Inner;
        }

        Ok(join.alias)
    }

    /// Returns the table an alias stands for.
    pub fn table(&self, alias: Alias) -> Option<TableId> {
        if alias.is_root() {
            return Some(self.root);
        }
        self.get(alias).map(|join| join.target)
    }

    pub fn get(&self, alias: Alias) -> Option<&Join> {
        // Aliases are assigned densely in registration order
        self.entries
            .get_index(alias.0.checked_sub(1)?)
            .map(|(_, join)| join)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Join> + '_ {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::Schema, stmt::Type};

    fn schema() -> Schema {
        let mut builder = Schema::builder();
        builder
            .table("persons", "persons")
            .field("name", Type::String, "{a}.name")
            .relation("parent", "{a}.parent_id", "persons", "{d}.id = {m}.parent_id");
        builder.build().unwrap()
    }

    #[test]
    fn joins_are_idempotent() {
        let schema = schema();
        let persons = schema.table_by_name("persons").unwrap();
        let parent = persons.field_by_name("parent").unwrap();
        let mut joins = Joins::new(persons.id);

        let t1 = joins.join(Alias::ROOT, parent, JoinKind::LeftOuter).unwrap();
        let again = joins.join(Alias::ROOT, parent, JoinKind::LeftOuter).unwrap();
        let t2 = joins.join(t1, parent, JoinKind::LeftOuter).unwrap();

        assert_eq!(t1, again);
        assert_eq!(t1.to_string(), "t1");
        assert_eq!(t2.to_string(), "t2");
        assert_eq!(joins.len(), 2);
        assert_eq!(joins.get(t2).unwrap().parent, t1);
    }

    #[test]
    fn inner_join_wins() {
        let schema = schema();
        let persons = schema.table_by_name("persons").unwrap();
        let parent = persons.field_by_name("parent").unwrap();
        let mut joins = Joins::new(persons.id);

        let t1 = joins.join(Alias::ROOT, parent, JoinKind::LeftOuter).unwrap();
        joins.join(Alias::ROOT, parent, JoinKind::Inner).unwrap();
        joins.join(Alias::ROOT, parent, JoinKind::LeftOuter).unwrap();

        assert_eq!(joins.get(t1).unwrap().kind, JoinKind::Inner);
    }

    #[test]
    fn scalar_fields_cannot_be_joined() {
        let schema = schema();
        let persons = schema.table_by_name("persons").unwrap();
        let name = persons.field_by_name("name").unwrap();
        let mut joins = Joins::new(persons.id);

        assert!(joins.join(Alias::ROOT, name, JoinKind::LeftOuter).is_err());
        assert!(joins.is_empty());
    }
}
