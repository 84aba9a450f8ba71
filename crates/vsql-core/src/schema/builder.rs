use super::{Field, FieldId, Placeholder, Relation, Schema, Table, TableId, Template};
use crate::{stmt::Type, Error, Result};
use indexmap::IndexMap;

/// Declares tables and fields by name. Names are resolved, and templates
/// parsed, when the schema is built.
///
/// ```
/// use vsql_core::{schema::Schema, stmt::Type};
///
/// let mut builder = Schema::builder();
/// builder
///     .table("persons", "persons")
///     .key("id")
///     .field("id", Type::Int, "{a}.id")
///     .field("name", Type::String, "{a}.name")
///     .relation("parent", "{a}.parent_id", "persons", "{d}.id = {m}.parent_id");
///
/// let schema = builder.build().unwrap();
/// assert_eq!(schema.tables().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    tables: Vec<TableBuilder>,
}

#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    sql: String,
    key: Option<String>,
    fields: Vec<FieldDef>,
}

#[derive(Debug)]
struct FieldDef {
    identifier: String,
    ty: Type,
    sql: String,
    relation: Option<RelationDef>,
}

#[derive(Debug)]
struct RelationDef {
    target: String,
    join: String,
}

/// Used to track state during the build process
struct BuildSchema {
    /// Maps table names to identifiers. The identifiers are reserved before the
    /// table objects are actually created.
    table_lookup: IndexMap<String, TableId>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a table. `sql` is what the `FROM` clause reads: a table name
    /// or a parenthesized subquery.
    pub fn table(&mut self, name: impl Into<String>, sql: impl Into<String>) -> &mut TableBuilder {
        self.tables.push(TableBuilder {
            name: name.into(),
            sql: sql.into(),
            key: None,
            fields: vec![],
        });
        let index = self.tables.len() - 1;
        &mut self.tables[index]
    }

    pub fn build(&self) -> Result<Schema> {
        let mut build = BuildSchema {
            table_lookup: IndexMap::new(),
        };

        for (index, table) in self.tables.iter().enumerate() {
            if build
                .table_lookup
                .insert(table.name.clone(), TableId(index))
                .is_some()
            {
                return Err(Error::invalid_schema(format!(
                    "duplicate table `{}`",
                    table.name
                )));
            }
        }

        let tables = self
            .tables
            .iter()
            .enumerate()
            .map(|(index, table)| build.build_table(TableId(index), table))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(tables = tables.len(), "built schema");

        Ok(Schema {
            tables,
            table_lookup: build.table_lookup,
        })
    }
}

impl TableBuilder {
    /// Sets the field that uniquely identifies a record.
    pub fn key(&mut self, identifier: impl Into<String>) -> &mut Self {
        self.key = Some(identifier.into());
        self
    }

    /// Declares a scalar field. `sql` reads it, with `{a}` standing for the
    /// table alias.
    pub fn field(
        &mut self,
        identifier: impl Into<String>,
        ty: Type,
        sql: impl Into<String>,
    ) -> &mut Self {
        self.fields.push(FieldDef {
            identifier: identifier.into(),
            ty,
            sql: sql.into(),
            relation: None,
        });
        self
    }

    /// Declares a relationship to the table named `target`.
    ///
    /// `sql` reads the referencing value (`{a}`), `join` is the join
    /// condition between the table holding the field (`{m}`) and the target
    /// table (`{d}`).
    pub fn relation(
        &mut self,
        identifier: impl Into<String>,
        sql: impl Into<String>,
        target: impl Into<String>,
        join: impl Into<String>,
    ) -> &mut Self {
        self.fields.push(FieldDef {
            identifier: identifier.into(),
            // Replaced by a reference to the target once tables are resolved
            ty: Type::Null,
            sql: sql.into(),
            relation: Some(RelationDef {
                target: target.into(),
                join: join.into(),
            }),
        });
        self
    }
}

impl BuildSchema {
    fn build_table(&self, id: TableId, def: &TableBuilder) -> Result<Table> {
        let mut fields = IndexMap::new();

        for (index, field) in def.fields.iter().enumerate() {
            let field_id = FieldId { table: id, index };
            let field = self
                .build_field(field_id, field)
                .map_err(|err| err.context(crate::err!("table `{}`", def.name)))?;

            if fields.contains_key(&field.identifier) {
                return Err(Error::invalid_schema(format!(
                    "duplicate field `{}` in table `{}`",
                    field.identifier, def.name
                )));
            }
            fields.insert(field.identifier.clone(), field);
        }

        let key = match &def.key {
            Some(identifier) => {
                let Some(field) = fields.get(identifier) else {
                    return Err(Error::invalid_schema(format!(
                        "key `{identifier}` is not a field of table `{}`",
                        def.name
                    )));
                };
                if field.is_relation() {
                    return Err(Error::invalid_schema(format!(
                        "key `{identifier}` of table `{}` is a relationship",
                        def.name
                    )));
                }
                Some(field.id)
            }
            None => None,
        };

        Ok(Table {
            id,
            name: def.name.clone(),
            sql: def.sql.clone(),
            fields,
            key,
        })
    }

    fn build_field(&self, id: FieldId, def: &FieldDef) -> Result<Field> {
        let sql = Template::parse(&def.sql, &[Placeholder::Alias])?;

        let (ty, relation) = match &def.relation {
            Some(relation) => {
                let Some(target) = self.table_lookup.get(&relation.target) else {
                    return Err(Error::invalid_schema(format!(
                        "relationship `{}` points to unknown table `{}`",
                        def.identifier, relation.target
                    )));
                };
                let join = Template::parse(&relation.join, &[Placeholder::Master, Placeholder::Detail])?;
                (
                    Type::Ref(*target),
                    Some(Relation {
                        target: *target,
                        join,
                    }),
                )
            }
            None => {
                if def.ty.is_collection() || def.ty.is_ref() || def.ty.is_null() {
                    return Err(Error::invalid_schema(format!(
                        "field `{}` cannot have type {}",
                        def.identifier, def.ty
                    )));
                }
                (def.ty.clone(), None)
            }
        };

        Ok(Field {
            id,
            identifier: def.identifier.clone(),
            ty,
            sql,
            relation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persons() -> Builder {
        let mut builder = Schema::builder();
        builder
            .table("persons", "persons")
            .key("id")
            .field("id", Type::Int, "{a}.id")
            .field("name", Type::String, "{a}.name")
            .relation("parent", "{a}.parent_id", "persons", "{d}.id = {m}.parent_id");
        builder
    }

    #[test]
    fn resolves_relationships() {
        let schema = persons().build().unwrap();
        let table = schema.table_by_name("persons").unwrap();
        let parent = table.field_by_name("parent").unwrap();

        assert_eq!(parent.ty, Type::Ref(table.id));
        assert_eq!(parent.relation.as_ref().unwrap().target, table.id);
        assert_eq!(table.key_field().unwrap().identifier, "id");
    }

    #[test]
    fn unknown_target() {
        let mut builder = Schema::builder();
        builder
            .table("persons", "persons")
            .relation("country", "{a}.country_id", "countries", "{d}.id = {m}.country_id");
        assert!(builder.build().unwrap_err().is_invalid_schema());
    }

    #[test]
    fn duplicate_field() {
        let mut builder = persons();
        builder.table("cities", "cities").field("name", Type::String, "{a}.name").field(
            "name",
            Type::String,
            "{a}.name2",
        );
        assert!(builder.build().unwrap_err().is_invalid_schema());
    }

    #[test]
    fn collection_fields_are_rejected() {
        let mut builder = Schema::builder();
        builder
            .table("persons", "persons")
            .field("tags", Type::list(Type::String), "{a}.tags");
        let err = builder.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "table `persons`: invalid schema: field `tags` cannot have type list<str>"
        );
    }

    #[test]
    fn bad_key() {
        let mut builder = Schema::builder();
        builder.table("persons", "persons").key("uuid");
        assert!(builder.build().is_err());
    }
}
