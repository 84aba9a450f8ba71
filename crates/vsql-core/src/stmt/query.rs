use super::*;
use crate::schema::{Schema, Scope, TableId};
use crate::{err, Error, Options, Result};

/// Builds a query against one root table of a schema.
///
/// Every expression passed to the builder is resolved and validated before
/// the call returns, so the builder only ever holds a valid query. Once
/// complete, [`Query::freeze`] turns it into an immutable [`Frozen`] query
/// generators render.
///
/// ```
/// use vsql_core::{schema::Schema, stmt::{Expr, Query, Type}};
///
/// let mut builder = Schema::builder();
/// builder
///     .table("persons", "persons")
///     .field("name", Type::String, "{a}.name");
/// let schema = builder.build().unwrap();
///
/// let mut query = Query::new(&schema, "persons").unwrap();
/// query
///     .select(Expr::name("name"), None).unwrap()
///     .filter(Expr::ne(Expr::name("name"), Expr::null())).unwrap()
///     .limit(10).unwrap();
///
/// let query = query.freeze();
/// assert_eq!(query.select()[0].alias, "c1");
/// ```
#[derive(Debug)]
pub struct Query<'a> {
    schema: &'a Schema,
    table: TableId,
    scope: Scope,
    options: Options,
    joins: Joins,
    select: Vec<SelectItem>,
    filter: Option<Expr>,
    order_by: Vec<OrderByExpr>,
    offset: Option<i64>,
    limit: Option<i64>,
}

/// An immutable, validated query.
#[derive(Debug, Clone)]
pub struct Frozen<'a> {
    schema: &'a Schema,
    table: TableId,
    options: Options,
    joins: Joins,
    select: Vec<SelectItem>,
    filter: Option<Expr>,
    order_by: Vec<OrderByExpr>,
    offset: Option<i64>,
    limit: Option<i64>,
}

/// An expression in the result, named by `alias`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: String,
    pub ty: Type,
}

/// A sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub ascending: bool,
}

impl<'a> Query<'a> {
    /// Starts a query on the table named `table`, with the default scope.
    pub fn new(schema: &'a Schema, table: &str) -> Result<Query<'a>> {
        let Some(table) = schema.table_by_name(table) else {
            return Err(Error::invalid_schema(format!("unknown table `{table}`")));
        };

        Ok(Query {
            schema,
            table: table.id,
            scope: Scope::default(),
            options: Options::default(),
            joins: Joins::new(table.id),
            select: vec![],
            filter: None,
            order_by: vec![],
            offset: None,
            limit: None,
        })
    }

    /// Sets the scope names are looked up in.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn joins(&self) -> &Joins {
        &self.joins
    }

    /// Adds an item to the result. Without an alias the item is named
    /// `c<n>`, `n` being its one-based position.
    pub fn select(&mut self, expr: Expr, alias: Option<&str>) -> Result<&mut Self> {
        let position = self.select.len() + 1;
        let alias = match alias {
            Some(alias) => alias.to_string(),
            None => format!("c{position}"),
        };

        if self.select.iter().any(|item| item.alias == alias) {
            return Err(Error::duplicate_alias(alias));
        }

        let (expr, ty) = self
            .bind(&expr)
            .and_then(|(expr, ty)| {
                if ty.is_collection() {
                    Err(Error::type_mismatch(format!("cannot select {ty}")).at(&expr))
                } else {
                    Ok((expr, ty))
                }
            })
            .map_err(|err| err.context(err!("select item {position}")))?;

        tracing::debug!(%alias, %expr, %ty, "select");
        self.select.push(SelectItem { expr, alias, ty });
        Ok(self)
    }

    /// Restricts the result to records for which `expr` is true. Repeated
    /// calls combine with `and`.
    pub fn filter(&mut self, expr: Expr) -> Result<&mut Self> {
        let (expr, ty) = self
            .bind(&expr)
            .map_err(|err| err.context(err!("filter")))?;

        if !matches!(ty, Type::Bool | Type::Null) {
            return Err(Error::type_mismatch(format!("filter must be bool, got {ty}"))
                .at(&expr)
                .context(err!("filter")));
        }

        tracing::debug!(%expr, "filter");
        self.filter = Some(match self.filter.take() {
            Some(filter) => Expr::and(filter, expr),
            None => expr,
        });
        Ok(self)
    }

    /// Appends a sort key.
    pub fn sort(&mut self, expr: Expr, ascending: bool) -> Result<&mut Self> {
        let position = self.order_by.len() + 1;
        let (expr, ty) = self
            .bind(&expr)
            .map_err(|err| err.context(err!("sort key {position}")))?;

        if !ty.is_sortable() {
            return Err(Error::type_mismatch(format!("cannot sort by {ty}"))
                .at(&expr)
                .context(err!("sort key {position}")));
        }

        tracing::debug!(%expr, ascending, "sort");
        self.order_by.push(OrderByExpr { expr, ascending });
        Ok(self)
    }

    /// Skips the first `offset` records of the result.
    pub fn offset(&mut self, offset: i64) -> Result<&mut Self> {
        if offset < 0 {
            return Err(Error::invalid_paging("offset", offset));
        }
        self.offset = Some(offset);
        Ok(self)
    }

    /// Returns at most `limit` records.
    pub fn limit(&mut self, limit: i64) -> Result<&mut Self> {
        if limit < 0 {
            return Err(Error::invalid_paging("limit", limit));
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Joins the table reached through the relationship path `path`
    /// (`"parent"`, `"parent.parent"`) and requires it to exist: records
    /// without a related record are excluded. Returns the alias of the last
    /// table on the path.
    pub fn register_table(&mut self, path: &str) -> Result<Alias> {
        let mut joins = self.joins.clone();
        let mut alias = Alias::ROOT;
        let mut walked: Vec<&str> = vec![];

        for segment in path.split('.') {
            let table = self.schema.table(joins.table(alias).unwrap_or(self.table));
            let Some(field) = table.field_by_name(segment) else {
                let owner = if walked.is_empty() {
                    table.name.clone()
                } else {
                    walked.join(".")
                };
                return Err(Error::unknown_field(segment, owner));
            };

            alias = joins.join(alias, field, JoinKind::Inner)?;
            walked.push(segment);
        }

        tracing::debug!(path, %alias, "registered table");
        self.joins = joins;
        Ok(alias)
    }

    /// Resolves and validates an expression. Joins are only kept when both
    /// steps succeed.
    fn bind(&mut self, expr: &Expr) -> Result<(Expr, Type)> {
        let mut joins = self.joins.clone();
        let expr = resolve(expr, self.schema, &self.scope, &mut joins)?;
        let ty = expr.infer_ty()?;
        self.joins = joins;
        Ok((expr, ty))
    }

    /// Finishes the query.
    ///
    /// Without select items every field of the root table is selected, named
    /// after its identifier. With tiebreaking enabled, a sorted or paged query
    /// on a table with a key gets the key as its final sort key.
    pub fn freeze(self) -> Frozen<'a> {
        let table = self.schema.table(self.table);

        let select = if self.select.is_empty() {
            table
                .fields
                .values()
                .map(|field| SelectItem {
                    expr: ExprField {
                        path: vec![field.identifier.clone()],
                        field: field.id,
                        alias: Alias::ROOT,
                        ty: field.ty.clone(),
                    }
                    .into(),
                    alias: field.identifier.clone(),
                    ty: field.ty.clone(),
                })
                .collect()
        } else {
            self.select
        };

        let mut order_by = self.order_by;
        let paged = self.offset.is_some() || self.limit.is_some();

        if let (true, Some(key)) = (self.options.tiebreak, table.key_field()) {
            let sorted_by_key = order_by.iter().any(|key_expr| {
                matches!(&key_expr.expr, Expr::Field(f) if f.field == key.id && f.alias.is_root())
            });

            if (paged || !order_by.is_empty()) && !sorted_by_key {
                order_by.push(OrderByExpr {
                    expr: ExprField {
                        path: vec![key.identifier.clone()],
                        field: key.id,
                        alias: Alias::ROOT,
                        ty: key.ty.clone(),
                    }
                    .into(),
                    ascending: true,
                });
            }
        }

        tracing::debug!(
            table = %table.name,
            select = select.len(),
            joins = self.joins.len(),
            sort_keys = order_by.len(),
            "froze query"
        );

        Frozen {
            schema: self.schema,
            table: self.table,
            options: self.options,
            joins: self.joins,
            select,
            filter: self.filter,
            order_by,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

impl<'a> Frozen<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The root table.
    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn joins(&self) -> &Joins {
        &self.joins
    }

    pub fn select(&self) -> &[SelectItem] {
        &self.select
    }

    pub fn filter(&self) -> Option<&Expr> {
        self.filter.as_ref()
    }

    pub fn order_by(&self) -> &[OrderByExpr] {
        &self.order_by
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// Renders the query with `generator`.
    pub fn render(&self, generator: &impl Generator) -> Result<Rendered> {
        generator.render(self)
    }
}
