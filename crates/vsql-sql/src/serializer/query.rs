use super::expr::Cond;
use super::{Comma, Flavor, Formatter, Ident, Params, ToSql};

use vsql_core::{
    schema::Placeholder,
    stmt::{Alias, Frozen, Join, JoinKind, OrderByExpr, SelectItem, Value},
};

/// Largest row count MySQL accepts in `LIMIT`, used when only an offset is
/// given.
const MYSQL_NO_LIMIT: &str = "18446744073709551615";

/// Name of the row number column of an Oracle paged query.
const ORACLE_ROW_NUMBER: &str = "vsql_rn";

impl ToSql for &Frozen<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let paged = self.offset().is_some() || self.limit().is_some();

        if f.flavor() == Flavor::Oracle && paged {
            oracle_page(self, f);
            return;
        }

        fmt!(f, "SELECT " Comma(self.select()));
        from_where(self, f);

        if !self.order_by().is_empty() {
            fmt!(f, " ORDER BY " Comma(self.order_by().iter().map(SortKey)));
        }

        page(self, f);
    }
}

impl ToSql for &SelectItem {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.expr " AS " Ident(&self.alias));
    }
}

/// Writes the `FROM` clause with its joins, and the `WHERE` clause.
fn from_where<P: Params>(query: &Frozen<'_>, f: &mut Formatter<'_, P>) {
    let root = query.schema().table(query.table());
    fmt!(f, " FROM " root.sql.as_str() " " Alias::ROOT);

    for join in query.joins().iter() {
        fmt!(f, join);
    }

    if let Some(filter) = query.filter() {
        fmt!(f, " WHERE " Cond(filter));
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let schema = f.schema();
        let target = schema.table(self.target);

        let Some(relation) = &schema.field(self.field).relation else {
            panic!("join through {:?}, which is not a relationship", self.field)
        };

        let on = relation.join.render(|placeholder| match placeholder {
            Placeholder::Master => self.parent.to_string(),
            Placeholder::Detail | Placeholder::Alias => self.alias.to_string(),
        });
        let table = target.sql.clone();

        let kind = match self.kind {
            JoinKind::LeftOuter => " LEFT OUTER JOIN ",
            JoinKind::Inner => " INNER JOIN ",
        };

        fmt!(f, kind table " " self.alias " ON " on);
    }
}

struct SortKey<'a>(&'a OrderByExpr);

impl ToSql for SortKey<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let expr = &self.0.expr;
        let nulls_first = f.query.options().nulls.nulls_first(self.0.ascending);
        let direction = if self.0.ascending { " ASC" } else { " DESC" };

        if f.flavor() == Flavor::Mysql {
            // MySQL has no NULLS FIRST / LAST, NULL sorts before every value
            let nulls = if nulls_first { " IS NULL DESC, " } else { " IS NULL ASC, " };
            fmt!(f, "(" expr ")" nulls expr direction);
        } else {
            let nulls = if nulls_first { " NULLS FIRST" } else { " NULLS LAST" };
            fmt!(f, expr direction nulls);
        }
    }
}

fn page<P: Params>(query: &Frozen<'_>, f: &mut Formatter<'_, P>) {
    let limit = query.limit().map(Value::Int);
    let offset = query.offset().map(Value::Int);

    match (f.flavor(), limit, offset) {
        (_, None, None) => {}
        (Flavor::Mysql, Some(limit), None) => {
            fmt!(f, " LIMIT ");
            f.bind(&limit);
        }
        (Flavor::Mysql, limit, Some(offset)) => {
            fmt!(f, " LIMIT ");
            f.bind(&offset);
            fmt!(f, ", ");
            match limit {
                Some(limit) => f.bind(&limit),
                None => fmt!(f, MYSQL_NO_LIMIT),
            }
        }
        (Flavor::Sqlite, None, Some(offset)) => {
            fmt!(f, " LIMIT -1 OFFSET ");
            f.bind(&offset);
        }
        (_, limit, offset) => {
            if let Some(limit) = limit {
                fmt!(f, " LIMIT ");
                f.bind(&limit);
            }
            if let Some(offset) = offset {
                fmt!(f, " OFFSET ");
                f.bind(&offset);
            }
        }
    }
}

/// Oracle pages by numbering the rows of the sorted result.
fn oracle_page<P: Params>(query: &Frozen<'_>, f: &mut Formatter<'_, P>) {
    let aliases = query.select().iter().map(|item| Ident(item.alias.as_str()));
    let row_number = Ident(ORACLE_ROW_NUMBER);

    fmt!(f, "SELECT " Comma(aliases) " FROM (SELECT " Comma(query.select()));

    fmt!(f, ", ROW_NUMBER() OVER (ORDER BY ");
    if query.order_by().is_empty() {
        fmt!(f, "NULL");
    } else {
        fmt!(f, Comma(query.order_by().iter().map(SortKey)));
    }
    fmt!(f, ") AS " row_number);

    from_where(query, f);
    fmt!(f, ") vsql_page WHERE ");

    let offset = query.offset().unwrap_or(0);
    match (query.offset(), query.limit()) {
        (Some(_), Some(limit)) => {
            fmt!(f, Ident(ORACLE_ROW_NUMBER) " > ");
            f.bind(&Value::Int(offset));
            fmt!(f, " AND " Ident(ORACLE_ROW_NUMBER) " <= ");
            f.bind(&Value::Int(offset.saturating_add(limit)));
        }
        (Some(_), None) => {
            fmt!(f, Ident(ORACLE_ROW_NUMBER) " > ");
            f.bind(&Value::Int(offset));
        }
        (None, Some(limit)) => {
            fmt!(f, Ident(ORACLE_ROW_NUMBER) " <= ");
            f.bind(&Value::Int(limit));
        }
        (None, None) => fmt!(f, "1 = 1"),
    }

    fmt!(f, " ORDER BY " Ident(ORACLE_ROW_NUMBER));
}
