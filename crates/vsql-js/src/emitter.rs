mod expr;

use vsql_core::{
    bail,
    stmt::{Alias, Frozen, Generator, JoinKind, Rendered, Value},
    Result,
};

/// Emits a query as a JavaScript function expression:
///
/// ```text
/// function (rows, p, vars) { ... }
/// ```
///
/// The function filters, sorts, pages and projects `rows`, an array of record
/// objects keyed by field identifier. Relationship fields hold the related
/// record as a nested object, or `null`; in expressions they stand for the
/// related record's key, as the foreign key column does in SQL. `p` is the parameter array returned
/// alongside the text, converted with [`crate::to_json`], and `vars` holds the
/// values of variables computed by SQL on the server, keyed by name.
///
/// Filtering, ordering and NULL handling follow the SQL generators, so the
/// function selects the same records in the same order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Emitter;

struct Formatter<'a> {
    /// The query being emitted
    query: &'a Frozen<'a>,

    /// The JavaScript source
    dst: String,

    /// Parameters, in `p` index order
    params: Vec<Value>,
}

impl Emitter {
    pub fn emit(&self, query: &Frozen<'_>) -> Result<Rendered> {
        let mut f = Formatter {
            query,
            dst: String::new(),
            params: vec![],
        };

        f.function()?;

        tracing::debug!(len = f.dst.len(), params = f.params.len(), "emitted query function");
        Ok(Rendered {
            text: f.dst,
            params: f.params,
        })
    }
}

impl Generator for Emitter {
    fn render(&self, query: &Frozen<'_>) -> Result<Rendered> {
        self.emit(query)
    }
}

impl Formatter<'_> {
    fn function(&mut self) -> Result<()> {
        self.push("function (rows, p, vars) {\n");
        self.push(crate::PRELUDE);
        self.push("\n  let out = rows;\n");

        self.filter()?;
        self.sort()?;
        self.page();
        self.project()?;

        self.push("}");
        Ok(())
    }

    /// Keeps the records matching the filter and having a related record for
    /// every inner join.
    fn filter(&mut self) -> Result<()> {
        let query = self.query;
        let inner: Vec<Alias> = query
            .joins()
            .iter()
            .filter(|join| join.kind == JoinKind::Inner)
            .map(|join| join.alias)
            .collect();

        if inner.is_empty() && query.filter().is_none() {
            return Ok(());
        }

        self.push("  out = out.filter(function (r) {\n    return ");

        let mut sep = "";
        for alias in inner {
            self.push(sep);
            self.push("!$.isNull(");
            self.record(alias)?;
            self.push(")");
            sep = " && ";
        }

        if let Some(filter) = query.filter() {
            self.push(sep);
            self.push("$.truthy(");
            self.expr(filter)?;
            self.push(")");
        }

        self.push(";\n  });\n");
        Ok(())
    }

    fn sort(&mut self) -> Result<()> {
        let query = self.query;
        if query.order_by().is_empty() {
            return Ok(());
        }

        self.push("  out = $.sort(out, [\n");
        for key in query.order_by() {
            self.push("    [function (r) { return ");
            self.expr(&key.expr)?;
            self.push(if key.ascending { "; }, true],\n" } else { "; }, false],\n" });
        }

        let nulls_first = query.options().nulls.nulls_first(true);
        self.push(if nulls_first { "  ], true);\n" } else { "  ], false);\n" });
        Ok(())
    }

    fn page(&mut self) {
        let query = self.query;

        match (query.offset(), query.limit()) {
            (None, None) => {}
            (Some(offset), None) => {
                self.push("  out = out.slice(");
                self.bind(&Value::Int(offset));
                self.push(");\n");
            }
            (None, Some(limit)) => {
                self.push("  out = out.slice(0, ");
                self.bind(&Value::Int(limit));
                self.push(");\n");
            }
            (Some(offset), Some(limit)) => {
                self.push("  out = out.slice(");
                let offset = self.bind(&Value::Int(offset));
                self.push(", ");
                self.push(&offset);
                self.push(" + ");
                self.bind(&Value::Int(limit));
                self.push(");\n");
            }
        }
    }

    fn project(&mut self) -> Result<()> {
        let query = self.query;

        self.push("  return out.map(function (r) {\n    return {");
        for (i, item) in query.select().iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.string(&item.alias);
            self.push(": ");
            self.expr(&item.expr)?;
        }
        self.push("};\n  });\n");
        Ok(())
    }

    /// Writes the expression reading the record an alias stands for.
    fn record(&mut self, alias: Alias) -> Result<()> {
        if alias.is_root() {
            self.push("r");
            return Ok(());
        }

        let query = self.query;
        let Some(join) = query.joins().get(alias) else {
            bail!("alias {alias} is not registered");
        };
        let field = query.schema().field(join.field);

        self.push("$.get(");
        self.record(join.parent)?;
        self.push(", ");
        self.string(&field.identifier);
        self.push(")");
        Ok(())
    }

    fn push(&mut self, s: &str) {
        self.dst.push_str(s);
    }

    /// Writes a JavaScript string literal.
    fn string(&mut self, s: &str) {
        let literal = serde_json::Value::String(s.to_string()).to_string();
        self.push(&literal);
    }

    /// Binds a parameter, writes and returns its `p[i]` reference.
    fn bind(&mut self, value: &Value) -> String {
        let reference = format!("p[{}]", self.params.len());
        self.params.push(value.clone());
        self.push(&reference);
        reference
    }
}
