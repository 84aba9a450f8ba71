use super::*;
use crate::schema::{Conflict, Field, Namespace, NamespaceKind, Schema, Scope, Variable};
use crate::{Error, Result};

/// Binds the names of an unresolved tree.
///
/// Returns a new tree where every identifier is replaced by an [`ExprField`]
/// or [`ExprVar`] node. Paths through relationship fields register joins in
/// `joins`: `parent.name` joins the target of `parent` and reads `name` from
/// it. Already resolved nodes are kept as they are.
pub fn resolve(expr: &Expr, schema: &Schema, scope: &Scope, joins: &mut Joins) -> Result<Expr> {
    Resolver {
        schema,
        scope,
        joins,
    }
    .resolve_expr(expr)
}

struct Resolver<'a> {
    schema: &'a Schema,
    scope: &'a Scope,
    joins: &'a mut Joins,
}

#[derive(Debug)]
enum Binding<'a> {
    Field(&'a Field),
    Var(&'a Variable),
    Namespace(&'a Namespace),
}

/// Result of resolving one step of a dotted path.
enum Resolved<'a> {
    Expr(Expr),
    Namespace(&'a Namespace, String),
}

impl<'a> Resolver<'a> {
    fn resolve_expr(&mut self, expr: &Expr) -> Result<Expr> {
        Ok(match expr {
            Expr::Name(_) | Expr::Attr(_) => match self.resolve_path(expr)? {
                Resolved::Expr(expr) => expr,
                Resolved::Namespace(_, prefix) => {
                    return Err(Error::type_mismatch(format!(
                        "`{prefix}` is a namespace, not a value"
                    ))
                    .at(expr))
                }
            },
            Expr::Field(e) => {
                self.check_field(e).map_err(|err| err.at(expr))?;
                expr.clone()
            }
            Expr::Value(_) | Expr::Var(_) => expr.clone(),
            Expr::UnaryOp(e) => ExprUnaryOp {
                op: e.op,
                expr: Box::new(self.resolve_expr(&e.expr)?),
            }
            .into(),
            Expr::BinaryOp(e) => ExprBinaryOp {
                lhs: Box::new(self.resolve_expr(&e.lhs)?),
                op: e.op,
                rhs: Box::new(self.resolve_expr(&e.rhs)?),
            }
            .into(),
            Expr::Compare(e) => ExprCompare {
                lhs: Box::new(self.resolve_expr(&e.lhs)?),
                op: e.op,
                rhs: Box::new(self.resolve_expr(&e.rhs)?),
            }
            .into(),
            Expr::BoolOp(e) => ExprBoolOp {
                op: e.op,
                operands: self.resolve_all(&e.operands)?,
            }
            .into(),
            Expr::Item(e) => ExprItem {
                expr: Box::new(self.resolve_expr(&e.expr)?),
                index: Box::new(self.resolve_expr(&e.index)?),
            }
            .into(),
            Expr::Slice(e) => ExprSlice {
                expr: Box::new(self.resolve_expr(&e.expr)?),
                start: self.resolve_bound(e.start.as_deref())?,
                stop: self.resolve_bound(e.stop.as_deref())?,
            }
            .into(),
            Expr::List(e) => Expr::List(ExprList {
                items: self.resolve_all(&e.items)?,
            }),
            Expr::Set(e) => Expr::Set(ExprList {
                items: self.resolve_all(&e.items)?,
            }),
            Expr::Call(e) => ExprCall {
                name: e.name.clone(),
                args: self.resolve_all(&e.args)?,
            }
            .into(),
            Expr::Meth(e) => ExprMeth {
                recv: Box::new(self.resolve_expr(&e.recv)?),
                name: e.name.clone(),
                args: self.resolve_all(&e.args)?,
            }
            .into(),
            Expr::If(e) => ExprIf {
                then: Box::new(self.resolve_expr(&e.then)?),
                cond: Box::new(self.resolve_expr(&e.cond)?),
                otherwise: Box::new(self.resolve_expr(&e.otherwise)?),
            }
            .into(),
        })
    }

    /// Fields built by the caller rather than by resolution must name a field
    /// of the schema, read through an alias of its table.
    fn check_field(&self, e: &ExprField) -> Result<()> {
        let Some(field) = self.schema.get_field(e.field) else {
            return Err(Error::unknown_field(
                format!("#{}", e.field.index),
                format!("table #{}", e.field.table.0),
            ));
        };

        if field.ty != e.ty {
            return Err(Error::type_mismatch(format!(
                "field `{}` has type {}, not {}",
                field.identifier, field.ty, e.ty
            )));
        }

        match self.joins.table(e.alias) {
            Some(table) if table == e.field.table => Ok(()),
            _ => Err(crate::err!(
                "field `{}` is not read through alias {}",
                field.identifier,
                e.alias
            )),
        }
    }

    fn resolve_all(&mut self, exprs: &[Expr]) -> Result<Vec<Expr>> {
        exprs.iter().map(|expr| self.resolve_expr(expr)).collect()
    }

    fn resolve_bound(&mut self, expr: Option<&Expr>) -> Result<Option<Box<Expr>>> {
        expr.map(|expr| self.resolve_expr(expr).map(Box::new))
            .transpose()
    }

    fn resolve_path(&mut self, expr: &Expr) -> Result<Resolved<'a>> {
        match expr {
            Expr::Name(name) => {
                let binding = self
                    .lookup(name)
                    .map_err(|err| err.at(expr))?
                    .ok_or_else(|| Error::unknown_name(name).at(expr))?;

                Ok(match binding {
                    Binding::Field(field) => Resolved::Expr(root_field(vec![name.clone()], field)),
                    Binding::Var(var) => Resolved::Expr(
                        ExprVar {
                            path: vec![name.clone()],
                            var: var.clone(),
                        }
                        .into(),
                    ),
                    Binding::Namespace(namespace) => Resolved::Namespace(namespace, name.clone()),
                })
            }
            Expr::Attr(attr) => match self.resolve_path(&attr.base)? {
                Resolved::Namespace(namespace, prefix) => {
                    let path = vec![prefix.clone(), attr.name.clone()];
                    match self.lookup_in(namespace, &attr.name) {
                        Some(Binding::Field(field)) => Ok(Resolved::Expr(root_field(path, field))),
                        Some(Binding::Var(var)) => Ok(Resolved::Expr(
                            ExprVar {
                                path,
                                var: var.clone(),
                            }
                            .into(),
                        )),
                        _ => Err(Error::unknown_field(&attr.name, prefix).at(expr)),
                    }
                }
                Resolved::Expr(Expr::Field(base)) if base.is_ref() => {
                    self.follow(base, &attr.name).map_err(|err| err.at(expr))
                }
                Resolved::Expr(base) => Ok(Resolved::Expr(Expr::attr(base, &attr.name))),
            },
            _ => Ok(Resolved::Expr(self.resolve_expr(expr)?)),
        }
    }

    /// Reads `name` from the target of the relationship field `base`.
    fn follow(&mut self, base: ExprField, name: &str) -> Result<Resolved<'a>> {
        let schema = self.schema;
        let relation_field = schema.field(base.field);
        let alias = self.joins.join(base.alias, relation_field, JoinKind::LeftOuter)?;
        let Some(target) = self.joins.table(alias) else {
            return Err(crate::err!("join alias {alias} is not registered"));
        };
        let target = schema.table(target);

        let Some(field) = target.field_by_name(name) else {
            return Err(Error::unknown_field(name, base.path.join(".")));
        };

        let mut path = base.path;
        path.push(name.to_string());

        Ok(Resolved::Expr(
            ExprField {
                path,
                field: field.id,
                alias,
                ty: field.ty.clone(),
            }
            .into(),
        ))
    }

    fn lookup(&self, name: &str) -> Result<Option<Binding<'a>>> {
        let scope: &'a Scope = self.scope;
        let mut matches = scope.namespaces().iter().filter_map(|namespace| {
            match &namespace.prefix {
                Some(prefix) if prefix == name => Some(Binding::Namespace(namespace)),
                Some(_) => None,
                None => self.lookup_in(namespace, name),
            }
        });

        let Some(first) = matches.next() else {
            return Ok(None);
        };

        if scope.conflict_policy() == Conflict::Reject {
            let others = matches.count();
            if others > 0 {
                return Err(Error::ambiguous_name(name, others + 1));
            }
        }

        tracing::trace!(name, binding = ?first, "resolved name");
        Ok(Some(first))
    }

    fn lookup_in(&self, namespace: &'a Namespace, name: &str) -> Option<Binding<'a>> {
        let schema: &'a Schema = self.schema;
        match &namespace.kind {
            NamespaceKind::Record => schema
                .table(self.joins.root())
                .field_by_name(name)
                .map(Binding::Field),
            NamespaceKind::Vars(vars) => vars.get(name).map(Binding::Var),
        }
    }
}

fn root_field(path: Vec<String>, field: &Field) -> Expr {
    ExprField {
        path,
        field: field.id,
        alias: Alias::ROOT,
        ty: field.ty.clone(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Variable;

    fn schema() -> Schema {
        let mut builder = Schema::builder();
        builder
            .table("persons", "persons")
            .field("name", Type::String, "{a}.name")
            .field("lang", Type::String, "{a}.lang")
            .relation("parent", "{a}.parent_id", "persons", "{d}.id = {m}.parent_id");
        builder.build().unwrap()
    }

    fn root(schema: &Schema) -> Joins {
        Joins::new(schema.table_by_name("persons").unwrap().id)
    }

    #[test]
    fn field_of_root_record() {
        let schema = schema();
        let mut joins = root(&schema);

        let expr = resolve(&Expr::name("name"), &schema, &Scope::default(), &mut joins).unwrap();
        let Expr::Field(field) = expr else { panic!() };
        assert_eq!(field.alias, Alias::ROOT);
        assert_eq!(field.ty, Type::String);
        assert!(joins.is_empty());
    }

    #[test]
    fn path_through_relationship_joins_once() {
        let schema = schema();
        let mut joins = root(&schema);
        let scope = Scope::default();

        let expr = Expr::and(
            Expr::eq(Expr::path("parent.name"), "Europe"),
            Expr::ne(Expr::path("parent.lang"), Expr::null()),
        );
        let resolved = resolve(&expr, &schema, &scope, &mut joins).unwrap();

        assert_eq!(joins.len(), 1);
        let aliases: Vec<_> = resolved.fields().map(|field| field.alias).collect();
        assert_eq!(aliases, [Alias(1), Alias(1)]);
        assert_eq!(resolved.source(), expr.source());
    }

    #[test]
    fn nested_paths_chain_joins() {
        let schema = schema();
        let mut joins = root(&schema);

        let resolved = resolve(
            &Expr::path("parent.parent.name"),
            &schema,
            &Scope::default(),
            &mut joins,
        )
        .unwrap();

        let Expr::Field(field) = resolved else { panic!() };
        assert_eq!(field.alias, Alias(2));
        assert_eq!(joins.get(Alias(2)).unwrap().parent, Alias(1));
    }

    #[test]
    fn unknown_name_carries_node() {
        let schema = schema();
        let mut joins = root(&schema);

        let expr = Expr::add(Expr::name("price"), 1);
        let err = resolve(&expr, &schema, &Scope::default(), &mut joins).unwrap_err();
        assert!(err.is_unknown_name());
        assert_eq!(err.node(), Some(&Expr::name("price")));
    }

    #[test]
    fn unknown_field_behind_relationship() {
        let schema = schema();
        let mut joins = root(&schema);

        let err = resolve(&Expr::path("parent.size"), &schema, &Scope::default(), &mut joins)
            .unwrap_err();
        assert_eq!(err.to_string(), "`parent` has no field `size`");
    }

    #[test]
    fn prefixed_namespaces() {
        let schema = schema();
        let mut joins = root(&schema);
        let mut scope = Scope::new();
        scope
            .push(Namespace::record_as("r"))
            .push(Namespace::vars_as("params", [Variable::value("lang", "de").unwrap()]));

        let expr = Expr::eq(Expr::path("r.lang"), Expr::path("params.lang"));
        let resolved = resolve(&expr, &schema, &scope, &mut joins).unwrap();
        assert_eq!(resolved.fields().count(), 1);
        assert_eq!(resolved.vars().count(), 1);

        // Without the prefix the names are not bound
        let err = resolve(&Expr::name("lang"), &schema, &scope, &mut joins).unwrap_err();
        assert!(err.is_unknown_name());

        let err = resolve(&Expr::name("r"), &schema, &scope, &mut joins).unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn prebuilt_fields_are_checked() {
        use crate::schema::{FieldId, TableId};

        let schema = schema();
        let mut joins = root(&schema);
        let field = |index, ty| ExprField {
            path: vec!["x".to_string()],
            field: FieldId {
                table: TableId(0),
                index,
            },
            alias: Alias::ROOT,
            ty,
        };

        let valid = Expr::from(field(0, Type::String));
        assert_eq!(
            resolve(&valid, &schema, &Scope::default(), &mut joins).unwrap(),
            valid
        );

        let missing = Expr::eq(field(99, Type::String), "x");
        let err = resolve(&missing, &schema, &Scope::default(), &mut joins).unwrap_err();
        assert!(err.is_unknown_field());
        assert_eq!(err.node(), Some(&Expr::from(field(99, Type::String))));

        let retyped = Expr::from(field(0, Type::Int));
        let err = resolve(&retyped, &schema, &Scope::default(), &mut joins).unwrap_err();
        assert!(err.is_type_mismatch());

        let mut other_table = field(0, Type::String);
        other_table.field.table = TableId(7);
        assert!(resolve(&other_table.into(), &schema, &Scope::default(), &mut joins).is_err());
    }

    #[test]
    fn conflicts() {
        let schema = schema();
        let mut joins = root(&schema);
        let mut scope = Scope::default();
        scope.push(Namespace::vars([Variable::value("lang", "de").unwrap()]));

        let resolved = resolve(&Expr::name("lang"), &schema, &scope, &mut joins).unwrap();
        assert!(matches!(resolved, Expr::Field(_)));

        scope.conflict(Conflict::Reject);
        let err = resolve(&Expr::name("lang"), &schema, &scope, &mut joins).unwrap_err();
        assert!(err.is_ambiguous_name());
    }
}
