use super::Formatter;

use vsql_core::{
    bail,
    schema::VarSource,
    stmt::{self, Attribute, BinaryOp, BoolOp, CompareOp, Expr, Func, Meth, Type, UnaryOp},
    Result,
};

impl Formatter<'_> {
    pub(super) fn expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Value(value) => {
                self.bind(value);
            }
            Expr::Field(e) => {
                let query = self.query;
                let schema = query.schema();
                let field = schema.field(e.field);

                // A relationship reads as the key of the related record,
                // like its foreign key column in SQL
                let key = match &field.relation {
                    Some(relation) => match schema.table(relation.target).key_field() {
                        Some(key) => Some(key.identifier.as_str()),
                        None => bail!(
                            "relationship `{}` targets table `{}`, which has no key",
                            field.identifier,
                            schema.table(relation.target).name
                        ),
                    },
                    None => None,
                };

                if key.is_some() {
                    self.push("$.get(");
                }
                self.push("$.get(");
                self.record(e.alias)?;
                self.push(", ");
                self.string(&field.identifier);
                self.push(")");
                if let Some(key) = key {
                    self.push(", ");
                    self.string(key);
                    self.push(")");
                }
            }
            Expr::Var(e) => match &e.var.source {
                VarSource::Value(value) => {
                    self.bind(value);
                }
                VarSource::Sql(_) => {
                    self.push("$.get(vars, ");
                    self.string(&e.var.name);
                    self.push(")");
                }
            },
            Expr::Attr(e) => {
                let Some(attr) = Attribute::from_name(&e.name) else {
                    bail!("unknown attribute `{}`", e.name);
                };
                self.push("$.attr.");
                self.push(attribute_name(attr));
                self.args([&*e.base])?;
            }
            Expr::UnaryOp(e) => {
                self.push(match e.op {
                    UnaryOp::Not => "$.not",
                    UnaryOp::Neg => "$.neg",
                    UnaryOp::BitNot => "$.bitnot",
                });
                self.args([&*e.expr])?;
            }
            Expr::BinaryOp(e) => self.binary_op(e)?,
            Expr::Compare(e) => {
                let (func, negate) = match e.op {
                    CompareOp::Eq | CompareOp::Is => ("$.eq", false),
                    CompareOp::Ne | CompareOp::IsNot => ("$.ne", false),
                    CompareOp::Lt => ("$.lt", false),
                    CompareOp::Le => ("$.le", false),
                    CompareOp::Gt => ("$.gt", false),
                    CompareOp::Ge => ("$.ge", false),
                    CompareOp::In => ("$.isIn", false),
                    CompareOp::NotIn => ("$.isIn", true),
                };

                if negate {
                    self.push("$.not(");
                }
                self.push(func);
                self.args([&*e.lhs, &*e.rhs])?;
                if negate {
                    self.push(")");
                }
            }
            Expr::BoolOp(e) => {
                self.push(match e.op {
                    BoolOp::And => "$.and",
                    BoolOp::Or => "$.or",
                });
                self.args(&e.operands)?;
            }
            Expr::Item(e) => {
                self.push("$.item");
                self.args([&*e.expr, &*e.index])?;
            }
            Expr::Slice(e) => {
                self.push("$.slice(");
                self.expr(&e.expr)?;
                for bound in [&e.start, &e.stop] {
                    self.push(", ");
                    match bound {
                        Some(bound) => self.expr(bound)?,
                        None => self.push("null"),
                    }
                }
                self.push(")");
            }
            Expr::List(e) | Expr::Set(e) => {
                self.push("[");
                self.items(&e.items)?;
                self.push("]");
            }
            Expr::Call(e) => {
                let Some(func) = Func::from_name(&e.name) else {
                    bail!("unknown function `{}`", e.name);
                };
                let dated = matches!(
                    e.args.first().map(Expr::infer_ty),
                    Some(Ok(Type::Date | Type::DateTime))
                );
                if func == Func::Repr && dated {
                    self.push("$.reprDate");
                } else {
                    self.push("$.fn.");
                    self.push(func.name());
                }
                self.args(&e.args)?;
            }
            Expr::Meth(e) => {
                let Some(meth) = Meth::from_name(&e.name) else {
                    bail!("unknown method `{}`", e.name);
                };
                self.push("$.meth.");
                self.push(meth.name());
                self.args(std::iter::once(&*e.recv).chain(&e.args))?;
            }
            Expr::If(e) => {
                self.push("($.truthy(");
                self.expr(&e.cond)?;
                self.push(") ? ");
                self.expr(&e.then)?;
                self.push(" : ");
                self.expr(&e.otherwise)?;
                self.push(")");
            }
            Expr::Name(name) => bail!("unresolved name `{name}`"),
        }

        Ok(())
    }

    fn binary_op(&mut self, e: &stmt::ExprBinaryOp) -> Result<()> {
        let ty = |expr: &Expr| expr.infer_ty().unwrap_or(Type::Null);
        let (lhs, rhs): (&Expr, &Expr) = (&e.lhs, &e.rhs);

        match (e.op, ty(lhs), ty(rhs)) {
            (
                BinaryOp::Add | BinaryOp::Sub,
                Type::Date | Type::DateTime,
                delta @ (Type::TimeDelta | Type::MonthDelta),
            ) => return self.shift(lhs, rhs, delta == Type::MonthDelta, e.op.is_sub()),
            (
                BinaryOp::Add,
                delta @ (Type::TimeDelta | Type::MonthDelta),
                Type::Date | Type::DateTime,
            ) => return self.shift(rhs, lhs, delta == Type::MonthDelta, false),
            (BinaryOp::Sub, Type::Date, Type::Date)
            | (BinaryOp::Sub, Type::DateTime, Type::DateTime) => {
                self.push("$.diff");
                return self.args([lhs, rhs]);
            }
            _ => {}
        }

        self.push(match e.op {
            BinaryOp::Add => "$.add",
            BinaryOp::Sub => "$.sub",
            BinaryOp::Mul => "$.mul",
            BinaryOp::Div => "$.div",
            BinaryOp::FloorDiv => "$.floordiv",
            BinaryOp::Mod => "$.mod",
            BinaryOp::BitAnd => "$.bitand",
            BinaryOp::BitOr => "$.bitor",
            BinaryOp::BitXor => "$.bitxor",
            BinaryOp::ShiftLeft => "$.shl",
            BinaryOp::ShiftRight => "$.shr",
        });
        self.args([lhs, rhs])
    }

    /// A date or datetime moved by a delta.
    fn shift(&mut self, base: &Expr, delta: &Expr, months: bool, negate: bool) -> Result<()> {
        self.push(if months { "$.shiftMonths(" } else { "$.shift(" });
        self.expr(base)?;
        self.push(", ");
        if negate {
            self.push("$.neg");
            self.args([delta])?;
        } else {
            self.expr(delta)?;
        }
        self.push(")");
        Ok(())
    }

    /// Writes a parenthesized argument list.
    fn args<'e>(&mut self, args: impl IntoIterator<Item = &'e Expr>) -> Result<()> {
        self.push("(");
        self.items(args)?;
        self.push(")");
        Ok(())
    }

    fn items<'e>(&mut self, items: impl IntoIterator<Item = &'e Expr>) -> Result<()> {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(item)?;
        }
        Ok(())
    }
}

fn attribute_name(attr: Attribute) -> &'static str {
    match attr {
        Attribute::Year => "year",
        Attribute::Month => "month",
        Attribute::Day => "day",
        Attribute::Hour => "hour",
        Attribute::Minute => "minute",
        Attribute::Second => "second",
        Attribute::Weekday => "weekday",
        Attribute::Yearday => "yearday",
        Attribute::R => "r",
        Attribute::G => "g",
        Attribute::B => "b",
        Attribute::A => "a",
        Attribute::Days => "days",
        Attribute::Seconds => "seconds",
        Attribute::TotalDays => "total_days",
        Attribute::TotalHours => "total_hours",
        Attribute::TotalMinutes => "total_minutes",
        Attribute::TotalSeconds => "total_seconds",
        Attribute::Lat => "lat",
        Attribute::Long => "long",
    }
}
