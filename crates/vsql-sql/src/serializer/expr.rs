use super::{Comma, Delimited, Flavor, Formatter, Params, ToSql};

use vsql_core::{
    schema::VarSource,
    stmt::{self, CompareOp, Expr, Func, Meth, Value},
};

/// An expression where a condition is expected: `WHERE`, operands of `AND`,
/// `OR` and `NOT`, `CASE WHEN`.
pub(super) struct Cond<'a>(pub(super) &'a Expr);

/// An operand of an operator, parenthesized when compound.
#[derive(Clone, Copy)]
pub(super) struct Operand<'a>(pub(super) &'a Expr);

/// An operand of `AND` / `OR`, parenthesized when it is itself a boolean
/// operation.
struct CondOperand<'a>(&'a Expr);

fn is_compound(expr: &Expr) -> bool {
    expr.is_predicate() || matches!(expr, Expr::BinaryOp(_) | Expr::UnaryOp(_))
}

/// An expression where a value is expected.
impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.is_predicate() {
            value(self, f);
        } else if f.flavor().conditions_are_values() {
            predicate(self, f);
        } else {
            fmt!(f, "CASE WHEN " Cond(self) " THEN 1 WHEN NOT (" Cond(self) ") THEN 0 END");
        }
    }
}

impl ToSql for Cond<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.0.is_predicate() {
            predicate(self.0, f);
        } else if f.flavor().conditions_are_values() {
            value(self.0, f);
        } else {
            fmt!(f, Operand(self.0) " = 1");
        }
    }
}

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if is_compound(self.0) {
            fmt!(f, "(" self.0 ")");
        } else {
            fmt!(f, self.0);
        }
    }
}

impl ToSql for CondOperand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if matches!(self.0, Expr::BoolOp(_)) {
            fmt!(f, "(" Cond(self.0) ")");
        } else {
            fmt!(f, Cond(self.0));
        }
    }
}

fn predicate<P: Params>(expr: &Expr, f: &mut Formatter<'_, P>) {
    match expr {
        Expr::BoolOp(e) => {
            let sep = if e.op.is_and() { " AND " } else { " OR " };
            fmt!(f, Delimited(e.operands.iter().map(CondOperand), sep));
        }
        Expr::UnaryOp(e) => {
            debug_assert!(e.op.is_not());
            fmt!(f, "NOT (" Cond(&e.expr) ")");
        }
        Expr::Compare(e) if e.op.is_containment() => containment(e, f),
        Expr::Compare(e) => compare(e, f),
        Expr::Meth(e) => affix(e, f),
        Expr::Call(e) => super::func::truthiness(e, f),
        _ => value(expr, f),
    }
}

fn compare<P: Params>(e: &stmt::ExprCompare, f: &mut Formatter<'_, P>) {
    let (lhs, rhs) = (&*e.lhs, &*e.rhs);

    if e.op.is_ordering() {
        let op = match e.op {
            CompareOp::Lt => " < ",
            CompareOp::Le => " <= ",
            CompareOp::Gt => " > ",
            _ => " >= ",
        };
        fmt!(f, Operand(lhs) op Operand(rhs));
        return;
    }

    let negate = e.op.is_inequality();

    // Comparisons against a literal `None` test for NULL
    if lhs.is_null() || rhs.is_null() {
        let other = if rhs.is_null() { lhs } else { rhs };
        let test = if negate { " IS NOT NULL" } else { " IS NULL" };
        fmt!(f, Operand(other) test);
        return;
    }

    // `==` and `!=` treat NULL as a value
    match (f.flavor(), negate) {
        (Flavor::Postgresql, false) => fmt!(f, Operand(lhs) " IS NOT DISTINCT FROM " Operand(rhs)),
        (Flavor::Postgresql, true) => fmt!(f, Operand(lhs) " IS DISTINCT FROM " Operand(rhs)),
        (Flavor::Sqlite, false) => fmt!(f, Operand(lhs) " IS " Operand(rhs)),
        (Flavor::Sqlite, true) => fmt!(f, Operand(lhs) " IS NOT " Operand(rhs)),
        (Flavor::Mysql, false) => fmt!(f, Operand(lhs) " <=> " Operand(rhs)),
        (Flavor::Mysql, true) => fmt!(f, "NOT (" Operand(lhs) " <=> " Operand(rhs) ")"),
        (Flavor::Oracle, negate) => {
            let result = if negate { "0" } else { "1" };
            fmt!(f, "DECODE(" lhs ", " rhs ", 1, 0) = " result);
        }
    }
}

/// Item of a collection on the right of `in`.
#[derive(Clone, Copy)]
pub(super) enum Item<'a> {
    Expr(&'a Expr),
    Value(&'a Value),
}

impl Item<'_> {
    fn is_null(self) -> bool {
        match self {
            Item::Expr(expr) => expr.is_null(),
            Item::Value(value) => value.is_null(),
        }
    }
}

impl ToSql for Item<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Item::Expr(expr) => fmt!(f, expr),
            Item::Value(value) => f.bind(value),
        }
    }
}

pub(super) enum Collection<'a> {
    Items(Vec<Item<'a>>),
    Sql(&'a str),

    /// `s.split(sep)`
    Split(&'a Expr, &'a Expr),
}

impl<'a> Collection<'a> {
    /// Returns `None` when the expression is a string rather than a
    /// collection.
    pub(super) fn of(expr: &'a Expr) -> Option<Collection<'a>> {
        let values = |items: &'a [Value]| Collection::Items(items.iter().map(Item::Value).collect());

        match expr {
            Expr::List(list) | Expr::Set(list) => {
                Some(Collection::Items(list.items.iter().map(Item::Expr).collect()))
            }
            Expr::Value(value) => value.items().map(values),
            Expr::Var(var) => match &var.var.source {
                VarSource::Value(value) => value.items().map(values),
                VarSource::Sql(sql) if var.var.ty.is_collection() => Some(Collection::Sql(sql)),
                VarSource::Sql(_) => None,
            },
            Expr::Call(call) if matches!(Func::from_name(&call.name), Some(Func::List | Func::Set)) => {
                match call.args.as_slice() {
                    [arg] => Collection::of(arg),
                    _ => None,
                }
            }
            Expr::Meth(meth) if Meth::from_name(&meth.name) == Some(Meth::Split) => {
                match meth.args.as_slice() {
                    [sep] => Some(Collection::Split(&meth.recv, sep)),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// A split separator. An empty separator splits nothing and yields NULL.
#[derive(Clone, Copy)]
pub(super) struct Separator<'a>(pub(super) &'a Expr);

impl ToSql for Separator<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "NULLIF(" self.0 ", '')");
    }
}

/// `x in s.split(sep)`: `sep + x + sep` occurs in `sep + s + sep` and `x`
/// holds no separator.
fn split_containment<P: Params>(x: &Expr, s: &Expr, sep: &Expr, f: &mut Formatter<'_, P>) {
    let sep = Separator(sep);

    match f.flavor() {
        Flavor::Postgresql => fmt!(
            f,
            "STRPOS(" sep " || " Operand(s) " || " sep ", " sep " || " Operand(x) " || " sep
            ") > 0 AND STRPOS(" x ", " sep ") = 0"
        ),
        Flavor::Mysql => fmt!(
            f,
            "INSTR(CONCAT(" sep ", " s ", " sep "), CONCAT(" sep ", " x ", " sep
            ")) > 0 AND INSTR(" x ", " sep ") = 0"
        ),
        Flavor::Sqlite | Flavor::Oracle => fmt!(
            f,
            "INSTR(" sep " || " Operand(s) " || " sep ", " sep " || " Operand(x) " || " sep
            ") > 0 AND INSTR(" x ", " sep ") = 0"
        ),
    }
}

fn containment<P: Params>(e: &stmt::ExprCompare, f: &mut Formatter<'_, P>) {
    let negate = e.op == CompareOp::NotIn;
    let (lhs, rhs): (&Expr, &Expr) = (&e.lhs, &e.rhs);

    let Some(collection) = Collection::of(rhs) else {
        // Substring test
        let not = if negate { "NOT " } else { "" };
        match f.flavor() {
            Flavor::Postgresql => fmt!(f, not "STRPOS(" rhs ", " lhs ") > 0"),
            _ => fmt!(f, not "INSTR(" rhs ", " lhs ") > 0"),
        }
        return;
    };

    let items = match collection {
        Collection::Sql(sql) => {
            let op = if negate { " NOT IN (" } else { " IN (" };
            fmt!(f, Operand(lhs) op sql ")");
            return;
        }
        Collection::Split(s, sep) => {
            fmt!(f, if negate { "NOT (" } else { "(" });
            split_containment(lhs, s, sep, f);
            fmt!(f, ")");
            return;
        }
        Collection::Items(items) => items,
    };

    let has_null = items.iter().any(|item| item.is_null());
    let items: Vec<_> = items.into_iter().filter(|item| !item.is_null()).collect();

    match (items.is_empty(), has_null, negate) {
        (true, false, false) => fmt!(f, "1 = 0"),
        (true, false, true) => fmt!(f, "1 = 1"),
        (true, true, false) => fmt!(f, Operand(lhs) " IS NULL"),
        (true, true, true) => fmt!(f, Operand(lhs) " IS NOT NULL"),
        (false, false, false) => fmt!(f, Operand(lhs) " IN (" Comma(items) ")"),
        (false, false, true) => fmt!(f, Operand(lhs) " NOT IN (" Comma(items) ")"),
        (false, true, false) => {
            fmt!(f, "(" Operand(lhs) " IN (" Comma(items) ") OR " Operand(lhs) " IS NULL)")
        }
        (false, true, true) => {
            fmt!(f, "NOT (" Operand(lhs) " IN (" Comma(items) ") OR " Operand(lhs) " IS NULL)")
        }
    }
}

/// `startswith` and `endswith`
pub(super) fn affix<P: Params>(e: &stmt::ExprMeth, f: &mut Formatter<'_, P>) {
    let (s, [t]) = (&*e.recv, e.args.as_slice()) else {
        panic!("`{}` takes one argument", e.name)
    };
    let len = f.flavor().length();

    match (Meth::from_name(&e.name), f.flavor()) {
        (Some(Meth::StartsWith), _) => {
            fmt!(f, "SUBSTR(" s ", 1, " len "(" t ")) = " Operand(t));
        }
        (Some(Meth::EndsWith), Flavor::Postgresql | Flavor::Mysql) => {
            fmt!(f, "RIGHT(" s ", " len "(" t ")) = " Operand(t));
        }
        (Some(Meth::EndsWith), Flavor::Sqlite) => {
            // SUBSTR(s, -0) is the whole string
            fmt!(f, "(" len "(" t ") = 0 OR SUBSTR(" s ", -" len "(" t ")) = " Operand(t) ")");
        }
        (Some(Meth::EndsWith), Flavor::Oracle) => {
            fmt!(f, "SUBSTR(" s ", -" len "(" t ")) = " Operand(t));
        }
        _ => panic!("`{}` is not a condition", e.name),
    }
}

fn value<P: Params>(expr: &Expr, f: &mut Formatter<'_, P>) {
    match expr {
        Expr::Value(value) => f.bind(value),
        Expr::Field(e) => {
            let field = f.schema().field(e.field);
            let sql = field.sql.render(|_| e.alias.to_string());
            fmt!(f, sql);
        }
        Expr::Var(e) => match &e.var.source {
            VarSource::Value(value) => f.bind(value),
            VarSource::Sql(sql) => fmt!(f, "(" sql ")"),
        },
        Expr::Attr(e) => super::func::attribute(e, f),
        Expr::UnaryOp(e) if e.op.is_bit_not() => fmt!(f, "-1 - " Operand(&e.expr)),
        Expr::UnaryOp(e) => fmt!(f, "-" Operand(&e.expr)),
        Expr::BinaryOp(e) => super::arith::binary_op(e, f),
        Expr::Item(e) => item(e, f),
        Expr::Slice(e) => slice(e, f),
        Expr::List(e) | Expr::Set(e) => fmt!(f, "(" Comma(&e.items) ")"),
        Expr::Call(e) => super::func::call(e, f),
        Expr::Meth(e) => super::func::method(e, f),
        Expr::If(e) => {
            let (then, otherwise): (&Expr, &Expr) = (&e.then, &e.otherwise);
            fmt!(f, "CASE WHEN " Cond(&e.cond) " THEN " then " ELSE " otherwise " END");
        }
        Expr::Compare(_) | Expr::BoolOp(_) => predicate(expr, f),
        Expr::Name(name) => panic!("unresolved name `{name}` in a frozen query"),
    }
}

/// A slice bound.
#[derive(Clone, Copy)]
pub(super) enum Bound<'a> {
    Const(i64),
    Expr(&'a Expr),
}

impl<'a> Bound<'a> {
    /// A missing bound and a literal `None` are the same.
    pub(super) fn of(expr: Option<&'a Expr>) -> Option<Bound<'a>> {
        match expr {
            None => None,
            Some(expr) if expr.is_null() => None,
            Some(Expr::Value(Value::Int(v))) => Some(Bound::Const(*v)),
            Some(expr) => Some(Bound::Expr(expr)),
        }
    }
}

/// Writes the zero-based position a bound stands for in `s`: negative bounds
/// count from the end. With `clamp`, positions before the start of the string
/// become 0.
pub(super) fn position<P: Params>(s: &Expr, bound: Bound<'_>, clamp: bool, f: &mut Formatter<'_, P>) {
    let len = f.flavor().length();
    let greatest = f.flavor().greatest();

    match bound {
        Bound::Const(k) if k >= 0 => f.bind(&Value::Int(k)),
        Bound::Const(k) if clamp => {
            fmt!(f, greatest "(" len "(" s ") + ");
            f.bind(&Value::Int(k));
            fmt!(f, ", 0)");
        }
        Bound::Const(k) => {
            fmt!(f, len "(" s ") + ");
            f.bind(&Value::Int(k));
        }
        Bound::Expr(b) if clamp => {
            fmt!(f, "CASE WHEN " Operand(b) " < 0 THEN " greatest "(" len "(" s ") + " Operand(b) ", 0) ELSE " Operand(b) " END");
        }
        Bound::Expr(b) => {
            fmt!(f, "CASE WHEN " Operand(b) " < 0 THEN " len "(" s ") + " Operand(b) " ELSE " Operand(b) " END");
        }
    }
}

/// `x[i]`: a character of a string, or an item of a literal list picked with
/// a `CASE` over the possible indexes.
fn item<P: Params>(e: &stmt::ExprItem, f: &mut Formatter<'_, P>) {
    let (base, index): (&Expr, &Expr) = (&e.expr, &e.index);

    let Some(collection) = Collection::of(base) else {
        // Character at a zero-based position, NULL when out of range
        let (len, i) = (f.flavor().length(), Operand(index));
        fmt!(
            f,
            "CASE WHEN " i " >= 0 THEN NULLIF(SUBSTR(" base ", " i " + 1, 1), '') WHEN "
            len "(" base ") + " i " >= 0 THEN SUBSTR(" base ", " len "(" base ") + " i " + 1, 1) END"
        );
        return;
    };

    let Collection::Items(items) = collection else {
        panic!("only literal collections can be indexed")
    };
    if items.is_empty() {
        fmt!(f, "NULL");
        return;
    }

    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    fmt!(f, "CASE " index);
    for (i, item) in (0..).zip(items) {
        fmt!(f, " WHEN ");
        f.bind(&Value::Int(i));
        fmt!(f, " THEN " item " WHEN ");
        f.bind(&Value::Int(i - len));
        fmt!(f, " THEN " item);
    }
    fmt!(f, " END");
}

/// `s[start:stop]` with Python semantics, as `SUBSTR(s, start + 1, stop - start)`.
fn slice<P: Params>(e: &stmt::ExprSlice, f: &mut Formatter<'_, P>) {
    let s = &*e.expr;
    let start = Bound::of(e.start.as_deref());
    let stop = Bound::of(e.stop.as_deref());

    fmt!(f, "SUBSTR(" s ", ");
    match start {
        None => fmt!(f, "1"),
        Some(Bound::Const(k)) if k >= 0 => f.bind(&Value::Int(k.saturating_add(1))),
        Some(start) => {
            position(s, start, true, f);
            fmt!(f, " + 1");
        }
    }

    if let Some(stop) = stop {
        fmt!(f, ", ");
        match (start, stop) {
            (None, Bound::Const(k2)) if k2 >= 0 => f.bind(&Value::Int(k2)),
            (Some(Bound::Const(k1)), Bound::Const(k2)) if k1 >= 0 && k2 >= 0 => {
                f.bind(&Value::Int(k2.saturating_sub(k1).max(0)))
            }
            _ => {
                fmt!(f, f.flavor().greatest() "(");
                position(s, stop, false, f);
                fmt!(f, " - ");
                match start {
                    None => fmt!(f, "0"),
                    Some(start) => {
                        fmt!(f, "(");
                        position(s, start, true, f);
                        fmt!(f, ")");
                    }
                }
                fmt!(f, ", 0)");
            }
        }
    }

    fmt!(f, ")");
}
