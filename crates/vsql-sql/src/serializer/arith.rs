use super::expr::Operand;
use super::{Flavor, Formatter, Params, ToSql};

use vsql_core::stmt::{self, BinaryOp, Expr, Type};

/// `x` or `-x`.
#[derive(Clone, Copy)]
struct Signed<'a> {
    expr: &'a Expr,
    negate: bool,
}

impl ToSql for Signed<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if self.negate {
            fmt!(f, "-" Operand(self.expr));
        } else {
            fmt!(f, Operand(self.expr));
        }
    }
}

fn ty(expr: &Expr) -> Type {
    expr.infer_ty().unwrap_or(Type::Null)
}

fn is_int(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Null)
}

pub(super) fn binary_op<P: Params>(e: &stmt::ExprBinaryOp, f: &mut Formatter<'_, P>) {
    let (lhs, rhs): (&Expr, &Expr) = (&e.lhs, &e.rhs);
    let (lt, rt) = (ty(lhs), ty(rhs));

    match (e.op, &lt, &rt) {
        (
            BinaryOp::Add | BinaryOp::Sub,
            Type::Date | Type::DateTime,
            Type::TimeDelta | Type::MonthDelta,
        ) => return shift(lhs, &lt, rhs, &rt, e.op.is_sub(), f),
        (BinaryOp::Add, Type::TimeDelta | Type::MonthDelta, Type::Date | Type::DateTime) => {
            return shift(rhs, &rt, lhs, &lt, false, f)
        }
        (BinaryOp::Sub, Type::Date, Type::Date) => return date_diff(lhs, rhs, false, f),
        (BinaryOp::Sub, Type::DateTime, Type::DateTime) => return date_diff(lhs, rhs, true, f),
        _ => {}
    }

    if e.op.is_bitwise() {
        return bitwise(e.op, lhs, rhs, f);
    }

    let strings = lt.is_string() || rt.is_string();
    let ints = (is_int(&lt) || matches!(lt, Type::TimeDelta | Type::MonthDelta)) && is_int(&rt);

    match (e.op, f.flavor()) {
        (BinaryOp::Add, Flavor::Mysql) if strings => {
            fmt!(f, "CONCAT(" lhs ", " rhs ")");
        }
        (BinaryOp::Add, _) if strings => {
            fmt!(f, Operand(lhs) " || " Operand(rhs));
        }
        (BinaryOp::Div, Flavor::Postgresql) => {
            fmt!(f, "CAST(" lhs " AS NUMERIC) / " Operand(rhs));
        }
        (BinaryOp::Div, Flavor::Sqlite) => {
            fmt!(f, "CAST(" lhs " AS REAL) / " Operand(rhs));
        }
        (BinaryOp::FloorDiv, Flavor::Sqlite) if ints => {
            sqlite_int_floor_div(Operand(lhs), Operand(rhs), f);
        }
        (BinaryOp::FloorDiv, Flavor::Sqlite) => sqlite_floor_div(lhs, rhs, f),
        (BinaryOp::FloorDiv, Flavor::Postgresql) if ints => {
            fmt!(f, "CAST(FLOOR(CAST(" lhs " AS NUMERIC) / " Operand(rhs) ") AS BIGINT)");
        }
        (BinaryOp::FloorDiv, Flavor::Postgresql) => {
            fmt!(f, "FLOOR(CAST(" lhs " AS NUMERIC) / " Operand(rhs) ")");
        }
        (BinaryOp::FloorDiv, _) => fmt!(f, "FLOOR(" Operand(lhs) " / " Operand(rhs) ")"),
        (BinaryOp::Mod, Flavor::Sqlite) if ints => {
            fmt!(f, "(" Operand(lhs) " % " Operand(rhs) " + " Operand(rhs) ") % " Operand(rhs));
        }
        (BinaryOp::Mod, Flavor::Sqlite) => {
            fmt!(f, Operand(lhs) " - " Operand(rhs) " * ");
            sqlite_floor_div(lhs, rhs, f);
        }
        (BinaryOp::Mod, _) => {
            fmt!(f, "MOD(MOD(" lhs ", " rhs ") + " Operand(rhs) ", " rhs ")");
        }
        (op, _) => {
            let op = match op {
                BinaryOp::Add => " + ",
                BinaryOp::Sub => " - ",
                BinaryOp::Mul => " * ",
                _ => " / ",
            };
            fmt!(f, Operand(lhs) op Operand(rhs));
        }
    }
}

/// Floor of `x / y` for integers. SQLite divides integers towards zero.
fn sqlite_int_floor_div<P: Params>(
    x: impl ToSql + Copy,
    y: impl ToSql + Copy,
    f: &mut Formatter<'_, P>,
) {
    fmt!(f, "(" x " / " y " - (" x " % " y " <> 0 AND (" x " < 0) <> (" y " < 0)))");
}

/// Floor of `x / y` for numbers, without the optional math functions.
fn sqlite_floor_div<P: Params>(x: &Expr, y: &Expr, f: &mut Formatter<'_, P>) {
    let (x, y) = (Operand(x), Operand(y));
    fmt!(
        f,
        "(CAST(CAST(" x " AS REAL) / " y " AS INTEGER) - (CAST(" x " AS REAL) / " y
        " < CAST(CAST(" x " AS REAL) / " y " AS INTEGER)))"
    );
}

/// Floor of `x / unit` for a positive constant unit, as an integer.
pub(super) fn floor_by<P: Params>(x: impl ToSql + Copy, unit: i64, f: &mut Formatter<'_, P>) {
    let unit = unit.to_string();
    let unit = unit.as_str();
    match f.flavor() {
        Flavor::Sqlite => fmt!(f, "(" x " / " unit " - (" x " % " unit " < 0))"),
        Flavor::Postgresql => fmt!(f, "CAST(FLOOR(" x " / " unit ".0) AS BIGINT)"),
        Flavor::Mysql | Flavor::Oracle => fmt!(f, "FLOOR(" x " / " unit ")"),
    }
}

/// `x % unit` for a positive constant unit, in `[0, unit)`.
pub(super) fn mod_by<P: Params>(x: impl ToSql + Copy, unit: i64, f: &mut Formatter<'_, P>) {
    let unit = unit.to_string();
    let unit = unit.as_str();
    match f.flavor() {
        Flavor::Sqlite => fmt!(f, "((" x " % " unit " + " unit ") % " unit ")"),
        _ => fmt!(f, "MOD(MOD(" x ", " unit ") + " unit ", " unit ")"),
    }
}

fn bitwise<P: Params>(op: BinaryOp, x: &Expr, y: &Expr, f: &mut Formatter<'_, P>) {
    let (x, y) = (Operand(x), Operand(y));

    match (f.flavor(), op) {
        (Flavor::Postgresql | Flavor::Sqlite, BinaryOp::BitAnd) => fmt!(f, x " & " y),
        (Flavor::Postgresql | Flavor::Sqlite, BinaryOp::BitOr) => fmt!(f, x " | " y),
        (Flavor::Postgresql, BinaryOp::BitXor) => fmt!(f, x " # " y),
        (Flavor::Sqlite, BinaryOp::BitXor) => fmt!(f, "(" x " | " y ") - (" x " & " y ")"),
        // Shift counts are int4 on PostgreSQL
        (Flavor::Postgresql, BinaryOp::ShiftLeft) => fmt!(f, x " << CAST(" y " AS INTEGER)"),
        (Flavor::Postgresql, BinaryOp::ShiftRight) => fmt!(f, x " >> CAST(" y " AS INTEGER)"),
        (Flavor::Sqlite, BinaryOp::ShiftLeft) => fmt!(f, x " << " y),
        (Flavor::Sqlite, BinaryOp::ShiftRight) => fmt!(f, x " >> " y),
        // MySQL computes on unsigned 64-bit integers
        (Flavor::Mysql, BinaryOp::BitAnd) => fmt!(f, "CAST(" x " & " y " AS SIGNED)"),
        (Flavor::Mysql, BinaryOp::BitOr) => fmt!(f, "CAST(" x " | " y " AS SIGNED)"),
        (Flavor::Mysql, BinaryOp::BitXor) => fmt!(f, "CAST(" x " ^ " y " AS SIGNED)"),
        (Flavor::Mysql, BinaryOp::ShiftLeft) => fmt!(f, "CAST(" x " << " y " AS SIGNED)"),
        (Flavor::Oracle, BinaryOp::BitAnd) => fmt!(f, "BITAND(" x ", " y ")"),
        (Flavor::Oracle, BinaryOp::BitOr) => fmt!(f, x " + " y " - BITAND(" x ", " y ")"),
        (Flavor::Oracle, BinaryOp::BitXor) => fmt!(f, x " + " y " - 2 * BITAND(" x ", " y ")"),
        (Flavor::Oracle, BinaryOp::ShiftLeft) => fmt!(f, x " * POWER(2, " y ")"),
        (Flavor::Mysql | Flavor::Oracle, BinaryOp::ShiftRight) => {
            fmt!(f, "FLOOR(" x " / POWER(2, " y "))");
        }
        (_, op) => panic!("`{op}` is not a bitwise operator"),
    }
}

/// A date or datetime moved by a time delta or a month delta.
fn shift<P: Params>(
    base: &Expr,
    base_ty: &Type,
    delta: &Expr,
    delta_ty: &Type,
    negate: bool,
    f: &mut Formatter<'_, P>,
) {
    let datetime = matches!(base_ty, Type::DateTime);
    let months = matches!(delta_ty, Type::MonthDelta);
    let delta = Signed {
        expr: delta,
        negate,
    };

    match (f.flavor(), months, datetime) {
        // 'floor' clamps the day instead of overflowing into the next month
        (Flavor::Sqlite, true, false) => fmt!(f, "DATE(" base ", " delta " || ' months', 'floor')"),
        (Flavor::Sqlite, true, true) => {
            fmt!(f, "DATETIME(" base ", " delta " || ' months', 'floor')");
        }
        (Flavor::Sqlite, false, false) => {
            fmt!(f, "DATE(" base ", ");
            floor_by(delta, 86400, f);
            fmt!(f, " || ' days')");
        }
        (Flavor::Sqlite, false, true) => fmt!(f, "DATETIME(" base ", " delta " || ' seconds')"),
        (Flavor::Postgresql, true, false) => {
            fmt!(f, "CAST(" Operand(base) " + MAKE_INTERVAL(months => CAST(" delta " AS INTEGER)) AS DATE)");
        }
        (Flavor::Postgresql, true, true) => {
            fmt!(f, Operand(base) " + MAKE_INTERVAL(months => CAST(" delta " AS INTEGER))");
        }
        (Flavor::Postgresql, false, false) => {
            fmt!(f, Operand(base) " + CAST(");
            floor_by(delta, 86400, f);
            fmt!(f, " AS INTEGER)");
        }
        (Flavor::Postgresql, false, true) => fmt!(f, Operand(base) " + MAKE_INTERVAL(secs => " delta ")"),
        (Flavor::Mysql, true, _) => fmt!(f, "DATE_ADD(" base ", INTERVAL " delta " MONTH)"),
        (Flavor::Mysql, false, false) => {
            fmt!(f, "DATE_ADD(" base ", INTERVAL ");
            floor_by(delta, 86400, f);
            fmt!(f, " DAY)");
        }
        (Flavor::Mysql, false, true) => fmt!(f, "DATE_ADD(" base ", INTERVAL " delta " SECOND)"),
        (Flavor::Oracle, true, _) => fmt!(f, "ADD_MONTHS(" base ", " delta ")"),
        (Flavor::Oracle, false, false) => {
            fmt!(f, Operand(base) " + ");
            floor_by(delta, 86400, f);
        }
        (Flavor::Oracle, false, true) => {
            fmt!(f, Operand(base) " + NUMTODSINTERVAL(" delta ", 'SECOND')");
        }
    }
}

/// Difference of two dates or datetimes in seconds.
fn date_diff<P: Params>(a: &Expr, b: &Expr, datetime: bool, f: &mut Formatter<'_, P>) {
    let (a, b) = (Operand(a), Operand(b));

    match (f.flavor(), datetime) {
        (Flavor::Sqlite, _) => {
            fmt!(f, "CAST(ROUND((JULIANDAY(" a ") - JULIANDAY(" b ")) * 86400) AS INTEGER)");
        }
        (Flavor::Postgresql | Flavor::Oracle, false) => fmt!(f, "(" a " - " b ") * 86400"),
        (Flavor::Postgresql, true) => fmt!(f, "CAST(EXTRACT(EPOCH FROM " a " - " b ") AS BIGINT)"),
        (Flavor::Mysql, false) => fmt!(f, "DATEDIFF(" a ", " b ") * 86400"),
        (Flavor::Mysql, true) => fmt!(f, "TIMESTAMPDIFF(SECOND, " b ", " a ")"),
        (Flavor::Oracle, true) => {
            fmt!(f, "ROUND((CAST(" a " AS DATE) - CAST(" b " AS DATE)) * 86400)");
        }
    }
}
