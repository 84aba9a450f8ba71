use super::{BinaryOp, BoolOp, Expr, UnaryOp, Value};
use std::fmt::{self, Write};

// Binding strength, loosest first.
const IF: u8 = 1;
const OR: u8 = 2;
const AND: u8 = 3;
const NOT: u8 = 4;
const COMPARE: u8 = 5;
const BIT_OR: u8 = 6;
const BIT_XOR: u8 = 7;
const BIT_AND: u8 = 8;
const SHIFT: u8 = 9;
const ADD: u8 = 10;
const MUL: u8 = 11;
const NEG: u8 = 12;
const POSTFIX: u8 = 13;
const ATOM: u8 = 14;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::If(_) => IF,
        Expr::BoolOp(e) if e.op.is_or() => OR,
        Expr::BoolOp(_) => AND,
        Expr::UnaryOp(e) if e.op.is_not() => NOT,
        Expr::UnaryOp(_) => NEG,
        Expr::Compare(_) => COMPARE,
        Expr::BinaryOp(e) => match e.op {
            BinaryOp::BitOr => BIT_OR,
            BinaryOp::BitXor => BIT_XOR,
            BinaryOp::BitAnd => BIT_AND,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => SHIFT,
            BinaryOp::Add | BinaryOp::Sub => ADD,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod => MUL,
        },
        Expr::Value(Value::Int(v)) if *v < 0 => NEG,
        Expr::Value(Value::Number(v)) if v.is_sign_negative() => NEG,
        Expr::Attr(_) | Expr::Item(_) | Expr::Slice(_) | Expr::Call(_) | Expr::Meth(_) => POSTFIX,
        Expr::Value(_)
        | Expr::Name(_)
        | Expr::Field(_)
        | Expr::Var(_)
        | Expr::List(_)
        | Expr::Set(_) => ATOM,
    }
}

/// Writes `expr`, parenthesized if it binds looser than `min`.
fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    if precedence(expr) < min {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Value(value) => fmt::Display::fmt(value, f),
            Expr::Name(name) => f.write_str(name),
            Expr::Field(e) => f.write_str(&e.path.join(".")),
            Expr::Var(e) => f.write_str(&e.path.join(".")),
            Expr::Attr(e) => {
                operand(f, &e.base, POSTFIX)?;
                write!(f, ".{}", e.name)
            }
            Expr::UnaryOp(e) => match e.op {
                UnaryOp::Not => {
                    f.write_str("not ")?;
                    operand(f, &e.expr, NOT)
                }
                UnaryOp::Neg | UnaryOp::BitNot => {
                    write!(f, "{}", e.op)?;
                    operand(f, &e.expr, NEG)
                }
            },
            Expr::BinaryOp(e) => {
                let prec = precedence(self);
                operand(f, &e.lhs, prec)?;
                write!(f, " {} ", e.op)?;
                operand(f, &e.rhs, prec + 1)
            }
            Expr::Compare(e) => {
                operand(f, &e.lhs, COMPARE + 1)?;
                write!(f, " {} ", e.op)?;
                operand(f, &e.rhs, COMPARE + 1)
            }
            Expr::BoolOp(e) => {
                let min = match e.op {
                    BoolOp::And => AND + 1,
                    BoolOp::Or => OR + 1,
                };
                for (i, item) in e.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", e.op)?;
                    }
                    operand(f, item, min)?;
                }
                Ok(())
            }
            Expr::Item(e) => {
                operand(f, &e.expr, POSTFIX)?;
                write!(f, "[{}]", e.index)
            }
            Expr::Slice(e) => {
                operand(f, &e.expr, POSTFIX)?;
                f.write_char('[')?;
                if let Some(start) = &e.start {
                    write!(f, "{start}")?;
                }
                f.write_char(':')?;
                if let Some(stop) = &e.stop {
                    write!(f, "{stop}")?;
                }
                f.write_char(']')
            }
            Expr::List(e) => {
                f.write_char('[')?;
                comma_separated(f, &e.items)?;
                f.write_char(']')
            }
            Expr::Set(e) if e.items.is_empty() => f.write_str("{/}"),
            Expr::Set(e) => {
                f.write_char('{')?;
                comma_separated(f, &e.items)?;
                f.write_char('}')
            }
            Expr::Call(e) => {
                write!(f, "{}(", e.name)?;
                comma_separated(f, &e.args)?;
                f.write_char(')')
            }
            Expr::Meth(e) => {
                operand(f, &e.recv, POSTFIX)?;
                write!(f, ".{}(", e.name)?;
                comma_separated(f, &e.args)?;
                f.write_char(')')
            }
            Expr::If(e) => {
                operand(f, &e.then, IF + 1)?;
                f.write_str(" if ")?;
                operand(f, &e.cond, IF + 1)?;
                f.write_str(" else ")?;
                operand(f, &e.otherwise, IF)
            }
        }
    }
}

/// Formats the value as a vSQL literal.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Number(v) => {
                let text = v.to_string();
                if text.contains('.') {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
            Value::String(v) => write_string(f, v),
            Value::Date(v) => write!(f, "@({})", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "@({})", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Color(v) => write!(f, "{v}"),
            Value::TimeDelta(v) => {
                let seconds = v.num_seconds();
                write!(
                    f,
                    "timedelta({}, {})",
                    seconds.div_euclid(86400),
                    seconds.rem_euclid(86400)
                )
            }
            Value::MonthDelta(v) => write!(f, "monthdelta({v})"),
            Value::List(items) => {
                f.write_char('[')?;
                comma_separated(f, items)?;
                f.write_char(']')
            }
            Value::Set(items) if items.is_empty() => f.write_str("{/}"),
            Value::Set(items) => {
                f.write_char('{')?;
                comma_separated(f, items)?;
                f.write_char('}')
            }
        }
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('\'')?;
    for ch in value.chars() {
        match ch {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            ch if ch.is_control() => write!(f, "\\u{:04x}", ch as u32)?,
            ch => f.write_char(ch)?,
        }
    }
    f.write_char('\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn literals() {
        assert_eq!(Expr::null().source(), "None");
        assert_eq!(Expr::from(true).source(), "True");
        assert_eq!(Expr::from(Decimal::new(42, 0)).source(), "42.0");
        assert_eq!(Expr::from(Decimal::new(125, 2)).source(), "1.25");
        assert_eq!(Expr::from("it's").source(), r"'it\'s'");

        let date = NaiveDate::from_ymd_opt(2000, 2, 29).unwrap();
        assert_eq!(Expr::from(date).source(), "@(2000-02-29)");
        let datetime = date.and_hms_opt(12, 34, 56).unwrap();
        assert_eq!(Expr::from(datetime).source(), "@(2000-02-29T12:34:56)");
    }

    #[test]
    fn minimal_parentheses() {
        let expr = Expr::mul(Expr::add(Expr::name("a"), 1), Expr::name("b"));
        assert_eq!(expr.source(), "(a + 1) * b");

        let expr = Expr::add(Expr::name("a"), Expr::mul(1, Expr::name("b")));
        assert_eq!(expr.source(), "a + 1 * b");

        let expr = Expr::sub(Expr::name("a"), Expr::sub(Expr::name("b"), Expr::name("c")));
        assert_eq!(expr.source(), "a - (b - c)");

        let expr = Expr::and(
            Expr::or(Expr::name("a"), Expr::name("b")),
            Expr::not(Expr::eq(Expr::name("c"), Expr::null())),
        );
        assert_eq!(expr.source(), "(a or b) and not c == None");
    }

    #[test]
    fn postfix_and_collections() {
        let expr = Expr::in_list(
            Expr::meth(Expr::path("parent.name"), "lower", vec![]),
            Expr::list(["europe", "asia"]),
        );
        assert_eq!(expr.source(), "parent.name.lower() in ['europe', 'asia']");

        let expr = Expr::slice(Expr::name("s"), None, Some(Expr::from(-1)));
        assert_eq!(expr.source(), "s[:-1]");

        assert_eq!(Expr::set(Vec::<Expr>::new()).source(), "{/}");
        assert_eq!(Expr::set([1, 2]).source(), "{1, 2}");
    }

    #[test]
    fn bitwise_precedence() {
        let expr = Expr::bit_or(Expr::bit_and(Expr::name("a"), 1), Expr::shl(Expr::name("b"), 2));
        assert_eq!(expr.source(), "a & 1 | b << 2");

        let expr = Expr::bit_and(Expr::bit_or(Expr::name("a"), 1), Expr::add(Expr::name("b"), 2));
        assert_eq!(expr.source(), "(a | 1) & b + 2");

        let expr = Expr::bit_not(Expr::bit_xor(Expr::name("a"), Expr::name("b")));
        assert_eq!(expr.source(), "~(a ^ b)");

        let expr = Expr::floor_div(Expr::name("a"), Expr::mul(2, Expr::name("b")));
        assert_eq!(expr.source(), "a // (2 * b)");
    }

    #[test]
    fn items_and_deltas() {
        let expr = Expr::item(Expr::meth(Expr::name("s"), "lower", vec![]), -1);
        assert_eq!(expr.source(), "s.lower()[-1]");

        let expr = Expr::item(Expr::add(Expr::name("a"), Expr::name("b")), 0);
        assert_eq!(expr.source(), "(a + b)[0]");

        let value = Value::TimeDelta(chrono::TimeDelta::seconds(-30));
        assert_eq!(Expr::value(value).source(), "timedelta(-1, 86370)");
        assert_eq!(Expr::value(Value::MonthDelta(3)).source(), "monthdelta(3)");
        assert_eq!(Expr::from(crate::stmt::Color::rgb(1, 2, 255)).source(), "#0102ff");
    }

    #[test]
    fn conditional() {
        let expr = Expr::if_else("a", Expr::name("flag"), Expr::if_else("b", Expr::name("other"), "c"));
        assert_eq!(expr.source(), "'a' if flag else 'b' if other else 'c'");
    }
}
