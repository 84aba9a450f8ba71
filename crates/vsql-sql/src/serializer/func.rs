use super::arith::{floor_by, mod_by};
use super::expr::{affix, position, Bound, Collection, Cond, Operand, Separator};
use super::{Comma, Flavor, Formatter, Params, ToSql};

use vsql_core::stmt::{self, Attribute, Expr, Func, Meth, Type, Value};

pub(super) fn call<P: Params>(e: &stmt::ExprCall, f: &mut Formatter<'_, P>) {
    let Some(func) = Func::from_name(&e.name) else {
        panic!("unknown function `{}` in a frozen query", e.name)
    };
    let flavor = f.flavor();

    match (func, e.args.as_slice()) {
        (Func::Today, []) => {
            let sql = match flavor {
                Flavor::Postgresql => "CURRENT_DATE",
                Flavor::Sqlite => "DATE('now')",
                Flavor::Mysql => "CURDATE()",
                Flavor::Oracle => "TRUNC(SYSDATE)",
            };
            fmt!(f, sql);
        }
        (Func::Now, []) => {
            let sql = match flavor {
                Flavor::Postgresql => "LOCALTIMESTAMP",
                Flavor::Sqlite => "DATETIME('now')",
                Flavor::Mysql => "NOW()",
                Flavor::Oracle => "SYSDATE",
            };
            fmt!(f, sql);
        }
        (Func::Len, [arg]) => len(arg, f),
        (Func::Str, [arg]) => to_str(arg, f),
        (Func::Int, [arg]) => to_int(arg, f),
        (Func::Float, [arg]) => {
            let ty = match flavor {
                Flavor::Postgresql => "NUMERIC",
                Flavor::Sqlite => "REAL",
                Flavor::Mysql => "DECIMAL(65, 30)",
                Flavor::Oracle => {
                    fmt!(f, "TO_NUMBER(" arg ")");
                    return;
                }
            };
            fmt!(f, "CAST(" arg " AS " ty ")");
        }
        (Func::Date, [arg]) => match flavor {
            Flavor::Postgresql => fmt!(f, "CAST(" arg " AS DATE)"),
            Flavor::Sqlite | Flavor::Mysql => fmt!(f, "DATE(" arg ")"),
            Flavor::Oracle => fmt!(f, "TRUNC(" arg ")"),
        },
        (Func::Date, [year, month, day]) => match flavor {
            Flavor::Postgresql => fmt!(f, "MAKE_DATE(" Comma([year, month, day]) ")"),
            Flavor::Sqlite => {
                fmt!(f, "DATE(PRINTF('%04d-%02d-%02d', " Comma([year, month, day]) "))");
            }
            Flavor::Mysql => {
                fmt!(f, "STR_TO_DATE(CONCAT_WS('-', " Comma([year, month, day]) "), '%Y-%m-%d')");
            }
            Flavor::Oracle => {
                fmt!(f, "TO_DATE(" year " || '-' || " month " || '-' || " day ", 'YYYY-MM-DD')");
            }
        },
        (Func::DateTime, [arg]) => match flavor {
            Flavor::Sqlite => fmt!(f, "DATETIME(" arg ")"),
            Flavor::Mysql => fmt!(f, "CAST(" arg " AS DATETIME)"),
            Flavor::Postgresql | Flavor::Oracle => fmt!(f, "CAST(" arg " AS TIMESTAMP)"),
        },
        (Func::Repr, [arg]) => repr(arg, f),
        (Func::List | Func::Set, [arg]) => match Collection::of(arg) {
            Some(Collection::Items(items)) => fmt!(f, "(" Comma(items) ")"),
            _ => panic!("`{}` of a computed collection", func.name()),
        },
        (Func::Abs, [arg]) => fmt!(f, "ABS(" arg ")"),
        (Func::Sqrt, [arg]) => fmt!(f, "CASE WHEN " Operand(arg) " >= 0 THEN SQRT(" arg ") END"),
        (Func::Sin, [arg]) => fmt!(f, "SIN(" arg ")"),
        (Func::Cos, [arg]) => fmt!(f, "COS(" arg ")"),
        (Func::Tan, [arg]) => fmt!(f, "TAN(" arg ")"),
        (Func::Rgb, [r, g, b, alpha @ ..]) => rgb([r, g, b], alpha.first(), f),
        (Func::TimeDelta | Func::MonthDelta, []) => f.bind(&Value::Int(0)),
        (Func::TimeDelta, [days]) => fmt!(f, "(" Operand(days) " * 86400)"),
        (Func::TimeDelta, [days, seconds]) => {
            fmt!(f, "(" Operand(days) " * 86400 + " Operand(seconds) ")");
        }
        (Func::MonthDelta | Func::Months | Func::Seconds, [arg]) => fmt!(f, arg),
        (Func::Years, [arg]) => fmt!(f, "(" Operand(arg) " * 12)"),
        (Func::Weeks | Func::Days | Func::Hours | Func::Minutes, [arg]) => {
            let unit = func.seconds_per_unit().unwrap_or(1).to_string();
            fmt!(f, "(" Operand(arg) " * " unit ")");
        }
        (Func::Geo, [lat, long]) => match flavor {
            Flavor::Postgresql => fmt!(f, "ST_SetSRID(ST_MakePoint(" long ", " lat "), 4326)"),
            Flavor::Sqlite => fmt!(f, "MakePoint(" long ", " lat ", 4326)"),
            Flavor::Mysql => fmt!(f, "ST_SRID(POINT(" lat ", " long "), 4326)"),
            Flavor::Oracle => fmt!(
                f,
                "SDO_GEOMETRY(2001, 4326, SDO_POINT_TYPE(" long ", " lat ", NULL), NULL, NULL)"
            ),
        },
        (Func::Dist, [a, b]) => match flavor {
            Flavor::Postgresql => fmt!(f, "ST_DistanceSphere(" a ", " b ")"),
            Flavor::Sqlite => fmt!(f, "ST_Distance(" a ", " b ", 1)"),
            Flavor::Mysql => fmt!(f, "ST_Distance_Sphere(" a ", " b ")"),
            Flavor::Oracle => fmt!(f, "SDO_GEOM.SDO_DISTANCE(" a ", " b ", 0.005, 'unit=M')"),
        },
        (func, args) => panic!("`{}` called with {} arguments", func.name(), args.len()),
    }
}

fn len<P: Params>(arg: &Expr, f: &mut Formatter<'_, P>) {
    let length = f.flavor().length();

    match Collection::of(arg) {
        Some(Collection::Items(items)) => {
            let count = i64::try_from(items.len()).unwrap_or(i64::MAX);
            f.bind(&Value::Int(count));
        }
        Some(Collection::Sql(sql)) => fmt!(f, "(SELECT COUNT(*) FROM (" sql ") vsql_len)"),
        Some(Collection::Split(s, sep)) => {
            // One more part than there are separators
            let sep = Separator(sep);
            let div = if f.flavor() == Flavor::Mysql { " DIV " } else { " / " };
            fmt!(
                f,
                "((" length "(" s ") - COALESCE(" length "(REPLACE(" s ", " sep ", '')), 0))"
                div length "(" sep ") + 1)"
            );
        }
        None => fmt!(f, length "(" arg ")"),
    }
}

/// `bool(x)` as a condition: `None`, zero and empty strings are false.
pub(super) fn truthiness<P: Params>(e: &stmt::ExprCall, f: &mut Formatter<'_, P>) {
    let [arg] = e.args.as_slice() else {
        fmt!(f, "1 = 0");
        return;
    };

    match arg.infer_ty().unwrap_or(Type::Null) {
        Type::Null => fmt!(f, "1 = 0"),
        Type::Bool => fmt!(f, "CASE WHEN " Cond(arg) " THEN 1 ELSE 0 END = 1"),
        Type::Int | Type::Number | Type::Color | Type::TimeDelta | Type::MonthDelta => {
            fmt!(f, "COALESCE(" arg ", 0) <> 0");
        }
        Type::String => fmt!(f, "COALESCE(" f.flavor().length() "(" arg "), 0) > 0"),
        _ => fmt!(f, Operand(arg) " IS NOT NULL"),
    }
}

/// `repr(x)`: strings quoted with `'` and escaped like vSQL literals, dates
/// as `@(...)`.
fn repr<P: Params>(arg: &Expr, f: &mut Formatter<'_, P>) {
    let flavor = f.flavor();

    match arg.infer_ty().unwrap_or(Type::Null) {
        Type::String => {
            let (backslash, escaped_backslash, escaped_quote) = match flavor {
                // MySQL string literals treat the backslash as an escape
                Flavor::Mysql => (r"'\'", r"'\\'", r"'\'''"),
                _ => (r"''", r"'\'", r"''''"),
            };
            fmt!(f, "CASE WHEN " Operand(arg) " IS NULL THEN 'None' ELSE ");
            if flavor == Flavor::Mysql {
                fmt!(f, "CONCAT('''', ");
            } else {
                fmt!(f, "'''' || ");
            }
            fmt!(f, "REPLACE(REPLACE(" arg ", " backslash ", " escaped_backslash "), '''', " escaped_quote ")");
            if flavor == Flavor::Mysql {
                fmt!(f, ", '''')");
            } else {
                fmt!(f, " || ''''");
            }
            fmt!(f, " END");
        }
        ty @ (Type::Date | Type::DateTime) => {
            fmt!(f, "CASE WHEN " Operand(arg) " IS NULL THEN 'None' ELSE ");
            let iso = match (flavor, ty) {
                (Flavor::Sqlite, Type::Date) => ("STRFTIME('%Y-%m-%d', ", ")"),
                (Flavor::Sqlite, _) => ("STRFTIME('%Y-%m-%dT%H:%M:%S', ", ")"),
                (Flavor::Mysql, Type::Date) => ("DATE_FORMAT(", ", '%Y-%m-%d')"),
                (Flavor::Mysql, _) => ("DATE_FORMAT(", ", '%Y-%m-%dT%H:%i:%s')"),
                (_, Type::Date) => ("TO_CHAR(", ", 'YYYY-MM-DD')"),
                _ => ("TO_CHAR(", ", 'YYYY-MM-DD\"T\"HH24:MI:SS')"),
            };
            if flavor == Flavor::Mysql {
                fmt!(f, "CONCAT('@(', " iso.0 arg iso.1 ", ')')");
            } else {
                fmt!(f, "'@(' || " iso.0 arg iso.1 " || ')'");
            }
            fmt!(f, " END");
        }
        _ => {
            fmt!(f, "COALESCE(");
            to_str(arg, f);
            fmt!(f, ", 'None')");
        }
    }
}

/// Packs `0xRRGGBBAA` from components in `[0, 1]`.
fn rgb<P: Params>(channels: [&Expr; 3], alpha: Option<&Expr>, f: &mut Formatter<'_, P>) {
    let (open, close) = match f.flavor() {
        Flavor::Sqlite => ("CAST(", " AS INTEGER)"),
        Flavor::Postgresql => ("CAST(", " AS BIGINT)"),
        Flavor::Mysql => ("CAST(", " AS SIGNED)"),
        Flavor::Oracle => ("(", ")"),
    };

    fmt!(f, open);
    for (channel, factor) in channels.into_iter().zip(["16777216", "65536", "256"]) {
        fmt!(f, "ROUND(" Operand(channel) " * 255) * " factor " + ");
    }
    match alpha {
        Some(alpha) => fmt!(f, "ROUND(" Operand(alpha) " * 255)"),
        None => fmt!(f, "255"),
    }
    fmt!(f, close);
}

fn to_str<P: Params>(arg: &Expr, f: &mut Formatter<'_, P>) {
    let ty = arg.infer_ty().unwrap_or(Type::Null);

    match (ty, f.flavor()) {
        (Type::Bool, _) => {
            fmt!(f, "CASE WHEN " Cond(arg) " THEN 'True' WHEN NOT (" Cond(arg) ") THEN 'False' END");
        }
        (Type::Date, Flavor::Oracle) => fmt!(f, "TO_CHAR(" arg ", 'YYYY-MM-DD')"),
        (Type::DateTime, Flavor::Oracle) => fmt!(f, "TO_CHAR(" arg ", 'YYYY-MM-DD HH24:MI:SS')"),
        (_, Flavor::Oracle) => fmt!(f, "TO_CHAR(" arg ")"),
        (_, Flavor::Mysql) => fmt!(f, "CAST(" arg " AS CHAR)"),
        (_, Flavor::Postgresql | Flavor::Sqlite) => fmt!(f, "CAST(" arg " AS TEXT)"),
    }
}

fn to_int<P: Params>(arg: &Expr, f: &mut Formatter<'_, P>) {
    let ty = arg.infer_ty().unwrap_or(Type::Null);

    match (ty, f.flavor()) {
        (Type::Int | Type::Null, _) => fmt!(f, arg),
        (Type::Bool, _) => {
            fmt!(f, "CASE WHEN " Cond(arg) " THEN 1 WHEN NOT (" Cond(arg) ") THEN 0 END");
        }
        (_, Flavor::Sqlite) => fmt!(f, "CAST(" arg " AS INTEGER)"),
        (Type::Number, Flavor::Postgresql) => fmt!(f, "CAST(TRUNC(" arg ") AS BIGINT)"),
        (_, Flavor::Postgresql) => fmt!(f, "CAST(" arg " AS BIGINT)"),
        (Type::Number, Flavor::Mysql) => fmt!(f, "CAST(TRUNCATE(" arg ", 0) AS SIGNED)"),
        (_, Flavor::Mysql) => fmt!(f, "CAST(" arg " AS SIGNED)"),
        (Type::Number, Flavor::Oracle) => fmt!(f, "TRUNC(" arg ")"),
        (_, Flavor::Oracle) => fmt!(f, "TO_NUMBER(" arg ")"),
    }
}

pub(super) fn method<P: Params>(e: &stmt::ExprMeth, f: &mut Formatter<'_, P>) {
    let Some(meth) = Meth::from_name(&e.name) else {
        panic!("unknown method `{}` in a frozen query", e.name)
    };
    let recv = &*e.recv;

    let name = match (meth, e.args.as_slice()) {
        (Meth::StartsWith | Meth::EndsWith, _) => return affix(e, f),
        (Meth::Replace, [old, new]) => {
            fmt!(f, "REPLACE(" recv ", " old ", " new ")");
            return;
        }
        (Meth::Find, [sub, bounds @ ..]) => return find(recv, sub, bounds, f),
        (Meth::Join, [items]) => return join(recv, items, f),
        (Meth::Lum, []) => return lum(recv, f),
        (Meth::Week, []) => return week(recv, f),
        (Meth::Split, _) => panic!("`str.split` yields a collection"),
        (Meth::Lower, _) => "LOWER",
        (Meth::Upper, _) => "UPPER",
        (Meth::Strip, _) => "TRIM",
        (Meth::LStrip, _) => "LTRIM",
        (Meth::RStrip, _) => "RTRIM",
        (meth, args) => panic!("`{}` called with {} arguments", meth.name(), args.len()),
    };
    fmt!(f, name "(" recv ")");
}

/// Index of `sub` in `s[start:stop]`, counted from the start of `s`, or -1.
fn find<P: Params>(s: &Expr, sub: &Expr, bounds: &[Expr], f: &mut Formatter<'_, P>) {
    let instr = match f.flavor() {
        Flavor::Postgresql => "STRPOS(",
        _ => "INSTR(",
    };

    let start = bounds.first().filter(|bound| !bound.is_null());
    if bounds.iter().all(Expr::is_null) {
        fmt!(f, "(" instr s ", " sub ") - 1)");
        return;
    }

    let sliced = &Expr::slice(s.clone(), start.cloned(), bounds.get(1).cloned());

    fmt!(f, "CASE WHEN " instr sliced ", " sub ") > 0 THEN " instr sliced ", " sub ") - 1 + ");
    match start {
        Some(start) => position(s, Bound::Expr(start), true, f),
        None => fmt!(f, "0"),
    }
    fmt!(f, " WHEN " instr sliced ", " sub ") = 0 THEN -1 END");
}

/// `sep.join(items)`, skipping NULL items.
fn join<P: Params>(sep: &Expr, items: &Expr, f: &mut Formatter<'_, P>) {
    let Some(Collection::Items(items)) = Collection::of(items) else {
        panic!("only literal collections can be joined")
    };

    if items.is_empty() {
        fmt!(f, "SUBSTR(" sep ", 1, 0)");
        return;
    }

    match f.flavor() {
        Flavor::Oracle => {
            fmt!(f, "SUBSTR(");
            for (i, item) in items.into_iter().enumerate() {
                if i > 0 {
                    fmt!(f, " || ");
                }
                fmt!(f, "CASE WHEN " item " IS NOT NULL THEN " Operand(sep) " || " item " END");
            }
            fmt!(f, ", LENGTH(" sep ") + 1)");
        }
        _ => fmt!(f, "CONCAT_WS(" sep ", " Comma(items) ")"),
    }
}

/// HLS lightness of a color: the mean of its largest and smallest channel.
fn lum<P: Params>(color: &Expr, f: &mut Formatter<'_, P>) {
    let channels: Vec<_> = ["r", "g", "b"]
        .into_iter()
        .map(|name| Expr::attr(color.clone(), name))
        .collect();
    let (greatest, least) = match f.flavor() {
        Flavor::Sqlite => ("MAX(", "MIN("),
        _ => ("GREATEST(", "LEAST("),
    };

    fmt!(
        f,
        "((" greatest Comma(&channels) ") + " least Comma(&channels) ")) / 510.0)"
    );
}

/// Week of the year with weeks starting on Monday, like `%W`.
fn week<P: Params>(date: &Expr, f: &mut Formatter<'_, P>) {
    let yearday = &Expr::attr(date.clone(), "yearday");
    let weekday = &Expr::attr(date.clone(), "weekday");

    match f.flavor() {
        Flavor::Mysql => fmt!(f, "((" yearday " + 6 - " weekday ") DIV 7)"),
        Flavor::Oracle => fmt!(f, "TRUNC((" yearday " + 6 - " weekday ") / 7)"),
        Flavor::Postgresql | Flavor::Sqlite => fmt!(f, "((" yearday " + 6 - " weekday ") / 7)"),
    }
}

pub(super) fn attribute<P: Params>(e: &stmt::ExprAttr, f: &mut Formatter<'_, P>) {
    let Some(attr) = Attribute::from_name(&e.name) else {
        panic!("unknown attribute `{}` in a frozen query", e.name)
    };
    let base = &*e.base;

    if let Some(shift) = attr.channel_shift() {
        let divisor = (1_i64 << shift).to_string();
        match f.flavor() {
            Flavor::Oracle => fmt!(f, "MOD(TRUNC(" base " / " divisor "), 256)"),
            _ => fmt!(f, "((" Operand(base) " >> " shift.to_string() ") & 255)"),
        }
        return;
    }

    match attr {
        Attribute::Days => return floor_by(Operand(base), 86400, f),
        Attribute::Seconds => return mod_by(Operand(base), 86400, f),
        _ => {}
    }
    if let Some(unit) = attr.total_unit() {
        fmt!(f, "(" Operand(base) " / " unit.to_string() ".0)");
        return;
    }

    match f.flavor() {
        Flavor::Postgresql => match attr {
            Attribute::Lat => fmt!(f, "ST_Y(" base ")"),
            Attribute::Long => fmt!(f, "ST_X(" base ")"),
            Attribute::Second => fmt!(f, "CAST(FLOOR(EXTRACT(SECOND FROM " base ")) AS INTEGER)"),
            Attribute::Weekday => fmt!(f, "(CAST(EXTRACT(ISODOW FROM " base ") AS INTEGER) - 1)"),
            _ => fmt!(f, "CAST(EXTRACT(" extract_field(attr) " FROM " base ") AS INTEGER)"),
        },
        Flavor::Sqlite => {
            let format = match attr {
                Attribute::Lat => return fmt!(f, "ST_Y(" base ")"),
                Attribute::Long => return fmt!(f, "ST_X(" base ")"),
                // %w counts from Sunday
                Attribute::Weekday => {
                    return fmt!(f, "((CAST(strftime('%w', " base ") AS INTEGER) + 6) % 7)")
                }
                Attribute::Year => "'%Y'",
                Attribute::Month => "'%m'",
                Attribute::Day => "'%d'",
                Attribute::Hour => "'%H'",
                Attribute::Minute => "'%M'",
                Attribute::Second => "'%S'",
                Attribute::Yearday => "'%j'",
                attr => unreachable!("{attr:?} is not a date part"),
            };
            fmt!(f, "CAST(strftime(" format ", " base ") AS INTEGER)");
        }
        Flavor::Mysql => {
            let func = match attr {
                Attribute::Lat => "ST_Latitude",
                Attribute::Long => "ST_Longitude",
                Attribute::Weekday => "WEEKDAY",
                Attribute::Yearday => "DAYOFYEAR",
                _ => extract_field(attr),
            };
            fmt!(f, func "(" base ")");
        }
        Flavor::Oracle => match attr {
            Attribute::Lat => fmt!(f, "TREAT(" base " AS MDSYS.SDO_GEOMETRY).SDO_POINT.Y"),
            Attribute::Long => fmt!(f, "TREAT(" base " AS MDSYS.SDO_GEOMETRY).SDO_POINT.X"),
            Attribute::Year | Attribute::Month | Attribute::Day => {
                fmt!(f, "EXTRACT(" extract_field(attr) " FROM " base ")");
            }
            Attribute::Hour => fmt!(f, "TO_NUMBER(TO_CHAR(" base ", 'HH24'))"),
            Attribute::Minute => fmt!(f, "TO_NUMBER(TO_CHAR(" base ", 'MI'))"),
            Attribute::Second => fmt!(f, "TO_NUMBER(TO_CHAR(" base ", 'SS'))"),
            Attribute::Yearday => fmt!(f, "TO_NUMBER(TO_CHAR(" base ", 'DDD'))"),
            // Days since the Monday of the ISO week
            Attribute::Weekday => fmt!(f, "(TRUNC(" base ") - TRUNC(" base ", 'IW'))"),
            attr => unreachable!("{attr:?} is not a date part"),
        },
    }
}

fn extract_field(attr: Attribute) -> &'static str {
    match attr {
        Attribute::Year => "YEAR",
        Attribute::Month => "MONTH",
        Attribute::Day => "DAY",
        Attribute::Hour => "HOUR",
        Attribute::Minute => "MINUTE",
        Attribute::Second => "SECOND",
        Attribute::Yearday => "DOY",
        attr => unreachable!("{attr:?} is not a date part"),
    }
}
