use super::Type;
use crate::{Error, Result};

/// Built-in functions callable from vSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    /// `today()`: the current date
    Today,

    /// `now()`: the current date and time
    Now,

    /// `len(x)`: length of a string, number of items of a collection
    Len,

    /// `str(x)`
    Str,

    /// `repr(x)`: the vSQL literal of a scalar
    Repr,

    /// `bool(x)`: truthiness. `bool()` is `False`.
    Bool,

    /// `int(x)`: truncates numbers, parses strings
    Int,

    /// `float(x)`
    Float,

    /// `list(x)` and `set(x)` over a literal collection
    List,
    Set,

    /// `date(dt)` truncates a datetime, `date(y, m, d)` builds a date
    Date,

    /// `datetime(d)`: midnight of a date
    DateTime,

    /// `abs(x)`
    Abs,

    /// `sqrt(x)`: `None` for negative numbers
    Sqrt,
    Sin,
    Cos,
    Tan,

    /// `geo(lat, long)`: a position
    Geo,

    /// `dist(a, b)`: distance between two positions in meters
    Dist,

    /// `rgb(r, g, b)` and `rgb(r, g, b, a)` with components in `[0, 1]`
    Rgb,

    /// `timedelta(days=0, seconds=0)`
    TimeDelta,

    /// `monthdelta(months=0)`
    MonthDelta,

    /// `years(n)`, `months(n)`: month deltas
    Years,
    Months,

    /// `weeks(n)` to `seconds(n)`: time deltas
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Func> {
        Some(match name {
            "today" => Func::Today,
            "now" => Func::Now,
            "len" => Func::Len,
            "str" => Func::Str,
            "repr" => Func::Repr,
            "bool" => Func::Bool,
            "int" => Func::Int,
            "float" => Func::Float,
            "list" => Func::List,
            "set" => Func::Set,
            "date" => Func::Date,
            "datetime" => Func::DateTime,
            "abs" => Func::Abs,
            "sqrt" => Func::Sqrt,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "geo" => Func::Geo,
            "dist" => Func::Dist,
            "rgb" => Func::Rgb,
            "timedelta" => Func::TimeDelta,
            "monthdelta" => Func::MonthDelta,
            "years" => Func::Years,
            "months" => Func::Months,
            "weeks" => Func::Weeks,
            "days" => Func::Days,
            "hours" => Func::Hours,
            "minutes" => Func::Minutes,
            "seconds" => Func::Seconds,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Func::Today => "today",
            Func::Now => "now",
            Func::Len => "len",
            Func::Str => "str",
            Func::Repr => "repr",
            Func::Bool => "bool",
            Func::Int => "int",
            Func::Float => "float",
            Func::List => "list",
            Func::Set => "set",
            Func::Date => "date",
            Func::DateTime => "datetime",
            Func::Abs => "abs",
            Func::Sqrt => "sqrt",
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Geo => "geo",
            Func::Dist => "dist",
            Func::Rgb => "rgb",
            Func::TimeDelta => "timedelta",
            Func::MonthDelta => "monthdelta",
            Func::Years => "years",
            Func::Months => "months",
            Func::Weeks => "weeks",
            Func::Days => "days",
            Func::Hours => "hours",
            Func::Minutes => "minutes",
            Func::Seconds => "seconds",
        }
    }

    /// Functions whose argument is a collection rather than a scalar.
    pub fn takes_collection(self) -> bool {
        matches!(self, Func::Len | Func::List | Func::Set)
    }

    /// Seconds per unit of the time delta constructors.
    pub fn seconds_per_unit(self) -> Option<i64> {
        Some(match self {
            Func::Weeks => 7 * 86400,
            Func::Days => 86400,
            Func::Hours => 3600,
            Func::Minutes => 60,
            Func::Seconds => 1,
            _ => return None,
        })
    }

    fn signature(self) -> &'static str {
        match self {
            Func::Today | Func::Now => "no arguments",
            Func::Len => "one str or collection argument",
            Func::Str => "one scalar argument",
            Func::Repr => "one none, bool, int, number, str, date or datetime argument",
            Func::Bool => "at most one scalar argument",
            Func::Int => "one bool, int, number or str argument",
            Func::Float => "one int, number or str argument",
            Func::List | Func::Set => "one collection argument",
            Func::Date => "one datetime or three int arguments",
            Func::DateTime => "one date argument",
            Func::Abs | Func::Sqrt | Func::Sin | Func::Cos | Func::Tan => {
                "one int or number argument"
            }
            Func::Geo => "two numeric arguments",
            Func::Dist => "two geo arguments",
            Func::Rgb => "three or four numeric arguments",
            Func::TimeDelta => "at most two int arguments",
            Func::MonthDelta => "at most one int argument",
            Func::Years
            | Func::Months
            | Func::Weeks
            | Func::Days
            | Func::Hours
            | Func::Minutes
            | Func::Seconds => "one int argument",
        }
    }

    /// Checks the argument types of a call and returns the result type.
    pub fn check(self, args: &[Type]) -> Result<Type> {
        let ty = match (self, args) {
            (Func::Today, []) => Type::Date,
            (Func::Now, []) => Type::DateTime,
            (Func::Len, [Type::String | Type::List(_) | Type::Set(_) | Type::Null]) => Type::Int,
            (Func::Str, [arg]) if printable(arg) => Type::String,
            (Func::Repr, [arg]) if printable(arg) => Type::String,
            (Func::Bool, []) => Type::Bool,
            (Func::Bool, [arg]) if !arg.is_collection() => Type::Bool,
            (Func::Int, [Type::Bool | Type::Int | Type::Number | Type::String | Type::Null]) => {
                Type::Int
            }
            (Func::Float, [Type::Int | Type::Number | Type::String | Type::Null]) => Type::Number,
            (Func::List, [Type::List(item) | Type::Set(item)]) => Type::List(item.clone()),
            (Func::Set, [Type::List(item) | Type::Set(item)]) => Type::Set(item.clone()),
            (Func::Date, [Type::DateTime | Type::Null]) => Type::Date,
            (Func::Date, [year, month, day]) if [year, month, day].iter().all(|ty| int_like(ty)) => {
                Type::Date
            }
            (Func::DateTime, [Type::Date | Type::Null]) => Type::DateTime,
            (Func::Abs, [Type::Int]) => Type::Int,
            (Func::Abs, [Type::Number | Type::Null]) => Type::Number,
            (Func::Sqrt | Func::Sin | Func::Cos | Func::Tan, [arg]) if numeric(arg) => Type::Number,
            (Func::Geo, [lat, long]) if numeric(lat) && numeric(long) => Type::Geo,
            (Func::Dist, [Type::Geo | Type::Null, Type::Geo | Type::Null]) => Type::Number,
            (Func::Rgb, [r, g, b]) if [r, g, b].iter().all(|ty| numeric(ty)) => Type::Color,
            (Func::Rgb, [r, g, b, a]) if [r, g, b, a].iter().all(|ty| numeric(ty)) => Type::Color,
            (Func::TimeDelta, args) if args.len() <= 2 && args.iter().all(int_like) => {
                Type::TimeDelta
            }
            (Func::MonthDelta, args) if args.len() <= 1 && args.iter().all(int_like) => {
                Type::MonthDelta
            }
            (Func::Years | Func::Months, [arg]) if int_like(arg) => Type::MonthDelta,
            (Func::Weeks | Func::Days | Func::Hours | Func::Minutes | Func::Seconds, [arg])
                if int_like(arg) =>
            {
                Type::TimeDelta
            }
            _ => return Err(Error::arity(self.name(), self.signature(), args.len())),
        };
        Ok(ty)
    }
}

/// Methods callable on strings, colors and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meth {
    Lower,
    Upper,

    /// Removes leading and trailing spaces
    Strip,
    LStrip,
    RStrip,
    StartsWith,
    EndsWith,

    /// `s.replace(old, new)`
    Replace,

    /// `s.find(sub, start=None, stop=None)`: index of the first occurrence
    /// or `-1`
    Find,

    /// `s.split(sep)`: a `list<str>`
    Split,

    /// `sep.join(items)`, skipping `None` items
    Join,

    /// `c.lum()`: lightness of a color
    Lum,

    /// `d.week()`: week of the year, weeks starting on Monday. Days before
    /// the first Monday are in week 0.
    Week,
}

impl Meth {
    pub fn from_name(name: &str) -> Option<Meth> {
        Some(match name {
            "lower" => Meth::Lower,
            "upper" => Meth::Upper,
            "strip" => Meth::Strip,
            "lstrip" => Meth::LStrip,
            "rstrip" => Meth::RStrip,
            "startswith" => Meth::StartsWith,
            "endswith" => Meth::EndsWith,
            "replace" => Meth::Replace,
            "find" => Meth::Find,
            "split" => Meth::Split,
            "join" => Meth::Join,
            "lum" => Meth::Lum,
            "week" => Meth::Week,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Meth::Lower => "lower",
            Meth::Upper => "upper",
            Meth::Strip => "strip",
            Meth::LStrip => "lstrip",
            Meth::RStrip => "rstrip",
            Meth::StartsWith => "startswith",
            Meth::EndsWith => "endswith",
            Meth::Replace => "replace",
            Meth::Find => "find",
            Meth::Split => "split",
            Meth::Join => "join",
            Meth::Lum => "lum",
            Meth::Week => "week",
        }
    }

    /// Methods whose argument is a collection rather than a scalar.
    pub fn takes_collection(self) -> bool {
        matches!(self, Meth::Join)
    }

    fn receiver(self, recv: &Type) -> bool {
        match self {
            Meth::Lum => matches!(recv, Type::Color | Type::Null),
            Meth::Week => matches!(recv, Type::Date | Type::DateTime | Type::Null),
            _ => stringy(recv),
        }
    }

    /// Checks receiver and argument types and returns the result type.
    pub fn check(self, recv: &Type, args: &[Type]) -> Result<Type> {
        if !self.receiver(recv) {
            return Err(Error::type_mismatch(format!(
                "{recv} has no method `{}`",
                self.name()
            )));
        }

        let ty = match (self, args) {
            (Meth::Lower | Meth::Upper | Meth::Strip | Meth::LStrip | Meth::RStrip, []) => {
                Type::String
            }
            (Meth::StartsWith | Meth::EndsWith, [arg]) if stringy(arg) => Type::Bool,
            (Meth::Replace, [old, new]) if stringy(old) && stringy(new) => Type::String,
            (Meth::Find, [sub, bounds @ ..])
                if stringy(sub) && bounds.len() <= 2 && bounds.iter().all(int_like) =>
            {
                Type::Int
            }
            (Meth::Split, [sep]) if stringy(sep) => Type::list(Type::String),
            (Meth::Join, [Type::List(item) | Type::Set(item)]) if stringy(item) => Type::String,
            (Meth::Lum, []) => Type::Number,
            (Meth::Week, []) => Type::Int,
            _ => {
                let (owner, expected) = match self {
                    Meth::StartsWith | Meth::EndsWith | Meth::Split => ("str", "one str argument"),
                    Meth::Replace => ("str", "two str arguments"),
                    Meth::Find => ("str", "one str and at most two int arguments"),
                    Meth::Join => ("str", "one collection of str argument"),
                    Meth::Lum => ("color", "no arguments"),
                    Meth::Week => ("date", "no arguments"),
                    _ => ("str", "no arguments"),
                };
                return Err(Error::arity(format!("{owner}.{}", self.name()), expected, args.len()));
            }
        };
        Ok(ty)
    }
}

/// Attributes of scalar values: `d.year`, `g.lat`, `c.r`, `td.days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,

    /// Day of the week, Monday is 0
    Weekday,

    /// Day of the year, starting at 1
    Yearday,
    Lat,
    Long,

    /// Color channels in `[0, 255]`
    R,
    G,
    B,
    A,

    /// Whole days of a time delta, rounded down
    Days,

    /// Seconds left after the whole days, in `[0, 86400)`
    Seconds,
    TotalDays,
    TotalHours,
    TotalMinutes,
    TotalSeconds,
}

impl Attribute {
    pub fn from_name(name: &str) -> Option<Attribute> {
        Some(match name {
            "year" => Attribute::Year,
            "month" => Attribute::Month,
            "day" => Attribute::Day,
            "hour" => Attribute::Hour,
            "minute" => Attribute::Minute,
            "second" => Attribute::Second,
            "weekday" => Attribute::Weekday,
            "yearday" => Attribute::Yearday,
            "lat" => Attribute::Lat,
            "long" => Attribute::Long,
            "r" => Attribute::R,
            "g" => Attribute::G,
            "b" => Attribute::B,
            "a" => Attribute::A,
            "days" => Attribute::Days,
            "seconds" => Attribute::Seconds,
            "total_days" => Attribute::TotalDays,
            "total_hours" => Attribute::TotalHours,
            "total_minutes" => Attribute::TotalMinutes,
            "total_seconds" => Attribute::TotalSeconds,
            _ => return None,
        })
    }

    /// Bit offset of a color channel in the packed `0xRRGGBBAA` value.
    pub fn channel_shift(self) -> Option<u32> {
        Some(match self {
            Attribute::R => 24,
            Attribute::G => 16,
            Attribute::B => 8,
            Attribute::A => 0,
            _ => return None,
        })
    }

    /// Seconds per unit of the `total_*` attributes.
    pub fn total_unit(self) -> Option<i64> {
        Some(match self {
            Attribute::TotalDays => 86400,
            Attribute::TotalHours => 3600,
            Attribute::TotalMinutes => 60,
            Attribute::TotalSeconds => 1,
            _ => return None,
        })
    }

    /// Checks the attribute exists on `base` and returns its type.
    pub fn check(name: &str, base: &Type) -> Result<Type> {
        use Attribute::*;

        let attr = Attribute::from_name(name);
        let ty = match (attr, base) {
            (Some(Year | Month | Day | Weekday | Yearday), Type::Date | Type::DateTime) => Type::Int,
            (Some(Hour | Minute | Second), Type::DateTime) => Type::Int,
            (Some(Lat | Long), Type::Geo) => Type::Number,
            (Some(R | G | B | A), Type::Color) => Type::Int,
            (Some(Days | Seconds), Type::TimeDelta) => Type::Int,
            (Some(TotalDays | TotalHours | TotalMinutes | TotalSeconds), Type::TimeDelta) => {
                Type::Number
            }
            _ => return Err(Error::unknown_field(name, base.to_string())),
        };
        Ok(ty)
    }
}

fn int_like(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Null)
}

fn numeric(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::Number | Type::Null)
}

fn stringy(ty: &Type) -> bool {
    matches!(ty, Type::String | Type::Null)
}

/// Types `str` and `repr` render the same way on every target.
fn printable(ty: &Type) -> bool {
    matches!(
        ty,
        Type::Null | Type::Bool | Type::Int | Type::Number | Type::String | Type::Date | Type::DateTime
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_of_string_and_collections() {
        assert_eq!(Func::Len.check(&[Type::String]).unwrap(), Type::Int);
        assert_eq!(Func::Len.check(&[Type::list(Type::Int)]).unwrap(), Type::Int);
        assert!(Func::Len.check(&[Type::Int]).unwrap_err().is_arity());
    }

    #[test]
    fn arity_message() {
        let err = Func::Len.check(&[Type::String, Type::String]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`len` expects one str or collection argument, got 2 arguments"
        );
    }

    #[test]
    fn date_overloads() {
        assert_eq!(Func::Date.check(&[Type::DateTime]).unwrap(), Type::Date);
        assert_eq!(
            Func::Date.check(&[Type::Int, Type::Int, Type::Int]).unwrap(),
            Type::Date
        );
        assert!(Func::Date.check(&[Type::Date]).is_err());
    }

    #[test]
    fn delta_constructors() {
        assert_eq!(Func::TimeDelta.check(&[]).unwrap(), Type::TimeDelta);
        assert_eq!(Func::TimeDelta.check(&[Type::Int, Type::Int]).unwrap(), Type::TimeDelta);
        assert!(Func::TimeDelta.check(&[Type::Int, Type::Int, Type::Int]).unwrap_err().is_arity());
        assert_eq!(Func::Hours.check(&[Type::Int]).unwrap(), Type::TimeDelta);
        assert_eq!(Func::Years.check(&[Type::Int]).unwrap(), Type::MonthDelta);
        assert!(Func::Days.check(&[Type::Number]).is_err());
        assert_eq!(Func::Weeks.seconds_per_unit(), Some(604800));
    }

    #[test]
    fn conversions() {
        assert_eq!(Func::Bool.check(&[]).unwrap(), Type::Bool);
        assert_eq!(Func::Bool.check(&[Type::Geo]).unwrap(), Type::Bool);
        assert_eq!(Func::Repr.check(&[Type::Date]).unwrap(), Type::String);
        assert!(Func::Repr.check(&[Type::Color]).is_err());
        assert!(Func::Str.check(&[Type::TimeDelta]).is_err());
        assert_eq!(
            Func::Set.check(&[Type::list(Type::Int)]).unwrap(),
            Type::set(Type::Int)
        );
        assert_eq!(
            Func::Rgb.check(&[Type::Number, Type::Int, Type::Int]).unwrap(),
            Type::Color
        );
    }

    #[test]
    fn method_receivers() {
        assert_eq!(
            Meth::StartsWith.check(&Type::String, &[Type::String]).unwrap(),
            Type::Bool
        );
        assert!(Meth::Lower.check(&Type::Int, &[]).unwrap_err().is_type_mismatch());
        assert!(Meth::Replace.check(&Type::String, &[Type::String]).unwrap_err().is_arity());
        assert_eq!(Meth::Lum.check(&Type::Color, &[]).unwrap(), Type::Number);
        assert!(Meth::Lum.check(&Type::String, &[]).unwrap_err().is_type_mismatch());
        assert_eq!(Meth::Week.check(&Type::DateTime, &[]).unwrap(), Type::Int);
        assert_eq!(
            Meth::Find
                .check(&Type::String, &[Type::String, Type::Int, Type::Null])
                .unwrap(),
            Type::Int
        );
        assert_eq!(
            Meth::Split.check(&Type::String, &[Type::String]).unwrap(),
            Type::list(Type::String)
        );
        assert_eq!(
            Meth::Join.check(&Type::String, &[Type::set(Type::String)]).unwrap(),
            Type::String
        );
        assert!(Meth::Join.check(&Type::String, &[Type::list(Type::Int)]).is_err());
    }

    #[test]
    fn attributes() {
        assert_eq!(Attribute::check("year", &Type::Date).unwrap(), Type::Int);
        assert_eq!(Attribute::check("weekday", &Type::DateTime).unwrap(), Type::Int);
        assert_eq!(Attribute::check("lat", &Type::Geo).unwrap(), Type::Number);
        assert_eq!(Attribute::check("a", &Type::Color).unwrap(), Type::Int);
        assert_eq!(Attribute::check("seconds", &Type::TimeDelta).unwrap(), Type::Int);
        assert_eq!(
            Attribute::check("total_hours", &Type::TimeDelta).unwrap(),
            Type::Number
        );
        let err = Attribute::check("hour", &Type::Date).unwrap_err();
        assert_eq!(err.to_string(), "`date` has no field `hour`");
        assert!(Attribute::check("second", &Type::TimeDelta).is_err());
    }
}
