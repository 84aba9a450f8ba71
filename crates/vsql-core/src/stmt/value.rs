use super::{Color, Type};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;

/// A constant value: a literal in an expression, the value of a variable or a
/// bind parameter produced by a generator.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    Int(i64),

    /// Decimal number
    Number(Decimal),

    /// String value
    String(String),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time of day
    DateTime(NaiveDateTime),

    /// RGBA color
    Color(Color),

    /// Duration, truncated to whole seconds by the generators
    TimeDelta(TimeDelta),

    /// Number of months
    MonthDelta(i64),

    /// Ordered list of values of the same type
    List(Vec<Value>),

    /// Set of values of the same type. Duplicates are kept as given.
    Set(Vec<Value>),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    pub fn set_from_vec(items: Vec<Self>) -> Self {
        Self::Set(items)
    }

    /// The items of a list or set value.
    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) | Self::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Infers the type of the value.
    ///
    /// Fails when the items of a collection have no common type, or when a
    /// collection contains another collection.
    pub fn ty(&self) -> Result<Type> {
        Ok(match self {
            Self::Null => Type::Null,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::Number(_) => Type::Number,
            Self::String(_) => Type::String,
            Self::Date(_) => Type::Date,
            Self::DateTime(_) => Type::DateTime,
            Self::Color(_) => Type::Color,
            Self::TimeDelta(_) => Type::TimeDelta,
            Self::MonthDelta(_) => Type::MonthDelta,
            Self::List(items) => Type::list(Self::item_ty(items)?),
            Self::Set(items) => Type::set(Self::item_ty(items)?),
        })
    }

    fn item_ty(items: &[Value]) -> Result<Type> {
        let mut ty = Type::Null;

        for item in items {
            let item_ty = item.ty()?;
            if item_ty.is_collection() {
                return Err(Error::type_mismatch(format!(
                    "collections cannot contain {item_ty}"
                )));
            }
            ty = ty.unify(&item_ty)?;
        }

        Ok(ty)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Color> for Value {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Self::TimeDelta(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_type_widens_items() {
        let value = Value::List(vec![Value::Int(1), Value::Null, Value::Number(Decimal::new(15, 1))]);
        assert_eq!(value.ty().unwrap(), Type::list(Type::Number));
    }

    #[test]
    fn empty_list_has_null_items() {
        assert_eq!(Value::List(vec![]).ty().unwrap(), Type::list(Type::Null));
    }

    #[test]
    fn heterogeneous_set_is_rejected() {
        let value = Value::Set(vec![Value::from("a"), Value::Int(1)]);
        assert!(value.ty().unwrap_err().is_type_mismatch());
    }

    #[test]
    fn delta_types() {
        assert_eq!(Value::from(TimeDelta::days(1)).ty().unwrap(), Type::TimeDelta);
        assert_eq!(Value::MonthDelta(3).ty().unwrap(), Type::MonthDelta);
        assert_eq!(Value::from(Color::rgb(1, 2, 3)).ty().unwrap(), Type::Color);
    }

    #[test]
    fn nested_collection_is_rejected() {
        let value = Value::List(vec![Value::List(vec![])]);
        assert!(value.ty().is_err());
    }
}
