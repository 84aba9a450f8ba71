use crate::{schema::TableId, Error, Result};
use std::fmt;

/// The static type of a vSQL expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// The type of the `None` literal. Unifies with every other type.
    Null,

    /// Boolean value
    Bool,

    /// Signed 64-bit integer
    Int,

    /// Arbitrary precision decimal number
    Number,

    /// String value
    String,

    /// Calendar date without a time of day
    Date,

    /// Date and time of day, without a timezone
    DateTime,

    /// Geographical position (latitude and longitude)
    Geo,

    /// RGBA color
    Color,

    /// Duration in whole seconds
    TimeDelta,

    /// Duration in months, added to dates with the day clamped to the end of
    /// the target month
    MonthDelta,

    /// Reference to a record of the given table
    Ref(TableId),

    /// A list of a single element type
    List(Box<Type>),

    /// A set of a single element type
    Set(Box<Type>),
}

impl Type {
    pub fn list(ty: impl Into<Self>) -> Self {
        Self::List(Box::new(ty.into()))
    }

    pub fn set(ty: impl Into<Self>) -> Self {
        Self::Set(Box::new(ty.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Number)
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, Self::Ref(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Set(_))
    }

    /// Returns the element type of a list or set.
    pub fn element(&self) -> Option<&Type> {
        match self {
            Self::List(item) | Self::Set(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::DateTime | Self::TimeDelta | Self::MonthDelta
        )
    }

    /// Types that support `<`, `<=`, `>` and `>=`.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Int
                | Self::Number
                | Self::String
                | Self::Date
                | Self::DateTime
                | Self::TimeDelta
                | Self::MonthDelta
        )
    }

    /// Types a query can be sorted by: the orderable types and `bool`.
    pub fn is_sortable(&self) -> bool {
        self.is_orderable() || self.is_bool()
    }

    /// Returns true if `self` accepts a value of type `other`, i.e. the two
    /// types unify to `self`.
    pub fn accepts(&self, other: &Type) -> bool {
        matches!(self.unify(other), Ok(ty) if ty == *self)
    }

    /// Computes the common type of two operands.
    ///
    /// `None` unifies with anything, `int` widens to `number` and collections
    /// unify element-wise. `date` and `datetime` never unify.
    pub fn unify(&self, other: &Type) -> Result<Type> {
        use Type::*;

        Ok(match (self, other) {
            (Null, ty) | (ty, Null) => ty.clone(),
            (Int, Number) | (Number, Int) => Number,
            (List(lhs), List(rhs)) => Type::list(lhs.unify(rhs)?),
            (Set(lhs), Set(rhs)) => Type::set(lhs.unify(rhs)?),
            (lhs, rhs) if lhs == rhs => lhs.clone(),
            (lhs, rhs) => {
                return Err(Error::type_mismatch(format!(
                    "{lhs} and {rhs} have no common type"
                )))
            }
        })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Null => f.write_str("none"),
            Type::Bool => f.write_str("bool"),
            Type::Int => f.write_str("int"),
            Type::Number => f.write_str("number"),
            Type::String => f.write_str("str"),
            Type::Date => f.write_str("date"),
            Type::DateTime => f.write_str("datetime"),
            Type::Geo => f.write_str("geo"),
            Type::Color => f.write_str("color"),
            Type::TimeDelta => f.write_str("timedelta"),
            Type::MonthDelta => f.write_str("monthdelta"),
            Type::Ref(id) => write!(f, "ref<{}>", id.0),
            Type::List(item) => write!(f, "list<{item}>"),
            Type::Set(item) => write!(f, "set<{item}>"),
        }
    }
}
