use std::fmt;

/// Comparison and containment operators.
///
/// `==` and `!=` are null-safe: `None == None` is true. `is` and `is not`
/// behave the same way and exist for readability of `x is None`.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CompareOp {
    /// `==` and `is`
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Is)
    }

    /// `!=` and `is not`
    pub fn is_inequality(self) -> bool {
        matches!(self, Self::Ne | Self::IsNot)
    }

    /// `<`, `<=`, `>` and `>=`
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    /// `in` and `not in`
    pub fn is_containment(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// Returns true for operators that negate their positive form.
    pub fn is_negated(self) -> bool {
        matches!(self, Self::Ne | Self::IsNot | Self::NotIn)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompareOp::*;

        match self {
            Eq => "==".fmt(f),
            Ne => "!=".fmt(f),
            Lt => "<".fmt(f),
            Le => "<=".fmt(f),
            Gt => ">".fmt(f),
            Ge => ">=".fmt(f),
            Is => "is".fmt(f),
            IsNot => "is not".fmt(f),
            In => "in".fmt(f),
            NotIn => "not in".fmt(f),
        }
    }
}

impl fmt::Debug for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
