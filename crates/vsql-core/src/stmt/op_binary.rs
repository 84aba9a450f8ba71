use std::fmt;

/// Arithmetic and bitwise operators.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition, or concatenation of strings
    Add,
    Sub,
    Mul,

    /// True division. Always yields a `number`.
    Div,

    /// Division rounded towards negative infinity: `//`
    FloorDiv,

    /// Remainder with the sign of the divisor
    Mod,

    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

impl BinaryOp {
    pub fn is_add(self) -> bool {
        matches!(self, Self::Add)
    }

    pub fn is_sub(self) -> bool {
        matches!(self, Self::Sub)
    }

    pub fn is_div(self) -> bool {
        matches!(self, Self::Div)
    }

    /// Operators that only apply to integers.
    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            Self::BitAnd | Self::BitOr | Self::BitXor | Self::ShiftLeft | Self::ShiftRight
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;

        match self {
            Add => "+".fmt(f),
            Sub => "-".fmt(f),
            Mul => "*".fmt(f),
            Div => "/".fmt(f),
            FloorDiv => "//".fmt(f),
            Mod => "%".fmt(f),
            BitAnd => "&".fmt(f),
            BitOr => "|".fmt(f),
            BitXor => "^".fmt(f),
            ShiftLeft => "<<".fmt(f),
            ShiftRight => ">>".fmt(f),
        }
    }
}

impl fmt::Debug for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
