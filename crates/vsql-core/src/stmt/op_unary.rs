use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation: `not x`
    Not,

    /// Arithmetic negation: `-x`
    Neg,

    /// Bitwise inversion: `~x`
    BitNot,
}

impl UnaryOp {
    pub fn is_not(self) -> bool {
        matches!(self, Self::Not)
    }

    pub fn is_neg(self) -> bool {
        matches!(self, Self::Neg)
    }

    pub fn is_bit_not(self) -> bool {
        matches!(self, Self::BitNot)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => "not".fmt(f),
            UnaryOp::Neg => "-".fmt(f),
            UnaryOp::BitNot => "~".fmt(f),
        }
    }
}

impl fmt::Debug for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
