use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn is_and(self) -> bool {
        matches!(self, Self::And)
    }

    pub fn is_or(self) -> bool {
        matches!(self, Self::Or)
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolOp::And => "and".fmt(f),
            BoolOp::Or => "or".fmt(f),
        }
    }
}

impl fmt::Debug for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
