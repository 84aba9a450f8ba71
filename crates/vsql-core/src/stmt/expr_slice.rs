use super::Expr;

/// `expr[start:stop]` on strings, with Python semantics: bounds are
/// zero-based, negative bounds count from the end and out of range bounds
/// are clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSlice {
    pub expr: Box<Expr>,
    pub start: Option<Box<Expr>>,
    pub stop: Option<Box<Expr>>,
}

impl Expr {
    pub fn slice(expr: impl Into<Self>, start: Option<Expr>, stop: Option<Expr>) -> Self {
        ExprSlice {
            expr: Box::new(expr.into()),
            start: start.map(Box::new),
            stop: stop.map(Box::new),
        }
        .into()
    }
}

impl From<ExprSlice> for Expr {
    fn from(value: ExprSlice) -> Self {
        Self::Slice(value)
    }
}
