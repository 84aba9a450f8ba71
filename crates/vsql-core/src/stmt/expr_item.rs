use super::Expr;

/// `expr[index]`: a single character of a string or an item of a list.
///
/// Negative indexes count from the end. An index out of range yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprItem {
    pub expr: Box<Expr>,
    pub index: Box<Expr>,
}

impl Expr {
    pub fn item(expr: impl Into<Self>, index: impl Into<Self>) -> Self {
        ExprItem {
            expr: Box::new(expr.into()),
            index: Box::new(index.into()),
        }
        .into()
    }
}

impl From<ExprItem> for Expr {
    fn from(value: ExprItem) -> Self {
        Self::Item(value)
    }
}
