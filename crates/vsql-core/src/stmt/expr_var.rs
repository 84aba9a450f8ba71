use super::Expr;
use crate::schema::Variable;

/// A resolved reference to a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprVar {
    /// The dotted path as written, including a namespace prefix if any.
    pub path: Vec<String>,

    /// The variable bound at resolution time.
    pub var: Variable,
}

impl From<ExprVar> for Expr {
    fn from(value: ExprVar) -> Self {
        Self::Var(value)
    }
}
