use super::Expr;

/// A call of a built-in function by name: `len(x)`, `today()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprCall {
            name: name.into(),
            args,
        }
        .into()
    }
}

impl From<ExprCall> for Expr {
    fn from(value: ExprCall) -> Self {
        Self::Call(value)
    }
}
