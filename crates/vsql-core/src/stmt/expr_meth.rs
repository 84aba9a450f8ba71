use super::Expr;

/// A method call on a value: `name.lower()`, `s.startswith('A')`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprMeth {
    pub recv: Box<Expr>,
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn meth(recv: impl Into<Self>, name: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprMeth {
            recv: Box::new(recv.into()),
            name: name.into(),
            args,
        }
        .into()
    }
}

impl From<ExprMeth> for Expr {
    fn from(value: ExprMeth) -> Self {
        Self::Meth(value)
    }
}
