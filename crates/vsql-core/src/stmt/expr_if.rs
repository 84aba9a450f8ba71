use super::Expr;

/// `then if cond else otherwise`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprIf {
    pub then: Box<Expr>,
    pub cond: Box<Expr>,
    pub otherwise: Box<Expr>,
}

impl Expr {
    pub fn if_else(
        then: impl Into<Self>,
        cond: impl Into<Self>,
        otherwise: impl Into<Self>,
    ) -> Self {
        ExprIf {
            then: Box::new(then.into()),
            cond: Box::new(cond.into()),
            otherwise: Box::new(otherwise.into()),
        }
        .into()
    }
}

impl From<ExprIf> for Expr {
    fn from(value: ExprIf) -> Self {
        Self::If(value)
    }
}
