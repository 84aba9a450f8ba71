use super::{Expr, UnaryOp};

#[derive(Debug, Clone, PartialEq)]
pub struct ExprUnaryOp {
    pub op: UnaryOp,
    pub expr: Box<Expr>,
}

impl Expr {
    pub fn not(expr: impl Into<Self>) -> Self {
        ExprUnaryOp {
            op: UnaryOp::Not,
            expr: Box::new(expr.into()),
        }
        .into()
    }

    pub fn neg(expr: impl Into<Self>) -> Self {
        ExprUnaryOp {
            op: UnaryOp::Neg,
            expr: Box::new(expr.into()),
        }
        .into()
    }

    pub fn bit_not(expr: impl Into<Self>) -> Self {
        ExprUnaryOp {
            op: UnaryOp::BitNot,
            expr: Box::new(expr.into()),
        }
        .into()
    }
}

impl From<ExprUnaryOp> for Expr {
    fn from(value: ExprUnaryOp) -> Self {
        Self::UnaryOp(value)
    }
}
