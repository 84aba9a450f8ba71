use super::{BoolOp, Expr};

/// `a and b and ...` / `a or b or ...`
///
/// Nested operations with the same operator are flattened on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBoolOp {
    pub op: BoolOp,
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn bool_op(op: BoolOp, operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = vec![];

        for operand in operands {
            match operand {
                Expr::BoolOp(inner) if inner.op == op => flat.extend(inner.operands),
                operand => flat.push(operand),
            }
        }

        ExprBoolOp { op, operands: flat }.into()
    }

    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::bool_op(BoolOp::And, [lhs.into(), rhs.into()])
    }

    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::bool_op(BoolOp::Or, [lhs.into(), rhs.into()])
    }
}

impl From<ExprBoolOp> for Expr {
    fn from(value: ExprBoolOp) -> Self {
        Self::BoolOp(value)
    }
}
