use super::{CompareOp, Expr};

/// A comparison between two expressions.
///
/// For `in` and `not in` the right-hand side is a list, a set or a string.
/// Against a string, `in` tests substring containment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCompare {
    pub lhs: Box<Expr>,
    pub op: CompareOp,
    pub rhs: Box<Expr>,
}

impl Expr {
    pub fn compare(lhs: impl Into<Self>, op: CompareOp, rhs: impl Into<Self>) -> Self {
        ExprCompare {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        }
        .into()
    }

    pub fn eq(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Eq, rhs)
    }

    /// Returns true if the expression is a comparison with the `==` operator
    pub fn is_eq(&self) -> bool {
        matches!(
            self,
            Self::Compare(ExprCompare {
                op: CompareOp::Eq,
                ..
            })
        )
    }

    pub fn ne(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Ne, rhs)
    }

    pub fn lt(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Lt, rhs)
    }

    pub fn le(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Le, rhs)
    }

    pub fn gt(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Gt, rhs)
    }

    pub fn ge(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Ge, rhs)
    }

    pub fn is(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::Is, rhs)
    }

    pub fn is_not(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::compare(lhs, CompareOp::IsNot, rhs)
    }

    /// `item in collection`
    pub fn in_list(item: impl Into<Self>, collection: impl Into<Self>) -> Self {
        Expr::compare(item, CompareOp::In, collection)
    }

    /// `item not in collection`
    pub fn not_in_list(item: impl Into<Self>, collection: impl Into<Self>) -> Self {
        Expr::compare(item, CompareOp::NotIn, collection)
    }
}

impl From<ExprCompare> for Expr {
    fn from(value: ExprCompare) -> Self {
        Self::Compare(value)
    }
}
