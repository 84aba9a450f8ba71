use super::Expr;

/// Items of a list or set literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprList {
    pub items: Vec<Expr>,
}

impl Expr {
    pub fn list<T>(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<Self>,
    {
        Self::List(ExprList {
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub fn set<T>(items: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<Self>,
    {
        Self::Set(ExprList {
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    /// The items of a list or set literal.
    pub fn items(&self) -> Option<&[Expr]> {
        match self {
            Self::List(list) | Self::Set(list) => Some(&list.items),
            _ => None,
        }
    }
}
