use super::Expr;

/// Attribute access: `base.name`.
///
/// Before resolution this is how dotted paths are represented. After
/// resolution only attributes of scalar values remain (`d.year`, `g.lat`):
/// field and namespace paths are replaced by [`super::ExprField`] and
/// [`super::ExprVar`] nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAttr {
    pub base: Box<Expr>,
    pub name: String,
}

impl Expr {
    pub fn attr(base: impl Into<Self>, name: impl Into<String>) -> Self {
        ExprAttr {
            base: Box::new(base.into()),
            name: name.into(),
        }
        .into()
    }
}

impl From<ExprAttr> for Expr {
    fn from(value: ExprAttr) -> Self {
        Self::Attr(value)
    }
}
