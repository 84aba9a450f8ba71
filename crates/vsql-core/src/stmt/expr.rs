use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// A vSQL expression tree.
///
/// Trees are built unresolved, with [`Expr::Name`] and [`ExprAttr`] nodes
/// referring to identifiers by name. Resolution replaces them with
/// [`ExprField`] and [`ExprVar`] nodes bound to the schema and the query's
/// join registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant value
    Value(Value),

    /// Unresolved identifier
    Name(String),

    /// Attribute access: `base.name`
    Attr(ExprAttr),

    /// Resolved reference to a field of the root record or a joined record
    Field(ExprField),

    /// Resolved reference to a variable
    Var(ExprVar),

    /// `not x`, `-x` and `~x`
    UnaryOp(ExprUnaryOp),

    /// Arithmetic and bitwise operations
    BinaryOp(ExprBinaryOp),

    /// Comparison and containment
    Compare(ExprCompare),

    /// `and` / `or` over two or more operands
    BoolOp(ExprBoolOp),

    /// `x[i]`
    Item(ExprItem),

    /// `x[start:stop]`
    Slice(ExprSlice),

    /// List literal: `[a, b]`
    List(ExprList),

    /// Set literal: `{a, b}`
    Set(ExprList),

    /// Built-in function call: `len(x)`
    Call(ExprCall),

    /// Method call: `x.lower()`
    Meth(ExprMeth),

    /// Conditional: `a if cond else b`
    If(ExprIf),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// An unresolved identifier.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Builds a dotted reference: `Expr::path("parent.name")` is the name
    /// `parent` followed by the attribute `name`.
    pub fn path(path: &str) -> Self {
        let mut segments = path.split('.');
        let mut expr = Self::name(segments.next().unwrap_or_default());

        for segment in segments {
            expr = Self::attr(expr, segment);
        }

        expr
    }

    /// Returns true if the tree still holds unresolved identifiers.
    pub fn is_unresolved(&self) -> bool {
        self.walk_nodes().any(|node| matches!(node, Self::Name(_)))
    }

    /// Returns the `ExprField` nodes of the tree, in pre-order.
    pub fn fields(&self) -> impl Iterator<Item = &ExprField> + '_ {
        self.walk_nodes().filter_map(|node| match node {
            Self::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Returns the `ExprVar` nodes of the tree, in pre-order.
    pub fn vars(&self) -> impl Iterator<Item = &ExprVar> + '_ {
        self.walk_nodes().filter_map(|node| match node {
            Self::Var(var) => Some(var),
            _ => None,
        })
    }

    /// Returns true if the expression is rendered as a predicate rather than
    /// a value by generators.
    pub fn is_predicate(&self) -> bool {
        match self {
            Self::Compare(_) | Self::BoolOp(_) => true,
            Self::UnaryOp(e) => e.op.is_not(),
            Self::Meth(e) => matches!(
                Meth::from_name(&e.name),
                Some(Meth::StartsWith | Meth::EndsWith)
            ),
            Self::Call(e) => Func::from_name(&e.name) == Some(Func::Bool),
            _ => false,
        }
    }

    /// Returns true for collections whose items are known when the query is
    /// generated: literals, value variables and `list()`/`set()` over those.
    pub fn is_static_collection(&self) -> bool {
        match self {
            Self::List(_) | Self::Set(_) => true,
            Self::Value(value) => value.items().is_some(),
            Self::Var(e) => e.var.as_value().is_some_and(|value| value.items().is_some()),
            Self::Call(e) => {
                matches!(Func::from_name(&e.name), Some(Func::List | Func::Set))
                    && matches!(e.args.as_slice(), [arg] if arg.is_static_collection())
            }
            _ => false,
        }
    }

    /// Returns the source text of the expression in normalized vSQL syntax.
    pub fn source(&self) -> String {
        self.to_string()
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::null()
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<Decimal> for Expr {
    fn from(value: Decimal) -> Self {
        Self::Value(value.into())
    }
}

/// String literal. Use [`Expr::name`] for identifiers.
impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<NaiveDate> for Expr {
    fn from(value: NaiveDate) -> Self {
        Self::Value(value.into())
    }
}

impl From<NaiveDateTime> for Expr {
    fn from(value: NaiveDateTime) -> Self {
        Self::Value(value.into())
    }
}

impl From<Color> for Expr {
    fn from(value: Color) -> Self {
        Self::Value(value.into())
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}
