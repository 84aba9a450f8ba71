use super::Expr;

/// Lazy pre-order traversal of an expression tree.
///
/// Returned by [`Expr::walk_nodes`]. A clone continues independently from the
/// same position. Call `walk_nodes` again to start over.
#[derive(Debug, Clone)]
pub struct WalkNodes<'a> {
    stack: Vec<&'a Expr>,
}

impl Expr {
    /// Iterates over the tree rooted at `self` in pre-order, children left to
    /// right in source order.
    pub fn walk_nodes(&self) -> WalkNodes<'_> {
        WalkNodes { stack: vec![self] }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Expr> {
        let mut children = vec![];

        match self {
            Expr::Value(_) | Expr::Name(_) | Expr::Field(_) | Expr::Var(_) => {}
            Expr::Attr(e) => children.push(&*e.base),
            Expr::UnaryOp(e) => children.push(&*e.expr),
            Expr::BinaryOp(e) => children.extend([&*e.lhs, &*e.rhs]),
            Expr::Compare(e) => children.extend([&*e.lhs, &*e.rhs]),
            Expr::BoolOp(e) => children.extend(&e.operands),
            Expr::Item(e) => children.extend([&*e.expr, &*e.index]),
            Expr::Slice(e) => {
                children.push(&*e.expr);
                children.extend(e.start.as_deref());
                children.extend(e.stop.as_deref());
            }
            Expr::List(e) | Expr::Set(e) => children.extend(&e.items),
            Expr::Call(e) => children.extend(&e.args),
            Expr::Meth(e) => {
                children.push(&*e.recv);
                children.extend(&e.args);
            }
            Expr::If(e) => children.extend([&*e.then, &*e.cond, &*e.otherwise]),
        }

        children
    }
}

impl<'a> Iterator for WalkNodes<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<&'a Expr> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_order() {
        let expr = Expr::and(
            Expr::eq(Expr::name("a"), 1),
            Expr::call("len", vec![Expr::name("b")]),
        );

        let names: Vec<_> = expr
            .walk_nodes()
            .map(|node| match node {
                Expr::BoolOp(_) => "and".to_string(),
                Expr::Compare(_) => "==".to_string(),
                Expr::Call(call) => call.name.clone(),
                Expr::Name(name) => name.clone(),
                Expr::Value(_) => "value".to_string(),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();

        assert_eq!(names, ["and", "==", "a", "value", "len", "b"]);
    }

    #[test]
    fn restartable_and_clonable() {
        let expr = Expr::slice(Expr::name("s"), Some(1.into()), None);

        let mut walk = expr.walk_nodes();
        walk.next();
        let rest = walk.clone();

        assert_eq!(walk.count(), 2);
        assert_eq!(rest.count(), 2);
        assert_eq!(expr.walk_nodes().count(), 3);
    }
}
