use chrono::NaiveDate;
use vsql_core::stmt::{Expr, Value};

#[test]
fn source_of_unresolved_tree() {
    let expr = Expr::and(
        Expr::eq(Expr::path("parent.name"), "Europe"),
        Expr::ge(
            Expr::path("founded.year"),
            Expr::sub(Expr::attr(Expr::call("today", vec![]), "year"), 100),
        ),
    );

    assert_eq!(
        expr.source(),
        "parent.name == 'Europe' and founded.year >= today().year - 100"
    );
}

#[test]
fn source_of_calls_and_methods() {
    let expr = Expr::meth(
        Expr::call("str", vec![Expr::name("id")]),
        "replace",
        vec!["1".into(), "one".into()],
    );
    assert_eq!(expr.source(), "str(id).replace('1', 'one')");
}

#[test]
fn source_of_value_collections() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let expr = Expr::in_list(
        Expr::name("day"),
        Value::List(vec![date.into(), Value::Null]),
    );
    assert_eq!(expr.source(), "day in [@(2024-01-31), None]");
}

#[test]
fn negation_binds_tighter_than_arithmetic() {
    let expr = Expr::mul(Expr::neg(Expr::name("a")), Expr::neg(Expr::add(1, 2)));
    assert_eq!(expr.source(), "-a * -(1 + 2)");
}

#[test]
fn comparisons_do_not_chain() {
    let expr = Expr::eq(Expr::lt(Expr::name("a"), 1), true);
    assert_eq!(expr.source(), "(a < 1) == True");
}

#[test]
fn walk_visits_every_node_once() {
    let expr = Expr::if_else(
        Expr::slice(Expr::name("s"), Some(1.into()), Some(Expr::neg(1))),
        Expr::not(Expr::name("flag")),
        Expr::set(["x"]),
    );

    assert_eq!(expr.walk_nodes().count(), 10);
    let names: Vec<_> = expr
        .walk_nodes()
        .filter_map(|node| match node {
            Expr::Name(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, ["s", "flag"]);
}
