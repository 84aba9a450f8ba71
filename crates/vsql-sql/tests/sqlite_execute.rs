//! Runs the SQLite rendering of queries against an in-memory database.

use rusqlite::{types::Value as SqlValue, Connection};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use vsql_core::{
    schema::Schema,
    stmt::{Expr, Frozen, Query, Type, Value},
};
use vsql_sql::Serializer;

const LOCATIONS: &str = "
    CREATE TABLE locations (id INTEGER PRIMARY KEY, name TEXT, parent_id INTEGER);
    INSERT INTO locations VALUES
        (1, 'Europe', NULL),
        (2, 'Asia', NULL),
        (3, 'Germany', 1),
        (4, 'France', 1),
        (5, 'Japan', 2),
        (6, 'Berlin', 3),
        (7, 'O''Hara', 1),
        (8, NULL, 1);
";

fn schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .table("locations", "locations")
        .key("id")
        .field("id", Type::Int, "{a}.id")
        .field("name", Type::String, "{a}.name")
        .relation("parent", "{a}.parent_id", "locations", "{d}.id = {m}.parent_id");
    builder.build().unwrap()
}

fn connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(LOCATIONS).unwrap();
    conn
}

fn param(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Int(v) => SqlValue::Integer(*v),
        Value::Number(v) => SqlValue::Real(v.to_f64().unwrap()),
        Value::String(v) => SqlValue::Text(v.clone()),
        value => panic!("SQLite parameters are converted before binding, got {value:?}"),
    }
}

/// Runs the query and returns the first column of every row.
fn rows<T: rusqlite::types::FromSql>(query: &Frozen<'_>) -> Vec<T> {
    let rendered = query.render(&Serializer::sqlite()).unwrap();
    let conn = connection();
    let mut stmt = conn.prepare(&rendered.text).unwrap();
    let params = rendered.params.iter().map(param);

    let rows = stmt
        .query_map(rusqlite::params_from_iter(params), |row| row.get(0))
        .unwrap()
        .collect::<rusqlite::Result<_>>()
        .unwrap();
    rows
}

fn names(schema: &Schema, filter: Expr) -> Vec<Option<String>> {
    let mut query = Query::new(schema, "locations").unwrap();
    query
        .select(Expr::name("name"), None)
        .unwrap()
        .filter(filter)
        .unwrap()
        .sort(Expr::name("id"), true)
        .unwrap();
    rows(&query.freeze())
}

/// Evaluates `expr` against Germany.
fn scalar<T: rusqlite::types::FromSql>(schema: &Schema, expr: Expr) -> T {
    let mut query = Query::new(schema, "locations").unwrap();
    query
        .select(expr, None)
        .unwrap()
        .filter(Expr::eq(Expr::name("id"), 3))
        .unwrap();
    rows(&query.freeze()).remove(0)
}

fn some(names: &[&str]) -> Vec<Option<String>> {
    names.iter().map(|name| Some(name.to_string())).collect()
}

#[test]
fn children_of_europe() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query
        .select(Expr::name("name"), None)
        .unwrap()
        .filter(Expr::eq(Expr::path("parent.name"), "Europe"))
        .unwrap()
        .sort(Expr::name("name"), true)
        .unwrap()
        .limit(10)
        .unwrap()
        .offset(0)
        .unwrap();

    let mut expected = some(&["France", "Germany", "O'Hara"]);
    expected.push(None);
    assert_eq!(rows::<Option<String>>(&query.freeze()), expected);
}

#[test]
fn two_levels_of_relationships() {
    let schema = schema();
    let filter = Expr::eq(Expr::path("parent.parent.name"), "Europe");
    assert_eq!(names(&schema, filter), some(&["Berlin"]));
}

#[test]
fn quotes_in_literals() {
    let schema = schema();

    assert_eq!(
        names(&schema, Expr::eq(Expr::name("name"), "O'Hara")),
        some(&["O'Hara"])
    );
    assert!(names(&schema, Expr::eq(Expr::name("name"), "x' OR 1=1 --")).is_empty());
}

#[test]
fn paging() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query
        .select(Expr::name("name"), None)
        .unwrap()
        .sort(Expr::name("name"), true)
        .unwrap()
        .offset(1)
        .unwrap()
        .limit(2)
        .unwrap();

    assert_eq!(
        rows::<Option<String>>(&query.freeze()),
        some(&["Berlin", "Europe"])
    );
}

#[test]
fn offset_without_limit() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query.select(Expr::name("id"), None).unwrap().offset(6).unwrap();

    assert_eq!(rows::<i64>(&query.freeze()), [7, 8]);
}

#[test]
fn limit_zero() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query.select(Expr::name("id"), None).unwrap().limit(0).unwrap();

    assert!(rows::<i64>(&query.freeze()).is_empty());
}

#[test]
fn null_safe_comparisons() {
    let schema = schema();

    assert_eq!(
        names(&schema, Expr::eq(Expr::name("parent"), Expr::null())),
        some(&["Europe", "Asia"])
    );
    // The unnamed location differs from Europe
    assert_eq!(
        names(&schema, Expr::ne(Expr::name("name"), "Europe")).len(),
        7
    );
}

#[test]
fn containment() {
    let schema = schema();

    let filter = Expr::in_list(
        Expr::name("name"),
        Expr::list([Expr::from("Asia"), Expr::null()]),
    );
    assert_eq!(names(&schema, filter), [Some("Asia".to_string()), None]);

    let filter = Expr::in_list("an", Expr::name("name"));
    assert_eq!(names(&schema, filter), some(&["Germany", "France", "Japan"]));

    let filter = Expr::in_list(Expr::name("name"), Expr::list(Vec::<Expr>::new()));
    assert!(names(&schema, filter).is_empty());
}

#[test]
fn prefix_and_suffix() {
    let schema = schema();

    let filter = Expr::meth(Expr::name("name"), "startswith", vec!["Ge".into()]);
    assert_eq!(names(&schema, filter), some(&["Germany"]));

    let filter = Expr::meth(Expr::name("name"), "endswith", vec!["ce".into()]);
    assert_eq!(names(&schema, filter), some(&["France"]));
}

#[test]
fn slices_follow_python() {
    let schema = schema();
    let filter = Expr::eq(Expr::name("id"), 3);

    let slice = |start: Option<i64>, stop: Option<i64>| {
        let mut query = Query::new(&schema, "locations").unwrap();
        query
            .select(
                Expr::slice(Expr::name("name"), start.map(Expr::from), stop.map(Expr::from)),
                None,
            )
            .unwrap()
            .filter(filter.clone())
            .unwrap();
        rows::<String>(&query.freeze()).remove(0)
    };

    assert_eq!(slice(Some(1), Some(3)), "er");
    assert_eq!(slice(None, Some(-2)), "Germa");
    assert_eq!(slice(Some(-3), None), "any");
    assert_eq!(slice(Some(-20), Some(2)), "Ge");
    assert_eq!(slice(Some(5), Some(2)), "");
}

#[test]
fn division_is_exact() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query
        .select(Expr::div(Expr::name("id"), 2), None)
        .unwrap()
        .filter(Expr::eq(Expr::name("id"), 3))
        .unwrap();

    assert_eq!(rows::<f64>(&query.freeze()), [1.5]);
}

#[test]
fn modulo_and_floor_division_round_down() {
    let schema = schema();
    let number = |tenths| Expr::value(Decimal::new(tenths, 1));

    assert_eq!(scalar::<i64>(&schema, Expr::modulo(-7, 2)), 1);
    assert_eq!(scalar::<i64>(&schema, Expr::modulo(7, -2)), -1);
    assert_eq!(scalar::<i64>(&schema, Expr::modulo(Expr::name("id"), 2)), 1);
    assert_eq!(scalar::<f64>(&schema, Expr::modulo(number(75), 2)), 1.5);
    assert_eq!(scalar::<f64>(&schema, Expr::modulo(number(-75), 2)), 0.5);

    assert_eq!(scalar::<i64>(&schema, Expr::floor_div(-7, 2)), -4);
    assert_eq!(scalar::<i64>(&schema, Expr::floor_div(7, 2)), 3);
    assert_eq!(scalar::<f64>(&schema, Expr::floor_div(number(-75), 2)), -4.0);
}

#[test]
fn numbers_with_a_fraction_match_modulo() {
    let schema = schema();
    let mut query = Query::new(&schema, "locations").unwrap();
    query
        .select(Expr::name("id"), None)
        .unwrap()
        .filter(Expr::eq(
            Expr::modulo(Expr::add(Expr::name("id"), Decimal::new(5, 1)), 2),
            Decimal::new(15, 1),
        ))
        .unwrap()
        .sort(Expr::name("id"), true)
        .unwrap();

    assert_eq!(rows::<i64>(&query.freeze()), [1, 3, 5, 7]);
}

#[test]
fn bitwise_operators() {
    let schema = schema();
    let id = || Expr::name("id");

    assert_eq!(scalar::<i64>(&schema, Expr::bit_and(id(), 1)), 1);
    assert_eq!(scalar::<i64>(&schema, Expr::bit_or(id(), 4)), 7);
    assert_eq!(scalar::<i64>(&schema, Expr::bit_xor(id(), 5)), 6);
    assert_eq!(scalar::<i64>(&schema, Expr::bit_not(id())), -4);
    assert_eq!(scalar::<i64>(&schema, Expr::shl(id(), 2)), 12);
    assert_eq!(scalar::<i64>(&schema, Expr::shr(-8, 1)), -4);
}

#[test]
fn items_of_strings_and_lists() {
    let schema = schema();
    let name = || Expr::name("name");

    assert_eq!(scalar::<Option<String>>(&schema, Expr::item(name(), 0)).as_deref(), Some("G"));
    assert_eq!(scalar::<Option<String>>(&schema, Expr::item(name(), -1)).as_deref(), Some("y"));
    assert_eq!(scalar::<Option<String>>(&schema, Expr::item(name(), 20)), None);
    assert_eq!(scalar::<Option<String>>(&schema, Expr::item(name(), -20)), None);
    assert_eq!(
        scalar::<Option<i64>>(&schema, Expr::item(Expr::list([10, 20, 30]), -1)),
        Some(30)
    );
    assert_eq!(scalar::<Option<i64>>(&schema, Expr::item(Expr::list([10, 20, 30]), 3)), None);
}

#[test]
fn date_arithmetic() {
    let schema = schema();
    let date = |y: i64, m: i64, d: i64| Expr::call("date", vec![y.into(), m.into(), d.into()]);
    let delta = |name: &str, n: i64| Expr::call(name, vec![n.into()]);

    // Month arithmetic clamps to the end of the month
    assert_eq!(
        scalar::<String>(&schema, Expr::add(date(2024, 1, 31), delta("months", 1))),
        "2024-02-29"
    );
    assert_eq!(
        scalar::<String>(&schema, Expr::sub(date(2024, 3, 1), delta("days", 1))),
        "2024-02-29"
    );
    // Part of a day moves a date to the previous day
    assert_eq!(
        scalar::<String>(&schema, Expr::sub(date(2024, 3, 1), delta("hours", 1))),
        "2024-02-29"
    );
    assert_eq!(
        scalar::<String>(
            &schema,
            Expr::add(Expr::call("datetime", vec![date(2024, 3, 1)]), delta("hours", 25))
        ),
        "2024-03-02 01:00:00"
    );
    assert_eq!(
        scalar::<i64>(
            &schema,
            Expr::attr(Expr::sub(date(2024, 3, 1), date(2024, 2, 1)), "days")
        ),
        29
    );
}

#[test]
fn date_parts() {
    let schema = schema();
    let date = || Expr::call("date", vec![2024.into(), 3.into(), 1.into()]);

    assert_eq!(scalar::<i64>(&schema, Expr::attr(date(), "weekday")), 4);
    assert_eq!(scalar::<i64>(&schema, Expr::attr(date(), "yearday")), 61);
    assert_eq!(scalar::<i64>(&schema, Expr::meth(date(), "week", vec![])), 9);
}

#[test]
fn deltas_and_colors() {
    let schema = schema();
    let timedelta = Expr::call("timedelta", vec![(-1).into(), 30.into()]);

    assert_eq!(scalar::<i64>(&schema, Expr::attr(timedelta.clone(), "days")), -1);
    assert_eq!(scalar::<i64>(&schema, Expr::attr(timedelta, "seconds")), 30);
    assert_eq!(
        scalar::<f64>(&schema, Expr::attr(Expr::call("hours", vec![36.into()]), "total_days")),
        1.5
    );

    let color = Expr::call(
        "rgb",
        vec![1.into(), Decimal::new(5, 1).into(), 0.into()],
    );
    assert_eq!(scalar::<i64>(&schema, Expr::attr(color.clone(), "r")), 255);
    assert_eq!(scalar::<i64>(&schema, Expr::attr(color.clone(), "g")), 128);
    assert_eq!(scalar::<i64>(&schema, Expr::attr(color.clone(), "a")), 255);
    assert_eq!(scalar::<f64>(&schema, Expr::meth(color, "lum", vec![])), 0.5);
}

#[test]
fn string_methods() {
    let schema = schema();
    let find = |args: Vec<Expr>| scalar::<i64>(&schema, Expr::meth(Expr::name("name"), "find", args));

    assert_eq!(find(vec!["r".into()]), 2);
    assert_eq!(find(vec!["x".into()]), -1);
    assert_eq!(find(vec!["a".into(), 5.into()]), -1);
    assert_eq!(find(vec!["a".into(), (-4).into()]), 4);

    let joined = Expr::meth(
        "-",
        "join",
        vec![Expr::list([Expr::value("a"), Expr::null(), Expr::name("name")])],
    );
    assert_eq!(scalar::<String>(&schema, joined), "a-Germany");

    let parts = Expr::meth("a,b,c", "split", vec![",".into()]);
    assert_eq!(scalar::<i64>(&schema, Expr::call("len", vec![parts])), 3);

    let parts = Expr::meth("Germany,France", "split", vec![",".into()]);
    assert_eq!(
        names(&schema, Expr::in_list(Expr::name("name"), parts)),
        some(&["Germany", "France"])
    );
}

#[test]
fn repr_and_bool() {
    let schema = schema();

    assert_eq!(
        scalar::<String>(&schema, Expr::call("repr", vec![Expr::name("name")])),
        "'Germany'"
    );
    assert_eq!(
        names(
            &schema,
            Expr::eq(Expr::call("repr", vec![Expr::name("name")]), r"'O\'Hara'")
        ),
        some(&["O'Hara"])
    );
    assert_eq!(
        names(&schema, Expr::call("bool", vec![Expr::name("name")])).len(),
        7
    );
    assert_eq!(
        names(&schema, Expr::call("bool", vec![Expr::modulo(Expr::name("id"), 4)])).len(),
        6
    );
}
