use vsql_core::{
    schema::{Conflict, Namespace, Schema, Scope, Variable},
    stmt::{resolve, Alias, Expr, JoinKind, Joins, Type},
};

fn schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .table("countries", "countries")
        .key("id")
        .field("id", Type::Int, "{a}.id")
        .field("name", Type::String, "{a}.name")
        .field("continent", Type::String, "{a}.continent");
    builder
        .table("cities", "(SELECT * FROM cities WHERE deleted = 0)")
        .key("id")
        .field("id", Type::Int, "{a}.id")
        .field("name", Type::String, "{a}.name")
        .field("founded", Type::Date, "{a}.founded")
        .relation("country", "{a}.country_id", "countries", "{d}.id = {m}.country_id");
    builder.build().unwrap()
}

fn cities(schema: &Schema) -> Joins {
    Joins::new(schema.table_by_name("cities").unwrap().id)
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn field_through_relationship() {
    let schema = schema();
    let mut joins = cities(&schema);

    let expr = resolve(
        &Expr::path("country.continent"),
        &schema,
        &Scope::default(),
        &mut joins,
    )
    .unwrap();

    let Expr::Field(field) = &expr else {
        panic!("expected a field, got {expr:?}")
    };
    assert_eq!(field.alias, Alias(1));
    assert_eq!(field.ty, Type::String);
    assert_eq!(field.path, ["country", "continent"]);

    let join = joins.get(Alias(1)).unwrap();
    assert_eq!(join.kind, JoinKind::LeftOuter);
    assert_eq!(join.target, schema.table_by_name("countries").unwrap().id);
}

#[test]
fn relationship_itself_is_a_reference() {
    let schema = schema();
    let mut joins = cities(&schema);

    let expr = resolve(&Expr::name("country"), &schema, &Scope::default(), &mut joins).unwrap();
    assert!(matches!(expr.infer_ty().unwrap(), Type::Ref(_)));
    assert!(joins.is_empty());
}

#[test]
fn attribute_of_scalar_field() {
    let schema = schema();
    let mut joins = cities(&schema);

    let expr = resolve(
        &Expr::path("founded.year"),
        &schema,
        &Scope::default(),
        &mut joins,
    )
    .unwrap();

    assert!(matches!(&expr, Expr::Attr(attr) if attr.name == "year"));
    assert_eq!(expr.infer_ty().unwrap(), Type::Int);
}

#[test]
fn unknown_attribute_of_scalar_field() {
    let schema = schema();
    let mut joins = cities(&schema);

    let expr = resolve(&Expr::path("name.year"), &schema, &Scope::default(), &mut joins).unwrap();
    let err = expr.infer_ty().unwrap_err();
    assert!(err.is_unknown_field());
}

#[test]
fn missing_target_field() {
    let schema = schema();
    let mut joins = cities(&schema);

    let err = resolve(
        &Expr::path("country.population"),
        &schema,
        &Scope::default(),
        &mut joins,
    )
    .unwrap_err();

    assert!(err.is_unknown_field());
    assert_eq!(err.node(), Some(&Expr::path("country.population")));
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

#[test]
fn variables_shadowed_by_fields() {
    let schema = schema();
    let mut joins = cities(&schema);
    let mut scope = Scope::default();
    scope.push(Namespace::vars([
        Variable::value("name", "Berlin").unwrap(),
        Variable::value("limit_year", 1800).unwrap(),
    ]));

    let expr = resolve(
        &Expr::and(
            Expr::eq(Expr::name("name"), "x"),
            Expr::lt(Expr::path("founded.year"), Expr::name("limit_year")),
        ),
        &schema,
        &scope,
        &mut joins,
    )
    .unwrap();

    assert_eq!(expr.fields().count(), 2);
    let vars: Vec<_> = expr.vars().map(|var| var.var.name.as_str()).collect();
    assert_eq!(vars, ["limit_year"]);
}

#[test]
fn rejecting_conflicts_names_the_count() {
    let schema = schema();
    let mut joins = cities(&schema);
    let mut scope = Scope::default();
    scope
        .push(Namespace::vars([Variable::value("name", "Berlin").unwrap()]))
        .conflict(Conflict::Reject);

    let err = resolve(&Expr::name("name"), &schema, &scope, &mut joins).unwrap_err();
    assert_eq!(
        err.to_string(),
        "ambiguous name `name` is bound by 2 namespaces"
    );
}

#[test]
fn sql_variables() {
    let schema = schema();
    let mut joins = cities(&schema);
    let mut scope = Scope::default();
    scope.push(Namespace::vars_as(
        "app",
        [Variable::sql("user_id", Type::Int, "current_setting('app.user')::int")],
    ));

    let expr = resolve(&Expr::path("app.user_id"), &schema, &scope, &mut joins).unwrap();
    let Expr::Var(var) = expr else { panic!() };
    assert_eq!(var.path, ["app", "user_id"]);
    assert!(var.var.as_value().is_none());
}
