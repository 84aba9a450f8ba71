use super::*;
use crate::{Error, Result};

/// Validates a resolved tree.
///
/// Fails on the first node whose operand types do not unify, on calls that
/// do not match the built-in function table and on identifiers left
/// unresolved. Validation does not modify the tree and can be repeated.
pub fn check_valid(expr: &Expr) -> Result<()> {
    expr.infer_ty().map(|_| ())
}

impl Expr {
    /// Validates the tree and returns the type of its value.
    pub fn infer_ty(&self) -> Result<Type> {
        infer(self)
    }
}

fn infer(expr: &Expr) -> Result<Type> {
    infer_node(expr).map_err(|err| err.at(expr))
}

/// Infers a type that must not be a collection. Collections are only
/// accepted on the right of `in`, as the argument of `len`, `list`, `set`
/// and `join` and as the base of an item access.
fn scalar(expr: &Expr) -> Result<Type> {
    let ty = infer(expr)?;
    if ty.is_collection() {
        return Err(Error::type_mismatch(format!("{ty} cannot be used as a value here")).at(expr));
    }
    Ok(ty)
}

/// Collections whose items generators need to see one by one.
fn static_collection(expr: &Expr, usage: &str) -> Result<()> {
    if expr.is_static_collection() {
        Ok(())
    } else {
        Err(Error::type_mismatch(format!("only literal collections can be {usage}")).at(expr))
    }
}

fn boolean(expr: &Expr, context: &str) -> Result<()> {
    match scalar(expr)? {
        Type::Bool | Type::Null => Ok(()),
        ty => Err(Error::type_mismatch(format!("{context} must be bool, got {ty}")).at(expr)),
    }
}

fn infer_node(expr: &Expr) -> Result<Type> {
    match expr {
        Expr::Value(value) => value.ty(),
        Expr::Name(name) => Err(Error::unknown_name(name)),
        Expr::Field(e) => Ok(e.ty.clone()),
        Expr::Var(e) => Ok(e.var.ty.clone()),
        Expr::Attr(e) => {
            let base = scalar(&e.base)?;
            Attribute::check(&e.name, &base)
        }
        Expr::UnaryOp(e) => {
            let ty = scalar(&e.expr)?;
            match (e.op, ty) {
                (UnaryOp::Not, Type::Bool | Type::Null) => Ok(Type::Bool),
                (
                    UnaryOp::Neg,
                    ty @ (Type::Int | Type::Number | Type::TimeDelta | Type::MonthDelta | Type::Null),
                ) => Ok(ty),
                (UnaryOp::BitNot, Type::Int | Type::Null) => Ok(Type::Int),
                (op, ty) => Err(Error::type_mismatch(format!("cannot apply `{op}` to {ty}"))),
            }
        }
        Expr::BinaryOp(e) => {
            let lhs = scalar(&e.lhs)?;
            let rhs = scalar(&e.rhs)?;
            binary_op(e.op, &lhs, &rhs)
        }
        Expr::Compare(e) => compare(e),
        Expr::BoolOp(e) => {
            if e.operands.is_empty() {
                return Err(Error::type_mismatch(format!("`{}` without operands", e.op)));
            }
            for operand in &e.operands {
                boolean(operand, &format!("operand of `{}`", e.op))?;
            }
            Ok(Type::Bool)
        }
        Expr::Item(e) => {
            let index = scalar(&e.index)?;
            if !matches!(index, Type::Int | Type::Null) {
                return Err(
                    Error::type_mismatch(format!("index must be int, got {index}")).at(&e.index),
                );
            }
            match infer(&e.expr)? {
                Type::String | Type::Null => Ok(Type::String),
                Type::List(item) => {
                    static_collection(&e.expr, "indexed")?;
                    Ok(*item)
                }
                ty => Err(Error::type_mismatch(format!("cannot index {ty}"))),
            }
        }
        Expr::Slice(e) => {
            let ty = scalar(&e.expr)?;
            if !matches!(ty, Type::String | Type::Null) {
                return Err(Error::type_mismatch(format!("cannot slice {ty}")));
            }
            for bound in [&e.start, &e.stop].into_iter().flatten() {
                let ty = scalar(bound)?;
                if !matches!(ty, Type::Int | Type::Null) {
                    return Err(
                        Error::type_mismatch(format!("slice bounds must be int, got {ty}")).at(bound),
                    );
                }
            }
            Ok(Type::String)
        }
        Expr::List(e) => Ok(Type::list(items(&e.items)?)),
        Expr::Set(e) => Ok(Type::set(items(&e.items)?)),
        Expr::Call(e) => {
            let Some(func) = Func::from_name(&e.name) else {
                return Err(Error::unknown_function(&e.name, e.args.len()));
            };
            let args = e
                .args
                .iter()
                .map(|arg| {
                    if func.takes_collection() {
                        infer(arg)
                    } else {
                        scalar(arg)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let ty = func.check(&args)?;
            if matches!(func, Func::List | Func::Set) {
                for arg in &e.args {
                    static_collection(arg, "converted")?;
                }
            }
            Ok(ty)
        }
        Expr::Meth(e) => {
            let recv = scalar(&e.recv)?;
            let Some(meth) = Meth::from_name(&e.name) else {
                let args = e.args.iter().map(scalar).collect::<Result<Vec<_>>>()?;
                return Err(Error::unknown_function(
                    format!("{recv}.{}", e.name),
                    args.len(),
                ));
            };
            let args = e
                .args
                .iter()
                .map(|arg| {
                    if meth.takes_collection() {
                        infer(arg)
                    } else {
                        scalar(arg)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            let ty = meth.check(&recv, &args)?;
            if meth.takes_collection() {
                for arg in &e.args {
                    static_collection(arg, "joined")?;
                }
            }
            Ok(ty)
        }
        Expr::If(e) => {
            boolean(&e.cond, "condition")?;
            let then = scalar(&e.then)?;
            let otherwise = scalar(&e.otherwise)?;
            then.unify(&otherwise)
                .map_err(|_| Error::type_mismatch_between(&then, &otherwise, "if/else"))
        }
    }
}

fn binary_op(op: BinaryOp, lhs: &Type, rhs: &Type) -> Result<Type> {
    use BinaryOp::*;
    use Type::*;

    let mismatch = || Error::type_mismatch_between(lhs, rhs, op);

    if op.is_bitwise() {
        return match (lhs, rhs) {
            (Null, Null) => Err(mismatch()),
            (Int | Null, Int | Null) => Ok(Int),
            _ => Err(mismatch()),
        };
    }

    let ty = match (op, lhs, rhs) {
        (_, Null, Null) => return Err(mismatch()),
        (Add, String | Null, String | Null) => String,
        (_, Int | Number | Null, Int | Number | Null) => {
            if op == Div || *lhs == Number || *rhs == Number {
                Number
            } else {
                Int
            }
        }
        (Add | Sub, TimeDelta, TimeDelta | Null) | (Add | Sub, Null, TimeDelta) => TimeDelta,
        (Add | Sub, MonthDelta, MonthDelta | Null) | (Add | Sub, Null, MonthDelta) => MonthDelta,
        (Mul, TimeDelta, Int | Null)
        | (Mul, Int | Null, TimeDelta)
        | (FloorDiv, TimeDelta, Int | Null) => TimeDelta,
        (Mul, MonthDelta, Int | Null)
        | (Mul, Int | Null, MonthDelta)
        | (FloorDiv, MonthDelta, Int | Null) => MonthDelta,
        (Div, TimeDelta, TimeDelta) => Number,
        (Add, Date, TimeDelta | MonthDelta)
        | (Add, TimeDelta | MonthDelta, Date)
        | (Sub, Date, TimeDelta | MonthDelta) => Date,
        (Add, DateTime, TimeDelta | MonthDelta)
        | (Add, TimeDelta | MonthDelta, DateTime)
        | (Sub, DateTime, TimeDelta | MonthDelta) => DateTime,
        (Sub, Date, Date) | (Sub, DateTime, DateTime) => TimeDelta,
        _ => return Err(mismatch()),
    };
    Ok(ty)
}

fn compare(e: &ExprCompare) -> Result<Type> {
    let lhs = scalar(&e.lhs)?;

    if e.op.is_containment() {
        let rhs = infer(&e.rhs)?;
        let ok = match &rhs {
            Type::List(item) | Type::Set(item) => lhs.unify(item).is_ok(),
            Type::String => matches!(lhs, Type::String | Type::Null),
            _ => false,
        };
        if !ok {
            return Err(Error::type_mismatch_between(&lhs, &rhs, e.op));
        }
        return Ok(Type::Bool);
    }

    let rhs = scalar(&e.rhs)?;
    let Ok(ty) = lhs.unify(&rhs) else {
        return Err(Error::type_mismatch_between(&lhs, &rhs, e.op));
    };

    if e.op.is_ordering() && !ty.is_orderable() {
        return Err(Error::type_mismatch_between(&lhs, &rhs, e.op));
    }

    Ok(Type::Bool)
}

fn items(items: &[Expr]) -> Result<Type> {
    let mut ty = Type::Null;

    for item in items {
        let item_ty = scalar(item)?;
        ty = ty
            .unify(&item_ty)
            .map_err(|err| err.at(item))?;
    }

    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn field(name: &str, ty: Type) -> Expr {
        use crate::schema::{FieldId, TableId};

        ExprField {
            path: vec![name.to_string()],
            field: FieldId {
                table: TableId(0),
                index: 0,
            },
            alias: Alias::ROOT,
            ty,
        }
        .into()
    }

    #[test]
    fn arithmetic() {
        let price = field("price", Type::Number);
        let count = field("count", Type::Int);

        assert_eq!(Expr::add(count.clone(), 1).infer_ty().unwrap(), Type::Int);
        assert_eq!(Expr::mul(price, count.clone()).infer_ty().unwrap(), Type::Number);
        assert_eq!(Expr::div(count.clone(), 2).infer_ty().unwrap(), Type::Number);
        assert_eq!(Expr::add("a", "b").infer_ty().unwrap(), Type::String);
        assert!(Expr::sub("a", "b").infer_ty().unwrap_err().is_type_mismatch());
    }

    #[test]
    fn floor_division_and_bitwise() {
        let price = field("price", Type::Number);
        let count = field("count", Type::Int);

        assert_eq!(Expr::floor_div(count.clone(), 2).infer_ty().unwrap(), Type::Int);
        assert_eq!(Expr::floor_div(price.clone(), 2).infer_ty().unwrap(), Type::Number);
        assert_eq!(Expr::modulo(price.clone(), 2).infer_ty().unwrap(), Type::Number);
        assert_eq!(Expr::bit_xor(count.clone(), 6).infer_ty().unwrap(), Type::Int);
        assert_eq!(Expr::bit_not(count.clone()).infer_ty().unwrap(), Type::Int);
        assert!(Expr::bit_and(price.clone(), 1).infer_ty().unwrap_err().is_type_mismatch());
        assert!(Expr::bit_not(price).infer_ty().is_err());
        assert!(Expr::shl(Expr::null(), Expr::null()).infer_ty().is_err());
    }

    #[test]
    fn temporal_arithmetic() {
        let birthday = field("birthday", Type::Date);
        let created = field("created", Type::DateTime);
        let days = Expr::call("days", vec![3.into()]);
        let months = Expr::call("months", vec![1.into()]);

        assert_eq!(Expr::add(birthday.clone(), days.clone()).infer_ty().unwrap(), Type::Date);
        assert_eq!(Expr::sub(birthday.clone(), months.clone()).infer_ty().unwrap(), Type::Date);
        assert_eq!(Expr::add(months.clone(), created.clone()).infer_ty().unwrap(), Type::DateTime);
        assert_eq!(
            Expr::sub(birthday.clone(), birthday.clone()).infer_ty().unwrap(),
            Type::TimeDelta
        );
        assert_eq!(Expr::mul(2, days.clone()).infer_ty().unwrap(), Type::TimeDelta);
        assert_eq!(Expr::floor_div(months.clone(), 2).infer_ty().unwrap(), Type::MonthDelta);
        assert_eq!(Expr::div(days.clone(), days.clone()).infer_ty().unwrap(), Type::Number);
        assert_eq!(Expr::neg(days.clone()).infer_ty().unwrap(), Type::TimeDelta);

        assert!(Expr::sub(days.clone(), birthday.clone()).infer_ty().is_err());
        assert!(Expr::sub(birthday.clone(), created).infer_ty().is_err());
        assert!(Expr::add(days, months).infer_ty().is_err());
        assert!(Expr::add(birthday, Expr::null()).infer_ty().is_err());
    }

    #[test]
    fn item_access() {
        let name = field("name", Type::String);
        let tags = field("tags", Type::String);

        assert_eq!(Expr::item(name.clone(), -1).infer_ty().unwrap(), Type::String);
        assert_eq!(Expr::item(Expr::list([1, 2]), 0).infer_ty().unwrap(), Type::Int);
        assert!(Expr::item(name.clone(), "0").infer_ty().is_err());
        assert!(Expr::item(Expr::set([1, 2]), 0).infer_ty().is_err());

        let split = Expr::meth(tags, "split", vec![",".into()]);
        let err = Expr::item(split.clone(), 0).infer_ty().unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: only literal collections can be indexed");
        assert_eq!(err.node(), Some(&split));

        // Computed collections are fine on the right of `in` and in `len`
        check_valid(&Expr::in_list(name, split.clone())).unwrap();
        check_valid(&Expr::call("len", vec![split])).unwrap();
    }

    #[test]
    fn join_and_conversions() {
        let name = field("name", Type::String);

        let joined = Expr::meth(",", "join", vec![Expr::list([name.clone(), "x".into()])]);
        assert_eq!(joined.infer_ty().unwrap(), Type::String);

        let split = Expr::meth(name.clone(), "split", vec![",".into()]);
        assert!(Expr::meth(",", "join", vec![split.clone()]).infer_ty().is_err());
        assert!(Expr::call("set", vec![split]).infer_ty().is_err());
        assert_eq!(
            Expr::call("set", vec![Expr::list([1, 1])]).infer_ty().unwrap(),
            Type::set(Type::Int)
        );
        assert!(Expr::call("bool", vec![Expr::list([1])]).infer_ty().is_err());
        assert_eq!(Expr::call("bool", vec![name]).infer_ty().unwrap(), Type::Bool);
    }

    #[test]
    fn datetime_literal_against_date_field() {
        let birthday = field("birthday", Type::Date);
        let midnight = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let expr = Expr::eq(birthday.clone(), midnight);
        let err = check_valid(&expr).unwrap_err();
        assert!(err.is_type_mismatch());
        assert_eq!(err.node(), Some(&expr));

        // An explicit conversion is accepted
        let expr = Expr::eq(birthday, Expr::call("date", vec![midnight.into()]));
        check_valid(&expr).unwrap();
    }

    #[test]
    fn containment() {
        let name = field("name", Type::String);

        check_valid(&Expr::in_list(name.clone(), Expr::list(["a", "b"]))).unwrap();
        check_valid(&Expr::in_list("x", name.clone())).unwrap();
        check_valid(&Expr::not_in_list(name.clone(), Expr::set(Vec::<Expr>::new()))).unwrap();
        assert!(check_valid(&Expr::in_list(name, Expr::list([1, 2]))).is_err());
    }

    #[test]
    fn collections_only_where_accepted() {
        let list = Expr::list([1, 2]);

        assert_eq!(Expr::call("len", vec![list.clone()]).infer_ty().unwrap(), Type::Int);
        let err = Expr::eq(list.clone(), list).infer_ty().unwrap_err();
        assert!(err.is_type_mismatch());
        assert!(Expr::list([Expr::list([1])]).infer_ty().is_err());
    }

    #[test]
    fn bool_operands() {
        let flag = field("flag", Type::Bool);
        check_valid(&Expr::and(flag.clone(), Expr::not(flag.clone()))).unwrap();

        let expr = Expr::or(flag, 1);
        let err = check_valid(&expr).unwrap_err();
        assert_eq!(err.node(), Some(&Expr::from(1)));
    }

    #[test]
    fn unknown_function() {
        let err = check_valid(&Expr::call("cbrt", vec![1.into()])).unwrap_err();
        assert!(err.is_arity());
        assert_eq!(err.to_string(), "unknown function `cbrt`");
    }

    #[test]
    fn unresolved_names_are_rejected() {
        assert!(check_valid(&Expr::name("x")).unwrap_err().is_unknown_name());
    }

    #[test]
    fn idempotent() {
        let expr = Expr::gt(Expr::call("len", vec![field("name", Type::String)]), 3);
        assert_eq!(check_valid(&expr).is_ok(), check_valid(&expr).is_ok());
        assert_eq!(expr.infer_ty().unwrap(), expr.infer_ty().unwrap());
    }

    #[test]
    fn conditional_branches_unify() {
        let flag = field("flag", Type::Bool);
        assert_eq!(
            Expr::if_else(1, flag.clone(), Expr::null()).infer_ty().unwrap(),
            Type::Int
        );
        assert!(Expr::if_else(1, flag, "x").infer_ty().is_err());
    }
}
