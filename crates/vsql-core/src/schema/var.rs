use crate::{
    stmt::{Type, Value},
    Error, Result,
};

/// A named value expressions can refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub source: VarSource,
}

/// Where a variable's value comes from at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum VarSource {
    /// A constant, bound as a parameter.
    Value(Value),

    /// A trusted SQL expression, inlined as is. Client side generators read
    /// the value from their variables argument instead.
    Sql(String),
}

impl Variable {
    /// A variable holding `value`, typed after it.
    pub fn value(name: impl Into<String>, value: impl Into<Value>) -> Result<Variable> {
        let value = value.into();
        let ty = value.ty()?;
        Ok(Variable {
            name: name.into(),
            ty,
            source: VarSource::Value(value),
        })
    }

    /// A variable of a declared type. Useful for `None` values.
    pub fn typed(name: impl Into<String>, ty: Type, value: impl Into<Value>) -> Result<Variable> {
        let name = name.into();
        let value = value.into();

        if !ty.accepts(&value.ty()?) {
            return Err(Error::invalid_schema(format!(
                "variable `{name}` is declared as {ty} but holds {value}"
            )));
        }

        Ok(Variable {
            name,
            ty,
            source: VarSource::Value(value),
        })
    }

    /// A variable computed by trusted SQL.
    pub fn sql(name: impl Into<String>, ty: Type, sql: impl Into<String>) -> Variable {
        Variable {
            name: name.into(),
            ty,
            source: VarSource::Sql(sql.into()),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match &self.source {
            VarSource::Value(value) => Some(value),
            VarSource::Sql(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_follows_value() {
        let var = Variable::value("lang", "de").unwrap();
        assert_eq!(var.ty, Type::String);
    }

    #[test]
    fn typed_null() {
        let var = Variable::typed("lang", Type::String, Value::Null).unwrap();
        assert_eq!(var.ty, Type::String);
        assert!(Variable::typed("lang", Type::Int, "x").unwrap_err().is_invalid_schema());
    }
}
