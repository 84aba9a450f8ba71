use rust_decimal::prelude::ToPrimitive;
use serde_json::Number;
use vsql_core::stmt::Value;

/// Converts a bind parameter to JSON for the emitted function's `p` array.
///
/// Numbers become JSON numbers, dates and datetimes ISO 8601 strings
/// (`2024-03-01`, `2024-03-01T08:05:00`), which is the representation the
/// emitted code expects in records as well. Colors are packed `0xRRGGBBAA`
/// integers, time deltas whole seconds and month deltas months.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(v) => serde_json::Value::Bool(*v),
        Value::Int(v) => serde_json::Value::Number((*v).into()),
        Value::Number(v) => v
            .to_f64()
            .and_then(Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Value::String(v) => serde_json::Value::String(v.clone()),
        Value::Date(v) => serde_json::Value::String(v.format("%Y-%m-%d").to_string()),
        Value::DateTime(v) => {
            serde_json::Value::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        Value::Color(v) => serde_json::Value::Number(v.packed().into()),
        Value::TimeDelta(v) => serde_json::Value::Number(v.num_seconds().into()),
        Value::MonthDelta(v) => serde_json::Value::Number((*v).into()),
        Value::List(items) | Value::Set(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use rust_decimal::Decimal;
    use serde_json::json;
    use vsql_core::stmt::Color;

    #[test]
    fn scalars() {
        assert_eq!(to_json(&Value::Null), json!(null));
        assert_eq!(to_json(&Value::Int(-3)), json!(-3));
        assert_eq!(to_json(&Value::Number(Decimal::new(25, 1))), json!(2.5));
        assert_eq!(to_json(&Value::from("a\"b")), json!("a\"b"));
    }

    #[test]
    fn dates_are_iso_strings() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let datetime = date.and_hms_opt(8, 5, 0).unwrap();

        assert_eq!(to_json(&Value::Date(date)), json!("2024-03-01"));
        assert_eq!(to_json(&Value::DateTime(datetime)), json!("2024-03-01T08:05:00"));
    }

    #[test]
    fn collections_are_arrays() {
        let value = Value::Set(vec![Value::Int(1), Value::Null]);
        assert_eq!(to_json(&value), json!([1, null]));
    }

    #[test]
    fn colors_and_deltas_are_integers() {
        assert_eq!(to_json(&Value::Color(Color::rgba(1, 2, 3, 4))), json!(0x0102_0304));
        assert_eq!(to_json(&Value::TimeDelta(TimeDelta::hours(-36))), json!(-129_600));
        assert_eq!(to_json(&Value::MonthDelta(14)), json!(14));
    }
}
