use super::Flavor;

use vsql_core::stmt::Value;

impl Flavor {
    /// Converts a bind parameter to the representation the dialect stores.
    ///
    /// Only PostgreSQL binds booleans as such, the other dialects bind 1/0.
    /// SQLite has no date type and stores ISO 8601 text. Colors bind as the
    /// packed `0xRRGGBBAA` integer and deltas as whole seconds or months.
    pub(super) fn convert(self, value: &Value) -> Value {
        match (self, value) {
            (_, Value::Color(v)) => Value::Int(v.packed()),
            (_, Value::TimeDelta(v)) => Value::Int(v.num_seconds()),
            (_, Value::MonthDelta(v)) => Value::Int(*v),
            (Flavor::Postgresql, _) => value.clone(),
            (_, Value::Bool(v)) => Value::Int(i64::from(*v)),
            (Flavor::Sqlite, Value::Date(v)) => Value::String(v.format("%Y-%m-%d").to_string()),
            (Flavor::Sqlite, Value::DateTime(v)) => {
                Value::String(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())
            }
            _ => value.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn booleans() {
        assert_eq!(Flavor::Postgresql.convert(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(Flavor::Sqlite.convert(&Value::Bool(true)), Value::Int(1));
        assert_eq!(Flavor::Mysql.convert(&Value::Bool(false)), Value::Int(0));
        assert_eq!(Flavor::Oracle.convert(&Value::Bool(true)), Value::Int(1));
    }

    #[test]
    fn colors_and_deltas_are_integers() {
        use vsql_core::stmt::Color;

        for flavor in [Flavor::Postgresql, Flavor::Sqlite] {
            assert_eq!(flavor.convert(&Color::rgb(0, 0, 255).into()), Value::Int(0x0000_ffff));
            assert_eq!(
                flavor.convert(&Value::TimeDelta(chrono::TimeDelta::minutes(-2))),
                Value::Int(-120)
            );
            assert_eq!(flavor.convert(&Value::MonthDelta(14)), Value::Int(14));
        }
    }

    #[test]
    fn sqlite_dates_are_text() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let datetime = date.and_hms_opt(8, 5, 0).unwrap();

        assert_eq!(
            Flavor::Sqlite.convert(&Value::Date(date)),
            Value::String("2024-03-01".into())
        );
        assert_eq!(
            Flavor::Sqlite.convert(&Value::DateTime(datetime)),
            Value::String("2024-03-01 08:05:00".into())
        );
        assert_eq!(Flavor::Mysql.convert(&Value::Date(date)), Value::Date(date));
    }
}
