//! Typed cell values and rows.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::Serialize;

use crate::input::NativeValue;
use crate::schema::ColumnType;

/// A parsed cell. Serializes to plain JSON: numbers, ISO-8601 strings for
/// temporal values, strings and `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
    Text(String),
    Null,
}

/// One output row: column name to value, in header order.
pub type TypedRow = IndexMap<String, Value>;

impl Value {
    /// Use a workbook's native value when it already has the column's type.
    pub fn from_native(native: NativeValue, column_type: ColumnType) -> Option<Value> {
        match (native, column_type) {
            (NativeValue::Number(n), ColumnType::Number) => Some(Value::Number(n)),
            (NativeValue::DateTime(dt), ColumnType::Date) => Some(Value::Date(dt.date())),
            (NativeValue::DateTime(dt), ColumnType::DateTime) => Some(Value::DateTime(dt)),
            (NativeValue::DateTime(dt), ColumnType::Time) => Some(Value::Time(dt.time())),
            (NativeValue::Time(t), ColumnType::Time) => Some(Value::Time(t)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Value::Null, Value::Number)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d),
            Value::DateTime(dt) => write!(f, "{}", dt),
            Value::Time(t) => write!(f, "{}", t),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 12, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_from_native_agrees_with_fits() {
        let natives = [
            NativeValue::Number(3.5),
            NativeValue::DateTime(noon()),
            NativeValue::Time(noon().time()),
        ];
        let types = [
            ColumnType::Number,
            ColumnType::Date,
            ColumnType::DateTime,
            ColumnType::Time,
            ColumnType::Str,
        ];
        for native in natives {
            for column_type in types {
                assert_eq!(
                    Value::from_native(native, column_type).is_some(),
                    native.fits(column_type),
                    "{:?} as {}",
                    native,
                    column_type
                );
            }
        }
    }

    #[test]
    fn test_from_native_date_part() {
        assert_eq!(
            Value::from_native(NativeValue::DateTime(noon()), ColumnType::Date),
            Some(Value::Date(noon().date()))
        );
    }

    #[test]
    fn test_serializes_plain_json() {
        let mut row = TypedRow::new();
        row.insert("Date".to_string(), Value::Date(noon().date()));
        row.insert("Product".to_string(), Value::Text("iPhone 4".to_string()));
        row.insert("Amount".to_string(), Value::Number(100.12));
        row.insert("When".to_string(), Value::DateTime(noon()));
        row.insert("Note".to_string(), Value::Null);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"Date":"2023-12-10","Product":"iPhone 4","Amount":100.12,"When":"2023-12-10T12:00:00","Note":null}"#
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Number(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::Text("x".into()).as_f64(), None);
        assert!(Value::from(None).is_null());
        assert_eq!(Value::Text("x".into()).as_str(), Some("x"));
        assert_eq!(Value::DateTime(noon()).as_datetime(), Some(noon()));
        assert_eq!(Value::DateTime(noon()).as_date(), None);
        assert_eq!(Value::Time(noon().time()).as_time(), Some(noon().time()));
        assert_eq!(Value::Date(noon().date()).as_time(), None);
    }
}
