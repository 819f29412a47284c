/// Typed row values for tables whose shape is only known at runtime

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{ser::SerializeMap, Serialize, Serializer};

/// A single cell, tagged with the kind of value the database returned
///
/// Serialized as `{"type": "...", "value": ...}` so formatters downstream
/// never have to guess at JSON shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(#[serde(serialize_with = "base64_bytes")] Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Json(serde_json::Value),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Scalar rendering used to build foreign-key navigation links
    ///
    /// Returns `None` for nulls and for values that cannot identify a row.
    pub fn as_link_value(&self) -> Option<String> {
        match self {
            CellValue::Int(v) => Some(v.to_string()),
            CellValue::UInt(v) => Some(v.to_string()),
            CellValue::Text(v) => Some(v.clone()),
            CellValue::Bool(v) => Some(u8::from(*v).to_string()),
            CellValue::Date(v) => Some(v.to_string()),
            CellValue::DateTime(v) => Some(v.to_string()),
            CellValue::Time(v) => Some(v.to_string()),
            CellValue::Null | CellValue::Float(_) | CellValue::Bytes(_) | CellValue::Json(_) => None,
        }
    }
}

fn base64_bytes<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// One row, cells kept in the column order the database returned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_serializes_in_column_order() {
        let mut row = Row::default();
        row.push("zeta", CellValue::Int(1));
        row.push("alpha", CellValue::Null);
        row.push("blob", CellValue::Bytes(vec![0xde, 0xad]));

        let text = serde_json::to_string(&row).unwrap();
        assert_eq!(
            text,
            r#"{"zeta":{"type":"int","value":1},"alpha":{"type":"null"},"blob":{"type":"bytes","value":"3q0="}}"#
        );
    }

    #[test]
    fn datetimes_are_tagged() {
        let when = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(
            serde_json::to_value(CellValue::DateTime(when)).unwrap(),
            json!({"type": "date_time", "value": "2024-03-01T09:30:00"})
        );
    }

    #[test]
    fn link_values() {
        assert_eq!(CellValue::Int(7).as_link_value().as_deref(), Some("7"));
        assert_eq!(CellValue::Text("abc".into()).as_link_value().as_deref(), Some("abc"));
        assert_eq!(CellValue::Null.as_link_value(), None);
        assert_eq!(CellValue::Json(json!({"a": 1})).as_link_value(), None);
    }

    #[test]
    fn lookup_by_column() {
        let mut row = Row::with_capacity(2);
        row.push("id", CellValue::UInt(3));
        row.push("name", CellValue::Text("widget".into()));
        assert_eq!(row.get("id"), Some(&CellValue::UInt(3)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(row.len(), 2);
    }
}
