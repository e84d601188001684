use std::str::FromStr;

/// The materializer's representation of one converted value.
///
/// This is what leaves the library: driver null markers are already collapsed,
/// exact numerics are quantized and string-backed so no precision is lost,
/// date/time values are plain text in the driver's default rendering, and
/// binary objects are base64 strings.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    /// Exact numeric, quantized to 28 significant digits.
    Decimal(String),
    /// Date or timestamp in its default textual rendering.
    DateTime(String),
    /// Binary object, base64-encoded.
    Base64(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Textual rendering used for document elements. `None` for null, which
    /// renders as a present-but-empty element.
    pub fn render_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::Text(s) | CellValue::Decimal(s) | CellValue::DateTime(s) | CellValue::Base64(s) => {
                Some(s.clone())
            }
            CellValue::Integer(v) => Some(v.to_string()),
            CellValue::Float(v) => Some(v.to_string()),
            CellValue::Bool(v) => Some(v.to_string()),
        }
    }

    /// JSON rendering. Decimals become JSON numbers when the text parses as
    /// one, keeping their full precision under serde_json's
    /// arbitrary-precision numbers; otherwise they fall back to strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Base64(s) => {
                serde_json::Value::String(s.clone())
            }
            CellValue::Decimal(s) => match serde_json::Number::from_str(s) {
                Ok(n) => serde_json::Value::Number(n),
                Err(_) => serde_json::Value::String(s.clone()),
            },
            CellValue::Integer(v) => serde_json::Value::from(*v),
            CellValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            CellValue::Bool(v) => serde_json::Value::Bool(*v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        assert_eq!(CellValue::Null.render_text(), None);
        assert_eq!(
            CellValue::Text("Matti".to_string()).render_text(),
            Some("Matti".to_string())
        );
        assert_eq!(CellValue::Integer(42).render_text(), Some("42".to_string()));
        assert_eq!(CellValue::Bool(true).render_text(), Some("true".to_string()));
        assert_eq!(
            CellValue::Decimal("1.50".to_string()).render_text(),
            Some("1.50".to_string())
        );
    }

    #[test]
    fn test_decimal_to_json_keeps_precision() {
        let cell = CellValue::Decimal("1234567890123456789012345678".to_string());
        assert_eq!(cell.to_json().to_string(), "1234567890123456789012345678");
    }

    #[test]
    fn test_null_to_json() {
        assert_eq!(CellValue::Null.to_json(), serde_json::Value::Null);
    }

    #[test]
    fn test_empty_text_is_not_null() {
        let cell = CellValue::Text(String::new());
        assert!(!cell.is_null());
        assert_eq!(cell.to_json(), serde_json::Value::String(String::new()));
    }
}
