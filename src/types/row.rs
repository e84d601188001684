use crate::types::CellValue;

/// A single row-document from a reader execution.
///
/// Fields keep the reader's declared column order; the field set and order
/// are identical across every row of one result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    fields: Vec<(String, CellValue)>,
}

impl Row {
    /// Creates a new Row by pairing column names with values in declared order.
    pub(crate) fn new(columns: &[String], values: Vec<CellValue>) -> Self {
        let fields = columns
            .iter()
            .cloned()
            .zip(values.into_iter())
            .collect();
        Self { fields }
    }

    /// Gets a value by column name. Returns the first match when the reader
    /// reported duplicate column names.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns all column names in declared order.
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns the fields in declared order.
    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }

    /// Returns the number of columns in this row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if this row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object rendering, preserving column order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }
}
