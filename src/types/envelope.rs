use crate::document::Document;
use crate::types::{CellValue, Row};

/// How a statement execution is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecuteType {
    /// Classify by statement text: a statement whose trimmed text begins with
    /// `select` (case-insensitive) runs as a reader, everything else as a
    /// non-query.
    ///
    /// Footgun: a statement that starts with the read keyword but mutates
    /// data through a side-effecting subquery still runs on the reader path
    /// and is therefore never committed.
    #[default]
    Auto,
    /// Always run as a reader and return the row set.
    Reader,
    /// Always run as a non-query and return the affected-row count.
    NonQuery,
    /// Return the first column of the first row only.
    Scalar,
}

/// Caller-requested transaction isolation for the statement path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionIsolationLevel {
    /// Maps to the strictest available level.
    #[default]
    Default,
    None,
    ReadCommitted,
    ReadUncommitted,
    RepeatableRead,
    Serializable,
}

/// Driver-facing isolation level, after the caller's choice is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Isolation {
    Unspecified,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// Output representation requested from the procedure path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcedureReturnType {
    /// The affected-row count only.
    AffectedRows,
    /// Flat mapping from output-parameter name to its value.
    #[default]
    Parameters,
    /// The synthetic output-parameter document, serialized as JSON.
    JsonString,
    /// The synthetic output-parameter document as a tree.
    XmlDocument,
    /// The synthetic output-parameter document, serialized as XML text.
    XmlString,
}

/// What happens when an invocation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Propagate every failure class as a hard error.
    #[default]
    Raise,
    /// Catch every failure class and return an envelope with
    /// `success == false` and the underlying message.
    Envelope,
}

/// Closed set of output shapes an invocation can produce. Callers switch on
/// the variant instead of inspecting a dynamically typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    /// Ordered row-documents from a reader execution.
    Rows(Vec<Row>),
    /// First column of the first row; `Text("")` when there were no rows.
    Scalar(CellValue),
    /// Mapping from output-parameter name to its materialized value.
    Parameters(Vec<(String, CellValue)>),
    /// Synthetic output-parameter document rendered as JSON.
    Json(serde_json::Value),
    /// Synthetic output-parameter document as a tree.
    Xml(Document),
    /// Synthetic output-parameter document rendered as XML text.
    XmlString(String),
}

/// Structured outcome of one invocation.
///
/// Exactly one of `rows_affected` / `output` is meaningfully populated per
/// return shape. `success == false` implies `output` is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEnvelope {
    pub success: bool,
    pub message: String,
    pub rows_affected: Option<u64>,
    pub output: Option<TaskOutput>,
}

impl ResultEnvelope {
    /// A successful envelope carrying a shaped output.
    pub fn ok(output: TaskOutput) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            rows_affected: None,
            output: Some(output),
        }
    }

    /// A successful envelope carrying an affected-row count.
    pub fn count(rows_affected: u64) -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
            rows_affected: Some(rows_affected),
            output: None,
        }
    }

    /// A failure envelope, produced under [`ErrorPolicy::Envelope`].
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            rows_affected: None,
            output: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_envelope_populates_rows_affected_only() {
        let envelope = ResultEnvelope::count(3);
        assert!(envelope.success);
        assert_eq!(envelope.message, "Success");
        assert_eq!(envelope.rows_affected, Some(3));
        assert!(envelope.output.is_none());
    }

    #[test]
    fn test_failure_envelope_has_no_output() {
        let envelope = ResultEnvelope::failure("ORA-00001: unique constraint violated");
        assert!(!envelope.success);
        assert!(envelope.message.contains("ORA-00001"));
        assert!(envelope.output.is_none());
        assert!(envelope.rows_affected.is_none());
    }
}
