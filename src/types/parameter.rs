use std::str::FromStr;
use std::time::Duration;

use crate::error::SqlTaskError;

/// Represents a caller-supplied parameter value in a driver-agnostic way.
/// Drivers are responsible for converting these to their native types.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int32(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int64(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Double(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Bytes(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

/// Caller-facing enumeration of parameter data kinds, independent of any
/// driver's native type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    Varchar,
    NVarchar,
    Char,
    NChar,
    Int16,
    Int32,
    Int64,
    Double,
    Decimal,
    Date,
    Timestamp,
    TimestampTz,
    Clob,
    NClob,
    Blob,
    Raw,
    Boolean,
}

impl LogicalType {
    /// The driver-native type this logical type maps to. Total over the enum;
    /// there is deliberately no catch-all arm.
    pub fn native(self) -> NativeType {
        match self {
            LogicalType::Varchar | LogicalType::NVarchar | LogicalType::Char | LogicalType::NChar => {
                NativeType::Varchar
            }
            LogicalType::Int16 | LogicalType::Int32 | LogicalType::Int64 | LogicalType::Decimal => {
                NativeType::Number
            }
            LogicalType::Double => NativeType::BinaryDouble,
            LogicalType::Date => NativeType::Date,
            LogicalType::Timestamp => NativeType::Timestamp,
            LogicalType::TimestampTz => NativeType::TimestampTz,
            LogicalType::Clob | LogicalType::NClob => NativeType::Clob,
            LogicalType::Blob => NativeType::Blob,
            LogicalType::Raw => NativeType::Raw,
            LogicalType::Boolean => NativeType::Boolean,
        }
    }

    /// Variable-length types need a declared size when bound for output.
    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            LogicalType::Varchar
                | LogicalType::NVarchar
                | LogicalType::Char
                | LogicalType::NChar
                | LogicalType::Clob
                | LogicalType::NClob
                | LogicalType::Blob
                | LogicalType::Raw
        )
    }
}

impl FromStr for LogicalType {
    type Err = SqlTaskError;

    /// Parses a configuration-supplied type name, case-insensitively.
    /// Unrecognized names fail fast instead of silently coercing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "varchar" | "varchar2" => Ok(LogicalType::Varchar),
            "nvarchar" | "nvarchar2" => Ok(LogicalType::NVarchar),
            "char" => Ok(LogicalType::Char),
            "nchar" => Ok(LogicalType::NChar),
            "int16" => Ok(LogicalType::Int16),
            "int32" => Ok(LogicalType::Int32),
            "int64" => Ok(LogicalType::Int64),
            "double" => Ok(LogicalType::Double),
            "decimal" => Ok(LogicalType::Decimal),
            "date" => Ok(LogicalType::Date),
            "timestamp" => Ok(LogicalType::Timestamp),
            "timestamptz" => Ok(LogicalType::TimestampTz),
            "clob" => Ok(LogicalType::Clob),
            "nclob" => Ok(LogicalType::NClob),
            "blob" => Ok(LogicalType::Blob),
            "raw" => Ok(LogicalType::Raw),
            "boolean" => Ok(LogicalType::Boolean),
            other => Err(SqlTaskError::UnsupportedParameterType(other.to_string())),
        }
    }
}

/// Closed set of driver-native parameter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Varchar,
    Number,
    BinaryDouble,
    Date,
    Timestamp,
    TimestampTz,
    Clob,
    Blob,
    Raw,
    Boolean,
}

/// Whether a parameter carries a value into the statement or receives one
/// back from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

/// Declarative description of one statement or procedure parameter.
/// Constructed by the caller per invocation and consumed once by the
/// marshaller.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub data_type: LogicalType,
    pub direction: Direction,
    /// Required for variable-length output parameters; ignored otherwise.
    pub size: Option<usize>,
    /// Input parameters only; output parameters leave this unset.
    pub value: Option<SqlValue>,
}

impl ParameterDescriptor {
    pub fn input(name: impl Into<String>, data_type: LogicalType, value: impl Into<SqlValue>) -> Self {
        Self {
            name: name.into(),
            data_type,
            direction: Direction::In,
            size: None,
            value: Some(value.into()),
        }
    }

    pub fn output(name: impl Into<String>, data_type: LogicalType, size: usize) -> Self {
        Self {
            name: name.into(),
            data_type,
            direction: Direction::Out,
            size: Some(size),
            value: None,
        }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

/// Driver-native parameter produced by the marshaller. Owned by exactly one
/// [`Command`] and discarded with it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParameter {
    pub name: String,
    pub native_type: NativeType,
    pub direction: Direction,
    pub size: Option<usize>,
    pub value: Option<SqlValue>,
}

/// How the command text is interpreted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// A literal SQL statement or anonymous block.
    Text,
    /// The name of a stored procedure.
    StoredProcedure,
}

/// One executable command with its bound parameters, handed to a driver
/// connection.
#[derive(Debug, Clone)]
pub struct Command {
    pub text: String,
    pub kind: CommandKind,
    pub parameters: Vec<BoundParameter>,
    /// Name-based binding matches parameters by declared name; positional
    /// binding uses declaration order only, so duplicate names carry no
    /// special meaning.
    pub bind_by_name: bool,
    pub timeout: Duration,
}
