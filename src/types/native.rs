/// Driver-native result representations.
///
/// Vendor client libraries wrap every typed value in a per-type nullable
/// container. [`NativeValue`] models that as a closed tagged union: each
/// variant that has a vendor null-marker carries an `Option`, and the
/// materializer collapses `None` to a plain null exactly once. Nothing
/// downstream of the materializer ever sees a null marker.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Null,
    Varchar(Option<String>),
    /// Exact numeric, rendered by the driver at full precision.
    Number(Option<String>),
    Date(Option<String>),
    Timestamp(Option<String>),
    TimestampTz(Option<String>),
    Clob(Option<String>),
    Blob(Option<NativeBlob>),
    Int64(i64),
    Float64(f64),
    Bool(bool),
}

/// Handle to a large binary object, read in chunks rather than in one shot.
///
/// The declared length is what the driver reports for the object; the backing
/// data may be shorter when the stream is broken, which the materializer
/// must treat as fatal rather than truncate silently.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeBlob {
    declared_len: u64,
    data: Vec<u8>,
}

impl NativeBlob {
    pub fn new(data: Vec<u8>) -> Self {
        let declared_len = data.len() as u64;
        Self { declared_len, data }
    }

    /// A handle whose declared length disagrees with the bytes actually
    /// available. Used to simulate a broken stream.
    pub fn with_declared_len(data: Vec<u8>, declared_len: u64) -> Self {
        Self { declared_len, data }
    }

    /// Length the driver declared for this object.
    pub fn len(&self) -> u64 {
        self.declared_len
    }

    pub fn is_empty(&self) -> bool {
        self.declared_len == 0
    }

    /// Copies up to `buf.len()` bytes starting at `offset` and returns how
    /// many were available. Returns 0 past the end of the backing data.
    pub fn read(&self, offset: u64, buf: &mut [u8]) -> usize {
        let offset = offset as usize;
        if offset >= self.data.len() {
            return 0;
        }
        let available = &self.data[offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        n
    }
}

/// Driver-agnostic raw result of a reader execution. Columns are in declared
/// order and every row has one value per column, in that same order.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<NativeValue>>,
}

impl NativeResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<NativeValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Result of a stored-procedure / anonymous-block call: the affected-row
/// count plus the populated output parameters, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeCallResult {
    pub rows_affected: u64,
    pub out_parameters: Vec<(String, NativeValue)>,
}

impl NativeCallResult {
    pub fn new(rows_affected: u64, out_parameters: Vec<(String, NativeValue)>) -> Self {
        Self {
            rows_affected,
            out_parameters,
        }
    }
}
