//! sqltask - executes SQL statements and stored procedures as self-contained
//! pipeline task units, shaping driver-native results into portable forms.
//!
//! # Example
//! ```ignore
//! use sqltask::{
//!     CancellationToken, ExecuteType, LogicalType, ParameterDescriptor, QueryInput,
//!     QueryOptions, SqlTaskClient,
//! };
//!
//! let client = SqlTaskClient::new();
//! let input = QueryInput {
//!     connection_string: "host=localhost user=app dbname=app".to_string(),
//!     query: "SELECT name FROM workers WHERE id = $1".to_string(),
//!     parameters: vec![ParameterDescriptor::input("id", LogicalType::Int32, 3)],
//! };
//!
//! let envelope = client
//!     .execute_query(&input, &QueryOptions::default(), &CancellationToken::new())
//!     .await?;
//! assert!(envelope.success);
//! ```
//!
//! Every invocation opens its own connection, runs sequentially through
//! bind, execute and drain, then closes the connection and drains the
//! driver's pooled connections, on success and failure alike.

pub mod document;
pub mod drivers;
pub mod error;
pub mod executors;
pub mod marshal;
pub mod materialize;
pub mod traits;
pub mod types;

mod client;

// Re-export main types for convenient access
pub use client::SqlTaskClient;
pub use document::{Document, DocumentElement};
pub use error::{Result, SqlTaskError};
pub use executors::{
    ProcedureInput, ProcedureOptions, ProcedureOutput, QueryInput, QueryOptions,
};
pub use traits::{DatabaseDriver, DriverConnection};
pub use types::{
    BoundParameter, CancellationToken, CellValue, Command, CommandKind, Direction, ErrorPolicy,
    ExecuteType, Isolation, LogicalType, NativeBlob, NativeCallResult, NativeResultSet,
    NativeType, NativeValue, ParameterDescriptor, ProcedureReturnType, ResultEnvelope, Row,
    SqlValue, TaskOutput, TransactionIsolationLevel,
};
