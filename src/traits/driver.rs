use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Command, Isolation, NativeCallResult, NativeResultSet, NativeValue};

/// Trait for database driver implementations.
/// Drivers are responsible for:
/// - Opening connections from an opaque connection string
/// - Converting bound parameters to their native types
/// - Executing commands and converting results into the native value model
#[async_trait]
pub trait DatabaseDriver: Send + Sync {
    /// Open a new connection. Each invocation opens, uses, and fully tears
    /// down its own connection; nothing is reused across invocations.
    async fn connect(&self, connection_string: &str) -> Result<Box<dyn DriverConnection>>;

    /// Drop every pooled connection this driver holds process-wide.
    ///
    /// This is the named post-invocation reset step: both executors call it
    /// on every path, success and failure alike, so a failed invocation can
    /// never leak pooled state into the next one.
    fn clear_pools(&self);
}

/// One open connection, used sequentially by a single invocation.
#[async_trait]
pub trait DriverConnection: Send {
    /// Begin a transaction at the given isolation level.
    async fn begin(&mut self, isolation: Isolation) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;

    /// Execute a reader command and drain its rows.
    async fn query(&mut self, command: &Command) -> Result<NativeResultSet>;

    /// Execute a non-query command, returning the affected-row count.
    async fn execute(&mut self, command: &Command) -> Result<u64>;

    /// Execute a command and return the first column of the first row,
    /// or `None` when the result has no rows.
    async fn scalar(&mut self, command: &Command) -> Result<Option<NativeValue>>;

    /// Execute a stored-procedure or anonymous-block call under the driver's
    /// auto-commit semantics, returning the affected-row count and the
    /// populated output parameters.
    async fn call(&mut self, command: &Command) -> Result<NativeCallResult>;

    /// Close the connection. Called unconditionally, also after failures.
    async fn close(&mut self) -> Result<()>;
}
