use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio_postgres::{types::ToSql, Client, NoTls};
use tracing::warn;

use crate::error::{Result, SqlTaskError};
use crate::traits::{DatabaseDriver, DriverConnection};
use crate::types::{
    BoundParameter, Command, Isolation, NativeBlob, NativeCallResult, NativeResultSet,
    NativeValue, SqlValue,
};

/// PostgreSQL driver implementation using tokio-postgres.
///
/// Statement executions are fully supported. Procedure calls with bound
/// output parameters are not: tokio-postgres has no output-parameter
/// binding, so [`DriverConnection::call`] reports `NotSupported`. Parameters
/// always bind positionally (`$1`, `$2`, ...) regardless of the name-based
/// binding flag.
pub struct TokioPostgresDriver;

impl TokioPostgresDriver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TokioPostgresDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseDriver for TokioPostgresDriver {
    async fn connect(&self, connection_string: &str) -> Result<Box<dyn DriverConnection>> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls)
            .await
            .map_err(|e| SqlTaskError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "PostgreSQL connection error");
            }
        });

        Ok(Box::new(TokioPostgresConnection { client }))
    }

    fn clear_pools(&self) {
        // tokio-postgres holds no process-wide pool; nothing to drain
    }
}

struct TokioPostgresConnection {
    client: Client,
}

impl TokioPostgresConnection {
    async fn batch(&self, sql: &str) -> Result<()> {
        self.client
            .batch_execute(sql)
            .await
            .map_err(|e| SqlTaskError::ExecutionFailed(e.to_string()))
    }
}

#[async_trait]
impl DriverConnection for TokioPostgresConnection {
    async fn begin(&mut self, isolation: Isolation) -> Result<()> {
        let sql = match isolation {
            Isolation::Unspecified => "BEGIN",
            Isolation::ReadUncommitted => "BEGIN ISOLATION LEVEL READ UNCOMMITTED",
            Isolation::ReadCommitted => "BEGIN ISOLATION LEVEL READ COMMITTED",
            Isolation::RepeatableRead => "BEGIN ISOLATION LEVEL REPEATABLE READ",
            Isolation::Serializable => "BEGIN ISOLATION LEVEL SERIALIZABLE",
        };
        self.batch(sql).await
    }

    async fn commit(&mut self) -> Result<()> {
        self.batch("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<()> {
        self.batch("ROLLBACK").await
    }

    async fn query(&mut self, command: &Command) -> Result<NativeResultSet> {
        let converted = convert_parameters(&command.parameters);
        let param_refs: Vec<&(dyn ToSql + Sync)> = converted
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        let rows = with_timeout(command.timeout, self.client.query(&command.text, &param_refs))
            .await?;

        let columns: Vec<String> = if rows.is_empty() {
            Vec::new()
        } else {
            rows[0]
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        };

        let result_rows: Vec<Vec<NativeValue>> = rows
            .iter()
            .map(|row| {
                (0..row.columns().len())
                    .map(|i| row_value_to_native(row, i))
                    .collect()
            })
            .collect();

        Ok(NativeResultSet::new(columns, result_rows))
    }

    async fn execute(&mut self, command: &Command) -> Result<u64> {
        let converted = convert_parameters(&command.parameters);
        let param_refs: Vec<&(dyn ToSql + Sync)> = converted
            .iter()
            .map(|b| b.as_ref() as &(dyn ToSql + Sync))
            .collect();

        with_timeout(command.timeout, self.client.execute(&command.text, &param_refs)).await
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<NativeValue>> {
        let result = self.query(command).await?;
        Ok(result
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next()))
    }

    async fn call(&mut self, _command: &Command) -> Result<NativeCallResult> {
        Err(SqlTaskError::NotSupported(
            "output parameters are not supported by the PostgreSQL driver".to_string(),
        ))
    }

    async fn close(&mut self) -> Result<()> {
        // dropping the client closes the socket and ends the handler task
        Ok(())
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    future: impl Future<Output = std::result::Result<T, tokio_postgres::Error>> + Send,
) -> Result<T> {
    if timeout.is_zero() {
        return future
            .await
            .map_err(|e| SqlTaskError::ExecutionFailed(e.to_string()));
    }
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result.map_err(|e| SqlTaskError::ExecutionFailed(e.to_string())),
        Err(_) => Err(SqlTaskError::ExecutionFailed(format!(
            "command timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

/// Convert bound parameters to boxed ToSql trait objects, in declaration
/// order. Output-direction parameters have no tokio-postgres counterpart
/// and bind as null.
fn convert_parameters(parameters: &[BoundParameter]) -> Vec<Box<dyn ToSql + Sync + Send>> {
    parameters
        .iter()
        .map(|p| sql_value_to_tosql(p.value.as_ref().unwrap_or(&SqlValue::Null)))
        .collect()
}

/// Convert a SqlValue to a boxed ToSql trait object.
fn sql_value_to_tosql(value: &SqlValue) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::Null => Box::new(None::<String>),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Int32(i) => Box::new(*i),
        SqlValue::Int64(i) => Box::new(*i),
        SqlValue::Double(f) => Box::new(*f),
        SqlValue::Bool(b) => Box::new(*b),
        SqlValue::Bytes(b) => Box::new(b.clone()),
    }
}

/// Convert a row value at a given index into the native value model.
fn row_value_to_native(row: &tokio_postgres::Row, index: usize) -> NativeValue {
    // Try common types in decreasing order of specificity

    if let Ok(val) = row.try_get::<_, Option<i32>>(index) {
        return match val {
            Some(v) => NativeValue::Int64(v as i64),
            None => NativeValue::Null,
        };
    }

    if let Ok(val) = row.try_get::<_, Option<i64>>(index) {
        return match val {
            Some(v) => NativeValue::Int64(v),
            None => NativeValue::Null,
        };
    }

    if let Ok(val) = row.try_get::<_, Option<bool>>(index) {
        return match val {
            Some(v) => NativeValue::Bool(v),
            None => NativeValue::Null,
        };
    }

    if let Ok(val) = row.try_get::<_, Option<f64>>(index) {
        return match val {
            Some(v) => NativeValue::Float64(v),
            None => NativeValue::Null,
        };
    }

    if let Ok(val) = row.try_get::<_, Option<chrono::NaiveDate>>(index) {
        return NativeValue::Date(val.map(|v| v.to_string()));
    }

    if let Ok(val) = row.try_get::<_, Option<chrono::NaiveDateTime>>(index) {
        return NativeValue::Timestamp(val.map(|v| v.to_string()));
    }

    if let Ok(val) = row.try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(index) {
        return NativeValue::TimestampTz(val.map(|v| v.to_string()));
    }

    if let Ok(val) = row.try_get::<_, Option<Vec<u8>>>(index) {
        return NativeValue::Blob(val.map(NativeBlob::new));
    }

    if let Ok(val) = row.try_get::<_, Option<String>>(index) {
        return NativeValue::Varchar(val);
    }

    NativeValue::Null
}
