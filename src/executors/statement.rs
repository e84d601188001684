//! Statement execution: one SQL statement inside an explicit transaction.
//!
//! Lifecycle per invocation: open connection, begin transaction at the
//! caller's isolation level, bind, execute, drain, then tear everything
//! down. Reader and scalar executions never commit; the teardown discards
//! the open transaction. Non-query executions commit before returning.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;
use crate::executors::finish;
use crate::marshal;
use crate::materialize;
use crate::traits::{DatabaseDriver, DriverConnection};
use crate::types::{
    CancellationToken, Command, CommandKind, ErrorPolicy, ExecuteType, Isolation,
    ParameterDescriptor, ResultEnvelope, TaskOutput, TransactionIsolationLevel,
};

/// Properties of the statement to be executed.
#[derive(Debug, Clone)]
pub struct QueryInput {
    /// Opaque connection string, passed through to the driver unmodified.
    pub connection_string: String,
    /// Statement text, e.g.
    /// `INSERT INTO workers (id, name) VALUES (:id, :name)`.
    pub query: String,
    /// Input parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
}

/// Statement execution options.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub execute_type: ExecuteType,
    pub isolation_level: TransactionIsolationLevel,
    pub timeout_seconds: u64,
    /// Name-based binding when true; strict declaration-order binding when
    /// false.
    pub bind_by_name: bool,
    pub error_policy: ErrorPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            execute_type: ExecuteType::Auto,
            isolation_level: TransactionIsolationLevel::Default,
            timeout_seconds: 30,
            bind_by_name: true,
            error_policy: ErrorPolicy::Raise,
        }
    }
}

/// Execute one statement as a self-contained unit of work.
///
/// Cleanup is unconditional: the connection is closed and the driver's
/// pooled connections are drained on every path, including cancellation and
/// the fail-fast error policy.
pub async fn execute_query(
    driver: &dyn DatabaseDriver,
    input: &QueryInput,
    options: &QueryOptions,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    let outcome = run(driver, input, options, token).await;
    driver.clear_pools();
    finish(outcome, options.error_policy)
}

async fn run(
    driver: &dyn DatabaseDriver,
    input: &QueryInput,
    options: &QueryOptions,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    // Binding failures surface before any connection is opened.
    let parameters = marshal::bind_all(&input.parameters)?;
    let command = Command {
        text: input.query.clone(),
        kind: CommandKind::Text,
        parameters,
        bind_by_name: options.bind_by_name,
        timeout: Duration::from_secs(options.timeout_seconds),
    };

    token.check()?;
    debug!("opening connection for statement execution");
    let mut connection = driver.connect(&input.connection_string).await?;

    let result = run_in_transaction(connection.as_mut(), &command, options, token).await;

    let closed = connection.close().await;
    let envelope = result?;
    closed?;
    Ok(envelope)
}

async fn run_in_transaction(
    connection: &mut dyn DriverConnection,
    command: &Command,
    options: &QueryOptions,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    token.check()?;
    connection
        .begin(map_isolation(options.isolation_level))
        .await?;

    match run_statement(connection, command, options.execute_type, token).await {
        Ok(envelope) => Ok(envelope),
        Err(error) => {
            warn!(error = %error, "statement failed, rolling back");
            if let Err(rollback_error) = connection.rollback().await {
                warn!(error = %rollback_error, "rollback failed");
            }
            Err(error)
        }
    }
}

async fn run_statement(
    connection: &mut dyn DriverConnection,
    command: &Command,
    execute_type: ExecuteType,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    token.check()?;
    match classify(&command.text, execute_type) {
        ExecutionMode::Reader => {
            // read path: the transaction stays open and is discarded with
            // the connection
            let result = connection.query(command).await?;
            let rows = materialize::rows(result, token)?;
            Ok(ResultEnvelope::ok(TaskOutput::Rows(rows)))
        }
        ExecutionMode::NonQuery => {
            let rows_affected = connection.execute(command).await?;
            token.check()?;
            connection.commit().await?;
            Ok(ResultEnvelope::count(rows_affected))
        }
        ExecutionMode::Scalar => {
            let value = connection.scalar(command).await?;
            Ok(ResultEnvelope::ok(TaskOutput::Scalar(materialize::scalar(value)?)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionMode {
    Reader,
    NonQuery,
    Scalar,
}

fn classify(query: &str, requested: ExecuteType) -> ExecutionMode {
    match requested {
        ExecuteType::Auto => {
            if query.trim_start().to_lowercase().starts_with("select") {
                ExecutionMode::Reader
            } else {
                ExecutionMode::NonQuery
            }
        }
        ExecuteType::Reader => ExecutionMode::Reader,
        ExecuteType::NonQuery => ExecutionMode::NonQuery,
        ExecuteType::Scalar => ExecutionMode::Scalar,
    }
}

fn map_isolation(level: TransactionIsolationLevel) -> Isolation {
    match level {
        TransactionIsolationLevel::None => Isolation::Unspecified,
        TransactionIsolationLevel::ReadCommitted => Isolation::ReadCommitted,
        TransactionIsolationLevel::ReadUncommitted => Isolation::ReadUncommitted,
        TransactionIsolationLevel::RepeatableRead => Isolation::RepeatableRead,
        TransactionIsolationLevel::Serializable => Isolation::Serializable,
        // the conservative default is the strictest available level
        TransactionIsolationLevel::Default => Isolation::Serializable,
    }
}
