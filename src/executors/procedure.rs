//! Stored-procedure execution with bound input/output parameters.
//!
//! No explicit transaction on this path: the call runs under the driver's
//! own auto-commit semantics, yielding both an affected-row count and the
//! populated output parameters, which are then shaped per the caller's
//! requested return type.

use std::time::Duration;

use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::executors::finish;
use crate::marshal;
use crate::materialize;
use crate::traits::{DatabaseDriver, DriverConnection};
use crate::types::{
    CancellationToken, Command, CommandKind, ErrorPolicy, ParameterDescriptor,
    ProcedureReturnType, ResultEnvelope, TaskOutput,
};

/// Properties of the procedure or anonymous block to be executed.
#[derive(Debug, Clone)]
pub struct ProcedureInput {
    /// Opaque connection string, passed through to the driver unmodified.
    pub connection_string: String,
    /// Procedure name, or literal block text for [`CommandKind::Text`].
    pub command: String,
    pub command_type: CommandKind,
    /// Input parameters in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
}

/// Requested output shaping for the procedure call.
#[derive(Debug, Clone, Default)]
pub struct ProcedureOutput {
    pub return_type: ProcedureReturnType,
    /// Output parameters in declaration order. Bound after the input
    /// parameters on the same command.
    pub output_parameters: Vec<ParameterDescriptor>,
}

/// Procedure execution options.
#[derive(Debug, Clone)]
pub struct ProcedureOptions {
    pub timeout_seconds: u64,
    /// Name-based binding when true; strict declaration-order binding when
    /// false.
    pub bind_by_name: bool,
    pub error_policy: ErrorPolicy,
}

impl Default for ProcedureOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            bind_by_name: true,
            error_policy: ErrorPolicy::Raise,
        }
    }
}

/// Execute one procedure call as a self-contained unit of work.
///
/// Cleanup is unconditional: the connection is closed and the driver's
/// pooled connections are drained on every path.
pub async fn execute_procedure(
    driver: &dyn DatabaseDriver,
    input: &ProcedureInput,
    output: &ProcedureOutput,
    options: &ProcedureOptions,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    let outcome = run(driver, input, output, options, token).await;
    driver.clear_pools();
    finish(outcome, options.error_policy)
}

async fn run(
    driver: &dyn DatabaseDriver,
    input: &ProcedureInput,
    output: &ProcedureOutput,
    options: &ProcedureOptions,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    // Inputs first, then outputs, all on one command.
    let mut parameters = marshal::bind_all(&input.parameters)?;
    parameters.extend(marshal::bind_all(&output.output_parameters)?);
    let command = Command {
        text: input.command.clone(),
        kind: input.command_type,
        parameters,
        bind_by_name: options.bind_by_name,
        timeout: Duration::from_secs(options.timeout_seconds),
    };

    token.check()?;
    debug!("opening connection for procedure execution");
    let mut connection = driver.connect(&input.connection_string).await?;

    let result = run_call(connection.as_mut(), &command, output, token).await;

    let closed = connection.close().await;
    let envelope = result?;
    closed?;
    Ok(envelope)
}

async fn run_call(
    connection: &mut dyn DriverConnection,
    command: &Command,
    output: &ProcedureOutput,
    token: &CancellationToken,
) -> Result<ResultEnvelope> {
    token.check()?;
    let call = connection.call(command).await?;
    token.check()?;

    match output.return_type {
        ProcedureReturnType::AffectedRows => Ok(ResultEnvelope::count(call.rows_affected)),
        ProcedureReturnType::Parameters => {
            let map = materialize::parameter_map(call.out_parameters)?;
            Ok(ResultEnvelope::ok(TaskOutput::Parameters(map)))
        }
        ProcedureReturnType::JsonString
        | ProcedureReturnType::XmlDocument
        | ProcedureReturnType::XmlString => {
            let map = materialize::parameter_map(call.out_parameters)?;
            let document = Document::from_parameters(&map);
            let shaped = match output.return_type {
                ProcedureReturnType::JsonString => TaskOutput::Json(document.to_json()),
                ProcedureReturnType::XmlString => TaskOutput::XmlString(document.to_xml_string()),
                _ => TaskOutput::Xml(document),
            };
            Ok(ResultEnvelope::ok(shaped))
        }
    }
}
