use std::sync::Arc;

use crate::drivers::TokioPostgresDriver;
use crate::error::Result;
use crate::executors::{
    self, ProcedureInput, ProcedureOptions, ProcedureOutput, QueryInput, QueryOptions,
};
use crate::traits::DatabaseDriver;
use crate::types::{CancellationToken, ResultEnvelope};

/// Main entry point for sqltask.
/// Holds a database driver and runs each invocation as a self-contained
/// unit of work: the connection is opened from the invocation's own
/// connection string and fully torn down afterwards.
pub struct SqlTaskClient {
    driver: Arc<dyn DatabaseDriver>,
}

impl SqlTaskClient {
    /// Create a client backed by the PostgreSQL driver.
    pub fn new() -> Self {
        Self {
            driver: Arc::new(TokioPostgresDriver::new()),
        }
    }

    /// Create a client with a custom driver.
    /// Useful for testing or using alternative database drivers.
    pub fn with_driver(driver: Arc<dyn DatabaseDriver>) -> Self {
        Self { driver }
    }

    /// Execute a single SQL statement inside an explicit transaction.
    pub async fn execute_query(
        &self,
        input: &QueryInput,
        options: &QueryOptions,
        token: &CancellationToken,
    ) -> Result<ResultEnvelope> {
        executors::execute_query(self.driver.as_ref(), input, options, token).await
    }

    /// Execute a stored procedure or anonymous block with bound input and
    /// output parameters.
    pub async fn execute_procedure(
        &self,
        input: &ProcedureInput,
        output: &ProcedureOutput,
        options: &ProcedureOptions,
        token: &CancellationToken,
    ) -> Result<ResultEnvelope> {
        executors::execute_procedure(self.driver.as_ref(), input, output, options, token).await
    }
}

impl Default for SqlTaskClient {
    fn default() -> Self {
        Self::new()
    }
}
