use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Result, SqlTaskError};
use crate::traits::{DatabaseDriver, DriverConnection};
use crate::types::{
    BoundParameter, Command, CommandKind, Isolation, NativeCallResult, NativeResultSet,
    NativeValue, SqlValue,
};

/// A scripted response for the next executed command.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Returned by a reader execution.
    Rows(NativeResultSet),
    /// Returned by a non-query execution.
    Count(u64),
    /// Returned by a scalar execution.
    Value(Option<NativeValue>),
    /// Returned by a procedure call.
    Call(NativeCallResult),
    /// Fail the execution with this message.
    Fail(String),
}

/// One recorded connection-lifecycle event, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverEvent {
    Connected,
    Began(Isolation),
    Query(String),
    Execute(String),
    Scalar(String),
    Call(String),
    Committed,
    RolledBack,
    Closed,
    PoolsCleared,
}

/// A recorded command execution for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub text: String,
    pub kind: CommandKind,
    pub bind_by_name: bool,
    pub parameters: Vec<BoundParameter>,
}

#[derive(Default)]
struct Shared {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    events: Mutex<Vec<DriverEvent>>,
    commands: Mutex<Vec<RecordedCommand>>,
    fail_connect: Mutex<Option<String>>,
}

/// An in-memory database driver for testing.
///
/// Allows scripting responses per executed command and verifying the full
/// connection lifecycle: connect, begin, execute, commit/rollback, close and
/// pool draining are all recorded as [`DriverEvent`]s.
#[derive(Default)]
pub struct InMemoryTestDriver {
    shared: Arc<Shared>,
}

impl InMemoryTestDriver {
    /// Create a new in-memory test driver with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response to be returned by the next executed command.
    /// Responses are consumed in FIFO order.
    pub fn with_response(self, response: ScriptedResponse) -> Self {
        self.shared.responses.lock().unwrap().push_back(response);
        self
    }

    /// Add multiple responses to be consumed by subsequent commands.
    pub fn with_responses(self, responses: impl IntoIterator<Item = ScriptedResponse>) -> Self {
        let mut queue = self.shared.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
        drop(queue);
        self
    }

    /// Make the next connect attempt fail with the given message.
    pub fn fail_next_connect(self, message: impl Into<String>) -> Self {
        *self.shared.fail_connect.lock().unwrap() = Some(message.into());
        self
    }

    /// All recorded lifecycle events, in order.
    pub fn events(&self) -> Vec<DriverEvent> {
        self.shared.events.lock().unwrap().clone()
    }

    /// All recorded command executions, in order.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.shared.commands.lock().unwrap().clone()
    }

    /// The last recorded command, if any.
    pub fn last_command(&self) -> Option<RecordedCommand> {
        self.shared.commands.lock().unwrap().last().cloned()
    }

    /// How many times the pool-drain step ran.
    pub fn pool_clears(&self) -> usize {
        self.shared
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == DriverEvent::PoolsCleared)
            .count()
    }

    /// How many times a transaction was committed.
    pub fn commits(&self) -> usize {
        self.shared
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == DriverEvent::Committed)
            .count()
    }

    /// Assert that the last command matches the expected text and input
    /// parameter values, in declaration order.
    pub fn assert_last_command(&self, expected_text: &str, expected_values: &[SqlValue]) {
        let last = self.last_command().expect("No commands were recorded");
        assert_eq!(
            last.text, expected_text,
            "Command text mismatch.\nExpected: {}\nActual: {}",
            expected_text, last.text
        );
        let actual_values: Vec<SqlValue> = last
            .parameters
            .iter()
            .filter_map(|p| p.value.clone())
            .collect();
        assert_eq!(
            actual_values, expected_values,
            "Parameter values mismatch.\nExpected: {:?}\nActual: {:?}",
            expected_values, actual_values
        );
    }

    fn push_event(&self, event: DriverEvent) {
        self.shared.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl DatabaseDriver for InMemoryTestDriver {
    async fn connect(&self, _connection_string: &str) -> Result<Box<dyn DriverConnection>> {
        if let Some(message) = self.shared.fail_connect.lock().unwrap().take() {
            return Err(SqlTaskError::ConnectionFailed(message));
        }
        self.push_event(DriverEvent::Connected);
        Ok(Box::new(InMemoryConnection {
            shared: Arc::clone(&self.shared),
        }))
    }

    fn clear_pools(&self) {
        self.push_event(DriverEvent::PoolsCleared);
    }
}

struct InMemoryConnection {
    shared: Arc<Shared>,
}

impl InMemoryConnection {
    fn push_event(&self, event: DriverEvent) {
        self.shared.events.lock().unwrap().push(event);
    }

    fn record(&self, command: &Command) {
        self.shared.commands.lock().unwrap().push(RecordedCommand {
            text: command.text.clone(),
            kind: command.kind,
            bind_by_name: command.bind_by_name,
            parameters: command.parameters.clone(),
        });
    }

    fn next_response(&self) -> Option<ScriptedResponse> {
        self.shared.responses.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl DriverConnection for InMemoryConnection {
    async fn begin(&mut self, isolation: Isolation) -> Result<()> {
        self.push_event(DriverEvent::Began(isolation));
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.push_event(DriverEvent::Committed);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.push_event(DriverEvent::RolledBack);
        Ok(())
    }

    async fn query(&mut self, command: &Command) -> Result<NativeResultSet> {
        self.record(command);
        self.push_event(DriverEvent::Query(command.text.clone()));
        match self.next_response() {
            Some(ScriptedResponse::Rows(result)) => Ok(result),
            Some(ScriptedResponse::Fail(message)) => Err(SqlTaskError::ExecutionFailed(message)),
            None => Ok(NativeResultSet::empty()),
            Some(other) => Err(SqlTaskError::ExecutionFailed(format!(
                "scripted response {other:?} does not fit a reader execution"
            ))),
        }
    }

    async fn execute(&mut self, command: &Command) -> Result<u64> {
        self.record(command);
        self.push_event(DriverEvent::Execute(command.text.clone()));
        match self.next_response() {
            Some(ScriptedResponse::Count(n)) => Ok(n),
            Some(ScriptedResponse::Fail(message)) => Err(SqlTaskError::ExecutionFailed(message)),
            None => Ok(0),
            Some(other) => Err(SqlTaskError::ExecutionFailed(format!(
                "scripted response {other:?} does not fit a non-query execution"
            ))),
        }
    }

    async fn scalar(&mut self, command: &Command) -> Result<Option<NativeValue>> {
        self.record(command);
        self.push_event(DriverEvent::Scalar(command.text.clone()));
        match self.next_response() {
            Some(ScriptedResponse::Value(value)) => Ok(value),
            Some(ScriptedResponse::Fail(message)) => Err(SqlTaskError::ExecutionFailed(message)),
            None => Ok(None),
            Some(other) => Err(SqlTaskError::ExecutionFailed(format!(
                "scripted response {other:?} does not fit a scalar execution"
            ))),
        }
    }

    async fn call(&mut self, command: &Command) -> Result<NativeCallResult> {
        self.record(command);
        self.push_event(DriverEvent::Call(command.text.clone()));
        match self.next_response() {
            Some(ScriptedResponse::Call(result)) => Ok(result),
            Some(ScriptedResponse::Fail(message)) => Err(SqlTaskError::ExecutionFailed(message)),
            None => Ok(NativeCallResult::new(0, Vec::new())),
            Some(other) => Err(SqlTaskError::ExecutionFailed(format!(
                "scripted response {other:?} does not fit a procedure call"
            ))),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.push_event(DriverEvent::Closed);
        Ok(())
    }
}
