mod cancel;
mod cell_value;
mod envelope;
mod native;
mod parameter;
mod row;

pub use cancel::CancellationToken;
pub use cell_value::CellValue;
pub use envelope::{
    ErrorPolicy, ExecuteType, Isolation, ProcedureReturnType, ResultEnvelope, TaskOutput,
    TransactionIsolationLevel,
};
pub use native::{NativeBlob, NativeCallResult, NativeResultSet, NativeValue};
pub use parameter::{
    BoundParameter, Command, CommandKind, Direction, LogicalType, NativeType,
    ParameterDescriptor, SqlValue,
};
pub use row::Row;
