mod procedure;
mod statement;

pub use procedure::{execute_procedure, ProcedureInput, ProcedureOptions, ProcedureOutput};
pub use statement::{execute_query, QueryInput, QueryOptions};

use crate::error::Result;
use crate::types::{ErrorPolicy, ResultEnvelope};

/// Apply the error policy to a finished invocation. Under
/// [`ErrorPolicy::Envelope`] every failure class, cancellation included, is
/// folded into a `success == false` envelope; under [`ErrorPolicy::Raise`]
/// the error propagates. Both executors go through this, so the policy's
/// effect is identical in shape for both.
pub(crate) fn finish(outcome: Result<ResultEnvelope>, policy: ErrorPolicy) -> Result<ResultEnvelope> {
    match outcome {
        Ok(envelope) => Ok(envelope),
        Err(error) => match policy {
            ErrorPolicy::Raise => Err(error),
            ErrorPolicy::Envelope => Ok(ResultEnvelope::failure(error.to_string())),
        },
    }
}
