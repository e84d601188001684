//! Parameter marshalling: descriptor to driver-native bound parameter.
//!
//! Pure and stateless; never touches a connection. The logical-type mapping
//! is total over the enum, so the only way to fail is a descriptor that is
//! structurally unusable (an output parameter of a variable-length type with
//! no declared size).

use crate::error::{Result, SqlTaskError};
use crate::types::{BoundParameter, Direction, ParameterDescriptor, SqlValue};

/// Convert one descriptor into a driver-native bound parameter.
///
/// Input descriptors have their value copied verbatim (missing value binds
/// as null). Output descriptors leave the value unset and must declare a
/// size for variable-length types; the declared size is respected as-is, so
/// callers can reserve large-object buffers of tens of megabytes.
pub fn bind(descriptor: &ParameterDescriptor) -> Result<BoundParameter> {
    match descriptor.direction {
        Direction::In => Ok(BoundParameter {
            name: descriptor.name.clone(),
            native_type: descriptor.data_type.native(),
            direction: Direction::In,
            size: descriptor.size,
            value: Some(descriptor.value.clone().unwrap_or(SqlValue::Null)),
        }),
        Direction::Out => {
            if descriptor.data_type.is_variable_length() && descriptor.size.is_none() {
                return Err(SqlTaskError::Configuration(format!(
                    "output parameter '{}' of type {:?} requires a declared size",
                    descriptor.name, descriptor.data_type
                )));
            }
            Ok(BoundParameter {
                name: descriptor.name.clone(),
                native_type: descriptor.data_type.native(),
                direction: Direction::Out,
                size: descriptor.size,
                value: None,
            })
        }
    }
}

/// Convert a list of descriptors, preserving declaration order.
pub fn bind_all(descriptors: &[ParameterDescriptor]) -> Result<Vec<BoundParameter>> {
    descriptors.iter().map(bind).collect()
}
