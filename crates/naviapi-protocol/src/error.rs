use thiserror::Error;

use crate::schema::FieldKind;

/// Result type for parameter extraction
pub type ProtocolResult<T> = Result<T, ParamError>;

/// Why an inbound client document was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("key {field} not found")]
    MissingField { field: &'static str },

    #[error("key {field} is not {expected} type")]
    TypeMismatch {
        field: &'static str,
        expected: FieldKind,
    },

    #[error("{field} contains an element that is not an integer")]
    InvalidElement { field: &'static str },

    #[error("no usable waypoint in {field}")]
    NoValidWaypoints { field: &'static str },

    #[error("request document is not a JSON object")]
    NotAnObject,
}
