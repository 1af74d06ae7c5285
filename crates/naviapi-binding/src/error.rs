use naviapi_json_rpc::{JsonRpcErrorObject, ToJsonRpcError};
use thiserror::Error;

/// Client-visible failure of a verb.
///
/// Every rejection looks the same on the wire; the cause is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("{verb} Bad Request")]
    BadRequest { verb: String },
}

impl BindingError {
    pub fn bad_request(verb: impl Into<String>) -> Self {
        Self::BadRequest { verb: verb.into() }
    }
}

impl ToJsonRpcError for BindingError {
    fn to_error_object(&self) -> JsonRpcErrorObject {
        match self {
            BindingError::BadRequest { verb } => JsonRpcErrorObject::verb_rejected(verb),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejection_shape() {
        let object = BindingError::bad_request("navicore_createroute").to_error_object();
        assert_eq!(
            serde_json::to_value(object).unwrap(),
            json!({"code": -32000, "message": "navicore_createroute Bad Request", "data": "failed"})
        );
    }
}
