use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{JsonRpcVersion, RequestId};

/// A client-facing request. `params` is kept as raw JSON: the verb's own
/// extractor decides what is acceptable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Create a new request with no parameters
    pub fn new_no_params(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self::new(id, method, None)
    }

    /// Parameters as a JSON document. Missing params read as an empty object so
    /// parameterless verbs and "missing field" failures go through the same path.
    pub fn params_document(&self) -> Value {
        self.params
            .clone()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_parse() {
        let request: JsonRpcRequest = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "navicore_createroute",
            "params": {"sessionHandle": 5}
        }))
        .unwrap();

        assert_eq!(request.id, RequestId::Number(1));
        assert_eq!(request.method, "navicore_createroute");
        assert_eq!(request.params_document()["sessionHandle"], 5);
    }

    #[test]
    fn test_missing_params_read_as_empty_object() {
        let request = JsonRpcRequest::new_no_params("r1", "navicore_getallroutes");
        assert_eq!(request.params_document(), json!({}));
        assert!(!serde_json::to_string(&request).unwrap().contains("params"));
    }
}
