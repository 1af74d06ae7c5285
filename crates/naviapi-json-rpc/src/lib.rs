//! # JSON-RPC 2.0 envelope for naviapi
//!
//! Client-facing side of the navigation adapter. Clients send one JSON-RPC request
//! per verb (`navicore_getposition`, `navicore_createroute`, ...) and receive either a
//! result or a single generic rejection. This crate only knows about envelopes and
//! dispatch; verb semantics live in `naviapi-binding`.

pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub use dispatch::{JsonRpcDispatcher, ToJsonRpcError, VerbHandler};
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject};
pub use request::JsonRpcRequest;
pub use response::{JsonRpcMessage, JsonRpcResponse};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";
