//! # naviapi binding
//!
//! Exposes the `navicore_*` verbs as JSON-RPC 2.0 methods. Each method's
//! `params` object carries the verb's fields; results come back as the
//! `result` member, `null` for verbs that only acknowledge. Any rejection uses
//! code `-32000`, message `"<verb> Bad Request"` and data `"failed"`.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use naviapi_binding::NaviapiBinding;
//! use naviapi_client::{ChannelTransport, ClientConfig, NavicoreClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (transport, _outbound) = ChannelTransport::new();
//! let client = Arc::new(NavicoreClient::new(Box::new(transport), ClientConfig::default())?);
//! let dispatcher = NaviapiBinding::new(client).into_dispatcher();
//!
//! let reply = dispatcher
//!     .handle_text(r#"{"jsonrpc":"2.0","id":1,"method":"navicore_getallroutes"}"#)
//!     .await;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handler;

pub use error::BindingError;
pub use handler::NaviapiBinding;
