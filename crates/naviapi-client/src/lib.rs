//! # Navigation service client
//!
//! Talks to the remote navigation service through a [`ServiceTransport`]. Every
//! call gets an id (`req_<n>`) and a slot in a bounded pending-call table; the
//! reply is awaited with an explicit timeout.
//!
//! The inbound side is push-based: whoever reads the connection hands each
//! reply to [`NavicoreClient::deliver_reply`]. The correlator matches it to its
//! call by echoed id, or by verb for remotes that do not echo ids, and keeps the
//! session/route [`HandleStore`](naviapi_protocol::HandleStore) current.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use naviapi_client::{ChannelTransport, ClientConfig, NavicoreClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (transport, _outbound) = ChannelTransport::new();
//! let client = Arc::new(NavicoreClient::new(Box::new(transport), ClientConfig::default())?);
//!
//! // Forward `outbound` to the service, and feed its replies back:
//! // client.deliver_reply(&reply);
//! let _routes = client.get_all_routes().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod correlator;
pub mod error;
pub mod transport;

pub use client::NavicoreClient;
pub use config::{ClientConfig, TimeoutConfig};
pub use correlator::{CallId, Dispatch, ReplyCorrelator};
pub use error::{NaviClientError, NaviClientResult, TransportError};
pub use transport::{BoxedTransport, ChannelTransport, OutboundCall, ServiceTransport};
