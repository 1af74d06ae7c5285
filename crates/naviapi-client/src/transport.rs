//! Transport seam between the client and the remote navigation service

use async_trait::async_trait;
use naviapi_protocol::Verb;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{NaviClientResult, TransportError};

/// A named call on its way to the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundCall {
    /// Call id the remote is expected to echo in `request.id`
    pub id: String,
    pub api: String,
    pub verb: Verb,
    pub payload: Value,
}

/// Outbound half of a connection to the navigation service.
///
/// Replies come back through [`crate::NavicoreClient::deliver_reply`], not
/// through the transport.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// Check if connected
    fn is_connected(&self) -> bool;

    /// Hand a call to the connection. Returns once the call is queued or
    /// written, not when it is answered.
    async fn send_call(&self, call: OutboundCall) -> NaviClientResult<()>;
}

/// Boxed transport for dynamic dispatch
pub type BoxedTransport = Box<dyn ServiceTransport>;

/// In-process transport backed by an unbounded channel.
///
/// Whoever holds the receiver plays the remote side. Dropping the receiver
/// disconnects the transport.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<OutboundCall>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCall>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ServiceTransport for ChannelTransport {
    fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }

    async fn send_call(&self, call: OutboundCall) -> NaviClientResult<()> {
        self.sender
            .send(call)
            .map_err(|_| TransportError::Closed)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call() -> OutboundCall {
        OutboundCall {
            id: "req_0".to_string(),
            api: "naviapi".to_string(),
            verb: Verb::GetAllRoutes,
            payload: json!({}),
        }
    }

    #[tokio::test]
    async fn test_channel_transport_delivers() {
        let (transport, mut remote) = ChannelTransport::new();
        assert!(transport.is_connected());
        transport.send_call(call()).await.unwrap();
        assert_eq!(remote.recv().await, Some(call()));
    }

    #[tokio::test]
    async fn test_dropped_receiver_disconnects() {
        let (transport, remote) = ChannelTransport::new();
        drop(remote);
        assert!(!transport.is_connected());
        let err = transport.send_call(call()).await.unwrap_err();
        assert!(err.is_no_result());
    }

    #[test]
    fn test_outbound_wire_shape() {
        assert_eq!(
            serde_json::to_value(call()).unwrap(),
            json!({"id": "req_0", "api": "naviapi", "verb": "navicore_getallroutes", "payload": {}})
        );
    }
}
