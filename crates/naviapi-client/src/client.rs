//! Navigation service client

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use naviapi_protocol::{
    DecodedReply, GetPositionParams, HandleStore, PositionMap, RouteHandle, RouteParams,
    SessionParams, SessionRegistry, SetSimulationModeParams, SetWaypointsParams, Verb, VerbParams,
    encode_request,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::correlator::{Dispatch, ReplyCorrelator};
use crate::error::{NaviClientError, NaviClientResult, TransportError};
use crate::transport::{BoxedTransport, OutboundCall};

/// Removes the pending entry when the awaiting call goes away, whether it
/// finished, timed out or was dropped.
struct PendingGuard<'a> {
    correlator: &'a ReplyCorrelator,
    id: &'a str,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if self.correlator.cancel(self.id) {
            debug!(id = self.id, "pending call withdrawn");
        }
    }
}

/// Asynchronous client for the remote navigation service.
///
/// Each method sends one call and awaits its reply under the configured
/// request timeout. Replies are fed in by whoever owns the inbound side of the
/// connection, through [`NavicoreClient::deliver_reply`].
pub struct NavicoreClient {
    transport: BoxedTransport,
    correlator: ReplyCorrelator,
    config: ClientConfig,
    request_counter: AtomicU64,
}

impl NavicoreClient {
    /// Fails with [`NaviClientError::Config`] when `config` does not validate.
    pub fn new(transport: BoxedTransport, config: ClientConfig) -> NaviClientResult<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            correlator: ReplyCorrelator::new(config.max_pending),
            config,
            request_counter: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the cached session and route handles
    pub fn handles(&self) -> HandleStore {
        self.correlator.handles()
    }

    pub fn pending_calls(&self) -> usize {
        self.correlator.pending_count()
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Feed one parsed reply from the service.
    pub fn deliver_reply(&self, reply: &Value) -> Dispatch {
        self.correlator.dispatch(reply)
    }

    /// Feed one raw reply message from the service.
    pub fn deliver_reply_text(&self, text: &str) -> NaviClientResult<Dispatch> {
        let reply: Value = serde_json::from_str(text)?;
        Ok(self.deliver_reply(&reply))
    }

    /// Drain `replies` into the client until the sender side closes.
    pub fn spawn_reply_pump(
        self: &Arc<Self>,
        mut replies: mpsc::UnboundedReceiver<Value>,
    ) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(reply) = replies.recv().await {
                client.deliver_reply(&reply);
            }
            info!("reply stream closed");
        })
    }

    /// Generate next call ID
    fn next_call_id(&self) -> String {
        let counter = self.request_counter.fetch_add(1, Ordering::SeqCst);
        format!("req_{}", counter)
    }

    /// Send one call and wait for its decoded reply.
    pub async fn call(&self, params: &VerbParams) -> NaviClientResult<DecodedReply> {
        let verb = params.verb();
        if !self.transport.is_connected() {
            warn!(%verb, "navigation service not connected");
            return Err(TransportError::NotConnected.into());
        }

        let id = self.next_call_id();
        let receiver = self.correlator.register(id.clone(), verb)?;
        let _guard = PendingGuard {
            correlator: &self.correlator,
            id: &id,
        };

        let call = OutboundCall {
            id: id.clone(),
            api: self.config.api_name.clone(),
            verb,
            payload: encode_request(params, &self.correlator.handles()),
        };
        debug!(%id, %verb, payload = %call.payload, "sending call");

        if let Err(e) = self.transport.send_call(call).await {
            error!(%id, %verb, error = %e, "failed to send call");
            return Err(e);
        }

        match timeout(self.config.timeouts.request, receiver).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(NaviClientError::ReplyDropped { verb }),
            Err(_) => {
                warn!(
                    %id,
                    %verb,
                    timeout_ms = self.config.timeouts.request.as_millis() as u64,
                    "no reply within timeout"
                );
                Err(NaviClientError::Timeout { verb })
            }
        }
    }

    async fn call_ack(&self, params: VerbParams) -> NaviClientResult<()> {
        let verb = params.verb();
        match self.call(&params).await? {
            DecodedReply::Ack => Ok(()),
            _ => Err(NaviClientError::UnexpectedReply { verb }),
        }
    }

    pub async fn get_position(&self, params: GetPositionParams) -> NaviClientResult<PositionMap> {
        match self.call(&VerbParams::GetPosition(params)).await? {
            DecodedReply::Position(positions) => Ok(positions),
            _ => Err(NaviClientError::UnexpectedReply {
                verb: Verb::GetPosition,
            }),
        }
    }

    pub async fn get_all_routes(&self) -> NaviClientResult<Vec<RouteHandle>> {
        match self.call(&VerbParams::GetAllRoutes).await? {
            DecodedReply::Routes(routes) => Ok(routes),
            _ => Err(NaviClientError::UnexpectedReply {
                verb: Verb::GetAllRoutes,
            }),
        }
    }

    pub async fn create_route(&self, params: SessionParams) -> NaviClientResult<RouteHandle> {
        match self.call(&VerbParams::CreateRoute(params)).await? {
            DecodedReply::CreatedRoute(route) => Ok(route),
            _ => Err(NaviClientError::UnexpectedReply {
                verb: Verb::CreateRoute,
            }),
        }
    }

    pub async fn get_all_sessions(&self) -> NaviClientResult<SessionRegistry> {
        match self.call(&VerbParams::GetAllSessions).await? {
            DecodedReply::Sessions(sessions) => Ok(sessions),
            _ => Err(NaviClientError::UnexpectedReply {
                verb: Verb::GetAllSessions,
            }),
        }
    }

    pub async fn pause_simulation(&self, params: SessionParams) -> NaviClientResult<()> {
        self.call_ack(VerbParams::PauseSimulation(params)).await
    }

    pub async fn set_simulation_mode(
        &self,
        params: SetSimulationModeParams,
    ) -> NaviClientResult<()> {
        self.call_ack(VerbParams::SetSimulationMode(params)).await
    }

    pub async fn cancel_route_calculation(&self, params: RouteParams) -> NaviClientResult<()> {
        self.call_ack(VerbParams::CancelRouteCalculation(params)).await
    }

    pub async fn set_waypoints(&self, params: SetWaypointsParams) -> NaviClientResult<()> {
        self.call_ack(VerbParams::SetWaypoints(params)).await
    }

    pub async fn calculate_route(&self, params: RouteParams) -> NaviClientResult<()> {
        self.call_ack(VerbParams::CalculateRoute(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelTransport;
    use naviapi_protocol::SessionHandle;
    use serde_json::json;
    use std::time::Duration;

    fn client() -> (Arc<NavicoreClient>, mpsc::UnboundedReceiver<OutboundCall>) {
        let (transport, remote) = ChannelTransport::new();
        let config = ClientConfig::default().with_request_timeout(Duration::from_secs(2));
        (
            Arc::new(NavicoreClient::new(Box::new(transport), config).unwrap()),
            remote,
        )
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let (transport, _remote) = ChannelTransport::new();
        let config = ClientConfig {
            max_pending: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(
            NavicoreClient::new(Box::new(transport), config),
            Err(NaviClientError::Config(_))
        ));
    }

    #[test]
    fn test_call_ids_are_sequential() {
        let (client, _remote) = client();
        assert_eq!(client.next_call_id(), "req_0");
        assert_eq!(client.next_call_id(), "req_1");
    }

    #[tokio::test]
    async fn test_create_route_round_trip() {
        let (client, mut remote) = client();
        let caller = {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                client
                    .create_route(SessionParams {
                        session: SessionHandle(3),
                    })
                    .await
            })
        };

        let call = remote.recv().await.unwrap();
        assert_eq!(call.verb, Verb::CreateRoute);
        assert_eq!(call.api, "naviapi");
        assert_eq!(call.payload, json!({"sessionHandle": 3}));

        client.deliver_reply(&json!({
            "request": {"info": call.verb.name(), "id": call.id},
            "response": {"route": 21}
        }));

        assert_eq!(caller.await.unwrap().unwrap(), RouteHandle(21));
        assert_eq!(client.handles().route(), Some(RouteHandle(21)));
        assert_eq!(client.pending_calls(), 0);
    }

    #[tokio::test]
    async fn test_not_connected() {
        let (client, remote) = client();
        drop(remote);
        let err = client.get_all_routes().await.unwrap_err();
        assert!(matches!(
            err,
            NaviClientError::Transport(TransportError::NotConnected)
        ));
        assert_eq!(client.pending_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_clears_pending_entry() {
        let (client, mut remote) = client();
        let caller = {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.get_all_sessions().await })
        };
        let _call = remote.recv().await.unwrap();
        assert_eq!(client.pending_calls(), 1);

        let err = caller.await.unwrap().unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(client.pending_calls(), 0);
    }

    #[test]
    fn test_deliver_reply_text() {
        let (client, _remote) = client();
        assert!(matches!(
            client.deliver_reply_text("{"),
            Err(NaviClientError::Json(_))
        ));
        let outcome = client
            .deliver_reply_text(r#"{"request":{"info":"navicore_getallroutes"},"response":[{"route":4}]}"#)
            .unwrap();
        assert_eq!(
            outcome,
            Dispatch::Unmatched {
                verb: Verb::GetAllRoutes
            }
        );
        assert_eq!(client.handles().route(), Some(RouteHandle(4)));
    }
}
