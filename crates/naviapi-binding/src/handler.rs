//! The `navicore_*` verb handler

use std::sync::Arc;

use async_trait::async_trait;
use naviapi_client::NavicoreClient;
use naviapi_json_rpc::{JsonRpcDispatcher, VerbHandler};
use naviapi_protocol::{ApiResponse, DecodedReply, Verb, VerbParams, extract_params};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::BindingError;

/// Serves every navigation verb by forwarding it to the navigation service.
///
/// Per call: validate the client document, call the service, serialize the
/// result. A service that is unreachable or silent yields an empty result
/// rather than an error.
#[derive(Clone)]
pub struct NaviapiBinding {
    client: Arc<NavicoreClient>,
}

impl NaviapiBinding {
    pub fn new(client: Arc<NavicoreClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<NavicoreClient> {
        &self.client
    }

    /// A dispatcher with this binding registered for all verbs
    pub fn into_dispatcher(self) -> JsonRpcDispatcher<BindingError> {
        let mut dispatcher = JsonRpcDispatcher::new();
        dispatcher.register_handler(self);
        dispatcher
    }

    async fn forward(&self, params: VerbParams) -> Result<DecodedReply, BindingError> {
        let verb = params.verb();
        match self.client.call(&params).await {
            Ok(reply) => Ok(reply),
            Err(e) if e.is_no_result() => {
                warn!(%verb, error = %e, "no result from navigation service");
                Ok(DecodedReply::empty(verb))
            }
            Err(e) => {
                error!(%verb, error = %e, "navigation call failed");
                Err(BindingError::bad_request(verb.name()))
            }
        }
    }
}

#[async_trait]
impl VerbHandler for NaviapiBinding {
    type Error = BindingError;

    async fn handle(&self, verb_name: &str, params: Value) -> Result<Value, BindingError> {
        let verb: Verb = verb_name
            .parse()
            .map_err(|_| BindingError::bad_request(verb_name))?;

        let params = extract_params(verb, &params).map_err(|e| {
            warn!(%verb, error = %e, "invalid parameters");
            BindingError::bad_request(verb_name)
        })?;

        let reply = self.forward(params).await?;
        let response = ApiResponse::from_reply(&reply);
        if !response.is_success {
            warn!(%verb, message = ?response.err_message, "reply not serializable");
            return Err(BindingError::bad_request(verb_name));
        }

        debug!(%verb, result = %response.json_data, "verb served");
        Ok(response.json_data)
    }

    fn supported_verbs(&self) -> Vec<String> {
        Verb::ALL.iter().map(|verb| verb.name().to_string()).collect()
    }
}
