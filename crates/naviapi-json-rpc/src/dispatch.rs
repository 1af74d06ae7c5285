use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{JsonRpcError, JsonRpcErrorObject};
use crate::request::JsonRpcRequest;
use crate::response::JsonRpcMessage;

/// Handler for one or more verbs
#[async_trait]
pub trait VerbHandler: Send + Sync {
    /// The error type returned by this handler
    type Error: ToJsonRpcError;

    /// Handle a verb call. `params` is the raw params document (an empty object
    /// when the client sent none). Returns domain errors only; the dispatcher
    /// converts them.
    async fn handle(&self, verb: &str, params: Value) -> Result<Value, Self::Error>;

    /// Verbs served by this handler
    fn supported_verbs(&self) -> Vec<String> {
        vec![]
    }
}

/// Trait for errors that can be converted to JSON-RPC error objects
pub trait ToJsonRpcError: std::error::Error + Send + Sync + 'static {
    fn to_error_object(&self) -> JsonRpcErrorObject;
}

/// Routes requests to the handler registered for their method
pub struct JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    handlers: HashMap<String, Arc<dyn VerbHandler<Error = E>>>,
}

impl<E> JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific verb
    pub fn register_verb<H>(&mut self, verb: impl Into<String>, handler: H)
    where
        H: VerbHandler<Error = E> + 'static,
    {
        self.handlers.insert(verb.into(), Arc::new(handler));
    }

    /// Register one shared handler for every verb it reports
    pub fn register_handler<H>(&mut self, handler: H)
    where
        H: VerbHandler<Error = E> + 'static,
    {
        let handler: Arc<dyn VerbHandler<Error = E>> = Arc::new(handler);
        for verb in handler.supported_verbs() {
            self.handlers.insert(verb, handler.clone());
        }
    }

    /// Process a parsed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcMessage {
        let Some(handler) = self.handlers.get(&request.method) else {
            warn!(method = %request.method, "unknown verb");
            return JsonRpcError::method_not_found(request.id, &request.method).into();
        };

        let params = request.params_document();
        match handler.handle(&request.method, params).await {
            Ok(result) => JsonRpcMessage::success(request.id, result),
            Err(domain_error) => {
                debug!(method = %request.method, error = %domain_error, "verb rejected");
                JsonRpcError::new(Some(request.id), domain_error.to_error_object()).into()
            }
        }
    }

    /// Process one raw JSON request text, as a line-oriented transport would
    /// deliver it.
    pub async fn handle_text(&self, text: &str) -> JsonRpcMessage {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return JsonRpcError::parse_error().into();
            }
        };

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => JsonRpcError::new(
                None,
                JsonRpcErrorObject::invalid_request(Some(e.to_string())),
            )
            .into(),
        }
    }

    /// Get all registered verbs, sorted
    pub fn registered_verbs(&self) -> Vec<String> {
        let mut verbs: Vec<String> = self.handlers.keys().cloned().collect();
        verbs.sort();
        verbs
    }
}

impl<E> Default for JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    fn default() -> Self {
        Self::new()
    }
}
