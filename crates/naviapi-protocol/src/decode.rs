//! Inbound reply decoding.
//!
//! Decoding never fails. A malformed element stops the scan and whatever was
//! accumulated up to that point is returned, with a warning.

use serde_json::Value;
use tracing::{debug, warn};

use crate::field::{FieldKey, PositionMap};
use crate::handle::{RouteHandle, SessionHandle, SessionRegistry};
use crate::schema::{ROUTE, SESSION_HANDLE};
use crate::verb::Verb;

const RESPONSE: &str = "response";
const KEY: &str = "key";
const VALUE: &str = "value";
const CLIENT: &str = "client";

/// Typed result of a reply
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedReply {
    Position(PositionMap),
    Routes(Vec<RouteHandle>),
    CreatedRoute(RouteHandle),
    Sessions(SessionRegistry),
    Ack,
}

impl DecodedReply {
    /// What a verb yields when the service gives no answer at all
    pub fn empty(verb: Verb) -> Self {
        match verb {
            Verb::GetPosition => DecodedReply::Position(PositionMap::new()),
            Verb::GetAllRoutes => DecodedReply::Routes(Vec::new()),
            Verb::CreateRoute => DecodedReply::CreatedRoute(RouteHandle(0)),
            Verb::GetAllSessions => DecodedReply::Sessions(SessionRegistry::new()),
            Verb::PauseSimulation
            | Verb::SetSimulationMode
            | Verb::CancelRouteCalculation
            | Verb::SetWaypoints
            | Verb::CalculateRoute => DecodedReply::Ack,
        }
    }
}

/// Decode the reply envelope `reply` as an answer to `verb`.
pub fn decode_reply(verb: Verb, reply: &Value) -> DecodedReply {
    if verb.is_acknowledgement() {
        debug!(%verb, "acknowledgement, body ignored");
        return DecodedReply::Ack;
    }
    let response = reply.get(RESPONSE).unwrap_or(&Value::Null);
    match verb {
        Verb::GetPosition => DecodedReply::Position(decode_position(response)),
        Verb::GetAllRoutes => DecodedReply::Routes(decode_routes(response)),
        Verb::CreateRoute => DecodedReply::CreatedRoute(decode_created_route(response)),
        Verb::GetAllSessions => DecodedReply::Sessions(decode_sessions(response)),
        _ => DecodedReply::Ack,
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn elements<'a>(response: &'a Value, what: &str) -> &'a [Value] {
    response.as_array().map(Vec::as_slice).unwrap_or_else(|| {
        warn!(what, "response is not an array");
        &[]
    })
}

/// `[{key, value}, ...]` into a position map.
pub fn decode_position(response: &Value) -> PositionMap {
    let mut positions = PositionMap::new();
    for element in elements(response, "position") {
        let (Some(code), Some(raw)) = (element.get(KEY).and_then(Value::as_i64), element.get(VALUE))
        else {
            warn!(%element, "malformed position element, scan aborted");
            break;
        };
        let Some(key) = FieldKey::from_code(code) else {
            warn!(code, "unknown position key skipped");
            continue;
        };
        let Some(value) = key.decode_value(raw) else {
            warn!(%key, %raw, "position value type mismatch, scan aborted");
            break;
        };
        debug!(%key, ?value, "position field");
        positions.insert(key, value);
    }
    positions
}

/// `[{route}, ...]` into route handles, in reply order.
pub fn decode_routes(response: &Value) -> Vec<RouteHandle> {
    let mut routes = Vec::new();
    for element in elements(response, "routes") {
        match element.get(ROUTE).and_then(as_u32) {
            Some(route) => routes.push(RouteHandle(route)),
            None => {
                warn!(%element, "malformed route element, scan aborted");
                break;
            }
        }
    }
    routes
}

/// `{route}` into the new route handle; 0 when absent or malformed.
pub fn decode_created_route(response: &Value) -> RouteHandle {
    match response.get(ROUTE).and_then(as_u32) {
        Some(route) => RouteHandle(route),
        None => {
            warn!(%response, "created route missing, using 0");
            RouteHandle(0)
        }
    }
}

/// `[{sessionHandle, client}, ...]` into the session registry.
pub fn decode_sessions(response: &Value) -> SessionRegistry {
    let mut sessions = SessionRegistry::new();
    for element in elements(response, "sessions") {
        let handle = element.get(SESSION_HANDLE).and_then(as_u32);
        let client = element.get(CLIENT).and_then(Value::as_str);
        let (Some(handle), Some(client)) = (handle, client) else {
            warn!(%element, "malformed session element, scan aborted");
            break;
        };
        sessions.insert(SessionHandle(handle), client.to_string());
    }
    sessions
}
