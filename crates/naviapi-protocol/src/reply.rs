//! Client-facing serialization of typed results

use serde::Serialize;
use serde_json::{Value, json};
use tracing::warn;

use crate::decode::DecodedReply;
use crate::field::{FieldKey, PositionMap};
use crate::handle::{RouteHandle, SessionRegistry};
use crate::schema::{ROUTE, SESSION_HANDLE};

/// Outcome of serializing a result for the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err_message: Option<String>,
    pub json_data: Value,
}

impl ApiResponse {
    pub fn success(json_data: Value) -> Self {
        Self {
            is_success: true,
            err_message: None,
            json_data,
        }
    }

    pub fn failure(message: impl Into<String>, json_data: Value) -> Self {
        Self {
            is_success: false,
            err_message: Some(message.into()),
            json_data,
        }
    }

    /// Serialize whatever a reply decoded into.
    pub fn from_reply(reply: &DecodedReply) -> Self {
        match reply {
            DecodedReply::Position(positions) => Self::position(positions),
            DecodedReply::Routes(routes) => Self::routes(routes),
            DecodedReply::CreatedRoute(route) => Self::created_route(*route),
            DecodedReply::Sessions(sessions) => Self::sessions(sessions),
            DecodedReply::Ack => Self::ack(),
        }
    }

    /// Result of an acknowledgement verb
    pub fn ack() -> Self {
        Self::success(Value::Null)
    }

    pub fn position(positions: &PositionMap) -> Self {
        if positions.is_empty() {
            return Self::failure("posList is empty", json!([]));
        }

        let entries: Vec<Value> = positions
            .iter()
            .filter_map(|(key, value)| {
                let value = match key {
                    FieldKey::Latitude | FieldKey::Longitude => json!(value.as_f64()),
                    // Clients read these two as flags
                    FieldKey::Heading | FieldKey::SimulationMode => json!(value.as_bool()),
                    FieldKey::Timestamp | FieldKey::Speed => return None,
                };
                Some(json!({"key": key.code(), "value": value}))
            })
            .collect();
        Self::success(Value::Array(entries))
    }

    pub fn routes(routes: &[RouteHandle]) -> Self {
        let entries: Vec<Value> = routes.iter().map(|route| json!({ ROUTE: route })).collect();
        Self::success(Value::Array(entries))
    }

    pub fn created_route(route: RouteHandle) -> Self {
        Self::success(json!({ ROUTE: route }))
    }

    pub fn sessions(sessions: &SessionRegistry) -> Self {
        let entries: Vec<Value> = sessions
            .iter()
            .filter(|(handle, _)| {
                if !handle.is_valid() {
                    warn!("invalid session handle not returned");
                }
                handle.is_valid()
            })
            .map(|(handle, client)| json!({ SESSION_HANDLE: handle, "client": client }))
            .collect();
        Self::success(Value::Array(entries))
    }
}
