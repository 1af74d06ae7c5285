//! Outbound payloads for the remote navigation service

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::handle::{HandleStore, RouteHandle, SessionHandle};
use crate::params::VerbParams;
use crate::schema::{
    LATITUDE, LONGITUDE, ROUTE, SESSION_HANDLE, SIMULATION_MODE, START_FROM_CURRENT_POSITION,
    VALUES_TO_RETURN, WAYPOINTS_LIST,
};

/// Build the payload for `params` against a snapshot of the handle store.
///
/// A cached session handle replaces the client-supplied one for every
/// session-bearing verb. A cached route handle replaces the client-supplied one
/// for SetWaypoints and CalculateRoute only.
pub fn encode_request(params: &VerbParams, store: &HandleStore) -> Value {
    let session = |requested: SessionHandle| store.session().unwrap_or(requested);
    let route = |requested: RouteHandle| store.route().unwrap_or(requested);

    let mut payload = Map::new();
    match params {
        VerbParams::GetPosition(p) => {
            payload.insert(VALUES_TO_RETURN.into(), json!(p.values_to_return));
        }
        VerbParams::GetAllRoutes | VerbParams::GetAllSessions => {}
        VerbParams::CreateRoute(p) | VerbParams::PauseSimulation(p) => {
            payload.insert(SESSION_HANDLE.into(), json!(session(p.session)));
        }
        VerbParams::SetSimulationMode(p) => {
            payload.insert(SESSION_HANDLE.into(), json!(session(p.session)));
            payload.insert(SIMULATION_MODE.into(), json!(p.simulation_mode));
        }
        VerbParams::CancelRouteCalculation(p) => {
            payload.insert(SESSION_HANDLE.into(), json!(session(p.session)));
            payload.insert(ROUTE.into(), json!(p.route));
        }
        VerbParams::CalculateRoute(p) => {
            payload.insert(SESSION_HANDLE.into(), json!(session(p.session)));
            payload.insert(ROUTE.into(), json!(route(p.route)));
        }
        VerbParams::SetWaypoints(p) => {
            payload.insert(SESSION_HANDLE.into(), json!(session(p.session)));
            payload.insert(ROUTE.into(), json!(route(p.route)));
            payload.insert(
                START_FROM_CURRENT_POSITION.into(),
                json!(p.start_from_current_position),
            );
            let waypoints: Vec<Value> = p
                .waypoints
                .iter()
                .map(|w| json!({ LATITUDE: w.latitude, LONGITUDE: w.longitude }))
                .collect();
            payload.insert(WAYPOINTS_LIST.into(), Value::Array(waypoints));
        }
    }

    let payload = Value::Object(payload);
    debug!(verb = %params.verb(), %payload, "encoded request");
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKey;
    use crate::handle::Waypoint;
    use crate::params::{
        GetPositionParams, RouteParams, SessionParams, SetSimulationModeParams, SetWaypointsParams,
        extract_params,
    };
    use crate::verb::Verb;

    fn cached(session: u32, route: u32) -> HandleStore {
        let mut store = HandleStore::new();
        store.set_session(SessionHandle(session));
        store.set_route(RouteHandle(route));
        store
    }

    #[test]
    fn test_unsupported_keys_never_reach_the_wire() {
        let params = extract_params(
            Verb::GetPosition,
            &json!({"valuesToReturn": [0x0010, 0x00a0, 0x00a4, 0x00a1]}),
        )
        .unwrap();
        let payload = encode_request(&params, &HandleStore::new());
        let keys: Vec<i64> = payload[VALUES_TO_RETURN]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_i64)
            .collect();
        assert_eq!(keys, vec![0x00a0, 0x00a1]);
        assert!(!keys.contains(&i64::from(FieldKey::Timestamp.code())));
        assert!(!keys.contains(&i64::from(FieldKey::Speed.code())));
    }

    #[test]
    fn test_parameterless_payloads_are_empty_objects() {
        let store = cached(3, 4);
        assert_eq!(encode_request(&VerbParams::GetAllRoutes, &store), json!({}));
        assert_eq!(encode_request(&VerbParams::GetAllSessions, &store), json!({}));
    }

    #[test]
    fn test_client_values_used_when_store_unset() {
        let params = VerbParams::CalculateRoute(RouteParams {
            session: SessionHandle(5),
            route: RouteHandle(6),
        });
        assert_eq!(
            encode_request(&params, &HandleStore::new()),
            json!({"sessionHandle": 5, "route": 6})
        );
    }

    #[test]
    fn test_cached_session_replaces_client_session() {
        let store = cached(100, 200);
        let pause = VerbParams::PauseSimulation(SessionParams {
            session: SessionHandle(1),
        });
        assert_eq!(encode_request(&pause, &store), json!({"sessionHandle": 100}));

        let mode = VerbParams::SetSimulationMode(SetSimulationModeParams {
            session: SessionHandle(1),
            simulation_mode: false,
        });
        assert_eq!(
            encode_request(&mode, &store),
            json!({"sessionHandle": 100, "simulationMode": false})
        );
    }

    #[test]
    fn test_cancel_keeps_client_route() {
        let store = cached(100, 200);
        let cancel = VerbParams::CancelRouteCalculation(RouteParams {
            session: SessionHandle(1),
            route: RouteHandle(2),
        });
        assert_eq!(
            encode_request(&cancel, &store),
            json!({"sessionHandle": 100, "route": 2})
        );

        let calculate = VerbParams::CalculateRoute(RouteParams {
            session: SessionHandle(1),
            route: RouteHandle(2),
        });
        assert_eq!(
            encode_request(&calculate, &store),
            json!({"sessionHandle": 100, "route": 200})
        );
    }

    #[test]
    fn test_set_waypoints_payload() {
        let mut store = HandleStore::new();
        store.set_route(RouteHandle(8));
        let params = VerbParams::SetWaypoints(SetWaypointsParams {
            session: SessionHandle(1),
            route: RouteHandle(2),
            start_from_current_position: true,
            waypoints: vec![Waypoint::new(35.5, 139.5), Waypoint::new(36.0, 140.0)],
        });
        assert_eq!(
            encode_request(&params, &store),
            json!({
                "sessionHandle": 1,
                "route": 8,
                "startFromCurrentPosition": true,
                "waypointsList": [
                    {"latitude": 35.5, "longitude": 139.5},
                    {"latitude": 36.0, "longitude": 140.0}
                ]
            })
        );
    }

    #[test]
    fn test_get_position_forwards_unknown_codes() {
        let params = VerbParams::GetPosition(GetPositionParams {
            values_to_return: vec![0x00a3, 0x0777],
        });
        assert_eq!(
            encode_request(&params, &HandleStore::new()),
            json!({"valuesToReturn": [0x00a3, 0x0777]})
        );
    }
}
