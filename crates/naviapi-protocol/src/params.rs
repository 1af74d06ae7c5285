//! Typed parameters for each verb, extracted from inbound client JSON

use serde_json::Value;

use crate::error::ProtocolResult;
use crate::handle::{RouteHandle, SessionHandle, Waypoint};
use crate::schema::{
    ROUTE, SESSION_HANDLE, SIMULATION_MODE, START_FROM_CURRENT_POSITION, VALUES_TO_RETURN,
    WAYPOINTS_LIST, schema_for, validate,
};
use crate::verb::Verb;

/// Field codes to fetch. Unsupported keys are already removed; codes the adapter
/// does not know are passed through for the service to judge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPositionParams {
    pub values_to_return: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionParams {
    pub session: SessionHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSimulationModeParams {
    pub session: SessionHandle,
    pub simulation_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteParams {
    pub session: SessionHandle,
    pub route: RouteHandle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetWaypointsParams {
    pub session: SessionHandle,
    pub route: RouteHandle,
    pub start_from_current_position: bool,
    pub waypoints: Vec<Waypoint>,
}

/// Parameters of any verb
#[derive(Debug, Clone, PartialEq)]
pub enum VerbParams {
    GetPosition(GetPositionParams),
    GetAllRoutes,
    CreateRoute(SessionParams),
    PauseSimulation(SessionParams),
    SetSimulationMode(SetSimulationModeParams),
    CancelRouteCalculation(RouteParams),
    SetWaypoints(SetWaypointsParams),
    CalculateRoute(RouteParams),
    GetAllSessions,
}

impl VerbParams {
    pub fn verb(&self) -> Verb {
        match self {
            VerbParams::GetPosition(_) => Verb::GetPosition,
            VerbParams::GetAllRoutes => Verb::GetAllRoutes,
            VerbParams::CreateRoute(_) => Verb::CreateRoute,
            VerbParams::PauseSimulation(_) => Verb::PauseSimulation,
            VerbParams::SetSimulationMode(_) => Verb::SetSimulationMode,
            VerbParams::CancelRouteCalculation(_) => Verb::CancelRouteCalculation,
            VerbParams::SetWaypoints(_) => Verb::SetWaypoints,
            VerbParams::CalculateRoute(_) => Verb::CalculateRoute,
            VerbParams::GetAllSessions => Verb::GetAllSessions,
        }
    }
}

/// Validate `document` for `verb` and build its typed parameters.
pub fn extract_params(verb: Verb, document: &Value) -> ProtocolResult<VerbParams> {
    let fields = validate(&schema_for(verb), document)?;

    let session = || fields.handle(SESSION_HANDLE).map(SessionHandle);
    let route = || fields.handle(ROUTE).map(RouteHandle);

    let params = match verb {
        Verb::GetPosition => VerbParams::GetPosition(GetPositionParams {
            values_to_return: fields.field_keys(VALUES_TO_RETURN)?,
        }),
        Verb::GetAllRoutes => VerbParams::GetAllRoutes,
        Verb::CreateRoute => VerbParams::CreateRoute(SessionParams { session: session()? }),
        Verb::PauseSimulation => VerbParams::PauseSimulation(SessionParams { session: session()? }),
        Verb::SetSimulationMode => VerbParams::SetSimulationMode(SetSimulationModeParams {
            session: session()?,
            simulation_mode: fields.flag(SIMULATION_MODE)?,
        }),
        Verb::CancelRouteCalculation => VerbParams::CancelRouteCalculation(RouteParams {
            session: session()?,
            route: route()?,
        }),
        Verb::SetWaypoints => VerbParams::SetWaypoints(SetWaypointsParams {
            session: session()?,
            route: route()?,
            start_from_current_position: fields.flag(START_FROM_CURRENT_POSITION)?,
            waypoints: fields.waypoints(WAYPOINTS_LIST)?,
        }),
        Verb::CalculateRoute => VerbParams::CalculateRoute(RouteParams {
            session: session()?,
            route: route()?,
        }),
        Verb::GetAllSessions => VerbParams::GetAllSessions,
    };
    Ok(params)
}
