//! Declarative field tables for inbound verb parameters.
//!
//! Every verb lists the fields it reads, the JSON kind each must have and the
//! filter applied to its contents. [`validate`] is the one place where inbound
//! client documents are checked; it fails closed on the first missing required
//! field or kind mismatch.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{ParamError, ProtocolResult};
use crate::field::FieldKey;
use crate::handle::Waypoint;
use crate::verb::Verb;

pub const SESSION_HANDLE: &str = "sessionHandle";
pub const ROUTE: &str = "route";
pub const SIMULATION_MODE: &str = "simulationMode";
pub const START_FROM_CURRENT_POSITION: &str = "startFromCurrentPosition";
pub const WAYPOINTS_LIST: &str = "waypointsList";
pub const VALUES_TO_RETURN: &str = "valuesToReturn";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";

/// Expected JSON shape of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Integer that fits a u32 handle
    Handle,
    /// JSON boolean
    Flag,
    /// Array of integers naming position fields
    FieldKeyList,
    /// Array of `{latitude, longitude}` objects
    WaypointList,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Handle => "integer",
            FieldKind::Flag => "boolean",
            FieldKind::FieldKeyList | FieldKind::WaypointList => "array",
        };
        f.write_str(name)
    }
}

/// What to do with array contents after the kind check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRule {
    Keep,
    /// Drop TIMESTAMP and SPEED codes without failing
    DropUnsupportedKeys,
    /// Skip elements lacking a numeric coordinate; fail if none remain
    SkipIncompleteWaypoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub filter: FilterRule,
}

impl FieldSpec {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            filter: FilterRule::Keep,
        }
    }

    const fn filtered(self, filter: FilterRule) -> Self {
        Self { filter, ..self }
    }
}

/// Fields read for one verb, in validation order
#[derive(Debug, Clone, Copy)]
pub struct VerbSchema {
    pub verb: Verb,
    pub fields: &'static [FieldSpec],
}

const NO_FIELDS: &[FieldSpec] = &[];

const GET_POSITION_FIELDS: &[FieldSpec] = &[FieldSpec::required(
    VALUES_TO_RETURN,
    FieldKind::FieldKeyList,
)
.filtered(FilterRule::DropUnsupportedKeys)];

const SESSION_FIELDS: &[FieldSpec] = &[FieldSpec::required(SESSION_HANDLE, FieldKind::Handle)];

const SIMULATION_MODE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(SESSION_HANDLE, FieldKind::Handle),
    FieldSpec::required(SIMULATION_MODE, FieldKind::Flag),
];

const ROUTE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(SESSION_HANDLE, FieldKind::Handle),
    FieldSpec::required(ROUTE, FieldKind::Handle),
];

const WAYPOINT_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(SESSION_HANDLE, FieldKind::Handle),
    FieldSpec::required(ROUTE, FieldKind::Handle),
    FieldSpec::required(START_FROM_CURRENT_POSITION, FieldKind::Flag),
    FieldSpec::required(WAYPOINTS_LIST, FieldKind::WaypointList)
        .filtered(FilterRule::SkipIncompleteWaypoints),
];

/// Field table for a verb
pub fn schema_for(verb: Verb) -> VerbSchema {
    let fields = match verb {
        Verb::GetPosition => GET_POSITION_FIELDS,
        Verb::GetAllRoutes | Verb::GetAllSessions => NO_FIELDS,
        Verb::CreateRoute | Verb::PauseSimulation => SESSION_FIELDS,
        Verb::SetSimulationMode => SIMULATION_MODE_FIELDS,
        Verb::CancelRouteCalculation | Verb::CalculateRoute => ROUTE_FIELDS,
        Verb::SetWaypoints => WAYPOINT_FIELDS,
    };
    VerbSchema { verb, fields }
}

/// A field value that passed validation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Handle(u32),
    Flag(bool),
    FieldKeys(Vec<i32>),
    Waypoints(Vec<Waypoint>),
}

/// Validated fields of one document, by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedFields {
    values: HashMap<&'static str, FieldValue>,
}

impl ValidatedFields {
    pub fn handle(&self, name: &'static str) -> ProtocolResult<u32> {
        match self.values.get(name) {
            Some(FieldValue::Handle(v)) => Ok(*v),
            Some(_) => Err(mismatch(name, FieldKind::Handle)),
            None => Err(ParamError::MissingField { field: name }),
        }
    }

    pub fn flag(&self, name: &'static str) -> ProtocolResult<bool> {
        match self.values.get(name) {
            Some(FieldValue::Flag(v)) => Ok(*v),
            Some(_) => Err(mismatch(name, FieldKind::Flag)),
            None => Err(ParamError::MissingField { field: name }),
        }
    }

    pub fn field_keys(&self, name: &'static str) -> ProtocolResult<Vec<i32>> {
        match self.values.get(name) {
            Some(FieldValue::FieldKeys(v)) => Ok(v.clone()),
            Some(_) => Err(mismatch(name, FieldKind::FieldKeyList)),
            None => Err(ParamError::MissingField { field: name }),
        }
    }

    pub fn waypoints(&self, name: &'static str) -> ProtocolResult<Vec<Waypoint>> {
        match self.values.get(name) {
            Some(FieldValue::Waypoints(v)) => Ok(v.clone()),
            Some(_) => Err(mismatch(name, FieldKind::WaypointList)),
            None => Err(ParamError::MissingField { field: name }),
        }
    }
}

fn mismatch(field: &'static str, expected: FieldKind) -> ParamError {
    ParamError::TypeMismatch { field, expected }
}

/// Check `document` against `schema`.
pub fn validate(schema: &VerbSchema, document: &Value) -> ProtocolResult<ValidatedFields> {
    // Parameterless verbs never look at the document
    if schema.fields.is_empty() {
        return Ok(ValidatedFields::default());
    }
    let Value::Object(object) = document else {
        return Err(ParamError::NotAnObject);
    };

    // Presence first, then kinds, so a missing key is reported before a bad one.
    for spec in schema.fields.iter().filter(|s| s.required) {
        if !object.contains_key(spec.name) {
            warn!(verb = %schema.verb, field = spec.name, "required key not found");
            return Err(ParamError::MissingField { field: spec.name });
        }
    }

    let mut validated = ValidatedFields::default();
    for spec in schema.fields {
        let Some(raw) = object.get(spec.name) else {
            continue;
        };
        let value = check_field(spec, raw).inspect_err(|e| {
            warn!(verb = %schema.verb, field = spec.name, error = %e, "field rejected");
        })?;
        validated.values.insert(spec.name, value);
    }

    debug!(verb = %schema.verb, fields = validated.values.len(), "parameters validated");
    Ok(validated)
}

fn check_field(spec: &FieldSpec, raw: &Value) -> ProtocolResult<FieldValue> {
    match spec.kind {
        FieldKind::Handle => as_handle(raw)
            .map(FieldValue::Handle)
            .ok_or(mismatch(spec.name, spec.kind)),
        FieldKind::Flag => raw
            .as_bool()
            .map(FieldValue::Flag)
            .ok_or(mismatch(spec.name, spec.kind)),
        FieldKind::FieldKeyList => {
            let elements = raw.as_array().ok_or(mismatch(spec.name, spec.kind))?;
            let mut keys = Vec::with_capacity(elements.len());
            for element in elements {
                let code = element
                    .as_i64()
                    .and_then(|c| i32::try_from(c).ok())
                    .ok_or(ParamError::InvalidElement { field: spec.name })?;
                if spec.filter == FilterRule::DropUnsupportedKeys && is_unsupported_code(code) {
                    debug!(code, "dropping unsupported field key");
                    continue;
                }
                keys.push(code);
            }
            Ok(FieldValue::FieldKeys(keys))
        }
        FieldKind::WaypointList => {
            let elements = raw.as_array().ok_or(mismatch(spec.name, spec.kind))?;
            let mut waypoints = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                match as_waypoint(element) {
                    Some(waypoint) => waypoints.push(waypoint),
                    None => warn!(index, "key latitude or longitude not found, waypoint skipped"),
                }
            }
            if spec.filter == FilterRule::SkipIncompleteWaypoints && waypoints.is_empty() {
                return Err(ParamError::NoValidWaypoints { field: spec.name });
            }
            Ok(FieldValue::Waypoints(waypoints))
        }
    }
}

fn as_handle(raw: &Value) -> Option<u32> {
    raw.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn as_waypoint(element: &Value) -> Option<Waypoint> {
    let latitude = element.get(LATITUDE)?.as_f64()?;
    let longitude = element.get(LONGITUDE)?.as_f64()?;
    Some(Waypoint::new(latitude, longitude))
}

fn is_unsupported_code(code: i32) -> bool {
    FieldKey::from_code(i64::from(code)).is_some_and(|key| !key.is_supported())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_verb_has_a_schema() {
        for verb in Verb::ALL {
            assert_eq!(schema_for(verb).verb, verb);
        }
        assert!(schema_for(Verb::GetAllSessions).fields.is_empty());
    }

    #[test]
    fn test_missing_reported_before_mismatch() {
        let schema = schema_for(Verb::SetSimulationMode);
        let err = validate(&schema, &json!({"sessionHandle": "x"})).unwrap_err();
        assert_eq!(
            err,
            ParamError::MissingField {
                field: SIMULATION_MODE
            }
        );
    }

    #[test]
    fn test_handle_must_fit_u32() {
        let schema = schema_for(Verb::CreateRoute);
        assert!(validate(&schema, &json!({"sessionHandle": -1})).is_err());
        assert!(validate(&schema, &json!({"sessionHandle": 4294967296u64})).is_err());
        assert!(validate(&schema, &json!({"sessionHandle": 1.5})).is_err());
        let fields = validate(&schema, &json!({"sessionHandle": 4294967295u64})).unwrap();
        assert_eq!(fields.handle(SESSION_HANDLE), Ok(u32::MAX));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let schema = schema_for(Verb::PauseSimulation);
        let fields = validate(&schema, &json!({"sessionHandle": 3, "extra": [1, 2]})).unwrap();
        assert_eq!(fields.handle(SESSION_HANDLE), Ok(3));
    }

    #[test]
    fn test_non_object_documents() {
        for verb in [Verb::GetAllRoutes, Verb::GetAllSessions] {
            let schema = schema_for(verb);
            for document in [Value::Null, json!([]), json!("x"), json!(7)] {
                assert_eq!(validate(&schema, &document), Ok(ValidatedFields::default()));
            }
        }
        assert_eq!(
            validate(&schema_for(Verb::CreateRoute), &json!([1])).unwrap_err(),
            ParamError::NotAnObject
        );
    }

    #[test]
    fn test_waypoint_with_string_coordinate_is_skipped() {
        let schema = schema_for(Verb::SetWaypoints);
        let fields = validate(
            &schema,
            &json!({
                "sessionHandle": 1,
                "route": 2,
                "startFromCurrentPosition": false,
                "waypointsList": [
                    {"latitude": "35.6", "longitude": 139.7},
                    {"latitude": 35.6, "longitude": 139.7}
                ]
            }),
        )
        .unwrap();
        assert_eq!(
            fields.waypoints(WAYPOINTS_LIST).unwrap(),
            vec![Waypoint::new(35.6, 139.7)]
        );
    }
}
