use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// API namespace the verbs live under on the remote side
pub const API_NAME: &str = "naviapi";

/// The navigation operations carried by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    GetPosition,
    GetAllRoutes,
    CreateRoute,
    PauseSimulation,
    SetSimulationMode,
    CancelRouteCalculation,
    SetWaypoints,
    CalculateRoute,
    GetAllSessions,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Verb::GetPosition,
        Verb::GetAllRoutes,
        Verb::CreateRoute,
        Verb::PauseSimulation,
        Verb::SetSimulationMode,
        Verb::CancelRouteCalculation,
        Verb::SetWaypoints,
        Verb::CalculateRoute,
        Verb::GetAllSessions,
    ];

    /// Wire name; also what the service echoes in `request.info`.
    pub fn name(self) -> &'static str {
        match self {
            Verb::GetPosition => "navicore_getposition",
            Verb::GetAllRoutes => "navicore_getallroutes",
            Verb::CreateRoute => "navicore_createroute",
            Verb::PauseSimulation => "navicore_pausesimulation",
            Verb::SetSimulationMode => "navicore_setsimulationmode",
            Verb::CancelRouteCalculation => "navicore_cancelroutecalculation",
            Verb::SetWaypoints => "navicore_setwaypoints",
            Verb::CalculateRoute => "navicore_calculateroute",
            Verb::GetAllSessions => "navicore_getallsessions",
        }
    }

    /// Verbs whose reply carries no data the adapter uses
    pub fn is_acknowledgement(self) -> bool {
        matches!(
            self,
            Verb::PauseSimulation
                | Verb::SetSimulationMode
                | Verb::CancelRouteCalculation
                | Verb::SetWaypoints
                | Verb::CalculateRoute
        )
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Verb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.name() == s)
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

impl Serialize for Verb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Verb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verb: {0}")]
pub struct UnknownVerb(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for verb in Verb::ALL {
            assert_eq!(verb.name().parse::<Verb>(), Ok(verb));
        }
        assert!("navicore_reroute".parse::<Verb>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_name() {
        let encoded = serde_json::to_value(Verb::CalculateRoute).unwrap();
        assert_eq!(encoded, serde_json::json!("navicore_calculateroute"));
        let decoded: Verb = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, Verb::CalculateRoute);
        assert!(serde_json::from_value::<Verb>(serde_json::json!("getposition")).is_err());
    }

    #[test]
    fn test_acknowledgement_verbs() {
        let acks = Verb::ALL.iter().filter(|v| v.is_acknowledgement()).count();
        assert_eq!(acks, 5);
        assert!(!Verb::CreateRoute.is_acknowledgement());
    }
}
