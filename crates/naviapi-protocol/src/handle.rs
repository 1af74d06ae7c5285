//! Session and route handles, and the single-slot store that caches them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Opaque navigation session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(pub u32);

impl SessionHandle {
    /// Sentinel for "no session"; never serialized to clients.
    pub const INVALID: SessionHandle = SessionHandle(0x0000);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque route identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteHandle(pub u32);

impl fmt::Display for RouteHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A route destination or intermediate point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Sessions known to the service, keyed by handle in ascending order
pub type SessionRegistry = BTreeMap<SessionHandle, String>;

/// The current session and route handles.
///
/// Each slot holds at most one handle; setting replaces. Nothing ever clears a
/// slot once set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleStore {
    session: Option<SessionHandle>,
    route: Option<RouteHandle>,
}

impl HandleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<SessionHandle> {
        self.session
    }

    pub fn route(&self) -> Option<RouteHandle> {
        self.route
    }

    pub fn set_session(&mut self, session: SessionHandle) {
        if self.session != Some(session) {
            info!(previous = ?self.session, current = %session, "session handle updated");
        }
        self.session = Some(session);
    }

    pub fn set_route(&mut self, route: RouteHandle) {
        if self.route != Some(route) {
            info!(previous = ?self.route, current = %route, "route handle updated");
        }
        self.route = Some(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_starts_unset() {
        let store = HandleStore::new();
        assert_eq!(store.session(), None);
        assert_eq!(store.route(), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut store = HandleStore::new();
        store.set_route(RouteHandle(4));
        store.set_route(RouteHandle(9));
        store.set_session(SessionHandle(2));
        assert_eq!(store.route(), Some(RouteHandle(9)));
        assert_eq!(store.session(), Some(SessionHandle(2)));
    }

    #[test]
    fn test_registry_is_ordered_by_handle() {
        let mut registry = SessionRegistry::new();
        registry.insert(SessionHandle(30), "c".to_string());
        registry.insert(SessionHandle(10), "a".to_string());
        assert_eq!(registry.keys().next(), Some(&SessionHandle(10)));
        assert!(!SessionHandle::INVALID.is_valid());
    }
}
