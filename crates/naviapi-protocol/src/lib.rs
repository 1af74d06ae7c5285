//! # Navigation verb protocol
//!
//! Pure data model and JSON codecs for the `naviapi` verbs. Nothing here performs I/O:
//!
//! - [`params`] turns inbound client JSON into typed parameters, driven by the
//!   declarative field tables in [`schema`].
//! - [`encode`] builds the payload sent to the remote navigation service.
//! - [`decode`] turns the service's asynchronous replies into typed values.
//! - [`reply`] renders typed results back into client-facing JSON.
//!
//! Handle state ([`HandleStore`]) is a plain value here; ownership and locking are
//! the client's concern.

pub mod decode;
pub mod encode;
pub mod error;
pub mod field;
pub mod handle;
pub mod params;
pub mod reply;
pub mod schema;
pub mod verb;

pub use decode::{DecodedReply, decode_reply};
pub use encode::encode_request;
pub use error::{ParamError, ProtocolResult};
pub use field::{FieldKey, PositionMap, TypedValue};
pub use handle::{HandleStore, RouteHandle, SessionHandle, SessionRegistry, Waypoint};
pub use params::{
    GetPositionParams, RouteParams, SessionParams, SetSimulationModeParams, SetWaypointsParams,
    VerbParams, extract_params,
};
pub use reply::ApiResponse;
pub use verb::{API_NAME, Verb};
