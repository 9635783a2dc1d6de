//! # Vigil Core
//!
//! The detection engine of the vigil proxy. It watches decoded packets in both
//! directions for every connected player and decides, per client packet,
//! whether it is forwarded, which checks flag it and whether the player is
//! disconnected.
//!
//! Entry points are [`session::Session`] for a single connection and
//! [`server::Server`] for the fixed-rate tick shared by all of them.

pub mod check;
pub mod combat;
pub mod config;
pub mod dispatcher;
pub mod entity;
pub mod handler;
pub mod player;
pub mod server;
pub mod session;

pub use check::{Check, CheckId, CheckKind, FlagParams, ParamValue, ViolationTracker};
pub use combat::CombatValidator;
pub use config::{ConfigError, VigilConfig};
pub use dispatcher::{DispatchOutcome, Dispatcher, FlagEvent};
pub use entity::{EntityRegistry, TrackedEntity};
pub use handler::{ClientConnection, DetectionHandler, NopHandler};
pub use player::acknowledgements::AcknowledgementCorrelator;
pub use player::{Player, WorldState};
pub use session::{Session, SessionError, SessionRegistry};
