// Library crate: the zone pipeline, transports and the command protocol.
// The `zonewall` binary is a thin headless host on top of it.

pub mod build;
pub mod command;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod harness;
pub mod notify;
pub mod remote;
pub mod session;
pub mod state;
pub mod validation;

pub use error::ZoneError;
pub use session::{SharedSession, ZoneSession};
