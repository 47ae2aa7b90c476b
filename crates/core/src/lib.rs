//! Cabin core: the domain logic of the in-vehicle voice assistant.
//!
//! Everything here is pure and synchronous: free text goes in, a
//! [`Command`](command::Command) comes out of the classifier, an executor
//! turns it into a state transition on the mock vehicle and a
//! human-readable reply. Speech recognition, synthesis, and transport all
//! live in the service crate; this crate never does IO.

pub mod command;
pub mod dialog;
pub mod executor;
pub mod intent;
pub mod media;
pub mod system;
pub mod vehicle;

pub use command::{Command, CommandCategory, CommandResult, CommandType};
pub use dialog::{DialogLog, DialogMessage, DialogRole};
pub use executor::{Assistant, GUIDANCE, WELCOME};
pub use intent::{QUICK_ACTIONS, QuickAction, parse};
pub use media::MediaState;
pub use system::SystemSettings;
pub use vehicle::VehicleState;
