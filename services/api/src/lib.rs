//! Cabin API Library Crate
//!
//! This library contains all the logic for the voice-assistant web
//! service: application state, the in-memory session store, REST
//! handlers, WebSocket session logic, the speech-provider boundary, and
//! routing. The binaries are thin wrappers around this library.

pub mod audio;
pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod store;
pub mod ws;
