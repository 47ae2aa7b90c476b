//! WebSocket Session Management
//!
//! This module contains the logic for driving assistant sessions over
//! WebSockets. It is structured into submodules for clarity:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `session`: Manages the WebSocket connection lifecycle, from handshake to termination.
//! - `cycle`: Runs one utterance through the classifier and executors.
//! - `provider`: The speech-vendor boundary (recognition and synthesis).

mod cycle;
pub mod protocol;
mod provider;
pub mod session;

pub use session::ws_handler;
