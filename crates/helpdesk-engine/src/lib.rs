//! helpdesk-engine: Headless controller for the helpdesk support widget
//!
//! This crate provides everything except drawing:
//! - The message log and session continuity
//! - The visibility gate (trigger vs. panel)
//! - The send cycle against the assistant service, with failure fallback
//! - Configuration and failure diagnostics

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod message;
pub mod state;
pub mod transport;
pub mod visibility;

// Re-export commonly used types
pub use config::{ConfigError, StaleResponsePolicy, WidgetConfig};
pub use controller::{Controller, InputKey, PendingTurn, TurnOutcome};
pub use diagnostics::{Diagnostics, FailureRecord};
pub use message::{Message, Role, FALLBACK_MESSAGE, GREETING};
pub use state::{ControllerState, DisplayItem};
pub use transport::{
    ChatRequest, ChatResponse, ChatTransport, FailureKind, HealthStatus, HttpTransport,
    TransportError,
};
pub use visibility::Visibility;

use std::sync::Arc;

/// Mount a controller talking HTTP to the service described by `config`.
pub fn connect(config: &WidgetConfig) -> Result<Controller, TransportError> {
    let transport = HttpTransport::new(config)?;
    Ok(Controller::new(Arc::new(transport)).with_stale_responses(config.stale_responses))
}

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
