//! Application state shared across handlers.

use std::sync::Arc;

use crate::machine::IntakeMachine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The per-client conversation state machine.
    pub machine: Arc<IntakeMachine>,
}

impl AppState {
    /// Create new application state.
    pub fn new(machine: Arc<IntakeMachine>) -> Self {
        Self { machine }
    }
}
