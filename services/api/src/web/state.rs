//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the error helpers handlers use with it.

use crate::config::Config;
use crate::error::ApiError;
use coursehub_core::assistant::ChatAssistant;
use coursehub_core::ports::{DatabaseService, PortError};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    /// `None` when no Gemini API key is configured.
    pub assistant: Option<ChatAssistant>,
}

impl AppState {
    /// Logs an unexpected failure and turns it into a 500. The underlying error is only
    /// passed to the client outside production.
    pub fn internal_error(&self, context: &str, err: impl Display) -> ApiError {
        error!("{}: {}", context, err);
        ApiError::Internal {
            message: context.to_string(),
            detail: (!self.config.is_production()).then(|| err.to_string()),
        }
    }

    /// Maps a port error onto the matching HTTP error.
    pub fn port_error(&self, context: &str, err: PortError) -> ApiError {
        match err {
            PortError::NotFound(message) => ApiError::NotFound(message),
            PortError::Unexpected(_) => self.internal_error(context, err),
        }
    }
}
