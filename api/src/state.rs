//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::config::LogQueryConfig;
use shared::service::{LogQueryService, ServiceError};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the one query service of the process; every handler borrows it read-only.
#[derive(Clone)]
pub struct AppState {
    service: Arc<LogQueryService>,
}

impl AppState {
    /// Creates a new application state around `service`.
    #[must_use]
    pub fn new(service: LogQueryService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Validates `config`, opens the log directory, and builds the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the log directory cannot be
    /// opened.
    pub async fn open(config: &LogQueryConfig) -> Result<Self, ServiceError> {
        Ok(Self::new(LogQueryService::open(config).await?))
    }

    /// Returns the query service.
    #[must_use]
    pub fn service(&self) -> &LogQueryService {
        &self.service
    }
}
