//! Client configuration.

use std::time::Duration;

/// Backend used when none is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// How long the success indicator stays up after a submission.
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_millis(2000);

/// Settings shared by the backend and the form controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/api/...` paths are appended to.
    pub base_url: String,
    /// Display interval of the success indicator.
    pub success_display: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the success display interval.
    #[must_use]
    pub const fn success_display(mut self, interval: Duration) -> Self {
        self.success_display = interval;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            success_display: DEFAULT_SUCCESS_DISPLAY,
        }
    }
}
