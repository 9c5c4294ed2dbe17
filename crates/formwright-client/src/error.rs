//! Error types for backend access and form control.

use std::fmt;

use formwright_core::{CategoryId, FieldErrors, SchemaError};
use thiserror::Error;

use crate::controller::Phase;

/// Errors talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The configured backend URL cannot be used.
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body detail when present, else the status reason phrase.
        message: String,
        /// `error` field of the response body, when present.
        detail: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Builds a status error from a code, reason and optional body detail.
    pub fn status(status: u16, reason: impl Into<String>, detail: Option<String>) -> Self {
        Self::Status {
            status,
            message: detail.clone().unwrap_or_else(|| reason.into()),
            detail,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// The independently loaded schema resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaResource {
    BasicFields,
    Categories,
    CategoryFields,
}

impl fmt::Display for SchemaResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BasicFields => "basic fields",
            Self::Categories => "categories",
            Self::CategoryFields => "category fields",
        })
    }
}

/// A schema resource failed to load.
///
/// Non-fatal: the affected section shows the message, the rest of the form
/// stays usable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Error fetching {resource}: {source}")]
pub struct SchemaLoadError {
    pub resource: SchemaResource,
    #[source]
    pub source: ClientError,
}

/// A submission was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Form submission failed: {message}")]
pub struct SubmissionError {
    pub message: String,
}

impl From<ClientError> for SubmissionError {
    fn from(e: ClientError) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

/// Category creation was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The draft failed local checks and was not sent.
    #[error(transparent)]
    Invalid(#[from] SchemaError),

    /// The backend refused the draft or could not be reached.
    #[error("{0}")]
    Rejected(String),
}

/// A user action the form controller refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ControllerError {
    /// The key does not belong to any active field.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The category is not in the loaded catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),

    /// The action is not allowed in the current phase.
    #[error("form is busy ({0})")]
    Busy(Phase),

    /// The schemas have not been requested or have not resolved yet.
    #[error("form is not ready ({0})")]
    NotReady(Phase),

    /// The selected category's fields are still loading.
    #[error("category fields are still loading")]
    CategoryFieldsLoading,

    /// Submission was blocked by field errors.
    #[error("form has validation errors")]
    ValidationFailed(FieldErrors),
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, ClientError>;
