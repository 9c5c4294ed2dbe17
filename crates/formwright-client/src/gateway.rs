//! Submission gateway and the admin-side catalog client.

use std::sync::Arc;

use formwright_core::{CategoryDraft, FormValues, SearchQuery};
use serde::Serialize;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::{CatalogError, ClientError, Result, SubmissionError};

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Body returned by the backend (`null` when empty).
    pub response: serde_json::Value,
}

/// Sends form snapshots to the backend.
pub struct SubmissionGateway<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: ?Sized> Clone for SubmissionGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend + ?Sized> SubmissionGateway<B> {
    /// Creates a gateway over a shared backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Submits a snapshot of the form values.
    ///
    /// Transport failures and non-success responses both come back as
    /// [`SubmissionError`].
    pub async fn submit(
        &self,
        snapshot: FormValues,
    ) -> std::result::Result<SubmissionReceipt, SubmissionError> {
        match self.backend.submit(&snapshot).await {
            Ok(response) => {
                info!(fields = snapshot.len(), "form submitted");
                Ok(SubmissionReceipt { response })
            }
            Err(e) => {
                warn!(error = %e, "form submission failed");
                Err(e.into())
            }
        }
    }
}

/// Message used when the backend gives no reason for refusing a category.
const CATEGORY_REJECTED: &str = "Failed to create category";

/// Category creation and record search.
pub struct CatalogClient<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: Backend + ?Sized> CatalogClient<B> {
    /// Creates a catalog client over a shared backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Validates and creates a category.
    pub async fn create_category(
        &self,
        draft: &CategoryDraft,
    ) -> std::result::Result<serde_json::Value, CatalogError> {
        draft.validate()?;

        self.backend.create_category(draft).await.map_err(|e| {
            warn!(error = %e, name = %draft.name, "category creation failed");
            match e {
                ClientError::Status {
                    detail: Some(detail),
                    ..
                } => CatalogError::Rejected(detail),
                _ => CatalogError::Rejected(CATEGORY_REJECTED.to_string()),
            }
        })
    }

    /// Searches records.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<serde_json::Value>> {
        self.backend.search(query).await
    }
}
