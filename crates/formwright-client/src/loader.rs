//! Schema loader: fetches the three schema resources and maps them to load states.
//!
//! Failures never escape as errors here; callers observe
//! [`LoadState::Failed`] carrying a display message.

use std::sync::Arc;

use formwright_core::registry::{basic_renderable, category_renderable};
use formwright_core::{Category, CategoryId, FieldDescriptor, LoadState};
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::{ClientError, SchemaLoadError, SchemaResource};

fn resolve<T>(resource: SchemaResource, result: Result<T, ClientError>) -> LoadState<T> {
    if let Err(source) = &result {
        warn!(%resource, error = %source, "schema load failed");
    }
    LoadState::from_result(result.map_err(|source| SchemaLoadError { resource, source }))
}

/// Loads field and category schemas from a [`Backend`].
pub struct SchemaLoader<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: ?Sized> Clone for SchemaLoader<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: Backend + ?Sized> SchemaLoader<B> {
    /// Creates a loader over a shared backend.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Loads the renderable basic fields.
    pub async fn load_basic_fields(&self) -> LoadState<Vec<FieldDescriptor>> {
        debug!("loading basic fields");
        let result = self.backend.basic_fields().await;
        resolve(SchemaResource::BasicFields, result).map(|schema| basic_renderable(&schema))
    }

    /// Loads the category catalog.
    pub async fn load_categories(&self) -> LoadState<Vec<Category>> {
        debug!("loading categories");
        let result = self.backend.categories().await;
        resolve(SchemaResource::Categories, result)
    }

    /// Loads the fields of a category.
    ///
    /// No category (or an empty id) resolves to an empty field list without a
    /// backend call.
    pub async fn load_category_fields(
        &self,
        category: Option<&CategoryId>,
    ) -> LoadState<Vec<FieldDescriptor>> {
        let Some(category) = category.filter(|c| !c.is_empty()) else {
            return LoadState::Loaded(Vec::new());
        };

        debug!(%category, "loading category fields");
        let result = self.backend.category_fields(category).await;
        resolve(SchemaResource::CategoryFields, result)
            .map(|schema| category_renderable(&schema, category))
    }
}
