//! Transport seam between the form engine and the HTTP backend.

use std::future::Future;
use std::pin::Pin;

use formwright_core::schema::{
    BasicFieldsPayload, CategoriesPayload, CategoryFieldsPayload, ErrorPayload, SearchPayload,
};
use formwright_core::{
    BasicFieldSchema, Category, CategoryDraft, CategoryFieldSchema, CategoryId, FormValues,
    SearchQuery,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// A boxed future for async backend operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The backend endpoints the form engine consumes.
///
/// Every method either yields the decoded payload or a [`ClientError`]
/// describing the transport failure, non-success status or decode failure.
pub trait Backend: Send + Sync {
    /// `GET /api/basicfields`
    fn basic_fields(&self) -> BoxFuture<'_, Result<Vec<BasicFieldSchema>>>;

    /// `GET /api/categories`
    fn categories(&self) -> BoxFuture<'_, Result<Vec<Category>>>;

    /// `GET /api/categories/{id}/fields`
    fn category_fields<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> BoxFuture<'a, Result<Vec<CategoryFieldSchema>>>;

    /// `POST /api/submit`
    fn submit<'a>(&'a self, values: &'a FormValues) -> BoxFuture<'a, Result<serde_json::Value>>;

    /// `POST /api/categories`
    fn create_category<'a>(
        &'a self,
        draft: &'a CategoryDraft,
    ) -> BoxFuture<'a, Result<serde_json::Value>>;

    /// `GET /api/search`
    fn search<'a>(&'a self, query: &'a SearchQuery)
        -> BoxFuture<'a, Result<Vec<serde_json::Value>>>;
}

/// Returns the text shown for a non-success response.
///
/// The `error` field of a JSON body wins; otherwise the status reason phrase.
pub(crate) fn failure_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.error)
        .filter(|e| !e.trim().is_empty())
}

fn status_error(status: StatusCode, body: &str) -> ClientError {
    let reason = status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string);
    ClientError::status(status.as_u16(), reason, failure_detail(body))
}

/// Checks the status and decodes a JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    Ok(response.json::<T>().await?)
}

/// Checks the status and decodes an arbitrary, possibly empty, JSON body.
async fn decode_value(response: Response) -> Result<serde_json::Value> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(status_error(status, &body));
    }
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

/// [`Backend`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Creates a backend for the configured base URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    /// Builds the URL of an endpoint from path segments.
    ///
    /// Segments are percent-encoded, so opaque ids are safe to pass through.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Backend for HttpBackend {
    fn basic_fields(&self) -> BoxFuture<'_, Result<Vec<BasicFieldSchema>>> {
        Box::pin(async move {
            let url = self.url(&["api", "basicfields"])?;
            debug!(%url, "GET basic fields");
            let payload: BasicFieldsPayload = decode(self.client.get(url).send().await?).await?;
            Ok(payload.fields)
        })
    }

    fn categories(&self) -> BoxFuture<'_, Result<Vec<Category>>> {
        Box::pin(async move {
            let url = self.url(&["api", "categories"])?;
            debug!(%url, "GET categories");
            let payload: CategoriesPayload = decode(self.client.get(url).send().await?).await?;
            Ok(payload.categories)
        })
    }

    fn category_fields<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> BoxFuture<'a, Result<Vec<CategoryFieldSchema>>> {
        Box::pin(async move {
            let url = self.url(&["api", "categories", category.as_str(), "fields"])?;
            debug!(%url, "GET category fields");
            let payload: CategoryFieldsPayload =
                decode(self.client.get(url).send().await?).await?;
            Ok(payload.fields)
        })
    }

    fn submit<'a>(&'a self, values: &'a FormValues) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            let url = self.url(&["api", "submit"])?;
            debug!(%url, fields = values.len(), "POST submission");
            decode_value(self.client.post(url).json(values).send().await?).await
        })
    }

    fn create_category<'a>(
        &'a self,
        draft: &'a CategoryDraft,
    ) -> BoxFuture<'a, Result<serde_json::Value>> {
        Box::pin(async move {
            let url = self.url(&["api", "categories"])?;
            debug!(%url, name = %draft.name, "POST category");
            decode_value(self.client.post(url).json(draft).send().await?).await
        })
    }

    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>>> {
        Box::pin(async move {
            let url = self.url(&["api", "search"])?;
            debug!(%url, "GET search");
            let request = self.client.get(url).query(&query.pairs());
            let payload: SearchPayload = decode(request.send().await?).await?;
            Ok(payload.users)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let http = backend("http://localhost:5000");
        assert_eq!(
            http.url(&["api", "basicfields"]).unwrap().as_str(),
            "http://localhost:5000/api/basicfields"
        );

        let prefixed = backend("https://forms.example.com/backend/");
        assert_eq!(
            prefixed.url(&["api", "categories", "7", "fields"]).unwrap().as_str(),
            "https://forms.example.com/backend/api/categories/7/fields"
        );
    }

    #[test]
    fn test_category_id_is_encoded() {
        let http = backend("http://localhost:5000");
        let url = http.url(&["api", "categories", "a/b c", "fields"]).unwrap();
        assert_eq!(url.path(), "/api/categories/a%2Fb%20c/fields");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpBackend::new(&ClientConfig::new("not a url")),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(HttpBackend::new(&ClientConfig::new("mailto:ops@example.com")).is_err());
    }

    #[test]
    fn test_failure_detail() {
        assert_eq!(
            failure_detail(r#"{"error": "Category exists"}"#),
            Some("Category exists".to_string())
        );
        assert_eq!(failure_detail(r#"{"error": ""}"#), None);
        assert_eq!(failure_detail("<html>oops</html>"), None);
    }

    #[test]
    fn test_status_error_falls_back_to_reason() {
        let error = status_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(error.to_string(), "Service Unavailable");
    }
}
