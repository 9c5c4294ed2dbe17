#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use formwright_client::{Backend, BoxFuture, ClientError};
use formwright_core::{
    BasicFieldSchema, Category, CategoryDraft, CategoryFieldSchema, CategoryId, FormValues,
    SearchQuery,
};

/// A canned backend answer, delivered after a delay.
#[derive(Debug, Clone)]
pub struct Reply<T> {
    pub delay: Duration,
    pub result: Result<T, ClientError>,
}

impl<T: Clone + Send + Sync> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(value),
        }
    }

    pub fn status(code: u16, reason: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ClientError::status(code, reason, None)),
        }
    }

    pub fn rejected(code: u16, reason: &str, detail: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ClientError::status(code, reason, Some(detail.to_string()))),
        }
    }

    pub fn after_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    async fn play(&self) -> Result<T, ClientError> {
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

/// In-memory backend with scripted replies that records what it was asked.
pub struct ScriptedBackend {
    pub basic_fields: Reply<Vec<BasicFieldSchema>>,
    pub categories: Reply<Vec<Category>>,
    pub category_fields: HashMap<String, Reply<Vec<CategoryFieldSchema>>>,
    pub submit: Reply<serde_json::Value>,
    pub create_category: Reply<serde_json::Value>,
    pub search: Reply<Vec<serde_json::Value>>,
    pub category_calls: Mutex<Vec<CategoryId>>,
    pub submissions: Mutex<Vec<FormValues>>,
    pub drafts: Mutex<Vec<CategoryDraft>>,
    pub searches: Mutex<Vec<SearchQuery>>,
}

impl ScriptedBackend {
    /// A backend with the standard record schema, two categories and an
    /// accepting submit endpoint.
    pub fn standard() -> Self {
        Self {
            basic_fields: Reply::ok(vec![
                BasicFieldSchema::new("id", "integer"),
                BasicFieldSchema::new("email", "character varying"),
                BasicFieldSchema::new("address", "text"),
                BasicFieldSchema::new("name", "character varying"),
                BasicFieldSchema::new("gender", "character varying"),
                BasicFieldSchema::new("age", "integer"),
            ]),
            categories: Reply::ok(vec![
                Category::new("1", "Books"),
                Category::new("2", "Films"),
            ]),
            category_fields: HashMap::from([
                (
                    "1".to_string(),
                    Reply::ok(vec![
                        CategoryFieldSchema::new("10", "Pages", "number", true),
                        CategoryFieldSchema::new("11", "Author", "text", false),
                    ]),
                ),
                (
                    "2".to_string(),
                    Reply::ok(vec![CategoryFieldSchema::new("20", "Director", "text", true)]),
                ),
            ]),
            submit: Reply::ok(serde_json::json!({"message": "saved"})),
            create_category: Reply::ok(serde_json::json!({"id": 3})),
            search: Reply::ok(Vec::new()),
            category_calls: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            drafts: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_category_fields(
        mut self,
        category: &str,
        reply: Reply<Vec<CategoryFieldSchema>>,
    ) -> Self {
        self.category_fields.insert(category.to_string(), reply);
        self
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

impl Backend for ScriptedBackend {
    fn basic_fields(&self) -> BoxFuture<'_, Result<Vec<BasicFieldSchema>, ClientError>> {
        Box::pin(self.basic_fields.play())
    }

    fn categories(&self) -> BoxFuture<'_, Result<Vec<Category>, ClientError>> {
        Box::pin(self.categories.play())
    }

    fn category_fields<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> BoxFuture<'a, Result<Vec<CategoryFieldSchema>, ClientError>> {
        self.category_calls.lock().unwrap().push(category.clone());
        match self.category_fields.get(category.as_str()) {
            Some(reply) => Box::pin(reply.play()),
            None => Box::pin(async { Err(ClientError::status(404, "Not Found", None)) }),
        }
    }

    fn submit<'a>(
        &'a self,
        values: &'a FormValues,
    ) -> BoxFuture<'a, Result<serde_json::Value, ClientError>> {
        self.submissions.lock().unwrap().push(values.clone());
        Box::pin(self.submit.play())
    }

    fn create_category<'a>(
        &'a self,
        draft: &'a CategoryDraft,
    ) -> BoxFuture<'a, Result<serde_json::Value, ClientError>> {
        self.drafts.lock().unwrap().push(draft.clone());
        Box::pin(self.create_category.play())
    }

    fn search<'a>(
        &'a self,
        query: &'a SearchQuery,
    ) -> BoxFuture<'a, Result<Vec<serde_json::Value>, ClientError>> {
        self.searches.lock().unwrap().push(query.clone());
        Box::pin(self.search.play())
    }
}
