//! Async driver for a [`FormController`].
//!
//! The session runs the controller's effects against a [`Backend`] and feeds
//! their outcomes back one at a time, so all state changes happen on the
//! caller's task. In-flight work sits in a `FuturesUnordered`; completions
//! may arrive in any order and stale ones are discarded by the controller.

use std::sync::Arc;

use formwright_core::{Category, CategoryId, FieldDescriptor, LoadState};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::backend::{Backend, BoxFuture};
use crate::config::ClientConfig;
use crate::controller::{Effect, FormController, Resolution, Result, Ticket};
use crate::error::SubmissionError;
use crate::gateway::{SubmissionGateway, SubmissionReceipt};
use crate::loader::SchemaLoader;

/// Outcome of one in-flight operation.
enum Completion {
    BasicFields(LoadState<Vec<FieldDescriptor>>),
    Categories(LoadState<Vec<Category>>),
    CategoryFields {
        ticket: Ticket,
        state: LoadState<Vec<FieldDescriptor>>,
    },
    Submission {
        ticket: Ticket,
        result: std::result::Result<SubmissionReceipt, SubmissionError>,
    },
    SuccessElapsed {
        ticket: Ticket,
    },
}

/// What [`FormSession::settle_next`] applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    BasicFields,
    Categories,
    CategoryFields(Resolution),
    Submission(Resolution),
    SuccessCleared(Resolution),
}

/// A form bound to a backend.
pub struct FormSession<B: Backend + 'static> {
    controller: FormController,
    loader: SchemaLoader<B>,
    gateway: SubmissionGateway<B>,
    pending: FuturesUnordered<BoxFuture<'static, Completion>>,
}

impl<B: Backend + 'static> FormSession<B> {
    /// Creates a session that owns its backend.
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        Self::with_shared(Arc::new(backend), config)
    }

    /// Creates a session over a shared backend.
    pub fn with_shared(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            controller: FormController::new(config.success_display),
            loader: SchemaLoader::new(Arc::clone(&backend)),
            gateway: SubmissionGateway::new(backend),
            pending: FuturesUnordered::new(),
        }
    }

    /// Returns the form state.
    pub const fn controller(&self) -> &FormController {
        &self.controller
    }

    /// Returns the number of operations still in flight.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Starts loading the basic-field and category schemas concurrently.
    pub fn start(&mut self) {
        self.controller.start();
        self.dispatch();
    }

    /// Selects a category (see [`FormController::select_category`]).
    pub fn select_category(&mut self, category: Option<CategoryId>) -> Result<()> {
        let result = self.controller.select_category(category);
        self.dispatch();
        result
    }

    /// Changes a field value (see [`FormController::change_field`]).
    pub fn change_field(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.controller.change_field(key, value)
    }

    /// Submits the form (see [`FormController::submit`]).
    pub fn submit(&mut self) -> Result<()> {
        let result = self.controller.submit();
        self.dispatch();
        result
    }

    /// Resets the form (see [`FormController::cancel`]).
    pub fn cancel(&mut self) -> Result<()> {
        self.controller.cancel()
    }

    /// Waits for the next in-flight operation and applies it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<Settled> {
        let completion = self.pending.next().await?;
        let settled = match completion {
            Completion::BasicFields(state) => {
                self.controller.apply_basic_fields(state);
                Settled::BasicFields
            }
            Completion::Categories(state) => {
                self.controller.apply_categories(state);
                Settled::Categories
            }
            Completion::CategoryFields { ticket, state } => {
                Settled::CategoryFields(self.controller.apply_category_fields(ticket, state))
            }
            Completion::Submission { ticket, result } => {
                Settled::Submission(self.controller.apply_submission(ticket, result))
            }
            Completion::SuccessElapsed { ticket } => {
                Settled::SuccessCleared(self.controller.clear_success(ticket))
            }
        };
        self.dispatch();
        Some(settled)
    }

    /// Applies completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.settle_next().await.is_some() {}
    }

    /// Applies completions until `done` accepts one, or nothing is in flight.
    pub async fn settle_until(&mut self, mut done: impl FnMut(Settled) -> bool) -> Option<Settled> {
        while let Some(settled) = self.settle_next().await {
            if done(settled) {
                return Some(settled);
            }
        }
        None
    }

    fn dispatch(&mut self) {
        for effect in self.controller.take_effects() {
            let future: BoxFuture<'static, Completion> = match effect {
                Effect::LoadBasicFields => {
                    let loader = self.loader.clone();
                    Box::pin(async move {
                        Completion::BasicFields(loader.load_basic_fields().await)
                    })
                }
                Effect::LoadCategories => {
                    let loader = self.loader.clone();
                    Box::pin(async move { Completion::Categories(loader.load_categories().await) })
                }
                Effect::LoadCategoryFields { ticket, category } => {
                    let loader = self.loader.clone();
                    Box::pin(async move {
                        let state = loader.load_category_fields(Some(&category)).await;
                        Completion::CategoryFields { ticket, state }
                    })
                }
                Effect::Submit { ticket, values } => {
                    let gateway = self.gateway.clone();
                    Box::pin(async move {
                        let result = gateway.submit(values).await;
                        Completion::Submission { ticket, result }
                    })
                }
                Effect::ClearSuccess { ticket, after } => Box::pin(async move {
                    tokio::time::sleep(after).await;
                    Completion::SuccessElapsed { ticket }
                }),
            };
            self.pending.push(future);
        }
    }
}
