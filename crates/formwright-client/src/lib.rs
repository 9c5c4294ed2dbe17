//! # formwright-client
//!
//! The dynamic form engine: loads the basic-field, category and
//! category-field schemas from the backend, keeps the form's values and
//! errors consistent while the user switches categories, and submits the
//! result.
//!
//! This crate provides:
//! - [`Backend`], the transport seam, and [`HttpBackend`] over `reqwest`
//! - [`SchemaLoader`], mapping each schema fetch to a [`LoadState`](formwright_core::LoadState)
//! - [`FormController`], the synchronous form state machine
//! - [`FormSession`], which runs the controller's effects on one task
//! - [`SubmissionGateway`] and [`CatalogClient`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use formwright_client::{ClientConfig, FormSession, HttpBackend};
//! use formwright_core::CategoryId;
//!
//! let config = ClientConfig::new("http://localhost:5000");
//! let mut session = FormSession::new(HttpBackend::new(&config)?, &config);
//!
//! session.start();
//! session.settle().await;
//!
//! session.select_category(Some(CategoryId::new("3")))?;
//! session.settle().await;
//!
//! session.change_field("name", "Jane Doe")?;
//! session.change_field("gender", "female")?;
//! session.submit()?;
//! session.settle().await;
//! ```
//!
//! ## Stale responses
//!
//! Every category-field request carries a ticket. When the user picks
//! category A and then B before A's fields arrive, A's response is discarded
//! on arrival and only B's fields reach the registry:
//!
//! ```rust,ignore
//! session.select_category(Some(a))?;
//! session.select_category(Some(b))?;
//! session.settle().await; // A's late response resolves as Resolution::Stale
//! ```

pub mod backend;
pub mod config;
pub mod controller;
mod error;
pub mod gateway;
pub mod loader;
pub mod session;

pub use backend::{Backend, BoxFuture, HttpBackend};
pub use config::ClientConfig;
pub use controller::{Effect, FormController, Phase, Resolution, Ticket};
pub use error::{
    CatalogError, ClientError, ControllerError, Result, SchemaLoadError, SchemaResource,
    SubmissionError,
};
pub use gateway::{CatalogClient, SubmissionGateway, SubmissionReceipt};
pub use loader::SchemaLoader;
pub use session::{FormSession, Settled};
