//! # formwright-core
//!
//! Schema model, field registry and validation for forms that merge a fixed
//! core record schema with the attribute schema of a user-selected category.
//!
//! This crate provides:
//! - Wire types for the basic-field, category and category-field endpoints
//! - Field descriptors and the registry that orders and merges them
//! - Per-field validation and the submit-eligibility check
//! - The value and error maps owned by a form
//!
//! Nothing here performs I/O; fetching and state orchestration live in
//! `formwright-client`.
//!
//! ## Quick Start
//!
//! ```rust
//! use formwright_core::registry::{basic_renderable, category_renderable, FieldRegistry};
//! use formwright_core::schema::{BasicFieldSchema, CategoryFieldSchema, CategoryId};
//! use formwright_core::validation::validate;
//!
//! let basic = basic_renderable(&[
//!     BasicFieldSchema::new("id", "integer"),
//!     BasicFieldSchema::new("age", "integer"),
//!     BasicFieldSchema::new("name", "character varying"),
//! ]);
//! let category = category_renderable(
//!     &[CategoryFieldSchema::new("3", "Pages", "number", true)],
//!     &CategoryId::new("1"),
//! );
//! let registry = FieldRegistry::from_parts(&basic, &category);
//!
//! let keys: Vec<_> = registry.iter().map(|f| f.key.as_str()).collect();
//! assert_eq!(keys, ["name", "age", "category-field-3"]);
//!
//! let age = registry.get("age").unwrap();
//! assert!(validate(age, "121").is_some());
//! assert!(validate(age, "42").is_none());
//! ```

pub mod draft;
mod error;
pub mod field;
pub mod load;
pub mod registry;
pub mod schema;
pub mod validation;
mod values;

pub use draft::{CategoryDraft, DraftField};
pub use error::{FieldErrors, Result, SchemaError};
pub use field::{FieldDescriptor, FieldOrigin, InputKind, SelectOption};
pub use load::LoadState;
pub use registry::FieldRegistry;
pub use schema::{BasicFieldSchema, Category, CategoryFieldSchema, CategoryId, SearchQuery};
pub use values::FormValues;
