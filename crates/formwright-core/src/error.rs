//! Error types for form schemas and field validation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::field::is_category_key;

/// Schema-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A category draft has no name.
    #[error("Category name is required")]
    MissingCategoryName,

    /// A category draft has a field without a name or with an unknown type.
    #[error("All fields must have a name and valid type")]
    InvalidDraftField {
        /// Position of the offending field in the draft.
        index: usize,
    },
}

/// Validation errors keyed by field.
///
/// Holds at most one message per field; a field without an entry has no
/// error. Empty messages are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Creates a new empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error for a field. An empty message clears it.
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.errors.remove(field);
        } else {
            self.errors.insert(field.to_string(), message);
        }
    }

    /// Replaces the error for a field with the outcome of a validation.
    pub fn update(&mut self, field: &str, verdict: Option<String>) {
        match verdict {
            Some(message) => self.set(field, message),
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Copies every entry of `other` into this map.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    /// Drops every category-field error.
    pub fn purge_category(&mut self) {
        self.errors.retain(|key, _| !is_category_key(key));
    }

    /// Removes all errors.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Returns whether there are any errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterates `(field, message)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in &self.errors {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_clears() {
        let mut errors = FieldErrors::new();
        errors.set("age", "bad age");
        assert_eq!(errors.len(), 1);
        errors.set("age", "");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_update_replaces_only_that_field() {
        let mut errors = FieldErrors::new();
        errors.set("age", "bad age");
        errors.set("name", "bad name");
        errors.update("age", None);
        assert_eq!(errors.get("age"), None);
        assert_eq!(errors.get("name"), Some("bad name"));
    }

    #[test]
    fn test_purge_category() {
        let mut errors = FieldErrors::new();
        errors.set("email", "bad email");
        errors.set("category-field-3", "bad number");
        errors.purge_category();
        assert_eq!(errors.len(), 1);
        assert!(errors.get("email").is_some());
    }

    #[test]
    fn test_display() {
        let mut errors = FieldErrors::new();
        errors.set("age", "Please enter a valid age between 1 and 120.");
        assert_eq!(
            errors.to_string(),
            "age: Please enter a valid age between 1 and 120.\n"
        );
    }
}
