//! Field descriptors: the client-side view of one renderable, validated input.

use std::fmt;

use serde::Serialize;

use crate::schema::CategoryId;

/// Prefix that namespaces category-field keys away from basic-field keys.
pub const CATEGORY_FIELD_PREFIX: &str = "category-field-";

/// Returns the form key of the category field with the given id.
#[must_use]
pub fn category_field_key(field_id: &str) -> String {
    format!("{CATEGORY_FIELD_PREFIX}{field_id}")
}

/// Returns whether a form key belongs to a category field.
#[must_use]
pub fn is_category_key(key: &str) -> bool {
    key.starts_with(CATEGORY_FIELD_PREFIX)
}

/// Where a field's schema came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOrigin {
    /// Part of the fixed core record schema.
    Basic,
    /// Defined by the given category.
    Category(CategoryId),
}

/// How a field is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Number,
    Date,
    Selection,
}

impl InputKind {
    /// Returns the HTML input type for this kind.
    #[must_use]
    pub const fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Selection => "select",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_type())
    }
}

/// One entry of a selection's option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl SelectOption {
    /// Creates a select option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Definition of one renderable form field.
///
/// Descriptors are immutable once built from a schema payload; a re-fetch of
/// the owning schema replaces them wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Unique form key.
    pub key: String,
    /// Schema the field came from.
    pub origin: FieldOrigin,
    /// Display label.
    pub label: String,
    /// Input kind.
    pub kind: InputKind,
    /// Whether a non-empty value is needed to submit.
    pub required: bool,
    /// Options for `Selection` fields; empty otherwise.
    pub options: Vec<SelectOption>,
}

impl FieldDescriptor {
    /// Creates a basic-origin field.
    pub fn basic(key: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            key: key.into(),
            origin: FieldOrigin::Basic,
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    /// Creates a category-origin field keyed by the category field id.
    pub fn category(
        category: CategoryId,
        field_id: &str,
        label: impl Into<String>,
        kind: InputKind,
    ) -> Self {
        Self {
            key: category_field_key(field_id),
            origin: FieldOrigin::Category(category),
            label: label.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Adds a selection option.
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label));
        self
    }

    /// Returns whether this field came from a category schema.
    #[must_use]
    pub const fn is_category(&self) -> bool {
        matches!(self.origin, FieldOrigin::Category(_))
    }

    /// Returns the owning category, if any.
    #[must_use]
    pub const fn category_id(&self) -> Option<&CategoryId> {
        match &self.origin {
            FieldOrigin::Basic => None,
            FieldOrigin::Category(id) => Some(id),
        }
    }

    /// Returns whether `value` is one of the enumerated options.
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_key_is_namespaced() {
        let field =
            FieldDescriptor::category(CategoryId::new("2"), "9", "Pages", InputKind::Number);
        assert_eq!(field.key, "category-field-9");
        assert!(is_category_key(&field.key));
        assert!(!is_category_key("name"));
        assert_eq!(field.category_id(), Some(&CategoryId::new("2")));
    }

    #[test]
    fn test_basic_builder() {
        let field = FieldDescriptor::basic("gender", "Gender", InputKind::Selection)
            .required()
            .option("male", "Male")
            .option("female", "Female");

        assert!(field.required);
        assert!(!field.is_category());
        assert!(field.has_option("female"));
        assert!(!field.has_option("unknown"));
    }
}
