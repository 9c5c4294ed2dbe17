//! Category drafts for `POST /api/categories`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Field types a category may declare.
pub const CATEGORY_FIELD_TYPES: [&str; 3] = ["text", "number", "date"];

/// One attribute of a category being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftField {
    pub name: String,
    pub field_type: String,
    pub is_required: bool,
}

impl DraftField {
    /// Creates an optional text field with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: "text".to_string(),
            is_required: false,
        }
    }

    /// Sets the field type.
    #[must_use]
    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Parses `name:type[:required]`.
    ///
    /// The type defaults to `text`. Shape is checked here; names and types are
    /// checked by [`CategoryDraft::validate`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(3, ':');
        let mut field = Self::new(parts.next().unwrap_or_default().trim());
        if let Some(field_type) = parts.next() {
            field = field.field_type(field_type.trim());
        }
        if parts.next().is_some_and(|flag| flag.trim() == "required") {
            field = field.required();
        }
        field
    }
}

/// A category with its attribute schema, ready to be created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    pub fields: Vec<DraftField>,
}

impl CategoryDraft {
    /// Creates a draft with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: DraftField) -> Self {
        self.fields.push(field);
        self
    }

    /// Checks the draft before it is sent.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::MissingCategoryName);
        }

        if let Some(index) = self.fields.iter().position(|f| {
            f.name.trim().is_empty() || !CATEGORY_FIELD_TYPES.contains(&f.field_type.as_str())
        }) {
            return Err(SchemaError::InvalidDraftField { index });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_draft() {
        let draft = CategoryDraft::new("Books")
            .field(DraftField::new("Author"))
            .field(DraftField::new("Pages").field_type("number").required());
        assert!(draft.validate().is_ok());

        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["fields"][1]["field_type"], "number");
        assert_eq!(json["fields"][1]["is_required"], true);
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(
            CategoryDraft::new("  ").validate(),
            Err(SchemaError::MissingCategoryName)
        );
    }

    #[test]
    fn test_bad_field_rejected() {
        let draft = CategoryDraft::new("Books")
            .field(DraftField::new("Author"))
            .field(DraftField::new("Cover").field_type("image"));
        assert_eq!(
            draft.validate(),
            Err(SchemaError::InvalidDraftField { index: 1 })
        );

        let unnamed = CategoryDraft::new("Books").field(DraftField::new(""));
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_parse_field_definition() {
        assert_eq!(
            DraftField::parse("Pages:number:required"),
            DraftField::new("Pages").field_type("number").required()
        );
        assert_eq!(DraftField::parse("Author"), DraftField::new("Author"));
        assert_eq!(
            DraftField::parse("Released:date"),
            DraftField::new("Released").field_type("date")
        );
    }
}
