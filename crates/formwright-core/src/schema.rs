//! Wire types for the schema and submission endpoints.
//!
//! Field names match the backend's JSON payloads exactly. Identifiers are
//! opaque: the backend may send them as strings or numbers, and they are
//! carried as strings on the client side.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Deserializes an identifier that may arrive as a JSON string or number.
fn deserialize_opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Signed(n) => n.to_string(),
        RawId::Unsigned(n) => n.to_string(),
    })
}

/// Opaque identifier of a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Creates a category id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the id is empty, which means "no category".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_opaque_id(deserializer).map(Self)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One column of the core record table, as reported by `GET /api/basicfields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicFieldSchema {
    /// Column name, also used as the form key.
    pub column_name: String,
    /// Declared storage type (`integer`, `character varying`, `text`, ...).
    pub data_type: String,
}

impl BasicFieldSchema {
    /// Creates a basic field schema entry.
    pub fn new(column_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A record category, as reported by `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
}

impl Category {
    /// Creates a category.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }
}

/// One attribute of a category, as reported by `GET /api/categories/{id}/fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFieldSchema {
    /// Field identifier, unique across categories.
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Declared field type (`text`, `number`, `date`).
    pub field_type: String,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub is_required: bool,
}

impl CategoryFieldSchema {
    /// Creates a category field schema entry.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        field_type: impl Into<String>,
        is_required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type: field_type.into(),
            is_required,
        }
    }
}

/// Body of `GET /api/basicfields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicFieldsPayload {
    pub fields: Vec<BasicFieldSchema>,
}

/// Body of `GET /api/categories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesPayload {
    pub categories: Vec<Category>,
}

/// Body of `GET /api/categories/{id}/fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryFieldsPayload {
    pub fields: Vec<CategoryFieldSchema>,
}

/// Body of `GET /api/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
}

/// Error body returned by the backend alongside a non-success status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// Query parameters for `GET /api/search`.
///
/// Every parameter is sent, empty ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub email: String,
    pub address: String,
    pub category: String,
}

impl SearchQuery {
    /// Returns the parameters as ordered key/value pairs.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("name", self.name.as_str()),
            ("age", self.age.as_str()),
            ("gender", self.gender.as_str()),
            ("email", self.email.as_str()),
            ("address", self.address.as_str()),
            ("category", self.category.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_id_accepts_number_and_string() {
        let payload: CategoriesPayload = serde_json::from_str(
            r#"{"categories": [{"id": 7, "name": "Books"}, {"id": "x-1", "name": "Music"}]}"#,
        )
        .unwrap();
        assert_eq!(payload.categories[0].id.as_str(), "7");
        assert_eq!(payload.categories[1].id.as_str(), "x-1");
    }

    #[test]
    fn test_category_field_defaults_optional() {
        let payload: CategoryFieldsPayload =
            serde_json::from_str(r#"{"fields": [{"id": 3, "name": "ISBN", "field_type": "text"}]}"#)
                .unwrap();
        let field = &payload.fields[0];
        assert_eq!(field.id, "3");
        assert!(!field.is_required);
    }

    #[test]
    fn test_category_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryId::new("12")).unwrap();
        assert_eq!(json, r#""12""#);
    }

    #[test]
    fn test_empty_category_id() {
        assert!(CategoryId::new("").is_empty());
        assert!(CategoryId::new("  ").is_empty());
        assert!(!CategoryId::new("1").is_empty());
    }

    #[test]
    fn test_search_query_pairs_keep_empty_values() {
        let query = SearchQuery {
            name: "Jane".to_string(),
            ..SearchQuery::default()
        };
        let pairs = query.pairs();
        assert_eq!(pairs[0], ("name", "Jane"));
        assert_eq!(pairs[5], ("category", ""));
    }
}
