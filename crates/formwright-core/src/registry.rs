//! Field registry: turns raw schema payloads into ordered field descriptors.

use crate::field::{FieldDescriptor, InputKind};
use crate::schema::{BasicFieldSchema, CategoryFieldSchema, CategoryId};

/// Basic fields that are rendered, in display order.
pub const BASIC_FIELD_ORDER: [&str; 5] = ["name", "age", "gender", "email", "address"];

/// Options offered for the gender field.
pub const GENDER_OPTIONS: [(&str, &str); 3] =
    [("male", "Male"), ("female", "Female"), ("other", "Other")];

/// Upper-cases the first character of a column name.
fn label_for(column: &str) -> String {
    let mut chars = column.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn basic_descriptor(schema: &BasicFieldSchema) -> FieldDescriptor {
    let key = schema.column_name.as_str();
    let label = label_for(key);

    if key == "gender" {
        return GENDER_OPTIONS
            .iter()
            .fold(
                FieldDescriptor::basic(key, label, InputKind::Selection).required(),
                |field, (value, text)| field.option(*value, *text),
            );
    }

    let kind = match schema.data_type.as_str() {
        "integer" => InputKind::Number,
        _ => InputKind::Text,
    };
    let required = key == "address" && schema.data_type == "text";

    FieldDescriptor::basic(key, label, kind).with_required(required)
}

/// Filters the basic-field schema to the renderable allow-list, in display order.
///
/// Columns outside [`BASIC_FIELD_ORDER`] (the primary key in particular) are
/// dropped. Gender is always a three-way selection regardless of its declared
/// storage type.
#[must_use]
pub fn basic_renderable(schema: &[BasicFieldSchema]) -> Vec<FieldDescriptor> {
    BASIC_FIELD_ORDER
        .iter()
        .filter_map(|name| schema.iter().find(|s| s.column_name == *name))
        .map(basic_descriptor)
        .collect()
}

/// Maps a category's field schema to descriptors owned by that category.
#[must_use]
pub fn category_renderable(
    schema: &[CategoryFieldSchema],
    category: &CategoryId,
) -> Vec<FieldDescriptor> {
    schema
        .iter()
        .map(|field| {
            let kind = match field.field_type.as_str() {
                "number" => InputKind::Number,
                "date" => InputKind::Date,
                _ => InputKind::Text,
            };
            FieldDescriptor::category(category.clone(), &field.id, &field.name, kind)
                .with_required(field.is_required)
        })
        .collect()
}

/// Concatenates basic and category descriptors, basic first.
#[must_use]
pub fn merged(basic: &[FieldDescriptor], category: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    basic.iter().chain(category).cloned().collect()
}

/// The merged, ordered set of currently active fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from basic and category descriptors.
    #[must_use]
    pub fn from_parts(basic: &[FieldDescriptor], category: &[FieldDescriptor]) -> Self {
        Self {
            fields: merged(basic, category),
        }
    }

    /// Returns the descriptor with the given key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Returns whether a field with the given key is active.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates fields in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    /// Iterates required fields in display order.
    pub fn required(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

impl<'a> IntoIterator for &'a FieldRegistry {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldOrigin;

    fn keys(fields: &[FieldDescriptor]) -> Vec<&str> {
        fields.iter().map(|f| f.key.as_str()).collect()
    }

    #[test]
    fn test_basic_order_is_fixed() {
        let schema = vec![
            BasicFieldSchema::new("address", "text"),
            BasicFieldSchema::new("id", "integer"),
            BasicFieldSchema::new("email", "character varying"),
            BasicFieldSchema::new("gender", "character varying"),
            BasicFieldSchema::new("age", "integer"),
            BasicFieldSchema::new("name", "character varying"),
        ];
        let fields = basic_renderable(&schema);
        assert_eq!(keys(&fields), ["name", "age", "gender", "email", "address"]);
    }

    #[test]
    fn test_basic_drops_unknown_and_missing() {
        let schema = vec![
            BasicFieldSchema::new("id", "integer"),
            BasicFieldSchema::new("email", "character varying"),
            BasicFieldSchema::new("nickname", "character varying"),
            BasicFieldSchema::new("name", "character varying"),
        ];
        let fields = basic_renderable(&schema);
        assert_eq!(keys(&fields), ["name", "email"]);
    }

    #[test]
    fn test_gender_is_always_selection() {
        for declared in ["integer", "character varying", "boolean"] {
            let fields = basic_renderable(&[BasicFieldSchema::new("gender", declared)]);
            let gender = &fields[0];
            assert_eq!(gender.kind, InputKind::Selection);
            let values: Vec<_> = gender.options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(values, ["male", "female", "other"]);
            assert!(gender.required);
        }
    }

    #[test]
    fn test_basic_kinds_and_labels() {
        let fields = basic_renderable(&[
            BasicFieldSchema::new("age", "integer"),
            BasicFieldSchema::new("name", "character varying"),
            BasicFieldSchema::new("address", "text"),
        ]);
        assert_eq!(fields[0].kind, InputKind::Text);
        assert_eq!(fields[0].label, "Name");
        assert_eq!(fields[1].kind, InputKind::Number);
        assert_eq!(fields[1].label, "Age");
        assert_eq!(fields[2].kind, InputKind::Text);
        assert!(fields[2].required);
        assert!(!fields[0].required);
    }

    #[test]
    fn test_address_required_only_for_text_storage() {
        let fields = basic_renderable(&[BasicFieldSchema::new("address", "character varying")]);
        assert!(!fields[0].required);
    }

    #[test]
    fn test_category_renderable() {
        let category = CategoryId::new("4");
        let fields = category_renderable(
            &[
                CategoryFieldSchema::new("10", "Pages", "number", true),
                CategoryFieldSchema::new("11", "Author", "text", false),
                CategoryFieldSchema::new("12", "Published", "date", false),
                CategoryFieldSchema::new("13", "Notes", "blob", false),
            ],
            &category,
        );

        assert_eq!(
            keys(&fields),
            [
                "category-field-10",
                "category-field-11",
                "category-field-12",
                "category-field-13"
            ]
        );
        assert_eq!(fields[0].kind, InputKind::Number);
        assert!(fields[0].required);
        assert_eq!(fields[1].kind, InputKind::Text);
        assert_eq!(fields[2].kind, InputKind::Date);
        assert_eq!(fields[3].kind, InputKind::Text);
        assert_eq!(fields[1].origin, FieldOrigin::Category(category));
    }

    #[test]
    fn test_merged_basic_first() {
        let basic = basic_renderable(&[BasicFieldSchema::new("name", "character varying")]);
        let category = category_renderable(
            &[CategoryFieldSchema::new("1", "name", "text", false)],
            &CategoryId::new("1"),
        );
        let registry = FieldRegistry::from_parts(&basic, &category);

        assert_eq!(registry.len(), 2);
        assert_eq!(keys(registry.as_slice()), ["name", "category-field-1"]);
        assert!(registry.contains("category-field-1"));
        assert_eq!(registry.required().count(), 0);
    }
}
