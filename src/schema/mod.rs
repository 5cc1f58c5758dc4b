//! Recursive, JSON-Schema-like descriptions of payload shapes.
//!
//! A [`Schema`] is a tree node: a primitive leaf (`string`, `integer`,
//! `number`, `boolean`), an `object` with named properties, an `array` with
//! an element schema, or a `$ref` pointing at a named component. Schemas are
//! built per render and discarded afterwards; nothing in this module caches.

pub mod reflect;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;

/// The primitive kind carried in a schema node's `type` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// One node of a schema tree.
///
/// Exactly one of {primitive `type`, `properties`, `items`, `$ref`} defines
/// the node's shape; the constructors enforce this, and empty slots are
/// omitted from serialized output.
///
/// ## Examples
///
/// ```rust
/// use apidoc::Schema;
///
/// let schema = Schema::object()
///     .property("name", Schema::string())
///     .optional_property("nickname", Schema::string());
///
/// let json = serde_json::to_value(&schema).unwrap();
/// assert_eq!(json["type"], "object");
/// assert_eq!(json["required"], serde_json::json!(["name"]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    ty: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    required: BTreeSet<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
}

impl Schema {
    fn empty() -> Self {
        Self {
            ty: None,
            format: None,
            description: None,
            pattern: None,
            properties: BTreeMap::new(),
            items: None,
            required: BTreeSet::new(),
            enum_values: Vec::new(),
            default: None,
            example: None,
            reference: None,
        }
    }

    fn primitive(ty: SchemaType) -> Self {
        Self {
            ty: Some(ty),
            ..Self::empty()
        }
    }

    /// A `{type: string}` leaf.
    pub fn string() -> Self {
        Self::primitive(SchemaType::String)
    }

    /// A `{type: integer}` leaf.
    pub fn integer() -> Self {
        Self::primitive(SchemaType::Integer)
    }

    /// A `{type: number}` leaf.
    pub fn number() -> Self {
        Self::primitive(SchemaType::Number)
    }

    /// A `{type: boolean}` leaf.
    pub fn boolean() -> Self {
        Self::primitive(SchemaType::Boolean)
    }

    /// A bare `{type: object}` node.
    ///
    /// Without properties this doubles as the placeholder for payloads whose
    /// shape cannot be described (absent bodies, heterogeneous maps).
    pub fn object() -> Self {
        Self::primitive(SchemaType::Object)
    }

    /// A `{type: array, items: ...}` node.
    pub fn array(items: Schema) -> Self {
        Self {
            ty: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Self::empty()
        }
    }

    /// A `{$ref: ...}` node pointing at a named component schema.
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            reference: Some(path.into()),
            ..Self::empty()
        }
    }

    /// Adds a named property and marks it required.
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.properties.insert(name, schema);
        self
    }

    /// Adds a named property without marking it required.
    ///
    /// The field appears in `properties` but stays out of `required` - the
    /// shape an omit-if-empty serialization annotation produces.
    pub fn optional_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Sets the format hint (e.g. `date-time`, `int64`).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a validation pattern. Patterns live in their own slot and never
    /// clobber the format hint.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the allowed values.
    pub fn with_enum_values(
        mut self,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Returns `true` if this node is a `$ref` rather than an inline shape.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_serialization() {
        assert_eq!(serde_json::to_value(Schema::string()).unwrap(), json!({"type": "string"}));
        assert_eq!(serde_json::to_value(Schema::integer()).unwrap(), json!({"type": "integer"}));
        assert_eq!(serde_json::to_value(Schema::number()).unwrap(), json!({"type": "number"}));
        assert_eq!(serde_json::to_value(Schema::boolean()).unwrap(), json!({"type": "boolean"}));
    }

    #[test]
    fn test_array_serialization() {
        let schema = Schema::array(Schema::integer());
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"type": "array", "items": {"type": "integer"}})
        );
    }

    #[test]
    fn test_object_properties_and_required() {
        let schema = Schema::object()
            .property("id", Schema::integer())
            .optional_property("note", Schema::string());
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["type"], "object");
        assert!(json["properties"]["id"].is_object());
        assert!(json["properties"]["note"].is_object());
        assert_eq!(json["required"], json!(["id"]));
    }

    #[test]
    fn test_bare_object_has_no_empty_slots() {
        let json = serde_json::to_value(Schema::object()).unwrap();
        assert_eq!(json, json!({"type": "object"}));
    }

    #[test]
    fn test_reference_node() {
        let schema = Schema::reference("#/components/schemas/User");
        assert!(schema.is_reference());
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({"$ref": "#/components/schemas/User"})
        );
    }

    #[test]
    fn test_modifiers() {
        let schema = Schema::string()
            .with_format("date-time")
            .with_pattern("^[0-9]{4}-")
            .with_description("An ISO timestamp")
            .with_enum_values(["a", "b"])
            .with_default(json!("a"))
            .with_example(json!("b"));
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["format"], "date-time");
        assert_eq!(json["pattern"], "^[0-9]{4}-");
        assert_eq!(json["description"], "An ISO timestamp");
        assert_eq!(json["enum"], json!(["a", "b"]));
        assert_eq!(json["default"], "a");
        assert_eq!(json["example"], "b");
    }
}
