//! Type tree to JSON Schema transformation
//!
//! Converts an inferred [`TypeNode`] into a JSON-Schema-style
//! `serde_json::Value`. Keyed array items become object properties with
//! a `required` list; literal string values run through format detection
//! so inferred constants like timestamps document their format.
//!
//! The transformation is total: every node produces a schema, with `{}`
//! (the unknown schema) as the uninformative fallback.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::types::{ArrayItem, Literal, TypeNode};

// Pre-compiled regex patterns for format detection
static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static ISO_TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(.\d+)?$").unwrap());

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap());

static IPV6_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4})$").unwrap()
});

/// Transform a type node into a JSON-Schema-style value
pub fn transform(ty: &TypeNode) -> Value {
    match ty {
        TypeNode::Unknown => json!({}),
        TypeNode::Primitive(primitive) => json!({ "type": primitive.schema_type() }),
        TypeNode::Literal(literal) => transform_literal(literal),
        TypeNode::Array(items) => transform_array(items),
        TypeNode::Object(object) => {
            let mut properties = Map::new();
            let mut required = Vec::new();

            for property in &object.properties {
                properties.insert(property.name.clone(), transform(&property.value));
                required.push(Value::String(property.name.clone()));
            }

            let mut schema = Map::new();
            schema.insert("type".to_string(), Value::String("object".to_string()));
            schema.insert("properties".to_string(), Value::Object(properties));
            if !required.is_empty() {
                schema.insert("required".to_string(), Value::Array(required));
            }

            Value::Object(schema)
        }
        TypeNode::ConditionalMerge(merge) => {
            // Merges are normally eliminated by flattening before they
            // reach the transformer. An unflattened merge degrades to
            // its payload's schema.
            if merge.payload.is_array() {
                transform(&merge.payload)
            } else {
                json!({})
            }
        }
    }
}

fn transform_literal(literal: &Literal) -> Value {
    match literal {
        Literal::Bool(value) => json!({ "type": "boolean", "const": value }),
        Literal::Int(value) => json!({ "type": "integer", "const": value }),
        Literal::Float(value) => json!({ "type": "number", "const": value }),
        Literal::Str(value) => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), Value::String("string".to_string()));
            if let Some(format) = detect_format(value) {
                schema.insert("format".to_string(), Value::String(format));
            }
            schema.insert("const".to_string(), Value::String(value.clone()));
            Value::Object(schema)
        }
    }
}

/// Transform an array type's item list.
///
/// Keyed items make the array an object shape; positional items make it
/// a list shape. An empty item list is an empty object.
fn transform_array(items: &[ArrayItem]) -> Value {
    if items.is_empty() {
        return json!({ "type": "object", "properties": {} });
    }

    if items.iter().any(|item| item.key.is_some()) {
        return transform_keyed_array(items);
    }

    transform_positional_array(items)
}

fn transform_keyed_array(items: &[ArrayItem]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for item in items {
        let Some(key) = &item.key else {
            // A positional item inside an object-shaped array has no
            // field name to attach it to.
            tracing::debug!("dropping positional item from object-shaped array");
            continue;
        };

        properties.insert(key.clone(), transform(&item.value));
        if !item.is_optional {
            required.push(Value::String(key.clone()));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }

    Value::Object(schema)
}

fn transform_positional_array(items: &[ArrayItem]) -> Value {
    let item_schemas: Vec<Value> = items.iter().map(|item| transform(&item.value)).collect();

    let items_schema = if item_schemas.len() == 1 {
        item_schemas.into_iter().next().unwrap()
    } else {
        json!({ "anyOf": item_schemas })
    };

    json!({ "type": "array", "items": items_schema })
}

/// Detect if a string matches a known format
pub fn detect_format(value: &str) -> Option<String> {
    let len = value.len();

    // Fast path checks first - these are O(1) or O(len)
    if len == 0 {
        return None;
    }

    // URI - fast byte check
    if len > 6
        && (value.starts_with("http://")
            || value.starts_with("https://")
            || value.starts_with("ftp://")
            || value.starts_with("file://"))
    {
        return Some("uri".to_string());
    }

    // ISO Date - fixed length with fast pattern
    if len == 10 && value.as_bytes()[4] == b'-' && value.as_bytes()[7] == b'-' {
        if ISO_DATE_REGEX.is_match(value) {
            return Some("date".to_string());
        }
    }

    // Email - common pattern check before regex
    if len > 5 && len < 255 && value.contains('@') {
        if EMAIL_REGEX.is_match(value) {
            return Some("email".to_string());
        }
    }

    // UUID - fixed length
    if len == 36 && value.as_bytes()[8] == b'-' {
        if UUID_REGEX.is_match(&value.to_lowercase()) {
            return Some("uuid".to_string());
        }
    }

    // DateTime - check length and T separator before regex
    if len >= 19 && value.as_bytes()[10] == b'T' {
        if ISO_DATETIME_REGEX.is_match(value) {
            return Some("date-time".to_string());
        }
    }

    // Time - colon separator
    if len >= 8 && value.contains(':') {
        if ISO_TIME_REGEX.is_match(value) {
            return Some("time".to_string());
        }
    }

    // IPv4 - simple dot count check
    if len < 16 && value.contains('.') {
        if IPV4_REGEX.is_match(value) && value.split('.').all(|part| part.parse::<u8>().is_ok()) {
            return Some("ipv4".to_string());
        }
    }

    // IPv6 - must have colons
    if value.contains(':') {
        if IPV6_REGEX.is_match(value) {
            return Some("ipv6".to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;

    #[test]
    fn test_unknown_is_empty_schema() {
        assert_eq!(transform(&TypeNode::Unknown), json!({}));
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(
            transform(&TypeNode::Primitive(Primitive::Int)),
            json!({ "type": "integer" })
        );
        assert_eq!(
            transform(&TypeNode::Primitive(Primitive::Null)),
            json!({ "type": "null" })
        );
    }

    #[test]
    fn test_literal_carries_const() {
        assert_eq!(
            transform(&TypeNode::Literal(Literal::Int(42))),
            json!({ "type": "integer", "const": 42 })
        );
        assert_eq!(
            transform(&TypeNode::Literal(Literal::Bool(true))),
            json!({ "type": "boolean", "const": true })
        );
    }

    #[test]
    fn test_literal_string_format_detection() {
        let schema = transform(&TypeNode::Literal(Literal::Str("2021-01-01".to_string())));
        assert_eq!(schema.get("format").and_then(Value::as_str), Some("date"));

        let schema = transform(&TypeNode::Literal(Literal::Str("plain".to_string())));
        assert!(schema.get("format").is_none());
    }

    #[test]
    fn test_keyed_array_becomes_object() {
        let node = TypeNode::Array(vec![
            ArrayItem::keyed("id", TypeNode::Primitive(Primitive::Int)),
            ArrayItem::keyed("email", TypeNode::Primitive(Primitive::Str)).optional(),
            ArrayItem::keyed("name", TypeNode::Primitive(Primitive::Str)),
        ]);

        let schema = transform(&node);
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "email": { "type": "string" },
                    "name": { "type": "string" }
                },
                "required": ["id", "name"]
            })
        );
    }

    #[test]
    fn test_all_optional_omits_required() {
        let node = TypeNode::Array(vec![
            ArrayItem::keyed("a", TypeNode::Primitive(Primitive::Int)).optional()
        ]);

        let schema = transform(&node);
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_positional_array_becomes_list() {
        let node = TypeNode::Array(vec![ArrayItem::positional(TypeNode::Primitive(
            Primitive::Str,
        ))]);

        assert_eq!(
            transform(&node),
            json!({ "type": "array", "items": { "type": "string" } })
        );
    }

    #[test]
    fn test_mixed_positional_items_use_any_of() {
        let node = TypeNode::Array(vec![
            ArrayItem::positional(TypeNode::Primitive(Primitive::Str)),
            ArrayItem::positional(TypeNode::Primitive(Primitive::Int)),
        ]);

        let schema = transform(&node);
        let items = schema.get("items").unwrap();
        let any_of = items.get("anyOf").and_then(Value::as_array).unwrap();
        assert_eq!(any_of.len(), 2);
    }

    #[test]
    fn test_empty_array_is_empty_object() {
        assert_eq!(
            transform(&TypeNode::Array(vec![])),
            json!({ "type": "object", "properties": {} })
        );
    }

    #[test]
    fn test_object_members_all_required() {
        let node = TypeNode::Object(
            crate::types::ObjectType::new("app.UserResource")
                .with_property("id", TypeNode::Primitive(Primitive::Int))
                .with_property("name", TypeNode::Primitive(Primitive::Str)),
        );

        let schema = transform(&node);
        assert_eq!(schema.get("required").unwrap(), &json!(["id", "name"]));
    }

    #[test]
    fn test_unflattened_merge_degrades_to_payload() {
        let merge = TypeNode::merge(
            TypeNode::Literal(Literal::Bool(false)),
            TypeNode::Array(vec![ArrayItem::keyed(
                "x",
                TypeNode::Primitive(Primitive::Int),
            )]),
        );
        let schema = transform(&merge);
        assert_eq!(schema.get("type").and_then(Value::as_str), Some("object"));

        let malformed = TypeNode::merge(TypeNode::Unknown, TypeNode::Unknown);
        assert_eq!(transform(&malformed), json!({}));
    }

    #[test]
    fn test_detect_format_email() {
        assert_eq!(detect_format("test@example.com"), Some("email".to_string()));
    }

    #[test]
    fn test_detect_format_uuid() {
        assert_eq!(
            detect_format("550e8400-e29b-41d4-a716-446655440000"),
            Some("uuid".to_string())
        );
    }

    #[test]
    fn test_detect_format_datetime() {
        assert_eq!(
            detect_format("2021-01-01T12:00:00Z"),
            Some("date-time".to_string())
        );
    }
}
