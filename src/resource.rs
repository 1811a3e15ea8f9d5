//! Resource schema and response envelope generation
//!
//! [`ResourceSchemaBuilder`] is the driver that turns one analyzed
//! resource class into its public API contract: [`to_schema`] produces
//! the flattened body schema, [`to_response`] wraps it into an HTTP
//! response description, and [`reference`] points into the shared
//! component namespace.
//!
//! All failure handling is local and best-effort: a class the analyzer
//! does not know, or a serialization method that did not resolve to an
//! array type, degrades to the unknown schema instead of erroring.
//! Partial information beats aborting the analysis pass.
//!
//! [`to_schema`]: ResourceSchemaBuilder::to_schema
//! [`to_response`]: ResourceSchemaBuilder::to_response
//! [`reference`]: ResourceSchemaBuilder::reference

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::analysis::{basic_collection_type, AnalyzedClass, ClassAnalyzer, ResourceKind};
use crate::flatten::flatten_merge_values;
use crate::registry::{Components, SchemaReference};
use crate::schema::transform;
use crate::types::TypeNode;

/// Serialization method analyzed for the body schema
const ARRAY_METHOD: &str = "to_array";

/// Method contributing eager-loaded sibling fields to the envelope
const WITH_METHOD: &str = "with";

/// Property contributing additional metadata fields to the envelope
const ADDITIONAL_PROPERTY: &str = "additional";

/// Default wrap key when wrapping is needed but none is declared
const DEFAULT_WRAP_KEY: &str = "data";

/// Component group resource schemas are registered under
const SCHEMAS_LOCATION: &str = "schemas";

/// An HTTP response description for one resource class.
///
/// A plain value created fresh per analysis; it has no lifecycle beyond
/// being returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    /// Schema of the response body
    pub body: Value,

    /// Key the primary data is wrapped under, when wrapping occurred
    pub wrap_key: Option<String>,

    /// HTTP status code
    pub status: u16,

    /// Response content type
    pub media_type: String,

    /// Human-readable description naming the resource's schema component
    pub description: String,
}

impl ResponseEnvelope {
    fn json(body: Value, wrap_key: Option<String>, description: String) -> Self {
        ResponseEnvelope {
            body,
            wrap_key,
            status: 200,
            media_type: "application/json".to_string(),
            description,
        }
    }
}

/// Schema and response generation for analyzed resource classes
pub struct ResourceSchemaBuilder<'a, A: ClassAnalyzer> {
    analyzer: &'a A,
}

impl<'a, A: ClassAnalyzer> ResourceSchemaBuilder<'a, A> {
    pub fn new(analyzer: &'a A) -> Self {
        ResourceSchemaBuilder { analyzer }
    }

    /// Whether this builder is responsible for the given type.
    ///
    /// Anonymous collections are handled by a different extension in the
    /// larger pipeline.
    pub fn handles(&self, ty: &TypeNode) -> bool {
        match self.class_of(ty) {
            Some(class) => class.kind != ResourceKind::AnonymousCollection,
            None => false,
        }
    }

    /// The flattened body schema for a resource type.
    ///
    /// Looks up the serialization method's return type, falls back to
    /// the basic collection shape for collection classes, flattens
    /// conditional merges, and transforms the result. Anything that does
    /// not resolve to an array type yields the unknown schema `{}`.
    pub fn to_schema(&self, ty: &TypeNode) -> Value {
        let Some(class) = self.class_of(ty) else {
            return json!({});
        };

        let mut array = class.method_return_type(ARRAY_METHOD).cloned();

        if !matches!(array, Some(TypeNode::Array(_))) {
            if class.kind == ResourceKind::Collection {
                array = basic_collection_type(class);
            } else {
                tracing::debug!(class = %class.name, "serialization method is not an array type");
                return json!({});
            }
        }

        let Some(TypeNode::Array(items)) = array else {
            tracing::debug!(class = %class.name, "no collection shape available");
            return json!({});
        };

        transform(&TypeNode::Array(flatten_merge_values(&items)))
    }

    /// The response envelope for a resource type.
    ///
    /// The body starts from the class's own serialization shape. When
    /// the class declares a wrap key, or when `with`/`additional` fields
    /// are present, the body is wrapped under the (default `data`) key
    /// and the flattened `with`/`additional` object schemas are merged
    /// into the envelope as required siblings.
    ///
    /// Reserves the class's unique schema name in `components`; the
    /// returned description refers to that name.
    pub fn to_response(&self, ty: &TypeNode, components: &mut Components) -> ResponseEnvelope {
        let Some(class) = self.class_of(ty) else {
            return ResponseEnvelope::json(json!({}), None, String::new());
        };

        let base = transform(&class.shape);

        let with_schema = class
            .method_return_type(WITH_METHOD)
            .and_then(flatten_to_schema);
        let additional_schema = class
            .property_type(ADDITIONAL_PROPERTY)
            .and_then(flatten_to_schema);

        let should_wrap =
            class.wrap_key.is_some() || with_schema.is_some() || additional_schema.is_some();

        let (body, wrap_key) = if should_wrap {
            let key = class
                .wrap_key
                .clone()
                .unwrap_or_else(|| DEFAULT_WRAP_KEY.to_string());

            let mut body = wrap_under_key(&key, base);

            if let Some(with_schema) = with_schema {
                merge_object_schemas(&mut body, &with_schema);
            }
            if let Some(additional_schema) = additional_schema {
                merge_object_schemas(&mut body, &additional_schema);
            }

            (body, Some(key))
        } else {
            (base, None)
        };

        let handle = components.reserve(&class.name);
        let description = components.describe(&handle);

        ResponseEnvelope::json(body, wrap_key, description)
    }

    /// A reference into the shared component namespace for this
    /// resource's schema.
    ///
    /// Components are keyed by the unique name derived from the class's
    /// fully-qualified name. Caller-supplied short display names are not
    /// supported yet.
    pub fn reference(&self, ty: &TypeNode, components: &mut Components) -> SchemaReference {
        let type_name = match ty {
            TypeNode::Object(object) => object.name.as_str(),
            _ => "",
        };

        let handle = components.reserve(type_name);
        SchemaReference::new(SCHEMAS_LOCATION, handle.name())
    }

    fn class_of(&self, ty: &TypeNode) -> Option<&'a AnalyzedClass> {
        match ty {
            TypeNode::Object(object) => self.analyzer.analyze_class(&object.name),
            _ => None,
        }
    }
}

/// Flatten an array-typed member and transform it, or `None` when the
/// member is not an array type
fn flatten_to_schema(ty: &TypeNode) -> Option<Value> {
    let items = ty.array_items()?;
    Some(transform(&TypeNode::Array(flatten_merge_values(items))))
}

/// An object schema holding `body` as the single required property `key`
fn wrap_under_key(key: &str, body: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(key.to_string(), body);

    let mut schema = Map::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(properties));
    schema.insert(
        "required".to_string(),
        Value::Array(vec![Value::String(key.to_string())]),
    );

    Value::Object(schema)
}

/// Merge an object schema's properties into an envelope object schema.
///
/// Every merged property name is marked required on the envelope, no
/// matter what the source said about it: fields hoisted to the envelope
/// describe response metadata that is always serialized. A non-object
/// `from` schema makes the merge a no-op.
fn merge_object_schemas(into: &mut Value, from: &Value) {
    if from.get("type").and_then(Value::as_str) != Some("object") {
        return;
    }
    let Some(from_properties) = from.get("properties").and_then(Value::as_object) else {
        return;
    };
    let Some(into_schema) = into.as_object_mut() else {
        return;
    };

    let properties = into_schema
        .entry("properties".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(properties) = properties.as_object_mut() {
        for (name, property) in from_properties {
            properties.insert(name.clone(), property.clone());
        }
    }

    let required = into_schema
        .entry("required".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(required) = required.as_array_mut() {
        for name in from_properties.keys() {
            let name = Value::String(name.clone());
            if !required.contains(&name) {
                required.push(name);
            }
        }
    }
}
