//! # Anneal - Resource Schema Toolkit
//!
//! A library for turning inferred resource serialization types into
//! normalized JSON-Schema-style artifacts and HTTP response envelope
//! descriptions. It is the schema-generation tail of a static-analysis
//! pipeline: the upstream inference engine analyzes resource classes and
//! hands their type trees to this crate as analysis documents.
//!
//! ## Modules
//!
//! - **flatten**: Splice conditional-merge fields into flat item lists
//! - **schema**: Transform type trees into JSON-Schema-style values
//! - **resource**: Build body schemas, response envelopes, and references
//!
//! ## Quick Start
//!
//! ### Body schema
//!
//! ```rust
//! use anneal::{
//!     AnalysisStore, AnalyzedClass, ArrayItem, Primitive, ResourceSchemaBuilder, TypeNode,
//!     ObjectType,
//! };
//! use serde_json::json;
//!
//! let mut store = AnalysisStore::new();
//! store.insert(AnalyzedClass::new("app.UserResource").with_method(
//!     "to_array",
//!     TypeNode::Array(vec![
//!         ArrayItem::keyed("id", TypeNode::Primitive(Primitive::Int)),
//!         ArrayItem::keyed("name", TypeNode::Primitive(Primitive::Str)),
//!     ]),
//! ));
//!
//! let builder = ResourceSchemaBuilder::new(&store);
//! let schema = builder.to_schema(&TypeNode::Object(ObjectType::new("app.UserResource")));
//!
//! assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("object"));
//! assert_eq!(schema.get("required").unwrap(), &json!(["id", "name"]));
//! ```
//!
//! ### Response envelope
//!
//! ```rust
//! use anneal::{
//!     AnalysisStore, AnalyzedClass, Components, ObjectType, ResourceSchemaBuilder, TypeNode,
//! };
//!
//! let mut store = AnalysisStore::new();
//! store.insert(AnalyzedClass::new("app.UserResource").with_wrap_key("user"));
//!
//! let builder = ResourceSchemaBuilder::new(&store);
//! let mut components = Components::new();
//! let response = builder.to_response(
//!     &TypeNode::Object(ObjectType::new("app.UserResource")),
//!     &mut components,
//! );
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(response.wrap_key.as_deref(), Some("user"));
//! assert_eq!(response.description, "`UserResource`");
//! ```

use anyhow::{Context, Result};
use std::io::Read;

pub mod analysis;
pub mod flatten;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod types;

// Re-export commonly used types for convenience
pub use analysis::{
    basic_collection_type, AnalysisDocument, AnalysisStore, AnalyzedClass, ClassAnalyzer,
    DocumentError, ResourceKind,
};
pub use flatten::flatten_merge_values;
pub use registry::{ComponentHandle, Components, SchemaReference};
pub use resource::{ResourceSchemaBuilder, ResponseEnvelope};
pub use schema::transform;
pub use types::{ArrayItem, Literal, MergeType, ObjectProperty, ObjectType, Primitive, TypeNode};

/// Main entry point: load an analysis document from a reader
pub fn analyze_document<R: Read>(mut reader: R) -> Result<AnalysisStore> {
    let mut document = String::new();
    reader
        .read_to_string(&mut document)
        .context("Failed to read analysis document")?;

    AnalysisStore::from_json(&document).context("Failed to load analysis document")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_to_schema() {
        let document = json!({
            "classes": [{
                "name": "app.UserResource",
                "methods": {
                    "to_array": {
                        "kind": "array",
                        "value": [
                            {"key": "id", "value": {"kind": "primitive", "value": "int"}},
                            {"key": "name", "value": {"kind": "primitive", "value": "str"}}
                        ]
                    }
                }
            }]
        })
        .to_string();

        let store = analyze_document(document.as_bytes()).unwrap();
        let builder = ResourceSchemaBuilder::new(&store);
        let schema = builder.to_schema(&TypeNode::Object(ObjectType::new("app.UserResource")));

        assert_eq!(schema.get("required").unwrap(), &json!(["id", "name"]));
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(analyze_document("not json".as_bytes()).is_err());
    }
}
