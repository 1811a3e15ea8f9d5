//! Inference engine boundary
//!
//! The upstream static-analysis pipeline analyzes resource classes and
//! hands the results to this crate as [`AnalyzedClass`] values, usually
//! batched in a JSON analysis document. This module defines that
//! boundary: the analyzed-class record, the [`ClassAnalyzer`] lookup
//! trait, the in-memory [`AnalysisStore`], and the best-effort
//! collection-shape helper.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ArrayItem, TypeNode};

/// Property naming a collection's element type, when the analyzer
/// resolved one
pub const COLLECTS_PROPERTY: &str = "collects";

/// How a resource class presents its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A single-object resource
    Resource,
    /// A declared collection resource class
    Collection,
    /// An ad-hoc collection created inline; schema-ed elsewhere in the
    /// pipeline
    AnonymousCollection,
}

impl Default for ResourceKind {
    fn default() -> Self {
        ResourceKind::Resource
    }
}

/// Everything the inference engine produced for one resource class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedClass {
    /// Fully-qualified class name
    pub name: String,

    #[serde(default)]
    pub kind: ResourceKind,

    /// Per-class wrap-key override declared on the class itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_key: Option<String>,

    /// The class's own inferred serialization shape
    #[serde(default = "unknown_type")]
    pub shape: TypeNode,

    /// Return types of analyzed method calls, keyed by method name
    #[serde(default)]
    methods: HashMap<String, TypeNode>,

    /// Types of analyzed property fetches, keyed by property name
    #[serde(default)]
    properties: HashMap<String, TypeNode>,
}

fn unknown_type() -> TypeNode {
    TypeNode::Unknown
}

impl AnalyzedClass {
    pub fn new(name: impl Into<String>) -> Self {
        AnalyzedClass {
            name: name.into(),
            kind: ResourceKind::Resource,
            wrap_key: None,
            shape: TypeNode::Unknown,
            methods: HashMap::new(),
            properties: HashMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_wrap_key(mut self, key: impl Into<String>) -> Self {
        self.wrap_key = Some(key.into());
        self
    }

    pub fn with_shape(mut self, shape: TypeNode) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_method(mut self, name: impl Into<String>, return_type: TypeNode) -> Self {
        self.methods.insert(name.into(), return_type);
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, ty: TypeNode) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }

    /// The analyzed return type of a method call, if the method was seen
    pub fn method_return_type(&self, name: &str) -> Option<&TypeNode> {
        self.methods.get(name)
    }

    /// The analyzed type of a property fetch, if the property was seen
    pub fn property_type(&self, name: &str) -> Option<&TypeNode> {
        self.properties.get(name)
    }
}

/// Lookup of class analyses by fully-qualified name.
///
/// `None` means the upstream engine produced no analysis for the class;
/// consumers degrade to the unknown schema rather than failing.
pub trait ClassAnalyzer {
    fn analyze_class(&self, name: &str) -> Option<&AnalyzedClass>;
}

/// In-memory [`ClassAnalyzer`] backed by a name-keyed map
#[derive(Debug, Default)]
pub struct AnalysisStore {
    classes: HashMap<String, AnalyzedClass>,
}

impl AnalysisStore {
    pub fn new() -> Self {
        AnalysisStore::default()
    }

    /// Insert a class analysis, replacing any previous one for the name
    pub fn insert(&mut self, class: AnalyzedClass) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Parse an analysis document (`{"classes": [...]}`)
    pub fn from_json(document: &str) -> Result<Self, DocumentError> {
        let document: AnalysisDocument = serde_json::from_str(document)?;
        Self::from_document(document)
    }

    /// Build a store from an already-parsed document
    pub fn from_document(document: AnalysisDocument) -> Result<Self, DocumentError> {
        let mut store = AnalysisStore::new();
        for class in document.classes {
            if store.classes.contains_key(&class.name) {
                return Err(DocumentError::DuplicateClass(class.name));
            }
            store.insert(class);
        }
        Ok(store)
    }

    /// Class names in the store, in no particular order
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassAnalyzer for AnalysisStore {
    fn analyze_class(&self, name: &str) -> Option<&AnalyzedClass> {
        self.classes.get(name)
    }
}

/// Wire format for a batch of class analyses
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub classes: Vec<AnalyzedClass>,
}

/// Errors from loading an analysis document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse analysis document")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate class `{0}` in analysis document")]
    DuplicateClass(String),
}

/// Best-effort shape for a collection class whose serialization method
/// could not be analyzed as an array.
///
/// Collections present a list of their element type. When the analyzer
/// resolved what the class collects, the list carries that element;
/// otherwise the element is unknown. Non-collection classes have no
/// basic collection shape.
pub fn basic_collection_type(class: &AnalyzedClass) -> Option<TypeNode> {
    if class.kind != ResourceKind::Collection {
        return None;
    }

    let element = class
        .property_type(COLLECTS_PROPERTY)
        .cloned()
        .unwrap_or(TypeNode::Unknown);

    Some(TypeNode::Array(vec![ArrayItem::positional(element)]))
}
