use serde::{Deserialize, Serialize};

/// A primitive type without an attached value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl Primitive {
    /// The JSON Schema type name for this primitive
    pub fn schema_type(self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Bool => "boolean",
            Primitive::Int => "integer",
            Primitive::Float => "number",
            Primitive::Str => "string",
        }
    }
}

/// A literal type: a primitive narrowed to a single known value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

/// One entry of an array type.
///
/// A keyed item corresponds to a named field; an item without a key is a
/// positional/list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayItem {
    /// Field name; `None` for positional items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// The item's inferred type
    pub value: TypeNode,

    /// Whether the field may be absent from the serialized output.
    /// Flattening may force this to `true`, never back to `false`.
    #[serde(default)]
    pub is_optional: bool,
}

impl ArrayItem {
    /// A required keyed item
    pub fn keyed(key: impl Into<String>, value: TypeNode) -> Self {
        ArrayItem {
            key: Some(key.into()),
            value,
            is_optional: false,
        }
    }

    /// A positional (unkeyed) item
    pub fn positional(value: TypeNode) -> Self {
        ArrayItem {
            key: None,
            value,
            is_optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }
}

/// A named object type with its analyzed properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Fully-qualified class name as reported by the analysis pipeline
    pub name: String,

    /// Declared properties in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ObjectProperty>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectType {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: TypeNode) -> Self {
        self.properties.push(ObjectProperty {
            name: name.into(),
            value,
        });
        self
    }
}

/// A single declared property of an [`ObjectType`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub name: String,
    pub value: TypeNode,
}

/// A conditional merge: fields spliced into the enclosing array only if a
/// runtime condition holds.
///
/// `required` is a boolean literal when the condition is statically known.
/// Only `Literal(Bool(true))` guarantees the merged fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeType {
    pub required: Box<TypeNode>,
    pub payload: Box<TypeNode>,
}

/// An inferred runtime type, as produced by the upstream inference engine.
///
/// Trees are acyclic and exclusively own their children. Flattening
/// rebuilds trees instead of mutating them, so an input tree is never
/// changed by any operation in this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeNode {
    /// Nothing is known about this type
    Unknown,

    /// A primitive type
    Primitive(Primitive),

    /// A primitive narrowed to one value
    Literal(Literal),

    /// An ordered sequence of named-or-positional items
    Array(Vec<ArrayItem>),

    /// A named object with declared properties
    Object(ObjectType),

    /// Conditionally merged fields, see [`MergeType`]
    ConditionalMerge(MergeType),
}

impl TypeNode {
    /// Convenience constructor for a conditional merge
    pub fn merge(required: TypeNode, payload: TypeNode) -> Self {
        TypeNode::ConditionalMerge(MergeType {
            required: Box::new(required),
            payload: Box::new(payload),
        })
    }

    /// The items of an array type, if this is one
    pub fn array_items(&self) -> Option<&[ArrayItem]> {
        match self {
            TypeNode::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeNode::Array(_))
    }

    /// True for the boolean literal `true`
    pub fn is_true_literal(&self) -> bool {
        matches!(self, TypeNode::Literal(Literal::Bool(true)))
    }
}
