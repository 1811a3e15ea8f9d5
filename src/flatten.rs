//! Merge flattening - normalize conditional merges inside array types
//!
//! An inferred array type can contain conditional-merge nodes ("these
//! fields are present only if a runtime condition holds"). Schema
//! generation needs a flat field list, so this module rewrites an item
//! list by splicing each merge's payload fields in place of the merge
//! node, propagating optionality onto fields whose presence is not
//! guaranteed.
//!
//! The rewrite is a pure function over the input slice. It returns newly
//! built items and never mutates the tree it was given, so a sub-tree
//! shared between two parents can be flattened from both sides without
//! either observing the other's result.

use crate::types::{ArrayItem, TypeNode};

/// Flatten conditional merges out of an array type's item list.
///
/// Items are processed in input order and order is preserved in the
/// output; schema field ordering depends on it. Each item is handled by
/// one of three rules:
///
/// - a nested array value is rebuilt with its own items flattened and
///   kept as a single entry,
/// - a conditional merge is replaced by the flattened items of its
///   payload (zero items if the payload is not an array),
/// - anything else passes through unchanged.
///
/// A merge whose `required` flag is not the boolean literal `true` may
/// not occur at runtime, so every field it contributes is marked
/// optional. A merge that is statically known to apply keeps the
/// optionality its payload items already had.
///
/// The output contains no conditional-merge nodes at any depth, so
/// flattening an already-flattened list returns it unchanged.
pub fn flatten_merge_values(items: &[ArrayItem]) -> Vec<ArrayItem> {
    let mut result = Vec::with_capacity(items.len());

    for item in items {
        match &item.value {
            TypeNode::Array(inner) => {
                result.push(ArrayItem {
                    key: item.key.clone(),
                    value: TypeNode::Array(flatten_merge_values(inner)),
                    is_optional: item.is_optional,
                });
            }
            TypeNode::ConditionalMerge(merge) => {
                // The payload of a merge must be an array type. Anything
                // else is ignored and contributes nothing to the result.
                let Some(payload_items) = merge.payload.array_items() else {
                    tracing::debug!(
                        key = item.key.as_deref().unwrap_or("<positional>"),
                        "dropping conditional merge with non-array payload"
                    );
                    continue;
                };

                // Flatten nested merges first, then force optionality at
                // this level if the merge itself is not guaranteed.
                let mut merged = flatten_merge_values(payload_items);

                if !merge.required.is_true_literal() {
                    for merged_item in &mut merged {
                        merged_item.is_optional = true;
                    }
                }

                result.extend(merged);
            }
            _ => result.push(item.clone()),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Literal, Primitive};

    fn int() -> TypeNode {
        TypeNode::Primitive(Primitive::Int)
    }

    fn string() -> TypeNode {
        TypeNode::Primitive(Primitive::Str)
    }

    fn bool_literal(value: bool) -> TypeNode {
        TypeNode::Literal(Literal::Bool(value))
    }

    #[test]
    fn test_plain_items_pass_through_in_order() {
        let items = vec![
            ArrayItem::keyed("id", int()),
            ArrayItem::keyed("name", string()).optional(),
            ArrayItem::positional(string()),
        ];

        let flattened = flatten_merge_values(&items);
        assert_eq!(flattened, items);
    }

    #[test]
    fn test_optional_merge_forces_optionality() {
        let payload = TypeNode::Array(vec![
            ArrayItem::keyed("email", string()),
            ArrayItem::keyed("phone", string()).optional(),
        ]);
        let items = vec![
            ArrayItem::keyed("id", int()),
            ArrayItem::positional(TypeNode::merge(bool_literal(false), payload)),
        ];

        let flattened = flatten_merge_values(&items);

        assert_eq!(flattened.len(), 3);
        assert_eq!(flattened[0].key.as_deref(), Some("id"));
        assert!(!flattened[0].is_optional);
        assert_eq!(flattened[1].key.as_deref(), Some("email"));
        assert!(flattened[1].is_optional);
        assert_eq!(flattened[2].key.as_deref(), Some("phone"));
        assert!(flattened[2].is_optional);
    }

    #[test]
    fn test_required_merge_keeps_original_optionality() {
        let payload = TypeNode::Array(vec![
            ArrayItem::keyed("email", string()),
            ArrayItem::keyed("phone", string()).optional(),
        ]);
        let items = vec![ArrayItem::positional(TypeNode::merge(
            bool_literal(true),
            payload,
        ))];

        let flattened = flatten_merge_values(&items);

        assert_eq!(flattened.len(), 2);
        assert!(!flattened[0].is_optional);
        assert!(flattened[1].is_optional);
    }

    #[test]
    fn test_non_boolean_required_flag_treated_as_not_guaranteed() {
        // A merge whose condition could not be resolved to `true` cannot
        // guarantee its fields.
        let payload = TypeNode::Array(vec![ArrayItem::keyed("email", string())]);
        let items = vec![ArrayItem::positional(TypeNode::merge(
            TypeNode::Unknown,
            payload,
        ))];

        let flattened = flatten_merge_values(&items);
        assert!(flattened[0].is_optional);
    }

    #[test]
    fn test_malformed_merge_payload_is_dropped() {
        let items = vec![
            ArrayItem::keyed("id", int()),
            ArrayItem::positional(TypeNode::merge(bool_literal(true), TypeNode::Unknown)),
            ArrayItem::keyed("name", string()),
        ];

        let flattened = flatten_merge_values(&items);

        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened[0].key.as_deref(), Some("id"));
        assert_eq!(flattened[1].key.as_deref(), Some("name"));
    }

    #[test]
    fn test_splice_preserves_surrounding_order() {
        let payload = TypeNode::Array(vec![
            ArrayItem::keyed("b", int()),
            ArrayItem::keyed("c", int()),
        ]);
        let items = vec![
            ArrayItem::keyed("a", int()),
            ArrayItem::positional(TypeNode::merge(bool_literal(true), payload)),
            ArrayItem::keyed("d", int()),
        ];

        let flattened = flatten_merge_values(&items);
        let keys: Vec<_> = flattened.iter().filter_map(|i| i.key.as_deref()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_nested_merges_flatten_fully() {
        // The outer merge is optional, the inner one is required. The
        // inner payload is flattened first, then the outer pass marks
        // everything optional.
        let inner = TypeNode::merge(
            bool_literal(true),
            TypeNode::Array(vec![ArrayItem::keyed("deep", int())]),
        );
        let outer_payload = TypeNode::Array(vec![
            ArrayItem::keyed("shallow", int()),
            ArrayItem::positional(inner),
        ]);
        let items = vec![ArrayItem::positional(TypeNode::merge(
            bool_literal(false),
            outer_payload,
        ))];

        let flattened = flatten_merge_values(&items);

        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened[0].key.as_deref(), Some("shallow"));
        assert!(flattened[0].is_optional);
        assert_eq!(flattened[1].key.as_deref(), Some("deep"));
        assert!(flattened[1].is_optional);
    }

    #[test]
    fn test_merge_inside_nested_array_value() {
        // A keyed item holding an array that itself contains a merge is
        // flattened at all depths in one top-level call.
        let nested = TypeNode::Array(vec![ArrayItem::positional(TypeNode::merge(
            bool_literal(false),
            TypeNode::Array(vec![ArrayItem::keyed("inner", int())]),
        ))]);
        let items = vec![ArrayItem::keyed("wrapper", nested)];

        let flattened = flatten_merge_values(&items);

        assert_eq!(flattened.len(), 1);
        let inner_items = flattened[0].value.array_items().unwrap();
        assert_eq!(inner_items.len(), 1);
        assert_eq!(inner_items[0].key.as_deref(), Some("inner"));
        assert!(inner_items[0].is_optional);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let payload = TypeNode::Array(vec![
            ArrayItem::keyed("x", int()),
            ArrayItem::positional(TypeNode::merge(
                bool_literal(true),
                TypeNode::Array(vec![ArrayItem::keyed("y", string())]),
            )),
        ]);
        let items = vec![
            ArrayItem::keyed("a", int()),
            ArrayItem::positional(TypeNode::merge(bool_literal(false), payload)),
            ArrayItem::keyed(
                "nested",
                TypeNode::Array(vec![ArrayItem::keyed("z", int())]),
            ),
        ];

        let once = flatten_merge_values(&items);
        let twice = flatten_merge_values(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_tree_is_not_mutated() {
        let payload = TypeNode::Array(vec![ArrayItem::keyed("email", string())]);
        let items = vec![ArrayItem::positional(TypeNode::merge(
            bool_literal(false),
            payload,
        ))];
        let snapshot = items.clone();

        let flattened = flatten_merge_values(&items);

        assert!(flattened[0].is_optional);
        assert_eq!(items, snapshot);
    }
}
