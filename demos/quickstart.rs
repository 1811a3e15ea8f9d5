/// Quickstart demo - the simplest possible usage
use anneal::{
    AnalysisStore, AnalyzedClass, ArrayItem, Literal, ObjectType, Primitive,
    ResourceSchemaBuilder, TypeNode,
};

fn main() -> anyhow::Result<()> {
    println!("=== Anneal Quick Start ===\n");

    // Step 1: A resource class as the inference engine would report it.
    // The serialization method returns id and name unconditionally, and
    // an email field only when a runtime condition holds.
    let to_array = TypeNode::Array(vec![
        ArrayItem::keyed("id", TypeNode::Primitive(Primitive::Int)),
        ArrayItem::keyed("name", TypeNode::Primitive(Primitive::Str)),
        ArrayItem::positional(TypeNode::merge(
            TypeNode::Literal(Literal::Bool(false)),
            TypeNode::Array(vec![ArrayItem::keyed(
                "email",
                TypeNode::Primitive(Primitive::Str),
            )]),
        )),
    ]);

    let mut store = AnalysisStore::new();
    store.insert(AnalyzedClass::new("app.UserResource").with_method("to_array", to_array));

    // Step 2: Build the flattened body schema
    let builder = ResourceSchemaBuilder::new(&store);
    let schema = builder.to_schema(&TypeNode::Object(ObjectType::new("app.UserResource")));

    // Step 3: Look at what we got. The conditional email field is a
    // regular property now, just not listed as required.
    println!("Body schema:");
    println!("{}\n", serde_json::to_string_pretty(&schema)?);

    println!("✓ Done! `email` was spliced in as an optional property.");

    Ok(())
}
