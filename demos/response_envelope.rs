/// Response envelope demo - wrapping and metadata merging
use anneal::{
    AnalysisStore, AnalyzedClass, ArrayItem, Components, ObjectType, Primitive,
    ResourceSchemaBuilder, TypeNode,
};

fn main() -> anyhow::Result<()> {
    println!("=== Anneal Response Envelopes ===\n");

    let shape = TypeNode::Array(vec![
        ArrayItem::keyed("id", TypeNode::Primitive(Primitive::Int)),
        ArrayItem::keyed("name", TypeNode::Primitive(Primitive::Str)),
    ]);

    // Pagination metadata exposed through the `additional` property
    let additional = TypeNode::Array(vec![ArrayItem::keyed(
        "meta",
        TypeNode::Array(vec![ArrayItem::keyed(
            "total",
            TypeNode::Primitive(Primitive::Int),
        )]),
    )]);

    let mut store = AnalysisStore::new();
    store.insert(
        AnalyzedClass::new("app.UserResource")
            .with_shape(shape.clone())
            .with_property("additional", additional),
    );
    // A second resource with no metadata stays unwrapped
    store.insert(AnalyzedClass::new("app.TagResource").with_shape(shape));

    let builder = ResourceSchemaBuilder::new(&store);
    let mut components = Components::new();

    for name in ["app.UserResource", "app.TagResource"] {
        let response =
            builder.to_response(&TypeNode::Object(ObjectType::new(name)), &mut components);

        println!("{} -> {} {}", name, response.status, response.description);
        match &response.wrap_key {
            Some(key) => println!("wrapped under `{}`:", key),
            None => println!("not wrapped:"),
        }
        println!("{}\n", serde_json::to_string_pretty(&response.body)?);
    }

    println!("✓ Done! Metadata siblings were merged next to `data` as required fields.");

    Ok(())
}
