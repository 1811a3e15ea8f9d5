//! anneal-schema: Emit flattened body schemas for analyzed resources
//!
//! Reads an analysis document produced by the upstream inference engine
//! and prints the normalized JSON schema of each handled resource class.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   anneal-schema analysis.json
//!
//!   # Read from stdin, output to stdout
//!   cat analysis.json | anneal-schema
//!
//!   # One resource only, compact output
//!   anneal-schema analysis.json --resource app.UserResource --compact

use anyhow::{bail, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{stdin, Read};

use anneal::{analyze_document, ObjectType, ResourceSchemaBuilder, TypeNode};

#[derive(Parser, Debug)]
#[command(name = "anneal-schema")]
#[command(about = "Emit flattened body schemas for analyzed resources", long_about = None)]
struct Args {
    /// Input analysis document (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Emit the schema of a single resource class
    #[arg(long)]
    resource: Option<String>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(File::open(file_path)?)
    } else {
        Box::new(stdin())
    };

    let store = analyze_document(reader)?;
    let builder = ResourceSchemaBuilder::new(&store);

    let output = if let Some(name) = &args.resource {
        let resource = TypeNode::Object(ObjectType::new(name));
        if !builder.handles(&resource) {
            bail!("no handled resource class `{}` in the analysis document", name);
        }
        builder.to_schema(&resource)
    } else {
        let mut names: Vec<&str> = store.class_names().collect();
        names.sort_unstable();

        let mut schemas = Map::new();
        for name in names {
            let resource = TypeNode::Object(ObjectType::new(name));
            if builder.handles(&resource) {
                schemas.insert(name.to_string(), builder.to_schema(&resource));
            }
        }
        Value::Object(schemas)
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };

    println!("{}", rendered);

    Ok(())
}
