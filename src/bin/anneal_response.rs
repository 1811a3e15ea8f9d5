//! anneal-response: Emit response envelopes for analyzed resources
//!
//! Reads an analysis document produced by the upstream inference engine
//! and prints the HTTP response description of each handled resource
//! class, with wrap and metadata-merge decisions applied. All envelopes
//! of one run share a component registry, so schema names are unique
//! across the whole document.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   anneal-response analysis.json
//!
//!   # Read from stdin, output to stdout
//!   cat analysis.json | anneal-response
//!
//!   # One resource only, compact output
//!   anneal-response analysis.json --resource app.UserResource --compact

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{stdin, Read};

use anneal::{
    AnalysisDocument, AnalysisStore, Components, ObjectType, ResourceSchemaBuilder, TypeNode,
};

#[derive(Parser, Debug)]
#[command(name = "anneal-response")]
#[command(about = "Emit response envelopes for analyzed resources", long_about = None)]
struct Args {
    /// Input analysis document (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Emit the envelope of a single resource class
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

    let mut content = Vec::new();
    if let Some(file_path) = &args.input {
        File::open(file_path)?
            .read_to_end(&mut content)
            .with_context(|| format!("Failed to read {}", file_path))?;
    } else {
        stdin()
            .read_to_end(&mut content)
            .context("Failed to read stdin")?;
    }

    // Analysis dumps for large codebases can be sizable; simd-json keeps
    // the parse off the profile.
    let document: AnalysisDocument =
        simd_json::from_slice(&mut content).context("Failed to parse analysis document")?;
    let store = AnalysisStore::from_document(document)?;

    let builder = ResourceSchemaBuilder::new(&store);
    let mut components = Components::new();

    let output = if let Some(name) = &args.resource {
        let resource = TypeNode::Object(ObjectType::new(name));
        if !builder.handles(&resource) {
            bail!("no handled resource class `{}` in the analysis document", name);
        }
        serde_json::to_value(builder.to_response(&resource, &mut components))?
    } else {
        let mut names: Vec<&str> = store.class_names().collect();
        names.sort_unstable();

        let mut envelopes = Map::new();
        for name in names {
            let resource = TypeNode::Object(ObjectType::new(name));
            if builder.handles(&resource) {
                let envelope = builder.to_response(&resource, &mut components);
                envelopes.insert(name.to_string(), serde_json::to_value(envelope)?);
            }
        }
        Value::Object(envelopes)
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };

    println!("{}", rendered);

    Ok(())
}
