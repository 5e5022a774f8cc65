//! `imageref parse` command implementation

use crate::image::reference::{self, Reference};
use clap::Args;
use serde_json::json;

/// Arguments for the `parse` command
#[derive(Args)]
pub struct ParseArgs {
    /// Image references to resolve
    #[arg(required = true)]
    pub references: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Accept orchestrator image UUIDs with a `docker:` prefix
    #[arg(long)]
    pub uuid: bool,
}

/// Execute the `parse` command
pub fn execute(args: ParseArgs) -> anyhow::Result<()> {
    let mut results = Vec::new();

    for raw in &args.references {
        let resolved = if args.uuid {
            reference::parse_image_uuid(raw)?
        } else {
            reference::parse(raw)?
        };
        results.push(resolved);
    }

    if args.json {
        let output: Vec<_> = results.iter().map(to_json).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for resolved in &results {
        print_reference(resolved);
    }

    Ok(())
}

/// Structured view including the derived names
pub fn to_json(reference: &Reference) -> serde_json::Value {
    json!({
        "Reference": reference,
        "LookupName": reference.lookup_name(),
        "QualifiedName": reference.qualified_name(),
        "RepoTag": reference.repo_tag(),
        "RegistryUrl": reference.registry_url(),
        "Pull": reference.pull_spec(),
    })
}

fn print_reference(reference: &Reference) {
    println!("{}", reference.full_name());
    println!("  {:<16} {}", "Registry:", reference.registry_host().unwrap_or("<default>"));
    println!("  {:<16} {}", "Namespace:", reference.namespace().unwrap_or("<none>"));
    println!("  {:<16} {}", "Repository:", reference.repository());
    println!("  {:<16} {}", "Tag:", reference.tag());
    println!("  {:<16} {}", "Lookup name:", reference.lookup_name());
    println!("  {:<16} {}", "Qualified name:", reference.qualified_name());
}
