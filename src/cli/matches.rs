//! `imageref match` command implementation

use crate::image::reference::{self, Reference};
use anyhow::bail;
use clap::Args;

/// Arguments for the `match` command
#[derive(Args)]
pub struct MatchArgs {
    /// Requested image reference
    pub requested: String,

    /// Full tags of local images (e.g. from an image listing)
    #[arg(required = true)]
    pub candidates: Vec<String>,
}

/// Execute the `match` command
pub fn execute(args: MatchArgs) -> anyhow::Result<()> {
    let requested = reference::parse(&args.requested)?;
    let found = matching(&requested, &args.candidates);

    if found.is_empty() {
        bail!("No local tag satisfies {}", requested);
    }
    for candidate in found {
        println!("{}", candidate);
    }

    Ok(())
}

/// Candidates that satisfy `requested`, in the given order
pub fn matching<'a>(requested: &Reference, candidates: &'a [String]) -> Vec<&'a str> {
    candidates
        .iter()
        .map(String::as_str)
        .filter(|candidate| requested.matches(candidate))
        .collect()
}
