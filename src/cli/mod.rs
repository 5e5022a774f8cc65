//! CLI command definitions and handlers

pub mod find;
pub mod images;
pub mod matches;
pub mod parse;
pub mod rm;
pub mod tag;

use crate::storage::paths::StorePaths;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Imageref - resolve container image references
#[derive(Parser)]
#[command(name = crate::APP_NAME)]
#[command(author, version = crate::VERSION, about, long_about = None)]
pub struct Cli {
    /// Root directory of the local image index (default: ~/.imageref)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Paths of the local image index
    pub fn paths(&self) -> crate::Result<StorePaths> {
        StorePaths::resolve(self.root.as_deref())
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show how an image reference is resolved
    Parse(parse::ParseArgs),

    /// Check which local tags satisfy a requested reference
    Match(matches::MatchArgs),

    /// Create a tag for an image
    Tag(tag::TagArgs),

    /// Remove a tag
    Untag(tag::UntagArgs),

    /// List images
    Images(images::ImagesArgs),

    /// Find the local image satisfying a reference
    Find(find::FindArgs),

    /// Remove one or more images
    Rmi(rm::RmiArgs),
}
