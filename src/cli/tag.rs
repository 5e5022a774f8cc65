//! `imageref tag` and `imageref untag` command implementations

use crate::image::reference;
use crate::storage::images::ImageStore;
use crate::storage::paths::StorePaths;
use clap::Args;

/// Arguments for the `tag` command
#[derive(Args)]
pub struct TagArgs {
    /// Image ID
    pub image_id: String,

    /// Target image reference
    pub target_image: String,
}

/// Arguments for the `untag` command
#[derive(Args)]
pub struct UntagArgs {
    /// Image reference to remove
    pub image: String,
}

/// Execute the `tag` command
pub fn execute(args: TagArgs, paths: &StorePaths) -> anyhow::Result<()> {
    let image_store = ImageStore::new(paths)?;
    let target_ref = reference::parse(&args.target_image)?;

    image_store.tag(&args.image_id, &target_ref)?;

    Ok(())
}

/// Execute the `untag` command
pub fn execute_untag(args: UntagArgs, paths: &StorePaths) -> anyhow::Result<()> {
    let image_store = ImageStore::new(paths)?;
    let target_ref = reference::parse(&args.image)?;

    match image_store.untag(&target_ref)? {
        Some(_) => println!("Untagged: {}", target_ref.repo_tag()),
        None => eprintln!("Error: No such image: {}", args.image),
    }

    Ok(())
}
