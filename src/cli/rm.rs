//! `imageref rmi` command implementation

use crate::storage::images::ImageStore;
use crate::storage::paths::StorePaths;
use anyhow::bail;
use clap::Args;

/// Arguments for the `rmi` command
#[derive(Args)]
pub struct RmiArgs {
    /// Image tags or IDs to remove
    #[arg(required = true)]
    pub images: Vec<String>,
}

/// Execute the `rmi` command
pub fn execute(args: RmiArgs, paths: &StorePaths) -> anyhow::Result<()> {
    let image_store = ImageStore::new(paths)?;
    let mut missing = Vec::new();

    for image_ref in &args.images {
        let image_id = match image_store.find(image_ref) {
            Some(id) => id,
            None => {
                eprintln!("Error: No such image: {}", image_ref);
                missing.push(image_ref.as_str());
                continue;
            }
        };

        let record = image_store.remove(&image_id)?;
        for tag in &record.repo_tags {
            println!("Untagged: {}", tag);
        }
        println!("Deleted: {}", record.id);
    }

    if !missing.is_empty() {
        bail!("No such image: {}", missing.join(", "));
    }

    Ok(())
}
