//! `imageref find` command implementation

use crate::image::reference;
use crate::storage::images::ImageStore;
use crate::storage::paths::StorePaths;
use crate::ImageRefError;
use clap::Args;

/// Arguments for the `find` command
#[derive(Args)]
pub struct FindArgs {
    /// Image reference, tag, or ID
    pub image: String,

    /// Print what a pull would request when the image is not present
    #[arg(long)]
    pub pull_hint: bool,
}

/// Execute the `find` command
pub fn execute(args: FindArgs, paths: &StorePaths) -> anyhow::Result<()> {
    let image_store = ImageStore::new(paths)?;

    if let Some(image_id) = image_store.find(&args.image) {
        println!("{}", image_id);
        return Ok(());
    }

    let requested = reference::parse(&args.image)?;
    if let Some(image_id) = image_store.find_image(&requested) {
        println!("{}", image_id);
        return Ok(());
    }

    if args.pull_hint {
        let pull = requested.pull_spec();
        eprintln!(
            "Not present locally; pull {}:{} from {}",
            pull.image,
            pull.tag,
            requested.registry_url()
        );
    }

    Err(ImageRefError::ImageNotFound(args.image).into())
}
