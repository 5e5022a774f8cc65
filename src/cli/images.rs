//! `imageref images` command implementation

use crate::image::reference;
use crate::storage::images::ImageStore;
use crate::storage::paths::StorePaths;
use clap::Args;

/// Arguments for the `images` command
#[derive(Args)]
pub struct ImagesArgs {
    /// Only list images satisfying this reference
    pub reference: Option<String>,

    /// Only show image IDs
    #[arg(short, long)]
    pub quiet: bool,

    /// Don't truncate output
    #[arg(long)]
    pub no_trunc: bool,
}

/// Execute the `images` command
pub fn execute(args: ImagesArgs, paths: &StorePaths) -> anyhow::Result<()> {
    let image_store = ImageStore::new(paths)?;
    let images = image_store.list()?;

    let filter = args.reference.as_deref().map(reference::parse).transpose()?;

    if !args.quiet {
        println!("{:<40} {:<20} {:<20} {:<20}", "REPOSITORY", "TAG", "IMAGE ID", "CREATED");
    }

    for image in images {
        let id = if args.no_trunc {
            image.id.as_str()
        } else {
            image.short_id()
        };

        let tags: Vec<&String> = image
            .repo_tags
            .iter()
            .filter(|t| filter.as_ref().map_or(true, |f| f.matches(t)))
            .collect();

        if args.quiet {
            if filter.is_none() || !tags.is_empty() {
                println!("{}", id);
            }
            continue;
        }

        let created = format_time_ago(image.created);
        if tags.is_empty() {
            if filter.is_none() {
                println!("{:<40} {:<20} {:<20} {:<20}", "<none>", "<none>", id, created);
            }
            continue;
        }

        for full_tag in tags {
            let (repo, tag) = split_repo_tag(full_tag);
            println!("{:<40} {:<20} {:<20} {:<20}", repo, tag, id, created);
        }
    }

    Ok(())
}

/// Split a stored `qualified_name:tag` into its repository and tag columns
fn split_repo_tag(full_tag: &str) -> (String, String) {
    match reference::parse(full_tag) {
        Ok(parsed) => (parsed.qualified_name(), parsed.tag().to_string()),
        Err(_) => (full_tag.to_string(), "<none>".to_string()),
    }
}

/// Format a timestamp as a human-readable "time ago" string
fn format_time_ago(time: chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let duration = now.signed_duration_since(time);

    if duration.num_days() > 365 {
        format!("{} years ago", duration.num_days() / 365)
    } else if duration.num_days() > 30 {
        format!("{} months ago", duration.num_days() / 30)
    } else if duration.num_days() > 7 {
        format!("{} weeks ago", duration.num_days() / 7)
    } else if duration.num_days() > 0 {
        format!("{} days ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes ago", duration.num_minutes())
    } else {
        "Less than a minute ago".to_string()
    }
}
