//! Local image index
//!
//! Records which tags each locally present image is known under, and answers
//! whether a requested reference is already satisfied by one of them.

use crate::image::reference::{self, Reference};
use crate::storage::paths::StorePaths;
use crate::{ImageRefError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;

const SHORT_ID_LEN: usize = 12;

/// An image and the full tags it is listed under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    #[serde(default)]
    pub repo_tags: Vec<String>,
    pub created: DateTime<Utc>,
}

impl ImageRecord {
    pub fn short_id(&self) -> &str {
        short_id(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ImageIndex {
    images: BTreeMap<String, ImageRecord>,
}

/// Manages the on-disk image index
pub struct ImageStore {
    paths: StorePaths,
}

impl ImageStore {
    /// Create a new image store
    pub fn new(paths: &StorePaths) -> Result<Self> {
        Ok(Self {
            paths: paths.clone(),
        })
    }

    /// Find a local image satisfying a requested reference.
    ///
    /// A reference without a tag is satisfied by any tag of the repository.
    pub fn find_image(&self, requested: &Reference) -> Option<String> {
        let index = self.readable_index()?;
        index
            .images
            .values()
            .find(|record| record.repo_tags.iter().any(|t| requested.matches(t)))
            .map(|record| {
                tracing::debug!("{} satisfied by image {}", requested, record.short_id());
                record.id.clone()
            })
    }

    /// Find an image by exact tag, ID, or short ID.
    ///
    /// A name without a tag means `:latest`; other tags are never guessed.
    pub fn find(&self, name_or_id: &str) -> Option<String> {
        let index = self.readable_index()?;

        // Normalized exact tag (`docker.io/library/x` finds `library/x:latest`)
        let exact = reference::parse(name_or_id).ok().map(|r| r.repo_tag());
        let with_latest = format!("{}:{}", name_or_id, reference::DEFAULT_TAG);
        if let Some(record) = index.images.values().find(|record| {
            record.repo_tags.iter().any(|t| {
                t == name_or_id || *t == with_latest || exact.as_deref() == Some(t.as_str())
            })
        }) {
            return Some(record.id.clone());
        }

        // Full or short ID
        index
            .images
            .values()
            .find(|r| r.id == name_or_id || r.short_id() == name_or_id)
            .map(|record| record.id.clone())
    }

    /// Tag an image, creating its record if needed.
    ///
    /// A tag names at most one image, so it is moved off any other record.
    pub fn tag(&self, image_id: &str, reference: &Reference) -> Result<()> {
        let repo_tag = reference.repo_tag();
        let mut index = self.load_index()?;

        for record in index.images.values_mut() {
            if record.id != image_id {
                record.repo_tags.retain(|t| *t != repo_tag);
            }
        }

        let record = index
            .images
            .entry(image_id.to_string())
            .or_insert_with(|| ImageRecord {
                id: image_id.to_string(),
                repo_tags: Vec::new(),
                created: Utc::now(),
            });
        if !record.repo_tags.contains(&repo_tag) {
            record.repo_tags.push(repo_tag.clone());
        }

        self.save_index(&index)?;
        tracing::info!("Tagged {} as {}", short_id(image_id), repo_tag);
        Ok(())
    }

    /// Remove a tag, returning the image it pointed to
    pub fn untag(&self, reference: &Reference) -> Result<Option<String>> {
        let repo_tag = reference.repo_tag();
        let mut index = self.load_index()?;

        let owner = index
            .images
            .values_mut()
            .find(|record| record.repo_tags.contains(&repo_tag));
        let Some(record) = owner else {
            return Ok(None);
        };
        record.repo_tags.retain(|t| *t != repo_tag);
        let image_id = record.id.clone();

        self.save_index(&index)?;
        tracing::info!("Untagged {} from {}", repo_tag, short_id(&image_id));
        Ok(Some(image_id))
    }

    /// Remove an image and all its tags
    pub fn remove(&self, image_id: &str) -> Result<ImageRecord> {
        let mut index = self.load_index()?;
        let record = index
            .images
            .remove(image_id)
            .ok_or_else(|| ImageRefError::ImageNotFound(image_id.to_string()))?;
        self.save_index(&index)?;
        tracing::info!("Removed image {}", record.short_id());
        Ok(record)
    }

    /// List all images
    pub fn list(&self) -> Result<Vec<ImageRecord>> {
        Ok(self.load_index()?.images.into_values().collect())
    }

    fn readable_index(&self) -> Option<ImageIndex> {
        match self.load_index() {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::warn!(
                    "Could not read image index {}: {}",
                    self.paths.image_index().display(),
                    e
                );
                None
            }
        }
    }

    fn load_index(&self) -> Result<ImageIndex> {
        let index_path = self.paths.image_index();
        if !index_path.exists() {
            return Ok(ImageIndex::default());
        }
        let index_json = fs::read_to_string(&index_path)?;
        let index: ImageIndex = serde_json::from_str(&index_json)?;
        Ok(index)
    }

    fn save_index(&self, index: &ImageIndex) -> Result<()> {
        self.paths.ensure_directories()?;
        let index_json = serde_json::to_string_pretty(index)?;
        fs::write(self.paths.image_index(), index_json)?;
        Ok(())
    }
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> ImageStore {
        ImageStore::new(&StorePaths::with_root(tmp.path())).unwrap()
    }

    fn reference(raw: &str) -> Reference {
        reference::parse(raw).unwrap()
    }

    #[test]
    fn test_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.find_image(&reference("cirros")), None);
        assert_eq!(store.find("cirros"), None);
    }

    #[test]
    fn test_tag_and_find() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .tag("abc123456789def", &reference("docker.io/library/cirros:0.6"))
            .unwrap();

        // Stored under the qualified name, default registry dropped
        let images = store.list().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].repo_tags, vec!["library/cirros:0.6".to_string()]);

        let id = Some("abc123456789def".to_string());
        assert_eq!(store.find_image(&reference("library/cirros")), id);
        assert_eq!(store.find_image(&reference("library/cirros:0.6")), id);
        assert_eq!(store.find_image(&reference("library/cirros:0.5")), None);
        assert_eq!(store.find_image(&reference("cirros")), None);

        assert_eq!(store.find("library/cirros:0.6"), id);
        assert_eq!(store.find("abc123456789"), id);
        assert_eq!(store.find("abc123456789def"), id);
        assert_eq!(store.find("index.docker.io/library/cirros:0.6"), id);
        assert_eq!(store.find("index.docker.io/library/cirros"), None);
    }

    #[test]
    fn test_find_appends_latest() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.tag("img1", &reference("localhost:5000/app")).unwrap();
        assert_eq!(store.find("localhost:5000/app"), Some("img1".to_string()));
    }

    #[test]
    fn test_find_does_not_guess_tags() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.tag("bbb", &reference("app:v2")).unwrap();
        store.tag("aaa", &reference("app:v1")).unwrap();

        assert_eq!(store.find("app"), None);
        assert_eq!(store.find("app:v1"), Some("aaa".to_string()));
        assert_eq!(store.find("app:v2"), Some("bbb".to_string()));
        // Presence checks still accept any tag
        assert_eq!(store.find_image(&reference("app")), Some("aaa".to_string()));
    }

    #[test]
    fn test_corrupt_index_reads_as_missing() {
        let tmp = TempDir::new().unwrap();
        let paths = StorePaths::with_root(tmp.path());
        paths.ensure_directories().unwrap();
        fs::write(paths.image_index(), "{not json").unwrap();

        let store = ImageStore::new(&paths).unwrap();
        assert_eq!(store.find("app"), None);
        assert_eq!(store.find_image(&reference("app")), None);
        assert!(matches!(store.list(), Err(ImageRefError::Json(_))));
    }

    #[test]
    fn test_tag_moves_between_images() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.tag("img1", &reference("app:v1")).unwrap();
        store.tag("img1", &reference("app:v1")).unwrap();
        store.tag("img2", &reference("app:v1")).unwrap();

        let images = store.list().unwrap();
        assert_eq!(images.len(), 2);
        assert!(images[0].repo_tags.is_empty());
        assert_eq!(images[1].repo_tags, vec!["app:v1".to_string()]);
    }

    #[test]
    fn test_untag_and_remove() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.tag("img1", &reference("app:v1")).unwrap();
        assert_eq!(
            store.untag(&reference("app:v1")).unwrap(),
            Some("img1".to_string())
        );
        assert_eq!(store.untag(&reference("app:v1")).unwrap(), None);
        assert_eq!(store.find_image(&reference("app")), None);

        let record = store.remove("img1").unwrap();
        assert_eq!(record.id, "img1");
        assert!(matches!(
            store.remove("img1"),
            Err(ImageRefError::ImageNotFound(_))
        ));
    }
}
