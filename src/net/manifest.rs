//! Photo manifest: folder name → ordered file names.
//!
//! Fetched once, on first use, and kept for the lifetime of the owner.
//! A failed fetch or a malformed document is logged and behaves as an
//! empty manifest, so photo lookups degrade to "no images".

use std::collections::HashMap;
use std::sync::OnceLock;

use super::fetch::AssetSource;
use crate::error::AtlasError;

pub type ManifestEntries = HashMap<String, Vec<String>>;

#[derive(Debug)]
pub struct PhotoManifest {
    source: AssetSource,
    manifest_file: String,
    photo_root: String,
    entries: OnceLock<ManifestEntries>,
}

impl PhotoManifest {
    pub fn new(source: AssetSource, manifest_file: &str, photo_root: &str) -> Self {
        Self {
            source,
            manifest_file: manifest_file.to_string(),
            photo_root: photo_root.to_string(),
            entries: OnceLock::new(),
        }
    }

    /// Manifest with entries supplied up front (nothing is fetched).
    pub fn preloaded(source: AssetSource, photo_root: &str, entries: ManifestEntries) -> Self {
        let manifest = Self::new(source, "", photo_root);
        let _ = manifest.entries.set(entries);
        manifest
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    /// Entries, fetching on the first call.
    pub fn entries(&self) -> &ManifestEntries {
        self.entries.get_or_init(|| match self.fetch() {
            Ok(entries) => {
                log::info!("photo manifest: {} folders", entries.len());
                entries
            }
            Err(e) => {
                log::warn!("photo manifest unavailable, continuing without photos: {}", e);
                ManifestEntries::new()
            }
        })
    }

    fn fetch(&self) -> Result<ManifestEntries, AtlasError> {
        let text = self.source.read_text(&self.manifest_file)?;
        serde_json::from_str(&text).map_err(|e| AtlasError::json(&self.manifest_file, e))
    }

    /// Full photo locations for `folder`, in manifest order.
    pub fn photo_urls(&self, folder: &str) -> Vec<String> {
        self.entries()
            .get(folder)
            .map(|files| {
                files
                    .iter()
                    .map(|f| self.source.locate(&[&self.photo_root, folder, f]))
                    .collect()
            })
            .unwrap_or_default()
    }
}
