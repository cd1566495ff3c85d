//! Name-keyed lookup tables: node colour, media link and photo folder.
//!
//! Links follow a three-way policy. A key mapped to a string yields that
//! string, a key mapped to `null` yields no link, and a key that is absent
//! yields the placeholder clip. Video resolution checks the `<name>_video`
//! key first and only falls back to the bare name when that key is absent.

use std::collections::HashMap;
use std::sync::Arc;

use egui::Color32;
use serde::de::DeserializeOwned;

use super::color::parse_hex_color;
use super::coordinator::MediaResolver;
use crate::config::AtlasConfig;
use crate::net::fetch::AssetSource;
use crate::net::manifest::PhotoManifest;

/// Resolved media link for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Url(String),
    /// Explicitly mapped to nothing.
    Suppressed,
    Placeholder(String),
}

impl Link {
    pub fn url(&self) -> Option<&str> {
        match self {
            Link::Url(u) | Link::Placeholder(u) => Some(u),
            Link::Suppressed => None,
        }
    }

    /// A real, node-specific URL (not the placeholder, not suppressed).
    pub fn custom(&self) -> Option<&str> {
        match self {
            Link::Url(u) => Some(u),
            _ => None,
        }
    }
}

pub type NullableMap = HashMap<String, Option<String>>;

#[derive(Debug, Clone, Default)]
pub struct NameMaps {
    colors: HashMap<String, Color32>,
    links: NullableMap,
    photo_folders: NullableMap,
    placeholder: String,
}

impl NameMaps {
    pub fn new(
        colors: HashMap<String, String>,
        links: NullableMap,
        photo_folders: NullableMap,
        placeholder: &str,
    ) -> Self {
        let colors = colors
            .into_iter()
            .filter_map(|(name, hex)| match parse_hex_color(&hex) {
                Some(c) => Some((name, c)),
                None => {
                    log::warn!("ignoring colour {:?} for {}", hex, name);
                    None
                }
            })
            .collect();
        Self {
            colors,
            links,
            photo_folders,
            placeholder: placeholder.to_string(),
        }
    }

    /// Read the three map files. A missing or malformed file behaves as an
    /// empty map.
    pub fn load(source: &AssetSource, config: &AtlasConfig) -> Self {
        Self::new(
            read_map(source, &config.colors_file),
            read_map(source, &config.links_file),
            read_map(source, &config.photo_folders_file),
            &config.placeholder_link,
        )
    }

    pub fn color(&self, name: &str) -> Option<Color32> {
        self.colors.get(name).copied()
    }

    /// Nodes with a colour are the clickable ones.
    pub fn is_interactive(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn link(&self, name: &str) -> Link {
        self.resolve(name).unwrap_or_else(|| Link::Placeholder(self.placeholder.clone()))
    }

    pub fn video_link(&self, name: &str) -> Link {
        self.resolve(&format!("{}_video", name))
            .unwrap_or_else(|| self.link(name))
    }

    /// `None` when the key is absent.
    fn resolve(&self, key: &str) -> Option<Link> {
        let value = self.links.get(key)?;
        Some(match value {
            None => Link::Suppressed,
            Some(url) if url.is_empty() || *url == self.placeholder => {
                Link::Placeholder(self.placeholder.clone())
            }
            Some(url) => Link::Url(url.clone()),
        })
    }

    pub fn photo_folder(&self, name: &str) -> Option<&str> {
        self.photo_folders.get(name)?.as_deref().filter(|f| !f.is_empty())
    }
}

fn read_map<T: DeserializeOwned + Default>(source: &AssetSource, file: &str) -> T {
    let text = match source.read_text(file) {
        Ok(text) => text,
        Err(e) => {
            log::warn!("lookup table {} unavailable: {}", file, e);
            return T::default();
        }
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        log::warn!("lookup table {} is malformed: {}", file, e);
        T::default()
    })
}

/// Name maps plus the shared photo manifest.
#[derive(Debug, Clone)]
pub struct MediaCatalog {
    pub maps: NameMaps,
    manifest: Arc<PhotoManifest>,
}

impl MediaCatalog {
    pub fn new(maps: NameMaps, manifest: Arc<PhotoManifest>) -> Self {
        Self { maps, manifest }
    }

    pub fn manifest(&self) -> &Arc<PhotoManifest> {
        &self.manifest
    }
}

impl MediaResolver for MediaCatalog {
    fn photos(&self, name: &str) -> Vec<String> {
        match self.maps.photo_folder(name) {
            Some(folder) => self.manifest.photo_urls(folder),
            None => Vec::new(),
        }
    }

    fn has_photos(&self, name: &str) -> bool {
        self.maps.photo_folder(name).is_some()
    }

    fn video(&self, name: &str) -> Option<String> {
        self.maps.video_link(name).custom().map(str::to_string)
    }
}
