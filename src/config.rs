//! Runtime configuration.
//!
//! Every tunable of the explorer lives in `AtlasConfig`. Defaults reproduce
//! the stock diagram; a JSON file named by `SUBCULTURE_ATLAS_CONFIG` may
//! override any subset of fields.

use serde::Deserialize;

use crate::error::{AtlasError, Result};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "SUBCULTURE_ATLAS_CONFIG";

/// Number of concentric rings (depth 0..=5).
pub const RING_COUNT: usize = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Base directory or `http(s)://` URL every data file is resolved against.
    pub asset_root: String,
    pub taxonomy_file: String,
    pub colors_file: String,
    pub links_file: String,
    pub photo_folders_file: String,
    /// Photo manifest, relative to `asset_root`.
    pub manifest_file: String,
    /// Folder holding one sub-folder per photo set, relative to `asset_root`.
    pub photo_root: String,
    /// Top-level path segment used as the diagram root.
    pub root_name: String,

    /// World-space centre of the diagram.
    pub center: [f32; 2],
    /// Ring radius per depth. Must be strictly increasing.
    pub ring_radii: [f32; RING_COUNT],
    /// Extra radius for the first leg of leaf edges.
    pub collar_offset: f32,
    pub label_offset: f32,
    /// Drawn node radius per depth (world units).
    pub node_radii: [f32; RING_COUNT],
    /// Taxonomy names forced onto ring 4.
    pub media_types: Vec<String>,

    pub min_scale: f32,
    pub max_scale: f32,
    /// Fraction of the window width the diagram should span initially.
    pub target_fill: f32,
    pub zoom_step: f32,
    pub focus_min_ms: f32,
    pub focus_max_ms: f32,
    /// Focus tween length per screen pixel travelled.
    pub focus_ms_per_px: f32,

    /// Link used when a name has no entry in the link map.
    pub placeholder_link: String,
    /// Nominal length of a clip when the shell cannot read the source length.
    pub video_clip_seconds: f32,
    pub analyser_bins: usize,

    /// Marquee scroll speed in pixels per second.
    pub marquee_speed: f32,
    pub marquee_height: f32,
    /// Width presets cycled by the width control.
    pub marquee_widths: Vec<f32>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            asset_root: String::from("assets"),
            taxonomy_file: String::from("taxonomy.csv"),
            colors_file: String::from("colors.json"),
            links_file: String::from("links.json"),
            photo_folders_file: String::from("photo_folders.json"),
            manifest_file: String::from("photos/manifest.json"),
            photo_root: String::from("photos"),
            root_name: String::from("CostumedPlay"),
            center: [700.0, 700.0],
            ring_radii: [0.0, 150.0, 300.0, 450.0, 500.0, 600.0],
            collar_offset: 50.0,
            label_offset: 10.0,
            node_radii: [14.0, 9.0, 8.0, 7.0, 6.0, 4.0],
            media_types: ["Anime", "Comics", "VideoGames", "Series", "Movies", "Manga"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_scale: 0.15,
            max_scale: 5.0,
            target_fill: 0.9,
            zoom_step: 1.25,
            focus_min_ms: 150.0,
            focus_max_ms: 600.0,
            focus_ms_per_px: 0.5,
            placeholder_link: String::from("videos/convention-cosplayers.mp4"),
            video_clip_seconds: 30.0,
            analyser_bins: 64,
            marquee_speed: 75.0,
            marquee_height: 120.0,
            marquee_widths: vec![480.0, 720.0, 960.0],
        }
    }
}

impl AtlasConfig {
    /// Load from the file named by [`CONFIG_ENV`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                let text = std::fs::read_to_string(&path).map_err(|e| AtlasError::io(&path, e))?;
                log::info!("Loading config from {}", path);
                Self::from_json_str(&text)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| AtlasError::json("config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ring_radii.windows(2).any(|w| w[1] <= w[0]) {
            return Err(AtlasError::Config(format!(
                "ring radii must be strictly increasing, got {:?}",
                self.ring_radii
            )));
        }
        if !(self.min_scale > 0.0 && self.min_scale < self.max_scale) {
            return Err(AtlasError::Config(format!(
                "scale bounds must satisfy 0 < min < max, got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.focus_min_ms > 0.0 && self.focus_max_ms > 0.0) {
            return Err(AtlasError::Config(format!(
                "focus durations must be positive, got [{}, {}]",
                self.focus_min_ms, self.focus_max_ms
            )));
        }
        if self.focus_min_ms > self.focus_max_ms {
            return Err(AtlasError::Config(String::from(
                "focus_min_ms exceeds focus_max_ms",
            )));
        }
        if self.marquee_speed <= 0.0 {
            return Err(AtlasError::Config(String::from("marquee_speed must be positive")));
        }
        if self.marquee_widths.is_empty() {
            return Err(AtlasError::Config(String::from(
                "marquee_widths needs at least one preset",
            )));
        }
        Ok(())
    }

    /// Outermost ring radius.
    pub fn outer_radius(&self) -> f32 {
        self.ring_radii[RING_COUNT - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(AtlasConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = AtlasConfig::from_json_str(r#"{ "root_name": "Subcultures", "zoom_step": 2.0 }"#)
            .unwrap();
        assert_eq!(cfg.root_name, "Subcultures");
        assert_eq!(cfg.zoom_step, 2.0);
        assert_eq!(cfg.ring_radii, [0.0, 150.0, 300.0, 450.0, 500.0, 600.0]);
        assert_eq!(cfg.collar_offset, 50.0);
    }

    #[test]
    fn rejects_non_increasing_radii() {
        let err = AtlasConfig::from_json_str(r#"{ "ring_radii": [0, 150, 150, 450, 500, 600] }"#);
        assert!(matches!(err, Err(AtlasError::Config(_))));
    }

    #[test]
    fn rejects_zero_focus_duration() {
        for json in [r#"{ "focus_min_ms": 0 }"#, r#"{ "focus_min_ms": -5, "focus_max_ms": 0 }"#] {
            let err = AtlasConfig::from_json_str(json);
            assert!(matches!(err, Err(AtlasError::Config(_))), "{}", json);
        }
    }

    #[test]
    fn rejects_inverted_scale_bounds() {
        let err = AtlasConfig::from_json_str(r#"{ "min_scale": 6.0 }"#);
        assert!(matches!(err, Err(AtlasError::Config(_))));
    }
}
