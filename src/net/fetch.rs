use std::path::PathBuf;

use url::Url;

use crate::error::{AtlasError, Result};

/// Where data files and photos come from: a local directory or an
/// `http(s)://` base URL.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
    Local(PathBuf),
    Remote(Url),
}

impl AssetSource {
    /// Parse an asset root. Anything that is not an http(s) URL is a path.
    pub fn parse(root: &str) -> Result<Self> {
        if root.starts_with("http://") || root.starts_with("https://") {
            // Url::join drops the last segment unless the base ends in '/'
            let base = if root.ends_with('/') {
                root.to_string()
            } else {
                format!("{}/", root)
            };
            let url = Url::parse(&base)
                .map_err(|e| AtlasError::Config(format!("invalid asset root {}: {}", root, e)))?;
            Ok(Self::Remote(url))
        } else {
            Ok(Self::Local(PathBuf::from(root)))
        }
    }

    /// Resolve `parts` (joined with `/`) against the root into a location
    /// string accepted by [`fetch_bytes`].
    pub fn locate(&self, parts: &[&str]) -> String {
        let rel = parts
            .iter()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        match self {
            Self::Local(dir) => dir.join(rel).to_string_lossy().into_owned(),
            Self::Remote(base) => base
                .join(&rel)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", base, rel)),
        }
    }

    pub fn read_text(&self, file: &str) -> Result<String> {
        let location = self.locate(&[file]);
        let bytes = fetch_bytes(&location)?;
        String::from_utf8(bytes).map_err(|e| {
            AtlasError::io(
                location,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch raw bytes from a URL or a local path (blocking).
pub fn fetch_bytes(location: &str) -> Result<Vec<u8>> {
    if !is_remote(location) {
        return std::fs::read(location).map_err(|e| AtlasError::io(location, e));
    }

    let http = |source| AtlasError::Http {
        url: location.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("subculture-atlas/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(15))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(http)?;

    let response = client.get(location).send().map_err(http)?;
    let status = response.status();
    if !status.is_success() {
        return Err(AtlasError::Status {
            url: location.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().map_err(http)?;
    log::debug!("fetched {} ({} bytes)", location, bytes.len());
    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_root_gets_trailing_slash() {
        let src = AssetSource::parse("https://cdn.example.com/atlas").unwrap();
        assert_eq!(
            src.locate(&["photos", "cosplay", "a.jpg"]),
            "https://cdn.example.com/atlas/photos/cosplay/a.jpg"
        );
    }

    #[test]
    fn local_root_joins_paths() {
        let src = AssetSource::parse("assets").unwrap();
        let loc = src.locate(&["/photos/", "goth", "b.png"]);
        assert_eq!(PathBuf::from(loc), PathBuf::from("assets/photos/goth/b.png"));
    }

    #[test]
    fn reads_local_text_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("t.txt"), "hello").unwrap();
        let src = AssetSource::Local(dir.path().to_path_buf());
        assert_eq!(src.read_text("t.txt").unwrap(), "hello");
        assert!(matches!(src.read_text("missing.txt"), Err(AtlasError::Io { .. })));
    }
}
