//! Settings file handling
//!
//! A TOML file at the platform config directory (or wherever `--config`
//! points). The loaded value is passed down explicitly; there is no global
//! configuration state.

use anyhow::{Context, Result};
use longbox_core::types::Source;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory organised archives are placed under
    pub destination: Option<PathBuf>,

    /// Sidecar formats written into each repacked archive
    pub formats: Vec<String>,

    /// Merge priority for external services, lowest to highest
    pub resolution_order: Vec<Source>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            destination: None,
            formats: vec![
                "metron-info".to_string(),
                "comic-info".to_string(),
                "native".to_string(),
            ],
            resolution_order: vec![Source::Comicvine, Source::Metron],
        }
    }
}

impl Settings {
    /// Load settings from an explicit path or the platform default location;
    /// a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("longbox").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_settings_file() {
        let settings: Settings = toml::from_str(
            r#"
            destination = "/comics"
            formats = ["comic-info"]
            resolution_order = ["League of Comic Geeks", "Comicvine", "Metron"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.destination, Some(PathBuf::from("/comics")));
        assert_eq!(settings.formats, vec!["comic-info"]);
        assert_eq!(
            settings.resolution_order,
            vec![
                Source::LeagueOfComicGeeks,
                Source::Comicvine,
                Source::Metron
            ]
        );
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.formats.len(), 3);
        assert!(settings.destination.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = Settings::load(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert!(settings.destination.is_none());
    }
}
