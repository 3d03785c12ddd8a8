/// Site configuration
///
/// Read from `<site>/volumography.json` when present. Every field has a
/// default, so a partial file only overrides what it names.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::session::SessionOptions;
use crate::ui::carousel::DEFAULT_PERIOD;
use crate::error::ConfigError;

/// Name of the per-site config file
pub const CONFIG_FILE: &str = "volumography.json";

/// Output encoding for optimized images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless WebP
    #[default]
    Webp,
    /// JPEG at the configured quality
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeConfig {
    /// Output root, relative to the site directory
    pub output_dir: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    pub format: OutputFormat,
    /// Lowercase extensions picked up from the input tree
    pub extensions: Vec<String>,
    /// Images processed at once
    pub parallelism: usize,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist/assets/creators"),
            max_width: 1600,
            max_height: 1200,
            quality: 80,
            format: OutputFormat::Webp,
            extensions: ["jpg", "jpeg", "png", "webp"].map(String::from).to_vec(),
            parallelism: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Creator list, relative to the site directory
    pub creators_file: PathBuf,
    /// Asset manifest, relative to the site directory
    pub manifest_file: PathBuf,
    /// Per-creator asset folders, relative to the site directory. Also the
    /// prefix of every image path rendered on a card.
    pub assets_root: String,
    pub card_stagger_ms: u64,
    pub carousel_period_ms: u64,
    /// Lowercase extensions the manifest scanner accepts
    pub manifest_extensions: Vec<String>,
    pub optimize: OptimizeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            creators_file: PathBuf::from("data/creators.json"),
            manifest_file: PathBuf::from("data/assets-manifest.json"),
            assets_root: "assets/creators".to_string(),
            card_stagger_ms: 30,
            carousel_period_ms: 600,
            manifest_extensions: ["jpg", "jpeg", "png", "webp", "gif"].map(String::from).to_vec(),
            optimize: OptimizeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load config for a site directory.
    ///
    /// An explicit path must exist. Without one, `<site>/volumography.json`
    /// is used if present and defaults otherwise.
    pub fn load(site: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = site.join(CONFIG_FILE);
                if !candidate.exists() {
                    tracing::debug!(site = %site.display(), "No config file, using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            assets_root: self.assets_root.clone(),
            stagger_ms: self.card_stagger_ms,
        }
    }

    /// Carousel cycling period; zero falls back to the default
    pub fn carousel_period(&self) -> Duration {
        match self.carousel_period_ms {
            0 => DEFAULT_PERIOD,
            ms => Duration::from_millis(ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::load(dir.path(), None).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.carousel_period(), Duration::from_millis(600));
        assert_eq!(config.optimize.max_width, 1600);
    }

    #[test]
    fn test_zero_period_uses_default() {
        let config = SiteConfig {
            carousel_period_ms: 0,
            ..SiteConfig::default()
        };
        assert_eq!(config.carousel_period(), DEFAULT_PERIOD);
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"assets_root": "media", "optimize": {"format": "jpeg", "quality": 70}}"#,
        )
        .unwrap();

        let config = SiteConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.assets_root, "media");
        assert_eq!(config.optimize.format, OutputFormat::Jpeg);
        assert_eq!(config.optimize.quality, 70);
        assert_eq!(config.optimize.max_height, 1200);
        assert_eq!(config.card_stagger_ms, 30);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{oops").unwrap();
        assert!(matches!(
            SiteConfig::load(dir.path(), None),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            SiteConfig::load(dir.path(), Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }
}
