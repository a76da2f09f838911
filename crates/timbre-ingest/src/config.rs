use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::Deserialize;
use std::path::PathBuf;
use timbre_core::model::FeatureScaling;
use timbre_core::taxonomy::{SupportedGenres, DEFAULT_GENRES};
use timbre_core::MAX_POPULARITY_CAP;

/// Configuration for timbre.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (TIMBRE_* prefix)
/// 3. Config file (~/.config/timbre/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Path to the song catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/tracks.csv
    /// - ENV: TIMBRE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/tracks.csv"
    /// - Default: ~/.local/share/timbre/filtered_track_df.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// How many of the most popular matching songs are ranked per query.
    #[serde(default = "default_popularity_cap")]
    pub popularity_cap: usize,

    /// How many songs are shown at a time.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Genres a query may name.
    #[serde(default = "default_genres")]
    pub genres: Vec<String>,

    /// Scaling applied to feature vectors before measuring distance.
    #[serde(default)]
    pub feature_scaling: FeatureScaling,

    /// Logger settings.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            popularity_cap: default_popularity_cap(),
            page_size: default_page_size(),
            genres: default_genres(),
            feature_scaling: FeatureScaling::default(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/timbre/config.toml
    /// Reads environment variables with TIMBRE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the resulting values are out of range.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("timbre");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with a custom catalog path.
    ///
    /// This is used when the --catalog CLI flag is provided.
    pub fn load_with_catalog_path(catalog_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.catalog_path = catalog_path;
        Ok(config)
    }

    /// Check values that would make every query fail.
    pub fn validate(&self) -> Result<()> {
        if self.popularity_cap == 0 || self.popularity_cap > MAX_POPULARITY_CAP {
            anyhow::bail!(
                "popularity_cap must be between 1 and {}, got {}",
                MAX_POPULARITY_CAP,
                self.popularity_cap
            );
        }
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if self.genres.is_empty() {
            anyhow::bail!("genres must name at least one genre");
        }
        Ok(())
    }

    /// The configured genre list.
    pub fn supported_genres(&self) -> SupportedGenres {
        SupportedGenres::from_names(self.genres.iter().cloned())
    }
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbre")
        .join("filtered_track_df.csv")
}

const fn default_popularity_cap() -> usize {
    500
}

const fn default_page_size() -> usize {
    6
}

fn default_genres() -> Vec<String> {
    DEFAULT_GENRES.iter().map(|g| (*g).to_string()).collect()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/timbre/config.toml
/// - macOS: ~/Library/Application Support/timbre/config.toml
/// - Windows: %APPDATA%\timbre\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbre")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Timbre Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (TIMBRE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the song catalog CSV
#
# Required columns: uri, genres, release_year, popularity, acousticness,
# danceability, energy, instrumentalness, valence, tempo
#
# Can also be set via:
# - CLI: timbre --catalog /custom/tracks.csv recommend
# - Environment: TIMBRE_CATALOG_PATH=/custom/tracks.csv
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/filtered_track_df.csv"

# Only the most popular matching songs are ranked for each query
popularity_cap = 500

# Songs shown per page
page_size = 6

# Genres offered for recommendation (matched case-insensitively)
genres = [
    "Dance Pop", "Electronic", "Electropop", "Hip Hop", "Jazz", "K-pop",
    "Latin", "Pop", "Pop Rap", "R&B", "Rock",
]

# Feature scaling before distances are measured:
# - "raw": features in their own units (tempo dominates)
# - "min-max": each feature rescaled to [0, 1] over the ranked songs
feature_scaling = "raw"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.catalog_path.as_os_str().is_empty());
        assert_eq!(config.popularity_cap, 500);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.genres.len(), 11);
        assert_eq!(config.feature_scaling, FeatureScaling::Raw);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(config.popularity_cap, 500);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.genres, default_genres());
        assert_eq!(config.feature_scaling, FeatureScaling::Raw);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("feature_scaling = \"min-max\"\n").unwrap();
        assert_eq!(config.feature_scaling, FeatureScaling::MinMax);
        assert_eq!(config.popularity_cap, 500);
        assert_eq!(config.catalog_path, default_catalog_path());
    }

    #[test]
    fn test_validate_bounds_popularity_cap() {
        for cap in [0, MAX_POPULARITY_CAP + 1] {
            let config = Config {
                popularity_cap: cap,
                ..Config::default()
            };
            assert!(config.validate().is_err(), "cap {} accepted", cap);
        }
        let config = Config {
            popularity_cap: MAX_POPULARITY_CAP,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_genres() {
        let config = Config {
            genres: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supported_genres() {
        let config = Config::default();
        let genres = config.supported_genres();
        assert!(genres.resolve("hip hop").is_some());
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with("timbre/config.toml"));
    }
}
