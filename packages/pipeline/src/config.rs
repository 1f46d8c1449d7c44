//! Run configuration, loaded from an optional TOML file.
//!
//! Every field has a default matching the stock Pocatello setup, so a
//! missing config file (or an empty one) yields a working pipeline.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::PipelineError;

/// Pipeline run configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Data root directory (raw files, cache, tidy output live under it).
    pub data_dir: PathBuf,
    /// Override for the raw-file directory; defaults to `<data_dir>/raw`.
    pub raw_dir: Option<PathBuf>,
    /// Municipal context appended to every cleaned address.
    pub address_suffix: String,
    /// Nominatim search endpoint.
    pub nominatim_base_url: String,
    /// User agent sent with every geocoding request.
    pub user_agent: String,
    /// Per-call HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            raw_dir: None,
            address_suffix: poky_geocoder::address::DEFAULT_CONTEXT_SUFFIX.to_string(),
            nominatim_base_url: poky_geocoder::nominatim::DEFAULT_BASE_URL.to_string(),
            user_agent: "poky-incidents/0.1 (https://github.com/poky-data/poky-incidents)"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

impl PipelineConfig {
    /// Loads configuration from a TOML file, or returns the defaults when
    /// no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the file cannot be read or parsed. An
    /// explicitly named file that is missing is an error, not a fallback.
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::de::from_str(&contents)?)
    }

    /// The effective raw-file directory.
    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.raw_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("raw"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_without_a_file() {
        let config = PipelineConfig::load(None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.raw_dir(), PathBuf::from("data/raw"));
        assert_eq!(config.timeout_secs, 10);
        assert!(config.address_suffix.contains("Pocatello"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poky.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"data_dir = \"/srv/poky\"\ntimeout_secs = 30\n")
            .unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/poky"));
        assert_eq!(config.raw_dir(), PathBuf::from("/srv/poky/raw"));
        assert_eq!(config.timeout_secs, 30);
        assert!(config.nominatim_base_url.contains("openstreetmap"));
    }

    #[test]
    fn missing_named_file_is_an_error() {
        assert!(PipelineConfig::load(Some(Path::new("/nope/poky.toml"))).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poky.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"dta_dir = \"/srv/poky\"\n").unwrap();

        assert!(PipelineConfig::load(Some(&path)).is_err());
    }
}
