//! Canonical data-directory layout.
//!
//! All pipeline artifacts live under a single data root:
//!
//! ```text
//! data/
//!   raw/                              year-prefixed raw CSV exports
//!   cache/geocode_cache.csv           persistent geocode cache
//!   cache/intersection_addresses.csv  manual-review list
//!   clean_incidents.csv               tidy output dataset
//! ```

use std::path::{Path, PathBuf};

/// Resolved paths under one data root.
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of raw CSV exports.
    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    /// Directory of cache artifacts.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// The persistent geocode cache file.
    #[must_use]
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir().join("geocode_cache.csv")
    }

    /// The manual-review list of skipped intersection addresses.
    #[must_use]
    pub fn review_file(&self) -> PathBuf {
        self.cache_dir().join("intersection_addresses.csv")
    }

    /// The tidy output dataset.
    #[must_use]
    pub fn tidy_file(&self) -> PathBuf {
        self.root.join("clean_incidents.csv")
    }

    /// Ensures every directory the pipeline writes into exists.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a directory cannot be created.
    pub fn ensure(&self) -> std::io::Result<()> {
        ensure_dir(&self.raw_dir())?;
        ensure_dir(&self.cache_dir())?;
        Ok(())
    }
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted() {
        let paths = DataPaths::new("/tmp/poky");
        assert_eq!(paths.raw_dir(), PathBuf::from("/tmp/poky/raw"));
        assert_eq!(
            paths.cache_file(),
            PathBuf::from("/tmp/poky/cache/geocode_cache.csv")
        );
        assert_eq!(
            paths.tidy_file(),
            PathBuf::from("/tmp/poky/clean_incidents.csv")
        );
    }

    #[test]
    fn ensure_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().join("data"));
        paths.ensure().unwrap();
        assert!(paths.raw_dir().is_dir());
        assert!(paths.cache_dir().is_dir());
    }
}
