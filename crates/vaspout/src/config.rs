//! Reader configuration.
//!
//! Controls how a path handed to [`Container::open_with`] is turned into a
//! concrete file.
//!
//! [`Container::open_with`]: crate::Container::open_with

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::Error;

/// Name of the HDF5 file VASP writes.
pub const DEFAULT_FILENAME: &str = "vaspout.h5";

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File looked up when a directory is opened (default: `vaspout.h5`)
    pub default_filename: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl Config {
    /// Set the file looked up inside directories
    pub fn with_default_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_filename = filename.into();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_filename.is_empty() {
            return Err(ConfigError::EmptyFilename);
        }
        let bare = Path::new(&self.default_filename)
            .file_name()
            .map_or(false, |name| name == self.default_filename.as_str());
        if !bare {
            return Err(ConfigError::NotAFilename(self.default_filename.clone()));
        }
        Ok(())
    }

    /// Resolve `path` to the container file.
    ///
    /// A directory resolves to the default filename inside it. The resolved
    /// file must exist; a missing file is an access error, never a silent
    /// fallback to another location.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, Error> {
        self.validate()?;
        let file = if path.is_dir() {
            path.join(&self.default_filename)
        } else {
            path.to_path_buf()
        };
        if !file.is_file() {
            return Err(Error::open_failed(&file, &"no such file"));
        }
        Ok(file)
    }
}

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The default filename is empty
    #[error("default filename must not be empty")]
    EmptyFilename,

    /// The default filename contains directory components
    #[error("default filename must be a bare file name, got {0}")]
    NotAFilename(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_filename, "vaspout.h5");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_filename() {
        let config = Config::default().with_default_filename("vaspwave.h5");
        assert_eq!(config.default_filename, "vaspwave.h5");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_filename_rejected() {
        let config = Config::default().with_default_filename("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyFilename));
    }

    #[test]
    fn test_nested_filename_rejected() {
        let config = Config::default().with_default_filename("out/vaspout.h5");
        assert!(matches!(config.validate(), Err(ConfigError::NotAFilename(_))));
    }

    #[test]
    fn test_resolve_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vaspout.h5");
        std::fs::write(&file, b"").unwrap();
        let resolved = Config::default().resolve(dir.path()).unwrap();
        assert_eq!(resolved, file);
    }

    #[test]
    fn test_resolve_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("relax.h5");
        std::fs::write(&file, b"").unwrap();
        assert_eq!(Config::default().resolve(&file).unwrap(), file);
    }

    #[test]
    fn test_resolve_directory_without_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().resolve(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Access(ref msg) if msg.contains("vaspout.h5")));
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.h5");
        assert!(matches!(
            Config::default().resolve(&missing),
            Err(Error::Access(_))
        ));
    }
}
