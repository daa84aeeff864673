//! Configuration for rename jobs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default stem of the delivered archive file name
pub const DEFAULT_ARCHIVE_STEM: &str = "results";

/// Main rename configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Prepended verbatim to every output base name
    pub prefix: String,
    /// Sheet of the mapping spreadsheet to read (first sheet if unset)
    pub sheet: Option<String>,
    /// What to do when two files resolve to the same archive entry name
    pub collision: CollisionPolicy,
    pub compression: Compression,
    /// Delivered archives are named `<archive_stem>-<unix millis>.zip`
    pub archive_stem: String,
    /// Resolve file names on the rayon thread pool
    pub parallel: bool,
}

impl RenameConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RenameConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate values that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.archive_stem.is_empty() {
            anyhow::bail!("Configuration error: 'archive_stem' must not be empty");
        }
        if self.archive_stem.contains(['/', '\\']) {
            anyhow::bail!(
                "Configuration error: 'archive_stem' must not contain path separators, got '{}'",
                self.archive_stem
            );
        }
        Ok(())
    }
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            sheet: None,
            collision: CollisionPolicy::default(),
            compression: Compression::default(),
            archive_stem: DEFAULT_ARCHIVE_STEM.to_string(),
            parallel: false,
        }
    }
}

/// Policy for two source files resolving to the same emitted name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Abort the job before any archive work
    #[default]
    Fail,
    /// The later file replaces the earlier entry's content in place
    Overwrite,
}

/// Compression method for archive entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenameConfig::default();
        assert_eq!(config.prefix, "");
        assert_eq!(config.sheet, None);
        assert_eq!(config.collision, CollisionPolicy::Fail);
        assert_eq!(config.compression, Compression::Deflated);
        assert_eq!(config.archive_stem, "results");
        assert!(!config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RenameConfig = toml::from_str(
            r#"
            prefix = "2024_"
            collision = "overwrite"
            "#,
        )
        .unwrap();

        assert_eq!(config.prefix, "2024_");
        assert_eq!(config.collision, CollisionPolicy::Overwrite);
        assert_eq!(config.compression, Compression::Deflated);
        assert_eq!(config.archive_stem, "results");
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let result: std::result::Result<RenameConfig, _> = toml::from_str(r#"collision = "merge""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = RenameConfig::default();

        config.archive_stem = String::new();
        assert!(config.validate().is_err());

        config.archive_stem = "out/results".to_string();
        assert!(config.validate().is_err());

        config.archive_stem = "batch".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("massrename.toml");
        fs::write(&path, "sheet = \"Mapping\"\nparallel = true\ncompression = \"stored\"\n")?;

        let config = RenameConfig::from_file(&path)?;
        assert_eq!(config.sheet.as_deref(), Some("Mapping"));
        assert!(config.parallel);
        assert_eq!(config.compression, Compression::Stored);
        Ok(())
    }
}
