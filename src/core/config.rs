//! Authoring backend configuration
//!
//! Collects the paths and tuning knobs the binaries need. A TOML file can
//! override the defaults; the loaded config is installed process-wide once.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

use crate::core::error::{ForgeError, Result};

/// Configuration for the authoring tools
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Directory the export serializer writes snapshot files into.
    ///
    /// One JSON document per table lands here; created if missing.
    pub export_dir: PathBuf,

    /// Path of the JSON store snapshot the binaries load and save.
    pub store_path: PathBuf,

    /// Re-render every Stage description right after a cache clear.
    ///
    /// Stages are referenced from most nested renders, so warming them
    /// keeps list views responsive after a write.
    pub warm_stage_descriptions: bool,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("export/db"),
            store_path: PathBuf::from("data/store.json"),
            warm_stage_descriptions: true,
        }
    }
}

impl ForgeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ForgeError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.export_dir.as_os_str().is_empty() {
            return Err(ForgeError::Config("export_dir must not be empty".into()));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(ForgeError::Config("store_path must not be empty".into()));
        }
        Ok(())
    }
}

static CONFIG: OnceLock<ForgeConfig> = OnceLock::new();

/// Get the global config (initializes with defaults if not set)
pub fn config() -> &'static ForgeConfig {
    CONFIG.get_or_init(ForgeConfig::default)
}

/// Set the global config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: ForgeConfig) -> std::result::Result<(), ForgeConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(ForgeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_export_dir_rejected() {
        let config = ForgeConfig {
            export_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_overrides() {
        let config: ForgeConfig = toml::from_str(
            r#"
export_dir = "out/snapshot"
warm_stage_descriptions = false
"#,
        )
        .unwrap();
        assert_eq!(config.export_dir, PathBuf::from("out/snapshot"));
        assert!(!config.warm_stage_descriptions);
        assert_eq!(config.store_path, PathBuf::from("data/store.json"));
    }
}
