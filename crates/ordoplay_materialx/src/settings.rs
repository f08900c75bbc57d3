// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bridge settings, stored as RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "materialx.ron";

/// Settings of a translation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Settings format version
    pub version: u32,
    /// Host render engine, e.g. `CYCLES` or `PRMAN_RENDER`
    pub render_engine: String,
    /// `version` written on the document root
    pub materialx_version: String,
    /// Standard library document replacing the bundled one
    #[serde(default)]
    pub stdlib_path: Option<PathBuf>,
    /// `tracing` filter directive used by the command line host
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    "ordoplay_materialx=info".to_string()
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            render_engine: "CYCLES".to_string(),
            materialx_version: crate::document::DEFAULT_VERSION.to_string(),
            stdlib_path: None,
            log_filter: default_log_filter(),
        }
    }
}

impl BridgeSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: BridgeSettings = ron::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Settings version {} is newer than supported version {}",
                    settings.version, SETTINGS_FORMAT_VERSION
                ),
            ));
        }

        Ok(settings)
    }

    /// Load settings from a file, or the defaults when it does not exist
    pub fn load_or_default(path: &Path) -> std::io::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;

        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let settings = BridgeSettings {
            render_engine: "PRMAN_RENDER".into(),
            stdlib_path: Some(PathBuf::from("libraries/custom.mtlx")),
            ..BridgeSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(BridgeSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let settings = BridgeSettings {
            version: SETTINGS_FORMAT_VERSION + 1,
            ..BridgeSettings::default()
        };
        settings.save(&path).unwrap();

        let err = BridgeSettings::load(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BridgeSettings::load_or_default(&dir.path().join("absent.ron")).unwrap();
        assert_eq!(settings, BridgeSettings::default());
    }
}
