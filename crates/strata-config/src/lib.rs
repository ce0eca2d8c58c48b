//! Engine configuration (`SPEC_FULL.md` §4.7).
//!
//! Grounded on the teacher's `core-config` loading posture: an optional
//! TOML file, unknown fields ignored for forward compatibility, and a
//! resilient fallback to defaults on a parse error rather than a hard
//! startup failure.

use std::{fs, path::{Path, PathBuf}};

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalConfig {
    pub alternate_screen: bool,
    pub fallback_width: u16,
    pub fallback_height: u16,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { alternate_screen: true, fallback_width: 80, fallback_height: 24 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: None }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub terminal: TerminalConfig,
    pub logging: LoggingConfig,
}

/// Best-effort config path following platform conventions, preferring a
/// local working-directory file before falling back to a platform config
/// directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("strata.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("strata").join("strata.toml");
    }
    PathBuf::from("strata.toml")
}

/// Loads configuration from `path`, or from `discover()` if `None`. Unknown
/// fields are ignored. A missing file or a parse error both fall back to
/// defaults rather than failing startup.
pub fn load_from(path: Option<&Path>) -> Result<ConfigFile> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(ConfigFile::default());
    };
    match toml::from_str(&content) {
        Ok(file) => Ok(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config parse failed, using defaults");
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_from(Some(Path::new("/nonexistent/strata.toml"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        fs::write(&path, "mystery = true\n[terminal]\nalternate_screen = false\n").unwrap();
        let config = load_from(Some(&path)).unwrap();
        assert!(!config.terminal.alternate_screen);
    }

    #[test]
    fn malformed_toml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        fs::write(&path, "not valid toml [[[").unwrap();
        let config = load_from(Some(&path)).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn logging_level_defaults_to_info() {
        assert_eq!(LoggingConfig::default().level, "info");
    }
}
