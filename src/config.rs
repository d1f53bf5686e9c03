use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use slotnote_core::CorruptPolicy;
use std::path::{Path, PathBuf};

use crate::when::parse_duration;

static DEFAULT_SLOT_LENGTH: &str = "30m";

/// Settings from ~/.config/slotnote/config.toml. Every field is optional.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Directory the note list is stored in
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Slot length used when `new` gets neither --end nor --duration
    #[serde(default = "default_slot_length")]
    pub default_duration: String,

    /// What to do when the stored notes cannot be parsed ("fail" or "reset")
    #[serde(default)]
    pub on_corrupt: CorruptPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: default_data_dir(),
            default_duration: default_slot_length(),
            on_corrupt: CorruptPolicy::default(),
        }
    }
}

impl Config {
    pub fn data_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn slot_length(&self) -> Result<Duration> {
        parse_duration(&self.default_duration).context("Invalid default_duration in config")
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("slotnote").to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/.local/share/slotnote".to_string())
}

fn default_slot_length() -> String {
    DEFAULT_SLOT_LENGTH.to_string()
}

/// Get the config file path (~/.config/slotnote/config.toml, or $SLOTNOTE_CONFIG)
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("SLOTNOTE_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("slotnote");
    Ok(config_dir.join("config.toml"))
}

/// Load config, falling back to defaults when the file does not exist.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

/// Expand ~ in paths to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.default_duration, "30m");
        assert_eq!(config.on_corrupt, CorruptPolicy::Fail);
        assert_eq!(config.slot_length().unwrap(), Duration::minutes(30));
    }

    #[test]
    fn test_parses_all_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/notes\"\ndefault_duration = \"1h\"\non_corrupt = \"reset\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/tmp/notes"));
        assert_eq!(config.slot_length().unwrap(), Duration::hours(1));
        assert_eq!(config.on_corrupt, CorruptPolicy::Reset);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "on_corrupt = \"ignore\"\n").unwrap();
        assert!(load_config_from(&path).is_err());
    }
}
