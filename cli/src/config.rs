// SPDX-License-Identifier: MIT OR Apache-2.0

//! Editor settings stored as TOML in the user's config directory

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sgfed_core::LayoutOptions;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Komi for new even games
    #[serde(default = "default_komi")]
    pub default_komi: String,
    /// Tracing filter used when neither --debug nor RUST_LOG is given
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Appended to the file stem by `flip` when no output is named
    #[serde(default = "default_flipped_suffix")]
    pub flipped_suffix: String,
    #[serde(default)]
    pub layout: LayoutOptions,
}

fn default_komi() -> String {
    sgfed_core::game::default_komi(false).to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_flipped_suffix() -> String {
    "-flipped".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_komi: default_komi(),
            log_filter: default_log_filter(),
            flipped_suffix: default_flipped_suffix(),
            layout: LayoutOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Komi for a new game with `handicap` stones
    pub fn komi_for(&self, handicap: u8) -> String {
        if handicap > 0 {
            sgfed_core::game::default_komi(true).to_string()
        } else {
            self.default_komi.clone()
        }
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("io", "sgfed", "sgfed").context("Failed to determine config directory")?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Load the config from its default location
pub fn load_config() -> Result<EditorConfig> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    load_config_from(&config_path)
}

/// Load the config at `config_path`, writing the defaults there if it is missing
pub fn load_config_from(config_path: &Path) -> Result<EditorConfig> {
    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default at: {}",
            config_path.display()
        );
        let default_config = EditorConfig::default();
        save_config_to(config_path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    toml::from_str::<EditorConfig>(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

pub fn save_config(config: &EditorConfig) -> Result<()> {
    let config_path = get_config_path().context("Failed to determine config path")?;
    save_config_to(&config_path, config)
}

pub fn save_config_to(config_path: &Path, config: &EditorConfig) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    let toml_content = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(config_path, toml_content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    tracing::info!("Saved config to: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.default_komi, "6.5");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.layout.initial_rows, 50);
        assert_eq!(config.layout.initial_cols, 200);
        assert_eq!(config.flipped_suffix, "-flipped");
    }

    #[test]
    fn test_komi_for_new_games() {
        let config = EditorConfig {
            default_komi: "7.5".to_string(),
            ..EditorConfig::default()
        };
        assert_eq!(config.komi_for(0), "7.5");
        assert_eq!(config.komi_for(4), "0.5");
    }

    #[test]
    fn test_config_serialization() {
        let config = EditorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        let deserialized: EditorConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EditorConfig = toml::from_str("log_filter = \"debug\"\n").unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.default_komi, "6.5");
        assert_eq!(config.layout, LayoutOptions::default());

        let config: EditorConfig = toml::from_str("[layout]\ninitial_rows = 8\n").unwrap();
        assert_eq!(config.layout.initial_rows, 8);
        assert_eq!(config.layout.initial_cols, 200);
    }

    #[test]
    fn test_load_creates_default() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = load_config_from(&config_path)?;
        assert_eq!(config, EditorConfig::default());
        assert!(config_path.exists());
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");

        let config = EditorConfig {
            default_komi: "7.5".to_string(),
            flipped_suffix: "-theirs".to_string(),
            ..EditorConfig::default()
        };
        save_config_to(&config_path, &config)?;
        assert_eq!(load_config_from(&config_path)?, config);
        Ok(())
    }

    #[test]
    fn test_bad_file_reports_path() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "default_komi = [")?;

        let err = load_config_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
