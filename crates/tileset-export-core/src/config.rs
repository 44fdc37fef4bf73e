use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TilesetError};
use crate::export::{ExportOptions, StalePolicy};

const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_ITEMS_PATH: &str = "data/items/items.xml";
pub const DEFAULT_OUTPUT_DIR: &str = "data/materials/tilesets";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# tileset-export configuration file
# Location: ~/.tileset-export/config.toml

[paths]
# Item catalog to read
# Override: --items or TILESET_ITEMS
items = "data/items/items.xml"

# Directory the tileset files are written to
# Override: --output-dir or TILESET_OUTPUT_DIR
output_dir = "data/materials/tilesets"

[export]
# Delete tileset files of categories that no longer have any items
# Default: false (the file is kept and reported as stale)
prune_stale = false

# Create the output directory when it does not exist
# Default: false
create_output_dir = false
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_items")]
    pub items: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_items() -> PathBuf {
    PathBuf::from(DEFAULT_ITEMS_PATH)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            items: default_items(),
            output_dir: default_output_dir(),
        }
    }
}

/// Export behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExportConfig {
    #[serde(default)]
    pub prune_stale: bool,

    #[serde(default)]
    pub create_output_dir: bool,
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| TilesetError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| TilesetError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "paths.items" => Some(self.paths.items.display().to_string()),
            "paths.output_dir" => Some(self.paths.output_dir.display().to_string()),
            "export.prune_stale" => Some(self.export.prune_stale.to_string()),
            "export.create_output_dir" => Some(self.export.create_output_dir.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "paths.items" => self.paths.items = parse_path(key, value)?,
            "paths.output_dir" => self.paths.output_dir = parse_path(key, value)?,
            "export.prune_stale" => self.export.prune_stale = parse_bool(key, value)?,
            "export.create_output_dir" => {
                self.export.create_output_dir = parse_bool(key, value)?
            }
            _ => {
                return Err(TilesetError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        [
            "paths.items",
            "paths.output_dir",
            "export.prune_stale",
            "export.create_output_dir",
        ]
        .iter()
        .filter_map(|key| self.get(key).map(|value| (key.to_string(), value)))
        .collect()
    }

    /// Convert to ExportOptions for use in the exporter
    pub fn to_export_options(&self) -> ExportOptions {
        ExportOptions {
            dry_run: false,
            stale_policy: if self.export.prune_stale {
                StalePolicy::Remove
            } else {
                StalePolicy::Keep
            },
            create_output_dir: self.export.create_output_dir,
        }
    }
}

fn parse_path(key: &str, value: &str) -> Result<PathBuf> {
    let trimmed = value.trim().trim_matches('"').trim_matches('\'');
    if trimmed.is_empty() {
        return Err(TilesetError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(PathBuf::from(trimmed))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(TilesetError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
