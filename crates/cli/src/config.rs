//! Per-results-directory configuration (`prettyresults.toml`)
//!
//! Loaded with defaults when the file is missing and validated before every
//! save, so a bad `pr config set` never reaches disk.

use pr_export::{DocumentOptions, WebOptions};
use pr_store::{ContainerSpec, StoreOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name inside the results directory
pub const CONFIG_FILE: &str = "prettyresults.toml";

/// Valid range for `document.image_width_px`
pub const IMAGE_WIDTH_RANGE: std::ops::RangeInclusive<u32> = 16..=4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub snapshot_file: String,
    pub figure_extension: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        let options = StoreOptions::default();
        Self {
            snapshot_file: options.snapshot_file,
            figure_extension: options.figure_extension,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSection {
    pub image_width_px: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for DocumentSection {
    fn default() -> Self {
        let options = DocumentOptions::default();
        Self {
            image_width_px: options.image_width_px,
            title: options.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSection {
    pub data_file: String,
    pub global_name: String,
}

impl Default for WebSection {
    fn default() -> Self {
        let options = WebOptions::default();
        Self {
            data_file: options.data_file,
            global_name: options.global_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSection,
    pub document: DocumentSection,
    pub web: WebSection,
    /// Containers re-declared under the root on every open
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerSpec>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_file_name("store.snapshot_file", &self.store.snapshot_file)?;
        check_file_name("web.data_file", &self.web.data_file)?;

        let ext = &self.store.figure_extension;
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Invalid {
                key: "store.figure_extension",
                reason: format!("'{}' must be a non-empty alphanumeric extension", ext),
            });
        }

        if !IMAGE_WIDTH_RANGE.contains(&self.document.image_width_px) {
            return Err(ConfigError::Invalid {
                key: "document.image_width_px",
                reason: format!(
                    "{} is outside {}-{}",
                    self.document.image_width_px,
                    IMAGE_WIDTH_RANGE.start(),
                    IMAGE_WIDTH_RANGE.end()
                ),
            });
        }

        if !is_js_identifier(&self.web.global_name) {
            return Err(ConfigError::Invalid {
                key: "web.global_name",
                reason: format!("'{}' is not a JavaScript identifier", self.web.global_name),
            });
        }

        check_containers(&self.containers)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            snapshot_file: self.store.snapshot_file.clone(),
            figure_extension: self.store.figure_extension.clone(),
        }
    }

    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            image_width_px: self.document.image_width_px,
            title: self.document.title.clone(),
            format: None,
        }
    }

    pub fn web_options(&self, overwrite: bool) -> WebOptions {
        WebOptions {
            data_file: self.web.data_file.clone(),
            global_name: self.web.global_name.clone(),
            overwrite,
        }
    }
}

pub fn config_file_path(results_dir: &Path) -> PathBuf {
    results_dir.join(CONFIG_FILE)
}

/// Load the config of `results_dir`, or defaults if there is none
pub fn load(results_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_file_path(results_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

pub fn save(results_dir: &Path, config: &Config) -> Result<(), ConfigError> {
    config.validate()?;
    let path = config_file_path(results_dir);
    let text = toml::to_string_pretty(config)?;
    fs::create_dir_all(results_dir)
        .and_then(|_| fs::write(&path, text))
        .map_err(|source| ConfigError::Write { path, source })
}

/// Write the default config unless one exists; returns true if created
pub fn init_if_missing(results_dir: &Path) -> Result<bool, ConfigError> {
    if config_file_path(results_dir).exists() {
        return Ok(false);
    }
    save(results_dir, &Config::default())?;
    Ok(true)
}

fn check_file_name(key: &'static str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("'{}' must be a plain file name", name),
        });
    }
    Ok(())
}

fn check_containers(specs: &[ContainerSpec]) -> Result<(), ConfigError> {
    for spec in specs {
        pr_core::validate_segment(&spec.id).map_err(|e| ConfigError::Invalid {
            key: "containers.id",
            reason: e.to_string(),
        })?;
        check_containers(&spec.children)?;
    }
    Ok(())
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
