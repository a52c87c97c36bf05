//! Run configuration: loading, validation and folder resolution.
//!
//! # File shape
//!
//! ```json
//! {
//!   "sourceFolder": "source",
//!   "targetFolder": "target",
//!   "parameters": { "project": "example-project", "author": "Lucas" }
//! }
//! ```
//!
//! The same keys are accepted from a `.yaml` / `.yml` file. Relative folders
//! are resolved against the directory that holds the configuration file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::ParameterSet;

// ---------------------------------------------------------------------------
// Raw (serde) shape
// ---------------------------------------------------------------------------

/// A parameter value as written in the file. Only strings are usable;
/// anything else is kept aside so validation can name the offending key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Text(String),
    Other(IgnoredAny),
}

/// Configuration exactly as deserialized, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub source_folder: Option<String>,
    pub target_folder: Option<String>,
    #[serde(default)]
    pub parameters: Option<BTreeMap<String, ParameterValue>>,
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything but `yaml`/`yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }

    /// Parse `contents`; `path` is only used to annotate errors.
    pub fn parse(self, path: &Path, contents: &str) -> Result<RawConfig, ConfigError> {
        match self {
            ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            }),
            ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| ConfigError::Yaml {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated config
// ---------------------------------------------------------------------------

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source_folder: PathBuf,
    pub target_folder: PathBuf,
    pub parameters: ParameterSet,
    /// Directory relative folders are resolved against.
    pub base_dir: PathBuf,
}

impl Config {
    pub fn new(
        source_folder: impl Into<PathBuf>,
        target_folder: impl Into<PathBuf>,
        parameters: ParameterSet,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Config {
            source_folder: source_folder.into(),
            target_folder: target_folder.into(),
            parameters,
            base_dir: base_dir.into(),
        }
    }

    /// Validate a [`RawConfig`]. Field checks run in file order: source,
    /// target, then parameters.
    pub fn from_raw(raw: RawConfig, base_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let source_folder = raw
            .source_folder
            .ok_or(ConfigError::MissingField("sourceFolder"))?;
        let target_folder = raw
            .target_folder
            .ok_or(ConfigError::MissingField("targetFolder"))?;
        let raw_parameters = raw.parameters.ok_or(ConfigError::EmptyParameters)?;
        let mut values = Vec::with_capacity(raw_parameters.len());
        for (key, value) in raw_parameters {
            match value {
                ParameterValue::Text(text) => values.push((key, text)),
                ParameterValue::Other(_) => return Err(ConfigError::NonStringParameter { key }),
            }
        }
        let parameters = ParameterSet::new(values)?;

        Ok(Config::new(source_folder, target_folder, parameters, base_dir))
    }

    /// Absolute source folder.
    pub fn resolved_source(&self) -> PathBuf {
        resolve_folder(&self.base_dir, &self.source_folder)
    }

    /// Absolute target folder.
    pub fn resolved_target(&self) -> PathBuf {
        resolve_folder(&self.base_dir, &self.target_folder)
    }
}

/// `folder` if absolute, otherwise `base.join(folder)`. No I/O.
pub fn resolve_folder(base: &Path, folder: &Path) -> PathBuf {
    if folder.is_absolute() {
        folder.to_path_buf()
    } else {
        base.join(folder)
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Supplies a validated [`Config`]. The engine never parses files or flags itself.
pub trait ConfigSource {
    fn load(&self) -> Result<Config, ConfigError>;
}

impl ConfigSource for Config {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.clone())
    }
}

/// Loads a JSON or YAML configuration file from disk.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileConfigSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> Result<Config, ConfigError> {
        let io = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };
        let path = std::path::absolute(&self.path).map_err(io)?;
        let contents = std::fs::read_to_string(&path).map_err(io)?;
        let raw = ConfigFormat::from_path(&path).parse(&path, &contents)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
        Config::from_raw(raw, base_dir)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
