//! Error types for templater-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load, with serde_json's line and column.
    #[error("failed to parse configuration at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parse error on load.
    #[error("failed to parse configuration at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required field was absent.
    #[error("configuration.{0} needed")]
    MissingField(&'static str),

    /// `parameters` was absent or empty.
    #[error("configuration.parameters needed")]
    EmptyParameters,

    /// A parameter value is a number, boolean, null, list or map.
    #[error("configuration.parameters.{key} must be a string; quote numbers and booleans")]
    NonStringParameter { key: String },

    /// A parameter key can not be referenced from an expression.
    #[error("invalid parameter key '{key}': {reason}")]
    InvalidParameterKey { key: String, reason: &'static str },
}
