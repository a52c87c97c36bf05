//! Templater core library: parameter set, configuration model and errors.
//!
//! Public API surface:
//! - [`types`]: [`ParameterName`] and the validated [`ParameterSet`]
//! - [`config`]: [`Config`], [`ConfigSource`], file loading
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ConfigFormat, ConfigSource, FileConfigSource, RawConfig};
pub use error::ConfigError;
pub use types::{ParameterName, ParameterSet};
