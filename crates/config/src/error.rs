//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unexpected key or value.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is not acceptable.
	#[error("invalid value for {field}: {reason}")]
	Invalid {
		/// Dotted path of the offending key.
		field: &'static str,
		/// What is wrong with it.
		reason: String,
	},

	/// The log filter directive could not be parsed.
	#[error("invalid log filter {filter:?}: {reason}")]
	LogFilter {
		/// The rejected directive.
		filter: String,
		/// Parser message.
		reason: String,
	},

	/// A global tracing subscriber was already installed.
	#[error("tracing subscriber already initialised")]
	AlreadyInitialised,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
