//! Configuration for Prism.
//!
//! Configuration is written in TOML. Every section and key is optional and
//! falls back to the defaults below; unknown keys are rejected so typos do not
//! silently change behaviour.
//!
//! ```toml
//! [dispatch]
//! sentinel-view = "unknown"
//!
//! [client]
//! return-when = "FIRST_EXCEPTION"
//!
//! [transport]
//! max-frame-bytes = 16777216
//!
//! [logging]
//! filter = "info,prism_dispatch=debug"
//! ansi = false
//! ```

pub mod error;
pub mod logging;

use std::path::Path;

pub use error::{ConfigError, Result};
pub use logging::{env_filter, init_tracing};
use prism_invocation::{ReturnWhen, UNKNOWN_VIEW};
use serde::Deserialize;

/// Default upper bound for one transport frame.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Complete Prism configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Dispatcher behaviour.
	pub dispatch: DispatchConfig,
	/// Backend client defaults.
	pub client: ClientConfig,
	/// Frame transport limits.
	pub transport: TransportConfig,
	/// Log output.
	pub logging: LoggingConfig,
}

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DispatchConfig {
	/// View name attached to whole-request failures.
	pub sentinel_view: String,
}

impl Default for DispatchConfig {
	fn default() -> Self {
		Self {
			sentinel_view: UNKNOWN_VIEW.to_string(),
		}
	}
}

/// Backend client settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct ClientConfig {
	/// Completion policy used when a call does not choose one.
	pub return_when: ReturnWhen,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			return_when: ReturnWhen::FirstException,
		}
	}
}

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TransportConfig {
	/// Longest accepted frame, in bytes, excluding the newline.
	pub max_frame_bytes: usize,
}

impl Default for TransportConfig {
	fn default() -> Self {
		Self {
			max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
		}
	}
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct LoggingConfig {
	/// `tracing_subscriber::EnvFilter` directive.
	pub filter: String,
	/// Colourise output.
	pub ansi: bool,
	/// Include the event target (module path) in each line.
	pub with_target: bool,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			ansi: false,
			with_target: true,
		}
	}
}

impl Config {
	/// Parses a TOML string into a validated [`Config`].
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::from_toml_str(&content)
	}

	fn validate(&self) -> Result<()> {
		if self.dispatch.sentinel_view.is_empty() {
			return Err(ConfigError::Invalid {
				field: "dispatch.sentinel-view",
				reason: "must not be empty".to_string(),
			});
		}
		if let ReturnWhen::Unrecognized(name) = &self.client.return_when {
			return Err(ConfigError::Invalid {
				field: "client.return-when",
				reason: format!("unknown completion policy {name}"),
			});
		}
		if self.transport.max_frame_bytes == 0 {
			return Err(ConfigError::Invalid {
				field: "transport.max-frame-bytes",
				reason: "must be positive".to_string(),
			});
		}
		Ok(())
	}
}
