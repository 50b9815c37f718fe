//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::{ConfigError, LoggingConfig, Result};

/// Builds the env filter for `config`.
///
/// `RUST_LOG`, when set and non-empty, takes precedence over the configured filter.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
	if let Ok(directive) = std::env::var(EnvFilter::DEFAULT_ENV)
		&& !directive.trim().is_empty()
	{
		return parse_filter(&directive);
	}
	parse_filter(&config.filter)
}

fn parse_filter(directive: &str) -> Result<EnvFilter> {
	EnvFilter::try_new(directive).map_err(|e| ConfigError::LogFilter {
		filter: directive.to_string(),
		reason: e.to_string(),
	})
}

/// Installs the global fmt subscriber described by `config`.
///
/// Logs go to stderr so stdout stays free for frame transport.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
	let filter = env_filter(config)?;
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(config.with_target)
		.with_ansi(config.ansi)
		.with_writer(std::io::stderr)
		.try_init()
		.map_err(|_| ConfigError::AlreadyInitialised)?;
	tracing::debug!(filter = %config.filter, "config.logging.initialised");
	Ok(())
}
