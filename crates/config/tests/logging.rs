use prism_config::{ConfigError, LoggingConfig, env_filter, init_tracing};

// One test function: the steps share process-global state (RUST_LOG and the
// global subscriber).
#[test]
fn filter_validation_and_single_initialisation() {
	// SAFETY: no other thread in this test binary touches the environment.
	unsafe { std::env::remove_var("RUST_LOG") };

	let malformed = LoggingConfig {
		filter: "prism=notalevel".to_string(),
		..LoggingConfig::default()
	};
	let err = env_filter(&malformed).unwrap_err();
	assert!(matches!(err, ConfigError::LogFilter { .. }), "got {err:?}");
	assert!(matches!(init_tracing(&malformed), Err(ConfigError::LogFilter { .. })));

	let config = LoggingConfig::default();
	init_tracing(&config).unwrap();
	let second = init_tracing(&config);
	assert!(matches!(second, Err(ConfigError::AlreadyInitialised)), "got {second:?}");
}
