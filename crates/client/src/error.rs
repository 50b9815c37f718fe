use thiserror::Error;

/// An invocation failed in one view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (view {view})")]
pub struct InvocationError {
	/// Rendered error message.
	pub message: String,
	/// View the error was reported for.
	pub view: String,
}

/// Failures of a client call.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The frontend reported an error for the call.
	#[error(transparent)]
	Invocation(#[from] InvocationError),
	/// The report did not carry the single result the call expects.
	#[error("expected exactly one result but found {found}")]
	UnexpectedResultCount {
		/// Number of results in the report.
		found: usize,
	},
	/// The link closed before the report arrived.
	#[error("link to the frontend is closed")]
	Disconnected,
	/// The transport failed.
	#[error(transparent)]
	Transport(#[from] prism_rpc::Error),
}

/// Result type for client calls.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
