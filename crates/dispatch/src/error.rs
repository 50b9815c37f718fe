//! Error taxonomy of the dispatcher.

use thiserror::Error;

/// Failures that abort a whole request.
///
/// These are reported once, as a single error outcome tagged with the
/// sentinel view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
	/// The request carried no ref path.
	#[error("path for invocation must not be empty")]
	EmptyPath,
	/// An explicitly selected view does not exist.
	#[error("no view {0} found")]
	UnknownView(String),
	/// A path fragment was applied to a target without refs.
	#[error("not a component, cannot access its ref {fragment}")]
	NotNavigable {
		/// The fragment that could not be looked up.
		fragment: String,
	},
	/// `FIRST_COMPLETED` was requested but no view resolved the path.
	#[error("no (mounted) targets found for this invocation")]
	NoMountedTargets,
	/// The completion policy is not implemented.
	#[error("not implemented: cannot handle return_when {0} yet")]
	UnsupportedPolicy(String),
	/// The view registry could not list the object's views.
	#[error(transparent)]
	Registry(#[from] RegistryError),
}

/// Failures of a single target's invocation, folded into that target's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
	/// The target has no member of that name.
	#[error("no method or property {0} exposed on target")]
	NoMember(String),
	/// Arguments were given for a plain property.
	#[error("cannot call {0} with arguments since it is not a function")]
	NotCallable(String),
	/// The operation threw or rejected; carries the rendered message.
	#[error("{0}")]
	Thrown(String),
	/// The operation panicked.
	#[error("invocation panicked: {0}")]
	Panicked(String),
	/// The task running the operation was aborted before it settled.
	#[error("invocation was aborted")]
	Aborted,
}

/// Failures of the external view registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// No object with this id is known.
	#[error("no object {0} registered")]
	UnknownObject(String),
	/// The registry is not reachable.
	#[error("view registry unavailable: {0}")]
	Unavailable(String),
}

/// Failures handing a report to its sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
	/// The receiving side is gone.
	#[error("report sink closed")]
	Closed,
	/// The sink accepted the report but could not deliver it.
	#[error("report delivery failed: {0}")]
	Delivery(String),
}
