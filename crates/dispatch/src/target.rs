//! The shape of anything a member can be invoked on.
//!
//! Targets are addressed by member name at runtime. Instead of reflecting on
//! them, the dispatcher asks for a [`Member`] and only calls what reports
//! itself as a [`Member::Method`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use prism_worker::{CancelHandle, CancellationToken};
use serde_json::Value;

/// Result of looking a member up by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
	/// Nothing of that name is exposed.
	Absent,
	/// A plain value.
	Property(Value),
	/// Something callable through [`Target::call`].
	Method,
}

/// An element exposing named, possibly callable members.
pub trait Target: Send + Sync {
	/// Looks up `name` on this target.
	fn member(&self, name: &str) -> Member;

	/// Calls the method `name` with `args`, bound to this target.
	///
	/// Only invoked for names that [`Target::member`] reports as
	/// [`Member::Method`]. `Err` corresponds to a synchronous throw.
	fn call(&self, name: &str, args: Vec<Value>) -> Result<Call, Thrown>;

	/// Returns the named-reference capability if this target has child refs.
	fn as_navigable(&self) -> Option<&dyn Navigable> {
		None
	}
}

/// Named-reference lookup from a target to its children.
pub trait Navigable {
	/// Returns the child registered under `name`, if it is currently mounted.
	fn lookup_child(&self, name: &str) -> Option<Arc<dyn Target>>;
}

/// What a method call produced synchronously.
pub enum Call {
	/// A value, available immediately.
	Ready(Value),
	/// An operation that settles later.
	Pending(PendingCall),
}

impl Call {
	/// Wraps a future as a pending call without cancellation support.
	pub fn pending<F>(future: F) -> Self
	where
		F: Future<Output = Result<Value, Thrown>> + Send + 'static,
	{
		Self::Pending(PendingCall::new(future))
	}
}

impl fmt::Debug for Call {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
			Self::Pending(pending) => f.debug_tuple("Pending").field(pending).finish(),
		}
	}
}

/// An in-flight operation plus its optional cancellation capability.
pub struct PendingCall {
	future: BoxFuture<'static, Result<Value, Thrown>>,
	cancel: CancelHandle,
}

impl PendingCall {
	/// Wraps `future`; cancelling it is a no-op.
	pub fn new<F>(future: F) -> Self
	where
		F: Future<Output = Result<Value, Thrown>> + Send + 'static,
	{
		Self {
			future: future.boxed(),
			cancel: CancelHandle::noop(),
		}
	}

	/// Starts an operation that observes `token` and can therefore be cancelled.
	pub fn cancellable<F>(start: impl FnOnce(CancellationToken) -> F) -> Self
	where
		F: Future<Output = Result<Value, Thrown>> + Send + 'static,
	{
		let token = CancellationToken::new();
		let future = start(token.clone());
		Self::new(future).with_cancel(CancelHandle::from_token(token))
	}

	/// Attaches a cancellation capability.
	pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
		self.cancel = cancel;
		self
	}

	pub(crate) fn into_parts(self) -> (BoxFuture<'static, Result<Value, Thrown>>, CancelHandle) {
		(self.future, self.cancel)
	}
}

impl fmt::Debug for PendingCall {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingCall").field("cancel", &self.cancel).finish_non_exhaustive()
	}
}

/// What an operation threw or rejected with.
#[derive(Debug, Clone, PartialEq)]
pub enum Thrown {
	/// A conventional error carrying a message.
	Error {
		/// Human-readable message.
		message: String,
	},
	/// Any other value.
	Value(Value),
}

impl Thrown {
	/// Creates a conventional error.
	pub fn message(message: impl Into<String>) -> Self {
		Self::Error { message: message.into() }
	}

	/// Creates a conventional error from any [`std::error::Error`].
	pub fn from_error(error: &dyn std::error::Error) -> Self {
		Self::message(error.to_string())
	}

	/// Renders the message reported back to the backend.
	///
	/// Values that are not conventional errors are rendered as JSON.
	pub fn render(&self) -> String {
		match self {
			Self::Error { message } => message.clone(),
			Self::Value(value) => value.to_string(),
		}
	}
}

impl fmt::Display for Thrown {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}
