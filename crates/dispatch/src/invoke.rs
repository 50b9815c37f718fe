//! Invocation of one member on one resolved target.

use std::fmt;
use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use prism_invocation::Outcome;
use prism_worker::{CancelHandle, TaskClass, join_error_panic_message, panic_payload_message};
use serde_json::Value;
use tracing::info;

use crate::error::InvokeError;
use crate::target::{Call, Member, Target, Thrown};

/// An invocation that has been started but may not have settled yet.
///
/// The outcome never fails: every error is already folded into
/// [`Outcome::Error`]. Cancelling is best-effort and idempotent.
pub struct PendingInvocation {
	outcome: BoxFuture<'static, Outcome>,
	cancel: CancelHandle,
}

impl PendingInvocation {
	/// An invocation that settled synchronously.
	pub fn settled(outcome: Outcome) -> Self {
		Self {
			outcome: future::ready(outcome).boxed(),
			cancel: CancelHandle::noop(),
		}
	}

	/// An invocation driven by `outcome`, cancellable through `cancel`.
	pub fn from_future<F>(outcome: F, cancel: CancelHandle) -> Self
	where
		F: Future<Output = Outcome> + Send + 'static,
	{
		Self {
			outcome: outcome.boxed(),
			cancel,
		}
	}

	/// Requests cancellation of the underlying operation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns the cancellation capability.
	pub fn cancel_handle(&self) -> &CancelHandle {
		&self.cancel
	}

	/// Waits for the outcome.
	pub async fn outcome(self) -> Outcome {
		self.outcome.await
	}

	pub(crate) fn into_parts(self) -> (BoxFuture<'static, Outcome>, CancelHandle) {
		(self.outcome, self.cancel)
	}
}

impl fmt::Debug for PendingInvocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingInvocation").field("cancel", &self.cancel).finish_non_exhaustive()
	}
}

/// Invokes `member` on `target` with `args`.
///
/// Properties are read, methods are called. A panic while looking up or
/// calling the member settles as an error. The synchronous part of a call
/// runs before this returns; a pending operation is spawned onto the current
/// runtime and keeps running even if the returned handle is dropped.
pub fn invoke(target: &dyn Target, member: &str, args: &[Value]) -> PendingInvocation {
	let lookup = match catch_unwind(AssertUnwindSafe(|| target.member(member))) {
		Ok(lookup) => lookup,
		Err(payload) => return failed(member, InvokeError::Panicked(panic_payload_message(payload.as_ref()))),
	};

	match lookup {
		Member::Absent => failed(member, InvokeError::NoMember(member.to_string())),
		Member::Property(value) if args.is_empty() => PendingInvocation::settled(Outcome::Result(value)),
		Member::Property(_) => failed(member, InvokeError::NotCallable(member.to_string())),
		Member::Method => match catch_unwind(AssertUnwindSafe(|| target.call(member, args.to_vec()))) {
			Ok(Ok(Call::Ready(value))) => PendingInvocation::settled(Outcome::Result(value)),
			Ok(Ok(Call::Pending(pending))) => {
				let (operation, cancel) = pending.into_parts();
				spawn_pending(member.to_string(), operation, cancel)
			}
			Ok(Err(thrown)) => failed(member, InvokeError::Thrown(thrown.render())),
			Err(payload) => failed(member, InvokeError::Panicked(panic_payload_message(payload.as_ref()))),
		},
	}
}

fn failed(member: &str, error: InvokeError) -> PendingInvocation {
	info!(member, error = %error, "dispatch.invoke.error");
	PendingInvocation::settled(Outcome::Error(error.to_string()))
}

fn spawn_pending(member: String, operation: BoxFuture<'static, Result<Value, Thrown>>, cancel: CancelHandle) -> PendingInvocation {
	let task = prism_worker::spawn(TaskClass::Invocation, async move {
		match operation.await {
			Ok(value) => Outcome::Result(value),
			Err(thrown) => {
				info!(member = %member, error = %thrown, "dispatch.invoke.rejected");
				Outcome::Error(InvokeError::Thrown(thrown.render()).to_string())
			}
		}
	});

	let outcome = async move {
		match task.await {
			Ok(outcome) => outcome,
			Err(err) => {
				let error = match join_error_panic_message(err) {
					Some(message) => InvokeError::Panicked(message),
					None => InvokeError::Aborted,
				};
				info!(error = %error, "dispatch.invoke.task_failed");
				Outcome::Error(error.to_string())
			}
		}
	};

	PendingInvocation::from_future(outcome, cancel)
}

#[cfg(test)]
mod tests;
