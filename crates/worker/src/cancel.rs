use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

type CancelFn = Box<dyn Fn() + Send + Sync>;

/// Optional cancellation capability attached to an in-flight operation.
///
/// Cancelling is a hint: the operation decides whether and when to stop. The
/// handle is cheap to clone and every clone refers to the same operation.
/// Cancelling more than once, or cancelling a [`CancelHandle::noop`], does
/// nothing beyond the first request.
#[derive(Clone, Default)]
pub struct CancelHandle {
	inner: Option<Arc<Inner>>,
}

struct Inner {
	token: CancellationToken,
	hook: Option<CancelFn>,
}

impl CancelHandle {
	/// A handle for an operation that cannot be cancelled.
	pub fn noop() -> Self {
		Self::default()
	}

	/// A handle that cancels `token`.
	pub fn from_token(token: CancellationToken) -> Self {
		Self {
			inner: Some(Arc::new(Inner { token, hook: None })),
		}
	}

	/// A handle that runs `hook` the first time it is cancelled.
	pub fn from_fn(hook: impl Fn() + Send + Sync + 'static) -> Self {
		Self {
			inner: Some(Arc::new(Inner {
				token: CancellationToken::new(),
				hook: Some(Box::new(hook)),
			})),
		}
	}

	/// Returns true if this handle can reach the underlying operation.
	pub fn is_supported(&self) -> bool {
		self.inner.is_some()
	}

	/// Returns true once cancellation has been requested.
	pub fn is_cancelled(&self) -> bool {
		self.inner.as_ref().is_some_and(|inner| inner.token.is_cancelled())
	}

	/// Requests cancellation of the underlying operation.
	pub fn cancel(&self) {
		let Some(inner) = &self.inner else {
			return;
		};
		if inner.token.is_cancelled() {
			return;
		}
		inner.token.cancel();
		if let Some(hook) = &inner.hook {
			hook();
		}
	}
}

impl fmt::Debug for CancelHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CancelHandle")
			.field("supported", &self.is_supported())
			.field("cancelled", &self.is_cancelled())
			.finish()
	}
}
