use std::future::Future;

use tokio::task::JoinHandle;

use crate::TaskClass;

/// Spawns an async task on the current tokio runtime.
///
/// Must be called from within a runtime context. Dropping the returned handle
/// detaches the task; it keeps running to completion.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	tokio::spawn(fut)
}
