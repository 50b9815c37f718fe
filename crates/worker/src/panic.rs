use std::any::Any;

use tokio::task::JoinError;

/// Extracts the panic message from a failed task, if it panicked.
///
/// Returns `None` when the task was cancelled rather than panicking.
pub fn join_error_panic_message(err: JoinError) -> Option<String> {
	if !err.is_panic() {
		return None;
	}
	Some(panic_payload_message(err.into_panic().as_ref()))
}

/// Renders a panic payload as caught by [`std::panic::catch_unwind`].
pub fn panic_payload_message(payload: &(dyn Any + Send)) -> String {
	if let Some(msg) = payload.downcast_ref::<&'static str>() {
		return (*msg).to_string();
	}
	if let Some(msg) = payload.downcast_ref::<String>() {
		return msg.clone();
	}
	"<non-string panic payload>".to_string()
}

#[cfg(test)]
#[path = "panic_tests.rs"]
mod tests;
