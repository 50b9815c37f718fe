//! Shared task primitives for the Prism dispatcher.
//!
//! * [`spawn`]: classified task spawning on the ambient tokio runtime
//! * [`WorkerJoinSet`]: a classified [`tokio::task::JoinSet`]
//! * [`CancelHandle`]: optional, idempotent cancellation capability
//! * [`join_error_panic_message`]: panic payload extraction for reporting

mod cancel;
mod class;
mod join_set;
mod panic;
mod spawn;

pub use cancel::CancelHandle;
pub use class::TaskClass;
pub use join_set::WorkerJoinSet;
pub use panic::{join_error_panic_message, panic_payload_message};
pub use spawn::spawn;
pub use tokio_util::sync::CancellationToken;
