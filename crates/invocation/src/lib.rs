//! Canonical invocation types shared by the backend and the dispatcher.
//!
//! A backend addresses a method or property on every view of one logical
//! object with an [`InvocationRequest`]. The dispatcher answers with a single
//! [`Report`] carrying one [`ViewOutcome`] per participating view, unless the
//! request asked for [`ReturnWhen::Ignore`].

mod outcome;
mod request;
pub mod schema;

pub use outcome::{Outcome, Report, ViewOutcome};
pub use request::{InvocationRequest, ReturnWhen, ViewSelector};
pub use serde_json::Value;

/// View name used for outcomes that do not belong to any particular view.
///
/// Whole-request failures (unknown view, empty path, unsupported policy) are
/// reported as a single error outcome tagged with this name.
pub const UNKNOWN_VIEW: &str = "unknown";
