//! Invocation dispatch across the views of one logical object.
//!
//! A request names a member, a path of refs and a completion policy. The
//! [`Dispatcher`] lists the object's views from a [`ViewRegistry`], resolves
//! the path in each selected view ([`resolve`]), starts the operation on every
//! resolved target ([`invoke`]) and folds the outcomes with an [`Aggregator`].
//! The single resulting [`Report`](prism_invocation::Report) goes to a
//! [`ReportSink`].
//!
//! ```text
//! resolve ──► invoke × N ──► Aggregator ──► ReportSink
//! ```
//!
//! Whole-request failures (unknown view, empty path, non-navigable target,
//! unsupported policy) never escape: they become one error outcome tagged
//! with the configured sentinel view. Per-target failures stay local to that
//! target's outcome.

pub mod aggregate;
pub mod dispatcher;
pub mod element;
pub mod error;
pub mod invoke;
pub mod resolve;
pub mod sink;
pub mod target;
pub mod view;

pub use aggregate::{Aggregator, Phase};
pub use dispatcher::Dispatcher;
pub use element::{Element, ElementBuilder};
pub use error::{DispatchError, InvokeError, RegistryError, SinkError};
pub use invoke::{PendingInvocation, invoke};
pub use resolve::{ResolvedTargets, resolve};
pub use sink::{ChannelSink, ReportSink};
pub use target::{Call, Member, Navigable, PendingCall, Target, Thrown};
pub use view::{InMemoryRegistry, MountPoint, View, ViewRegistry, ViewSet};

/// A convenient type alias for `Result` with `E` = [`DispatchError`].
pub type Result<T, E = DispatchError> = std::result::Result<T, E>;
