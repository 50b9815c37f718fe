//! Backend-side API for invoking members on the views of a logical object.
//!
//! ```text
//! Widget ─child─► Subcomponent ─child─► … ─method─► MethodCall ─call─► CallOutput
//! ```
//!
//! A [`MethodCall`] is encoded as an
//! [`InvocationRequest`](prism_invocation::InvocationRequest) with a fresh
//! identifier and sent through a [`Link`]. The report that comes back with the
//! same identifier is interpreted according to the call's completion policy
//! and view selector.

mod call;
mod error;
mod interpret;
mod link;

pub use call::{MethodCall, Subcomponent, Widget};
pub use error::{ClientError, InvocationError, Result};
pub use interpret::{CallOutput, Settled, interpret};
pub use link::Link;
