//! Transport plumbing between a backend and the dispatcher.
//!
//! This crate carries invocation requests and reports over any tokio byte
//! stream:
//! * [`FrameReader`] / [`write_frame`]: newline-delimited JSON frames with a size bound
//! * [`Inbound`] / [`Outbound`]: the frame payloads
//! * [`MainLoop`]: reads requests, dispatches them concurrently, writes reports back

#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod mainloop;

pub use error::{Error, Result};
pub use frame::{FrameReader, Inbound, Outbound, write_frame};
pub use mainloop::MainLoop;
