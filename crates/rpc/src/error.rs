//! Transport errors.

use thiserror::Error;

/// Failures of the frame transport.
#[derive(Debug, Error)]
pub enum Error {
	/// The underlying stream failed.
	#[error("transport I/O failed: {0}")]
	Io(#[from] std::io::Error),
	/// A frame could not be encoded or decoded.
	#[error("malformed frame: {0}")]
	Json(#[from] serde_json::Error),
	/// A frame exceeded the configured size bound and was skipped.
	#[error("frame exceeds {max} bytes")]
	FrameTooLarge {
		/// Configured bound.
		max: usize,
	},
}

impl Error {
	/// Returns true if the stream is still usable after this error.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::FrameTooLarge { .. } | Self::Json(_))
	}
}

/// Result type for transport operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
