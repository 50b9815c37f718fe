//! Newline-delimited JSON framing.
//!
//! One frame is one line of JSON. Blank lines are skipped, a trailing `\r` is
//! tolerated and the final line may lack its newline.

use prism_invocation::{InvocationRequest, Report};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{Error, Result};

/// A request addressed to one logical object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inbound {
	/// Logical object whose views are targeted.
	pub object: String,
	/// The request itself.
	pub request: InvocationRequest,
}

/// A report produced for one logical object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outbound {
	/// Logical object the request was addressed to.
	pub object: String,
	/// The aggregated report.
	pub report: Report,
}

/// Reads size-bounded frames from a buffered stream.
///
/// Reading is cancel safe: a partially read line stays buffered and the next
/// call continues it.
#[derive(Debug)]
pub struct FrameReader<R> {
	input: R,
	max_frame_bytes: usize,
	buf: Vec<u8>,
	discarding: bool,
}

impl<R> FrameReader<R>
where
	R: AsyncBufRead + Unpin,
{
	/// Wraps `input`, rejecting frames longer than `max_frame_bytes`.
	pub fn new(input: R, max_frame_bytes: usize) -> Self {
		Self {
			input,
			max_frame_bytes,
			buf: Vec::new(),
			discarding: false,
		}
	}

	/// Returns the raw bytes of the next frame, or `None` at end of stream.
	///
	/// # Errors
	///
	/// - [`Error::FrameTooLarge`] when a line exceeds the bound. The rest of
	///   that line is skipped on the next call.
	/// - [`Error::Io`] when the stream fails.
	pub async fn next_frame(&mut self) -> Result<Option<Vec<u8>>> {
		loop {
			if self.discarding {
				self.buf.clear();
				let limit = self.limit();
				let read = (&mut self.input).take(limit).read_until(b'\n', &mut self.buf).await?;
				let ended = read == 0 || self.buf.last() == Some(&b'\n');
				self.buf.clear();
				if ended {
					self.discarding = false;
					if read == 0 {
						return Ok(None);
					}
				}
				continue;
			}

			let budget = self.limit().saturating_sub(self.buf.len() as u64);
			let read = (&mut self.input).take(budget).read_until(b'\n', &mut self.buf).await?;

			if self.buf.last() == Some(&b'\n') {
				let frame = self.take_frame();
				if frame.iter().all(u8::is_ascii_whitespace) {
					continue;
				}
				return Ok(Some(frame));
			}

			if self.buf.len() > self.max_frame_bytes {
				tracing::warn!(max = self.max_frame_bytes, "rpc.frame.too_large");
				self.buf.clear();
				self.discarding = true;
				return Err(Error::FrameTooLarge {
					max: self.max_frame_bytes,
				});
			}

			if read == 0 {
				if self.buf.iter().all(u8::is_ascii_whitespace) {
					self.buf.clear();
					return Ok(None);
				}
				return Ok(Some(self.take_frame()));
			}
		}
	}

	/// Reads and decodes the next frame.
	///
	/// # Errors
	///
	/// As [`FrameReader::next_frame`], plus [`Error::Json`] when the frame is
	/// not a valid `T`. The stream stays usable after a decode error.
	pub async fn read<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
		match self.next_frame().await? {
			Some(frame) => Ok(Some(serde_json::from_slice(&frame)?)),
			None => Ok(None),
		}
	}

	/// Content bytes plus the newline.
	fn limit(&self) -> u64 {
		self.max_frame_bytes as u64 + 1
	}

	fn take_frame(&mut self) -> Vec<u8> {
		let mut frame = std::mem::take(&mut self.buf);
		if frame.last() == Some(&b'\n') {
			frame.pop();
		}
		if frame.last() == Some(&b'\r') {
			frame.pop();
		}
		frame
	}
}

/// Encodes `frame` as one line and flushes it.
///
/// # Errors
///
/// Returns [`Error::Json`] if `frame` cannot be encoded and [`Error::Io`] if
/// writing fails.
pub async fn write_frame<W, T>(output: &mut W, frame: &T) -> Result<()>
where
	W: AsyncWrite + Unpin,
	T: Serialize,
{
	let mut bytes = serde_json::to_vec(frame)?;
	bytes.push(b'\n');
	output.write_all(&bytes).await?;
	output.flush().await?;
	Ok(())
}
