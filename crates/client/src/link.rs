//! Correlation of outgoing requests with incoming reports.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use prism_config::TransportConfig;
use prism_invocation::Report;
use prism_rpc::{FrameReader, Inbound, Outbound, write_frame};
use prism_worker::{CancellationToken, TaskClass};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// The backend's end of a connection to the frontend.
///
/// Requests are queued on an outgoing channel. A request that expects a
/// report registers its identifier first, so a report can never arrive
/// before someone is waiting for it.
#[derive(Debug)]
pub struct Link {
	outgoing: mpsc::UnboundedSender<Inbound>,
	pending: Mutex<HashMap<String, oneshot::Sender<Report>>>,
	closed: CancellationToken,
}

impl Link {
	/// Creates a link and the queue of requests it sends.
	///
	/// Whoever drains the queue feeds reports back through [`Link::deliver`].
	pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Inbound>) {
		let (outgoing, rx) = mpsc::unbounded_channel();
		let link = Arc::new(Self {
			outgoing,
			pending: Mutex::new(HashMap::new()),
			closed: CancellationToken::new(),
		});
		(link, rx)
	}

	/// Creates a link that exchanges frames over a byte stream.
	///
	/// The returned task writes requests to `writer` and delivers reports read
	/// from `reader`. After [`Link::close`] it shuts `writer` down and keeps
	/// delivering until `reader` ends.
	pub fn connect<R, W>(reader: R, writer: W, config: &TransportConfig) -> (Arc<Self>, JoinHandle<prism_rpc::Result<()>>)
	where
		R: AsyncBufRead + Unpin + Send + 'static,
		W: AsyncWrite + Unpin + Send + 'static,
	{
		let (link, outgoing) = Self::new();
		let reader = FrameReader::new(reader, config.max_frame_bytes);
		let task = prism_worker::spawn(TaskClass::Transport, {
			let link = Arc::clone(&link);
			async move {
				let result = pump(&link, outgoing, reader, writer).await;
				link.disconnect();
				result
			}
		});
		(link, task)
	}

	/// Completes the call waiting for `report`.
	///
	/// Returns false if no call is waiting for its identifier.
	pub fn deliver(&self, report: Report) -> bool {
		let Some(tx) = self.pending.lock().remove(&report.identifier) else {
			warn!(identifier = %report.identifier, "client.report.unknown");
			return false;
		};
		tx.send(report).is_ok()
	}

	/// Number of calls waiting for a report.
	pub fn pending(&self) -> usize {
		self.pending.lock().len()
	}

	/// Stops accepting requests. Reports still arrive for calls already sent.
	pub fn close(&self) {
		self.closed.cancel();
	}

	/// Fails every waiting call with [`ClientError::Disconnected`].
	pub fn disconnect(&self) {
		let dropped = std::mem::take(&mut *self.pending.lock());
		if !dropped.is_empty() {
			debug!(pending = dropped.len(), "client.link.disconnect");
		}
	}

	/// Sends `inbound` without expecting a report.
	pub(crate) fn send(&self, inbound: Inbound) -> Result<()> {
		if self.closed.is_cancelled() {
			return Err(ClientError::Disconnected);
		}
		self.outgoing.send(inbound).map_err(|_| ClientError::Disconnected)
	}

	/// Sends `inbound` and returns the receiver its report is delivered to.
	pub(crate) fn request(&self, inbound: Inbound) -> Result<oneshot::Receiver<Report>> {
		let identifier = inbound.request.identifier.clone();
		let (tx, rx) = oneshot::channel();
		self.pending.lock().insert(identifier.clone(), tx);
		if let Err(err) = self.send(inbound) {
			self.pending.lock().remove(&identifier);
			return Err(err);
		}
		Ok(rx)
	}
}

async fn pump<R, W>(
	link: &Link,
	mut outgoing: mpsc::UnboundedReceiver<Inbound>,
	mut reader: FrameReader<R>,
	mut writer: W,
) -> prism_rpc::Result<()>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut writing = true;
	loop {
		tokio::select! {
			biased;

			Some(inbound) = outgoing.recv(), if writing => {
				write_frame(&mut writer, &inbound).await?;
			}

			_ = link.closed.cancelled(), if writing => {
				while let Ok(inbound) = outgoing.try_recv() {
					write_frame(&mut writer, &inbound).await?;
				}
				writer.shutdown().await?;
				writing = false;
			}

			frame = reader.read::<Outbound>() => match frame {
				Ok(Some(Outbound { object, report })) => {
					debug!(object = %object, identifier = %report.identifier, "client.report.received");
					link.deliver(report);
				}
				Ok(None) => return Ok(()),
				Err(err) if err.is_recoverable() => warn!(error = %err, "client.frame.skipped"),
				Err(err) => return Err(err),
			},
		}
	}
}
