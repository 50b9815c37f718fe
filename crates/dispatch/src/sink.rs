//! Where finished reports go.

use async_trait::async_trait;
use prism_invocation::Report;
use tokio::sync::mpsc;

use crate::error::SinkError;

/// Accepts the single report produced for a request.
///
/// The dispatcher calls this at most once per request and never for
/// `IGNORE`. Delivery failures are logged by the caller, not retried.
#[async_trait]
pub trait ReportSink: Send + Sync {
	/// Hands `report` over for delivery.
	async fn report(&self, report: Report) -> Result<(), SinkError>;
}

/// A [`ReportSink`] feeding an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
	tx: mpsc::UnboundedSender<Report>,
}

impl ChannelSink {
	/// Creates a sink together with the receiving end.
	pub fn new() -> (Self, mpsc::UnboundedReceiver<Report>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}

	/// Wraps an existing sender.
	pub fn from_sender(tx: mpsc::UnboundedSender<Report>) -> Self {
		Self { tx }
	}
}

#[async_trait]
impl ReportSink for ChannelSink {
	async fn report(&self, report: Report) -> Result<(), SinkError> {
		self.tx.send(report).map_err(|_| SinkError::Closed)
	}
}
