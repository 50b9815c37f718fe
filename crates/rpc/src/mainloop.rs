//! Request pump between a byte stream and a [`Dispatcher`].

use async_trait::async_trait;
use prism_config::TransportConfig;
use prism_dispatch::{Dispatcher, ReportSink, SinkError};
use prism_invocation::{Outcome, Report, schema};
use prism_worker::{TaskClass, WorkerJoinSet, join_error_panic_message};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::frame::{FrameReader, Inbound, Outbound, write_frame};
use crate::Result;

/// Drives one transport connection.
///
/// Each decoded request is dispatched on its own task, so a slow request
/// never delays the others. Reports are written in the order they are
/// produced.
pub struct MainLoop {
	dispatcher: Dispatcher,
	config: TransportConfig,
}

impl MainLoop {
	/// Creates a main loop with the default transport configuration.
	pub fn new(dispatcher: Dispatcher) -> Self {
		Self::with_config(dispatcher, TransportConfig::default())
	}

	/// Creates a main loop with an explicit transport configuration.
	pub fn with_config(dispatcher: Dispatcher, config: TransportConfig) -> Self {
		Self { dispatcher, config }
	}

	/// Serves requests from `input` until it ends, writing reports to `output`.
	///
	/// At end of input, requests still in flight are awaited and their
	/// reports written before `output` is shut down.
	///
	/// # Errors
	///
	/// - [`Error::Io`](crate::Error::Io) when `input` or `output` fails.
	/// - [`Error::Json`](crate::Error::Json) when a report cannot be encoded.
	pub async fn run(self, input: impl AsyncBufRead + Unpin, mut output: impl AsyncWrite + Unpin) -> Result<()> {
		let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();
		let mut reader = FrameReader::new(input, self.config.max_frame_bytes);
		let mut tasks = WorkerJoinSet::new(TaskClass::Request);
		let mut input_open = true;

		while input_open || !tasks.is_empty() {
			tokio::select! {
				biased;

				Some(outbound) = rx.recv() => {
					write_frame(&mut output, &outbound).await?;
				}

				joined = tasks.join_next(), if !tasks.is_empty() => {
					if let Some(Err(err)) = joined {
						match join_error_panic_message(err) {
							Some(message) => error!(panic = %message, "rpc.request.panicked"),
							None => error!("rpc.request.aborted"),
						}
					}
				}

				frame = reader.next_frame(), if input_open => match frame {
					Ok(Some(frame)) => self.accept(&frame, &tx, &mut tasks),
					Ok(None) => {
						debug!(in_flight = tasks.len(), "rpc.input.closed");
						input_open = false;
					}
					Err(err) if err.is_recoverable() => warn!(error = %err, "rpc.frame.skipped"),
					Err(err) => return Err(err),
				},
			}
		}

		while let Ok(outbound) = rx.try_recv() {
			write_frame(&mut output, &outbound).await?;
		}
		output.shutdown().await?;
		Ok(())
	}

	fn accept(&self, frame: &[u8], tx: &mpsc::UnboundedSender<Outbound>, tasks: &mut WorkerJoinSet<()>) {
		let Inbound { object, request } = match serde_json::from_slice(frame) {
			Ok(inbound) => inbound,
			Err(err) => {
				self.reject(frame, &err, tx);
				return;
			}
		};
		debug!(object = %object, identifier = %request.identifier, "rpc.request.accepted");

		let dispatcher = self.dispatcher.clone();
		let sink = ObjectSink {
			object: object.clone(),
			tx: tx.clone(),
		};
		tasks.spawn(async move {
			dispatcher.dispatch(&object, &request, &sink).await;
		});
	}

	/// Answers an undecodable request when it can still be correlated.
	fn reject(&self, frame: &[u8], err: &serde_json::Error, tx: &mpsc::UnboundedSender<Outbound>) {
		let Some((object, identifier)) = correlation(frame) else {
			warn!(error = %err, "rpc.request.uncorrelated");
			return;
		};
		warn!(object = %object, identifier = %identifier, error = %err, "rpc.request.invalid");
		let sentinel = &self.dispatcher.config().sentinel_view;
		let results = vec![Outcome::error(format!("invalid request: {err}")).in_view(sentinel.clone())];
		let _ = tx.send(Outbound {
			object,
			report: Report::new(identifier, results),
		});
	}
}

/// Recovers the object id and request identifier from a malformed frame.
fn correlation(frame: &[u8]) -> Option<(String, String)> {
	let value: Value = serde_json::from_slice(frame).ok()?;
	let object = value.get(schema::OBJECT)?.as_str()?;
	let identifier = value.get(schema::REQUEST)?.get(schema::IDENTIFIER)?.as_str()?;
	Some((object.to_string(), identifier.to_string()))
}

/// Routes the reports of one object's requests into the outbound queue.
struct ObjectSink {
	object: String,
	tx: mpsc::UnboundedSender<Outbound>,
}

#[async_trait]
impl ReportSink for ObjectSink {
	async fn report(&self, report: Report) -> std::result::Result<(), SinkError> {
		self.tx
			.send(Outbound {
				object: self.object.clone(),
				report,
			})
			.map_err(|_| SinkError::Closed)
	}
}
