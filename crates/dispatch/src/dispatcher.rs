//! Entry point tying resolution, invocation and aggregation together.

use std::sync::Arc;

use prism_config::DispatchConfig;
use prism_invocation::{InvocationRequest, Outcome, Report, ReturnWhen, ViewOutcome};
use tracing::{Instrument, debug, info_span, warn};

use crate::aggregate::Aggregator;
use crate::error::DispatchError;
use crate::invoke::invoke;
use crate::resolve::resolve;
use crate::sink::ReportSink;
use crate::view::ViewRegistry;
use crate::Result;

/// Handles invocation requests for the objects of one [`ViewRegistry`].
///
/// Every request yields exactly one report, except under
/// [`ReturnWhen::Ignore`] which never yields one.
#[derive(Clone)]
pub struct Dispatcher {
	registry: Arc<dyn ViewRegistry>,
	config: DispatchConfig,
}

impl Dispatcher {
	/// Creates a dispatcher with the default configuration.
	pub fn new(registry: Arc<dyn ViewRegistry>) -> Self {
		Self::with_config(registry, DispatchConfig::default())
	}

	/// Creates a dispatcher with an explicit configuration.
	pub fn with_config(registry: Arc<dyn ViewRegistry>, config: DispatchConfig) -> Self {
		Self { registry, config }
	}

	/// The active configuration.
	pub fn config(&self) -> &DispatchConfig {
		&self.config
	}

	/// Handles `request` against the views of `object` and returns the report.
	///
	/// Returns `None` only under [`ReturnWhen::Ignore`].
	pub async fn run(&self, object: &str, request: &InvocationRequest) -> Option<Report> {
		let mut aggregator = Aggregator::new();
		let report = self.conclude(object, request, &mut aggregator).instrument(span(object, request)).await;
		if report.is_some() {
			aggregator.mark_reported();
		}
		report
	}

	/// Handles `request` and hands the report to `sink`.
	///
	/// Sink failures are logged; the report is not retried.
	pub async fn dispatch(&self, object: &str, request: &InvocationRequest, sink: &dyn ReportSink) {
		let span = span(object, request);
		let mut aggregator = Aggregator::new();
		let Some(report) = self.conclude(object, request, &mut aggregator).instrument(span.clone()).await else {
			return;
		};
		match sink.report(report).instrument(span).await {
			Ok(()) => aggregator.mark_reported(),
			Err(error) => warn!(object, identifier = %request.identifier, %error, "dispatch.report.failed"),
		}
	}

	async fn conclude(&self, object: &str, request: &InvocationRequest, aggregator: &mut Aggregator) -> Option<Report> {
		let results = match self.evaluate(object, request, aggregator).await {
			Ok(results) => results,
			Err(error) => self.failure(request, error),
		};
		debug!(reported = results.as_ref().map(Vec::len), "dispatch.request.done");
		results.map(|results| Report::new(request.identifier.clone(), results))
	}

	async fn evaluate(
		&self,
		object: &str,
		request: &InvocationRequest,
		aggregator: &mut Aggregator,
	) -> Result<Option<Vec<ViewOutcome>>> {
		if request.path.is_empty() {
			return Err(DispatchError::EmptyPath);
		}
		if let ReturnWhen::Unrecognized(name) = &request.return_when {
			return Err(DispatchError::UnsupportedPolicy(name.clone()));
		}

		let views = self.registry.list_views(object).await?;
		let targets = resolve(request, &views)?;
		debug!(views = views.len(), targets = targets.len(), "dispatch.request.resolved");

		if targets.is_empty() {
			return match request.return_when {
				ReturnWhen::FirstCompleted => Err(DispatchError::NoMountedTargets),
				ReturnWhen::Ignore => Ok(None),
				_ => Ok(Some(Vec::new())),
			};
		}

		for (view, target) in &targets {
			aggregator.push(view.clone(), invoke(target.as_ref(), &request.target, &request.args));
		}
		aggregator.wait(&request.return_when).await
	}

	/// Turns a whole-request failure into the single sentinel outcome.
	fn failure(&self, request: &InvocationRequest, error: DispatchError) -> Option<Vec<ViewOutcome>> {
		if request.return_when == ReturnWhen::Ignore {
			warn!(%error, "dispatch.request.failed_ignored");
			return None;
		}
		warn!(%error, "dispatch.request.failed");
		Some(vec![Outcome::error(error.to_string()).in_view(self.config.sentinel_view.clone())])
	}
}

fn span(object: &str, request: &InvocationRequest) -> tracing::Span {
	info_span!(
		"dispatch",
		object,
		identifier = %request.identifier,
		member = %request.describe(),
		return_when = %request.return_when,
	)
}
