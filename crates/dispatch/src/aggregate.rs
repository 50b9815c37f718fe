//! Completion policies over a set of in-flight invocations.
//!
//! The [`Aggregator`] owns the per-request bookkeeping: an arena of slots in
//! resolved-mapping order, the index set of slots still outstanding, and the
//! futures racing towards settlement. Nothing else mutates it.

use std::collections::BTreeSet;

use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use prism_invocation::{Outcome, ReturnWhen, ViewOutcome};
use prism_worker::CancelHandle;
use tracing::{debug, trace};

use crate::error::DispatchError;
use crate::invoke::PendingInvocation;
use crate::Result;

/// Lifecycle of one request's aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Invocations are being started.
	Dispatching,
	/// The policy is racing outstanding invocations.
	Waiting,
	/// The policy is satisfied; remaining work has been cancelled or detached.
	Resolved,
	/// The outcome has been handed to the sink.
	Reported,
}

struct Slot {
	view: String,
	cancel: CancelHandle,
	outcome: Option<Outcome>,
}

/// Folds the outcomes of one request's invocations according to a
/// [`ReturnWhen`] policy.
pub struct Aggregator {
	phase: Phase,
	slots: Vec<Slot>,
	outstanding: BTreeSet<usize>,
	racing: FuturesUnordered<BoxFuture<'static, (usize, Outcome)>>,
}

impl Default for Aggregator {
	fn default() -> Self {
		Self::new()
	}
}

impl Aggregator {
	/// Creates an empty aggregator in [`Phase::Dispatching`].
	pub fn new() -> Self {
		Self {
			phase: Phase::Dispatching,
			slots: Vec::new(),
			outstanding: BTreeSet::new(),
			racing: FuturesUnordered::new(),
		}
	}

	/// Current phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Number of invocations pushed so far.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns true if no invocation was pushed.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Number of invocations that have not settled yet.
	pub fn outstanding(&self) -> usize {
		self.outstanding.len()
	}

	/// Adds the invocation started for `view`.
	///
	/// Slots keep push order, which is the resolved-mapping order.
	pub fn push(&mut self, view: impl Into<String>, invocation: PendingInvocation) {
		debug_assert_eq!(self.phase, Phase::Dispatching, "push after the policy started waiting");
		let index = self.slots.len();
		let (outcome, cancel) = invocation.into_parts();
		self.slots.push(Slot {
			view: view.into(),
			cancel,
			outcome: None,
		});
		self.outstanding.insert(index);
		self.racing.push(outcome.map(move |outcome| (index, outcome)).boxed());
	}

	/// Waits as long as `policy` requires and returns what to report.
	///
	/// `Ok(None)` means nothing is reported, which is the case for
	/// [`ReturnWhen::Ignore`]. Invocations still outstanding once the policy
	/// is satisfied, or rejected as unsupported, are cancelled but not awaited.
	pub async fn wait(&mut self, policy: &ReturnWhen) -> Result<Option<Vec<ViewOutcome>>> {
		let results = match policy {
			ReturnWhen::Unrecognized(name) => {
				self.cancel_outstanding();
				return Err(DispatchError::UnsupportedPolicy(name.clone()));
			}
			ReturnWhen::Ignore => None,
			ReturnWhen::AllCompleted => {
				self.transition(Phase::Waiting);
				Some(self.all_completed().await)
			}
			ReturnWhen::FirstCompleted => {
				self.transition(Phase::Waiting);
				Some(self.first_completed().await?)
			}
			ReturnWhen::FirstException => {
				self.transition(Phase::Waiting);
				Some(self.first_exception().await)
			}
		};

		self.transition(Phase::Resolved);
		Ok(results)
	}

	/// Records that the report left through the sink.
	pub fn mark_reported(&mut self) {
		self.transition(Phase::Reported);
	}

	async fn all_completed(&mut self) -> Vec<ViewOutcome> {
		while self.settle_next().await.is_some() {}
		self.slots
			.iter_mut()
			.filter_map(|slot| slot.outcome.take().map(|outcome| outcome.in_view(slot.view.clone())))
			.collect()
	}

	async fn first_completed(&mut self) -> Result<Vec<ViewOutcome>> {
		let Some(index) = self.settle_next().await else {
			return Err(DispatchError::NoMountedTargets);
		};
		self.cancel_outstanding();
		Ok(vec![self.take(index)])
	}

	async fn first_exception(&mut self) -> Vec<ViewOutcome> {
		let mut settled = Vec::with_capacity(self.slots.len());
		while let Some(index) = self.settle_next().await {
			let failed = self.slots[index].outcome.as_ref().is_some_and(Outcome::is_error);
			if failed {
				self.cancel_outstanding();
				return vec![self.take(index)];
			}
			settled.push(index);
		}
		settled.into_iter().map(|index| self.take(index)).collect()
	}

	/// Races the outstanding invocations and records the first to settle.
	async fn settle_next(&mut self) -> Option<usize> {
		let (index, outcome) = self.racing.next().await?;
		self.outstanding.remove(&index);
		trace!(
			view = %self.slots[index].view,
			error = outcome.is_error(),
			outstanding = self.outstanding.len(),
			"dispatch.aggregate.settled"
		);
		self.slots[index].outcome = Some(outcome);
		Some(index)
	}

	fn cancel_outstanding(&mut self) {
		for index in std::mem::take(&mut self.outstanding) {
			let slot = &self.slots[index];
			debug!(view = %slot.view, supported = slot.cancel.is_supported(), "dispatch.aggregate.cancel");
			slot.cancel.cancel();
		}
		// Settlements after this point are discarded.
		self.racing = FuturesUnordered::new();
	}

	fn take(&mut self, index: usize) -> ViewOutcome {
		let slot = &mut self.slots[index];
		let outcome = slot.outcome.take().unwrap_or_else(|| Outcome::error("invocation did not settle"));
		outcome.in_view(slot.view.clone())
	}

	fn transition(&mut self, next: Phase) {
		if self.phase != next {
			debug!(from = ?self.phase, to = ?next, "dispatch.aggregate.phase");
			self.phase = next;
		}
	}
}

#[cfg(test)]
mod tests;
