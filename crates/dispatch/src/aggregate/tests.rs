use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use prism_invocation::{Outcome, ReturnWhen, ViewOutcome};
use prism_worker::CancelHandle;
use serde_json::json;

use super::*;

type CancelLog = Arc<Mutex<Vec<&'static str>>>;

/// An invocation settling with `outcome` after `ms`, recording cancellation in `log`.
fn after(ms: u64, outcome: Outcome, view: &'static str, log: &CancelLog) -> PendingInvocation {
	let log = Arc::clone(log);
	PendingInvocation::from_future(
		async move {
			tokio::time::sleep(Duration::from_millis(ms)).await;
			outcome
		},
		CancelHandle::from_fn(move || log.lock().push(view)),
	)
}

fn ok(view: &str, value: i64) -> ViewOutcome {
	Outcome::Result(json!(value)).in_view(view)
}

fn aggregator(entries: Vec<(&'static str, u64, Outcome)>, log: &CancelLog) -> Aggregator {
	let mut aggregator = Aggregator::new();
	for (view, ms, outcome) in entries {
		aggregator.push(view, after(ms, outcome, view, log));
	}
	aggregator
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn all_completed_reports_in_mapping_order() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(
		vec![
			("a", 30, Outcome::Result(json!(1))),
			("b", 10, Outcome::error("boom")),
			("c", 20, Outcome::Result(json!(3))),
		],
		&log,
	);

	let results = aggregator.wait(&ReturnWhen::AllCompleted).await.unwrap();

	assert_eq!(results, Some(vec![ok("a", 1), Outcome::error("boom").in_view("b"), ok("c", 3)]));
	assert!(log.lock().is_empty());
	assert_eq!(aggregator.phase(), Phase::Resolved);
	assert_eq!(aggregator.outstanding(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn first_completed_reports_the_first_settlement_and_cancels_the_rest() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(
		vec![
			("a", 30, Outcome::Result(json!(1))),
			("b", 10, Outcome::error("fast failure")),
			("c", 20, Outcome::Result(json!(3))),
		],
		&log,
	);

	let results = aggregator.wait(&ReturnWhen::FirstCompleted).await.unwrap();

	assert_eq!(results, Some(vec![Outcome::error("fast failure").in_view("b")]));
	assert_eq!(*log.lock(), vec!["a", "c"]);
	assert_eq!(aggregator.outstanding(), 0);
}

#[tokio::test(flavor = "current_thread")]
async fn first_completed_without_invocations_fails() {
	let mut aggregator = Aggregator::new();
	let err = aggregator.wait(&ReturnWhen::FirstCompleted).await.unwrap_err();
	assert_eq!(err, DispatchError::NoMountedTargets);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn first_exception_stops_at_the_first_error() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(
		vec![
			("a", 20, Outcome::Result(json!(1))),
			("b", 10, Outcome::error("b failed")),
			("c", 30, Outcome::Result(json!(3))),
		],
		&log,
	);

	let results = aggregator.wait(&ReturnWhen::FirstException).await.unwrap();

	assert_eq!(results, Some(vec![Outcome::error("b failed").in_view("b")]));
	assert_eq!(*log.lock(), vec!["a", "c"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn first_exception_only_cancels_what_is_still_outstanding() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(
		vec![
			("a", 10, Outcome::Result(json!(1))),
			("b", 20, Outcome::error("b failed")),
			("c", 30, Outcome::Result(json!(3))),
		],
		&log,
	);

	let results = aggregator.wait(&ReturnWhen::FirstException).await.unwrap();

	assert_eq!(results, Some(vec![Outcome::error("b failed").in_view("b")]));
	assert_eq!(*log.lock(), vec!["c"]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn first_exception_without_errors_reports_in_settlement_order() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(
		vec![
			("a", 20, Outcome::Result(json!(1))),
			("b", 30, Outcome::Result(json!(2))),
			("c", 10, Outcome::Result(json!(3))),
		],
		&log,
	);

	let results = aggregator.wait(&ReturnWhen::FirstException).await.unwrap();

	assert_eq!(results, Some(vec![ok("c", 3), ok("a", 1), ok("b", 2)]));
	assert!(log.lock().is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn ignore_returns_without_waiting_or_cancelling() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(vec![("a", 1_000, Outcome::Result(json!(1)))], &log);

	let results = aggregator.wait(&ReturnWhen::Ignore).await.unwrap();

	assert_eq!(results, None);
	assert!(log.lock().is_empty());
	assert_eq!(aggregator.outstanding(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn unrecognized_policies_cancel_outstanding_work() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(vec![("a", 0, Outcome::Result(json!(1)))], &log);

	let err = aggregator
		.wait(&ReturnWhen::Unrecognized("ANY_COMPLETED".to_string()))
		.await
		.unwrap_err();

	assert_eq!(err, DispatchError::UnsupportedPolicy("ANY_COMPLETED".to_string()));
	assert_eq!(*log.lock(), vec!["a"]);
	assert_eq!(aggregator.outstanding(), 0);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn phases_advance_to_reported() {
	let log = CancelLog::default();
	let mut aggregator = aggregator(vec![("a", 5, Outcome::Result(json!(1)))], &log);
	assert_eq!(aggregator.phase(), Phase::Dispatching);

	aggregator.wait(&ReturnWhen::AllCompleted).await.unwrap();
	assert_eq!(aggregator.phase(), Phase::Resolved);

	aggregator.mark_reported();
	assert_eq!(aggregator.phase(), Phase::Reported);
}
