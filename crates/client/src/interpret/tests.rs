use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;

fn ok(view: &str, value: i64) -> ViewOutcome {
	Outcome::Result(json!(value)).in_view(view)
}

fn failed(view: &str, message: &str) -> ViewOutcome {
	Outcome::error(message).in_view(view)
}

fn settled(value: i64, view: Option<&str>) -> Settled {
	Settled {
		value: json!(value),
		view: view.map(str::to_string),
	}
}

#[rstest]
#[case::single_view(ReturnWhen::FirstException, ViewSelector::from("left"))]
#[case::first_completed(ReturnWhen::FirstCompleted, ViewSelector::All)]
#[case::single_view_all_completed(ReturnWhen::AllCompleted, ViewSelector::from("left"))]
fn single_results(#[case] return_when: ReturnWhen, #[case] views: ViewSelector) {
	let output = interpret(vec![ok("left", 1)], &return_when, &views, false).unwrap();
	assert_eq!(output, CallOutput::Single(settled(1, None)));

	let output = interpret(vec![ok("left", 1)], &return_when, &views, true).unwrap();
	assert_eq!(output.into_single(), Some(settled(1, Some("left"))));
}

#[rstest]
#[case(vec![])]
#[case(vec![ok("a", 1), ok("b", 2)])]
fn single_results_need_exactly_one(#[case] results: Vec<ViewOutcome>) {
	let found = results.len();
	let err = interpret(results, &ReturnWhen::FirstCompleted, &ViewSelector::All, false).unwrap_err();
	assert!(matches!(err, ClientError::UnexpectedResultCount { found: f } if f == found));
}

#[test]
fn single_errors_fail_the_call() {
	let err = interpret(vec![failed("b", "boom")], &ReturnWhen::FirstCompleted, &ViewSelector::All, false).unwrap_err();
	let ClientError::Invocation(err) = err else {
		panic!("expected an invocation error, got {err:?}");
	};
	assert_eq!(
		err,
		InvocationError {
			message: "boom".to_string(),
			view: "b".to_string()
		}
	);
	assert_eq!(err.to_string(), "boom (view b)");
}

#[test]
fn first_exception_keeps_settlement_order() {
	let output = interpret(
		vec![ok("c", 3), ok("a", 1)],
		&ReturnWhen::FirstException,
		&ViewSelector::All,
		true,
	)
	.unwrap();
	assert_eq!(output, CallOutput::Many(vec![settled(3, Some("c")), settled(1, Some("a"))]));
}

#[test]
fn first_exception_errors_fail_the_call() {
	let err = interpret(
		vec![ok("a", 1), failed("b", "broken")],
		&ReturnWhen::FirstException,
		&ViewSelector::Many(vec!["a".into(), "b".into()]),
		false,
	)
	.unwrap_err();
	assert!(matches!(err, ClientError::Invocation(InvocationError { view, .. }) if view == "b"));
}

#[test]
fn all_completed_keeps_errors_per_view() {
	let output = interpret(
		vec![ok("a", 1), failed("b", "broken")],
		&ReturnWhen::AllCompleted,
		&ViewSelector::All,
		false,
	)
	.unwrap();
	assert_eq!(
		output,
		CallOutput::Each(vec![
			Ok(settled(1, None)),
			Err(InvocationError {
				message: "broken".to_string(),
				view: "b".to_string()
			})
		])
	);
}

#[test]
fn ignore_needs_no_results() {
	assert_eq!(
		interpret(vec![], &ReturnWhen::Ignore, &ViewSelector::All, false).unwrap(),
		CallOutput::Ignored
	);
}
