use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use rstest::rstest;
use prism_invocation::Outcome;
use serde_json::{Value, json};

use super::*;
use crate::element::Element;
use crate::target::PendingCall;

fn widget() -> Arc<Element> {
	Element::leaf("widget")
		.property("title", json!("hello"))
		.method("add", |_, args| {
			let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
			Ok(Call::Ready(json!(sum)))
		})
		.method("label", |this, _| Ok(Call::Ready(this.property("title").unwrap_or(Value::Null))))
		.method("fail", |_, _| Err(Thrown::message("validation failed")))
		.method("throw_value", |_, _| Err(Thrown::Value(json!({"code": 3}))))
		.method("explode", |_, _| panic!("sync explosion"))
		.method("later", |_, args| {
			let value = args.into_iter().next().unwrap_or(Value::Null);
			Ok(Call::pending(async move {
				tokio::time::sleep(Duration::from_millis(5)).await;
				Ok(value)
			}))
		})
		.method("reject_later", |_, _| {
			Ok(Call::pending(async {
				tokio::task::yield_now().await;
				Err(Thrown::message("rejected"))
			}))
		})
		.method("panic_later", |_, _| {
			let explode = true;
			Ok(Call::pending(async move {
				tokio::task::yield_now().await;
				if explode {
					panic!("async explosion");
				}
				Ok(Value::Null)
			}))
		})
		.method("wait_for_cancel", |_, _| {
			Ok(Call::Pending(PendingCall::cancellable(|token| async move {
				token.cancelled().await;
				Err(Thrown::message("cancelled by request"))
			})))
		})
		.build()
}

async fn outcome_of(member: &str, args: Vec<Value>) -> Outcome {
	invoke(widget().as_ref(), member, &args).outcome().await
}

#[tokio::test(flavor = "current_thread")]
async fn reads_property_without_arguments() {
	assert_eq!(outcome_of("title", vec![]).await, Outcome::Result(json!("hello")));
}

#[rstest]
#[case::missing_member("nothing", vec![], "no method or property nothing exposed on target")]
#[case::property_with_arguments("title", vec![json!(1)], "cannot call title with arguments since it is not a function")]
#[case::thrown_error("fail", vec![], "validation failed")]
#[case::thrown_value("throw_value", vec![], r#"{"code":3}"#)]
#[case::panic("explode", vec![], "invocation panicked: sync explosion")]
#[tokio::test(flavor = "current_thread")]
async fn failures_become_error_outcomes(#[case] member: &str, #[case] args: Vec<Value>, #[case] message: &str) {
	assert_eq!(outcome_of(member, args).await, Outcome::error(message));
}

/// A target whose every member lookup panics.
struct ExplodingGetter;

impl Target for ExplodingGetter {
	fn member(&self, name: &str) -> Member {
		panic!("getter {name} exploded")
	}

	fn call(&self, _name: &str, _args: Vec<Value>) -> Result<Call, Thrown> {
		Ok(Call::Ready(Value::Null))
	}
}

#[tokio::test(flavor = "current_thread")]
async fn panicking_member_lookup_becomes_an_error_outcome() {
	let invocation = invoke(&ExplodingGetter, "title", &[]);
	assert!(!invocation.cancel_handle().is_supported());
	assert_eq!(invocation.outcome().await, Outcome::error("invocation panicked: getter title exploded"));
}

#[tokio::test(flavor = "current_thread")]
async fn calls_methods_with_arguments() {
	assert_eq!(outcome_of("add", vec![json!(2), json!(5)]).await, Outcome::Result(json!(7)));
}

#[tokio::test(flavor = "current_thread")]
async fn methods_see_their_own_target() {
	assert_eq!(outcome_of("label", vec![]).await, Outcome::Result(json!("hello")));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn adopts_pending_results() {
	assert_eq!(outcome_of("later", vec![json!("done")]).await, Outcome::Result(json!("done")));
}

#[tokio::test(flavor = "current_thread")]
async fn rejections_become_error_outcomes() {
	assert_eq!(outcome_of("reject_later", vec![]).await, Outcome::error("rejected"));
	assert_eq!(
		outcome_of("panic_later", vec![]).await,
		Outcome::error("invocation panicked: async explosion")
	);
}

#[tokio::test(flavor = "current_thread")]
async fn cancellation_reaches_the_operation() {
	let invocation = invoke(widget().as_ref(), "wait_for_cancel", &[]);
	assert!(invocation.cancel_handle().is_supported());

	invocation.cancel();
	invocation.cancel();

	assert_eq!(invocation.outcome().await, Outcome::error("cancelled by request"));
}

#[tokio::test(flavor = "current_thread")]
async fn plain_results_have_noop_cancel() {
	let invocation = invoke(widget().as_ref(), "add", &[]);
	assert!(!invocation.cancel_handle().is_supported());
	invocation.cancel();
	assert_eq!(invocation.outcome().await, Outcome::Result(json!(0)));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn dropped_invocations_keep_running() {
	let finished = Arc::new(AtomicBool::new(false));
	let flag = Arc::clone(&finished);
	let target = Element::leaf("recorder")
		.method("record", move |this, _| {
			this.set_property("started", json!(true));
			let flag = Arc::clone(&flag);
			Ok(Call::pending(async move {
				tokio::time::sleep(Duration::from_millis(10)).await;
				flag.store(true, Ordering::SeqCst);
				Ok(Value::Null)
			}))
		})
		.build();

	drop(invoke(target.as_ref(), "record", &[]));
	assert_eq!(target.property("started"), Some(json!(true)));
	assert!(!finished.load(Ordering::SeqCst));

	tokio::time::sleep(Duration::from_millis(20)).await;
	assert!(finished.load(Ordering::SeqCst));
}
