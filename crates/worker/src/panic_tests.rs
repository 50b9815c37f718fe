use super::{join_error_panic_message, panic_payload_message};

#[tokio::test(flavor = "current_thread")]
async fn extracts_static_str_payload() {
	let handle = tokio::spawn(async { panic!("target exploded") });
	let err = handle.await.unwrap_err();
	let msg = join_error_panic_message(err).expect("should be a panic");
	assert!(msg.contains("target exploded"), "got: {msg}");
}

#[tokio::test(flavor = "current_thread")]
async fn extracts_formatted_payload() {
	let view = "left";
	let handle = tokio::spawn(async move { panic!("view {view} went away") });
	let err = handle.await.unwrap_err();
	let msg = join_error_panic_message(err).expect("should be a panic");
	assert_eq!(msg, "view left went away");
}

#[tokio::test(flavor = "current_thread")]
async fn aborted_task_is_not_a_panic() {
	let handle = tokio::spawn(async {
		tokio::time::sleep(std::time::Duration::from_secs(60)).await;
	});
	handle.abort();
	let err = handle.await.unwrap_err();
	assert!(join_error_panic_message(err).is_none());
}

#[test]
fn renders_caught_payloads() {
	let caught = std::panic::catch_unwind::<_, ()>(|| panic!("getter failed")).unwrap_err();
	assert_eq!(panic_payload_message(caught.as_ref()), "getter failed");

	let member = "title";
	let caught = std::panic::catch_unwind::<_, ()>(|| panic!("no {member} here")).unwrap_err();
	assert_eq!(panic_payload_message(caught.as_ref()), "no title here");

	let caught = std::panic::catch_unwind::<_, ()>(|| std::panic::panic_any(7_u32)).unwrap_err();
	assert_eq!(panic_payload_message(caught.as_ref()), "<non-string panic payload>");
}
