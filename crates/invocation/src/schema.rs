//! Canonical wire field names and completion policy spellings.
//!
//! The serde derives spell these names out literally; the tests below keep
//! the two in sync. Code that has to look into a frame which failed to
//! decode, such as the transport correlating a malformed request, reads the
//! names from here.

// ---------------------------------------------------------------------------
// Frame fields
// ---------------------------------------------------------------------------

pub const OBJECT: &str = "object";
pub const REQUEST: &str = "request";
pub const REPORT: &str = "report";

// ---------------------------------------------------------------------------
// Request fields
// ---------------------------------------------------------------------------

pub const TARGET: &str = "target";
pub const PATH: &str = "path";
pub const ARGS: &str = "args";
pub const IDENTIFIER: &str = "identifier";
pub const VIEWS: &str = "views";
pub const RETURN_WHEN: &str = "return_when";

// ---------------------------------------------------------------------------
// Report fields
// ---------------------------------------------------------------------------

pub const RESULTS: &str = "results";
pub const RESULT: &str = "result";
pub const ERROR: &str = "error";
pub const VIEW: &str = "view";

// ---------------------------------------------------------------------------
// Completion policies
// ---------------------------------------------------------------------------

pub const ALL_COMPLETED: &str = "ALL_COMPLETED";
pub const FIRST_COMPLETED: &str = "FIRST_COMPLETED";
pub const FIRST_EXCEPTION: &str = "FIRST_EXCEPTION";
pub const IGNORE: &str = "IGNORE";

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::{Value, json};

	use super::*;
	use crate::{InvocationRequest, Outcome, Report};

	fn keys(value: &Value) -> Vec<&str> {
		let mut keys: Vec<&str> = value
			.as_object()
			.map(|object| object.keys().map(String::as_str).collect())
			.unwrap_or_default();
		keys.sort_unstable();
		keys
	}

	fn sorted<'a>(mut names: Vec<&'a str>) -> Vec<&'a str> {
		names.sort_unstable();
		names
	}

	#[test]
	fn request_encodes_with_schema_names() {
		let request = InvocationRequest::new("abc", vec!["dialog".to_string()], "focus").with_args(vec![json!(1)]);
		let encoded = serde_json::to_value(&request).unwrap();
		assert_eq!(keys(&encoded), sorted(vec![TARGET, PATH, ARGS, IDENTIFIER, VIEWS, RETURN_WHEN]));
		assert_eq!(encoded[RETURN_WHEN], json!(FIRST_EXCEPTION));
	}

	#[test]
	fn report_encodes_with_schema_names() {
		let results = vec![Outcome::Result(json!(1)).in_view("left"), Outcome::error("boom").in_view("right")];
		let report = Report::new("abc", results);
		let encoded = serde_json::to_value(&report).unwrap();
		assert_eq!(keys(&encoded), sorted(vec![IDENTIFIER, RESULTS]));
		assert_eq!(keys(&encoded[RESULTS][0]), sorted(vec![VIEW, RESULT]));
		assert_eq!(keys(&encoded[RESULTS][1]), sorted(vec![VIEW, ERROR]));
	}
}
