use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settled result of one invocation: the returned value or an error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
	/// The member returned (or its pending operation resolved to) a value.
	Result(Value),
	/// The member was missing, not callable, threw, or its operation rejected.
	Error(String),
}

impl Outcome {
	/// Creates an error outcome.
	pub fn error(message: impl Into<String>) -> Self {
		Self::Error(message.into())
	}

	/// Returns true for an error outcome.
	pub fn is_error(&self) -> bool {
		matches!(self, Self::Error(_))
	}

	/// Tags this outcome with the view it originated from.
	pub fn in_view(self, view: impl Into<String>) -> ViewOutcome {
		ViewOutcome {
			view: view.into(),
			outcome: self,
		}
	}
}

/// An [`Outcome`] tagged with the name of the view that produced it.
///
/// Encodes flat, e.g. `{"view": "left", "result": 3}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOutcome {
	/// Originating view.
	pub view: String,
	/// What happened in that view.
	#[serde(flatten)]
	pub outcome: Outcome,
}

impl ViewOutcome {
	/// Returns true for an error outcome.
	pub fn is_error(&self) -> bool {
		self.outcome.is_error()
	}
}

/// Aggregated verdict for one request, delivered back to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
	/// Correlation id copied from the request.
	pub identifier: String,
	/// Outcomes, ordered according to the request's completion policy.
	pub results: Vec<ViewOutcome>,
}

impl Report {
	/// Creates a report.
	pub fn new(identifier: impl Into<String>, results: Vec<ViewOutcome>) -> Self {
		Self {
			identifier: identifier.into(),
			results,
		}
	}
}
