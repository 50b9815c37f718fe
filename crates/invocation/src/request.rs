use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema;

/// A request to invoke `target` on the element reached by following `path`
/// in each selected view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
	/// Name of the method or property.
	pub target: String,
	/// Refs to follow from a view's root element to the element defining `target`.
	pub path: Vec<String>,
	/// Positional arguments for the call.
	#[serde(default)]
	pub args: Vec<Value>,
	/// Correlation id echoed back in the report.
	pub identifier: String,
	/// Which views to address.
	#[serde(default)]
	pub views: ViewSelector,
	/// When to stop waiting and report.
	pub return_when: ReturnWhen,
}

impl InvocationRequest {
	/// Creates a request addressing all views and waiting for the first exception.
	pub fn new(identifier: impl Into<String>, path: Vec<String>, target: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			path,
			args: Vec::new(),
			identifier: identifier.into(),
			views: ViewSelector::All,
			return_when: ReturnWhen::FirstException,
		}
	}

	/// Replaces the positional arguments.
	pub fn with_args(mut self, args: Vec<Value>) -> Self {
		self.args = args;
		self
	}

	/// Replaces the view selector.
	pub fn with_views(mut self, views: ViewSelector) -> Self {
		self.views = views;
		self
	}

	/// Replaces the completion policy.
	pub fn with_return_when(mut self, return_when: ReturnWhen) -> Self {
		self.return_when = return_when;
		self
	}

	/// Short description for tracing.
	pub fn describe(&self) -> String {
		format!("{}.{}", self.path.join("."), self.target)
	}
}

/// Selection of the views an invocation addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ViewSelector {
	/// Every live view of the object (`null` on the wire).
	#[default]
	All,
	/// Exactly one named view.
	One(String),
	/// An explicit list of named views.
	Many(Vec<String>),
}

impl ViewSelector {
	/// Returns true if this selector names exactly one view.
	pub fn is_single(&self) -> bool {
		matches!(self, Self::One(_))
	}
}

impl From<&str> for ViewSelector {
	fn from(view: &str) -> Self {
		Self::One(view.to_string())
	}
}

impl From<Vec<String>> for ViewSelector {
	fn from(views: Vec<String>) -> Self {
		Self::Many(views)
	}
}

impl fmt::Display for ViewSelector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::All => f.write_str("*"),
			Self::One(view) => f.write_str(view),
			Self::Many(views) => f.write_str(&views.join(",")),
		}
	}
}

/// Completion policy deciding when the dispatcher reports.
///
/// Unknown spellings survive decoding as [`ReturnWhen::Unrecognized`] so the
/// dispatcher can reject them with a report rather than dropping the frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReturnWhen {
	/// Wait for every invocation to settle.
	AllCompleted,
	/// Report the first invocation to settle and cancel the rest.
	FirstCompleted,
	/// Report the first error, or everything if no invocation fails.
	FirstException,
	/// Dispatch and never report.
	Ignore,
	/// A policy this dispatcher does not implement.
	Unrecognized(String),
}

impl ReturnWhen {
	/// Wire spelling of the policy.
	pub fn as_str(&self) -> &str {
		match self {
			Self::AllCompleted => schema::ALL_COMPLETED,
			Self::FirstCompleted => schema::FIRST_COMPLETED,
			Self::FirstException => schema::FIRST_EXCEPTION,
			Self::Ignore => schema::IGNORE,
			Self::Unrecognized(name) => name,
		}
	}
}

impl From<String> for ReturnWhen {
	fn from(name: String) -> Self {
		match name.as_str() {
			schema::ALL_COMPLETED => Self::AllCompleted,
			schema::FIRST_COMPLETED => Self::FirstCompleted,
			schema::FIRST_EXCEPTION => Self::FirstException,
			schema::IGNORE => Self::Ignore,
			_ => Self::Unrecognized(name),
		}
	}
}

impl From<ReturnWhen> for String {
	fn from(policy: ReturnWhen) -> Self {
		match policy {
			ReturnWhen::Unrecognized(name) => name,
			other => other.as_str().to_string(),
		}
	}
}

impl fmt::Display for ReturnWhen {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
