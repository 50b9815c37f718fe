//! Turning a report's result list into what a call returns.

use prism_invocation::{Outcome, ReturnWhen, Value, ViewOutcome, ViewSelector};

use crate::error::{ClientError, InvocationError};

/// A successful result, with its view when the call asked to identify views.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
	/// Returned value.
	pub value: Value,
	/// Originating view.
	pub view: Option<String>,
}

/// What a call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
	/// `IGNORE`: nothing was awaited.
	Ignored,
	/// A single view was selected, or `FIRST_COMPLETED` was used.
	Single(Settled),
	/// `FIRST_EXCEPTION` without errors, in settlement order.
	Many(Vec<Settled>),
	/// `ALL_COMPLETED`: one result per view, in view order.
	Each(Vec<Result<Settled, InvocationError>>),
}

impl CallOutput {
	/// Returns the single settled value, if this is [`CallOutput::Single`].
	pub fn into_single(self) -> Option<Settled> {
		match self {
			Self::Single(settled) => Some(settled),
			_ => None,
		}
	}
}

/// Interprets `results` for a call made with `return_when` and `views`.
///
/// # Errors
///
/// - [`ClientError::UnexpectedResultCount`] when a single result is expected
///   but the report carries a different number.
/// - [`ClientError::Invocation`] for an error outcome where the policy makes
///   errors fail the whole call.
pub fn interpret(
	results: Vec<ViewOutcome>,
	return_when: &ReturnWhen,
	views: &ViewSelector,
	identify: bool,
) -> Result<CallOutput, ClientError> {
	if *return_when == ReturnWhen::Ignore {
		return Ok(CallOutput::Ignored);
	}

	if views.is_single() || *return_when == ReturnWhen::FirstCompleted {
		let found = results.len();
		let [only] = <[ViewOutcome; 1]>::try_from(results).map_err(|_| ClientError::UnexpectedResultCount { found })?;
		return Ok(CallOutput::Single(settle(only, identify)?));
	}

	if *return_when == ReturnWhen::AllCompleted {
		return Ok(CallOutput::Each(results.into_iter().map(|result| settle(result, identify)).collect()));
	}

	let settled = results
		.into_iter()
		.map(|result| settle(result, identify))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(CallOutput::Many(settled))
}

fn settle(outcome: ViewOutcome, identify: bool) -> Result<Settled, InvocationError> {
	let ViewOutcome { view, outcome } = outcome;
	match outcome {
		Outcome::Result(value) => Ok(Settled {
			value,
			view: identify.then_some(view),
		}),
		Outcome::Error(message) => Err(InvocationError { message, view }),
	}
}

#[cfg(test)]
mod tests;
