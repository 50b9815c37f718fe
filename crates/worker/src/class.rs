/// Execution classes used to label spawned work in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// One front-end operation running against a single resolved target.
	Invocation,
	/// One request flowing through resolution, invocation and aggregation.
	Request,
	/// Frame pumping between a byte stream and the dispatcher or backend.
	Transport,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Invocation => "invocation",
			Self::Request => "request",
			Self::Transport => "transport",
		}
	}
}
