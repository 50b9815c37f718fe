//! Building calls along a path of refs.

use std::sync::Arc;

use prism_config::ClientConfig;
use prism_invocation::{InvocationRequest, ReturnWhen, Value, ViewSelector};
use prism_rpc::Inbound;
use tracing::debug;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::interpret::{CallOutput, interpret};
use crate::link::Link;

/// A logical object whose views can be called into.
#[derive(Debug, Clone)]
pub struct Widget {
	object: String,
	link: Arc<Link>,
	defaults: ClientConfig,
}

impl Widget {
	/// Addresses `object` through `link` with default call settings.
	pub fn new(object: impl Into<String>, link: Arc<Link>) -> Self {
		Self::with_config(object, link, ClientConfig::default())
	}

	/// Addresses `object` through `link` with explicit call defaults.
	pub fn with_config(object: impl Into<String>, link: Arc<Link>, defaults: ClientConfig) -> Self {
		Self {
			object: object.into(),
			link,
			defaults,
		}
	}

	/// The logical object id.
	pub fn object(&self) -> &str {
		&self.object
	}

	/// The subcomponent referenced as `name` in every view.
	pub fn child(&self, name: impl Into<String>) -> Subcomponent {
		Subcomponent {
			widget: self.clone(),
			path: vec![name.into()],
		}
	}
}

/// A subcomponent, addressed by its ref path from the widget.
#[derive(Debug, Clone)]
pub struct Subcomponent {
	widget: Widget,
	path: Vec<String>,
}

impl Subcomponent {
	/// The child referenced as `name` inside this subcomponent.
	pub fn child(&self, name: impl Into<String>) -> Subcomponent {
		let mut path = self.path.clone();
		path.push(name.into());
		Subcomponent {
			widget: self.widget.clone(),
			path,
		}
	}

	/// Ref path from the widget down to this subcomponent.
	pub fn path(&self) -> &[String] {
		&self.path
	}

	/// Prepares a call of the method or property `name`.
	pub fn method(&self, name: impl Into<String>) -> MethodCall {
		MethodCall {
			widget: self.widget.clone(),
			path: self.path.clone(),
			target: name.into(),
			args: Vec::new(),
			return_when: self.widget.defaults.return_when.clone(),
			views: ViewSelector::All,
			identify: false,
		}
	}
}

/// A call being prepared. Nothing is sent until [`MethodCall::call`].
#[derive(Debug, Clone)]
#[must_use = "a method call does nothing until `call` is awaited"]
pub struct MethodCall {
	widget: Widget,
	path: Vec<String>,
	target: String,
	args: Vec<Value>,
	return_when: ReturnWhen,
	views: ViewSelector,
	identify: bool,
}

impl MethodCall {
	/// Appends a positional argument.
	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.args.push(value.into());
		self
	}

	/// Appends positional arguments.
	pub fn args(mut self, values: impl IntoIterator<Item = Value>) -> Self {
		self.args.extend(values);
		self
	}

	/// Sets the completion policy.
	pub fn return_when(mut self, return_when: ReturnWhen) -> Self {
		self.return_when = return_when;
		self
	}

	/// Restricts the call to some views.
	pub fn views(mut self, views: impl Into<ViewSelector>) -> Self {
		self.views = views.into();
		self
	}

	/// Includes the originating view with each result.
	pub fn identify(mut self, identify: bool) -> Self {
		self.identify = identify;
		self
	}

	/// Sends the call and waits as its completion policy requires.
	///
	/// # Errors
	///
	/// - [`ClientError::Disconnected`] if the link closes first.
	/// - Anything [`interpret`] reports for the returned results.
	pub async fn call(self) -> Result<CallOutput> {
		let identifier = Uuid::new_v4().simple().to_string();
		let request = InvocationRequest::new(identifier, self.path, self.target)
			.with_args(self.args)
			.with_views(self.views.clone())
			.with_return_when(self.return_when.clone());
		debug!(
			object = %self.widget.object,
			identifier = %request.identifier,
			member = %request.describe(),
			"client.call"
		);

		let inbound = Inbound {
			object: self.widget.object.clone(),
			request,
		};
		if self.return_when == ReturnWhen::Ignore {
			self.widget.link.send(inbound)?;
			return Ok(CallOutput::Ignored);
		}

		let report = self.widget.link.request(inbound)?.await.map_err(|_| ClientError::Disconnected)?;
		interpret(report.results, &self.return_when, &self.views, self.identify)
	}
}
