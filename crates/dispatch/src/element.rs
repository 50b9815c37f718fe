//! In-memory [`Target`] implementation.
//!
//! An [`Element`] holds plain properties, native methods and, for components,
//! named child refs. Embedders use it to expose front-end state to the
//! dispatcher; tests use it to script targets.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;

use crate::target::{Call, Member, Navigable, Target, Thrown};

/// A native method. Receives the element it was called on, so calls are bound.
pub type NativeMethod = Arc<dyn Fn(&Element, Vec<Value>) -> Result<Call, Thrown> + Send + Sync>;

/// A scriptable element.
pub struct Element {
	name: String,
	properties: RwLock<IndexMap<String, Value>>,
	methods: HashMap<String, NativeMethod>,
	refs: Option<RwLock<IndexMap<String, Arc<dyn Target>>>>,
}

impl Element {
	/// Starts building a component: an element with child refs.
	pub fn component(name: impl Into<String>) -> ElementBuilder {
		ElementBuilder::new(name.into(), true)
	}

	/// Starts building a plain element without child refs.
	pub fn leaf(name: impl Into<String>) -> ElementBuilder {
		ElementBuilder::new(name.into(), false)
	}

	/// Debug name of this element.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns a property value.
	pub fn property(&self, name: &str) -> Option<Value> {
		self.properties.read().get(name).cloned()
	}

	/// Sets a property value, returning the previous one.
	pub fn set_property(&self, name: impl Into<String>, value: Value) -> Option<Value> {
		self.properties.write().insert(name.into(), value)
	}

	/// Attaches a child under `name`. Returns false for elements without refs.
	pub fn attach_ref(&self, name: impl Into<String>, child: Arc<dyn Target>) -> bool {
		let Some(refs) = &self.refs else {
			return false;
		};
		refs.write().insert(name.into(), child);
		true
	}

	/// Detaches the child `name`, as when it is unmounted.
	pub fn detach_ref(&self, name: &str) -> Option<Arc<dyn Target>> {
		self.refs.as_ref()?.write().shift_remove(name)
	}
}

impl Target for Element {
	fn member(&self, name: &str) -> Member {
		if self.methods.contains_key(name) {
			return Member::Method;
		}
		match self.properties.read().get(name) {
			Some(value) => Member::Property(value.clone()),
			None => Member::Absent,
		}
	}

	fn call(&self, name: &str, args: Vec<Value>) -> Result<Call, Thrown> {
		match self.methods.get(name) {
			Some(method) => method(self, args),
			None => Err(Thrown::message(format!("{}.{name} is not a function", self.name))),
		}
	}

	fn as_navigable(&self) -> Option<&dyn Navigable> {
		self.refs.as_ref().map(|_| self as &dyn Navigable)
	}
}

impl Navigable for Element {
	fn lookup_child(&self, name: &str) -> Option<Arc<dyn Target>> {
		self.refs.as_ref()?.read().get(name).cloned()
	}
}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut methods: Vec<_> = self.methods.keys().collect();
		methods.sort();
		f.debug_struct("Element")
			.field("name", &self.name)
			.field("properties", &*self.properties.read())
			.field("methods", &methods)
			.field("refs", &self.refs.as_ref().map(|refs| refs.read().keys().cloned().collect::<Vec<_>>()))
			.finish()
	}
}

/// Builder for [`Element`].
pub struct ElementBuilder {
	name: String,
	properties: IndexMap<String, Value>,
	methods: HashMap<String, NativeMethod>,
	refs: Option<IndexMap<String, Arc<dyn Target>>>,
}

impl ElementBuilder {
	fn new(name: String, navigable: bool) -> Self {
		Self {
			name,
			properties: IndexMap::new(),
			methods: HashMap::new(),
			refs: navigable.then(IndexMap::new),
		}
	}

	/// Adds a plain property.
	pub fn property(mut self, name: impl Into<String>, value: Value) -> Self {
		self.properties.insert(name.into(), value);
		self
	}

	/// Adds a native method. Methods shadow properties of the same name.
	pub fn method<F>(mut self, name: impl Into<String>, method: F) -> Self
	where
		F: Fn(&Element, Vec<Value>) -> Result<Call, Thrown> + Send + Sync + 'static,
	{
		self.methods.insert(name.into(), Arc::new(method));
		self
	}

	/// Adds a child ref. Ignored for leaf elements.
	pub fn child(mut self, name: impl Into<String>, child: Arc<dyn Target>) -> Self {
		if let Some(refs) = &mut self.refs {
			refs.insert(name.into(), child);
		}
		self
	}

	/// Finishes the element.
	pub fn build(self) -> Arc<Element> {
		Arc::new(Element {
			name: self.name,
			properties: RwLock::new(self.properties),
			methods: self.methods,
			refs: self.refs.map(RwLock::new),
		})
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn methods_are_bound_to_their_element() {
		let counter = Element::leaf("counter")
			.property("count", json!(1))
			.method("increment", |this, args| {
				let step = args.first().and_then(Value::as_i64).unwrap_or(1);
				let next = this.property("count").and_then(|v| v.as_i64()).unwrap_or(0) + step;
				this.set_property("count", json!(next));
				Ok(Call::Ready(json!(next)))
			})
			.build();

		let Ok(Call::Ready(value)) = counter.call("increment", vec![json!(2)]) else {
			panic!("expected a ready value");
		};
		assert_eq!(value, json!(3));
		assert_eq!(counter.member("count"), Member::Property(json!(3)));
	}

	#[test]
	fn leaves_are_not_navigable() {
		let leaf = Element::leaf("input").build();
		assert!(leaf.as_navigable().is_none());
		assert!(!leaf.attach_ref("x", Element::leaf("x").build()));
	}

	#[test]
	fn refs_can_be_detached() {
		let root = Element::component("root").child("dialog", Element::leaf("dialog").build()).build();
		assert!(root.lookup_child("dialog").is_some());
		assert!(root.detach_ref("dialog").is_some());
		assert!(root.as_navigable().is_some_and(|n| n.lookup_child("dialog").is_none()));
	}
}
