//! Views of a logical object and the registry that lists them.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::RegistryError;
use crate::target::Target;

/// One rendering of a logical object.
pub trait View: Send + Sync {
	/// The mounted root element, or `None` while the view is not mounted.
	fn root(&self) -> Option<Arc<dyn Target>>;
}

/// Live views of one object, keyed by view name.
pub type ViewSet = IndexMap<String, Arc<dyn View>>;

/// Source of the live views of an object.
#[async_trait]
pub trait ViewRegistry: Send + Sync {
	/// Returns the views currently representing `object`.
	async fn list_views(&self, object: &str) -> Result<ViewSet, RegistryError>;
}

/// A view whose root can be mounted and unmounted at runtime.
#[derive(Default)]
pub struct MountPoint {
	root: RwLock<Option<Arc<dyn Target>>>,
}

impl MountPoint {
	/// Creates an unmounted view.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a view with `root` already mounted.
	pub fn mounted(root: Arc<dyn Target>) -> Self {
		Self {
			root: RwLock::new(Some(root)),
		}
	}

	/// Mounts `root`, replacing any previous root.
	pub fn mount(&self, root: Arc<dyn Target>) {
		*self.root.write() = Some(root);
	}

	/// Unmounts the view, returning the previous root.
	pub fn unmount(&self) -> Option<Arc<dyn Target>> {
		self.root.write().take()
	}

	/// Returns true while a root is mounted.
	pub fn is_mounted(&self) -> bool {
		self.root.read().is_some()
	}
}

impl View for MountPoint {
	fn root(&self) -> Option<Arc<dyn Target>> {
		self.root.read().clone()
	}
}

/// Registry keeping view sets in memory.
///
/// Objects exist from their first registered view until [`Self::remove_object`].
#[derive(Default)]
pub struct InMemoryRegistry {
	objects: RwLock<HashMap<String, ViewSet>>,
}

impl InMemoryRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an object with no views yet.
	pub fn register_object(&self, object: impl Into<String>) {
		self.objects.write().entry(object.into()).or_default();
	}

	/// Adds or replaces the view `name` of `object`.
	pub fn register_view(&self, object: impl Into<String>, name: impl Into<String>, view: Arc<dyn View>) {
		self.objects.write().entry(object.into()).or_default().insert(name.into(), view);
	}

	/// Removes one view. Returns true if it existed.
	pub fn remove_view(&self, object: &str, name: &str) -> bool {
		self.objects
			.write()
			.get_mut(object)
			.is_some_and(|views| views.shift_remove(name).is_some())
	}

	/// Forgets an object and all of its views.
	pub fn remove_object(&self, object: &str) -> bool {
		self.objects.write().remove(object).is_some()
	}
}

#[async_trait]
impl ViewRegistry for InMemoryRegistry {
	async fn list_views(&self, object: &str) -> Result<ViewSet, RegistryError> {
		self.objects
			.read()
			.get(object)
			.cloned()
			.ok_or_else(|| RegistryError::UnknownObject(object.to_string()))
	}
}
