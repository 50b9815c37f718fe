//! Target resolution: from a request and a view set to concrete targets.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use indexmap::IndexMap;
use prism_invocation::{InvocationRequest, ViewSelector};
use prism_worker::panic_payload_message;
use tracing::warn;

use crate::Result;
use crate::error::DispatchError;
use crate::target::Target;
use crate::view::{View, ViewSet};

/// Views that resolved the whole path, mapped to their terminal target.
pub type ResolvedTargets = IndexMap<String, Arc<dyn Target>>;

/// Resolves `request` against `views`.
///
/// Views that are not mounted, that lack a ref along the path, or that panic
/// while being walked are left out with a warning. An empty result is not an error here.
///
/// # Errors
///
/// - [`DispatchError::EmptyPath`] if the request has no path.
/// - [`DispatchError::UnknownView`] if an explicitly selected view is missing.
/// - [`DispatchError::NotNavigable`] if a fragment is applied to a target without refs.
pub fn resolve(request: &InvocationRequest, views: &ViewSet) -> Result<ResolvedTargets> {
	if request.path.is_empty() {
		return Err(DispatchError::EmptyPath);
	}

	let selected = select_views(&request.views, views)?;
	let mut resolved = ResolvedTargets::with_capacity(selected.len());
	for (name, view) in selected {
		let walked = match catch_unwind(AssertUnwindSafe(|| navigate(name, view.as_ref(), &request.path))) {
			Ok(walked) => walked?,
			Err(payload) => {
				warn!(view = name, panic = %panic_payload_message(payload.as_ref()), "dispatch.resolve.panicked");
				None
			}
		};
		if let Some(target) = walked {
			resolved.insert(name.to_string(), target);
		}
	}
	Ok(resolved)
}

/// Picks the candidate views named by `selector`.
///
/// Every explicitly named view must exist. Duplicates are collapsed.
pub fn select_views<'a>(selector: &ViewSelector, views: &'a ViewSet) -> Result<Vec<(&'a str, &'a Arc<dyn View>)>> {
	let lookup = |name: &str| {
		views
			.get_key_value(name)
			.map(|(key, view)| (key.as_str(), view))
			.ok_or_else(|| DispatchError::UnknownView(name.to_string()))
	};

	match selector {
		ViewSelector::All => Ok(views.iter().map(|(name, view)| (name.as_str(), view)).collect()),
		ViewSelector::One(name) => Ok(vec![lookup(name)?]),
		ViewSelector::Many(names) => {
			let mut selected: Vec<(&str, &Arc<dyn View>)> = Vec::with_capacity(names.len());
			for name in names {
				let entry = lookup(name)?;
				if !selected.iter().any(|(seen, _)| *seen == entry.0) {
					selected.push(entry);
				}
			}
			Ok(selected)
		}
	}
}

fn navigate(view_name: &str, view: &dyn View, path: &[String]) -> Result<Option<Arc<dyn Target>>> {
	let Some(mut target) = view.root() else {
		warn!(view = view_name, "dispatch.resolve.unmounted");
		return Ok(None);
	};

	for fragment in path {
		let child = match target.as_navigable() {
			Some(navigable) => navigable.lookup_child(fragment),
			None => {
				return Err(DispatchError::NotNavigable {
					fragment: fragment.clone(),
				});
			}
		};
		let Some(child) = child else {
			warn!(view = view_name, fragment = %fragment, "dispatch.resolve.missing_ref");
			return Ok(None);
		};
		target = child;
	}

	Ok(Some(target))
}
