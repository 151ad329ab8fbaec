//! Page name → component resolution with default-layout decoration.

use std::sync::Arc;

use crate::{ComponentDefinition, ComponentRegistry, Layout, PageError, PageName, Result};

/// Resolves page names against a shared, immutable [`ComponentRegistry`].
///
/// Resolution is synchronous and pure: it returns a decorated copy of the
/// registered definition and never mutates the registry.
#[derive(Debug, Clone)]
pub struct PageResolver {
	registry: Arc<ComponentRegistry>,
	default_layout: Layout,
}

impl PageResolver {
	pub fn new(registry: Arc<ComponentRegistry>, default_layout: Layout) -> Self {
		Self {
			registry,
			default_layout,
		}
	}

	/// Looks up `name` and attaches the default layout if none is declared.
	///
	/// # Errors
	///
	/// Returns [`PageError::NotFound`] when no component is registered.
	pub fn resolve(&self, name: &PageName) -> Result<ComponentDefinition> {
		match self.registry.get(name) {
			Some(definition) => Ok(definition.with_default_layout(&self.default_layout)),
			None => {
				tracing::warn!(page = %name, "page component not found");
				Err(PageError::NotFound(name.clone()))
			}
		}
	}

	/// Normalizes a raw name before resolving it.
	pub fn resolve_str(&self, name: &str) -> Result<ComponentDefinition> {
		self.resolve(&PageName::new(name)?)
	}

	/// Checks that every referenced page has a component.
	///
	/// # Errors
	///
	/// Returns [`PageError::Incomplete`] listing every missing page.
	pub fn ensure_complete<'a>(&self, names: impl IntoIterator<Item = &'a PageName>) -> Result<()> {
		let mut missing: Vec<PageName> = names
			.into_iter()
			.filter(|name| !self.registry.contains(name))
			.cloned()
			.collect();
		if missing.is_empty() {
			return Ok(());
		}
		missing.sort();
		missing.dedup();
		Err(PageError::Incomplete(missing))
	}

	pub fn default_layout(&self) -> &Layout {
		&self.default_layout
	}

	pub fn registry(&self) -> &ComponentRegistry {
		&self.registry
	}
}
