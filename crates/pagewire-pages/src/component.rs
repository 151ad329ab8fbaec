//! Component definitions as seen by the client registry.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::PageName;

/// A layout component that wraps pages.
///
/// Two pages with equal layouts share one layout instance across a client
/// navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout(String);

impl Layout {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn name(&self) -> &str {
		&self.0
	}
}

/// A registered page component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
	pub name: PageName,
	/// Source file backing the component.
	pub source_path: PathBuf,
	/// Layout declared by the component itself, if any.
	pub layout: Option<Layout>,
}

impl ComponentDefinition {
	pub fn new(name: PageName, source_path: impl AsRef<Path>) -> Self {
		Self {
			name,
			source_path: source_path.as_ref().to_path_buf(),
			layout: None,
		}
	}

	/// Declares the component's own layout.
	pub fn with_layout(mut self, layout: Layout) -> Self {
		self.layout = Some(layout);
		self
	}

	/// Returns a copy with `default` attached when no layout is declared.
	///
	/// Applying this twice yields the same result as applying it once, and a
	/// declared layout is never replaced.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_pages::{ComponentDefinition, Layout, PageName};
	///
	/// let plain = ComponentDefinition::new(PageName::new("Home").unwrap(), "Home.vue");
	/// let decorated = plain.with_default_layout(&Layout::new("Layout"));
	/// assert_eq!(decorated.layout, Some(Layout::new("Layout")));
	///
	/// let custom = plain.with_layout(Layout::new("Bare"));
	/// let kept = custom.with_default_layout(&Layout::new("Layout"));
	/// assert_eq!(kept.layout, Some(Layout::new("Bare")));
	/// ```
	pub fn with_default_layout(&self, default: &Layout) -> Self {
		let mut decorated = self.clone();
		if decorated.layout.is_none() {
			decorated.layout = Some(default.clone());
		}
		decorated
	}
}
