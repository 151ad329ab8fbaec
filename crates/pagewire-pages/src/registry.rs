//! The flat page name → component mapping built once at boot.
//!
//! Components are registered either explicitly through
//! [`ComponentRegistry::builder`] or by walking a page directory with
//! [`ComponentRegistry::discover`]. The registry is read-only afterwards and
//! is meant to be shared behind an `Arc`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{ComponentDefinition, Layout, PageError, PageName, Result};

/// Default extension of page component files.
pub const DEFAULT_EXTENSION: &str = "vue";

/// Immutable mapping from page name to component definition.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
	components: HashMap<PageName, ComponentDefinition>,
}

impl ComponentRegistry {
	pub fn builder() -> ComponentRegistryBuilder {
		ComponentRegistryBuilder::default()
	}

	/// Registers every component file found under `root`.
	///
	/// Each file with the given extension becomes a page named after its path
	/// relative to `root`, so `root/Auth/Login.vue` registers `Auth/Login`.
	/// A component declares its own layout with a leading
	/// `<!-- layout: Name -->` comment.
	///
	/// # Errors
	///
	/// Returns [`PageError::Discovery`] if the directory cannot be walked and
	/// [`PageError::Duplicate`] if two files normalize to the same name.
	pub fn discover(root: impl AsRef<Path>, extension: &str) -> Result<Self> {
		let root = root.as_ref();
		let mut builder = Self::builder();

		for entry in WalkDir::new(root).sort_by_file_name() {
			let entry = entry.map_err(|e| PageError::Discovery {
				root: root.to_path_buf(),
				message: e.to_string(),
			})?;
			if !entry.file_type().is_file()
				|| entry.path().extension().and_then(|e| e.to_str()) != Some(extension)
			{
				continue;
			}

			let relative = entry
				.path()
				.strip_prefix(root)
				.map_err(|e| PageError::Discovery {
					root: root.to_path_buf(),
					message: e.to_string(),
				})?;
			let name = PageName::from_module_path(relative)?;
			let mut definition = ComponentDefinition::new(name, entry.path());
			if let Some(layout) = declared_layout(entry.path())? {
				definition = definition.with_layout(layout);
			}
			tracing::debug!(page = %definition.name, path = %entry.path().display(), "discovered page component");
			builder = builder.component(definition);
		}

		builder.build()
	}

	pub fn get(&self, name: &PageName) -> Option<&ComponentDefinition> {
		self.components.get(name)
	}

	pub fn contains(&self, name: &PageName) -> bool {
		self.components.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.components.len()
	}

	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}

	/// Registered page names in lexical order.
	pub fn names(&self) -> Vec<&PageName> {
		let mut names: Vec<_> = self.components.keys().collect();
		names.sort();
		names
	}
}

/// Reads the `<!-- layout: Name -->` marker from the first non-blank line.
fn declared_layout(path: &Path) -> Result<Option<Layout>> {
	let io_err = |e: std::io::Error| PageError::Discovery {
		root: path.to_path_buf(),
		message: e.to_string(),
	};
	let reader = BufReader::new(File::open(path).map_err(io_err)?);

	for line in reader.lines() {
		let line = line.map_err(io_err)?;
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		let layout = line
			.strip_prefix("<!--")
			.and_then(|rest| rest.strip_suffix("-->"))
			.map(str::trim)
			.and_then(|body| body.strip_prefix("layout:"))
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.map(Layout::new);
		return Ok(layout);
	}

	Ok(None)
}

enum Pending {
	Raw {
		name: String,
		source: PathBuf,
		layout: Option<Layout>,
	},
	Definition(ComponentDefinition),
}

/// Builder for [`ComponentRegistry`]
#[derive(Default)]
pub struct ComponentRegistryBuilder {
	pending: Vec<Pending>,
}

impl ComponentRegistryBuilder {
	/// Registers a component under `name`, backed by `source`.
	pub fn register(mut self, name: impl Into<String>, source: impl AsRef<Path>) -> Self {
		self.pending.push(Pending::Raw {
			name: name.into(),
			source: source.as_ref().to_path_buf(),
			layout: None,
		});
		self
	}

	/// Registers a component that declares its own layout.
	pub fn register_with_layout(
		mut self,
		name: impl Into<String>,
		source: impl AsRef<Path>,
		layout: Layout,
	) -> Self {
		self.pending.push(Pending::Raw {
			name: name.into(),
			source: source.as_ref().to_path_buf(),
			layout: Some(layout),
		});
		self
	}

	pub fn component(mut self, definition: ComponentDefinition) -> Self {
		self.pending.push(Pending::Definition(definition));
		self
	}

	/// Normalizes all names and freezes the registry.
	///
	/// # Errors
	///
	/// Returns the first invalid name, or [`PageError::Duplicate`] when two
	/// registrations normalize to the same page name.
	pub fn build(self) -> Result<ComponentRegistry> {
		let mut components: HashMap<PageName, ComponentDefinition> = HashMap::new();

		for pending in self.pending {
			let definition = match pending {
				Pending::Raw {
					name,
					source,
					layout,
				} => ComponentDefinition {
					name: PageName::new(name)?,
					source_path: source,
					layout,
				},
				Pending::Definition(definition) => definition,
			};

			if let Some(existing) = components.get(&definition.name) {
				return Err(PageError::Duplicate {
					name: definition.name.clone(),
					first: existing.source_path.clone(),
					second: definition.source_path,
				});
			}
			components.insert(definition.name.clone(), definition);
		}

		Ok(ComponentRegistry { components })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_builder_normalizes_names() {
		let registry = ComponentRegistry::builder()
			.register("/Auth\\Login/", "Auth/Login.vue")
			.build()
			.unwrap();

		assert!(registry.contains(&PageName::new("Auth/Login").unwrap()));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_builder_rejects_duplicates_after_normalization() {
		let result = ComponentRegistry::builder()
			.register("Home", "a/Home.vue")
			.register("/Home", "b/Home.vue")
			.build();

		assert!(matches!(result, Err(PageError::Duplicate { .. })));
	}

	#[rstest]
	fn test_names_are_sorted() {
		let registry = ComponentRegistry::builder()
			.register("Home", "Home.vue")
			.register("About", "About.vue")
			.register("Auth/Login", "Auth/Login.vue")
			.build()
			.unwrap();

		let names: Vec<&str> = registry.names().into_iter().map(PageName::as_str).collect();

		assert_eq!(names, vec!["About", "Auth/Login", "Home"]);
	}
}
