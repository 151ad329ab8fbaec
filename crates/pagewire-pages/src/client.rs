//! Client bootstrap: mounts the first page and swaps pages on later visits.
//!
//! This models the browser side of the protocol so the server/client contract
//! can be exercised end to end without a browser.

use std::sync::Arc;

use crate::shell::extract_page_json;
use crate::{ComponentDefinition, PageError, PageObject, PageResolver, Props, Result};

/// The page currently mounted by a [`PageApp`].
#[derive(Debug, Clone, PartialEq)]
pub struct MountedPage {
	pub component: ComponentDefinition,
	pub props: Props,
	pub url: String,
	pub version: String,
}

/// Outcome of handing a new page object to the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
	/// The component and props were swapped in place.
	Swapped {
		/// The layout instance was kept because old and new layouts match.
		layout_preserved: bool,
	},
	/// The asset version changed; the browser must reload `url`.
	Reload { url: String },
}

/// A single-page application instance.
///
/// # Examples
///
/// ```
/// use pagewire_pages::{
///     ComponentRegistry, Layout, PageApp, PageName, PageObject, PageResolver, Props, Visit,
/// };
/// use std::sync::Arc;
///
/// let registry = ComponentRegistry::builder()
///     .register("Home", "Home.vue")
///     .register("About", "About.vue")
///     .build()
///     .unwrap();
/// let resolver = Arc::new(PageResolver::new(Arc::new(registry), Layout::new("Layout")));
///
/// let home = PageObject::new(PageName::new("Home").unwrap(), Props::new(), "/", "1");
/// let mut app = PageApp::boot(resolver, home).unwrap();
///
/// let about = PageObject::new(
///     PageName::new("About").unwrap(),
///     Props::new().with("user", "Tameem"),
///     "/about",
///     "1",
/// );
/// assert_eq!(app.visit(about).unwrap(), Visit::Swapped { layout_preserved: true });
/// assert_eq!(app.current().url, "/about");
/// ```
#[derive(Debug)]
pub struct PageApp {
	resolver: Arc<PageResolver>,
	current: MountedPage,
	history: Vec<String>,
}

impl PageApp {
	/// Mounts the initial page object.
	///
	/// # Errors
	///
	/// Returns [`PageError::NotFound`] if the component is not registered.
	pub fn boot(resolver: Arc<PageResolver>, initial: PageObject) -> Result<Self> {
		let current = mount(&resolver, initial)?;
		Ok(Self {
			resolver,
			history: vec![current.url.clone()],
			current,
		})
	}

	/// Mounts the page object embedded in a rendered root document.
	///
	/// # Errors
	///
	/// Fails if the document carries no `data-page` attribute, the JSON is
	/// malformed, or the component is not registered.
	pub fn boot_from_html(resolver: Arc<PageResolver>, html: &str) -> Result<Self> {
		let json = extract_page_json(html).ok_or_else(|| {
			PageError::Serialization(serde::de::Error::custom("document has no data-page attribute"))
		})?;
		Self::boot(resolver, PageObject::from_json(&json)?)
	}

	/// Applies the page object returned by a page visit.
	///
	/// # Errors
	///
	/// Returns [`PageError::NotFound`] if the new component is not registered;
	/// the current page stays mounted in that case.
	pub fn visit(&mut self, next: PageObject) -> Result<Visit> {
		if next.version != self.current.version {
			return Ok(Visit::Reload { url: next.url });
		}

		let mounted = mount(&self.resolver, next)?;
		let layout_preserved = mounted.component.layout == self.current.component.layout;
		self.history.push(mounted.url.clone());
		self.current = mounted;
		Ok(Visit::Swapped { layout_preserved })
	}

	pub fn current(&self) -> &MountedPage {
		&self.current
	}

	/// URLs visited so far, oldest first.
	pub fn history(&self) -> &[String] {
		&self.history
	}
}

fn mount(resolver: &PageResolver, page: PageObject) -> Result<MountedPage> {
	let component = resolver.resolve(&page.component)?;
	Ok(MountedPage {
		component,
		props: page.props,
		url: page.url,
		version: page.version,
	})
}
