//! The HTML document served on a first (non page-visit) load.

use crate::{PageObject, Result};

/// Id of the element the client mounts into.
pub const ROOT_ELEMENT_ID: &str = "app";

/// Renders the root document that boots the client.
///
/// The page object is embedded as HTML-escaped JSON in the `data-page`
/// attribute of the root element. The document title is
/// `"{app_name} {title}"`, where `title` is the page's `title` prop.
#[derive(Debug, Clone)]
pub struct HtmlShell {
	app_name: String,
	entry_script: String,
}

impl HtmlShell {
	pub fn new(app_name: impl Into<String>) -> Self {
		Self {
			app_name: app_name.into(),
			entry_script: "/build/app.js".to_string(),
		}
	}

	/// Sets the client bundle URL.
	pub fn with_entry_script(mut self, src: impl Into<String>) -> Self {
		self.entry_script = src.into();
		self
	}

	/// Applies the title template to a page title.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_pages::HtmlShell;
	///
	/// let shell = HtmlShell::new("My App");
	/// assert_eq!(shell.title("Login"), "My App Login");
	/// assert_eq!(shell.title(""), "My App");
	/// ```
	pub fn title(&self, title: &str) -> String {
		format!("{} {}", self.app_name, title).trim_end().to_string()
	}

	/// Renders the full HTML document for `page`.
	pub fn render(&self, page: &PageObject) -> Result<String> {
		let json = page.to_json()?;
		let title = self.title(page.title().unwrap_or_default());

		Ok(format!(
			concat!(
				"<!DOCTYPE html>\n",
				"<html lang=\"en\">\n",
				"<head>\n",
				"<meta charset=\"utf-8\">\n",
				"<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
				"<title>{title}</title>\n",
				"<script type=\"module\" src=\"{script}\" defer></script>\n",
				"</head>\n",
				"<body>\n",
				"<div id=\"{id}\" data-page=\"{page}\"></div>\n",
				"</body>\n",
				"</html>"
			),
			title = html_escape(&title),
			script = html_escape(&self.entry_script),
			id = ROOT_ELEMENT_ID,
			page = html_escape(&json),
		))
	}
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

/// Reverses [`html_escape`].
pub fn html_unescape(s: &str) -> String {
	s.replace("&quot;", "\"")
		.replace("&#x27;", "'")
		.replace("&lt;", "<")
		.replace("&gt;", ">")
		.replace("&amp;", "&")
}

/// Extracts the page object JSON from a rendered root document.
pub fn extract_page_json(html: &str) -> Option<String> {
	let marker = "data-page=\"";
	let start = html.find(marker)? + marker.len();
	let end = html[start..].find('"')?;
	Some(html_unescape(&html[start..start + end]))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{PageName, Props};
	use rstest::rstest;

	fn page(props: Props) -> PageObject {
		PageObject::new(PageName::new("About").unwrap(), props, "/about", "1")
	}

	#[rstest]
	fn test_render_embeds_escaped_page() {
		let shell = HtmlShell::new("My App");
		let page = page(Props::new().with("user", "<Tameem & co>"));

		let html = shell.render(&page).unwrap();

		assert!(html.contains("<div id=\"app\" data-page=\"{&quot;component&quot;"));
		assert!(!html.contains("<Tameem"));
		assert_eq!(
			PageObject::from_json(&extract_page_json(&html).unwrap()).unwrap(),
			page
		);
	}

	#[rstest]
	#[case(Props::new(), "<title>My App</title>")]
	#[case(Props::new().with("title", "About"), "<title>My App About</title>")]
	fn test_title_template(#[case] props: Props, #[case] expected: &str) {
		let html = HtmlShell::new("My App").render(&page(props)).unwrap();

		assert!(html.contains(expected));
	}

	#[rstest]
	fn test_entry_script_is_configurable() {
		let shell = HtmlShell::new("My App").with_entry_script("/assets/main.js");

		let html = shell.render(&page(Props::new())).unwrap();

		assert!(html.contains("src=\"/assets/main.js\""));
	}
}
