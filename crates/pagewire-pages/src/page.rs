use serde::{Deserialize, Serialize};

use crate::{PageName, Props};

/// The per-navigation payload sent from the server to the client.
///
/// `component` is an opaque lookup key into the client's component registry,
/// and `props` is the whole initial render state for that component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageObject {
	pub component: PageName,
	pub props: Props,
	pub url: String,
	pub version: String,
}

impl PageObject {
	pub fn new(
		component: PageName,
		props: Props,
		url: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self {
			component,
			props,
			url: url.into(),
			version: version.into(),
		}
	}

	/// The `title` prop, if the page supplies one as a string.
	pub fn title(&self) -> Option<&str> {
		self.props.get("title").and_then(|v| v.as_str())
	}

	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_wire_shape() {
		let page = PageObject::new(
			PageName::new("About").unwrap(),
			Props::new().with("user", "Tameem"),
			"/about",
			"v1",
		);

		let value: serde_json::Value = serde_json::from_str(&page.to_json().unwrap()).unwrap();

		assert_eq!(
			value,
			json!({
				"component": "About",
				"props": {"user": "Tameem"},
				"url": "/about",
				"version": "v1",
			})
		);
	}

	#[rstest]
	fn test_title_prop() {
		let page = PageObject::new(
			PageName::new("Home").unwrap(),
			Props::new().with("title", "Welcome"),
			"/",
			"",
		);

		assert_eq!(page.title(), Some("Welcome"));
	}
}
