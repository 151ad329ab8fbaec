//! Property bags passed from a route to the page component.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Prop key under which flashed validation errors are merged.
pub const ERRORS_KEY: &str = "errors";

/// Ordered mapping of prop names to JSON values.
///
/// Insertion order is preserved on the wire.
///
/// # Examples
///
/// ```
/// use pagewire_pages::Props;
/// use serde_json::json;
///
/// let props = Props::new().with("user", "Tameem").with("count", 3);
///
/// assert_eq!(props.get("user"), Some(&json!("Tameem")));
/// assert_eq!(serde_json::to_string(&props).unwrap(), r#"{"user":"Tameem","count":3}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(Map<String, Value>);

impl Props {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a prop, replacing any previous value under the same key.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.insert(key, value);
		self
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
		self.0.insert(key.into(), value.into());
	}

	/// Serializes any value into a prop.
	///
	/// # Errors
	///
	/// Returns the serializer error if `value` cannot be represented as JSON.
	pub fn insert_serialized<T: Serialize>(
		&mut self,
		key: impl Into<String>,
		value: &T,
	) -> Result<(), serde_json::Error> {
		self.0.insert(key.into(), serde_json::to_value(value)?);
		Ok(())
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Keeps only the listed props (partial reload, `only`).
	pub fn retain_only<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
		let keep: Vec<&str> = keys.into_iter().collect();
		self.0.retain(|key, _| keep.contains(&key.as_str()));
	}

	/// Drops the listed props (partial reload, `except`).
	pub fn remove_all<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
		for key in keys {
			self.0.remove(key);
		}
	}

	/// Copies every prop from `other`, overwriting on conflict.
	pub fn merge(&mut self, other: Props) {
		self.0.extend(other.0);
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.0
	}
}

impl From<Map<String, Value>> for Props {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}

/// Field-level validation messages flashed by a rejected form submission.
///
/// Attached to request extensions for the next render, where the responder
/// merges them into props under `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(std::collections::BTreeMap<String, String>);

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an error for `field`; the first message per field wins.
	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.0.entry(field.into()).or_insert_with(|| message.into());
	}

	pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
		self.add(field, message);
		self
	}

	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// The errors as a JSON object keyed by field.
	pub fn to_value(&self) -> Value {
		Value::Object(
			self.0
				.iter()
				.map(|(k, v)| (k.clone(), Value::String(v.clone())))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_empty_props_serialize_to_empty_object() {
		assert_eq!(serde_json::to_string(&Props::new()).unwrap(), "{}");
	}

	#[rstest]
	fn test_insertion_order_is_preserved() {
		let props = Props::new().with("zeta", 1).with("alpha", 2).with("mid", 3);

		assert_eq!(props.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
	}

	#[rstest]
	fn test_retain_only_and_remove_all() {
		let mut props = Props::new().with("a", 1).with("b", 2).with("c", 3);

		props.retain_only(["a", "c"]);
		assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "c"]);

		props.remove_all(["a"]);
		assert_eq!(props, Props::new().with("c", 3));
	}

	#[rstest]
	fn test_validation_errors_keep_first_message() {
		let errors = ValidationErrors::new()
			.with("email", "The email field is required.")
			.with("email", "ignored");

		assert_eq!(errors.get("email"), Some("The email field is required."));
		assert_eq!(
			errors.to_value(),
			json!({"email": "The email field is required."})
		);
	}
}
