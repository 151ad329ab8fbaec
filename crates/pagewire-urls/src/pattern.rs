//! Path pattern matching for URL routing.

use std::collections::HashMap;
use std::fmt;

use crate::RegistryError;

/// Maximum allowed length for a URL pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a URL pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A compiled path pattern.
///
/// Supports:
/// - `/about` - Exact match
/// - `/users/{id}` - Single segment parameter
/// - `/static/{path:*}` - Wildcard matching the rest of the path
///
/// A `{name:*}` wildcard matches any character including `/`. Callers that
/// use the captured value for file access must reject `..` segments
/// themselves.
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::InvalidPattern`] if the pattern does not start
	/// with `/`, exceeds the length or segment limits, has an unterminated or
	/// malformed parameter, or repeats a parameter name.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_urls::PathPattern;
	///
	/// let pattern = PathPattern::new("/users/{id}").unwrap();
	/// let params = pattern.matches("/users/42").unwrap();
	///
	/// assert_eq!(params.get("id").map(String::as_str), Some("42"));
	/// assert!(pattern.matches("/users/42/posts").is_none());
	/// ```
	pub fn new(pattern: &str) -> Result<Self, RegistryError> {
		let invalid = |message: String| RegistryError::InvalidPattern {
			pattern: pattern.to_string(),
			message,
		};

		if !pattern.starts_with('/') {
			return Err(invalid("pattern must start with '/'".to_string()));
		}
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(invalid(format!(
				"length {} exceeds maximum of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			)));
		}
		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(invalid(format!(
				"{} path segments exceed maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			)));
		}

		// Request paths lose their trailing slash before matching.
		let normalized = match pattern.trim_end_matches('/') {
			"" => "/",
			trimmed => trimmed,
		};
		let (regex_str, param_names) = Self::compile(normalized).map_err(invalid)?;
		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| invalid(e.to_string()))?;

		Ok(Self {
			pattern: normalized.to_string(),
			regex,
			param_names,
		})
	}

	/// Translates the pattern into an anchored regex and collects parameter names.
	fn compile(pattern: &str) -> Result<(String, Vec<String>), String> {
		let mut regex_str = String::from("^");
		let mut param_names: Vec<String> = Vec::new();
		let mut rest = pattern;

		while let Some(open) = rest.find('{') {
			regex_str.push_str(&regex::escape(&rest[..open]));
			let close = rest[open..]
				.find('}')
				.map(|offset| open + offset)
				.ok_or_else(|| "unterminated '{' in pattern".to_string())?;
			let placeholder = &rest[open + 1..close];
			let (name, wildcard) = match placeholder.strip_suffix(":*") {
				Some(name) => (name, true),
				None => (placeholder, false),
			};

			if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
				return Err(format!("invalid parameter name '{}'", name));
			}
			if param_names.iter().any(|existing| existing == name) {
				return Err(format!("parameter '{}' appears more than once", name));
			}

			if wildcard {
				regex_str.push_str(&format!("(?P<{}>.*)", name));
			} else {
				regex_str.push_str(&format!("(?P<{}>[^/]+)", name));
			}
			param_names.push(name.to_string());
			rest = &rest[close + 1..];
		}

		if rest.contains('}') {
			return Err("unmatched '}' in pattern".to_string());
		}
		regex_str.push_str(&regex::escape(rest));
		regex_str.push('$');
		Ok((regex_str, param_names))
	}

	/// Returns the pattern string, without a trailing slash.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// The pattern with parameter names erased.
	///
	/// Two patterns with the same shape match exactly the same paths.
	///
	/// ```
	/// use pagewire_urls::PathPattern;
	///
	/// let by_id = PathPattern::new("/u/{id}").unwrap();
	/// let by_name = PathPattern::new("/u/{name}/").unwrap();
	///
	/// assert_eq!(by_id.shape(), "/u/{}");
	/// assert_eq!(by_id.shape(), by_name.shape());
	/// ```
	pub fn shape(&self) -> String {
		self.param_names
			.iter()
			.fold(self.pattern.clone(), |shape, name| {
				shape
					.replace(&format!("{{{}:*}}", name), "{*}")
					.replace(&format!("{{{}}}", name), "{}")
			})
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns the captured parameters if `path` matches.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		self.regex.captures(path).map(|caps| {
			self.param_names
				.iter()
				.filter_map(|name| caps.name(name).map(|m| (name.clone(), m.as_str().to_string())))
				.collect()
		})
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Whether the pattern has no parameters.
	pub fn is_exact(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Builds a path from this pattern, or returns the first missing parameter.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, String> {
		let mut result = self.pattern.clone();

		for name in &self.param_names {
			let value = params.get(name).ok_or_else(|| name.clone())?;
			let placeholder = format!("{{{}}}", name);
			let wildcard_placeholder = format!("{{{}:*}}", name);

			if result.contains(&placeholder) {
				result = result.replace(&placeholder, value);
			} else {
				result = result.replace(&wildcard_placeholder, value);
			}
		}

		Ok(result)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_exact_pattern() {
		let pattern = PathPattern::new("/about").unwrap();

		assert!(pattern.is_exact());
		assert!(pattern.is_match("/about"));
		assert!(!pattern.is_match("/about/team"));
		assert!(!pattern.is_match("/aboutx"));
	}

	#[rstest]
	fn test_multiple_params() {
		let pattern = PathPattern::new("/users/{user_id}/posts/{post_id}").unwrap();

		let params = pattern.matches("/users/42/posts/123").unwrap();

		assert_eq!(params.get("user_id"), Some(&"42".to_string()));
		assert_eq!(params.get("post_id"), Some(&"123".to_string()));
		assert_eq!(pattern.param_names(), &["user_id", "post_id"]);
	}

	#[rstest]
	fn test_wildcard_param() {
		let pattern = PathPattern::new("/static/{path:*}").unwrap();

		let params = pattern.matches("/static/css/app.css").unwrap();

		assert_eq!(params.get("path"), Some(&"css/app.css".to_string()));
	}

	#[rstest]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0").unwrap();

		assert!(pattern.is_match("/api/v1.0"));
		assert!(!pattern.is_match("/api/v1X0"));
	}

	#[rstest]
	fn test_reverse() {
		let pattern = PathPattern::new("/users/{id}/files/{path:*}").unwrap();
		let params = HashMap::from([
			("id".to_string(), "7".to_string()),
			("path".to_string(), "a/b.txt".to_string()),
		]);

		assert_eq!(pattern.reverse(&params).unwrap(), "/users/7/files/a/b.txt");
		assert_eq!(pattern.reverse(&HashMap::new()).unwrap_err(), "id");
	}

	#[rstest]
	#[case("/team/", "/team")]
	#[case("/team//", "/team")]
	#[case("/users/{id}/", "/users/{id}")]
	#[case("/", "/")]
	fn test_trailing_slash_is_normalized(#[case] raw: &str, #[case] expected: &str) {
		let pattern = PathPattern::new(raw).unwrap();

		assert_eq!(pattern.pattern(), expected);
		assert!(pattern.is_match(expected.replace("{id}", "7").as_str()));
	}

	#[rstest]
	#[case("/u/{id}", "/u/{}")]
	#[case("/files/{path:*}", "/files/{*}")]
	#[case("/users/{user_id}/posts/{id}", "/users/{}/posts/{}")]
	#[case("/about", "/about")]
	fn test_shape_erases_parameter_names(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(PathPattern::new(raw).unwrap().shape(), expected);
	}

	#[rstest]
	#[case("about")]
	#[case("/users/{id")]
	#[case("/users/id}")]
	#[case("/users/{}")]
	#[case("/users/{a-b}")]
	#[case("/users/{id}/{id}")]
	fn test_invalid_patterns(#[case] pattern: &str) {
		assert!(matches!(
			PathPattern::new(pattern),
			Err(RegistryError::InvalidPattern { .. })
		));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_length() {
		let long_pattern = "/".to_string() + &"a".repeat(1025);

		let result = PathPattern::new(&long_pattern);

		assert!(matches!(result, Err(RegistryError::InvalidPattern { message, .. }) if message.contains("exceeds maximum")));
	}

	#[rstest]
	fn test_pattern_rejects_excessive_segments() {
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}", segments.join("/"));

		let result = PathPattern::new(&pattern);

		assert!(matches!(result, Err(RegistryError::InvalidPattern { message, .. }) if message.contains("exceed maximum")));
	}
}
