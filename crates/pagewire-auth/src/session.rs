//! Server-side sessions.
//!
//! Session data lives in an in-memory [`SessionStore`] keyed by an opaque id
//! carried in a cookie. During a request, handlers work on a
//! [`SessionHandle`] found in the request extensions; the session middleware
//! commits it back to the store once the response is produced.

use chrono::{DateTime, TimeDelta, Utc};
use pagewire_pages::ValidationErrors;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Session key holding the authenticated user's id.
pub const USER_ID_KEY: &str = "_auth_user_id";

/// Session key holding data for the next request only.
const FLASH_ERRORS_KEY: &str = "_flash.errors";

/// Session data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
	pub id: String,
	pub data: HashMap<String, serde_json::Value>,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl SessionData {
	/// Creates an empty session with a fresh random id.
	pub fn new(ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			id: new_session_id(),
			data: HashMap::new(),
			created_at: now,
			expires_at: expiry(now, ttl),
		}
	}

	pub fn is_valid(&self) -> bool {
		Utc::now() < self.expires_at
	}

	/// Extends the expiry by `ttl` from now.
	pub fn touch(&mut self, ttl: Duration) {
		self.expires_at = expiry(Utc::now(), ttl);
	}

	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		self.data
			.get(key)
			.and_then(|v| serde_json::from_value(v.clone()).ok())
	}

	pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<(), serde_json::Error> {
		self.data.insert(key.into(), serde_json::to_value(value)?);
		Ok(())
	}

	pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
		self.data.remove(key)
	}
}

fn new_session_id() -> String {
	Uuid::new_v4().simple().to_string()
}

fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
	TimeDelta::from_std(ttl)
		.ok()
		.and_then(|delta| now.checked_add_signed(delta))
		.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Session store with lazy eviction of expired sessions
#[derive(Debug)]
pub struct SessionStore {
	sessions: RwLock<HashMap<String, SessionData>>,
	cleanup_threshold: usize,
}

impl SessionStore {
	/// Default cleanup threshold: evict expired sessions past 10,000 entries
	const DEFAULT_CLEANUP_THRESHOLD: usize = 10_000;

	pub fn new() -> Self {
		Self::with_cleanup_threshold(Self::DEFAULT_CLEANUP_THRESHOLD)
	}

	/// Creates a store that sweeps expired sessions once it holds more than
	/// `threshold` entries.
	pub fn with_cleanup_threshold(threshold: usize) -> Self {
		Self {
			sessions: RwLock::new(HashMap::new()),
			cleanup_threshold: threshold,
		}
	}

	/// Returns a live session; an expired one is removed instead.
	pub fn get(&self, id: &str) -> Option<SessionData> {
		let session = self.sessions.read().get(id).cloned()?;
		if session.is_valid() {
			Some(session)
		} else {
			self.delete(id);
			None
		}
	}

	pub fn save(&self, session: SessionData) {
		let mut sessions = self.sessions.write();
		sessions.insert(session.id.clone(), session);
		if sessions.len() > self.cleanup_threshold {
			sessions.retain(|_, s| s.is_valid());
		}
	}

	pub fn delete(&self, id: &str) {
		self.sessions.write().remove(id);
	}

	/// Removes every expired session.
	pub fn cleanup(&self) {
		self.sessions.write().retain(|_, session| session.is_valid());
	}

	pub fn len(&self) -> usize {
		self.sessions.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.read().is_empty()
	}
}

impl Default for SessionStore {
	fn default() -> Self {
		Self::new()
	}
}

/// Session cookie configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
	pub cookie_name: String,
	pub ttl: Duration,
	/// HTTPS-only cookie
	pub secure: bool,
	pub http_only: bool,
	pub same_site: String,
	pub path: String,
}

impl SessionConfig {
	pub fn new(cookie_name: impl Into<String>, ttl: Duration) -> Self {
		Self {
			cookie_name: cookie_name.into(),
			ttl,
			..Self::default()
		}
	}

	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.ttl = ttl;
		self
	}

	/// `Set-Cookie` value binding the browser to `session_id`.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_auth::SessionConfig;
	///
	/// let cookie = SessionConfig::default().set_cookie("abc");
	/// assert_eq!(
	///     cookie,
	///     "pagewire_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=7200"
	/// );
	/// ```
	pub fn set_cookie(&self, session_id: &str) -> String {
		self.cookie(session_id, self.ttl.as_secs())
	}

	/// `Set-Cookie` value that makes the browser drop the session cookie.
	pub fn removal_cookie(&self) -> String {
		self.cookie("", 0)
	}

	fn cookie(&self, value: &str, max_age: u64) -> String {
		let mut parts = vec![
			format!("{}={}", self.cookie_name, value),
			format!("Path={}", self.path),
		];
		if self.http_only {
			parts.push("HttpOnly".to_string());
		}
		if self.secure {
			parts.push("Secure".to_string());
		}
		parts.push(format!("SameSite={}", self.same_site));
		parts.push(format!("Max-Age={}", max_age));
		parts.join("; ")
	}
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			cookie_name: "pagewire_session".to_string(),
			ttl: Duration::from_secs(2 * 60 * 60),
			secure: false,
			http_only: true,
			same_site: "Lax".to_string(),
			path: "/".to_string(),
		}
	}
}

#[derive(Debug)]
struct SessionState {
	data: SessionData,
	/// Previous id to discard when the id was rotated.
	rotated_from: Option<String>,
}

/// The current request's session, shared through request extensions.
///
/// Clones refer to the same session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
	state: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
	pub fn new(data: SessionData) -> Self {
		Self {
			state: Arc::new(Mutex::new(SessionState {
				data,
				rotated_from: None,
			})),
		}
	}

	/// Reads the handle attached by the session middleware.
	pub fn from_request(request: &pagewire_http::Request) -> Option<Self> {
		request.extensions.get::<SessionHandle>()
	}

	pub fn id(&self) -> String {
		self.state.lock().data.id.clone()
	}

	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		self.state.lock().data.get(key)
	}

	pub fn set<T: Serialize>(&self, key: impl Into<String>, value: T) -> Result<(), serde_json::Error> {
		self.state.lock().data.set(key, value)
	}

	pub fn remove(&self, key: &str) {
		self.state.lock().data.remove(key);
	}

	/// Id of the logged-in user, if any.
	pub fn user_id(&self) -> Option<Uuid> {
		self.get::<Uuid>(USER_ID_KEY)
	}

	/// Binds the session to `user_id` and rotates the session id.
	pub fn login(&self, user_id: Uuid) {
		let mut state = self.state.lock();
		state.data.data.insert(
			USER_ID_KEY.to_string(),
			serde_json::Value::String(user_id.to_string()),
		);
		rotate(&mut state);
	}

	/// Drops all session data and rotates the session id.
	pub fn invalidate(&self) {
		let mut state = self.state.lock();
		state.data.data.clear();
		rotate(&mut state);
	}

	/// Stores validation errors for the next request only.
	pub fn flash_errors(&self, errors: &ValidationErrors) {
		let mut state = self.state.lock();
		state
			.data
			.data
			.insert(FLASH_ERRORS_KEY.to_string(), errors.to_value());
	}

	/// Removes and returns flashed validation errors.
	pub fn take_flashed_errors(&self) -> Option<ValidationErrors> {
		let value = self.state.lock().data.remove(FLASH_ERRORS_KEY)?;
		serde_json::from_value(value).ok()
	}

	/// Writes the session back to `store` and returns the `Set-Cookie` value.
	///
	/// A rotated session is saved under its new id and the old id is deleted.
	pub fn commit(&self, store: &SessionStore, config: &SessionConfig) -> String {
		let mut state = self.state.lock();
		if let Some(old_id) = state.rotated_from.take() {
			store.delete(&old_id);
		}
		state.data.touch(config.ttl);
		store.save(state.data.clone());
		config.set_cookie(&state.data.id)
	}
}

fn rotate(state: &mut SessionState) {
	let new_id = new_session_id();
	let old_id = std::mem::replace(&mut state.data.id, new_id);
	// Keep the id the store knows about, not an intermediate rotated one.
	if state.rotated_from.is_none() {
		state.rotated_from = Some(old_id);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_expired_session_is_evicted_on_get() {
		let store = SessionStore::new();
		let mut session = SessionData::new(Duration::from_secs(60));
		session.expires_at = Utc::now() - TimeDelta::seconds(1);
		let id = session.id.clone();
		store.save(session);

		assert!(store.get(&id).is_none());
		assert!(store.is_empty());
	}

	#[rstest]
	fn test_cleanup_threshold_sweeps_expired_sessions() {
		let store = SessionStore::with_cleanup_threshold(1);
		let mut expired = SessionData::new(Duration::from_secs(60));
		expired.expires_at = Utc::now() - TimeDelta::seconds(1);
		store.save(expired);

		store.save(SessionData::new(Duration::from_secs(60)));

		assert_eq!(store.len(), 1);
	}

	#[rstest]
	fn test_login_rotates_id_and_commit_discards_old_id() {
		let store = SessionStore::new();
		let config = SessionConfig::default();
		let data = SessionData::new(config.ttl);
		let old_id = data.id.clone();
		store.save(data.clone());
		let handle = SessionHandle::new(data);
		let user_id = Uuid::new_v4();

		handle.login(user_id);
		let cookie = handle.commit(&store, &config);

		let new_id = handle.id();
		assert_ne!(new_id, old_id);
		assert!(store.get(&old_id).is_none());
		assert_eq!(store.get(&new_id).unwrap().get::<Uuid>(USER_ID_KEY), Some(user_id));
		assert!(cookie.starts_with(&format!("pagewire_session={new_id};")));
	}

	#[rstest]
	fn test_invalidate_clears_user() {
		let handle = SessionHandle::new(SessionData::new(Duration::from_secs(60)));
		handle.login(Uuid::new_v4());

		handle.invalidate();

		assert_eq!(handle.user_id(), None);
	}

	#[rstest]
	fn test_flashed_errors_are_read_once() {
		let handle = SessionHandle::new(SessionData::new(Duration::from_secs(60)));
		let errors = ValidationErrors::new().with("email", "bad");

		handle.flash_errors(&errors);

		assert_eq!(handle.take_flashed_errors(), Some(errors));
		assert_eq!(handle.take_flashed_errors(), None);
	}

	#[rstest]
	fn test_secure_cookie_flag() {
		let config = SessionConfig::default().with_secure(true);

		assert!(config.set_cookie("x").contains("; Secure;"));
		assert!(config.removal_cookie().ends_with("Max-Age=0"));
	}
}
