//! Users and the user store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{AuthError, Result};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
	pub id: Uuid,
	pub name: String,
	pub email: String,
	#[serde(skip_serializing)]
	pub password_hash: String,
	pub created_at: DateTime<Utc>,
}

/// Data needed to create a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub name: String,
	pub email: String,
	pub password_hash: String,
}

/// Persistence contract for users.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Finds a user by email, compared case-insensitively.
	async fn find_by_email(&self, email: &str) -> Option<User>;

	async fn find_by_id(&self, id: &Uuid) -> Option<User>;

	/// Stores a new user.
	///
	/// # Errors
	///
	/// Returns [`AuthError::DuplicateEmail`] if the email is taken.
	async fn create(&self, user: NewUser) -> Result<User>;
}

/// Process-local user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
	users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.users.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.read().is_empty()
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn find_by_email(&self, email: &str) -> Option<User> {
		self.users
			.read()
			.values()
			.find(|user| user.email.eq_ignore_ascii_case(email))
			.cloned()
	}

	async fn find_by_id(&self, id: &Uuid) -> Option<User> {
		self.users.read().get(id).cloned()
	}

	async fn create(&self, user: NewUser) -> Result<User> {
		let mut users = self.users.write();
		if users
			.values()
			.any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
		{
			return Err(AuthError::DuplicateEmail(user.email));
		}

		let created = User {
			id: Uuid::new_v4(),
			name: user.name,
			email: user.email,
			password_hash: user.password_hash,
			created_at: Utc::now(),
		};
		users.insert(created.id, created.clone());
		Ok(created)
	}
}
