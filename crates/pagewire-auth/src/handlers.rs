//! Login, registration and logout handlers.
//!
//! Rejected input never fails the request: the handler flashes field errors
//! into the session and redirects back to the form, where the next page
//! render exposes them as the `errors` prop.

use async_trait::async_trait;
use pagewire_http::{Error, Handler, Request, Response, Result};
use pagewire_pages::ValidationErrors;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{info, warn};

use crate::forms::{LoginForm, RegisterForm};
use crate::hasher::PasswordHasher;
use crate::session::SessionHandle;
use crate::user::{NewUser, UserStore};
use crate::AuthError;

/// Message shown when email and password do not identify a user.
pub const FAILED_CREDENTIALS: &str = "These credentials do not match our records.";

/// Message shown when a registration email is taken.
pub const EMAIL_TAKEN: &str = "The email has already been taken.";

fn session(request: &Request) -> Result<SessionHandle> {
	SessionHandle::from_request(request).ok_or_else(|| {
		Error::ImproperlyConfigured("auth handlers require the session middleware".to_string())
	})
}

/// Unreadable bodies are treated as empty forms so validation reports them.
fn read_form<T: DeserializeOwned + Default>(request: &Request) -> T {
	request.parse_form().unwrap_or_default()
}

fn redirect_back_with(session: &SessionHandle, errors: &ValidationErrors, to: &str) -> Response {
	session.flash_errors(errors);
	Response::temporary_redirect(to)
}

/// `POST /login`
pub struct LoginHandler {
	users: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
	home_url: String,
	login_url: String,
}

impl LoginHandler {
	pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self {
			users,
			hasher,
			home_url: "/dashboard".to_string(),
			login_url: "/login".to_string(),
		}
	}

	/// Where a successful login lands.
	pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
		self.home_url = url.into();
		self
	}

	/// Where a failed login is sent back to.
	pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
		self.login_url = url.into();
		self
	}

	async fn authenticate(&self, form: &LoginForm) -> std::result::Result<uuid::Uuid, AuthError> {
		let errors = form.validate();
		if !errors.is_empty() {
			return Err(AuthError::Validation(errors));
		}

		let user = self
			.users
			.find_by_email(form.email.trim())
			.await
			.ok_or(AuthError::InvalidCredentials)?;

		match self.hasher.verify(&form.password, &user.password_hash) {
			Ok(true) => Ok(user.id),
			Ok(false) => Err(AuthError::InvalidCredentials),
			Err(e) => {
				warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
				Err(AuthError::InvalidCredentials)
			}
		}
	}
}

#[async_trait]
impl Handler for LoginHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let session = session(&request)?;
		let form: LoginForm = read_form(&request);

		match self.authenticate(&form).await {
			Ok(user_id) => {
				session.login(user_id);
				info!(%user_id, "User logged in");
				Ok(Response::temporary_redirect(&self.home_url))
			}
			Err(AuthError::Validation(errors)) => {
				Ok(redirect_back_with(&session, &errors, &self.login_url))
			}
			Err(_) => {
				warn!(email = %form.email, "Rejected login attempt");
				let errors = ValidationErrors::new().with("email", FAILED_CREDENTIALS);
				Ok(redirect_back_with(&session, &errors, &self.login_url))
			}
		}
	}
}

/// `POST /register`
pub struct RegisterHandler {
	users: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
	home_url: String,
	register_url: String,
}

impl RegisterHandler {
	pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self {
			users,
			hasher,
			home_url: "/dashboard".to_string(),
			register_url: "/register".to_string(),
		}
	}

	pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
		self.home_url = url.into();
		self
	}

	pub fn with_register_url(mut self, url: impl Into<String>) -> Self {
		self.register_url = url.into();
		self
	}
}

#[async_trait]
impl Handler for RegisterHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let session = session(&request)?;
		let form: RegisterForm = read_form(&request);

		let mut errors = form.validate();
		let email = form.email.trim().to_string();
		if errors.get("email").is_none() && self.users.find_by_email(&email).await.is_some() {
			errors.add("email", EMAIL_TAKEN);
		}
		if !errors.is_empty() {
			return Ok(redirect_back_with(&session, &errors, &self.register_url));
		}

		let password_hash = self.hasher.hash(&form.password)?;
		let created = self
			.users
			.create(NewUser {
				name: form.name.trim().to_string(),
				email,
				password_hash,
			})
			.await;

		match created {
			Ok(user) => {
				session.login(user.id);
				info!(user_id = %user.id, "User registered");
				Ok(Response::temporary_redirect(&self.home_url))
			}
			// Lost a race with a concurrent registration for the same email.
			Err(AuthError::DuplicateEmail(_)) => {
				let errors = ValidationErrors::new().with("email", EMAIL_TAKEN);
				Ok(redirect_back_with(&session, &errors, &self.register_url))
			}
			Err(e) => Err(e.into()),
		}
	}
}

/// `POST /logout`
pub struct LogoutHandler {
	redirect_to: String,
}

impl LogoutHandler {
	pub fn new() -> Self {
		Self {
			redirect_to: "/".to_string(),
		}
	}

	pub fn with_redirect_to(mut self, url: impl Into<String>) -> Self {
		self.redirect_to = url.into();
		self
	}
}

impl Default for LogoutHandler {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Handler for LogoutHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		let session = session(&request)?;
		if let Some(user_id) = session.user_id() {
			info!(%user_id, "User logged out");
		}
		session.invalidate();
		Ok(Response::temporary_redirect(&self.redirect_to))
	}
}
