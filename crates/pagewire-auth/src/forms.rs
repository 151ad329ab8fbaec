//! Submitted auth forms and their validation rules.

use pagewire_pages::ValidationErrors;
use serde::Deserialize;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Login form fields. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
	pub email: String,
	pub password: String,
}

impl LoginForm {
	pub fn validate(&self) -> ValidationErrors {
		let mut errors = ValidationErrors::new();
		check_email(&mut errors, &self.email);
		if self.password.is_empty() {
			errors.add("password", "The password field is required.");
		}
		errors
	}
}

/// Registration form fields. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
	pub name: String,
	pub email: String,
	pub password: String,
	pub password_confirmation: String,
}

impl RegisterForm {
	/// Checks every rule that does not need the user store.
	pub fn validate(&self) -> ValidationErrors {
		let mut errors = ValidationErrors::new();

		if self.name.trim().is_empty() {
			errors.add("name", "The name field is required.");
		}
		check_email(&mut errors, &self.email);

		if self.password.chars().count() < MIN_PASSWORD_LENGTH {
			errors.add(
				"password",
				format!("The password field must be at least {MIN_PASSWORD_LENGTH} characters."),
			);
		} else if self.password != self.password_confirmation {
			errors.add("password", "The password field confirmation does not match.");
		}

		errors
	}
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
	let email = email.trim();
	if email.is_empty() {
		errors.add("email", "The email field is required.");
		return;
	}
	let valid = email
		.split_once('@')
		.is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
	if !valid {
		errors.add("email", "The email field must be a valid email address.");
	}
}
