use crate::{AuthError, Result};

/// Password hasher trait
///
/// # Examples
///
/// ```
/// use pagewire_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("secure_password123").unwrap();
///
/// assert!(hasher.verify("secure_password123", &hash).unwrap());
/// assert!(!hasher.verify("wrong_password", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hashes a plaintext password.
	fn hash(&self, password: &str) -> Result<String>;

	/// Verifies a plaintext password against a stored hash.
	///
	/// Returns `Ok(false)` on mismatch and an error only for unparseable hashes.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hashing(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_hashes_are_salted() {
		let hasher = Argon2Hasher::new();

		let first = hasher.hash("password123").unwrap();
		let second = hasher.hash("password123").unwrap();

		assert_ne!(first, second);
		assert!(first.starts_with("$argon2id$"));
	}

	#[rstest]
	fn test_garbage_hash_is_an_error() {
		let result = Argon2Hasher::new().verify("password123", "not-a-hash");

		assert!(matches!(result, Err(AuthError::Hashing(_))));
	}
}
