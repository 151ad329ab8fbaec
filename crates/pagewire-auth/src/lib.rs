//! # Pagewire Auth
//!
//! The authentication collaborator behind the route table's auth handlers.
//!
//! ## Features
//!
//! - **Users**: [`UserStore`] contract with an in-memory implementation
//! - **Password hashing**: Argon2id via [`Argon2Hasher`]
//! - **Sessions**: cookie-bound server-side sessions with id rotation on login
//! - **Handlers**: `POST /login`, `POST /register` and `POST /logout`
//!
//! Validation failures are flashed into the session and surface on the next
//! page render as the `errors` prop.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod hasher;
pub mod session;
pub mod user;

pub use error::{AuthError, Result};
pub use forms::{LoginForm, RegisterForm};
pub use handlers::{LoginHandler, LogoutHandler, RegisterHandler};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use session::{SessionConfig, SessionData, SessionHandle, SessionStore, USER_ID_KEY};
pub use user::{InMemoryUserStore, NewUser, User, UserStore};
