use async_trait::async_trait;
use pagewire_auth::{SessionHandle, USER_ID_KEY, UserStore};
use pagewire_http::{AuthState, Handler, Middleware, Request, Response, Result};
use std::sync::Arc;

/// Authentication middleware
///
/// Resolves the session's user id against the [`UserStore`] and inserts an
/// [`AuthState`] (and the [`User`](pagewire_auth::User) when signed in) into
/// the request extensions. Requests without a session are anonymous.
pub struct AuthenticationMiddleware {
	users: Arc<dyn UserStore>,
}

impl AuthenticationMiddleware {
	pub fn new(users: Arc<dyn UserStore>) -> Self {
		Self { users }
	}
}

#[async_trait]
impl Middleware for AuthenticationMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let session = SessionHandle::from_request(&request);
		let user_id = session.as_ref().and_then(SessionHandle::user_id);

		let user = match user_id {
			Some(id) => self.users.find_by_id(&id).await,
			None => None,
		};

		let state = match user {
			Some(user) => {
				let state = AuthState::authenticated(user.id.to_string());
				request.extensions.insert(user);
				state
			}
			None => {
				// The user behind this session no longer exists.
				if let (Some(session), Some(id)) = (&session, user_id) {
					tracing::debug!(user_id = %id, "Dropping session user that no longer exists");
					session.remove(USER_ID_KEY);
				}
				AuthState::anonymous()
			}
		};
		request.extensions.insert(state);

		next.handle(request).await
	}
}
