//! Session and authentication middleware composed in front of a recorder handler.

use async_trait::async_trait;
use pagewire_auth::{
	InMemoryUserStore, NewUser, SessionConfig, SessionHandle, SessionStore, UserStore,
};
use pagewire_http::{
	AuthState, Error, Handler, MiddlewareChain, Request, Response, Result, StatusCode,
};
use pagewire_middleware::{AuthenticationMiddleware, LoggingMiddleware, SessionMiddleware};
use pagewire_pages::ValidationErrors;
use rstest::rstest;
use std::sync::Arc;

/// Reports what the middleware attached, and lets a test act on the session.
struct Recorder {
	login_as: Option<uuid::Uuid>,
	flash: Option<ValidationErrors>,
	fail: bool,
}

#[async_trait]
impl Handler for Recorder {
	async fn handle(&self, request: Request) -> Result<Response> {
		let auth = AuthState::from_extensions(&request.extensions);
		let errors = request.extensions.get::<ValidationErrors>();
		if let Some(session) = SessionHandle::from_request(&request) {
			if let Some(id) = self.login_as {
				session.login(id);
			}
			if let Some(flash) = &self.flash {
				session.flash_errors(flash);
			}
		}
		if self.fail {
			return Err(Error::NotFound("GET /missing".to_string()));
		}
		Ok(Response::ok()
			.with_header("x-authenticated", &auth.is_authenticated.to_string())
			.with_header("x-errors", &errors.map(|e| e.len()).unwrap_or(0).to_string()))
	}
}

struct Pipeline {
	store: Arc<SessionStore>,
	users: Arc<InMemoryUserStore>,
}

impl Pipeline {
	fn new() -> Self {
		Self {
			store: Arc::new(SessionStore::new()),
			users: Arc::new(InMemoryUserStore::new()),
		}
	}

	fn chain(&self, recorder: Recorder) -> MiddlewareChain {
		MiddlewareChain::new(Arc::new(recorder))
			.with_middleware(Arc::new(LoggingMiddleware::new()))
			.with_middleware(Arc::new(SessionMiddleware::with_store(
				self.store.clone(),
				SessionConfig::default(),
			)))
			.with_middleware(Arc::new(AuthenticationMiddleware::new(self.users.clone())))
	}

	async fn send(&self, recorder: Recorder, cookie: Option<&str>) -> Response {
		let mut builder = Request::builder().uri("/");
		if let Some(cookie) = cookie {
			builder = builder.header("cookie", cookie);
		}
		self.chain(recorder).handle(builder.build().unwrap()).await.unwrap()
	}
}

fn idle() -> Recorder {
	Recorder {
		login_as: None,
		flash: None,
		fail: false,
	}
}

fn failing() -> Recorder {
	Recorder {
		fail: true,
		..idle()
	}
}

fn session_cookie(response: &Response) -> String {
	let set_cookie = response.headers.get("set-cookie").unwrap().to_str().unwrap();
	set_cookie.split(';').next().unwrap().to_string()
}

fn header<'a>(response: &'a Response, name: &str) -> &'a str {
	response.headers.get(name).unwrap().to_str().unwrap()
}

#[rstest]
#[tokio::test]
async fn test_new_visitor_gets_session_cookie() {
	let pipeline = Pipeline::new();

	let response = pipeline.send(idle(), None).await;

	assert!(session_cookie(&response).starts_with("pagewire_session="));
	assert_eq!(header(&response, "x-authenticated"), "false");
	assert_eq!(pipeline.store.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_login_persists_across_requests() {
	let pipeline = Pipeline::new();
	let user = pipeline
		.users
		.create(NewUser {
			name: "Tameem".to_string(),
			email: "t@example.com".to_string(),
			password_hash: "unused".to_string(),
		})
		.await
		.unwrap();

	let first = pipeline
		.send(
			Recorder {
				login_as: Some(user.id),
				flash: None,
				fail: false,
			},
			None,
		)
		.await;
	let cookie = session_cookie(&first);
	let second = pipeline.send(idle(), Some(&cookie)).await;

	assert_eq!(header(&second, "x-authenticated"), "true");
	assert_eq!(pipeline.store.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_session_of_deleted_user_is_anonymous() {
	let pipeline = Pipeline::new();

	let first = pipeline
		.send(
			Recorder {
				login_as: Some(uuid::Uuid::new_v4()),
				flash: None,
				fail: false,
			},
			None,
		)
		.await;
	let second = pipeline.send(idle(), Some(&session_cookie(&first))).await;

	assert_eq!(header(&second, "x-authenticated"), "false");
}

#[rstest]
#[tokio::test]
async fn test_flashed_errors_reach_exactly_the_next_request() {
	let pipeline = Pipeline::new();
	let flash = ValidationErrors::new().with("email", "bad");

	let first = pipeline
		.send(
			Recorder {
				login_as: None,
				flash: Some(flash),
				fail: false,
			},
			None,
		)
		.await;
	let cookie = session_cookie(&first);
	let second = pipeline.send(idle(), Some(&cookie)).await;
	let third = pipeline.send(idle(), Some(&cookie)).await;

	assert_eq!(header(&first, "x-errors"), "0");
	assert_eq!(header(&second, "x-errors"), "1");
	assert_eq!(header(&third, "x-errors"), "0");
}

#[rstest]
#[tokio::test]
async fn test_unknown_session_cookie_starts_fresh_session() {
	let pipeline = Pipeline::new();

	let response = pipeline.send(idle(), Some("pagewire_session=forged")).await;

	assert_ne!(session_cookie(&response), "pagewire_session=forged");
}

#[rstest]
#[tokio::test]
async fn test_failed_request_still_sends_session_cookie() {
	let pipeline = Pipeline::new();

	let response = pipeline.send(failing(), None).await;
	let cookie = session_cookie(&response);
	let retry = pipeline.send(failing(), Some(&cookie)).await;

	assert_eq!(response.status, StatusCode::NOT_FOUND);
	assert_eq!(session_cookie(&retry), cookie);
	assert_eq!(pipeline.store.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_failed_request_consumes_flash_for_the_same_session() {
	let pipeline = Pipeline::new();
	let first = pipeline
		.send(
			Recorder {
				flash: Some(ValidationErrors::new().with("email", "bad")),
				..idle()
			},
			None,
		)
		.await;
	let cookie = session_cookie(&first);

	let failed = pipeline.send(failing(), Some(&cookie)).await;
	let after = pipeline.send(idle(), Some(&session_cookie(&failed))).await;

	assert_eq!(session_cookie(&failed), cookie);
	assert_eq!(header(&after, "x-errors"), "0");
}
