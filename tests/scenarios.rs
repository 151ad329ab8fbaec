//! The scaffold end to end: route table, gates, auth flow and page protocol.

use pagewire::auth::{Argon2Hasher, NewUser, PasswordHasher, UserStore};
use pagewire::http::{AuthState, Method, StatusCode};
use pagewire::pages::{PageApp, Visit};
use pagewire::urls::Resolution;
use pagewire::{Application, Settings};
use pagewire_test::{TestClient, assert_page, assert_redirect, assert_status};
use rstest::{fixture, rstest};
use serde_json::json;

const EMAIL: &str = "tameem@example.com";
const PASSWORD: &str = "password123";

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn app() -> Application {
	Application::from_settings(Settings::default()).unwrap()
}

fn client(app: &Application) -> TestClient {
	TestClient::new(app.handler()).with_page_version(app.settings().asset_version.clone())
}

async fn seed_user(app: &Application) {
	app.users()
		.create(NewUser {
			name: "Tameem".to_string(),
			email: EMAIL.to_string(),
			password_hash: Argon2Hasher::new().hash(PASSWORD).unwrap(),
		})
		.await
		.unwrap();
}

async fn logged_in_client(app: &Application) -> TestClient {
	seed_user(app).await;
	let client = client(app);
	let response = client
		.post_form("/login", &[("email", EMAIL), ("password", PASSWORD)])
		.await;
	assert_redirect(&response, "/dashboard");
	client
}

// ============================================================================
// Page routes
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_home_renders_with_empty_props(app: Application) {
	let response = client(&app).get("/").await;

	assert_status(&response, StatusCode::OK);
	assert!(response.text().contains("<title>My App</title>"));
	let page = assert_page(&response, "Home");
	assert!(page.props.is_empty());
	assert_eq!(page.url, "/");
}

#[rstest]
#[tokio::test]
async fn test_about_props_are_exact(app: Application) {
	let response = client(&app).visit("/about").await;

	assert_eq!(response.header("x-inertia"), Some("true"));
	assert_eq!(response.header("vary"), Some("X-Inertia"));
	let page = assert_page(&response, "About");
	assert_eq!(
		serde_json::to_value(&page.props).unwrap(),
		json!({"user": "Tameem"})
	);
	assert_eq!(page.version, "1");
}

#[rstest]
#[case(Method::GET, "/missing")]
#[case(Method::POST, "/about")]
#[case(Method::DELETE, "/login")]
#[tokio::test]
async fn test_unmatched_requests_are_not_found(
	app: Application,
	#[case] method: Method,
	#[case] path: &str,
) {
	let response = client(&app)
		.request(method, path, &[], Default::default())
		.await;

	assert_status(&response, StatusCode::NOT_FOUND);
}

#[rstest]
fn test_every_route_resolves_to_its_own_target(app: Application) {
	let registry = app.registry();

	for route in registry.routes() {
		let outcomes: Vec<Resolution> = [AuthState::anonymous(), AuthState::authenticated("user")]
			.iter()
			.map(|caller| registry.resolve(&route.method, &route.pattern, caller))
			.collect();

		// Gated routes render for exactly one kind of caller and redirect the other.
		let served: Vec<&Resolution> = outcomes
			.iter()
			.filter(|outcome| !matches!(outcome, Resolution::Redirect { .. }))
			.collect();
		assert!(!served.is_empty(), "{} {} is never served", route.method, route.pattern);

		for outcome in served {
			match (outcome, &route.page) {
				(Resolution::Page { page, .. }, Some(expected)) => assert_eq!(
					page, expected,
					"{} {} is shadowed by another route",
					route.method, route.pattern
				),
				(Resolution::Handler { .. }, None) => {}
				(other, _) => panic!("{} {} resolved to {other:?}", route.method, route.pattern),
			}
		}
	}
}

// ============================================================================
// Gates
// ============================================================================

#[rstest]
#[case(Method::GET, "/dashboard")]
#[case(Method::POST, "/logout")]
#[tokio::test]
async fn test_authenticated_routes_redirect_guests(
	app: Application,
	#[case] method: Method,
	#[case] path: &str,
) {
	let response = client(&app)
		.request(method, path, &[], Default::default())
		.await;

	assert_redirect(&response, "/login");
}

#[rstest]
#[case(Method::GET, "/login")]
#[case(Method::GET, "/register")]
#[case(Method::POST, "/login")]
#[case(Method::POST, "/register")]
#[tokio::test]
async fn test_guest_routes_redirect_signed_in_users(
	app: Application,
	#[case] method: Method,
	#[case] path: &str,
) {
	let client = logged_in_client(&app).await;

	let response = client.request(method, path, &[], Default::default()).await;

	assert_redirect(&response, "/dashboard");
}

// ============================================================================
// Auth flow
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_login_then_dashboard(app: Application) {
	let client = logged_in_client(&app).await;

	let response = client.visit("/dashboard").await;

	assert_page(&response, "Dashboard");
}

#[rstest]
#[tokio::test]
async fn test_failed_login_flashes_errors_once(app: Application) {
	seed_user(&app).await;
	let client = client(&app);

	let response = client
		.post_form("/login", &[("email", EMAIL), ("password", "wrong-password")])
		.await;
	assert_redirect(&response, "/login");

	let next = client.visit("/login").await;
	let page = assert_page(&next, "Auth/Login");
	assert_eq!(
		page.props.get("errors"),
		Some(&json!({"email": "These credentials do not match our records."}))
	);

	let after = client.visit("/login").await;
	assert!(!assert_page(&after, "Auth/Login").props.contains_key("errors"));
}

#[rstest]
#[tokio::test]
async fn test_register_validation_errors_render_on_form(app: Application) {
	let client = client(&app);

	let response = client
		.post_form(
			"/register",
			&[
				("name", ""),
				("email", "not-an-email"),
				("password", "short"),
				("password_confirmation", "short"),
			],
		)
		.await;
	assert_redirect(&response, "/register");

	let page = assert_page(&client.follow(&response).await.unwrap(), "Auth/Register");
	let errors = page.props.get("errors").unwrap();
	assert_eq!(errors["name"], "The name field is required.");
	assert_eq!(errors["email"], "The email field must be a valid email address.");
	assert_eq!(errors["password"], "The password field must be at least 8 characters.");
}

#[rstest]
#[tokio::test]
async fn test_register_logout_cycle(app: Application) {
	let client = client(&app);

	let registered = client
		.visit_with_json(
			Method::POST,
			"/register",
			&json!({
				"name": "Tameem",
				"email": "new@example.com",
				"password": PASSWORD,
				"password_confirmation": PASSWORD,
			}),
		)
		.await;
	assert_redirect(&registered, "/dashboard");
	assert_page(&client.visit("/dashboard").await, "Dashboard");

	let logged_out = client.post_form("/logout", &[]).await;
	assert_redirect(&logged_out, "/");
	assert_redirect(&client.visit("/dashboard").await, "/login");
	assert_eq!(app.users().len(), 1);
}

// ============================================================================
// Page protocol
// ============================================================================

#[rstest]
#[tokio::test]
async fn test_stale_asset_version_forces_reload(app: Application) {
	let client = TestClient::new(app.handler()).with_page_version("0");

	let response = client.visit("/about?tab=1").await;

	assert_status(&response, StatusCode::CONFLICT);
	assert_eq!(response.header("x-inertia-location"), Some("/about?tab=1"));
}

#[rstest]
#[tokio::test]
async fn test_partial_reload_filters_props(app: Application) {
	let response = client(&app)
		.visit_with_headers(
			"/about",
			&[
				("x-inertia-partial-component", "About"),
				("x-inertia-partial-except", "user"),
			],
		)
		.await;

	assert!(assert_page(&response, "About").props.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_client_boots_from_document_and_swaps_pages(app: Application) {
	let client = client(&app);
	let document = client.get("/").await.text();

	let mut page_app = PageApp::boot_from_html(app.resolver().clone(), &document).unwrap();
	let about = client.visit("/about").await.page().unwrap();
	let visit = page_app.visit(about).unwrap();

	assert_eq!(visit, Visit::Swapped { layout_preserved: true });
	assert_eq!(page_app.current().component.name.as_str(), "About");
	assert_eq!(
		page_app.current().component.layout.as_ref().map(|l| l.name()),
		Some("Layout")
	);
	assert_eq!(page_app.history(), ["/", "/about"]);
}
