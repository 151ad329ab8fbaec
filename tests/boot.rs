//! Boot-time checks: page discovery, completeness and settings wiring.

use pagewire::pages::{PageApp, PageError, Visit};
use pagewire::{AppError, Application, RouteSet, Settings};
use pagewire_test::{TestClient, assert_page};
use rstest::rstest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_page(root: &Path, name: &str, contents: &str) {
	let path = root.join(format!("{name}.vue"));
	fs::create_dir_all(path.parent().unwrap()).unwrap();
	fs::write(path, contents).unwrap();
}

fn settings_with_pages(dir: &TempDir, route_set: RouteSet) -> Settings {
	Settings {
		pages_dir: Some(dir.path().to_path_buf()),
		route_set,
		..Settings::default()
	}
}

#[rstest]
fn test_boot_fails_when_routed_page_is_missing() {
	let dir = TempDir::new().unwrap();
	write_page(dir.path(), "Home", "<template>Home</template>");
	write_page(dir.path(), "Auth/Login", "<template>Login</template>");

	let err = Application::from_settings(settings_with_pages(&dir, RouteSet::Auth)).unwrap_err();

	let missing: Vec<&str> = match &err {
		AppError::Pages(PageError::Incomplete(missing)) => {
			missing.iter().map(|name| name.as_str()).collect()
		}
		other => panic!("expected an incomplete page set, got {other:?}"),
	};
	assert_eq!(missing, ["Auth/Register", "Dashboard"]);
}

#[rstest]
fn test_boot_discovers_page_directory() {
	let dir = TempDir::new().unwrap();
	write_page(dir.path(), "About", "<template>About</template>");

	let app = Application::from_settings(settings_with_pages(&dir, RouteSet::Demo)).unwrap();

	let about = app.resolver().resolve_str("About").unwrap();
	assert_eq!(about.source_path, dir.path().join("About.vue"));
	assert_eq!(about.layout.map(|l| l.name().to_string()).as_deref(), Some("Layout"));
}

#[rstest]
#[tokio::test]
async fn test_declared_layout_breaks_layout_sharing() {
	let dir = TempDir::new().unwrap();
	for page in ["Home", "Dashboard", "Auth/Login", "Auth/Register"] {
		write_page(dir.path(), page, "<template></template>");
	}
	write_page(dir.path(), "About", "<!-- layout: Marketing -->\n<template></template>");

	let app = Application::from_settings(settings_with_pages(&dir, RouteSet::Full)).unwrap();
	let client = TestClient::new(app.handler()).with_page_version("1");
	let home = assert_page(&client.visit("/").await, "Home");
	let about = assert_page(&client.visit("/about").await, "About");

	let mut page_app = PageApp::boot(app.resolver().clone(), home).unwrap();
	let visit = page_app.visit(about).unwrap();

	assert_eq!(visit, Visit::Swapped { layout_preserved: false });
}

#[rstest]
#[tokio::test]
async fn test_new_asset_version_reloads_client() {
	let app = Application::from_settings(Settings {
		asset_version: "2".to_string(),
		..Settings::default()
	})
	.unwrap();
	let client = TestClient::new(app.handler()).with_page_version("2");
	let about = assert_page(&client.visit("/about").await, "About");
	let home = pagewire::pages::PageObject::new(
		pagewire::pages::PageName::new("Home").unwrap(),
		Default::default(),
		"/",
		"1",
	);

	let mut page_app = PageApp::boot(app.resolver().clone(), home).unwrap();

	assert_eq!(
		page_app.visit(about).unwrap(),
		Visit::Reload {
			url: "/about".to_string()
		}
	);
}

#[rstest]
fn test_invalid_settings_are_rejected() {
	let settings = Settings {
		login_url: "login".to_string(),
		..Settings::default()
	};

	assert!(matches!(
		Application::from_settings(settings),
		Err(AppError::Settings(_))
	));
}
