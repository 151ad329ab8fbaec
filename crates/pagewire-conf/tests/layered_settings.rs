//! Defaults, TOML file and environment merged into `Settings`.

use pagewire_conf::{DefaultSource, RouteSet, Settings, SettingsError, TomlFileSource};
use rstest::rstest;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

struct EnvGuard(Vec<&'static str>);

impl EnvGuard {
	fn set(vars: &[(&'static str, &str)]) -> Self {
		for (key, value) in vars {
			// SAFETY: tests touching the environment run under #[serial(env)].
			unsafe { std::env::set_var(key, value) };
		}
		Self(vars.iter().map(|(key, _)| *key).collect())
	}
}

impl Drop for EnvGuard {
	fn drop(&mut self) {
		for key in &self.0 {
			// SAFETY: as in `set`.
			unsafe { std::env::remove_var(key) };
		}
	}
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
	let path = dir.path().join("pagewire.toml");
	fs::write(&path, contents).unwrap();
	path
}

#[rstest]
#[serial(env)]
fn test_load_without_sources_yields_defaults() {
	let settings = Settings::load(None).unwrap();

	assert_eq!(settings, Settings::default());
}

#[rstest]
#[serial(env)]
fn test_file_overrides_defaults() {
	let dir = TempDir::new().unwrap();
	let path = write_config(
		&dir,
		r#"
route_set = "demo"
app_name = "Pagewire Demo"
session_cookie_secure = true
"#,
	);

	let settings = Settings::load(Some(&path)).unwrap();

	assert_eq!(settings.route_set, RouteSet::Demo);
	assert_eq!(settings.app_name, "Pagewire Demo");
	assert!(settings.session_cookie_secure);
	assert_eq!(settings.bind, "127.0.0.1:8000");
}

#[rstest]
#[serial(env)]
fn test_environment_overrides_file() {
	let dir = TempDir::new().unwrap();
	let path = write_config(&dir, "route_set = \"demo\"\nsession_ttl_secs = 60\n");
	let _env = EnvGuard::set(&[
		("PAGEWIRE_ROUTE_SET", "auth"),
		("PAGEWIRE_SESSION_TTL_SECS", "120"),
		("PAGEWIRE_SESSION_COOKIE_SECURE", "yes"),
		("PAGEWIRE_ASSET_VERSION", "42"),
		("PAGEWIRE_PAGES_DIR", dir.path().to_str().unwrap()),
	]);

	let settings = Settings::load(Some(&path)).unwrap();

	assert_eq!(settings.route_set, RouteSet::Auth);
	assert_eq!(settings.session_ttl_secs, 120);
	assert!(settings.session_cookie_secure);
	assert_eq!(settings.asset_version, "42");
	assert_eq!(settings.pages_dir.as_deref(), Some(dir.path()));
}

#[rstest]
#[serial(env)]
fn test_invalid_environment_value_is_rejected() {
	let _env = EnvGuard::set(&[("PAGEWIRE_ROUTE_SET", "admin")]);

	assert!(matches!(
		Settings::load(None),
		Err(SettingsError::Deserialize(_))
	));
}

#[rstest]
#[serial(env)]
fn test_missing_config_file_is_an_error() {
	let dir = TempDir::new().unwrap();

	let result = Settings::load(Some(&dir.path().join("absent.toml")));

	assert!(matches!(result, Err(SettingsError::Source { .. })));
}

#[rstest]
fn test_builder_validates_merged_result() {
	let result = Settings::builder()
		.add_source(DefaultSource::from_serializable(&Settings::default()).unwrap())
		.add_source(DefaultSource::new().with_value("bind", "not-an-address".into()))
		.build();

	assert!(matches!(result, Err(SettingsError::Invalid { field: "bind", .. })));
}

#[rstest]
fn test_optional_file_source_may_be_absent() {
	let dir = TempDir::new().unwrap();

	let settings = Settings::builder()
		.add_source(DefaultSource::from_serializable(&Settings::default()).unwrap())
		.add_source(TomlFileSource::new(dir.path().join("absent.toml")))
		.build()
		.unwrap();

	assert_eq!(settings, Settings::default());
}
