//! # Pagewire Configuration
//!
//! Layered settings for the pagewire application.
//!
//! Sources are merged in priority order: environment variables
//! (`PAGEWIRE_*`) over a TOML file over built-in defaults.
//!
//! ```rust
//! use pagewire_conf::{RouteSet, Settings};
//!
//! let settings = Settings::default();
//! assert_eq!(settings.route_set, RouteSet::Full);
//! assert_eq!(settings.app_name, "My App");
//! ```

pub mod settings;
pub mod sources;

pub use settings::{RouteSet, Settings, SettingsBuilder, SettingsError};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
