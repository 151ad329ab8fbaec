use anyhow::Context;
use clap::Parser;
use pagewire::{Application, RouteSet, Settings};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, reload};

/// Log filter used until the settings are loaded.
const DEFAULT_LOG_FILTER: &str = "info";

/// Pagewire scaffold server
#[derive(Debug, Parser)]
#[command(name = "pagewire")]
#[command(about = "Serve the pagewire single-page application scaffold", long_about = None)]
#[command(version)]
struct Cli {
	/// TOML settings file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Address to listen on, overriding the settings
	#[arg(short, long, value_name = "ADDR")]
	bind: Option<String>,

	/// Route table to serve: auth, demo or full
	#[arg(long, value_name = "SET")]
	route_set: Option<RouteSet>,

	/// Print the route table and exit
	#[arg(long)]
	show_routes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	// Logging starts before the settings load; `log_filter` is applied once
	// they are known unless RUST_LOG is set.
	let env_filter = EnvFilter::try_from_default_env().ok();
	let rust_log_set = env_filter.is_some();
	let (filter, filter_handle) =
		reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)));
	tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
	if let Some(bind) = cli.bind {
		settings.bind = bind;
	}
	if let Some(route_set) = cli.route_set {
		settings.route_set = route_set;
	}

	if let Some(directive) = settings_log_filter(rust_log_set, &settings) {
		filter_handle
			.reload(EnvFilter::new(directive))
			.context("Failed to apply log filter")?;
	}

	let app = Application::from_settings(settings).context("Failed to start application")?;

	if cli.show_routes {
		for route in app.registry().routes() {
			println!(
				"{:<6} {:<12} {:<8} {:<12} {}",
				route.method.as_str(),
				route.pattern,
				route.group,
				route.name.as_deref().unwrap_or("-"),
				route.page.as_ref().map(|p| p.as_str()).unwrap_or("<handler>"),
			);
		}
		return Ok(());
	}

	app.serve(pagewire::server::shutdown_signal())
		.await
		.context("Server error")?;
	Ok(())
}

/// The filter to switch to once the settings are loaded, if any.
fn settings_log_filter(rust_log_set: bool, settings: &Settings) -> Option<&str> {
	(!rust_log_set && settings.log_filter != DEFAULT_LOG_FILTER)
		.then_some(settings.log_filter.as_str())
}
