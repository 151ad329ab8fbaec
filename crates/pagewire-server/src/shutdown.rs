use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tracing::{info, warn};

/// Resolves on Ctrl+C, or SIGTERM on Unix.
///
/// A signal that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		match ctrl_c().await {
			Ok(()) => info!("Received Ctrl+C, shutting down"),
			Err(e) => {
				warn!(error = %e, "Failed to install Ctrl+C handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match signal(SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
				info!("Received terminate signal, shutting down");
			}
			Err(e) => {
				warn!(error = %e, "Failed to install SIGTERM handler");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
