use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use pagewire_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Failed to bind {addr}: {source}")]
	Bind {
		addr: SocketAddr,
		#[source]
		source: std::io::Error,
	},

}

/// Pause after a failed `accept`, e.g. when the process is out of file
/// descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct HttpServer {
	handler: Arc<dyn Handler>,
	middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	/// Create a new server with a handler
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	/// Wraps the handler in `middleware`; the first one added runs outermost.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}

		Arc::new(chain)
	}

	/// Binds `addr` and serves until `shutdown` resolves.
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		shutdown: impl Future<Output = ()> + Send,
	) -> Result<(), ServerError> {
		let listener = TcpListener::bind(addr)
			.await
			.map_err(|source| ServerError::Bind { addr, source })?;
		self.serve_listener(listener, shutdown).await
	}

	/// Serves connections from an already bound listener until `shutdown`
	/// resolves, then waits for in-flight connections to finish.
	pub async fn serve_listener(
		self,
		listener: TcpListener,
		shutdown: impl Future<Output = ()> + Send,
	) -> Result<(), ServerError> {
		if let Ok(local) = listener.local_addr() {
			info!(addr = %local, "Server listening on http://{}", local);
		}

		let handler = self.build_handler();
		let (stop_tx, stop_rx) = watch::channel(false);
		let mut connections = Connections::default();
		tokio::pin!(shutdown);

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, remote_addr) = match result {
						Ok(accepted) => accepted,
						Err(err) => {
							warn!(error = %err, "Failed to accept connection");
							tokio::time::sleep(ACCEPT_BACKOFF).await;
							continue;
						}
					};
					let handler = handler.clone();
					let stop_rx = stop_rx.clone();
					connections.spawn(async move {
						if let Err(err) = Self::handle_connection(stream, remote_addr, handler, stop_rx).await {
							error!(%remote_addr, error = %err, "Error handling connection");
						}
					});
				}
				_ = connections.reap_one(), if !connections.is_empty() => {}
				_ = &mut shutdown => {
					info!("Shutdown signal received, stopping server");
					break;
				}
			}
		}

		let _ = stop_tx.send(true);
		info!(in_flight = connections.len(), "Waiting for open connections");
		while !connections.is_empty() {
			connections.reap_one().await;
		}
		info!("Server stopped");
		Ok(())
	}

	async fn handle_connection(
		stream: TcpStream,
		remote_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		mut stop_rx: watch::Receiver<bool>,
	) -> hyper::Result<()> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr,
		};

		let conn = http1::Builder::new().serve_connection(io, service);
		tokio::pin!(conn);

		tokio::select! {
			result = conn.as_mut() => result,
			_ = stop_rx.changed() => {
				// Finish the in-flight request, then close.
				conn.as_mut().graceful_shutdown();
				conn.await
			}
		}
	}
}

/// Connection tasks of a running server.
///
/// Finished tasks keep their slot until reaped, so the accept loop reaps them
/// as they complete.
#[derive(Default)]
struct Connections {
	tasks: JoinSet<()>,
}

impl Connections {
	fn spawn(&mut self, task: impl Future<Output = ()> + Send + 'static) {
		self.tasks.spawn(task);
	}

	/// Waits for one connection task to finish and releases it.
	async fn reap_one(&mut self) {
		if let Some(Err(err)) = self.tasks.join_next().await
			&& err.is_panic()
		{
			error!(error = %err, "Connection task panicked");
		}
	}

	fn len(&self) -> usize {
		self.tasks.len()
	}

	fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = handler.handle(request).await.unwrap_or_else(|err| {
				if err.status_code() >= 500 {
					error!(error = %err, "Handler failed");
				} else {
					warn!(error = %err, "Request rejected");
				}
				Response::from(err)
			});

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

/// Serves `handler` on `addr` until `shutdown` resolves.
pub async fn serve(
	addr: SocketAddr,
	handler: Arc<dyn Handler>,
	shutdown: impl Future<Output = ()> + Send,
) -> Result<(), ServerError> {
	HttpServer::new(handler)
		.listen_with_shutdown(addr, shutdown)
		.await
}
