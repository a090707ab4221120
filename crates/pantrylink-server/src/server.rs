//! The hyper server loop.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, Instrument};

use pantrylink_core::{ApiRequest, ApiResponse};
use pantrylink_router::Router;

use crate::dispatch::dispatch;
use crate::operations::{route_table, Operation};
use crate::state::AppState;

/// Embedded API documentation, served for `GET /api/`.
const API_DOC_HTML: &str = include_str!("doc.html");

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be parsed.
    #[error("invalid listen address: {message}")]
    Config {
        /// Failure description.
        message: String,
    },

    /// The listener could not be bound.
    #[error("failed to bind: {message}")]
    Bind {
        /// Failure description.
        message: String,
    },
}

/// The gateway HTTP server.
///
/// Owns the shared state and the route table (built once from the static
/// operation table) and serves requests until the process is stopped.
pub struct ApiServer {
    state: Arc<AppState>,
    router: Arc<Router<Operation>>,
}

impl ApiServer {
    /// Creates a server over the given state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            router: Arc::new(route_table()),
        }
    }

    /// Runs the accept loop forever.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = SocketAddr::new(
            self.state
                .config
                .server
                .listen_addr
                .parse()
                .map_err(|e| ServerError::Config {
                    message: format!("{e}"),
                })?,
            self.state.config.server.listen_port,
        );

        let listener = TcpListener::bind(addr).await.map_err(|e| ServerError::Bind {
            message: format!("{e}"),
        })?;

        info!("PantryLink gateway listening on {addr}");
        info!("Inventory upstream: {}", self.state.config.grocy.url);

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {e}");
                    continue;
                }
            };

            let state = self.state.clone();
            let router = self.router.clone();

            tokio::spawn(async move {
                let io = TokioIo::new(stream);

                let service = service_fn(move |req| {
                    let state = state.clone();
                    let router = router.clone();
                    async move { handle_request(req, &state, &router, peer_addr).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Connection error from {peer_addr}: {e}");
                }
            });
        }
    }
}

/// Handles one request: doc page, body collection, dispatch, envelope
/// serialization.
async fn handle_request(
    req: Request<Incoming>,
    state: &AppState,
    router: &Router<Operation>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);

    // The doc page is raw HTML, served before auth and routing, exactly
    // like the original gateway.
    if method == Method::GET && (path == "/api" || path == "/api/") {
        return Ok(html_response(API_DOC_HTML));
    }

    let (parts, body) = req.into_parts();
    let body_bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("Failed to read request body: {e}");
            let envelope =
                ApiResponse::error("Failed to read request body", StatusCode::BAD_REQUEST);
            return Ok(envelope_response(&envelope));
        }
    };

    let request = ApiRequest::new(method, path, query.as_deref(), parts.headers, body_bytes);
    let span = tracing::info_span!(
        "request",
        request_id = %request.request_id(),
        method = %request.method(),
        path = %request.path(),
        peer = %peer_addr,
    );

    async move {
        let envelope = dispatch(state, router, &request).await;
        info!(
            status = envelope.result.http_code,
            duration_ms = %start.elapsed().as_millis(),
            "request completed"
        );
        Ok(envelope_response(&envelope))
    }
    .instrument(span)
    .await
}

/// Serializes an envelope, with the transport status taken from the
/// envelope's own `http_code`.
fn envelope_response(envelope: &ApiResponse) -> Response<Full<Bytes>> {
    let body = serde_json::to_string(envelope).unwrap_or_else(|_| {
        r#"{"data":null,"result":{"result":"Internal server error","http_code":500}}"#.to_string()
    });

    Response::builder()
        .status(envelope.status_code())
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| {
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Full::new(Bytes::from("{}")))
                .unwrap()
        })
}

/// Serves a static HTML page.
fn html_response(html: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(Full::new(Bytes::from_static(html.as_bytes())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
