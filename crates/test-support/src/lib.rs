use anyhow::Context as _;
use axum::Router;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use serde_json::{Value, json};
use std::net::TcpListener;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long `/slow/...` routes of [`spawn_echo_api`] stall before answering.
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(5);

/// A local HTTP server that shuts down when dropped.
pub struct TestServer {
    /// `http://127.0.0.1:<port>` (no trailing slash).
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    _task: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Serve `app` on an ephemeral localhost port.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_router(app: Router) -> anyhow::Result<TestServer> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind test server")?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
    });
    let task = tokio::spawn(async move {
        let _ = server.await;
    });

    Ok(TestServer {
        base_url: format!("http://{addr}"),
        shutdown: Some(shutdown_tx),
        _task: task,
    })
}

/// A fake REST API.
///
/// - `GET /openapi.json`: `spec` verbatim, or 404 when `None`
/// - `GET /status`: `{"status":"ok"}`
/// - `GET /plain`: `not json` as `text/plain`
/// - `* /fail`: 500 with `{"error":"boom"}`
/// - `* /slow/{*rest}`: answers `{"status":"late"}` after [`SLOW_RESPONSE_DELAY`]
/// - anything else: echoes `method`, `path` (still percent-encoded), `query`,
///   `contentType` and the raw `body` text as JSON
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_echo_api(spec: Option<String>) -> anyhow::Result<TestServer> {
    let app = Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let spec = spec.clone();
                async move {
                    match spec {
                        Some(text) => {
                            (StatusCode::OK, [(CONTENT_TYPE, "application/json")], text)
                                .into_response()
                        }
                        None => (StatusCode::NOT_FOUND, "no spec").into_response(),
                    }
                }
            }),
        )
        .route("/status", get(|| async { axum::Json(json!({"status": "ok"})) }))
        .route(
            "/plain",
            get(|| async { ([(CONTENT_TYPE, "text/plain")], "not json") }),
        )
        .route(
            "/fail",
            any(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({"error": "boom"})),
                )
            }),
        )
        .route(
            "/slow/{*rest}",
            any(|| async {
                tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
                axum::Json(json!({"status": "late"}))
            }),
        )
        .route("/{*path}", any(echo_handler));

    spawn_router(app).await
}

async fn echo_handler(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> axum::Json<Value> {
    axum::Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "contentType": headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        "body": String::from_utf8_lossy(&body),
    }))
}

/// Pick an unused TCP port on localhost.
///
/// Note: this does not reserve the port; it's still possible for another process to bind it
/// before you do.
///
/// # Errors
///
/// Returns an error if binding an ephemeral localhost port fails or if the bound socket's
/// local address cannot be read.
pub fn pick_unused_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("bind ephemeral port")?;
    Ok(listener.local_addr()?.port())
}
