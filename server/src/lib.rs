use std::{net::IpAddr, path::PathBuf, sync::Arc};

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::{get, post},
    BoxError, Router,
};
use std::time::Duration;
use tokio::signal;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    classify::ServerErrorsFailureClass, limit::RequestBodyLimitLayer, services::ServeDir,
    trace::TraceLayer,
};
use tracing::Span;

pub mod dir_store;
pub mod domain;
pub mod file_reply;
pub mod filename;
mod handlers;
mod page;

#[cfg(test)] // <-- not needed in integration tests
extern crate rstest;

use crate::dir_store::DirectoryStore;
use std::env;
use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: &str = "3000";
const DEFAULT_DATA_DIR: &str = "uploads";
const DEFAULT_PUBLIC_DIR: &str = "public";

/// One upload request may carry at most this many body bytes.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// An upload that has not finished within this window is answered with 408.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the server needs to start. Tests and multiple instances pass
/// their own directories instead of relying on ambient globals.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl ServerConfig {
    /// Configuration from `LANSHARE_*` environment variables, with
    /// defaults suitable for running from a checkout.
    #[must_use]
    pub fn from_env() -> Self {
        let port = env::var("LANSHARE_PORT")
            .unwrap_or_else(|_| String::from(DEFAULT_PORT))
            .parse()
            .unwrap_or(3000);
        let data_dir = env::var("LANSHARE_DATA_DIR").unwrap_or_else(|_| String::from(DEFAULT_DATA_DIR));
        let public_dir =
            env::var("LANSHARE_PUBLIC_DIR").unwrap_or_else(|_| String::from(DEFAULT_PUBLIC_DIR));
        Self {
            port,
            data_dir: PathBuf::from(data_dir),
            public_dir: PathBuf::from(public_dir),
        }
    }
}

pub async fn run(config: ServerConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "server=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The storage directory outlives the process, create it once up front.
    DirectoryStore::open(config.data_dir.clone())
        .ensure_root()
        .await
        .expect("Storage directory cannot be created");

    let socket: SocketAddr = format!("0.0.0.0:{}", config.port).parse().unwrap();
    let listener = tokio::net::TcpListener::bind(socket)
        .await
        .expect("Port cannot be bound");

    tracing::info!("listening on {socket}");
    tracing::info!("local address: http://127.0.0.1:{}", config.port);
    if let Some(ip) = lan_address() {
        tracing::info!("lan address:   http://{ip}:{}", config.port);
    }

    let app = create_routes(config.data_dir, config.public_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

pub fn create_routes(data_dir: PathBuf, public_dir: PathBuf) -> Router {
    let store = Arc::new(DirectoryStore::open(data_dir));

    // The 30s timeout covers uploads only; the layer owns the 408 path, so
    // the handler itself never races a second response.
    let upload = Router::new()
        .route("/upload", post(handlers::upload))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_upload_error))
                .layer(TimeoutLayer::new(UPLOAD_TIMEOUT)),
        );

    Router::new()
        .route("/", get(handlers::index))
        .route("/download/:file_name", get(handlers::download))
        .route("/delete/:file_name", get(handlers::delete))
        .merge(upload)
        .fallback_service(ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().on_failure(
                    |error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                        tracing::error!("Server error: {error}");
                    },
                ))
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
                .into_inner(),
        )
        .with_state(store)
}

async fn handle_upload_error(error: BoxError) -> (StatusCode, String) {
    if error.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "上传超时".to_string())
    } else {
        tracing::error!("upload error: {error}");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("上传失败: {error}"))
    }
}

/// First non-loopback IPv4 interface address, logged at startup so the
/// operator can hand out a LAN-reachable URL. Informational only.
fn lan_address() -> Option<IpAddr> {
    if_addrs::get_if_addrs()
        .ok()?
        .into_iter()
        .find(|iface| !iface.is_loopback() && iface.ip().is_ipv4())
        .map(|iface| iface.ip())
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    println!("signal received, starting graceful shutdown");
}
