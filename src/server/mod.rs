// src/server/mod.rs
//! Local file-save server: the REST process the remote tag sink talks to.
//!
//! `POST` overwrites the backing file with pretty-printed JSON, `GET` returns
//! its current contents, `/api/health` answers the liveness probe.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub mod error;
pub mod routes;
pub mod state;

use error::{ServerError, ServerResult};
use routes::{get_available_tags, get_team_tags, health, save_available_tags, save_team_tags};
use state::ServerState;

pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/team-tags", get(get_team_tags).post(save_team_tags))
        .route(
            "/api/available-tags",
            get(get_available_tags).post(save_available_tags),
        )
        .route("/api/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Serves until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<ServerState>, shutdown: F) -> ServerResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("Team tags server running on http://{address}");
    }
    info!("Team tags file: {}", state.team_tags_file.display());
    info!("Available tags file: {}", state.available_tags_file.display());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shut down");
    Ok(())
}

/// Binds `address` and serves until Ctrl-C or SIGTERM, on a fresh runtime
pub fn run(address: SocketAddr, state: ServerState) -> ServerResult<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;
        serve(listener, Arc::new(state), shutdown_signal()).await
    })
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
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
