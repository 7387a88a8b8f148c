use std::net::SocketAddr;

use axum::{Router, extract::DefaultBodyLimit, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tracing::info;

use super::{
    services::{
        create_entry, get_entry, get_profile, health, list_entries, put_profile, receive_mention,
    },
    state::AppState,
};
use crate::config::Config;
use crate::store::BlogStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Build the router over shared state
///
/// Routes are relative to where the app is mounted. A path in the site's
/// base URL is expected to be stripped by whatever proxies to it.
pub fn router(state: AppState) -> Router {
    let entry_route = format!("{}{{id}}", state.config.site.entry_path_prefix);
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route(&entry_route, get(get_entry))
        .route("/webmention/verified", post(receive_mention))
        .route("/profile", get(get_profile).put(put_profile))
        .route("/health", get(health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        // Automatically decompress gzip request bodies
        .layer(RequestDecompressionLayer::new())
}

pub async fn run(config: Config, address: Option<SocketAddr>) -> Result<(), AnyError> {
    let address = address.unwrap_or(config.server.bind_addr);

    info!(path = %config.server.data_path.display(), "Opening blog store");
    let store = BlogStore::open(&config.server.data_path)
        .map_err(|e| format!("Failed to open blog store: {}", e))?;

    if config.server.admin_token.is_none() {
        tracing::warn!("No admin token configured; drafts are hidden and writes are disabled");
    }

    let state = AppState::new(config, store.clone())?;
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "indieserv listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.persist()?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
