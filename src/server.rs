use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    api,
    error::{Error, Result},
    service::TitledService,
};

/// Routes of the web front end, bound to `service`.
pub fn router(service: Arc<TitledService>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/home", get(api::home))
        .route("/generatePlaylist", post(api::generate_playlist))
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until the process ends.
pub async fn start_api_server(service: Arc<TitledService>) -> Result<()> {
    let address = service.config().server_address.clone();
    let addr = SocketAddr::from_str(&address)
        .map_err(|e| Error::Config(format!("invalid SERVER_ADDRESS '{}': {}", address, e)))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, base_url = %service.config().base_url, "listening");

    axum::serve(listener, router(service)).await?;
    Ok(())
}
