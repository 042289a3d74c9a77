use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/sitemap.xml", get(handlers::sitemap))
        .route("/api/noticias", get(handlers::list_noticias))
        .route("/api/noticias/:slug", get(handlers::get_noticia))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(addr: &str, state: AppState) -> noticias_core::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 listening on {}", addr);
    axum::serve(listener, app)
        .await
        .map_err(noticias_core::Error::Io)?;
    Ok(())
}

pub mod prelude {
    pub use crate::AppState;
    pub use noticias_core::{Error, Noticia, Result};
}
