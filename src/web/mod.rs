mod api;

use crate::llm_client::TextGenerator;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use log::info;
use std::sync::Arc;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub generator: Arc<dyn TextGenerator>,
}

pub fn router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/api/session", post(api::create_session))
        .route("/api/sample", get(api::sample_log))
        .route("/api/random", get(api::random_log))
        .route("/api/analyze", post(api::analyze))
        .route("/api/alert", post(api::alert))
        .route("/api/compare", post(api::compare))
        .route("/api/export", get(api::export))
        .with_state(state);

    Router::new()
        .route("/", get(index))
        .merge(api_router)
}

pub async fn start_server(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Web interface listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
