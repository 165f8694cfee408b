//! HTTP surface: the chat endpoint, the menu listing, and a liveness probe.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::ChatError;
use crate::orchestrator::{self, ChatRequest, ChatResponse};
use crate::responder::Cooldown;
use crate::rig::RigClient;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only application state. The cooldown stamp is the single
/// piece of mutable process state and is guarded inside `Cooldown`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub http: reqwest::Client,
    pub rig: RigClient,
    pub cooldown: Arc<Cooldown>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog) -> reqwest::Result<Self> {
        let rig = RigClient::new(&config.rig_base_url, config.rig_timeout)?;
        let cooldown = Arc::new(Cooldown::new(config.cooldown));
        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            http: reqwest::Client::new(),
            rig,
            cooldown,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/menu", get(menu_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ChatError> {
    orchestrator::handle_turn(&state, request).await.map(Json)
}

async fn menu_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "cocktails": state.catalog.recipes() }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn start(port: u16, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Cantinero listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    axum::serve(listener, app)
        .await
        .context("Web server failed")?;

    Ok(())
}
