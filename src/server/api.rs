use crate::agent::ChatAgent;
use crate::error::ChatError;
use crate::models::chat::{ ChatRequest, ChatResponse, ConversationView };
use std::error::Error;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Json,
    Router,
    extract::{ Path, State, rejection::JsonRejection },
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn };

pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<ChatAgent>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Provider(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router(agent: Arc<ChatAgent>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/conversations/{conversation_id}", get(conversation_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api)
        .layer(cors)
        .with_state(AppState { agent })
}

pub async fn start_http_server(
    addr: &str,
    agent: Arc<ChatAgent>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(addr).await
        .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
    info!("HTTP API server listening on: http://{}", listener.local_addr()?);

    axum::serve(listener, router(agent).into_make_service()).await?;
    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({ "status": "running" }))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "provider": state.agent.provider_name(),
    }))
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected chat payload: {}", rejection.body_text());
        ChatError::Validation(rejection.body_text())
    })?;

    let response = state.agent.handle_chat(request).await?;
    Ok(Json(response))
}

async fn conversation_handler(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<ConversationView>, ChatError> {
    Ok(Json(state.agent.conversation(&conversation_id).await?))
}
