use crate::backend::{ extract_reply, BackendClient };
use crate::errors::GatewayError;
use crate::models::chat::{ ChatError, ChatReply };
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{ get, post },
    Json,
    Router,
};
use log::info;
use serde_json::{ json, Value };
use tower_http::cors::{ Any, CorsLayer };

const MSG_MISSING_MESSAGE: &str = "Missing message";
const MSG_INVALID_REQUEST: &str = "Invalid request";

#[derive(Clone)]
pub struct AppState {
    pub backend: BackendClient,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

// Liveness route so platform health checks don't 404.
async fn root_handler() -> impl IntoResponse {
    Json(json!({ "message": "✅ Agrosys gateway opérationnel" }))
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let message = match validate(&body) {
        Ok(message) => message,
        Err(err) => {
            info!("Rejecting chat request: {}", err);
            let error = match err {
                GatewayError::InvalidInput(msg) => msg,
                other => other.to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(ChatError { error })).into_response();
        }
    };

    let reply = answer(&state.backend, &message).await;
    (StatusCode::OK, Json(ChatReply { reply })).into_response()
}

/// The only two true error statuses the gateway produces: an unparseable
/// body and a missing or empty message field, both 400.
fn validate(body: &[u8]) -> Result<String, GatewayError> {
    let payload = serde_json::from_slice::<Value>(body)
        .map_err(|_| GatewayError::InvalidInput(MSG_INVALID_REQUEST.to_string()))?;
    match payload.get("message").and_then(Value::as_str) {
        Some(message) if !message.is_empty() => Ok(message.to_string()),
        _ => Err(GatewayError::InvalidInput(MSG_MISSING_MESSAGE.to_string())),
    }
}

/// Forwards the message and absorbs every backend failure into a displayable
/// reply: a non-2xx becomes an explanatory sentence, an unreachable backend
/// becomes the echo fallback. The widget never sees an error status here.
pub async fn answer(backend: &BackendClient, message: &str) -> String {
    match backend.ask(message).await {
        Ok(body) => extract_reply(&body),
        Err(GatewayError::BackendRejected { body, .. }) => {
            format!(
                "Le backend a retourne une erreur: {}. Essayez de verifier les variables d'environnement cote serveur.",
                body
            )
        }
        Err(_) => format!("Echo: {}", message),
    }
}
