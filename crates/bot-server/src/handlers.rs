//! HTTP/WebSocket Handlers

use axum::{
    Json,
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::StatusCode,
    response::Response,
};
use base64::Engine as _;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use bot_core::{ChatId, Incoming, Reply};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub provider: String,
    pub provider_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Stable chat identifier; a fresh one is minted when absent
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Free text or a slash command
    #[serde(default)]
    pub message: Option<String>,

    /// Inline keyboard button data; takes precedence over `message`
    #[serde(default)]
    pub callback: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ButtonPayload {
    pub label: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct PhotoPayload {
    pub filename: String,
    /// Base64-encoded image bytes
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct ReplyPayload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Vec<Vec<ButtonPayload>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoPayload>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat_id: String,
    pub replies: Vec<ReplyPayload>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn to_payload(reply: Reply) -> ReplyPayload {
    ReplyPayload {
        text: reply.text,
        keyboard: reply.keyboard.map(|keyboard| {
            keyboard
                .rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|b| ButtonPayload {
                            label: b.label,
                            data: b.data,
                        })
                        .collect()
                })
                .collect()
        }),
        photo: reply.photo.map(|photo| PhotoPayload {
            filename: photo.filename,
            data: base64::engine::general_purpose::STANDARD.encode(photo.bytes),
        }),
    }
}

fn to_incoming(request: &ChatRequest) -> Option<Incoming> {
    if let Some(data) = request.callback.as_deref().filter(|d| !d.trim().is_empty()) {
        return Some(Incoming::Callback(data.trim().to_string()));
    }
    request
        .message
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(Incoming::from_text)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.market.health_check().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        provider: state.market.name().to_string(),
        provider_connected,
    })
}

/// Main chat endpoint (non-streaming)
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let chat_id = payload
        .chat_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let Some(incoming) = to_incoming(&payload) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Either 'message' or 'callback' is required".into(),
                code: "EMPTY_REQUEST".into(),
            }),
        ));
    };

    let chat = ChatId::from_string(chat_id.clone());
    let replies = state.dispatcher.handle(&chat, incoming).await.map_err(|e| {
        tracing::error!("Dispatcher error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "DISPATCH_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(ChatResponse {
        chat_id,
        replies: replies.into_iter().map(to_payload).collect(),
    }))
}

/// WebSocket chat
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        // Parse request
        let request: ChatRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        let chat_id = request
            .chat_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let Some(incoming) = to_incoming(&request) else {
            let error =
                serde_json::json!({"type": "error", "error": "message or callback required"});
            let _ = sender.send(Message::Text(error.to_string().into())).await;
            continue;
        };

        let chat = ChatId::from_string(chat_id.clone());
        match state.dispatcher.handle(&chat, incoming).await {
            Ok(replies) => {
                let response = ChatResponse {
                    chat_id,
                    replies: replies.into_iter().map(to_payload).collect(),
                };
                match serde_json::to_string(&response) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Response encoding failed: {}", e);
                    }
                }
            }
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.user_message()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
            }
        }
    }
}
