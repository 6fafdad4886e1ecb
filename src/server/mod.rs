//! HTTP API server.
//!
//! Exposes the session controller over a JSON API: extract a transcript
//! from a YouTube URL, then chat with it.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::SvarError;
use crate::session::Session;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared application state.
struct AppState {
    session: Arc<Session>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let session = Arc::new(Session::new(settings)?);
    let app = router(session);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Svar API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /api/health");
    Output::kv("Video ID", "POST /api/video/id");
    Output::kv("Extract", "POST /api/transcript/extract");
    Output::kv("Chat", "POST /api/chat");
    Output::kv("Current", "GET  /api/transcript/current");
    Output::kv("Clear", "POST /api/transcript/clear");
    Output::kv("History", "GET  /api/conversation/history");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around a session.
pub fn router(session: Arc<Session>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/video/id", post(video_id))
        .route("/api/transcript/extract", post(extract_transcript))
        .route("/api/chat", post(chat))
        .route("/api/transcript/current", get(current_transcript))
        .route("/api/transcript/clear", post(clear_transcript))
        .route("/api/conversation/history", get(conversation_history))
        .fallback(not_found)
        .layer(cors)
        .with_state(Arc::new(AppState { session }))
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct VideoUrlRequest {
    video_url: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    message: String,
}

#[derive(Serialize)]
struct VideoIdResponse {
    video_id: String,
    video_url: String,
    message: String,
}

#[derive(Serialize)]
struct ExtractResponse {
    message: String,
    video_url: String,
    transcript_length: usize,
    chunks_count: usize,
    preview: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    question: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    question: String,
    answer: String,
    video_url: String,
}

#[derive(Serialize)]
struct CurrentResponse {
    loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vectorstore_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Serialize)]
struct HistoryResponse {
    conversations: Vec<serde_json::Value>,
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Map a pipeline error onto an HTTP response.
///
/// Validation and fetch errors are the caller's problem (400); everything
/// else is reported as a server error with the underlying message embedded.
fn error_response(err: SvarError, server_context: &str) -> Response {
    if err.is_client_error() {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("{}: {}", server_context, err),
            }),
        )
            .into_response()
    }
}

fn missing_field(field: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("{} is required", field),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "YouTube Transcript Chatbot API is running".to_string(),
    })
}

async fn video_id(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VideoUrlRequest>,
) -> Response {
    let Some(video_url) = req.video_url.filter(|u| !u.trim().is_empty()) else {
        return missing_field("video_url");
    };

    match state.session.extract_video_id(&video_url) {
        Some(video_id) => Json(VideoIdResponse {
            video_id,
            video_url,
            message: "Video ID extracted successfully".to_string(),
        })
        .into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid YouTube URL or could not extract video ID".to_string(),
            }),
        )
            .into_response(),
    }
}

async fn extract_transcript(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VideoUrlRequest>,
) -> Response {
    let Some(video_url) = req.video_url.filter(|u| !u.trim().is_empty()) else {
        return missing_field("video_url");
    };

    match state.session.ingest(&video_url).await {
        Ok(report) => Json(ExtractResponse {
            message: "Transcript extracted successfully".to_string(),
            video_url: report.video_url,
            transcript_length: report.transcript_length,
            chunks_count: report.chunks_count,
            preview: report.preview,
        })
        .into_response(),
        Err(e) => error_response(e, "Failed to extract transcript"),
    }
}

async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Response {
    let Some(question) = req.question.filter(|q| !q.trim().is_empty()) else {
        return missing_field("question");
    };

    match state.session.ask(&question).await {
        Ok(chat) => Json(ChatResponse {
            question,
            answer: chat.answer,
            video_url: chat.video_url,
        })
        .into_response(),
        Err(e) => error_response(e, "Failed to process question"),
    }
}

async fn current_transcript(State(state): State<Arc<AppState>>) -> Response {
    let status = state.session.status().await;

    if status.loaded {
        Json(CurrentResponse {
            loaded: true,
            video_url: status.video_url,
            vectorstore_available: Some(status.vectorstore_available),
            message: None,
        })
        .into_response()
    } else {
        Json(CurrentResponse {
            loaded: false,
            video_url: None,
            vectorstore_available: None,
            message: Some("No transcript currently loaded".to_string()),
        })
        .into_response()
    }
}

async fn clear_transcript(State(state): State<Arc<AppState>>) -> Response {
    state.session.clear().await;

    Json(MessageResponse {
        message: "Transcript cleared successfully".to_string(),
    })
    .into_response()
}

async fn conversation_history() -> impl IntoResponse {
    Json(HistoryResponse {
        conversations: Vec::new(),
        message: "Conversation history feature not implemented yet".to_string(),
    })
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Endpoint not found",
            "message": "Please check the API documentation for available endpoints"
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn test_state() -> State<Arc<AppState>> {
        let session = Arc::new(Session::new(Settings::default()).unwrap());
        State(Arc::new(AppState { session }))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_shape() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_video_id_extraction() {
        let response = video_id(
            test_state(),
            Json(VideoUrlRequest {
                video_url: Some("https://www.youtube.com/watch?v=abc12345678".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["video_id"], "abc12345678");
        assert_eq!(
            body["video_url"],
            "https://www.youtube.com/watch?v=abc12345678"
        );
    }

    #[tokio::test]
    async fn test_video_id_requires_url() {
        let response = video_id(test_state(), Json(VideoUrlRequest { video_url: None })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "video_url is required");
    }

    #[tokio::test]
    async fn test_video_id_rejects_invalid_url() {
        let response = video_id(
            test_state(),
            Json(VideoUrlRequest {
                video_url: Some("https://example.com/video".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_rejects_invalid_url() {
        let response = extract_transcript(
            test_state(),
            Json(VideoUrlRequest {
                video_url: Some("not a url".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("Invalid YouTube URL"));
    }

    #[tokio::test]
    async fn test_chat_requires_question() {
        let response = chat(test_state(), Json(ChatRequest { question: None })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "question is required");
    }

    #[tokio::test]
    async fn test_chat_without_transcript_is_client_error() {
        let response = chat(
            test_state(),
            Json(ChatRequest {
                question: Some("what is this video about?".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("No transcript loaded"));
    }

    #[tokio::test]
    async fn test_current_and_clear_round_trip() {
        let state = test_state();

        let response = current_transcript(state.clone()).await;
        let body = body_json(response).await;
        assert_eq!(body["loaded"], false);
        assert_eq!(body["message"], "No transcript currently loaded");
        assert!(body.get("video_url").is_none());

        let response = clear_transcript(state).await;
        let body = body_json(response).await;
        assert_eq!(body["message"], "Transcript cleared successfully");
    }

    #[tokio::test]
    async fn test_history_stub_is_empty() {
        let response = conversation_history().await.into_response();
        let body = body_json(response).await;
        assert_eq!(body["conversations"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_not_found_shape() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Endpoint not found");
    }
}
