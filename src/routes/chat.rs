use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::routes::AppState;
use crate::services::{build_academic_prompt, GenerationError};

/// Reply used when the model answers without any text
pub const EMPTY_ANSWER_REPLY: &str =
    "I'm sorry, I couldn't generate a response. Please try rephrasing your question.";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat));
}

/// Doubt-resolution chat endpoint
///
/// POST /api/v1/chat
///
/// Request body:
/// ```json
/// {
///   "message": "string",
///   "sessionId": "string",
///   "subject": "string"
/// }
/// ```
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", errors));
    }
    if req.message.trim().is_empty() {
        return HttpResponse::BadRequest()
            .json(ErrorResponse::new("Validation failed", "message must not be blank"));
    }

    let req = req.into_inner();
    let session_id = req
        .session_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let prompt = build_academic_prompt(&req.message, req.subject.as_deref());

    let generator = &state.generator;
    let response = match generator.generate(&prompt, generator.options()).await {
        Ok(text) => text,
        Err(GenerationError::EmptyResponse { model }) => {
            tracing::warn!("Model {} returned no text for session {}", model, session_id);
            EMPTY_ANSWER_REPLY.to_string()
        }
        Err(e) => {
            tracing::error!("Failed to get AI response for session {}: {}", session_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to get AI response", e));
        }
    };

    HttpResponse::Ok().json(ChatResponse {
        response,
        session_id,
    })
}
