// Route exports
pub mod chat;
pub mod mentors;

use actix_web::{error, http::StatusCode, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::core::MentorRanker;
use crate::models::ErrorResponse;
use crate::services::{GeminiClient, SupabaseClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub supabase: Arc<SupabaseClient>,
    pub generator: Arc<GeminiClient>,
    pub ranker: MentorRanker,
}

/// JSON error for rejected payloads
#[derive(Debug)]
pub struct JsonError {
    pub status_code: StatusCode,
    pub body: ErrorResponse,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.body.error, self.body.details)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code).json(&self.body)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        status_code: StatusCode::BAD_REQUEST,
        body: ErrorResponse::new("invalid_json", format!("Invalid JSON: {}", err)),
    }
    .into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .service(
            web::scope("/api/v1")
                .configure(mentors::configure)
                .configure(chat::configure),
        );
}
