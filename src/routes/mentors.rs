use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    CandidateQuery, ErrorResponse, HealthResponse, MatchMentorsRequest, MatchMentorsResponse,
    MatchRequest,
};
use crate::routes::AppState;

/// Configure mentor-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/mentors/match", web::post().to(match_mentors));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Match mentors endpoint
///
/// POST /api/v1/mentors/match
///
/// Request body:
/// ```json
/// {
///   "subjectId": "string",
///   "yearPreference": 3,
///   "expertiseLevel": 2
/// }
/// ```
async fn match_mentors(
    state: web::Data<AppState>,
    req: web::Json<MatchMentorsRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match_mentors request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", errors));
    }

    let request = MatchRequest::from(req.into_inner());

    let query = match CandidateQuery::from_request(&request) {
        Ok(query) => query,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid request", e));
        }
    };

    let authorization = http_req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    tracing::info!("Matching mentors for subject: {}", query.subject_id);

    let candidates = match state
        .supabase
        .fetch_mentor_candidates(Some(&query.subject_id), authorization)
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to fetch mentor candidates for {}: {}", query.subject_id, e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to match mentors", e));
        }
    };

    let ranking = match state.ranker.rank(&candidates, &request) {
        Ok(ranking) => ranking,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid request", e));
        }
    };

    tracing::info!(
        "Returning {} mentors for subject {} (from {} candidates, {} skipped)",
        ranking.mentors.len(),
        query.subject_id,
        ranking.total_candidates,
        ranking.skipped.len()
    );

    HttpResponse::Ok().json(MatchMentorsResponse {
        mentors: ranking.mentors,
        total_candidates: ranking.total_candidates,
        skipped: ranking.skipped,
    })
}
