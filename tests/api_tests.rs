// HTTP tests: upstream clients against mockito, routes through actix test services

use actix_web::{http::StatusCode, test, web, App};
use campus_match::core::MentorRanker;
use campus_match::models::RecordId;
use campus_match::routes::{configure_routes, AppState};
use campus_match::services::{GeminiClient, GenerationError, GenerationOptions, SupabaseClient, SupabaseError};
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const MODELS: [&str; 3] = ["gemini-1.5-flash", "gemini-1.5-pro", "gemini-pro"];

fn mentor_rows() -> Value {
    json!([
        {
            "id": "slow",
            "full_name": "Ravi",
            "rating": 4.0,
            "response_time_minutes": 240,
            "students_helped": 10,
            "year_of_study": 4,
            "is_available_as_mentor": true,
            "mentor_subjects": [{ "subject_id": "cs101", "expertise_level": 3, "subjects": { "name": "Intro to CS", "code": "CS101" } }]
        },
        {
            "id": "best",
            "full_name": "Meera",
            "rating": 5.0,
            "response_time_minutes": 0,
            "students_helped": 100,
            "year_of_study": 4,
            "is_available_as_mentor": true,
            "mentor_subjects": [{ "subject_id": "cs101", "expertise_level": 5 }]
        },
        {
            "id": "unrated",
            "rating": null,
            "response_time_minutes": 30,
            "students_helped": 2,
            "year_of_study": 2,
            "is_available_as_mentor": true,
            "mentor_subjects": [{ "subject_id": "cs101", "expertise_level": 2 }]
        }
    ])
}

fn gemini_answer(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
}

fn supabase_client(url: &str) -> SupabaseClient {
    SupabaseClient::new(url.to_string(), "anon-key".to_string(), Duration::from_secs(5)).unwrap()
}

fn gemini_client(url: &str, api_key: Option<&str>) -> GeminiClient {
    GeminiClient::new(
        format!("{}/v1beta", url),
        api_key.map(str::to_string),
        MODELS.iter().map(|m| m.to_string()).collect(),
        GenerationOptions::default(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn app_state(url: &str) -> AppState {
    AppState {
        supabase: Arc::new(supabase_client(url)),
        generator: Arc::new(gemini_client(url, Some("test-key"))),
        ranker: MentorRanker::default(),
    }
}

#[tokio::test]
async fn test_fetch_candidates_sends_subject_filter_and_keys() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("is_available_as_mentor".into(), "eq.true".into()),
            Matcher::UrlEncoded("mentor_subjects.subject_id".into(), "eq.cs101".into()),
        ]))
        .match_header("apikey", "anon-key")
        .match_header("authorization", "Bearer anon-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mentor_rows().to_string())
        .create_async()
        .await;

    let profiles = supabase_client(&server.url())
        .fetch_mentor_candidates(Some(&RecordId::from("cs101")), None)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(profiles.len(), 3);
    assert_eq!(profiles[1].id, RecordId::from("best"));
}

#[tokio::test]
async fn test_fetch_candidates_forwards_caller_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer user-jwt")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let profiles = supabase_client(&server.url())
        .fetch_mentor_candidates(None, Some("Bearer user-jwt"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(profiles.is_empty());
}

#[tokio::test]
async fn test_fetch_candidates_drops_undecodable_rows() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!([{ "full_name": "no id" }, { "id": 9, "is_available_as_mentor": true }]).to_string())
        .create_async()
        .await;

    let profiles = supabase_client(&server.url())
        .fetch_mentor_candidates(None, None)
        .await
        .unwrap();

    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, RecordId::Int(9));
}

#[tokio::test]
async fn test_fetch_candidates_errors() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let err = supabase_client(&server.url())
        .fetch_mentor_candidates(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SupabaseError::Unauthorized));

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"message":"not a list"}"#)
        .create_async()
        .await;

    let err = supabase_client(&server.url())
        .fetch_mentor_candidates(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SupabaseError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_falls_back_to_next_model() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .with_status(503)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({ "generationConfig": { "topK": 40 } })))
        .with_status(200)
        .with_body(gemini_answer("Recursion is a function calling itself."))
        .create_async()
        .await;
    let third = server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .expect(0)
        .create_async()
        .await;

    let text = gemini_client(&server.url(), Some("test-key"))
        .generate("Explain recursion", &GenerationOptions::default())
        .await
        .unwrap();

    assert_eq!(text, "Recursion is a function calling itself.");
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_generate_all_models_fail() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Regex(r":generateContent$".to_string()))
        .with_status(500)
        .expect(3)
        .create_async()
        .await;

    let err = gemini_client(&server.url(), Some("test-key"))
        .generate("hi", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::AllModelsFailed { attempts: 3, .. }));
}

#[tokio::test]
async fn test_generate_without_key() {
    let err = gemini_client("http://127.0.0.1:9", None)
        .generate("hi", &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::NotConfigured));
}

#[actix_web::test]
async fn test_match_mentors_endpoint() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::UrlEncoded("mentor_subjects.subject_id".into(), "eq.cs101".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(mentor_rows().to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server.url())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mentors/match")
        .set_json(json!({ "subjectId": "cs101" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let mentors = body["mentors"].as_array().unwrap();

    assert_eq!(mentors.len(), 2);
    assert_eq!(mentors[0]["id"], "best");
    assert_eq!(mentors[0]["matchScore"], 100);
    assert_eq!(mentors[0]["full_name"], "Meera");
    // 40 + 0 + 2
    assert_eq!(mentors[1]["id"], "slow");
    assert_eq!(mentors[1]["matchScore"], 42);
    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["skipped"][0]["id"], "unrated");
    assert_eq!(body["skipped"][0]["field"], "rating");
}

#[actix_web::test]
async fn test_match_mentors_requires_subject() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state("http://127.0.0.1:9")))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mentors/match")
        .set_json(json!({ "yearPreference": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid request");
}

#[actix_web::test]
async fn test_match_mentors_expertise_off_scale() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state("http://127.0.0.1:9")))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mentors/match")
        .set_json(json!({ "subjectId": "cs101", "expertiseLevel": 9 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
}

#[actix_web::test]
async fn test_match_mentors_store_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server.url())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mentors/match")
        .set_json(json!({ "subjectId": "cs101" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to match mentors");
    assert!(body["details"].as_str().unwrap().contains("500"));
}

#[actix_web::test]
async fn test_invalid_json_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state("http://127.0.0.1:9")))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/mentors/match")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_chat_endpoint() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_body(Matcher::Regex("asking about Data Structures".to_string()))
        .with_status(200)
        .with_body(gemini_answer("A stack is LIFO."))
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server.url())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/chat")
        .set_json(json!({ "message": "What is a stack?", "sessionId": "s-1", "subject": "Data Structures" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"], "A stack is LIFO.");
    assert_eq!(body["sessionId"], "s-1");
}

#[actix_web::test]
async fn test_chat_empty_answer_and_new_session() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .with_status(200)
        .with_body(json!({ "candidates": [] }).to_string())
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server.url())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/chat")
        .set_json(json!({ "message": "Hello?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["response"], campus_match::routes::chat::EMPTY_ANSWER_REPLY);
    assert!(uuid_like(body["sessionId"].as_str().unwrap()));
}

#[actix_web::test]
async fn test_chat_generation_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Regex(r":generateContent$".to_string()))
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server.url())))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/chat")
        .set_json(json!({ "message": "Hello?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to get AI response");
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state("http://127.0.0.1:9")))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

fn uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().filter(|c| *c == '-').count() == 4
}
