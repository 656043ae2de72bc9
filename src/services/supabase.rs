use crate::models::{MentorProfile, RecordId};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Columns requested for each candidate: the profile plus its subject expertise
const MENTOR_SELECT: &str =
    "*,mentor_subjects!inner(subject_id,expertise_level,subjects(name,code))";

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Supabase REST client for the mentor store
///
/// Reads `profiles` joined to `mentor_subjects` through PostgREST. The
/// caller's bearer token is forwarded so row-level security applies as it
/// would for the caller; the anon key is used when there is none.
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    client: Client,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(base_url: String, anon_key: String, timeout: Duration) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            anon_key,
            client,
        })
    }

    /// Build the PostgREST URL for available mentors, optionally limited to a subject
    pub fn mentors_url(&self, subject_id: Option<&RecordId>) -> String {
        let mut url = format!(
            "{}/rest/v1/profiles?select={}&is_available_as_mentor=eq.true",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(MENTOR_SELECT),
        );

        if let Some(subject) = subject_id {
            let filter = format!("eq.{}", subject);
            url.push_str("&mentor_subjects.subject_id=");
            url.push_str(&urlencoding::encode(&filter));
        }

        url.push_str("&order=rating.desc,response_time_minutes.asc");
        url
    }

    /// Fetch mentor candidates
    ///
    /// `authorization` is the caller's raw `Authorization` header value.
    /// Rows that do not decode as a [`MentorProfile`] are dropped with a warning.
    pub async fn fetch_mentor_candidates(
        &self,
        subject_id: Option<&RecordId>,
        authorization: Option<&str>,
    ) -> Result<Vec<MentorProfile>, SupabaseError> {
        let url = self.mentors_url(subject_id);
        let bearer = match authorization {
            Some(value) => value.to_string(),
            None => format!("Bearer {}", self.anon_key),
        };

        tracing::debug!("Fetching mentor candidates from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.anon_key)
            .header("Authorization", bearer)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SupabaseError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to fetch mentor candidates: {} - {}", status, body);
            return Err(SupabaseError::ApiError(format!(
                "Failed to fetch mentor candidates: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let rows = json
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected an array of profiles".into()))?;

        let profiles: Vec<MentorProfile> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value::<MentorProfile>(row.clone()) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    let id = row.get("id").cloned().unwrap_or(Value::Null);
                    tracing::warn!("Dropping undecodable profile row {}: {}", id, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} mentor candidates ({} rows)", profiles.len(), rows.len());

        Ok(profiles)
    }
}
