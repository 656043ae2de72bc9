use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{MatchRequest, RecordId};

/// Request to rank mentors for a subject
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchMentorsRequest {
    #[serde(alias = "subject_id", rename = "subjectId", default)]
    pub subject_id: Option<RecordId>,
    #[validate(range(min = 0))]
    #[serde(alias = "year_preference", rename = "yearPreference", default)]
    pub year_preference: Option<i32>,
    #[validate(range(min = 0, max = 5))]
    #[serde(alias = "expertise_level", rename = "expertiseLevel", default)]
    pub expertise_level: Option<i32>,
}

impl From<MatchMentorsRequest> for MatchRequest {
    /// A zero year or level means "no preference"
    fn from(req: MatchMentorsRequest) -> Self {
        MatchRequest {
            subject_id: req.subject_id,
            min_year_of_study: req.year_preference.filter(|y| *y > 0),
            min_expertise_level: req.expertise_level.filter(|l| *l > 0),
        }
    }
}

/// Request to ask the academic assistant a question
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(alias = "session_id", rename = "sessionId", default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}
