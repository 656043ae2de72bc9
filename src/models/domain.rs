use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Opaque record identifier as returned by the store (UUID string or integer key)
///
/// Ordering is total: integer ids sort before string ids, integers numerically,
/// strings lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// True for an empty or whitespace-only string id
    pub fn is_blank(&self) -> bool {
        match self {
            RecordId::Int(_) => false,
            RecordId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}

/// Display data for a subject joined onto an expertise entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// A mentor's expertise in one subject (a `mentor_subjects` row)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectExpertise {
    #[serde(alias = "subjectId")]
    pub subject_id: RecordId,
    #[serde(alias = "expertiseLevel", alias = "level", default)]
    pub expertise_level: Option<i32>,
    #[serde(rename = "subjects", alias = "subject", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectRef>,
}

/// Mentor candidate record as stored in `profiles`
///
/// Scoring fields are optional because the store may hold nulls; the ranker
/// reports such records as malformed instead of scoring them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: RecordId,
    #[serde(rename = "rating", alias = "ratingAverage", default)]
    pub rating_average: Option<f64>,
    #[serde(alias = "responseTimeMinutes", default)]
    pub response_time_minutes: Option<i64>,
    #[serde(alias = "studentsHelped", default)]
    pub students_helped: Option<i64>,
    #[serde(alias = "yearOfStudy", default)]
    pub year_of_study: Option<i32>,
    #[serde(rename = "mentor_subjects", alias = "subjectExpertise", default)]
    pub subject_expertise: Vec<SubjectExpertise>,
    #[serde(alias = "isAvailableAsMentor", default)]
    pub is_available_as_mentor: bool,
    /// Remaining profile columns (name, branch, bio, ...), passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MentorProfile {
    /// Minimal available profile, used by tests and benches to build candidates
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            rating_average: None,
            response_time_minutes: None,
            students_helped: None,
            year_of_study: None,
            subject_expertise: Vec::new(),
            is_available_as_mentor: true,
            extra: Map::new(),
        }
    }

    /// Expertise entries for the given subject
    pub fn expertise_for<'a>(
        &'a self,
        subject_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a SubjectExpertise> + 'a {
        self.subject_expertise
            .iter()
            .filter(move |e| &e.subject_id == subject_id)
    }
}

/// Caller's matching criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub subject_id: Option<RecordId>,
    pub min_year_of_study: Option<i32>,
    pub min_expertise_level: Option<i32>,
}

impl MatchRequest {
    pub fn for_subject(subject_id: impl Into<RecordId>) -> Self {
        Self {
            subject_id: Some(subject_id.into()),
            ..Self::default()
        }
    }

    pub fn with_min_year(mut self, year: i32) -> Self {
        self.min_year_of_study = Some(year);
        self
    }

    pub fn with_min_expertise(mut self, level: i32) -> Self {
        self.min_expertise_level = Some(level);
        self
    }
}

/// Validated form of a [`MatchRequest`] used by the eligibility filters
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    pub subject_id: RecordId,
    pub min_year_of_study: Option<i32>,
    pub min_expertise_level: Option<i32>,
}

/// Unrounded score components, kept so a match score can be explained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rating: f64,
    pub responsiveness: f64,
    pub experience: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.rating + self.responsiveness + self.experience
    }
}

/// Ranked mentor: the candidate record plus its derived score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMentor {
    #[serde(flatten)]
    pub mentor: MentorProfile,
    #[serde(rename = "matchScore")]
    pub match_score: i64,
    #[serde(rename = "scoreBreakdown")]
    pub breakdown: ScoreBreakdown,
}

/// Candidate that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("candidate {id} is malformed: {field} {reason}")]
pub struct MalformedCandidate {
    pub id: RecordId,
    pub field: &'static str,
    pub reason: &'static str,
}

impl MalformedCandidate {
    pub fn missing(id: &RecordId, field: &'static str) -> Self {
        Self {
            id: id.clone(),
            field,
            reason: "is missing",
        }
    }

    pub fn not_finite(id: &RecordId, field: &'static str) -> Self {
        Self {
            id: id.clone(),
            field,
            reason: "is not a finite number",
        }
    }
}

/// Scoring weights and caps
///
/// The defaults are the published formula: rating up to 50 points,
/// responsiveness up to 30 (zero at 240 minutes), experience up to 20
/// (capped at 100 students helped).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub rating: f64,
    pub responsiveness: f64,
    pub experience: f64,
    pub response_time_cap_minutes: f64,
    pub students_helped_cap: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 50.0,
            responsiveness: 30.0,
            experience: 20.0,
            response_time_cap_minutes: 240.0,
            students_helped_cap: 100.0,
        }
    }
}
