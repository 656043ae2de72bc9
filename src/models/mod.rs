// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateQuery, MalformedCandidate, MatchRequest, MentorProfile, RecordId, ScoreBreakdown,
    ScoredMentor, ScoringWeights, SubjectExpertise, SubjectRef,
};
pub use requests::{ChatRequest, MatchMentorsRequest};
pub use responses::{ChatResponse, ErrorResponse, HealthResponse, MatchMentorsResponse};
