// Core algorithm exports
pub mod filters;
pub mod ranker;
pub mod scoring;

pub use filters::{is_available, matches_query_constraints, matches_subject};
pub use ranker::{rank_mentors, MentorRanker, RankError, Ranking};
pub use scoring::{calculate_match_score, scoring_inputs, ScoringInputs};
