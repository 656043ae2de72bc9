//! CampusBuddy matching service
//!
//! This library provides the mentor ranking engine used by CampusBuddy and the
//! HTTP service around it: a Supabase-backed candidate supplier, the ranking
//! endpoint and the doubt-resolution chat endpoint.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank_mentors, MentorRanker, RankError, Ranking};
pub use crate::models::{MatchRequest, MentorProfile, RecordId, ScoredMentor, ScoringWeights, SubjectExpertise};
