use std::cmp::Ordering;
use thiserror::Error;

use crate::models::{
    CandidateQuery, MalformedCandidate, MatchRequest, MentorProfile, ScoredMentor, ScoringWeights,
};
use crate::core::{
    filters::{is_available, matches_query_constraints, matches_subject},
    scoring::{calculate_match_score, scoring_inputs},
};

/// Errors returned by the ranking engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("invalid match request: {0}")]
    InvalidRequest(String),
}

impl CandidateQuery {
    /// Validate a request; a subject is mandatory
    pub fn from_request(request: &MatchRequest) -> Result<Self, RankError> {
        let subject_id = match &request.subject_id {
            Some(id) if !id.is_blank() => id.clone(),
            Some(_) => return Err(RankError::InvalidRequest("subjectId must not be blank".into())),
            None => return Err(RankError::InvalidRequest("subjectId is required".into())),
        };

        Ok(Self {
            subject_id,
            min_year_of_study: request.min_year_of_study,
            min_expertise_level: request.min_expertise_level,
        })
    }
}

/// Result of a ranking pass
#[derive(Debug, Clone)]
pub struct Ranking {
    pub mentors: Vec<ScoredMentor>,
    pub skipped: Vec<MalformedCandidate>,
    pub total_candidates: usize,
}

/// Mentor ranking engine
///
/// # Pipeline Stages
/// 1. Availability filter
/// 2. Subject gate
/// 3. Seniority / expertise bounds
/// 4. Scoring and ordering
///
/// Ordering is by match score descending, then rating descending, then id
/// ascending, so equal inputs always produce the same order.
#[derive(Debug, Clone, Copy)]
pub struct MentorRanker {
    weights: ScoringWeights,
    clamp_inputs: bool,
}

impl MentorRanker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            clamp_inputs: false,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Clamp rating and counts to their valid domains before scoring
    pub fn with_input_clamping(mut self, clamp: bool) -> Self {
        self.clamp_inputs = clamp;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank candidates for a request
    ///
    /// Malformed candidates are logged and returned in `skipped`; the rest of
    /// the pool is still ranked.
    pub fn rank(
        &self,
        candidates: &[MentorProfile],
        request: &MatchRequest,
    ) -> Result<Ranking, RankError> {
        let query = CandidateQuery::from_request(request)?;
        let mut skipped = Vec::new();

        let mut mentors: Vec<ScoredMentor> = candidates
            .iter()
            .filter(|profile| is_available(profile))
            .filter(|profile| matches_subject(profile, &query.subject_id))
            .filter_map(|profile| match self.score_candidate(profile, &query) {
                Ok(scored) => scored,
                Err(malformed) => {
                    tracing::warn!("Skipping mentor candidate: {}", malformed);
                    skipped.push(malformed);
                    None
                }
            })
            .collect();

        mentors.sort_by(compare_ranked);

        tracing::debug!(
            "Ranked {} of {} candidates for subject {} ({} skipped)",
            mentors.len(),
            candidates.len(),
            query.subject_id,
            skipped.len()
        );

        Ok(Ranking {
            mentors,
            skipped,
            total_candidates: candidates.len(),
        })
    }

    fn score_candidate(
        &self,
        profile: &MentorProfile,
        query: &CandidateQuery,
    ) -> Result<Option<ScoredMentor>, MalformedCandidate> {
        if !matches_query_constraints(profile, query)? {
            return Ok(None);
        }

        let inputs = scoring_inputs(profile, self.clamp_inputs)?;
        let (match_score, breakdown) = calculate_match_score(&inputs, &self.weights);

        Ok(Some(ScoredMentor {
            mentor: profile.clone(),
            match_score,
            breakdown,
        }))
    }
}

impl Default for MentorRanker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn compare_ranked(a: &ScoredMentor, b: &ScoredMentor) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| rating_key(b).total_cmp(&rating_key(a)))
        .then_with(|| a.mentor.id.cmp(&b.mentor.id))
}

/// Raw average rating; scored mentors always carry a finite one
fn rating_key(scored: &ScoredMentor) -> f64 {
    scored.mentor.rating_average.unwrap_or(f64::NEG_INFINITY)
}

/// Rank mentors with the default weights, returning only the ordered list
pub fn rank_mentors(
    candidates: &[MentorProfile],
    request: &MatchRequest,
) -> Result<Vec<ScoredMentor>, RankError> {
    MentorRanker::default()
        .rank(candidates, request)
        .map(|ranking| ranking.mentors)
}
