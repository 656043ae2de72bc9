use crate::models::{MalformedCandidate, MentorProfile, ScoreBreakdown, ScoringWeights};

/// Highest rating on the review scale
pub const MAX_RATING: f64 = 5.0;

/// Numeric inputs to the score, checked for presence and finiteness
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringInputs {
    pub rating: f64,
    pub response_time_minutes: f64,
    pub students_helped: f64,
}

/// Pull the scoring fields out of a profile
///
/// Missing or non-finite values make the candidate malformed. Out-of-range
/// values are scored as given unless `clamp` is set, in which case rating is
/// held to `0..=5` and the two counts to non-negative.
pub fn scoring_inputs(profile: &MentorProfile, clamp: bool) -> Result<ScoringInputs, MalformedCandidate> {
    let rating = profile
        .rating_average
        .ok_or_else(|| MalformedCandidate::missing(&profile.id, "rating"))?;
    if !rating.is_finite() {
        return Err(MalformedCandidate::not_finite(&profile.id, "rating"));
    }
    let response_time_minutes = profile
        .response_time_minutes
        .ok_or_else(|| MalformedCandidate::missing(&profile.id, "response_time_minutes"))?
        as f64;
    let students_helped = profile
        .students_helped
        .ok_or_else(|| MalformedCandidate::missing(&profile.id, "students_helped"))?
        as f64;

    let inputs = ScoringInputs {
        rating,
        response_time_minutes,
        students_helped,
    };

    Ok(if clamp { inputs.clamped() } else { inputs })
}

impl ScoringInputs {
    pub fn clamped(self) -> Self {
        Self {
            rating: self.rating.clamp(0.0, MAX_RATING),
            response_time_minutes: self.response_time_minutes.max(0.0),
            students_helped: self.students_helped.max(0.0),
        }
    }
}

/// Calculate a match score (0-100 for in-range inputs)
///
/// Scoring formula with default weights:
/// score = round(
///     (rating / 5) * 50 +                       # review average
///     max(0, (240 - response_min) / 240) * 30 + # faster = higher
///     min(students_helped / 100, 1) * 20        # experience, flat past 100
/// )
///
/// Rounding is half away from zero.
pub fn calculate_match_score(inputs: &ScoringInputs, weights: &ScoringWeights) -> (i64, ScoreBreakdown) {
    let breakdown = ScoreBreakdown {
        rating: rating_component(inputs.rating, weights),
        responsiveness: responsiveness_component(inputs.response_time_minutes, weights),
        experience: experience_component(inputs.students_helped, weights),
    };

    (breakdown.total().round() as i64, breakdown)
}

#[inline]
pub fn rating_component(rating: f64, weights: &ScoringWeights) -> f64 {
    (rating / MAX_RATING) * weights.rating
}

/// Linear decay to zero at the response time cap
#[inline]
pub fn responsiveness_component(response_time_minutes: f64, weights: &ScoringWeights) -> f64 {
    let cap = weights.response_time_cap_minutes;
    ((cap - response_time_minutes) / cap).max(0.0) * weights.responsiveness
}

/// Linear ramp up to the students-helped cap, flat after
#[inline]
pub fn experience_component(students_helped: f64, weights: &ScoringWeights) -> f64 {
    (students_helped / weights.students_helped_cap).min(1.0) * weights.experience
}
