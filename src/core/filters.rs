use crate::models::{CandidateQuery, MalformedCandidate, MentorProfile, RecordId};

/// Check if a profile is open to mentoring
///
/// Unavailable mentors are dropped before any other check.
#[inline]
pub fn is_available(profile: &MentorProfile) -> bool {
    profile.is_available_as_mentor
}

/// Check if a profile lists expertise in the requested subject
///
/// This is the primary eligibility gate.
#[inline]
pub fn matches_subject(profile: &MentorProfile, subject_id: &RecordId) -> bool {
    profile.expertise_for(subject_id).next().is_some()
}

/// Check the optional seniority and expertise lower bounds
///
/// Returns `Err` when a bound is set but the field it needs is missing.
/// With several entries for the subject, the highest level counts.
pub fn matches_query_constraints(
    profile: &MentorProfile,
    query: &CandidateQuery,
) -> Result<bool, MalformedCandidate> {
    if let Some(min_year) = query.min_year_of_study {
        let year = profile
            .year_of_study
            .ok_or_else(|| MalformedCandidate::missing(&profile.id, "year_of_study"))?;
        if year < min_year {
            return Ok(false);
        }
    }

    if let Some(min_level) = query.min_expertise_level {
        let level = profile
            .expertise_for(&query.subject_id)
            .filter_map(|e| e.expertise_level)
            .max()
            .ok_or_else(|| MalformedCandidate::missing(&profile.id, "expertise_level"))?;
        if level < min_level {
            return Ok(false);
        }
    }

    Ok(true)
}
