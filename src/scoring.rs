//! Lead quality scoring.
//!
//! Pure functions mapping a candidate's attributes to a 0-100 score and a
//! hot/warm/cold tier. Nothing here touches the database or the clock, so
//! repeated calls with the same input always produce the same output.

use crate::models::{Candidate, LeadStatus, SearchContext};

/// Every candidate starts from this score before bonuses.
pub const BASE_SCORE: i32 = 50;

/// Ceiling for the query/filter relevance bonus.
pub const MAX_RELEVANCE_BONUS: i32 = 35;

/// Title fragments that mark a senior contact. Matched case-sensitively as
/// substrings; the first hit wins, so "VP, Director of X" earns the bonus
/// once.
const SENIORITY_MARKERS: [&str; 6] = ["CEO", "CTO", "VP", "Director", "Head of", "Manager"];

/// Industries worth an extra bonus, matched as substrings of the
/// candidate's industry field.
const HIGH_VALUE_INDUSTRIES: [&str; 4] = ["Technology", "Software", "IT", "Tech"];

/// Compute the quality score for a candidate. Always in [0, 100].
pub fn score_candidate(candidate: &Candidate) -> i32 {
    let mut score = BASE_SCORE;

    // Completeness bonuses
    if candidate.title.is_some() {
        score += 10;
    }
    if candidate.company.is_some() {
        score += 10;
    }
    if candidate.linkedin_url.is_some() {
        score += 15;
    }
    if candidate.website.is_some() {
        score += 10;
    }
    if candidate.phone.is_some() {
        score += 5;
    }

    if let Some(ref title) = candidate.title {
        if SENIORITY_MARKERS.iter().any(|m| title.contains(m)) {
            score += 20;
        }
    }

    if let Some(ref industry) = candidate.industry {
        if HIGH_VALUE_INDUSTRIES.iter().any(|i| industry.contains(i)) {
            score += 10;
        }
    }

    score += candidate.relevance_bonus.clamp(0, MAX_RELEVANCE_BONUS);

    score.clamp(0, 100)
}

/// Derive the tier from a score: >= 80 hot, >= 60 warm, else cold.
pub fn status_for_score(score: i32) -> LeadStatus {
    if score >= 80 {
        LeadStatus::Hot
    } else if score >= 60 {
        LeadStatus::Warm
    } else {
        LeadStatus::Cold
    }
}

/// Compute the relevance bonus a candidate earns against the search
/// context that produced it.
///
/// Components stack additively: +20 for a job-title keyword match, +15 for
/// an industry filter match, +10 for a location filter match, +5 when the
/// search query appears in the company name. The sum is capped at
/// [`MAX_RELEVANCE_BONUS`].
pub fn relevance_bonus(candidate: &Candidate, ctx: &SearchContext) -> i32 {
    let mut bonus = 0;

    if let Some(ref title) = candidate.title {
        if ctx
            .filters
            .job_titles
            .iter()
            .any(|kw| contains_ci(title, kw))
        {
            bonus += 20;
        }
    }

    if let (Some(industry), Some(wanted)) =
        (candidate.industry.as_deref(), ctx.filters.industry.as_deref())
    {
        if contains_ci(industry, wanted) {
            bonus += 15;
        }
    }

    if let (Some(location), Some(wanted)) =
        (candidate.location.as_deref(), ctx.filters.location.as_deref())
    {
        if contains_ci(location, wanted) {
            bonus += 10;
        }
    }

    if let Some(ref company) = candidate.company {
        if !ctx.query.trim().is_empty() && contains_ci(company, &ctx.query) {
            bonus += 5;
        }
    }

    bonus.min(MAX_RELEVANCE_BONUS)
}

/// Case-insensitive substring containment. Empty needles never match.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
