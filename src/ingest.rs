//! Deduplication and ingestion coordinator.
//!
//! Takes a batch of candidates, checks each against the persisted leads for
//! duplicates (exact email match OR case-insensitive company-name
//! containment), scores the survivors and persists them, updating the crawl
//! session's progress counter after every candidate.
//!
//! The persistence collaborators are injected through [`LeadRepository`] and
//! [`SessionTracker`], so the whole workflow is unit-testable with in-memory
//! implementations.

use crate::errors::AppError;
use crate::models::{
    Candidate, CrawlSession, IngestSummary, Lead, LeadSource, NewLead, SearchContext,
    SessionPatch, SessionStatus,
};
use crate::scoring;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

/// Read/write access to persisted leads, as needed by ingestion.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Duplicate-check query: leads whose email exactly matches, or (when a
    /// company is given) whose company name contains it case-insensitively.
    async fn find_similar_leads(
        &self,
        email: &str,
        company: Option<&str>,
    ) -> Result<Vec<Lead>, AppError>;

    /// Persist one lead; the store assigns id and timestamps.
    async fn create_lead(&self, lead: NewLead) -> Result<Lead, AppError>;
}

/// Progress/status tracking for ingestion batches. Purely an observability
/// side-channel; scoring and dedup do not depend on it.
#[async_trait]
pub trait SessionTracker: Send + Sync {
    async fn create_session(
        &self,
        source: LeadSource,
        query: &str,
    ) -> Result<CrawlSession, AppError>;

    async fn update_session(&self, id: Uuid, patch: SessionPatch) -> Result<(), AppError>;
}

/// Run one ingestion batch against an already-created session.
///
/// Candidates are processed strictly in the order supplied, one persistence
/// round-trip at a time. A failure on a single candidate is logged and
/// skipped; the batch continues and still completes. Only a session-level
/// failure (the tracker itself unreachable) aborts the batch, and the
/// caller is expected to mark the session failed — see [`run_session`].
///
/// `total_processed` counts every considered candidate, including
/// duplicates, invalid ones and write failures, so it always ends equal to
/// `total_found` on a completed batch.
pub async fn run_ingestion<R, S>(
    repo: &R,
    sessions: &S,
    session_id: Uuid,
    candidates: Vec<Candidate>,
    source: LeadSource,
    ctx: &SearchContext,
) -> Result<IngestSummary, AppError>
where
    R: LeadRepository + ?Sized,
    S: SessionTracker + ?Sized,
{
    let total_found = candidates.len();

    sessions
        .update_session(
            session_id,
            SessionPatch {
                total_found: Some(total_found as i32),
                ..Default::default()
            },
        )
        .await?;

    let mut processed: usize = 0;
    let mut saved: usize = 0;

    for candidate in &candidates {
        match ingest_one(repo, candidate, source, ctx).await {
            Ok(true) => saved += 1,
            Ok(false) => {}
            Err(e) => {
                // Per-candidate failure: recover locally, keep going.
                tracing::warn!(
                    "Failed to ingest candidate '{}': {}",
                    candidate.email,
                    e
                );
            }
        }

        processed += 1;
        sessions
            .update_session(
                session_id,
                SessionPatch {
                    total_processed: Some(processed as i32),
                    ..Default::default()
                },
            )
            .await?;
    }

    sessions
        .update_session(
            session_id,
            SessionPatch {
                status: Some(SessionStatus::Completed),
                completed_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(
        "Ingestion batch completed: {}/{} candidates saved (session {})",
        saved,
        total_found,
        session_id
    );

    Ok(IngestSummary {
        saved_count: saved,
        total_found,
        total_processed: processed,
    })
}

/// [`run_ingestion`] plus failure bookkeeping: on a batch-fatal error the
/// session is marked `failed` with a completion timestamp, preserving
/// whatever progress was already recorded.
pub async fn run_session<R, S>(
    repo: &R,
    sessions: &S,
    session_id: Uuid,
    candidates: Vec<Candidate>,
    source: LeadSource,
    ctx: &SearchContext,
) -> Result<IngestSummary, AppError>
where
    R: LeadRepository + ?Sized,
    S: SessionTracker + ?Sized,
{
    match run_ingestion(repo, sessions, session_id, candidates, source, ctx).await {
        Ok(summary) => Ok(summary),
        Err(e) => {
            tracing::error!("Ingestion for session {} failed: {}", session_id, e);
            let patch = SessionPatch {
                status: Some(SessionStatus::Failed),
                completed_at: Some(Utc::now()),
                ..Default::default()
            };
            if let Err(mark_err) = sessions.update_session(session_id, patch).await {
                tracing::error!(
                    "Could not mark session {} as failed: {}",
                    session_id,
                    mark_err
                );
            }
            Err(e)
        }
    }
}

/// Process a single candidate. Returns `Ok(true)` when a lead was
/// persisted, `Ok(false)` on a skip (invalid or duplicate).
async fn ingest_one<R>(
    repo: &R,
    candidate: &Candidate,
    source: LeadSource,
    ctx: &SearchContext,
) -> Result<bool, AppError>
where
    R: LeadRepository + ?Sized,
{
    if candidate.email.trim().is_empty() || !is_valid_email(&candidate.email) {
        tracing::warn!(
            "Skipping candidate '{}' with unusable email '{}'",
            candidate.name,
            candidate.email
        );
        return Ok(false);
    }

    let existing = repo
        .find_similar_leads(&candidate.email, candidate.company.as_deref())
        .await?;
    if !existing.is_empty() {
        tracing::debug!(
            "Skipping duplicate candidate '{}' ({} existing match(es))",
            candidate.email,
            existing.len()
        );
        return Ok(false);
    }

    // An externally supplied bonus survives; otherwise it comes from the
    // search context the batch was crawled with.
    let mut scored = candidate.clone();
    scored.relevance_bonus = scored
        .relevance_bonus
        .max(scoring::relevance_bonus(candidate, ctx));

    let score = scoring::score_candidate(&scored);
    let status = scoring::status_for_score(score);

    let lead = NewLead {
        name: scored.name,
        email: scored.email,
        title: scored.title,
        company: scored.company,
        phone: scored.phone,
        linkedin_url: scored.linkedin_url,
        website: scored.website,
        industry: scored.industry,
        location: scored.location,
        company_size: scored.company_size,
        notes: None,
        source,
        score,
        status,
        date_added: Utc::now().date_naive(),
    };

    repo.create_lead(lead).await?;
    Ok(true)
}

/// Validate an email address.
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Fake/placeholder patterns (repeated digits like 9999, 1111)
/// - Minimum length requirements
/// - Valid domain structure
pub fn is_valid_email(email: &str) -> bool {
    // Basic checks
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // Detect fake patterns (repeated digits)
    let fake_patterns = ["999999", "111111", "000000", "123456789"];

    for pattern in &fake_patterns {
        if email.contains(pattern) {
            tracing::warn!(
                "Invalid email detected (fake pattern '{}'): {}",
                pattern,
                email
            );
            return false;
        }
    }

    // RFC 5322 simplified email regex
    // Matches: local@domain.tld
    let email_regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();

    if !email_regex.is_match(email) {
        tracing::warn!("Invalid email format: {}", email);
        return false;
    }

    true
}
