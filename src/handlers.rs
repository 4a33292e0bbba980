use crate::config::Config;
use crate::crawler::{CandidateSource, StubCrawler};
use crate::db_storage::{CampaignStorage, LeadStorage, SessionStorage};
use crate::errors::AppError;
use crate::ingest::{self, is_valid_email, LeadRepository, SessionTracker};
use crate::models::*;
use crate::scoring;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use moka::future::Cache;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
    /// Guard cache preventing a second concurrent crawl session for the
    /// same source+query pair. Key: "source:query", value: start epoch.
    pub crawl_guard: Cache<String, i64>,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "leadflow-api",
            "version": "0.1.0"
        })),
    )
}

// ============ Leads ============

/// GET /api/v1/leads
pub async fn list_leads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeadQueryParams>,
) -> Result<Json<Vec<Lead>>, AppError> {
    tracing::info!("GET /leads - params: {:?}", params);

    let storage = LeadStorage::new(state.db.clone());
    let leads = storage.list_leads(&params).await?;

    Ok(Json(leads))
}

/// POST /api/v1/leads
///
/// Manual lead creation. When the payload carries no explicit score the
/// server runs the same scoring engine ingestion uses; the status is always
/// derived from the final score.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    tracing::info!("POST /leads - email: {}", req.email);

    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            req.email
        )));
    }

    let candidate = Candidate {
        name: req.name.clone(),
        email: req.email.clone(),
        title: req.title.clone(),
        company: req.company.clone(),
        industry: req.industry.clone(),
        location: req.location.clone(),
        phone: req.phone.clone(),
        website: req.website.clone(),
        linkedin_url: req.linkedin_url.clone(),
        company_size: req.company_size.clone(),
        relevance_bonus: 0,
    };

    let score = req
        .score
        .map(|s| s.clamp(0, 100))
        .unwrap_or_else(|| scoring::score_candidate(&candidate));
    let status = scoring::status_for_score(score);

    let lead = NewLead {
        name: req.name,
        email: req.email,
        title: req.title,
        company: req.company,
        phone: req.phone,
        linkedin_url: req.linkedin_url,
        website: req.website,
        industry: req.industry,
        location: req.location,
        company_size: req.company_size,
        notes: req.notes,
        source: req.source.unwrap_or(LeadSource::Manual),
        score,
        status,
        date_added: Utc::now().date_naive(),
    };

    let storage = LeadStorage::new(state.db.clone());
    let created = storage.create_lead(lead).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/leads/:id
pub async fn get_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("GET /leads/{}", id);

    let storage = LeadStorage::new(state.db.clone());
    let lead = storage
        .get_lead(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))?;

    Ok(Json(lead))
}

/// PATCH /api/v1/leads/:id
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(mut req): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>, AppError> {
    tracing::info!("PATCH /leads/{}", id);

    if let Some(ref email) = req.email {
        if !is_valid_email(email) {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
    }

    // Keep the score/status invariant when only the score changes.
    if let Some(score) = req.score {
        let clamped = score.clamp(0, 100);
        req.score = Some(clamped);
        if req.status.is_none() {
            req.status = Some(scoring::status_for_score(clamped));
        }
    }

    let storage = LeadStorage::new(state.db.clone());
    let updated = storage
        .update_lead(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", id)))?;

    Ok(Json(updated))
}

/// DELETE /api/v1/leads/:id
pub async fn delete_lead(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tracing::info!("DELETE /leads/{}", id);

    let storage = LeadStorage::new(state.db.clone());
    if !storage.delete_lead(id).await? {
        return Err(AppError::NotFound(format!("Lead with id {} not found", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/leads/stats
pub async fn lead_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LeadStats>, AppError> {
    let storage = LeadStorage::new(state.db.clone());
    let stats = storage.lead_stats().await?;

    Ok(Json(stats))
}

// ============ Crawling ============

/// POST /api/v1/crawl
///
/// Creates a running session, kicks the ingestion off in a background task
/// (the original fire-and-forget behavior) and returns the session
/// immediately. Progress is observable through GET /crawl/sessions.
pub async fn start_crawl(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CrawlRequest>,
) -> Result<(StatusCode, Json<CrawlSession>), AppError> {
    tracing::info!(
        "POST /crawl - source: {}, query: '{}'",
        req.source.as_str(),
        req.search_query
    );

    let guard_key = format!("{}:{}", req.source.as_str(), req.search_query);
    if state.crawl_guard.get(&guard_key).await.is_some() {
        return Err(AppError::BadRequest(
            "A crawl for this source and query is already running".to_string(),
        ));
    }
    state
        .crawl_guard
        .insert(guard_key.clone(), Utc::now().timestamp())
        .await;

    let config = CrawlConfig {
        source: req.source,
        search_query: req.search_query,
        max_results: Some(
            req.max_results
                .unwrap_or(crate::crawler::DEFAULT_MAX_RESULTS)
                .min(state.config.max_crawl_results),
        ),
        filters: req.filters.unwrap_or_default(),
    };

    let sessions = SessionStorage::new(state.db.clone());
    let session = sessions
        .create_session(config.source, &config.search_query)
        .await?;

    let session_id = session.id;
    let db = state.db.clone();
    let crawl_guard = state.crawl_guard.clone();
    tokio::spawn(async move {
        let repo = LeadStorage::new(db.clone());
        let sessions = SessionStorage::new(db);
        let ctx = SearchContext::from(&config);
        let source = config.source;

        let result = match StubCrawler.fetch_candidates(&config).await {
            Ok(candidates) => {
                ingest::run_session(&repo, &sessions, session_id, candidates, source, &ctx).await
            }
            Err(e) => {
                tracing::error!("Candidate source failed for session {}: {}", session_id, e);
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
        };

        if let Ok(summary) = result {
            tracing::info!(
                "Crawl session {} finished: {} saved of {} found",
                session_id,
                summary.saved_count,
                summary.total_found
            );
        }

        crawl_guard.invalidate(&guard_key).await;
    });

    Ok((StatusCode::ACCEPTED, Json(session)))
}

/// GET /api/v1/crawl/sessions
pub async fn get_crawl_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionQueryParams>,
) -> Result<Json<Vec<CrawlSession>>, AppError> {
    let storage = SessionStorage::new(state.db.clone());
    let sessions = storage.recent_sessions(params.limit.unwrap_or(10)).await?;

    Ok(Json(sessions))
}

/// GET /api/v1/crawl/stats
pub async fn get_crawl_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CrawlStats>, AppError> {
    let storage = SessionStorage::new(state.db.clone());
    let stats = storage.crawl_stats().await?;

    Ok(Json(stats))
}

// ============ Email campaigns ============

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CampaignQueryParams>,
) -> Result<Json<Vec<EmailCampaign>>, AppError> {
    let storage = CampaignStorage::new(state.db.clone());
    let campaigns = storage.list_campaigns(&params).await?;

    Ok(Json(campaigns))
}

/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<EmailCampaign>), AppError> {
    if req.name.trim().is_empty() || req.subject.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and subject are required".to_string(),
        ));
    }

    let storage = CampaignStorage::new(state.db.clone());
    let campaign = storage
        .create_campaign(
            &req.name,
            &req.subject,
            &req.content,
            req.status.as_deref().unwrap_or("draft"),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

/// PATCH /api/v1/campaigns/:id
pub async fn update_campaign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCampaignRequest>,
) -> Result<Json<EmailCampaign>, AppError> {
    let storage = CampaignStorage::new(state.db.clone());
    let campaign = storage
        .update_campaign(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign with id {} not found", id)))?;

    Ok(Json(campaign))
}

/// POST /api/v1/campaigns/:id/send
///
/// Simulated delivery: verifies campaign and lead exist, writes an
/// email_logs row and bumps the campaign's sent counter. No mail leaves
/// the building.
pub async fn send_campaign_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendEmailRequest>,
) -> Result<(StatusCode, Json<EmailLog>), AppError> {
    let campaigns = CampaignStorage::new(state.db.clone());
    let campaign = campaigns
        .get_campaign(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Campaign with id {} not found", id)))?;

    let leads = LeadStorage::new(state.db.clone());
    let lead = leads
        .get_lead(req.lead_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Lead with id {} not found", req.lead_id)))?;

    tracing::info!(
        "Simulated send of campaign '{}' to {} <{}>",
        campaign.name,
        lead.name,
        lead.email
    );

    let log = campaigns.log_send(id, lead.id).await?;

    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /api/v1/campaigns/stats
pub async fn campaign_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CampaignStats>, AppError> {
    let storage = CampaignStorage::new(state.db.clone());
    let stats = storage.email_stats().await?;

    Ok(Json(stats))
}
