use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============ Enumerations ============

/// Acquisition channel a lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// Scraped from LinkedIn profiles.
    Linkedin,
    /// Scraped from company websites.
    CompanyWebsites,
    /// Scraped from business directories.
    Directories,
    /// Scraped from social media.
    SocialMedia,
    /// Referred by an existing contact.
    Referrals,
    /// Entered by hand through the API.
    Manual,
}

impl LeadSource {
    /// Canonical text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Linkedin => "linkedin",
            LeadSource::CompanyWebsites => "company_websites",
            LeadSource::Directories => "directories",
            LeadSource::SocialMedia => "social_media",
            LeadSource::Referrals => "referrals",
            LeadSource::Manual => "manual",
        }
    }
}

/// Quality tier derived from the numeric score.
///
/// The mapping is fixed: score >= 80 is hot, >= 60 is warm, anything
/// below is cold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl LeadStatus {
    /// Canonical text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "hot",
            LeadStatus::Warm => "warm",
            LeadStatus::Cold => "cold",
        }
    }
}

/// Lifecycle state of a crawl session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Completed,
    Failed,
}

impl SessionStatus {
    /// Canonical text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

// ============ Database Models ============

/// A persisted sales prospect.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lead {
    /// Unique identifier, assigned by the database.
    pub id: Uuid,
    /// Full name of the contact.
    pub name: String,
    /// Email address. Used for duplicate detection; uniqueness is not
    /// enforced at the schema level.
    pub email: String,
    /// Job title.
    pub title: Option<String>,
    /// Company name.
    pub company: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// LinkedIn profile URL.
    pub linkedin_url: Option<String>,
    /// Company or personal website.
    pub website: Option<String>,
    /// Industry sector.
    pub industry: Option<String>,
    /// Geographic location.
    pub location: Option<String>,
    /// Company headcount bracket (e.g. "50-200").
    pub company_size: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Acquisition channel (see [`LeadSource`]).
    pub source: String,
    /// Quality score in [0, 100].
    pub score: i32,
    /// Quality tier derived from the score at creation time.
    pub status: String,
    /// Calendar date the lead was added.
    pub date_added: NaiveDate,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of last update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// A lead about to be persisted; the database assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub company_size: Option<String>,
    pub notes: Option<String>,
    pub source: LeadSource,
    pub score: i32,
    pub status: LeadStatus,
    pub date_added: NaiveDate,
}

/// An unvalidated contact produced by a candidate source, not yet persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    pub company_size: Option<String>,
    /// Query/filter relevance bonus applied on top of the base score,
    /// capped at [`crate::scoring::MAX_RELEVANCE_BONUS`].
    #[serde(default)]
    pub relevance_bonus: i32,
}

/// Progress-tracking record for one ingestion batch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CrawlSession {
    /// Unique identifier.
    pub id: Uuid,
    /// Declared source of the batch.
    pub source: String,
    /// Search query the batch was produced from.
    pub search_query: Option<String>,
    /// Number of candidates found for this batch.
    pub total_found: i32,
    /// Number of candidates considered so far. Monotonically
    /// non-decreasing, never exceeds `total_found`.
    pub total_processed: i32,
    /// running | completed | failed.
    pub status: String,
    /// Timestamp the session started.
    pub started_at: DateTime<Utc>,
    /// Timestamp the session completed or failed.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial update applied to a crawl session. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub total_found: Option<i32>,
    pub total_processed: Option<i32>,
    pub status: Option<SessionStatus>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// An outreach email campaign.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailCampaign {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub content: String,
    /// draft | active | completed | paused.
    pub status: String,
    pub sent_count: i32,
    pub open_rate: f64,
    pub click_rate: f64,
    pub reply_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One recorded email send to a lead.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EmailLog {
    pub id: Uuid,
    pub campaign_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    pub sent_at: DateTime<Utc>,
    pub opened_at: Option<DateTime<Utc>>,
    pub clicked_at: Option<DateTime<Utc>>,
    pub replied_at: Option<DateTime<Utc>>,
    /// sent | opened | clicked | replied | bounced.
    pub status: String,
}

// ============ Crawl Configuration ============

/// Optional filters narrowing a crawl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlFilters {
    pub industry: Option<String>,
    pub location: Option<String>,
    pub company_size: Option<String>,
    #[serde(default)]
    pub job_titles: Vec<String>,
}

/// Configuration for one candidate-acquisition run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub source: LeadSource,
    pub search_query: String,
    pub max_results: Option<usize>,
    pub filters: CrawlFilters,
}

/// The query and filters a batch was searched with; drives the
/// relevance bonus during scoring.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub query: String,
    pub filters: CrawlFilters,
}

impl From<&CrawlConfig> for SearchContext {
    fn from(config: &CrawlConfig) -> Self {
        Self {
            query: config.search_query.clone(),
            filters: config.filters.clone(),
        }
    }
}

// ============ API Request/Response Models ============

/// Query parameters for listing leads.
#[derive(Debug, Deserialize)]
pub struct LeadQueryParams {
    /// Matches against name, email and company (case-insensitive).
    pub search: Option<String>,
    /// Filter by status; "all" disables the filter.
    pub status: Option<String>,
    /// Filter by source; "all" disables the filter.
    pub source: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request payload for creating a lead by hand.
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub company_size: Option<String>,
    pub notes: Option<String>,
    /// Defaults to `manual` when omitted.
    pub source: Option<LeadSource>,
    /// When omitted the server scores the payload itself.
    pub score: Option<i32>,
}

/// Request payload for a partial lead update.
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub company_size: Option<String>,
    pub notes: Option<String>,
    pub score: Option<i32>,
    pub status: Option<LeadStatus>,
}

/// Request payload that triggers a crawl batch.
#[derive(Debug, Deserialize)]
pub struct CrawlRequest {
    pub source: LeadSource,
    pub search_query: String,
    pub max_results: Option<usize>,
    pub filters: Option<CrawlFilters>,
}

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Leads actually persisted (duplicates and failures excluded).
    pub saved_count: usize,
    /// Candidates supplied to the batch.
    pub total_found: usize,
    /// Candidates considered, including skipped and failed ones.
    pub total_processed: usize,
}

/// Per-source lead count.
#[derive(Debug, Serialize)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// Leads created on one calendar day.
#[derive(Debug, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Aggregate lead statistics for the dashboard.
#[derive(Debug, Serialize)]
pub struct LeadStats {
    pub total_leads: i64,
    pub hot_leads: i64,
    pub warm_leads: i64,
    pub cold_leads: i64,
    pub average_score: f64,
    pub source_counts: Vec<SourceCount>,
    pub daily_counts: Vec<DailyCount>,
    pub conversion_rate: f64,
}

/// Aggregate crawl-session statistics.
#[derive(Debug, Serialize)]
pub struct CrawlStats {
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub total_found: i64,
    pub total_processed: i64,
    pub success_rate: f64,
}

/// Query parameters for listing campaigns.
#[derive(Debug, Deserialize)]
pub struct CampaignQueryParams {
    pub status: Option<String>,
    /// Matches against name and subject (case-insensitive).
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request payload for creating a campaign.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub subject: String,
    pub content: String,
    /// Defaults to `draft` when omitted.
    pub status: Option<String>,
}

/// Request payload for a partial campaign update.
#[derive(Debug, Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
}

/// Request payload for sending a campaign email to one lead.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub lead_id: Uuid,
}

/// Aggregate email-campaign statistics.
#[derive(Debug, Serialize)]
pub struct CampaignStats {
    pub total_campaigns: i64,
    pub active_campaigns: i64,
    pub total_sent: i64,
    pub total_opened: i64,
    pub total_clicked: i64,
    pub total_replied: i64,
    pub open_rate: f64,
    pub click_rate: f64,
    pub reply_rate: f64,
}

/// Query parameter for listing crawl sessions.
#[derive(Debug, Deserialize)]
pub struct SessionQueryParams {
    pub limit: Option<i64>,
}
