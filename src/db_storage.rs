//! Database storage services for leads, crawl sessions and campaigns.
//!
//! Each service wraps the shared pool and exposes the queries one area of
//! the API needs. [`LeadStorage`] and [`SessionStorage`] also implement the
//! ingestion traits so the coordinator can run against them directly.

use crate::errors::{AppError, ResultExt};
use crate::ingest::{LeadRepository, SessionTracker};
use crate::models::{
    CampaignQueryParams, CampaignStats, CrawlSession, CrawlStats, DailyCount, EmailCampaign,
    EmailLog, Lead, LeadQueryParams, LeadSource, LeadStats, NewLead, SessionPatch, SourceCount,
    UpdateCampaignRequest, UpdateLeadRequest,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 50;

// ============ Leads ============

/// Storage operations on the `leads` table.
pub struct LeadStorage {
    pool: PgPool,
}

impl LeadStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List leads, newest first, with optional search and filters.
    pub async fn list_leads(&self, params: &LeadQueryParams) -> Result<Vec<Lead>, AppError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM leads WHERE 1=1");

        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR company ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        if let Some(status) = params.status.as_deref().filter(|s| *s != "all") {
            qb.push(" AND status = ").push_bind(status.to_string());
        }

        if let Some(source) = params.source.as_deref().filter(|s| *s != "all") {
            qb.push(" AND source = ").push_bind(source.to_string());
        }

        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(params.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(params.offset.unwrap_or(0));

        let leads = qb
            .build_query_as::<Lead>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(leads)
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(lead)
    }

    /// Partial update; `None` fields keep their current value. Returns
    /// `None` when the lead does not exist.
    pub async fn update_lead(
        &self,
        id: Uuid,
        updates: &UpdateLeadRequest,
    ) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                title = COALESCE($4, title),
                company = COALESCE($5, company),
                phone = COALESCE($6, phone),
                linkedin_url = COALESCE($7, linkedin_url),
                website = COALESCE($8, website),
                industry = COALESCE($9, industry),
                location = COALESCE($10, location),
                company_size = COALESCE($11, company_size),
                notes = COALESCE($12, notes),
                score = COALESCE($13, score),
                status = COALESCE($14, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updates.name.as_deref())
        .bind(updates.email.as_deref())
        .bind(updates.title.as_deref())
        .bind(updates.company.as_deref())
        .bind(updates.phone.as_deref())
        .bind(updates.linkedin_url.as_deref())
        .bind(updates.website.as_deref())
        .bind(updates.industry.as_deref())
        .bind(updates.location.as_deref())
        .bind(updates.company_size.as_deref())
        .bind(updates.notes.as_deref())
        .bind(updates.score)
        .bind(updates.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(lead)
    }

    /// Returns false when the lead did not exist.
    pub async fn delete_lead(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected() > 0)
    }

    /// Aggregate statistics for the dashboard: tier counts, average score,
    /// per-source breakdown and daily counts over the last 30 days.
    pub async fn lead_stats(&self) -> Result<LeadStats, AppError> {
        let (total, hot, warm, cold, average): (i64, i64, i64, i64, f64) =
            sqlx::query_as(
                r#"
                SELECT COUNT(*),
                       COUNT(*) FILTER (WHERE status = 'hot'),
                       COUNT(*) FILTER (WHERE status = 'warm'),
                       COUNT(*) FILTER (WHERE status = 'cold'),
                       COALESCE(AVG(score), 0)::float8
                FROM leads
                "#,
            )
            .fetch_one(&self.pool)
            .await
            .context("Failed to load lead statistics")?;

        let source_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT source, COUNT(*) FROM leads GROUP BY source ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let daily_rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            r#"
            SELECT created_at::date AS day, COUNT(*)
            FROM leads
            WHERE created_at >= now() - interval '30 days'
            GROUP BY day
            ORDER BY day
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let conversion_rate = if total > 0 {
            hot as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(LeadStats {
            total_leads: total,
            hot_leads: hot,
            warm_leads: warm,
            cold_leads: cold,
            average_score: average.round(),
            source_counts: source_rows
                .into_iter()
                .map(|(source, count)| SourceCount { source, count })
                .collect(),
            daily_counts: daily_rows
                .into_iter()
                .map(|(date, count)| DailyCount { date, count })
                .collect(),
            conversion_rate,
        })
    }
}

#[async_trait]
impl LeadRepository for LeadStorage {
    async fn find_similar_leads(
        &self,
        email: &str,
        company: Option<&str>,
    ) -> Result<Vec<Lead>, AppError> {
        let leads = if let Some(company) = company {
            sqlx::query_as::<_, Lead>(
                "SELECT * FROM leads WHERE email = $1 OR company ILIKE '%' || $2 || '%'",
            )
            .bind(email)
            .bind(company)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?
        } else {
            sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE email = $1")
                .bind(email)
                .fetch_all(&self.pool)
                .await
                .map_err(AppError::DatabaseError)?
        };

        Ok(leads)
    }

    async fn create_lead(&self, lead: NewLead) -> Result<Lead, AppError> {
        let created = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (name, email, title, company, phone, linkedin_url, website,
                               industry, location, company_size, notes, source, score,
                               status, date_added)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(lead.title.as_deref())
        .bind(lead.company.as_deref())
        .bind(lead.phone.as_deref())
        .bind(lead.linkedin_url.as_deref())
        .bind(lead.website.as_deref())
        .bind(lead.industry.as_deref())
        .bind(lead.location.as_deref())
        .bind(lead.company_size.as_deref())
        .bind(lead.notes.as_deref())
        .bind(lead.source.as_str())
        .bind(lead.score)
        .bind(lead.status.as_str())
        .bind(lead.date_added)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(created)
    }
}

// ============ Crawl sessions ============

/// Storage operations on the `crawl_sessions` table.
pub struct SessionStorage {
    pool: PgPool,
}

impl SessionStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn recent_sessions(&self, limit: i64) -> Result<Vec<CrawlSession>, AppError> {
        let sessions = sqlx::query_as::<_, CrawlSession>(
            "SELECT * FROM crawl_sessions ORDER BY started_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(sessions)
    }

    pub async fn crawl_stats(&self) -> Result<CrawlStats, AppError> {
        let (total, completed, found, processed): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'completed'),
                   COALESCE(SUM(total_found), 0),
                   COALESCE(SUM(total_processed), 0)
            FROM crawl_sessions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load crawl statistics")?;

        let success_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round()
        } else {
            0.0
        };

        Ok(CrawlStats {
            total_sessions: total,
            completed_sessions: completed,
            total_found: found,
            total_processed: processed,
            success_rate,
        })
    }
}

#[async_trait]
impl SessionTracker for SessionStorage {
    async fn create_session(
        &self,
        source: LeadSource,
        query: &str,
    ) -> Result<CrawlSession, AppError> {
        let session = sqlx::query_as::<_, CrawlSession>(
            r#"
            INSERT INTO crawl_sessions (source, search_query, status)
            VALUES ($1, $2, 'running')
            RETURNING *
            "#,
        )
        .bind(source.as_str())
        .bind(query)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(session)
    }

    async fn update_session(&self, id: Uuid, patch: SessionPatch) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE crawl_sessions
            SET total_found = COALESCE($2, total_found),
                total_processed = COALESCE($3, total_processed),
                status = COALESCE($4, status),
                completed_at = COALESCE($5, completed_at)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.total_found)
        .bind(patch.total_processed)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.completed_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(())
    }
}

// ============ Email campaigns ============

/// Storage operations on `email_campaigns` and `email_logs`.
pub struct CampaignStorage {
    pool: PgPool,
}

impl CampaignStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_campaigns(
        &self,
        params: &CampaignQueryParams,
    ) -> Result<Vec<EmailCampaign>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM email_campaigns WHERE 1=1");

        if let Some(status) = params.status.as_deref().filter(|s| *s != "all") {
            qb.push(" AND status = ").push_bind(status.to_string());
        }

        if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR subject ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(params.limit.unwrap_or(DEFAULT_PAGE_SIZE))
            .push(" OFFSET ")
            .push_bind(params.offset.unwrap_or(0));

        let campaigns = qb
            .build_query_as::<EmailCampaign>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(campaigns)
    }

    pub async fn create_campaign(
        &self,
        name: &str,
        subject: &str,
        content: &str,
        status: &str,
    ) -> Result<EmailCampaign, AppError> {
        let campaign = sqlx::query_as::<_, EmailCampaign>(
            r#"
            INSERT INTO email_campaigns (name, subject, content, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(subject)
        .bind(content)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(campaign)
    }

    pub async fn update_campaign(
        &self,
        id: Uuid,
        updates: &UpdateCampaignRequest,
    ) -> Result<Option<EmailCampaign>, AppError> {
        let campaign = sqlx::query_as::<_, EmailCampaign>(
            r#"
            UPDATE email_campaigns
            SET name = COALESCE($2, name),
                subject = COALESCE($3, subject),
                content = COALESCE($4, content),
                status = COALESCE($5, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updates.name.as_deref())
        .bind(updates.subject.as_deref())
        .bind(updates.content.as_deref())
        .bind(updates.status.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        Ok(campaign)
    }

    pub async fn get_campaign(&self, id: Uuid) -> Result<Option<EmailCampaign>, AppError> {
        let campaign =
            sqlx::query_as::<_, EmailCampaign>("SELECT * FROM email_campaigns WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(AppError::DatabaseError)?;

        Ok(campaign)
    }

    /// Record a (simulated) send and bump the campaign counter. A counter
    /// failure is logged but does not fail the send.
    pub async fn log_send(&self, campaign_id: Uuid, lead_id: Uuid) -> Result<EmailLog, AppError> {
        let log = sqlx::query_as::<_, EmailLog>(
            r#"
            INSERT INTO email_logs (campaign_id, lead_id, status)
            VALUES ($1, $2, 'sent')
            RETURNING *
            "#,
        )
        .bind(campaign_id)
        .bind(lead_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        if let Err(e) = sqlx::query(
            "UPDATE email_campaigns SET sent_count = sent_count + 1, updated_at = now() WHERE id = $1",
        )
        .bind(campaign_id)
        .execute(&self.pool)
        .await
        {
            tracing::warn!(
                "Could not increment sent_count for campaign {}: {}",
                campaign_id,
                e
            );
        }

        Ok(log)
    }

    pub async fn email_stats(&self) -> Result<CampaignStats, AppError> {
        let (total_campaigns, active_campaigns, total_sent): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'active'),
                   COALESCE(SUM(sent_count), 0)
            FROM email_campaigns
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to load campaign statistics")?;

        let (total_opened, total_clicked, total_replied): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE opened_at IS NOT NULL),
                   COUNT(*) FILTER (WHERE clicked_at IS NOT NULL),
                   COUNT(*) FILTER (WHERE replied_at IS NOT NULL)
            FROM email_logs
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::DatabaseError)?;

        let rate = |n: i64| {
            if total_sent > 0 {
                (n as f64 / total_sent as f64 * 1000.0).round() / 10.0
            } else {
                0.0
            }
        };

        Ok(CampaignStats {
            total_campaigns,
            active_campaigns,
            total_sent,
            total_opened,
            total_clicked,
            total_replied,
            open_rate: rate(total_opened),
            click_rate: rate(total_clicked),
            reply_rate: rate(total_replied),
        })
    }
}
