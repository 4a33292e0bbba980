//! Candidate acquisition.
//!
//! Real scraping is out of scope; [`StubCrawler`] synthesizes plausible
//! contact records instead. It sits behind the [`CandidateSource`] trait so
//! a real scraper or API integration can be swapped in without touching
//! scoring or deduplication.

use crate::errors::AppError;
use crate::models::{Candidate, CrawlConfig};
use async_trait::async_trait;

/// Default batch size when the request does not specify one.
pub const DEFAULT_MAX_RESULTS: usize = 20;

/// Anything that can produce a batch of candidates for ingestion.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self, config: &CrawlConfig) -> Result<Vec<Candidate>, AppError>;
}

const COMPANIES: [&str; 12] = [
    "TechCorp",
    "DataFlow Systems",
    "Innovation Labs",
    "Future Tech",
    "Digital Dynamics",
    "Cloud Systems",
    "NextGen Solutions",
    "StartupX",
    "Enterprise Solutions",
    "Global Corp",
    "Cyber Security Inc",
    "AI Innovations",
];

const TITLES: [&str; 12] = [
    "CEO",
    "CTO",
    "VP of Engineering",
    "Director of IT",
    "Product Manager",
    "Technical Lead",
    "Head of Product",
    "Engineering Manager",
    "Data Scientist",
    "Software Engineer",
    "DevOps Engineer",
    "Marketing Director",
];

const INDUSTRIES: [&str; 9] = [
    "Technology",
    "Healthcare",
    "Financial Services",
    "Manufacturing",
    "Retail",
    "Education",
    "Consulting",
    "Media",
    "Real Estate",
];

const LOCATIONS: [&str; 8] = [
    "Paris, France",
    "Lyon, France",
    "Marseille, France",
    "Toulouse, France",
    "Nice, France",
    "Nantes, France",
    "Strasbourg, France",
    "Montpellier, France",
];

const FIRST_NAMES: [&str; 16] = [
    "Alexandre", "Marie", "Pierre", "Sophie", "Jean", "Emma", "Paul", "Julie", "Michel",
    "Claire", "David", "Sarah", "Thomas", "Laura", "Nicolas", "Anna",
];

const LAST_NAMES: [&str; 14] = [
    "Martin", "Bernard", "Dubois", "Thomas", "Robert", "Richard", "Petit", "Durand", "Leroy",
    "Moreau", "Simon", "Laurent", "Lefebvre", "Michel",
];

/// Deterministic synthetic candidate generator.
///
/// Records are picked by cycling the fixed lists with the candidate index,
/// so two runs with the same config produce identical batches. Filters from
/// the config take precedence over the cycled values, which lets the
/// relevance bonus kick in the way a real filtered crawl would.
pub struct StubCrawler;

#[async_trait]
impl CandidateSource for StubCrawler {
    async fn fetch_candidates(&self, config: &CrawlConfig) -> Result<Vec<Candidate>, AppError> {
        let max_results = config.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        let mut candidates = Vec::with_capacity(max_results);

        for i in 0..max_results {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i * 3 + i / FIRST_NAMES.len()) % LAST_NAMES.len()];
            let company = COMPANIES[(i * 5 + 1) % COMPANIES.len()];
            let domain = company.to_lowercase().replace(' ', "");

            let title = if config.filters.job_titles.is_empty() {
                TITLES[(i * 7 + 3) % TITLES.len()].to_string()
            } else {
                config.filters.job_titles[i % config.filters.job_titles.len()].clone()
            };
            let industry = config
                .filters
                .industry
                .clone()
                .unwrap_or_else(|| INDUSTRIES[(i * 2 + 5) % INDUSTRIES.len()].to_string());
            let location = config
                .filters
                .location
                .clone()
                .unwrap_or_else(|| LOCATIONS[(i * 3 + 2) % LOCATIONS.len()].to_string());
            let company_size = config
                .filters
                .company_size
                .clone()
                .unwrap_or_else(|| {
                    if i % 2 == 0 { "50-200" } else { "200-1000" }.to_string()
                });

            candidates.push(Candidate {
                name: format!("{} {}", first, last),
                email: format!(
                    "{}.{}@{}.com",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    domain
                ),
                title: Some(title),
                company: Some(company.to_string()),
                industry: Some(industry),
                location: Some(location),
                phone: None,
                website: Some(format!("https://{}.com", domain)),
                linkedin_url: Some(format!(
                    "https://linkedin.com/in/{}-{}",
                    first.to_lowercase(),
                    last.to_lowercase()
                )),
                company_size: Some(company_size),
                relevance_bonus: 0,
            });
        }

        tracing::info!(
            "Stub crawler produced {} candidate(s) for source '{}'",
            candidates.len(),
            config.source.as_str()
        );

        Ok(candidates)
    }
}
