/// Tests for the stub candidate source
use leadflow_api::crawler::{CandidateSource, StubCrawler, DEFAULT_MAX_RESULTS};
use leadflow_api::ingest::is_valid_email;
use leadflow_api::models::{CrawlConfig, CrawlFilters, LeadSource};

fn config(max_results: Option<usize>, filters: CrawlFilters) -> CrawlConfig {
    CrawlConfig {
        source: LeadSource::Linkedin,
        search_query: "tech startups".to_string(),
        max_results,
        filters,
    }
}

#[tokio::test]
async fn test_honors_max_results() {
    let crawler = StubCrawler;
    let batch = crawler
        .fetch_candidates(&config(Some(7), CrawlFilters::default()))
        .await
        .unwrap();
    assert_eq!(batch.len(), 7);
}

#[tokio::test]
async fn test_default_batch_size() {
    let crawler = StubCrawler;
    let batch = crawler
        .fetch_candidates(&config(None, CrawlFilters::default()))
        .await
        .unwrap();
    assert_eq!(batch.len(), DEFAULT_MAX_RESULTS);
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let crawler = StubCrawler;
    let cfg = config(Some(10), CrawlFilters::default());
    let first = crawler.fetch_candidates(&cfg).await.unwrap();
    let second = crawler.fetch_candidates(&cfg).await.unwrap();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.email, b.email);
        assert_eq!(a.company, b.company);
        assert_eq!(a.title, b.title);
    }
}

#[tokio::test]
async fn test_filters_override_generated_values() {
    let crawler = StubCrawler;
    let filters = CrawlFilters {
        industry: Some("Technology".to_string()),
        location: Some("Paris, France".to_string()),
        company_size: Some("50-200".to_string()),
        job_titles: vec!["CTO".to_string(), "VP of Engineering".to_string()],
    };
    let batch = crawler
        .fetch_candidates(&config(Some(6), filters))
        .await
        .unwrap();

    for candidate in &batch {
        assert_eq!(candidate.industry.as_deref(), Some("Technology"));
        assert_eq!(candidate.location.as_deref(), Some("Paris, France"));
        assert_eq!(candidate.company_size.as_deref(), Some("50-200"));
        let title = candidate.title.as_deref().unwrap();
        assert!(title == "CTO" || title == "VP of Engineering");
    }
}

#[tokio::test]
async fn test_generated_candidates_are_ingestible() {
    let crawler = StubCrawler;
    let batch = crawler
        .fetch_candidates(&config(Some(30), CrawlFilters::default()))
        .await
        .unwrap();

    for candidate in &batch {
        assert!(!candidate.name.trim().is_empty());
        assert!(is_valid_email(&candidate.email), "bad email: {}", candidate.email);
        assert!(candidate.company.is_some());
        assert!(candidate.title.is_some());
    }
}
