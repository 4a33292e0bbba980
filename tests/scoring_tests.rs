/// Unit tests for the lead scoring engine
/// Tests completeness bonuses, seniority/industry matching, relevance
/// bonuses and the score/status invariants
use leadflow_api::models::{Candidate, CrawlFilters, LeadStatus, SearchContext};
use leadflow_api::scoring::{
    relevance_bonus, score_candidate, status_for_score, MAX_RELEVANCE_BONUS,
};

fn bare_candidate() -> Candidate {
    Candidate {
        name: "Marie Dubois".to_string(),
        email: "marie.dubois@example.com".to_string(),
        ..Default::default()
    }
}

fn full_candidate() -> Candidate {
    Candidate {
        name: "Pierre Martin".to_string(),
        email: "pierre.martin@techcorp.com".to_string(),
        title: Some("CTO".to_string()),
        company: Some("TechCorp".to_string()),
        industry: Some("Technology".to_string()),
        location: Some("Paris, France".to_string()),
        phone: Some("+33123456789".to_string()),
        website: Some("https://techcorp.com".to_string()),
        linkedin_url: Some("https://linkedin.com/in/pierre-martin".to_string()),
        company_size: Some("50-200".to_string()),
        relevance_bonus: 0,
    }
}

#[cfg(test)]
mod base_scoring_tests {
    use super::*;

    #[test]
    fn test_bare_candidate_scores_base() {
        // Name and email only: no bonuses apply
        assert_eq!(score_candidate(&bare_candidate()), 50);
    }

    #[test]
    fn test_completeness_bonuses_stack() {
        let mut candidate = bare_candidate();
        candidate.title = Some("Consultant".to_string());
        assert_eq!(score_candidate(&candidate), 60);

        candidate.company = Some("Innovation Labs".to_string());
        assert_eq!(score_candidate(&candidate), 70);

        candidate.linkedin_url = Some("https://linkedin.com/in/x".to_string());
        assert_eq!(score_candidate(&candidate), 85);

        candidate.website = Some("https://example.com".to_string());
        assert_eq!(score_candidate(&candidate), 95);

        candidate.phone = Some("+33100000000".to_string());
        assert_eq!(score_candidate(&candidate), 100);
    }

    #[test]
    fn test_full_candidate_clamps_at_100() {
        // 50 + 10 + 10 + 15 + 10 + 5 + 20 (CTO) + 10 (Technology) = 130
        assert_eq!(score_candidate(&full_candidate()), 100);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let candidate = full_candidate();
        let first = score_candidate(&candidate);
        for _ in 0..10 {
            assert_eq!(score_candidate(&candidate), first);
        }
    }

    #[test]
    fn test_name_and_email_do_not_affect_score() {
        let a = bare_candidate();
        let mut b = bare_candidate();
        b.name = "Someone Else".to_string();
        b.email = "else@other.org".to_string();
        assert_eq!(score_candidate(&a), score_candidate(&b));
    }
}

#[cfg(test)]
mod seniority_tests {
    use super::*;

    #[test]
    fn test_senior_title_bonus() {
        let mut candidate = bare_candidate();
        candidate.title = Some("Engineering Manager".to_string());
        // 50 + 10 (title present) + 20 (seniority)
        assert_eq!(score_candidate(&candidate), 80);
    }

    #[test]
    fn test_seniority_not_double_counted() {
        let mut candidate = bare_candidate();
        candidate.title = Some("VP, Director of Engineering".to_string());
        // Two markers in one title still earn the bonus once
        assert_eq!(score_candidate(&candidate), 80);
    }

    #[test]
    fn test_seniority_match_is_case_sensitive() {
        let mut candidate = bare_candidate();
        candidate.title = Some("ceo".to_string());
        // Lowercase "ceo" does not match the "CEO" marker
        assert_eq!(score_candidate(&candidate), 60);
    }

    #[test]
    fn test_non_senior_title_no_bonus() {
        let mut candidate = bare_candidate();
        candidate.title = Some("Software Engineer".to_string());
        assert_eq!(score_candidate(&candidate), 60);
    }
}

#[cfg(test)]
mod industry_tests {
    use super::*;

    #[test]
    fn test_high_value_industry_bonus() {
        let mut candidate = bare_candidate();
        candidate.industry = Some("Technology".to_string());
        assert_eq!(score_candidate(&candidate), 60);
    }

    #[test]
    fn test_industry_substring_match() {
        let mut candidate = bare_candidate();
        candidate.industry = Some("Information Technology".to_string());
        assert_eq!(score_candidate(&candidate), 60);
    }

    #[test]
    fn test_other_industry_no_bonus() {
        let mut candidate = bare_candidate();
        candidate.industry = Some("Healthcare".to_string());
        assert_eq!(score_candidate(&candidate), 50);
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for_score(80), LeadStatus::Hot);
        assert_eq!(status_for_score(79), LeadStatus::Warm);
        assert_eq!(status_for_score(60), LeadStatus::Warm);
        assert_eq!(status_for_score(59), LeadStatus::Cold);
    }

    #[test]
    fn test_status_extremes() {
        assert_eq!(status_for_score(0), LeadStatus::Cold);
        assert_eq!(status_for_score(100), LeadStatus::Hot);
    }
}

#[cfg(test)]
mod relevance_bonus_tests {
    use super::*;

    fn search_context() -> SearchContext {
        SearchContext {
            query: "TechCorp".to_string(),
            filters: CrawlFilters {
                industry: Some("Technology".to_string()),
                location: Some("Paris".to_string()),
                company_size: None,
                job_titles: vec!["CTO".to_string()],
            },
        }
    }

    #[test]
    fn test_title_and_industry_stack() {
        let ctx = SearchContext {
            query: String::new(),
            filters: CrawlFilters {
                industry: Some("Technology".to_string()),
                location: None,
                company_size: None,
                job_titles: vec!["CTO".to_string()],
            },
        };
        let candidate = full_candidate();
        // +20 title keyword, +15 industry filter
        assert_eq!(relevance_bonus(&candidate, &ctx), 35);
    }

    #[test]
    fn test_all_components_capped() {
        // 20 + 15 + 10 + 5 would be 50; the cap holds it at 35
        let candidate = full_candidate();
        assert_eq!(relevance_bonus(&candidate, &search_context()), MAX_RELEVANCE_BONUS);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let mut ctx = search_context();
        ctx.filters.job_titles = vec!["cto".to_string()];
        ctx.filters.industry = None;
        ctx.filters.location = None;
        ctx.query = String::new();
        assert_eq!(relevance_bonus(&full_candidate(), &ctx), 20);
    }

    #[test]
    fn test_no_filters_no_bonus() {
        let ctx = SearchContext::default();
        assert_eq!(relevance_bonus(&full_candidate(), &ctx), 0);
    }

    #[test]
    fn test_supplied_bonus_clamped_in_score() {
        let mut candidate = bare_candidate();
        candidate.relevance_bonus = 200;
        // 50 + 35 (clamped bonus)
        assert_eq!(score_candidate(&candidate), 85);
    }

    #[test]
    fn test_negative_bonus_ignored() {
        let mut candidate = bare_candidate();
        candidate.relevance_bonus = -40;
        assert_eq!(score_candidate(&candidate), 50);
    }

    #[test]
    fn test_stacked_bonus_feeds_final_score() {
        let mut candidate = bare_candidate();
        candidate.title = Some("Consultant".to_string());
        candidate.relevance_bonus = 35;
        // 50 + 10 (title) + 35 (bonus)
        assert_eq!(score_candidate(&candidate), 95);
        assert_eq!(status_for_score(score_candidate(&candidate)), LeadStatus::Hot);
    }
}
