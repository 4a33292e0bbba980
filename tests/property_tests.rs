/// Property-based tests for the scoring engine and email validation
use leadflow_api::ingest::is_valid_email;
use leadflow_api::models::{Candidate, CrawlFilters, LeadStatus, SearchContext};
use leadflow_api::scoring::{
    relevance_bonus, score_candidate, status_for_score, MAX_RELEVANCE_BONUS,
};
use proptest::prelude::*;

fn opt_string() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9 ,.-]{0,40}")
}

prop_compose! {
    fn arb_candidate()(
        name in "[a-zA-Z ]{1,30}",
        email in "[a-z0-9.]{1,20}@[a-z0-9]{1,15}\\.[a-z]{2,4}",
        title in opt_string(),
        company in opt_string(),
        industry in opt_string(),
        location in opt_string(),
        phone in opt_string(),
        website in opt_string(),
        linkedin_url in opt_string(),
        company_size in opt_string(),
        relevance_bonus in -100i32..200,
    ) -> Candidate {
        Candidate {
            name,
            email,
            title,
            company,
            industry,
            location,
            phone,
            website,
            linkedin_url,
            company_size,
            relevance_bonus,
        }
    }
}

prop_compose! {
    fn arb_context()(
        query in "[a-zA-Z0-9 ]{0,20}",
        industry in opt_string(),
        location in opt_string(),
        company_size in opt_string(),
        job_titles in proptest::collection::vec("[a-zA-Z ]{1,20}", 0..4),
    ) -> SearchContext {
        SearchContext {
            query,
            filters: CrawlFilters {
                industry,
                location,
                company_size,
                job_titles,
            },
        }
    }
}

proptest! {
    /// The final score is always within [0, 100], whatever the candidate
    /// looks like and however wild the supplied relevance bonus is.
    #[test]
    fn score_is_always_in_range(candidate in arb_candidate()) {
        let score = score_candidate(&candidate);
        prop_assert!((0..=100).contains(&score));
    }

    /// Scoring the same candidate twice gives the same result.
    #[test]
    fn score_is_deterministic(candidate in arb_candidate()) {
        prop_assert_eq!(score_candidate(&candidate), score_candidate(&candidate));
    }

    /// Filling in a missing field never lowers the score.
    #[test]
    fn adding_a_field_never_lowers_score(candidate in arb_candidate()) {
        let base = score_candidate(&candidate);
        let mut richer = candidate.clone();
        if richer.phone.is_none() {
            richer.phone = Some("+33123456789".to_string());
        } else if richer.website.is_none() {
            richer.website = Some("https://example.com".to_string());
        } else {
            return Ok(());
        }
        prop_assert!(score_candidate(&richer) >= base);
    }

    /// The relevance bonus is bounded by its cap and never negative.
    #[test]
    fn relevance_bonus_is_capped(
        candidate in arb_candidate(),
        ctx in arb_context(),
    ) {
        let bonus = relevance_bonus(&candidate, &ctx);
        prop_assert!((0..=MAX_RELEVANCE_BONUS).contains(&bonus));
    }

    /// The score-to-status mapping is the fixed three-band step function.
    #[test]
    fn status_bands_are_exhaustive(score in 0i32..=100) {
        let status = status_for_score(score);
        if score >= 80 {
            prop_assert_eq!(status, LeadStatus::Hot);
        } else if score >= 60 {
            prop_assert_eq!(status, LeadStatus::Warm);
        } else {
            prop_assert_eq!(status, LeadStatus::Cold);
        }
    }

    /// A higher score never maps to a colder status than a lower one.
    #[test]
    fn status_is_monotonic(a in 0i32..=100, b in 0i32..=100) {
        fn rank(s: LeadStatus) -> u8 {
            match s {
                LeadStatus::Cold => 0,
                LeadStatus::Warm => 1,
                LeadStatus::Hot => 2,
            }
        }
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(rank(status_for_score(lo)) <= rank(status_for_score(hi)));
    }

    /// Email validation is total: it classifies arbitrary input without
    /// panicking.
    #[test]
    fn email_validation_never_panics(input in "\\PC{0,60}") {
        let _ = is_valid_email(&input);
    }

    /// Well-formed addresses without fake digit runs are accepted.
    #[test]
    fn plausible_emails_are_accepted(
        local in "[a-z][a-z.]{2,15}",
        domain in "[a-z]{2,12}",
        tld in "(com|org|io|fr)",
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email));
    }
}
