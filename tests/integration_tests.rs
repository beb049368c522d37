// Integration tests for UniSphere Match

use unisphere_match::core::{
    factors::BUDGET_FIT_REASON, CatalogSource, InMemoryCatalog, MatchEngine, MatchError,
    Recommender,
};
use unisphere_match::models::{Candidate, Profile, RecommendationResponse, ScoreBreakdown, ScoringWeights};

fn reference_profile() -> Profile {
    Profile::new(500_000.0, "I want to work in data science and AI")
}

fn ids(ranked: &[ScoreBreakdown]) -> Vec<String> {
    ranked.iter().map(|r| r.candidate_id().to_string()).collect()
}

fn reference_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("B", 600_000.0, &["law"], 50.0),
        Candidate::new("A", 450_000.0, &["data science", "AI"], 80.0),
    ]
}

#[test]
fn test_integration_reference_ranking() {
    let engine = MatchEngine::baseline();
    let ranked = engine.rank(&reference_profile(), reference_candidates());

    let response = RecommendationResponse::from_ranking(&ranked);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(
        json["results"],
        serde_json::json!([
            { "candidateId": "A", "score": 57, "reasons": [BUDGET_FIT_REASON] },
            { "candidateId": "B", "score": 7, "reasons": [] }
        ])
    );
    assert_eq!(json["totalCandidates"], 2);
}

#[test]
fn test_rank_is_idempotent() {
    let engine = MatchEngine::baseline();
    let candidates: Vec<Candidate> = (0..50)
        .map(|i| Candidate::new(format!("u{:02}", 49 - i), (i % 7) as f64 * 100_000.0, &["AI"], (i % 5) as f64 * 20.0))
        .collect();

    let first = engine.rank(&reference_profile(), candidates.clone());
    let second = engine.rank(&reference_profile(), candidates);

    assert_eq!(first, second);
}

#[test]
fn test_order_independent_of_catalog_order() {
    let engine = MatchEngine::baseline();
    let mut candidates: Vec<Candidate> = (0..30)
        .map(|i| Candidate::new(format!("id-{}", i), 1.0, &[], (i % 3) as f64 * 10.0))
        .collect();

    let forward = engine.rank(&reference_profile(), candidates.clone());
    candidates.reverse();
    let backward = engine.rank(&reference_profile(), candidates);

    assert_eq!(ids(&forward), ids(&backward));

    for pair in forward.windows(2) {
        assert!(
            pair[0].score() > pair[1].score()
                || (pair[0].score() == pair[1].score()
                    && pair[0].candidate_id() < pair[1].candidate_id())
        );
    }
}

#[test]
fn test_scores_within_engine_range() {
    let engine = MatchEngine::baseline();
    let candidates: Vec<Candidate> = (0..100)
        .map(|i| {
            Candidate::new(
                format!("u{}", i),
                (i * 10_000) as f64,
                &["data", "science", "ai", "work", "want"],
                (i * 3) as f64,
            )
        })
        .collect();

    for result in engine.rank(&reference_profile(), candidates) {
        assert!(result.score() <= 70);
        assert!(result.raw_score() <= engine.max_score());
    }
}

#[test]
fn test_extended_engine_adds_country_reason() {
    let engine = MatchEngine::from_weights(&ScoringWeights::default(), true);
    let profile = reference_profile().with_preferred_countries(vec!["Germany".to_string()]);

    let mut tum = Candidate::new("tum", 500.0, &["Robotics"], 89.0);
    tum.country = Some("Germany".to_string());
    tum.world_ranking = Some(49);

    let ranked = engine.rank(&profile, vec![tum]);

    // 25 + 0 + 13.35 + 20 + 9.02
    assert_eq!(ranked[0].score(), 67);
    assert_eq!(
        ranked[0].reasons(),
        &[
            BUDGET_FIT_REASON.to_string(),
            "Located in Germany, one of your preferred study destinations".to_string()
        ]
    );
}

#[tokio::test]
async fn test_recommender_with_seed_catalog() {
    let catalog = InMemoryCatalog::from_toml_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config/catalog.toml")).unwrap();
    assert_eq!(catalog.fetch_all().await.unwrap().len(), 5);

    let profile = Profile::new(45_000.0, "Robotics and engineering for the automotive industry");
    let ranked = Recommender::default().recommend(&catalog, &profile).await.unwrap();

    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0].candidate_id(), "tum");
    // 25 + 30 + 13.35
    assert_eq!(ranked[0].score(), 68);
}

#[tokio::test]
async fn test_recommender_rejects_negative_budget() {
    let catalog = InMemoryCatalog::new(reference_candidates());
    let result = Recommender::default()
        .recommend(&catalog, &Profile::new(-10.0, "AI"))
        .await;

    assert!(matches!(result, Err(MatchError::InvalidProfile(_))));
}

#[tokio::test]
async fn test_recommender_observes_refreshed_catalog() {
    let catalog = InMemoryCatalog::new(reference_candidates());
    let recommender = Recommender::default();

    let before = recommender.recommend(&catalog, &reference_profile()).await.unwrap();
    catalog.replace(vec![]).await;
    let after = recommender.recommend(&catalog, &reference_profile()).await.unwrap();

    assert_eq!(before.len(), 2);
    assert!(after.is_empty());
}
