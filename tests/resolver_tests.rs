use std::sync::Arc;

use semantic_locator::{
    embedding::hash_embedder::HashEmbedder,
    error::ResolveError,
    locator::locator_model::{CandidateElement, LocatorCandidate, StrategyType},
    rank::{
        heuristic::ActionType,
        resolver::{ProviderFailurePolicy, TwoStageResolver, static_best},
    },
    resolve_accessibility, resolve_markup,
    snapshot::normalizer::normalize_markup,
};

use crate::common::{
    pages::{ax_login_tree, email_page, sign_in_page},
    providers::{CountingProvider, FailingProvider},
};

mod common;

fn hash_resolver() -> TwoStageResolver {
    TwoStageResolver::new(Arc::new(HashEmbedder::default()))
}

#[test]
fn sign_in_button_beats_sign_in_heading() {
    let resolution = resolve_markup(&hash_resolver(), &sign_in_page(), "Click the 'Sign In' button").unwrap();

    assert_eq!(resolution.query, "Sign In");
    assert_eq!(resolution.action, ActionType::Click);
    assert_eq!(resolution.ranked.len(), 2);
    assert!(resolution.ranked[0].signature().starts_with("button: Sign In"));
    assert!(resolution.ranked[1].signature().starts_with("h1: Sign In"));
}

#[test]
fn email_input_beats_decorative_text() {
    let resolution = resolve_markup(&hash_resolver(), &email_page(), "Enter email in the email field").unwrap();

    assert_eq!(resolution.action, ActionType::Input);
    assert!(
        resolution.ranked[0].signature().starts_with("input[type=\"email\"]"),
        "got {:?}",
        resolution.ranked
    );
}

#[test]
fn accessibility_sign_in_resolves_to_button() {
    let resolution = resolve_accessibility(&hash_resolver(), &ax_login_tree(), "Click 'Sign In'").unwrap();

    let top = &resolution.ranked[0];
    assert_eq!(top.signature(), "button, name: Sign In");
    assert_eq!(
        top.candidate.best_locator().unwrap().locator,
        r#"page.get_by_role("button", { name: "Sign In" })"#
    );
}

#[test]
fn final_score_is_semantic_plus_bonus_and_sorted() {
    let resolution = resolve_accessibility(&hash_resolver(), &ax_login_tree(), "Type you@example.com into the Email field").unwrap();

    for r in &resolution.ranked {
        assert_eq!(r.final_score, r.semantic_score + r.heuristic_bonus);
        assert!(r.semantic_score >= 0.0);
        assert!(r.heuristic_bonus <= 1.0);
    }
    for pair in resolution.ranked.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
}

#[test]
fn resolution_is_deterministic() {
    let resolver = hash_resolver();
    let first = resolve_markup(&resolver, &sign_in_page(), "Click the Sign In button").unwrap();
    let second = resolve_markup(&resolver, &sign_in_page(), "Click the Sign In button").unwrap();
    assert_eq!(first.ranked, second.ranked);
}

#[test]
fn top_k_limits_results() {
    let resolver = hash_resolver().with_top_k(1);
    let resolution = resolve_markup(&resolver, &sign_in_page(), "Click the 'Sign In' button").unwrap();
    assert_eq!(resolution.ranked.len(), 1);
}

#[test]
fn empty_candidates_skip_the_provider() {
    let provider = Arc::new(CountingProvider::default());
    let resolver = TwoStageResolver::new(provider.clone());

    let resolution = resolver.resolve("Click the 'Sign In' button", &[]).unwrap();
    assert!(resolution.ranked.is_empty());
    assert_eq!(resolution.query, "Sign In");
    assert_eq!(provider.calls(), 0);

    let candidates = normalize_markup(&sign_in_page());
    resolver.resolve("Click the 'Sign In' button", &candidates).unwrap();
    assert_eq!(provider.calls(), 1);
}

#[test]
fn provider_failure_is_surfaced_by_default() {
    let resolver = TwoStageResolver::new(Arc::new(FailingProvider));
    let err = resolve_markup(&resolver, &sign_in_page(), "Click the 'Sign In' button").unwrap_err();
    assert!(matches!(err, ResolveError::ProviderUnavailable(_)));
}

#[test]
fn static_best_fallback_is_opt_in() {
    let resolver = TwoStageResolver::new(Arc::new(FailingProvider))
        .with_failure_policy(ProviderFailurePolicy::StaticBest);

    let resolution = resolve_markup(&resolver, &sign_in_page(), "Click the 'Sign In' button").unwrap();
    assert!(resolution.fallback);
    assert_eq!(resolution.ranked.len(), 1);

    let only = &resolution.ranked[0];
    assert_eq!(only.final_score, 0.0);
    assert_eq!(only.semantic_score, 0.0);
    assert_eq!(only.heuristic_bonus, 0.0);
}

#[test]
fn static_best_picks_highest_locator_and_earliest_on_ties() {
    let loc = |score: f32| vec![LocatorCandidate::new(StrategyType::Text, "x".into(), score)];
    let candidates = vec![
        CandidateElement::new("p: a".into(), loc(0.6)),
        CandidateElement::new("p: b".into(), loc(0.9)),
        CandidateElement::new("p: c".into(), loc(0.9)),
    ];

    let best = static_best(&candidates).unwrap();
    assert_eq!(best.signature(), "p: b");
    assert_eq!(best.position, 1);
    assert!(static_best(&[]).is_none());
}

#[test]
fn resolution_serializes_scores_next_to_candidate() {
    let resolution = resolve_markup(&hash_resolver(), &sign_in_page(), "Click the 'Sign In' button").unwrap();
    let json = serde_json::to_value(&resolution).unwrap();

    let top = &json["ranked"][0];
    assert!(top["signature"].is_string());
    assert!(top["locators"].is_array());
    assert!(top["final_score"].is_number());
    assert_eq!(json["action"], "click");
    assert!(json.get("fallback").is_none());
}

#[test]
fn blank_instruction_is_rejected_without_fallback() {
    let provider = Arc::new(CountingProvider::default());
    let resolver = TwoStageResolver::new(provider.clone()).with_failure_policy(ProviderFailurePolicy::StaticBest);
    let candidates = normalize_markup(&sign_in_page());

    for instruction in ["", "   \t"] {
        let err = resolver.resolve(instruction, &candidates).unwrap_err();
        assert!(matches!(err, ResolveError::BlankInstruction));
    }
    assert_eq!(provider.calls(), 0);
}
