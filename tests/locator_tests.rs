use semantic_locator::{
    locator::{
        locator_model::{CandidateElement, LocatorCandidate, StrategyType},
        scorer::{accessibility_base_score, is_generated_id, markup_base_score},
        signature::accessibility_signature,
        synthesizer::{accessibility_locators, accessibility_query, xpath_literal},
    },
    snapshot::{markup::MarkupElement, normalizer::normalize_markup},
};

use crate::common::pages::{ax, button, disabled, heading, page, text_input};

mod common;

fn only_candidate(el: MarkupElement) -> CandidateElement {
    let mut candidates = normalize_markup(&page(vec![el]));
    assert_eq!(candidates.len(), 1, "expected one candidate, got {:?}", candidates);
    candidates.remove(0)
}

fn locator_of(candidate: &CandidateElement, strategy: StrategyType) -> Option<&LocatorCandidate> {
    candidate.locators.iter().find(|l| l.strategy == strategy)
}

fn assert_sorted_and_bounded(locators: &[LocatorCandidate]) {
    for l in locators {
        assert!((0.0..=1.0).contains(&l.confidence), "{:?} out of range", l);
    }
    for pair in locators.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence, "not sorted: {:?}", locators);
    }
}

// ============================================================================
// Markup variant
// ============================================================================

#[test]
fn button_gets_role_locator_first() {
    let candidate = only_candidate(
        button("Sign In")
            .attr("id", "login-btn")
            .attr("class", "btn primary"),
    );

    assert_eq!(candidate.signature, "button: Sign In, id: login-btn, class: btn primary");

    let best = candidate.best_locator().unwrap();
    assert_eq!(best.strategy, StrategyType::Role);
    assert_eq!(best.locator, r#"page.get_by_role("button", { name: "Sign In" })"#);
    assert!((best.confidence - 0.75).abs() < 1e-6);
    assert_sorted_and_bounded(&candidate.locators);
}

#[test]
fn every_markup_candidate_has_a_structural_path() {
    let candidate = only_candidate(button("Go"));
    let path = locator_of(&candidate, StrategyType::StructuralPath).unwrap();
    assert_eq!(path.locator, r#"page.locator("xpath=/body/button")"#);
    assert!(path.confidence < candidate.best_locator().unwrap().confidence);
}

#[test]
fn id_locator_used_instead_of_css_when_present() {
    let candidate = only_candidate(button("Save").attr("id", "save").attr("class", "primary"));
    assert!(locator_of(&candidate, StrategyType::Id).is_some());
    assert!(locator_of(&candidate, StrategyType::Css).is_none());

    let candidate = only_candidate(button("Save").attr("class", "primary large"));
    let css = locator_of(&candidate, StrategyType::Css).unwrap();
    assert_eq!(css.locator, r#"page.locator("button.primary.large")"#);
}

#[test]
fn generated_ids_score_lower_than_stable_ids() {
    let stable = only_candidate(button("Save").attr("id", "save"));
    let generated = only_candidate(button("Save").attr("id", "save-3f9a1c7e"));

    let stable_id = locator_of(&stable, StrategyType::Id).unwrap().confidence;
    let generated_id = locator_of(&generated, StrategyType::Id).unwrap().confidence;
    assert!(generated_id < stable_id);
    assert!(is_generated_id("save-3f9a1c7e"));
}

#[test]
fn input_without_text_keeps_placeholder_and_test_id() {
    let candidate = only_candidate(
        text_input("email", "Enter your email").attr("data-testid", "email-input"),
    );

    assert_eq!(candidate.signature, r#"input[type="email"], placeholder: Enter your email"#);

    let placeholder = locator_of(&candidate, StrategyType::Placeholder).unwrap();
    assert_eq!(placeholder.locator, r#"page.get_by_placeholder("Enter your email")"#);
    let test_id = locator_of(&candidate, StrategyType::TestId).unwrap();
    assert_eq!(test_id.locator, r#"page.get_by_test_id("email-input")"#);

    // No visible text: every locator carries the large penalty
    let path = locator_of(&candidate, StrategyType::StructuralPath).unwrap();
    assert!((path.confidence - 0.1).abs() < 1e-6);
    assert_sorted_and_bounded(&candidate.locators);
}

#[test]
fn aria_label_adds_label_locator_and_bonus() {
    let plain = only_candidate(button("X").attr("class", "close"));
    let labelled = only_candidate(button("X").attr("class", "close").attr("aria-label", "Close dialog"));

    let label = locator_of(&labelled, StrategyType::Label).unwrap();
    assert_eq!(label.locator, r#"page.get_by_label("Close dialog")"#);

    let plain_role = locator_of(&plain, StrategyType::Role).unwrap().confidence;
    let labelled_role = locator_of(&labelled, StrategyType::Role).unwrap().confidence;
    assert!(labelled_role > plain_role);
}

#[test]
fn long_text_uses_substring_text_match() {
    let text = "By continuing you agree to the terms of service and privacy policy";
    let candidate = only_candidate(MarkupElement::new("p").with_text(text));
    let by_text = locator_of(&candidate, StrategyType::Text).unwrap();
    assert!(!by_text.locator.contains("exact"));
}

#[test]
fn unknown_strategy_has_zero_base_score() {
    assert_eq!(markup_base_score(StrategyType::Unknown), 0.0);
    assert_eq!(accessibility_base_score(StrategyType::Unknown), 0.0);
    assert!(markup_base_score(StrategyType::Role) > markup_base_score(StrategyType::StructuralPath));
}

// ============================================================================
// Accessibility variant
// ============================================================================

#[test]
fn disabled_node_has_no_locators() {
    let node = disabled(ax("button", "Delete account"));
    assert!(accessibility_locators(&node).is_empty());
}

#[test]
fn heading_signature_includes_level() {
    let node = heading("Welcome", 2);
    assert_eq!(
        accessibility_signature(&node).as_deref(),
        Some("heading (level 2), name: Welcome")
    );
}

#[test]
fn nameless_node_has_no_signature() {
    assert_eq!(accessibility_signature(&ax("generic", "")), None);
}

#[test]
fn role_locator_carries_discriminating_properties() {
    let mut node = ax("textbox", "Email");
    node.value = Some(serde_json::json!("a@b.c"));
    node.required = true;

    let locators = accessibility_locators(&node);
    let role = locators.iter().find(|l| l.strategy == StrategyType::Role).unwrap();
    assert_eq!(
        role.locator,
        r#"page.get_by_role("textbox", { name: "Email", value: "a@b.c", required: true })"#
    );
    assert!(locators.iter().any(|l| l.strategy == StrategyType::Label));
}

#[test]
fn heading_role_locator_has_level() {
    let locators = accessibility_locators(&heading("Welcome", 2));
    let role = locators.iter().find(|l| l.strategy == StrategyType::Role).unwrap();
    assert_eq!(role.locator, r#"page.get_by_role("heading", { name: "Welcome", level: 2 })"#);
    assert!((role.confidence - 1.0).abs() < 1e-6);
}

#[test]
fn textbox_description_becomes_placeholder() {
    let mut node = ax("textbox", "Search");
    node.description = Some("Search products".into());
    let locators = accessibility_locators(&node);
    assert!(
        locators
            .iter()
            .any(|l| l.locator == r#"page.get_by_placeholder("Search products")"#)
    );
}

#[test]
fn accessibility_query_combines_role_matchers_and_state() {
    let mut node = ax("checkbox", "Remember me");
    node.selected = Some(true.into());

    let query = accessibility_query(&node, "Remember me");
    assert!(query.starts_with("//*[("));
    assert!(query.contains("self::input[@type='checkbox']"));
    assert!(query.ends_with("and (@checked='checked' or @aria-checked='true')]"));

    let plain = accessibility_query(&ax("button", "Go"), "Go");
    assert!(plain.contains("(self::button and contains(text(), 'Go'))"));
    assert!(!plain.contains("@aria-checked"));
}

#[test]
fn xpath_literal_quotes_apostrophes() {
    assert_eq!(xpath_literal("Don't"), "\"Don't\"");
}
