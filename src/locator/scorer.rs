use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::locator::locator_model::StrategyType;
use crate::snapshot::accessibility::{AxNode, INTERACTIVE_ROLES, VALUE_ROLES};

/// Utility classes that say nothing about which element is meant.
const GENERIC_CLASSES: &[&str] = &[
    "btn", "main", "container", "row", "col", "card", "modal", "wrapper", "active", "flex",
];

/// Locator strings longer than this are brittle.
const LOCATOR_LENGTH_CEILING: usize = 200;

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("uuid pattern is valid")
});

static TRAILING_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4,}$").expect("counter pattern is valid"));

const GENERIC_NAMES: &[&str] = &[
    "click", "submit", "ok", "cancel", "yes", "no", "next", "previous", "back", "forward",
    "close", "open", "save", "delete", "edit", "add", "remove", "search", "filter", "sort",
    "refresh", "reload", "loading", "error", "success", "warning", "info", "help",
];

pub fn markup_base_score(strategy: StrategyType) -> f32 {
    match strategy {
        StrategyType::Role => 0.9,
        StrategyType::Label => 0.85,
        StrategyType::Placeholder => 0.85,
        StrategyType::TestId => 0.88,
        StrategyType::Text => 0.75,
        StrategyType::Id => 0.7,
        StrategyType::Css => 0.6,
        StrategyType::StructuralPath => 0.4,
        StrategyType::AccessibilityQuery | StrategyType::Unknown => 0.0,
    }
}

pub fn accessibility_base_score(strategy: StrategyType) -> f32 {
    match strategy {
        StrategyType::Role => 0.95,
        StrategyType::Label => 0.9,
        StrategyType::TestId => 0.88,
        StrategyType::Placeholder => 0.85,
        StrategyType::Text => 0.8,
        StrategyType::Id => 0.7,
        StrategyType::AccessibilityQuery | StrategyType::StructuralPath | StrategyType::Css => 0.6,
        StrategyType::Unknown => 0.0,
    }
}

/// Score a markup locator from the element's allow-listed attributes and
/// visible text.
pub fn score_markup_locator(
    strategy: StrategyType,
    _locator: &str,
    attributes: &BTreeMap<String, String>,
    text: &str,
) -> f32 {
    let mut score = markup_base_score(strategy);
    let attr = |key: &str| attributes.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if attr("aria-label").is_some() {
        score += 0.1;
    }

    let checked_text = match strategy {
        StrategyType::Label => attr("aria-label"),
        StrategyType::Text => Some(text.trim()).filter(|t| !t.is_empty()),
        _ => None,
    };
    if let Some(checked) = checked_text {
        let words = checked.split_whitespace().count();
        if words <= 5 {
            score += 0.05;
        }
        if words > 10 {
            score -= 0.1;
        }
        if is_shouting_or_symbolic(checked) {
            score -= 0.05;
        }
    }

    if attr("id").map(is_generated_id).unwrap_or(false) {
        score -= 0.2;
    }

    if let Some(class) = attr("class") {
        if class.split_whitespace().any(|c| GENERIC_CLASSES.contains(&c)) {
            score -= 0.15;
        }
    }

    if text.trim().is_empty() {
        score -= 0.3;
    }

    finalize(score)
}

/// Score an accessibility-tree locator from the node's properties.
pub fn score_accessibility_locator(strategy: StrategyType, locator: &str, node: &AxNode) -> f32 {
    let mut score = accessibility_base_score(strategy);
    let role = node.role.as_str();
    let interactive = INTERACTIVE_ROLES.contains(&role);

    if interactive {
        score += 0.05;
    }

    match node.name() {
        Some(name) => {
            let words = name.split_whitespace().count();
            if (1..=5).contains(&words) {
                score += 0.05;
            } else if words > 10 {
                score -= 0.05;
            }
            if !is_generic_name(name) {
                score += 0.03;
            }
        }
        None => {
            if strategy != StrategyType::Role || !interactive {
                score -= 0.1;
            }
            if matches!(role, "generic" | "text") {
                score -= 0.15;
            }
        }
    }

    if node.value_text().is_some() && VALUE_ROLES.contains(&role) {
        score += 0.02;
    }
    if node.required {
        score += 0.02;
    }
    if role == "heading" && node.level.is_some() {
        score += 0.02;
    }
    if matches!(role, "checkbox" | "radio") && node.selected.is_some() {
        score += 0.02;
    }
    if role == "combobox" && node.expanded.is_some() {
        score += 0.02;
    }

    if matches!(role, "button" | "link" | "heading") {
        score += 0.02;
    }

    if locator.chars().count() > LOCATOR_LENGTH_CEILING {
        score -= 0.05;
    }

    finalize(score)
}

/// Ids that are regenerated per build: UUIDs, hex hashes, counters.
pub fn is_generated_id(id: &str) -> bool {
    if UUID.is_match(id) || TRAILING_COUNTER.is_match(id) {
        return true;
    }
    id.split(['-', '_', ':']).any(|segment| {
        segment.len() >= 6
            && segment.chars().all(|c| c.is_ascii_hexdigit())
            && segment.chars().any(|c| c.is_ascii_digit())
            && segment.chars().any(|c| c.is_ascii_alphabetic())
    })
}

fn is_shouting_or_symbolic(text: &str) -> bool {
    let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
    if letters.peek().is_none() {
        return true;
    }
    letters.all(|c| c.is_uppercase())
}

fn is_generic_name(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    GENERIC_NAMES.contains(&lower.as_str())
        || lower.chars().count() <= 2
        || !lower.chars().any(|c| c.is_alphabetic())
}

/// Clamp to [0, 1] and round to two decimals.
fn finalize(score: f32) -> f32 {
    (score.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_detected() {
        assert!(is_generated_id("3f2504e0-4f89-11d3-9a0c-0305e82c3301"));
        assert!(is_generated_id("el-9f86d081"));
        assert!(is_generated_id("row12345"));
        assert!(!is_generated_id("login-button"));
        assert!(!is_generated_id("email"));
        assert!(!is_generated_id("step2"));
    }

    #[test]
    fn shouting_and_symbols() {
        assert!(is_shouting_or_symbolic("SIGN IN"));
        assert!(is_shouting_or_symbolic("→ 42"));
        assert!(!is_shouting_or_symbolic("Sign In"));
    }
}
