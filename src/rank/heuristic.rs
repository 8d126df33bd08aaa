use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ResolveError;
use crate::locator::locator_model::CandidateElement;
use crate::rank::rank_model::{sort_by_final_score, RankContext, RankedCandidate, RankingStrategy};

const BONUS_CAP: f32 = 1.0;
const OVERLAP_WEIGHT: f32 = 0.1;
const EXACT_MENTION_FACTOR: f32 = 1.5;
const COMPATIBLE_MENTION_FACTOR: f32 = 1.2;

static LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z0-9]+)").expect("tag pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Click,
    Input,
    Select,
    Verify,
    Unknown,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::Click => "click",
            ActionType::Input => "input",
            ActionType::Select => "select",
            ActionType::Verify => "verify",
            ActionType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Action profiles
// ============================================================================

/// A concrete element kind named in the instruction ("button", "link").
struct Mention {
    word: &'static str,
    exact: &'static [&'static str],
    compatible: &'static [&'static str],
}

struct ActionProfile {
    action: ActionType,
    keywords: &'static [&'static str],
    /// Tags, or compound selectors matched textually in the signature
    elements: &'static [&'static str],
    roles: &'static [&'static str],
    base_bonus: f32,
    mentions: &'static [Mention],
}

const TEXT_ENTRY_KINDS: &[&str] = &["input", "textarea", "textbox", "searchbox"];
const HEADING_KINDS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "heading"];

/// Detection order; earlier profiles win ties.
const PROFILES: &[ActionProfile] = &[
    ActionProfile {
        action: ActionType::Click,
        keywords: &["click", "press", "tap", "submit", "button"],
        elements: &["button", "a", "input[type=\"submit\"]", "input[type=\"button\"]"],
        roles: &["button", "link", "menuitem", "tab"],
        base_bonus: 0.5,
        mentions: &[
            Mention {
                word: "button",
                exact: &["button", "input[type=\"submit\"]", "input[type=\"button\"]"],
                compatible: &["a", "link"],
            },
            Mention {
                word: "link",
                exact: &["a", "link"],
                compatible: &[],
            },
        ],
    },
    ActionProfile {
        action: ActionType::Input,
        keywords: &["enter", "type", "fill", "input", "write"],
        elements: &["input", "textarea"],
        roles: &["textbox", "searchbox"],
        base_bonus: 0.5,
        mentions: &[
            Mention {
                word: "field",
                exact: &[],
                compatible: TEXT_ENTRY_KINDS,
            },
            Mention {
                word: "input",
                exact: &[],
                compatible: TEXT_ENTRY_KINDS,
            },
            Mention {
                word: "text",
                exact: &[],
                compatible: TEXT_ENTRY_KINDS,
            },
        ],
    },
    ActionProfile {
        action: ActionType::Select,
        keywords: &["select", "choose", "pick", "dropdown"],
        elements: &["select", "option"],
        roles: &["listbox", "option", "combobox"],
        base_bonus: 0.5,
        mentions: &[
            Mention {
                word: "dropdown",
                exact: &["select", "combobox", "listbox"],
                compatible: &["option"],
            },
            Mention {
                word: "option",
                exact: &["option"],
                compatible: &[],
            },
        ],
    },
    ActionProfile {
        action: ActionType::Verify,
        keywords: &["find", "see", "look", "check", "verify", "confirm"],
        elements: &["h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "div"],
        roles: &["heading", "text"],
        base_bonus: 0.2,
        mentions: &[
            Mention {
                word: "heading",
                exact: HEADING_KINDS,
                compatible: &[],
            },
            Mention {
                word: "title",
                exact: HEADING_KINDS,
                compatible: &[],
            },
        ],
    },
];

fn profile_for(action: ActionType) -> Option<&'static ActionProfile> {
    PROFILES.iter().find(|p| p.action == action)
}

// ============================================================================
// Detection and scoring
// ============================================================================

/// Lower-cased alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Action with the most whole-word keyword hits; `Unknown` when none hit.
pub fn detect_action_type(instruction: &str) -> ActionType {
    let tokens = words(instruction);
    let mut best = (ActionType::Unknown, 0usize);

    for profile in PROFILES {
        let count = tokens
            .iter()
            .filter(|t| profile.keywords.contains(&t.as_str()))
            .count();
        if count > best.1 {
            best = (profile.action, count);
        }
    }

    best.0
}

/// How a candidate's Stage-2 bonus was made up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BonusBreakdown {
    pub priority: f32,
    pub mention: f32,
    pub overlap: f32,
    pub total: f32,
}

/// Tag from the signature's leading token, plus the by-role locator's role.
fn candidate_kinds(candidate: &CandidateElement) -> Vec<String> {
    let lowered = candidate.signature.to_lowercase();
    let mut kinds = Vec::new();
    if let Some(m) = LEADING_TAG.captures(&lowered).and_then(|c| c.get(1)) {
        kinds.push(m.as_str().to_string());
    }
    if let Some(role) = candidate.role() {
        kinds.push(role.to_lowercase());
    }
    kinds
}

fn matches_any(kinds: &[String], signature: &str, set: &[&str]) -> bool {
    set.iter().any(|entry| {
        if entry.contains('[') {
            signature.contains(entry)
        } else {
            kinds.iter().any(|k| k == entry)
        }
    })
}

/// Stage-2 bonus for one candidate under an already detected action.
pub fn bonus_for(candidate: &CandidateElement, instruction: &str, action: ActionType) -> BonusBreakdown {
    let Some(profile) = profile_for(action) else {
        return BonusBreakdown::default();
    };

    let kinds = candidate_kinds(candidate);
    let signature = candidate.signature.as_str();
    let mut breakdown = BonusBreakdown::default();

    if matches_any(&kinds, signature, profile.elements) || matches_any(&kinds, signature, profile.roles) {
        breakdown.priority = profile.base_bonus;
    }

    let instruction_words: BTreeSet<String> = words(instruction).into_iter().collect();

    for mention in profile.mentions {
        if !instruction_words.contains(mention.word) {
            continue;
        }
        let factor = if matches_any(&kinds, signature, mention.exact) {
            EXACT_MENTION_FACTOR
        } else if matches_any(&kinds, signature, mention.compatible) {
            COMPATIBLE_MENTION_FACTOR
        } else {
            0.0
        };
        breakdown.mention = breakdown.mention.max(factor * profile.base_bonus);
    }

    if !instruction_words.is_empty() {
        let signature_words: BTreeSet<String> = words(signature).into_iter().collect();
        let shared = instruction_words.intersection(&signature_words).count();
        breakdown.overlap = shared as f32 / instruction_words.len() as f32 * OVERLAP_WEIGHT;
    }

    breakdown.total = (breakdown.priority + breakdown.mention + breakdown.overlap).min(BONUS_CAP);
    breakdown
}

/// Stage-2: actionability bonuses from the full instruction, then re-sort.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicRanker;

impl RankingStrategy for HeuristicRanker {
    fn rank(
        &self,
        candidates: Vec<RankedCandidate>,
        context: &RankContext,
    ) -> Result<Vec<RankedCandidate>, ResolveError> {
        let action = detect_action_type(&context.instruction);
        debug!(%action, "stage-2 action type");

        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|c| {
                let breakdown = bonus_for(&c.candidate, &context.instruction, action);
                debug!(
                    signature = %c.signature(),
                    priority = breakdown.priority,
                    mention = breakdown.mention,
                    overlap = breakdown.overlap,
                    total = breakdown.total,
                    "stage-2 bonus"
                );
                c.with_bonus(breakdown.total)
            })
            .collect();

        sort_by_final_score(&mut ranked);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_whole_words_only() {
        // "typeface" and "clicker" are not keywords
        assert_eq!(detect_action_type("Open the typeface clicker"), ActionType::Unknown);
        assert_eq!(detect_action_type("Type your name"), ActionType::Input);
    }

    #[test]
    fn leading_tag_ignores_compound_suffix() {
        let c = CandidateElement::new("input[type=\"submit\"], value: Go".into(), vec![]);
        assert_eq!(candidate_kinds(&c), vec!["input".to_string()]);
    }
}
