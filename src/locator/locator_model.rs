use serde::{Deserialize, Serialize};

/// Strategy used to re-select an element in a live page.
///
/// Serialized names are the wire tags of the locator output. Names this
/// version does not know deserialize to `Unknown`, which scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    Role,
    Label,
    Text,
    Placeholder,
    TestId,
    Id,
    Css,
    StructuralPath,
    AccessibilityQuery,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorCandidate {
    #[serde(rename = "type")]
    pub strategy: StrategyType,
    pub locator: String,
    #[serde(rename = "score")]
    pub confidence: f32,
}

impl LocatorCandidate {
    pub fn new(strategy: StrategyType, locator: String, confidence: f32) -> Self {
        Self {
            strategy,
            locator,
            confidence,
        }
    }
}

/// A snapshot element that survived filtering and has a non-trivial signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateElement {
    pub signature: String,
    pub locators: Vec<LocatorCandidate>,
}

impl CandidateElement {
    /// Build a candidate; locators are sorted descending by confidence
    /// (stable, so synthesis order breaks ties).
    pub fn new(signature: String, mut locators: Vec<LocatorCandidate>) -> Self {
        sort_locators(&mut locators);
        Self {
            signature,
            locators,
        }
    }

    pub fn best_locator(&self) -> Option<&LocatorCandidate> {
        self.locators.first()
    }

    /// Role named by the first by-role locator, if any.
    pub fn role(&self) -> Option<&str> {
        self.locators
            .iter()
            .find(|l| l.strategy == StrategyType::Role)
            .and_then(|l| role_from_locator(&l.locator))
    }
}

pub fn sort_locators(locators: &mut [LocatorCandidate]) {
    locators.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

/// Quote a string for embedding in a locator expression.
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn role_from_locator(locator: &str) -> Option<&str> {
    let rest = locator.strip_prefix("page.get_by_role(\"")?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}
