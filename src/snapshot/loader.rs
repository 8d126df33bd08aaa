use serde_json::Value;
use tracing::warn;

use crate::error::ResolveError;
use crate::locator::locator_model::{sort_locators, CandidateElement};
use crate::snapshot::accessibility::AxNode;
use crate::snapshot::markup::MarkupElement;
use crate::snapshot::normalizer::{normalize_accessibility, normalize_markup};

/// A loaded snapshot in one of the accepted shapes.
#[derive(Debug, Clone)]
pub enum Snapshot {
    Markup(MarkupElement),
    Accessibility(AxNode),
    /// Already normalized `[{signature, locators}]`
    Candidates(Vec<CandidateElement>),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    Auto,
    Markup,
    Accessibility,
}

impl SnapshotKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "auto" => Some(Self::Auto),
            "markup" | "html" | "dom" => Some(Self::Markup),
            "accessibility" | "ax" => Some(Self::Accessibility),
            _ => None,
        }
    }
}

impl Snapshot {
    /// Normalize into candidate elements (document order).
    pub fn candidates(&self, include_ignored: bool) -> Vec<CandidateElement> {
        match self {
            Snapshot::Markup(root) => normalize_markup(root),
            Snapshot::Accessibility(root) => normalize_accessibility(root, include_ignored),
            Snapshot::Candidates(list) => list
                .iter()
                .filter(|c| !c.signature.trim().is_empty())
                .cloned()
                .map(|mut c| {
                    sort_locators(&mut c.locators);
                    c
                })
                .collect(),
            Snapshot::Empty => Vec::new(),
        }
    }
}

pub fn load_snapshot(path: &str, kind: SnapshotKind) -> Result<Snapshot, ResolveError> {
    let content = std::fs::read_to_string(path).map_err(|source| ResolveError::SnapshotRead {
        path: path.to_string(),
        source,
    })?;
    parse_snapshot(&content, kind)
}

/// Parse snapshot JSON. Only invalid JSON is an error; a document of unknown
/// shape, or one whose nodes do not fit the detected shape, is `Snapshot::Empty`.
pub fn parse_snapshot(content: &str, kind: SnapshotKind) -> Result<Snapshot, ResolveError> {
    let value: Value = serde_json::from_str(content).map_err(|source| ResolveError::SnapshotParse {
        context: "snapshot".into(),
        source,
    })?;
    Ok(from_value(value, kind))
}

fn from_value(value: Value, kind: SnapshotKind) -> Snapshot {
    // Observer responses wrap the tree: {"accessibility_tree": {...}}
    let (value, kind) = match value {
        Value::Object(mut map) if map.contains_key("accessibility_tree") => (
            map.remove("accessibility_tree").unwrap_or(Value::Null),
            SnapshotKind::Accessibility,
        ),
        other => (other, kind),
    };

    if is_empty(&value) {
        return Snapshot::Empty;
    }

    let kind = match kind {
        SnapshotKind::Auto => match detect_kind(&value) {
            Some(kind) => kind,
            None => {
                warn!(shape = %describe(&value), "Unrecognised snapshot shape, no candidates");
                return Snapshot::Empty;
            }
        },
        explicit => explicit,
    };

    let snapshot = if value.is_array() {
        parse_as(value, "candidate list").map(Snapshot::Candidates)
    } else if kind == SnapshotKind::Markup {
        parse_as(value, "markup tree").map(Snapshot::Markup)
    } else {
        parse_as(value, "accessibility tree").map(Snapshot::Accessibility)
    };
    snapshot.unwrap_or(Snapshot::Empty)
}

fn detect_kind(value: &Value) -> Option<SnapshotKind> {
    match value {
        Value::Array(_) => Some(SnapshotKind::Auto),
        Value::Object(map) if map.contains_key("tag") => Some(SnapshotKind::Markup),
        Value::Object(map) if map.contains_key("role") => Some(SnapshotKind::Accessibility),
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => format!("object with keys [{}]", map.keys().cloned().collect::<Vec<_>>().join(", ")),
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Null => "null".to_string(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        _ => false,
    }
}

/// A tree that is valid JSON but not a valid snapshot is logged and treated
/// as empty.
fn parse_as<T: serde::de::DeserializeOwned>(value: Value, context: &str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(context, error = %e, "Malformed snapshot, no candidates");
            None
        }
    }
}
