use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Roles whose value is part of their identity (form controls).
pub const VALUE_ROLES: &[&str] = &["textbox", "combobox", "listbox", "spinbutton", "slider"];

pub const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "radio", "textbox", "menuitem", "tab", "option", "combobox",
    "searchbox", "spinbutton", "slider", "switch", "treeitem", "gridcell",
];

/// `checked`/`selected` as Playwright reports it: a flag, or `"mixed"` for a
/// tristate checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckState {
    Flag(bool),
    Mixed(Mixed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mixed {
    Mixed,
}

impl CheckState {
    /// The flag, if the state is not tristate.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            CheckState::Flag(flag) => Some(flag),
            CheckState::Mixed(_) => None,
        }
    }
}

impl From<bool> for CheckState {
    fn from(flag: bool) -> Self {
        CheckState::Flag(flag)
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckState::Flag(flag) => write!(f, "{}", flag),
            CheckState::Mixed(_) => write!(f, "mixed"),
        }
    }
}

/// Platform accessibility tree node (Playwright `accessibility.snapshot()` shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxNode {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub name: String,
    /// String or number depending on the control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, alias = "checked", skip_serializing_if = "Option::is_none")]
    pub selected: Option<CheckState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default, alias = "data-testid", skip_serializing_if = "Option::is_none")]
    pub testid: Option<String>,
    #[serde(default)]
    pub children: Vec<AxNode>,
}

impl AxNode {
    pub fn new(role: &str, name: &str) -> Self {
        Self {
            role: role.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn child(mut self, child: AxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> Option<&str> {
        Some(self.name.trim()).filter(|n| !n.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn test_id(&self) -> Option<&str> {
        self.testid.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Value rendered as text; only form-control roles carry one.
    pub fn value_text(&self) -> Option<String> {
        if !VALUE_ROLES.contains(&self.role.as_str()) {
            return None;
        }
        let text = match self.value.as_ref()? {
            Value::String(s) => s.trim().to_string(),
            Value::Null => return None,
            other => other.to_string(),
        };
        Some(text).filter(|t| !t.is_empty())
    }

    pub fn is_interactive(&self) -> bool {
        INTERACTIVE_ROLES.contains(&self.role.as_str())
    }

    /// Same rule the markup tree uses: a name, or a form value.
    pub fn has_semantic_content(&self) -> bool {
        self.name().is_some() || self.value_text().is_some()
    }
}

/// Drop `ignored` nodes together with their subtrees.
pub fn filter_ignored(node: &AxNode) -> Option<AxNode> {
    if node.ignored {
        return None;
    }
    let mut filtered = node.clone();
    filtered.children = node.children.iter().filter_map(filter_ignored).collect();
    Some(filtered)
}
