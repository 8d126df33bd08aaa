use crate::locator::locator_model::{quote, LocatorCandidate, StrategyType};
use crate::locator::scorer::{score_accessibility_locator, score_markup_locator};
use crate::snapshot::accessibility::{AxNode, CheckState};
use crate::snapshot::markup::ElementNode;

/// Below this length text is assumed unique enough for an exact match.
pub const EXACT_TEXT_LIMIT: usize = 30;

/// Roles the markup variant emits by-role locators for.
pub const MARKUP_ROLE_SET: &[&str] = &[
    "button", "link", "heading", "checkbox", "radio", "textbox", "searchbox", "combobox",
    "listbox", "option", "spinbutton", "slider", "switch", "listitem", "menu", "menuitem", "tab",
    "tabpanel", "dialog", "img",
];

/// Roles the accessibility variant emits by-role locators for.
pub const ACCESSIBILITY_ROLE_SET: &[&str] = &[
    "button", "link", "heading", "checkbox", "radio", "textbox", "listitem", "menu", "menuitem",
    "tab", "tabpanel", "dialog", "list", "listbox", "option", "combobox", "searchbox",
    "spinbutton", "slider", "switch", "tree", "treeitem", "grid", "gridcell", "row",
    "columnheader", "rowheader", "text", "generic", "banner", "main", "navigation",
    "contentinfo", "article", "section", "aside", "form", "search", "region", "complementary",
    "application",
];

const LABELLED_ROLES: &[&str] = &[
    "textbox", "checkbox", "radio", "combobox", "listbox", "spinbutton", "slider",
];

// ============================================================================
// Markup variant
// ============================================================================

/// Candidate locators for a cleaned markup element, unsorted.
pub fn markup_locators(node: &ElementNode) -> Vec<LocatorCandidate> {
    let text = node.full_text.as_str();
    let mut out = Vec::new();
    let mut push = |strategy: StrategyType, locator: String| {
        let score = score_markup_locator(strategy, &locator, &node.attributes, text);
        out.push(LocatorCandidate::new(strategy, locator, score));
    };

    if let (Some(role), Some(name)) = (node.role(), node.name()) {
        if MARKUP_ROLE_SET.contains(&role.as_str()) {
            push(StrategyType::Role, role_locator(&role, &[("name", quote(name))]));
        }
    }

    if let Some(label) = node.attr("aria-label") {
        push(StrategyType::Label, format!("page.get_by_label({})", quote(label)));
    }

    if !text.is_empty() {
        push(StrategyType::Text, text_locator(text));
    }

    if matches!(node.tag.as_str(), "input" | "textarea") {
        if let Some(placeholder) = node.attr("placeholder") {
            push(
                StrategyType::Placeholder,
                format!("page.get_by_placeholder({})", quote(placeholder)),
            );
        }
    }

    if let Some(test_id) = node.state.test_id.as_deref() {
        push(StrategyType::TestId, format!("page.get_by_test_id({})", quote(test_id)));
    }

    if let Some(id) = node.attr("id") {
        push(StrategyType::Id, format!("page.locator({})", quote(&id_selector(id))));
    } else {
        let classes = node.classes();
        if !classes.is_empty() {
            let selector = format!("{}.{}", node.tag, classes.join("."));
            push(StrategyType::Css, format!("page.locator({})", quote(&selector)));
        }
    }

    push(
        StrategyType::StructuralPath,
        format!("page.locator({})", quote(&format!("xpath={}", node.path))),
    );

    out
}

fn id_selector(id: &str) -> String {
    let plain = id
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if plain {
        format!("#{}", id)
    } else {
        format!("[id=\"{}\"]", id.replace('"', "\\\""))
    }
}

// ============================================================================
// Accessibility variant
// ============================================================================

/// Candidate locators for an accessibility node, unsorted. Disabled nodes
/// yield none.
pub fn accessibility_locators(node: &AxNode) -> Vec<LocatorCandidate> {
    if node.disabled {
        return Vec::new();
    }

    let role = node.role.as_str();
    let mut out = Vec::new();
    let mut push = |strategy: StrategyType, locator: String| {
        let score = score_accessibility_locator(strategy, &locator, node);
        out.push(LocatorCandidate::new(strategy, locator, score));
    };

    if let Some(name) = node.name() {
        if ACCESSIBILITY_ROLE_SET.contains(&role) {
            let mut options = vec![("name", quote(name))];
            if role == "heading" {
                if let Some(level) = node.level {
                    options.push(("level", level.to_string()));
                }
            }
            if role == "textbox" {
                if let Some(value) = node.value_text() {
                    options.push(("value", quote(&value)));
                }
            }
            if matches!(role, "checkbox" | "radio") {
                if let Some(checked) = node.selected.and_then(CheckState::as_bool) {
                    options.push(("checked", checked.to_string()));
                }
            }
            if role == "combobox" {
                if let Some(expanded) = node.expanded {
                    options.push(("expanded", expanded.to_string()));
                }
            }
            if node.required {
                options.push(("required", "true".to_string()));
            }
            push(StrategyType::Role, role_locator(role, &options));
        }

        push(StrategyType::Text, text_locator(&collapse(name)));

        if LABELLED_ROLES.contains(&role) {
            push(StrategyType::Label, format!("page.get_by_label({})", quote(name)));
        }

        push(
            StrategyType::AccessibilityQuery,
            format!("page.locator({})", quote(&accessibility_query(node, name))),
        );
    }

    if role == "textbox" {
        if let Some(description) = node.description() {
            push(
                StrategyType::Placeholder,
                format!("page.get_by_placeholder({})", quote(description)),
            );
        }
    }

    if let Some(test_id) = node.test_id() {
        push(StrategyType::TestId, format!("page.get_by_test_id({})", quote(test_id)));
    }

    out
}

/// XPath matching the node by label or text, widened with role-specific
/// matchers and narrowed by any state predicates.
pub fn accessibility_query(node: &AxNode, name: &str) -> String {
    let lit = xpath_literal(name);
    let contains_text = format!("contains(text(), {})", lit);
    let mut matchers = vec![format!("contains(@aria-label, {})", lit), contains_text.clone()];

    match node.role.as_str() {
        "heading" => {
            if let Some(level) = node.level {
                matchers.push(format!("(self::h{} and {})", level, contains_text));
                matchers.push(format!("(contains(@class, 'heading') and {})", contains_text));
                matchers.push(format!("(contains(@class, 'title') and {})", contains_text));
                matchers.push(format!("(@aria-level='{}' and {})", level, contains_text));
            }
        }
        "button" => {
            matchers.push(format!("(self::button and {})", contains_text));
            for class in ["btn", "button", "submit"] {
                matchers.push(format!("(contains(@class, '{}') and {})", class, contains_text));
            }
        }
        "link" => {
            matchers.push(format!("(self::a and {})", contains_text));
            for class in ["link", "nav-link"] {
                matchers.push(format!("(contains(@class, '{}') and {})", class, contains_text));
            }
        }
        "textbox" | "combobox" | "listbox" => {
            for attr in ["placeholder", "name", "id"] {
                matchers.push(format!("(self::input and contains(@{}, {}))", attr, lit));
            }
            matchers.push(format!("(self::textarea and contains(@placeholder, {}))", lit));
        }
        role @ ("checkbox" | "radio") => {
            for attr in ["name", "id"] {
                matchers.push(format!(
                    "(self::input[@type='{}'] and contains(@{}, {}))",
                    role, attr, lit
                ));
            }
        }
        _ => {}
    }

    let mut states = Vec::new();
    if node.disabled {
        states.push("@disabled='disabled' or @aria-disabled='true'".to_string());
    }
    if node.required {
        states.push("@required='required' or @aria-required='true'".to_string());
    }
    if let Some(checked) = node.selected {
        states.push(format!("@checked='checked' or @aria-checked='{}'", checked));
    }
    if let Some(expanded) = node.expanded {
        states.push(format!("@aria-expanded='{}'", expanded));
    }

    let name_conditions = matchers.join(" or ");
    if states.is_empty() {
        format!("//*[{}]", name_conditions)
    } else {
        let state_conditions = states
            .iter()
            .map(|s| format!("({})", s))
            .collect::<Vec<_>>()
            .join(" and ");
        format!("//*[({}) and {}]", name_conditions, state_conditions)
    }
}

/// XPath 1.0 string literal; falls back to `concat()` when both quote kinds appear.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        format!("'{}'", text)
    } else if !text.contains('"') {
        format!("\"{}\"", text)
    } else {
        let pieces: Vec<String> = text.split('\'').map(|p| format!("'{}'", p)).collect();
        format!("concat({})", pieces.join(", \"'\", "))
    }
}

// ============================================================================
// Shared
// ============================================================================

fn role_locator(role: &str, options: &[(&str, String)]) -> String {
    if options.is_empty() {
        return format!("page.get_by_role({})", quote(role));
    }
    let rendered = options
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    format!("page.get_by_role({}, {{ {} }})", quote(role), rendered)
}

fn text_locator(text: &str) -> String {
    if text.chars().count() < EXACT_TEXT_LIMIT {
        format!("page.get_by_text({}, {{ exact: true }})", quote(text))
    } else {
        format!("page.get_by_text({})", quote(text))
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
