use crate::snapshot::accessibility::AxNode;
use crate::snapshot::markup::ElementNode;

/// Attributes appended to a markup signature, in this order.
const SIGNATURE_ATTRIBUTES: &[&str] = &[
    "aria-label",
    "aria-labelledby",
    "id",
    "name",
    "placeholder",
    "alt",
    "title",
    "value",
    "type",
    "role",
    "href",
    "class",
];

/// Identity of a markup element: the tag, qualified by `type` for inputs
/// (`input[type="submit"]`).
pub fn markup_identity(node: &ElementNode) -> String {
    match (node.tag.as_str(), node.attr("type")) {
        ("input", Some(t)) => format!("input[type=\"{}\"]", t.to_lowercase()),
        _ => node.tag.clone(),
    }
}

/// Signature for a cleaned markup element, e.g.
/// `button: Sign In, id: login, class: btn primary`.
///
/// `None` when the element has nothing beyond its tag to say.
pub fn markup_signature(node: &ElementNode) -> Option<String> {
    if !node.has_semantic_content() {
        return None;
    }

    let identity = markup_identity(node);
    let mut parts = Vec::new();

    let text = node.text();
    if text.is_empty() {
        parts.push(identity);
    } else {
        parts.push(format!("{}: {}", identity, text));
    }

    for key in SIGNATURE_ATTRIBUTES {
        let value = match *key {
            "value" => node.value(),
            "type" if node.tag == "input" => None,
            _ => node.attr(key),
        };
        if let Some(value) = value {
            parts.push(format!("{}: {}", key, value));
        }
    }

    push_state(
        &mut parts,
        node.state.disabled,
        node.state.required,
        node.state.selected.map(|s| s.to_string()),
        node.state.expanded,
    );

    Some(parts.join(", "))
}

/// Identity of an accessibility node: the role, with the level for headings.
pub fn accessibility_identity(node: &AxNode) -> String {
    match node.level {
        Some(level) if node.role == "heading" => format!("{} (level {})", node.role, level),
        _ => node.role.clone(),
    }
}

/// Signature for an accessibility node, e.g. `heading (level 2), name: Welcome`.
pub fn accessibility_signature(node: &AxNode) -> Option<String> {
    if !node.has_semantic_content() {
        return None;
    }

    let mut parts = Vec::new();
    let identity = accessibility_identity(node);
    if !identity.is_empty() {
        parts.push(identity);
    }
    if let Some(name) = node.name() {
        parts.push(format!("name: {}", name));
    }
    if let Some(value) = node.value_text() {
        parts.push(format!("value: {}", value));
    }

    push_state(
        &mut parts,
        node.disabled,
        node.required,
        node.selected.map(|s| s.to_string()),
        node.expanded,
    );

    Some(parts.join(", "))
}

fn push_state(
    parts: &mut Vec<String>,
    disabled: bool,
    required: bool,
    selected: Option<String>,
    expanded: Option<bool>,
) {
    if disabled {
        parts.push("disabled: true".to_string());
    }
    if required {
        parts.push("required: true".to_string());
    }
    if let Some(selected) = selected {
        parts.push(format!("selected: {}", selected));
    }
    if let Some(expanded) = expanded {
        parts.push(format!("expanded: {}", expanded));
    }
}
