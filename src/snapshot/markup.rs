use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw markup snapshot node as produced by the page observer.
///
/// Text runs and comments are their own nodes so document order is kept:
/// `{"tag": "p", "children": [{"text": "Hello"}, {"tag": "b", ...}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text { text: String },
    Comment { comment: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkupElement {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Leading text run, shorthand for a first `{"text": ...}` child.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(MarkupNode::Text {
            text: text.to_string(),
        });
        self
    }

    pub fn child(mut self, child: MarkupElement) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.children.push(MarkupNode::Comment {
            comment: comment.to_string(),
        });
        self
    }
}

// ============================================================================
// Cleaned tree
// ============================================================================

pub const NON_VISUAL_TAGS: &[&str] = &[
    "head", "script", "style", "link", "meta", "noscript", "template",
];

pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "id",
    "class",
    "name",
    "type",
    "value",
    "aria-label",
    "aria-labelledby",
    "role",
    "placeholder",
    "href",
    "alt",
    "title",
];

/// Tags that may be emitted as candidates.
pub const IMPORTANT_TAGS: &[&str] = &[
    "div", "span", "a", "p", "h1", "h2", "h3", "h4", "h5", "h6", "section", "select", "option",
    "input", "button", "form", "label", "textarea", "img", "nav", "ul", "ol", "li", "table", "tr",
    "td", "th", "thead", "tbody", "main", "article", "aside", "header", "footer", "iframe",
    "canvas", "video", "audio",
];

const TEST_ID_ATTRIBUTES: &[&str] = &["data-testid", "data-test-id", "data-test", "data-cy"];

/// Identifying attributes: any of these makes an element worth describing.
const IDENTIFYING_ATTRIBUTES: &[&str] = &[
    "aria-label",
    "aria-labelledby",
    "id",
    "name",
    "placeholder",
    "alt",
    "title",
    "href",
];

pub const FORM_CONTROL_TAGS: &[&str] = &["input", "textarea", "select", "option"];

/// Tags whose accessible name is computed from their whole subtree text.
const NAME_FROM_CONTENT_TAGS: &[&str] = &[
    "a", "button", "label", "option", "summary", "h1", "h2", "h3", "h4", "h5", "h6",
];

const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "option", "summary", "label",
];

const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "radio", "textbox", "menuitem", "tab", "option", "combobox",
    "searchbox", "spinbutton", "slider", "switch", "treeitem", "gridcell",
];

/// State captured from the raw element before attributes are stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub test_id: Option<String>,
    pub disabled: bool,
    pub required: bool,
    pub selected: Option<bool>,
    pub expanded: Option<bool>,
}

/// Element after cleaning: allow-listed attributes only, visible subtree only.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Text runs that are direct children of this element.
    pub direct_text: String,
    /// All visible text in the subtree, in document order.
    pub full_text: String,
    /// Index-qualified structural path, computed against the raw tree.
    pub path: String,
    pub state: ElementState,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn is_form_control(&self) -> bool {
        FORM_CONTROL_TAGS.contains(&self.tag.as_str())
    }

    /// Text used to describe the element: whole subtree for tags that take
    /// their name from content, otherwise only the direct text runs.
    pub fn text(&self) -> &str {
        if NAME_FROM_CONTENT_TAGS.contains(&self.tag.as_str()) {
            &self.full_text
        } else {
            &self.direct_text
        }
    }

    /// Accessible name: aria-label, content text, alt, title, then placeholder
    /// for text entry controls.
    pub fn name(&self) -> Option<&str> {
        if let Some(label) = self.attr("aria-label") {
            return Some(label);
        }
        let text = self.text();
        if !text.is_empty() {
            return Some(text);
        }
        self.attr("alt").or_else(|| self.attr("title")).or_else(|| {
            if matches!(self.tag.as_str(), "input" | "textarea") {
                self.attr("placeholder")
            } else {
                None
            }
        })
    }

    pub fn value(&self) -> Option<&str> {
        if self.is_form_control() {
            self.attr("value")
        } else {
            None
        }
    }

    /// Explicit `role` attribute, else the implicit role of the tag.
    pub fn role(&self) -> Option<String> {
        if let Some(role) = self.attr("role") {
            return Some(role.to_lowercase());
        }

        let role = match self.tag.as_str() {
            "a" if self.attr("href").is_some() => "link",
            "button" | "summary" => "button",
            "input" => input_role(self.attr("type")),
            "textarea" => "textbox",
            "select" => "combobox",
            "option" => "option",
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
            "li" => "listitem",
            "ul" | "ol" => "list",
            "nav" => "navigation",
            "main" => "main",
            "form" => "form",
            "img" => "img",
            "table" => "table",
            "tr" => "row",
            "td" => "cell",
            "th" => "columnheader",
            "header" => "banner",
            "footer" => "contentinfo",
            "aside" => "complementary",
            "article" => "article",
            "section" => "region",
            _ => return None,
        };
        Some(role.to_string())
    }

    pub fn is_interactive(&self) -> bool {
        INTERACTIVE_TAGS.contains(&self.tag.as_str())
            || self
                .attr("role")
                .map(|r| INTERACTIVE_ROLES.contains(&r.to_lowercase().as_str()))
                .unwrap_or(false)
    }

    /// The single rule for "this element says something about itself":
    /// a name or text, a form value, or an identifying attribute.
    pub fn has_semantic_content(&self) -> bool {
        self.name().is_some()
            || self.value().is_some()
            || IDENTIFYING_ATTRIBUTES.iter().any(|a| self.attr(a).is_some())
    }
}

fn input_role(input_type: Option<&str>) -> &'static str {
    match input_type.map(|t| t.to_lowercase()).as_deref() {
        Some("checkbox") => "checkbox",
        Some("radio") => "radio",
        Some("submit") | Some("reset") | Some("button") | Some("image") => "button",
        Some("search") => "searchbox",
        Some("number") => "spinbutton",
        Some("range") => "slider",
        _ => "textbox",
    }
}

// ============================================================================
// Cleaning
// ============================================================================

/// Clean a raw markup snapshot.
///
/// Structural paths are computed while walking the raw tree, before any
/// node or attribute is removed, so sibling indices match the live page.
/// Returns `None` when nothing relevant survives.
pub fn clean(root: &MarkupElement) -> Option<ElementNode> {
    let tag = root.tag.to_lowercase();
    let path = format!("/{}", tag);
    let annotated = annotate(root, path)?;
    prune(annotated)
}

/// A hidden element drops its whole subtree, which is how hidden state
/// propagates to descendants.
fn annotate(el: &MarkupElement, path: String) -> Option<ElementNode> {
    let tag = el.tag.to_lowercase();
    if NON_VISUAL_TAGS.contains(&tag.as_str()) || is_hidden(el) {
        return None;
    }

    let mut direct_parts: Vec<String> = Vec::new();
    let mut full_parts: Vec<String> = Vec::new();
    let mut children = Vec::new();

    if let Some(text) = el.text.as_deref().map(collapse_whitespace).filter(|t| !t.is_empty()) {
        direct_parts.push(text.clone());
        full_parts.push(text);
    }

    // Sibling counts per tag over the raw children, hidden and non-visual included.
    let mut totals: BTreeMap<String, usize> = BTreeMap::new();
    for child in &el.children {
        if let MarkupNode::Element(c) = child {
            *totals.entry(c.tag.to_lowercase()).or_insert(0) += 1;
        }
    }
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for child in &el.children {
        match child {
            MarkupNode::Text { text } => {
                let text = collapse_whitespace(text);
                if !text.is_empty() {
                    direct_parts.push(text.clone());
                    full_parts.push(text);
                }
            }
            MarkupNode::Comment { .. } => {}
            MarkupNode::Element(c) => {
                let child_tag = c.tag.to_lowercase();
                let index = seen.entry(child_tag.clone()).or_insert(0);
                *index += 1;
                let segment = if totals.get(&child_tag).copied().unwrap_or(0) > 1 {
                    format!("{}[{}]", child_tag, index)
                } else {
                    child_tag.clone()
                };
                let child_path = if child_tag == "body" {
                    "/body".to_string()
                } else {
                    format!("{}/{}", path, segment)
                };

                if let Some(node) = annotate(c, child_path) {
                    if !node.full_text.is_empty() {
                        full_parts.push(node.full_text.clone());
                    }
                    children.push(node);
                }
            }
        }
    }

    Some(ElementNode {
        attributes: allowed_attributes(&el.attributes),
        state: capture_state(el),
        direct_text: direct_parts.join(" "),
        full_text: full_parts.join(" "),
        tag,
        path,
        children,
    })
}

/// Bottom-up relevance pass. Children are resolved first so the
/// "still has children" test sees the final child list.
fn prune(mut node: ElementNode) -> Option<ElementNode> {
    node.children = std::mem::take(&mut node.children)
        .into_iter()
        .filter_map(prune)
        .collect();

    if node.is_interactive() || node.has_semantic_content() || !node.children.is_empty() {
        Some(node)
    } else {
        None
    }
}

fn is_hidden(el: &MarkupElement) -> bool {
    let attr = |key: &str| {
        el.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    };

    if attr("hidden").is_some() {
        return true;
    }
    if el.tag.eq_ignore_ascii_case("input")
        && attr("type").map(|t| t.eq_ignore_ascii_case("hidden")).unwrap_or(false)
    {
        return true;
    }
    if let Some(style) = attr("style") {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.contains("display:none") || compact.contains("visibility:hidden") {
            return true;
        }
    }
    false
}

fn capture_state(el: &MarkupElement) -> ElementState {
    let attr = |key: &str| el.attributes.get(key).map(|v| v.trim().to_lowercase());
    let flag = |key: &str| attr(key).map(|v| v != "false").unwrap_or(false);
    let tri = |key: &str| attr(key).map(|v| v == "true");

    let test_id = TEST_ID_ATTRIBUTES
        .iter()
        .find_map(|k| el.attributes.get(*k))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let selected = if el.attributes.contains_key("checked") || el.attributes.contains_key("selected") {
        Some(true)
    } else {
        tri("aria-checked").or_else(|| tri("aria-selected"))
    };

    ElementState {
        test_id,
        disabled: el.attributes.contains_key("disabled") || flag("aria-disabled"),
        required: el.attributes.contains_key("required") || flag("aria-required"),
        selected,
        expanded: tri("aria-expanded"),
    }
}

fn allowed_attributes(attributes: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    attributes
        .iter()
        .filter(|(k, _)| ALLOWED_ATTRIBUTES.contains(&k.to_lowercase().as_str()))
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_roles_follow_type() {
        assert_eq!(input_role(Some("submit")), "button");
        assert_eq!(input_role(Some("EMAIL")), "textbox");
        assert_eq!(input_role(None), "textbox");
        assert_eq!(input_role(Some("range")), "slider");
    }

    #[test]
    fn aria_false_flags_are_not_set() {
        let el = MarkupElement::new("button")
            .attr("aria-disabled", "false")
            .attr("aria-expanded", "false");
        let state = capture_state(&el);
        assert!(!state.disabled);
        assert_eq!(state.expanded, Some(false));
    }
}
