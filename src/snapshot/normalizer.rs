use tracing::debug;

use crate::locator::locator_model::{CandidateElement, LocatorCandidate};
use crate::locator::signature::{
    accessibility_identity, accessibility_signature, markup_identity, markup_signature,
};
use crate::locator::synthesizer::{accessibility_locators, markup_locators};
use crate::snapshot::accessibility::{filter_ignored, AxNode};
use crate::snapshot::markup::{clean, ElementNode, MarkupElement, IMPORTANT_TAGS};

/// Capabilities the normalizer needs from either snapshot shape.
pub trait SnapshotNode: Sized {
    /// Tag (markup) or role (accessibility) identity.
    fn identity(&self) -> String;
    fn name(&self) -> Option<&str>;
    fn children(&self) -> &[Self];

    /// Whether this node may be emitted at all; children are visited regardless.
    fn is_emittable(&self) -> bool {
        true
    }

    fn signature(&self) -> Option<String>;
    fn locators(&self) -> Vec<LocatorCandidate>;
}

impl SnapshotNode for ElementNode {
    fn identity(&self) -> String {
        markup_identity(self)
    }

    fn name(&self) -> Option<&str> {
        ElementNode::name(self)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_emittable(&self) -> bool {
        IMPORTANT_TAGS.contains(&self.tag.as_str())
    }

    fn signature(&self) -> Option<String> {
        markup_signature(self)
    }

    fn locators(&self) -> Vec<LocatorCandidate> {
        markup_locators(self)
    }
}

impl SnapshotNode for AxNode {
    fn identity(&self) -> String {
        accessibility_identity(self)
    }

    fn name(&self) -> Option<&str> {
        AxNode::name(self)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn signature(&self) -> Option<String> {
        accessibility_signature(self)
    }

    fn locators(&self) -> Vec<LocatorCandidate> {
        accessibility_locators(self)
    }
}

/// Pre-order walk producing candidates in document order.
pub fn collect_candidates<N: SnapshotNode>(root: &N) -> Vec<CandidateElement> {
    let mut out = Vec::new();
    visit(root, &mut out);
    out
}

fn visit<N: SnapshotNode>(node: &N, out: &mut Vec<CandidateElement>) {
    if node.is_emittable() {
        match node.signature() {
            Some(signature) => {
                let locators = node.locators();
                if locators.is_empty() {
                    debug!(
                        identity = %node.identity(),
                        name = node.name().unwrap_or(""),
                        "no locators for element"
                    );
                } else {
                    out.push(CandidateElement::new(signature, locators));
                }
            }
            None => debug!(
                identity = %node.identity(),
                "signature rejected: nothing beyond identity"
            ),
        }
    }

    for child in node.children() {
        visit(child, out);
    }
}

/// Clean a markup snapshot and normalize it into candidates.
pub fn normalize_markup(root: &MarkupElement) -> Vec<CandidateElement> {
    match clean(root) {
        Some(cleaned) => collect_candidates(&cleaned),
        None => Vec::new(),
    }
}

/// Normalize an accessibility snapshot. Ignored nodes are dropped with
/// their subtrees unless `include_ignored` is set.
pub fn normalize_accessibility(root: &AxNode, include_ignored: bool) -> Vec<CandidateElement> {
    if include_ignored {
        return collect_candidates(root);
    }
    match filter_ignored(root) {
        Some(filtered) => collect_candidates(&filtered),
        None => Vec::new(),
    }
}
