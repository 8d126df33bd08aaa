use crate::{
    error::ResolveError,
    rank::resolver::{Resolution, TwoStageResolver},
    snapshot::{
        accessibility::AxNode,
        markup::MarkupElement,
        normalizer::{normalize_accessibility, normalize_markup},
    },
};

pub mod cli;
pub mod embedding;
pub mod error;
pub mod locator;
pub mod rank;
pub mod snapshot;
pub mod trace;

/// Normalize a markup snapshot and resolve `instruction` against it.
pub fn resolve_markup(
    resolver: &TwoStageResolver,
    root: &MarkupElement,
    instruction: &str,
) -> Result<Resolution, ResolveError> {
    let candidates = normalize_markup(root);
    resolver.resolve(instruction, &candidates)
}

/// Normalize an accessibility snapshot (ignored nodes dropped) and resolve
/// `instruction` against it.
pub fn resolve_accessibility(
    resolver: &TwoStageResolver,
    root: &AxNode,
    instruction: &str,
) -> Result<Resolution, ResolveError> {
    let candidates = normalize_accessibility(root, false);
    resolver.resolve(instruction, &candidates)
}
