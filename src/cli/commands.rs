use std::sync::Arc;

use crate::cli::config::{AppConfig, EmbeddingConfig};
use crate::embedding::hash_embedder::HashEmbedder;
use crate::embedding::ollama::OllamaEmbedder;
use crate::embedding::provider::EmbeddingProvider;
use crate::rank::resolver::{Resolution, TwoStageResolver};
use crate::snapshot::loader::{load_snapshot, SnapshotKind};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ResolutionTrace;

// ============================================================================
// candidates subcommand
// ============================================================================

pub fn cmd_candidates(
    snapshot_path: &str,
    kind: &str,
    include_ignored: bool,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = parse_kind(kind)?;
    let snapshot = load_snapshot(snapshot_path, kind)?;
    let candidates = snapshot.candidates(include_ignored);

    if verbose > 0 {
        eprintln!("{} candidate elements in {}", candidates.len(), snapshot_path);
    }

    println!("{}", serde_json::to_string_pretty(&candidates)?);
    Ok(())
}

// ============================================================================
// resolve subcommand
// ============================================================================

/// Resolve an instruction against a snapshot file. `config` already holds
/// the CLI overrides.
pub fn cmd_resolve(
    snapshot_path: &str,
    instruction: &str,
    kind: &str,
    format: &str,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind = parse_kind(kind)?;
    let snapshot = load_snapshot(snapshot_path, kind)?;
    let candidates = snapshot.candidates(config.snapshot.include_ignored);

    let provider = build_embedder(&config.embedding)?;
    let resolver = TwoStageResolver::new(provider)
        .with_top_k(config.resolver.top_k)
        .with_failure_policy(config.resolver.on_provider_failure);

    let tracer = match config.trace.path.as_deref() {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };
    let event = ResolutionTrace::now(instruction, candidates.len());

    let resolution = match resolver.resolve(instruction, &candidates) {
        Ok(resolution) => resolution,
        Err(e) => {
            tracer.log(&event.with_error(&e));
            return Err(e.into());
        }
    };
    tracer.log(&event.with_resolution(&resolution));

    let output = match format {
        "json" => serde_json::to_string_pretty(&resolution)?,
        _ => format_console_resolution(&resolution),
    };
    println!("{}", output);

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the embedding provider named in config.
pub fn build_embedder(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, Box<dyn std::error::Error>> {
    match config.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(config.dimensions))),
        "ollama" => Ok(Arc::new(OllamaEmbedder::new(
            config.endpoint.as_deref(),
            config.model.as_deref(),
            config.dimensions,
        ))),
        other => Err(format!("unknown embedder '{}' (expected hash or ollama)", other).into()),
    }
}

fn parse_kind(kind: &str) -> Result<SnapshotKind, Box<dyn std::error::Error>> {
    SnapshotKind::parse(kind).ok_or_else(|| {
        format!("unknown snapshot kind '{}' (expected auto, markup or accessibility)", kind).into()
    })
}

/// Format a resolution for terminal output.
///
/// ```text
/// Query: Sign In (action: click)
///
///  1. 1.62  (semantic 0.71 + bonus 0.91)  button: Sign In
///           page.get_by_role("button", { name: "Sign In" })
/// ```
pub fn format_console_resolution(resolution: &Resolution) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Query: {} (action: {})\n",
        resolution.query, resolution.action
    ));
    if resolution.fallback {
        out.push_str("Embedding provider unavailable; showing the statically best locator\n");
    }
    out.push('\n');

    if resolution.ranked.is_empty() {
        out.push_str("No matching elements.\n");
        return out;
    }

    for (i, r) in resolution.ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:.2}  (semantic {:.2} + bonus {:.2})  {}\n",
            i + 1,
            r.final_score,
            r.semantic_score,
            r.heuristic_bonus,
            r.signature()
        ));
        if let Some(best) = r.candidate.best_locator() {
            out.push_str(&format!("          {}\n", best.locator));
        }
    }

    out
}
