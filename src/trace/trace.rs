use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rank::heuristic::ActionType;
use crate::rank::resolver::Resolution;

/// Number of ranked results kept in a trace line.
pub const TRACE_TOP_N: usize = 5;

/// One JSONL line per resolution request.
#[derive(Debug, Serialize)]
pub struct ResolutionTrace {
    pub timestamp_ms: u128,
    pub instruction: String,
    pub query: String,
    pub action: ActionType,
    pub candidate_count: usize,
    pub fallback: bool,
    pub top: Vec<TraceEntry>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TraceEntry {
    pub signature: String,
    pub locator: Option<String>,
    pub semantic_score: f32,
    pub heuristic_bonus: f32,
    pub final_score: f32,
}

impl ResolutionTrace {
    pub fn now(instruction: &str, candidate_count: usize) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            instruction: instruction.to_string(),
            query: String::new(),
            action: ActionType::Unknown,
            candidate_count,
            fallback: false,
            top: vec![],
            error: None,
        }
    }

    pub fn with_resolution(mut self, resolution: &Resolution) -> Self {
        self.query = resolution.query.clone();
        self.action = resolution.action;
        self.fallback = resolution.fallback;
        self.top = resolution
            .ranked
            .iter()
            .take(TRACE_TOP_N)
            .map(|r| TraceEntry {
                signature: r.candidate.signature.clone(),
                locator: r.candidate.best_locator().map(|l| l.locator.clone()),
                semantic_score: r.semantic_score,
                heuristic_bonus: r.heuristic_bonus,
                final_score: r.final_score,
            })
            .collect();
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
