use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::embedding::hash_embedder::DEFAULT_DIMENSIONS;
use crate::rank::resolver::{ProviderFailurePolicy, DEFAULT_TOP_K};

pub const DEFAULT_CONFIG_PATH: &str = "semantic-locator.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "semantic-locator",
    version,
    about = "Resolve natural-language instructions to element locators"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: semantic-locator.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a snapshot and print candidate elements with their locators
    Candidates {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Snapshot shape: auto, markup or accessibility
        #[arg(long, default_value = "auto")]
        kind: String,

        /// Keep accessibility nodes marked ignored
        #[arg(long)]
        include_ignored: bool,
    },

    /// Rank snapshot candidates against an instruction
    Resolve {
        /// Snapshot JSON file
        #[arg(long)]
        snapshot: String,

        /// Instruction, e.g. "Click the 'Sign In' button"
        #[arg(long)]
        instruction: String,

        /// Snapshot shape: auto, markup or accessibility
        #[arg(long, default_value = "auto")]
        kind: String,

        /// Maximum candidates kept after Stage-1
        #[arg(long)]
        top_k: Option<usize>,

        /// Embedding provider: hash or ollama
        #[arg(long)]
        embedder: Option<String>,

        /// Output format: console or json
        #[arg(long, default_value = "console")]
        format: String,

        /// Append a JSONL resolution trace to this file
        #[arg(long)]
        trace: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `semantic-locator.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub on_provider_failure: ProviderFailurePolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            on_provider_failure: ProviderFailurePolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    pub endpoint: Option<String>,
    pub model: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimensions: DEFAULT_DIMENSIONS,
            endpoint: None,
            model: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub include_ignored: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_top_k() -> usize { DEFAULT_TOP_K }
fn default_provider() -> String { "hash".to_string() }
fn default_dimensions() -> usize { DEFAULT_DIMENSIONS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}
