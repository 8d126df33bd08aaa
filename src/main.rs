use clap::Parser;
use semantic_locator::cli::commands::{cmd_candidates, cmd_resolve};
use semantic_locator::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Candidates {
            snapshot,
            kind,
            include_ignored,
        } => {
            // CLI > config > defaults
            let include_ignored = include_ignored || config.snapshot.include_ignored;
            cmd_candidates(&snapshot, &kind, include_ignored, cli.verbose)?;
        }
        Commands::Resolve {
            snapshot,
            instruction,
            kind,
            top_k,
            embedder,
            format,
            trace,
        } => {
            if let Some(top_k) = top_k {
                config.resolver.top_k = top_k;
            }
            if let Some(embedder) = embedder {
                config.embedding.provider = embedder;
            }
            if trace.is_some() {
                config.trace.path = trace;
            }
            cmd_resolve(&snapshot, &instruction, &kind, &format, &config)?;
        }
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("semantic_locator={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
