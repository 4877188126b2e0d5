//! GTP front end for the Monte Carlo Go engine.
//!
//! Reads Go Text Protocol commands on stdin and writes replies on stdout;
//! diagnostics go to stderr so the protocol stream stays clean. Besides
//! the standard commands the engine registers `mcts-show` (search-tree
//! dump), `param` (runtime parameter table) and `perft`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

mod repl;
mod session;

use repl::GtpRepl;
use session::EngineSession;

#[derive(Parser, Debug)]
#[command(name = "gtp", about = "Monte Carlo Go engine speaking GTP on stdin/stdout")]
struct Args {
    /// Board size (overrides config)
    #[arg(long)]
    size: Option<usize>,

    /// Komi (overrides config)
    #[arg(long)]
    komi: Option<f32>,

    /// Playouts per genmove (overrides config)
    #[arg(long)]
    playouts: Option<u32>,

    /// Seed of the search's random number generator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Explicit config file instead of the default search locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,
}

/// Initialize tracing to stderr, honoring `RUST_LOG` when set.
fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => engine_config::load_from_path(path),
        None => engine_config::load_config(),
    };
    if let Some(size) = args.size {
        config.board.size = size;
    }
    if let Some(komi) = args.komi {
        config.board.komi = komi;
    }
    if let Some(playouts) = args.playouts {
        config.search.playout_count = playouts;
    }
    if let Some(level) = &args.log_level {
        config.engine.log_level = level.clone();
    }

    init_tracing(&config.engine.log_level);
    info!(
        name = %config.engine.name,
        size = config.board.size,
        playouts = config.search.playout_count,
        seed = args.seed,
        "engine starting"
    );

    let session = EngineSession::new(&config, args.seed);
    let mut repl = GtpRepl::new(session, config.engine.name.clone());
    repl.run(std::io::stdin().lock(), std::io::stdout().lock())?;

    info!("engine shutting down");
    Ok(())
}
