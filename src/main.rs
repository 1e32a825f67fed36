use anyhow::{Context, Result};
use clap::Parser;
use mokiy::evaluator::DEFAULT_MAX_DEPTH;
use mokiy::repl;
use mokiy::session::{Outcome, Session};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mokiy", version, about = "Tree-walking interpreter for the Monkey language")]
struct Cli {
    /// Script to run as a single chunk; starts a REPL when omitted.
    path: Option<PathBuf>,

    /// Nested calls and expressions allowed before evaluation is aborted.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> Result<()> {
    install_tracing();
    let cli = Cli::parse();
    let session = Session::with_max_depth(cli.max_depth);

    match cli.path {
        Some(path) => run_file(session, &path),
        None => {
            println!("Hello! This is the Monkey programming language!");
            println!("Feel free to type in commands");
            repl::start(session)
        }
    }
}

fn run_file(mut session: Session, path: &Path) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let outcome = session
        .run(&source)
        .with_context(|| format!("failed to evaluate {}", path.display()))?;
    let failed = matches!(outcome, Outcome::Diagnostics(_));
    repl::print_outcome(outcome);

    if failed {
        anyhow::bail!("{} did not parse", path.display());
    }
    Ok(())
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
