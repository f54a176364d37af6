use clap::Parser;
use std::process;

use taskboard::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli_args = Cli::parse();
    if let Err(error) = init_tracing(cli_args.quiet, cli_args.verbose) {
        eprintln!("taskboard error: {error:#}");
        process::exit(1);
    }

    let exit_code = cli::dispatch(cli_args).await;
    process::exit(exit_code);
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKBOARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
