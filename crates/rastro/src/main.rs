mod cli;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rastro_core::BatchTracker;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("error: {err}");
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = rastro_config::load_config()?;

    // CLI flags override file/env configuration.
    if cli.simulate {
        config.simulation = true;
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if let Some(ref auth) = cli.auth {
        config.upstream_auth = Some(auth.clone());
    }

    let tracker_config = rastro_config::to_tracker_config(&config)?;

    if cli.codes.len() > tracker_config.max_codes {
        return Err(CliError::TooManyCodes {
            given: cli.codes.len(),
            max: tracker_config.max_codes,
        });
    }

    let tracker = BatchTracker::from_config(&tracker_config)?;

    tracing::debug!(codes = cli.codes.len(), "dispatching lookups");
    let summary = tracker.track_batch(&cli.codes).await;

    println!("{}", output::render(&summary, cli.output));
    Ok(())
}
