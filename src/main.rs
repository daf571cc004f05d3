use anyhow::{Context, Result};
use clap::Parser;
use ev_tracker::cli::{render_error, run_repl, Cli, Session};
use ev_tracker::config::CONFIG_FILENAME;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let mut session = Session::open(&config_path, cli.infile.as_deref())
        .with_context(|| format!("Failed to start with config {}", config_path.display()))?;

    match cli.command {
        Some(command) => match session.execute(command) {
            Ok(output) => {
                println!("{}", output);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("{}", render_error(&e));
                Ok(ExitCode::FAILURE)
            }
        },
        None => {
            run_repl(&mut session, io::stdin().lock(), io::stdout().lock())
                .context("Failed to read from the terminal")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
