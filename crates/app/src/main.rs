//! Alt - Main Entry Point
//!
//! Parses arguments, installs the tracing subscriber, and runs the
//! requested configuration with the built-in suites.

use std::process::ExitCode;
use std::sync::Arc;

use alt::cli::{EXIT_ERROR, Outcome};
use alt::{Cli, builtin_registry, execute};
use alt_application::Logger;
use alt_infrastructure::ReqwestInvoker;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_filter())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let invoker = match ReqwestInvoker::new() {
        Ok(invoker) => Arc::new(invoker),
        Err(e) => {
            tracing::error!("Failed to create HTTP client: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match execute(&cli, builtin_registry(invoker), Logger::current()).await {
        Ok(Outcome::Listed(lines)) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Ok(Outcome::Completed(summary)) => ExitCode::from(cli.exit_status(&summary)),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
