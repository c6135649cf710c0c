//! `clubdesk` entry point.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clubdesk_client::ClientConfig;
use clubdesk_console::cli::Cli;
use clubdesk_console::{Console, ConsoleError};
use clubdesk_observability::ObservabilityConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::default();
    if cli.json_logs {
        observability = observability.json();
    }
    clubdesk_observability::tracing::init(&observability);

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config = config.api_url(api_url);
    }
    if let Some(path) = cli.credentials {
        config = config.credentials_path(path);
    }

    let mut console = Console::connect(&config)?;
    Ok(console.execute(cli.command).await?)
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ConsoleError>() {
        // Hidden screens render nothing.
        Some(ConsoleError::Blocked { message, .. }) if message.is_empty() => {}
        Some(ConsoleError::Blocked { message, .. }) => eprintln!("{message}"),
        _ => eprintln!("error: {err:#}"),
    }
}
