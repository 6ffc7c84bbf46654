mod cli;
mod commands;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dpiscope_api::{ControllerConfig, SessionClient, TlsMode, TransportConfig};

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
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
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = ControllerConfig::from_uri(&cli.global.controller)?;
    let transport = transport_for(&cli.global);

    let client = SessionClient::connect(&config, &transport).await?;

    tracing::debug!(command = ?cli.command, site = %cli.global.site, "dispatching command");
    commands::dispatch(cli.command, &client, &transport, &cli.global).await
}

fn transport_for(global: &GlobalOpts) -> TransportConfig {
    TransportConfig {
        tls: if global.verify_tls {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        },
        timeout: std::time::Duration::from_secs(global.timeout),
        cookie_jar: None,
    }
}
