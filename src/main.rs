//! bngblaster-cli - BNG Blaster control socket client.
//!
//! Sends a single JSON command to a running instance over its Unix control
//! socket, waits for the server to close the connection, and pretty-prints
//! the JSON reply.

mod client;
mod config;
mod error;
mod protocol;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use client::ExchangeOptions;
use config::Config;
use error::CliError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
    bngblaster-cli run.sock session-info outer-vlan 1 inner-vlan 1
    bngblaster-cli run.sock igmp-join outer-vlan 1 inner-vlan 1 group 239.0.0.1 source1 1.1.1.1 source2 2.2.2.2 source3 3.3.3.3
    bngblaster-cli run.sock igmp-info outer-vlan 1 inner-vlan 1";

#[derive(Debug, Parser)]
#[command(name = "bngblaster-cli")]
#[command(version, about = "BNG Blaster Control Socket Client")]
#[command(override_usage = "bngblaster-cli [OPTIONS] <SOCKET> <COMMAND> [<KEY> <VALUE>]...")]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Socket path, command name, then key/value argument pairs
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,

    /// Give up if the response is not complete after SECS seconds
    #[arg(short = 't', long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Use this configuration file instead of the default one
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log progress to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => report(err),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` applies when no `-v` is given.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("bngblaster_cli=debug"),
        _ => EnvFilter::new("bngblaster_cli=trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the request, resolve settings, and perform the exchange.
async fn run(cli: Cli) -> Result<String, CliError> {
    let invocation = client::build_request(&cli.tokens)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(CliError::Config)?;

    let options = ExchangeOptions {
        timeout: cli.timeout.map(Duration::from_secs).or_else(|| config.timeout()),
        indent: config.indent,
    };
    client::execute(&invocation, options).await
}

/// Print `err` where it belongs and pick the exit code.
fn report(err: CliError) -> ExitCode {
    if err.is_usage() {
        if matches!(err, CliError::MissingValue { .. }) {
            eprintln!("{}", diagnostic(&err));
        }
        println!("{}", Cli::command().render_help());
    } else {
        eprintln!("{}", diagnostic(&err));
    }
    ExitCode::from(err.exit_code())
}

/// The stderr line for `err`, in the same form clap uses for its own errors.
fn diagnostic(err: &CliError) -> String {
    format!("error: {}", err)
}
