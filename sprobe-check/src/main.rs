//! check_sentinel: monitoring probe for a Redis Sentinel process.
//!
//! Prints exactly one `<SEVERITY> - <message>` line on stdout and exits with
//! 0 (OK), 1 (WARNING), 2 (CRITICAL) or 3 (UNKNOWN).

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use sprobe_check::{check_sentinel, CliArgs, Config, Severity, Verdict};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match CliArgs::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => return report(&Verdict::with(Severity::Unknown, first_line(&err.to_string()))),
    };

    let config = match load_config(cli) {
        Ok(config) => config,
        Err(err) => return report(&Verdict::with(Severity::Unknown, format!("{:#}", err))),
    };

    init_logging(&config.log_level);
    info!(
        host = %config.host,
        port = config.port,
        timeout = ?config.timeout,
        "Starting sentinel check"
    );

    report(&check_sentinel(config.client_config()))
}

fn load_config(cli: CliArgs) -> anyhow::Result<Config> {
    Config::from_args(cli).context("invalid configuration")
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report(verdict: &Verdict) -> ExitCode {
    // A closed stdout must not turn into a panic; the exit code still counts.
    let _ = writeln!(io::stdout().lock(), "{}", verdict.summary());
    ExitCode::from(verdict.exit_code())
}

/// clap renders usage hints over several lines; the summary keeps only the
/// error itself.
fn first_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or("invalid arguments");
    line.strip_prefix("error: ").unwrap_or(line).to_string()
}
