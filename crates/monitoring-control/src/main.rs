mod cli;
mod config;
mod logging;
mod submit;
mod time_source;
mod transport;

use crate::cli::Args;
use crate::config::{load_control_config, ControlConfig};
use crate::logging::init_tracing;
use crate::submit::{exit_status, CommandEndpoint, Submitter, EXIT_FAILURE};
use crate::time_source::time_source_from_config;
use crate::transport::HttpTransport;
use anyhow::Context;
use clap::Parser;
use protocol::Operation;
use std::process::ExitCode;
use std::time::Duration;
use system_utils::hostname::local_fqdn;
use system_utils::path::expand_tilde;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config_path = expand_tilde(&args.config.to_string_lossy());
    let config = match load_control_config(&config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let log_dir = config.logging.dir.as_deref().map(expand_tilde);
    let _log_guard = match init_tracing(log_dir.as_deref(), args.log_to_stderr) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = run(&args, &config).await;
    match &result {
        Ok(()) => println!("OK"),
        Err(err) => eprintln!("{err:#}"),
    }
    ExitCode::from(exit_status(&result))
}

async fn run(args: &Args, config: &ControlConfig) -> anyhow::Result<()> {
    // Reject bad flags before spawning `hostname` or touching the network.
    Operation::parse(&args.operation, &args.downtime_type).map_err(anyhow::Error::msg)?;

    let endpoint = CommandEndpoint::from_config(&config.monitor)?;
    let transport = HttpTransport::new(Duration::from_millis(config.monitor.timeout_ms()))?;
    let submitter = Submitter::new(
        endpoint,
        Box::new(transport),
        time_source_from_config(&config.time),
    );

    let target = match args.target.as_deref().map(str::trim) {
        Some(target) if !target.is_empty() => target.to_string(),
        Some(_) => anyhow::bail!("--target must not be empty"),
        None => local_fqdn()
            .await
            .context("--target not given and the local hostname is unknown")?,
    };

    submitter
        .execute(&target, &args.operation, args.duration, &args.downtime_type)
        .await
}
