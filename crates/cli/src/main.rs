//! UI Forge CLI entry point.
//!
//! This binary is the composition root for the whole system. Responsibilities:
//!
//! 1. **Parse arguments and configuration**: load the optional TOML file and
//!    apply `UIFORGE_MODEL`.
//! 2. **Wire observability**: install `tracing-subscriber` with a pretty or
//!    JSON fmt layer and, when configured, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: build the [`HuggingFaceProvider`] from the
//!    environment and inject it into the [`PipelineExecutor`].
//! 4. **Run once**: invoke the pipeline under a deadline, racing Ctrl-C, and
//!    print the result. Nothing is persisted.

mod args;
mod input;
mod observability;

use std::future::Future;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use llm::HuggingFaceProvider;
use nodes::PipelineExecutor;
use pipeline::PipelineOutput;

use crate::args::{Args, OutputMode};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let telemetry = match observability::init(args.log_format) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(args).await;
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = input::load_config(args.config.as_deref(), args.model.as_deref()).await?;
    let provider =
        HuggingFaceProvider::from_env().context("model provider is not configured")?;
    tracing::info!(
        model = %config.model,
        base_url = %provider.config().base_url,
        "pipeline configured"
    );

    let executor = PipelineExecutor::new(Arc::new(provider), &config)?;
    let input = input::build_input(&args).await?;

    let deadline = Duration::from_secs(args.timeout_secs);
    let output = tokio::select! {
        result = tokio::time::timeout(deadline, executor.invoke(input)) => {
            result.map_err(|_| anyhow!("pipeline did not finish within {}s", args.timeout_secs))??
        }
        () = interrupted(tokio::signal::ctrl_c()) => bail!("interrupted"),
    };

    print_output(&output, args.output)
}

/// Resolves once `signal` reports Ctrl-C. If the handler cannot be installed
/// the run carries on and only the deadline can stop it.
async fn interrupted(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn print_output(output: &PipelineOutput, mode: OutputMode) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut stdout, output)?;
            writeln!(stdout)?;
        }
        OutputMode::Code => writeln!(stdout, "{}", output.final_code)?,
        OutputMode::Reply => writeln!(stdout, "{}", output.reply)?,
    }
    Ok(())
}
