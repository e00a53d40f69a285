// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use synthgen::backends::DefaultBackendFactory;
use synthgen::config::{load_config, validate_config, Config};
use synthgen::engine::{RunSummary, Scheduler};
use synthgen::errors::SchedulerError;
use synthgen::observability::init_tracing;
use synthgen::observability::messages::scheduler::RunFailed;
use synthgen::observability::messages::StructuredLog;
use synthgen::signals::cancel_on_shutdown_signal;
use synthgen::state::GenerationState;

#[derive(Parser)]
#[command(name = "synthgen")]
#[command(about = "Generate synthetic records from templated emitters")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every emitter until they finish or the process is interrupted
    Run {
        /// YAML configuration file
        config: PathBuf,

        /// Send every emitter's records to this output instead of its own
        #[arg(long)]
        output: Option<String>,

        /// Backend parameter, `key=value` for every emitter or `emitter.key=value` for one
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        params: Vec<(String, String)>,

        /// CSV file whose rows are served round-robin to `from_csv`
        #[arg(long, value_name = "PATH")]
        reference_csv: Option<PathBuf>,
    },

    /// Check a configuration file without running it
    Validate {
        /// YAML configuration file
        config: PathBuf,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run {
            config,
            output,
            params,
            reference_csv,
        } => {
            let config = load(&config, output.as_deref())?;
            let summary = run_config(config, output, params.into_iter().collect(), reference_csv).await?;
            print_summary(&summary);
        }
        Commands::Validate { config } => {
            let config = load(&config, None)?;
            println!(
                "Configuration is valid: {} emitters, {} outputs declared",
                config.emitters.len(),
                config.outputs.len()
            );
        }
    }
    Ok(())
}

/// Load the file and validate it as it will run, i.e. with the output
/// override already applied.
fn load(path: &Path, output_override: Option<&str>) -> anyhow::Result<Config> {
    let mut config = load_config(path)
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(output) = output_override {
        for emitter in &mut config.emitters {
            emitter.output = output.to_string();
        }
    }

    let factory = DefaultBackendFactory::default();
    let natives = factory.native().list_available_implementations();
    validate_config(&config, &natives).map_err(SchedulerError::Validation)?;

    Ok(config)
}

async fn run_config(
    config: Config,
    output: Option<String>,
    params: HashMap<String, String>,
    reference_csv: Option<PathBuf>,
) -> anyhow::Result<RunSummary> {
    let state = Arc::new(GenerationState::new());
    let scheduler = Scheduler::from_config(&config, state, Arc::new(DefaultBackendFactory::default()))
        .with_output_override(output)
        .with_external_params(params);

    if let Some(path) = reference_csv {
        let rows = scheduler.load_reference_csv(&path)?;
        println!("Loaded {} reference rows from {}", rows, path.display());
    }

    let cancel = CancellationToken::new();
    let signals = tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    let result = scheduler.run(&config.emitters, cancel.clone()).await;

    cancel.cancel();
    signals.await?.context("Failed to install signal handlers")?;

    result.map_err(|error| {
        RunFailed { error: &error }.log();
        error.into()
    })
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Run Summary");
    println!("═══════════════");
    println!("Emitters:   {}", summary.emitters);
    println!("Objects:    {}", summary.objects);
    println!("Bytes:      {}", summary.bytes);
    println!("Elapsed:    {:.2?}", summary.elapsed);
    let secs = summary.elapsed.as_secs_f64();
    if secs > 0.0 {
        println!("Rate:       {:.1} objects/s", summary.objects as f64 / secs);
    }
    if summary.close_failures > 0 {
        println!("⚠️  {} outputs failed to close", summary.close_failures);
    }
}
