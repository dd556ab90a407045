pub mod cli;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod model;
pub mod parser;
pub mod sources;
pub mod task;
pub mod writer;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use crate::compiler::Solc;
use crate::task::GenerateTask;
use crate::writer::RustBindings;

pub fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = cli::Cli::parse();
    let config = args.task_config().with_context(|| "Reading configuration")?;

    // 1. ── Collect sources ────────────────────────────────────────────
    let inputs = sources::collect(&args.inputs, &args.extension);
    info!(
        files = inputs.len(),
        output = %config.output_dir.display(),
        package = %config.package,
        "generating contract bindings"
    );

    // 2. ── Prepare output ─────────────────────────────────────────────
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Creating {}", config.output_dir.display()))?;

    // 3. ── Compile + generate ─────────────────────────────────────────
    let task = GenerateTask::new(config, Solc::new(&args.solc), RustBindings);
    task.run(&inputs)?;

    Ok(())
}
