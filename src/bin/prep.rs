//! Truss preprocessor command line
//!
//! Usage: `truss-prep [config.json]`. See [`truss_prep::config`] for the
//! environment overrides.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use truss_prep::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "truss_prep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_file(Path::new(&path))
            .with_context(|| format!("Failed to read configuration {}", path))?,
        None => RunConfig::default(),
    }
    .apply_env()
    .context("Invalid environment override")?;

    tracing::info!(
        "Preprocessing model '{}' case {} ({}) from {:?}",
        config.model_name,
        config.case,
        config.unit.dir_name(),
        config.input_dir()
    );

    let job = assemble(&config).with_context(|| {
        format!(
            "Failed to assemble case {} of model '{}'",
            config.case, config.model_name
        )
    })?;

    let work_dir = config.work_dir();
    let artifacts = write_artifacts(&job, &work_dir)
        .with_context(|| format!("Failed to write job files to {:?}", work_dir))?;
    println!("{}", artifacts.descriptor.display());
    println!("{}", artifacts.deck.display());

    if config.submit {
        let mut solver = CalculixSolver::new(&work_dir);
        let handle = solver.submit(&job).context("Failed to submit job")?;
        let outcome = solver
            .wait_for_completion(handle)
            .context("Solver run failed")?;
        tracing::info!("Results in {:?}", outcome.result_file);
    }

    Ok(())
}
