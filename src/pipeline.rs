//! End-to-end model assembly
//!
//! Tables are loaded, the model is built and given sections, restraints and
//! loads are decoded, then the step and job are packaged. Each stage consumes
//! the previous one completely and the first error aborts the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::AnalysisStep;
use crate::config::RunConfig;
use crate::error::{PrepError, PrepResult};
use crate::job::{JobDescriptor, JobDescriptorBuilder};
use crate::loads::{assign_boundaries, assign_loads};
use crate::model::StructuralModel;
use crate::solver::deck;
use crate::tables::CaseTables;

/// Files written for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// JSON serialization of the descriptor
    pub descriptor: PathBuf,
    /// CalculiX input deck
    pub deck: PathBuf,
}

/// Load the configured case and assemble its job
pub fn assemble(config: &RunConfig) -> PrepResult<JobDescriptor> {
    let tables = CaseTables::load(&config.input_dir(), &config.case)?;
    assemble_tables(config, &tables)
}

/// Assemble a job from already loaded tables
pub fn assemble_tables(config: &RunConfig, tables: &CaseTables) -> PrepResult<JobDescriptor> {
    let names = config.names();
    let catalog = config.catalog()?;

    let mut model = StructuralModel::build(&names.model, &tables.topology, &tables.coordinates)?;
    model.assign_sections(&catalog, config.section_policy)?;

    let restraints = assign_boundaries(&model, &tables.constraints)?;
    let loads = assign_loads(&model, &tables.forces)?;

    let step = AnalysisStep::build(&names.step, &config.step)?;

    JobDescriptorBuilder::new(names)
        .with_execution(config.execution.clone())
        .build(model, step, restraints, loads)
}

/// Write `<job>.json` and `<job>.inp` into `dir`, creating it if needed
pub fn write_artifacts(job: &JobDescriptor, dir: &Path) -> PrepResult<Artifacts> {
    fs::create_dir_all(dir).map_err(|e| PrepError::io(dir, e))?;

    let descriptor = dir.join(format!("{}.json", job.name()));
    fs::write(&descriptor, job.to_json()?).map_err(|e| PrepError::io(&descriptor, e))?;

    let deck_path = dir.join(format!("{}.inp", job.name()));
    fs::write(&deck_path, deck::render(job)).map_err(|e| PrepError::io(&deck_path, e))?;

    tracing::info!("Wrote {:?} and {:?}", descriptor, deck_path);

    Ok(Artifacts {
        descriptor,
        deck: deck_path,
    })
}
