//! External solver interface
//!
//! The preprocessor stops at a [`JobDescriptor`]. A [`Solver`] takes it from
//! there; this crate never reads solver results.

mod calculix;
pub mod deck;

pub use calculix::{resolve_ccx_path, CalculixSolver};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PrepResult;
use crate::job::JobDescriptor;

/// Reference to a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: Uuid,
    pub job_name: String,
    pub submitted_at: DateTime<Utc>,
}

impl JobHandle {
    pub fn new(job_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_name: job_name.to_string(),
            submitted_at: Utc::now(),
        }
    }
}

/// A job that ran to completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub handle: JobHandle,
    pub finished_at: DateTime<Utc>,
    /// Where the solver left its results
    pub result_file: PathBuf,
}

/// A solver accepting job descriptors
pub trait Solver {
    /// Start the job described by `job`
    fn submit(&mut self, job: &JobDescriptor) -> PrepResult<JobHandle>;

    /// Block until the job finishes; a failed run is an error
    fn wait_for_completion(&mut self, handle: JobHandle) -> PrepResult<JobOutcome>;
}
