use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use chrono::Utc;
use uuid::Uuid;

use super::{deck, JobHandle, JobOutcome, Solver};
use crate::error::{PrepError, PrepResult};
use crate::job::JobDescriptor;

/// Solver command: `CALCULIX_PATH`, else a repo-local `./bin/ccx`, else `ccx`
pub fn resolve_ccx_path() -> String {
    let ccx_path = std::env::var("CALCULIX_PATH").unwrap_or_else(|_| {
        if Path::new("./bin/ccx").exists() {
            "./bin/ccx".to_string()
        } else {
            "ccx".to_string()
        }
    });
    absolute_command(&ccx_path)
}

/// Canonicalize `command` when it names an existing file
///
/// The solver runs inside its work directory, so relative paths would break.
/// Bare names that do not exist here are left for a `PATH` lookup.
fn absolute_command(command: &str) -> String {
    fs::canonicalize(command)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| command.to_string())
}

/// Runs jobs through the CalculiX `ccx` executable
pub struct CalculixSolver {
    ccx_path: String,
    work_dir: PathBuf,
    running: HashMap<Uuid, Child>,
}

impl CalculixSolver {
    /// Solver writing decks into `work_dir`
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            ccx_path: resolve_ccx_path(),
            work_dir: work_dir.into(),
            running: HashMap::new(),
        }
    }

    /// Use a specific solver executable
    pub fn with_command(mut self, ccx_path: &str) -> Self {
        self.ccx_path = absolute_command(ccx_path);
        self
    }

    pub fn command(&self) -> &str {
        &self.ccx_path
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }
}

impl Solver for CalculixSolver {
    fn submit(&mut self, job: &JobDescriptor) -> PrepResult<JobHandle> {
        fs::create_dir_all(&self.work_dir).map_err(|e| PrepError::io(&self.work_dir, e))?;

        // ccx takes the job name without extension
        let inp_path = self.work_dir.join(format!("{}.inp", job.name()));
        fs::write(&inp_path, deck::render(job)).map_err(|e| PrepError::io(&inp_path, e))?;

        if job.execution.num_gpus > 0 {
            tracing::warn!(
                "CalculiX does not use GPUs; ignoring num_gpus={}",
                job.execution.num_gpus
            );
        }

        tracing::info!("Running command: {} -i {}", self.ccx_path, job.name());

        let child = Command::new(&self.ccx_path)
            .arg("-i")
            .arg(job.name())
            .current_dir(&self.work_dir)
            .env("OMP_NUM_THREADS", job.execution.num_cpus.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                PrepError::Solver(format!("Failed to execute {}: {}", self.ccx_path, e))
            })?;

        let handle = JobHandle::new(job.name());
        tracing::info!("Submitted job {} as {}", handle.job_name, handle.id);
        self.running.insert(handle.id, child);
        Ok(handle)
    }

    fn wait_for_completion(&mut self, handle: JobHandle) -> PrepResult<JobOutcome> {
        let child = self
            .running
            .remove(&handle.id)
            .ok_or_else(|| PrepError::Solver(format!("Unknown job handle {}", handle.id)))?;

        let output = child
            .wait_with_output()
            .map_err(|e| PrepError::Solver(format!("Failed to wait for {}: {}", handle.job_name, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            tracing::error!("CalculiX failed. Stderr: {}\nStdout: {}", stderr, stdout);
            return Err(PrepError::Solver(format!(
                "CalculiX exited with status {} for job {}",
                output.status, handle.job_name
            )));
        }

        let result_file = self.work_dir.join(format!("{}.dat", handle.job_name));
        tracing::info!(
            "Job {} finished in {} ms",
            handle.job_name,
            (Utc::now() - handle.submitted_at).num_milliseconds()
        );

        Ok(JobOutcome {
            handle,
            finished_at: Utc::now(),
            result_file,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::pipeline::assemble_tables;
    use crate::tables::{parse_coordinates, parse_directional, parse_topology, CaseTables};

    fn job() -> JobDescriptor {
        let tables = CaseTables {
            case: "1".to_string(),
            topology: parse_topology("con_1.csv", "1,2,0.01,polymer\n").unwrap(),
            coordinates: parse_coordinates("coord_1.csv", "0,0,0\n1,0,0\n").unwrap(),
            forces: parse_directional("forces_1.csv", "2,4,10\n").unwrap(),
            constraints: parse_directional("constraints_1.csv", "1,4,0\n1,2,0\n1,1,0\n")
                .unwrap(),
        };
        assemble_tables(&RunConfig::default(), &tables).unwrap()
    }

    #[test]
    fn test_successful_run_writes_deck() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = CalculixSolver::new(dir.path().join("work")).with_command("true");
        let handle = solver.submit(&job()).unwrap();
        assert_eq!(handle.job_name, "job-25_bar");
        let outcome = solver.wait_for_completion(handle).unwrap();
        assert_eq!(outcome.result_file, dir.path().join("work/job-25_bar.dat"));
        let deck = fs::read_to_string(dir.path().join("work/job-25_bar.inp")).unwrap();
        assert!(deck.starts_with("*HEADING"));
    }

    #[test]
    fn test_failing_run_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = CalculixSolver::new(dir.path()).with_command("false");
        let handle = solver.submit(&job()).unwrap();
        let err = solver.wait_for_completion(handle).unwrap_err();
        assert!(matches!(err, PrepError::Solver(_)));
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver =
            CalculixSolver::new(dir.path()).with_command("/nonexistent/ccx-binary");
        assert!(matches!(solver.submit(&job()), Err(PrepError::Solver(_))));
    }

    #[test]
    fn test_relative_command_runs_from_work_dir() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let script = bin.join("ccx");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        // Relative to the test process, not to the solver work directory
        let cwd = std::env::current_dir().unwrap();
        let relative = relative_to(&script, &cwd);
        assert!(relative.is_relative());

        let mut solver = CalculixSolver::new(dir.path().join("work"))
            .with_command(&relative.to_string_lossy());
        assert!(Path::new(solver.command()).is_absolute());
        assert_eq!(
            fs::canonicalize(solver.command()).unwrap(),
            fs::canonicalize(&script).unwrap()
        );

        let handle = solver.submit(&job()).unwrap();
        solver.wait_for_completion(handle).unwrap();
    }

    #[test]
    fn test_bare_command_left_for_path_lookup() {
        assert_eq!(absolute_command("ccx-not-installed-here"), "ccx-not-installed-here");
    }

    /// `target` expressed relative to `base`, both absolute
    fn relative_to(target: &Path, base: &Path) -> PathBuf {
        let target = fs::canonicalize(target).unwrap();
        let base = fs::canonicalize(base).unwrap();
        let common = target
            .components()
            .zip(base.components())
            .take_while(|(a, b)| a == b)
            .count();
        let mut relative = PathBuf::new();
        for _ in base.components().skip(common) {
            relative.push("..");
        }
        for part in target.components().skip(common) {
            relative.push(part);
        }
        relative
    }

    #[test]
    fn test_unknown_handle() {
        let dir = tempfile::tempdir().unwrap();
        let mut solver = CalculixSolver::new(dir.path());
        let err = solver
            .wait_for_completion(JobHandle::new("job-x"))
            .unwrap_err();
        assert!(matches!(err, PrepError::Solver(_)));
    }
}
