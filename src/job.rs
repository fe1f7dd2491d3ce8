//! Job descriptor - the complete, solver-ready description of one run

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisStep;
use crate::elements::TRUSS_ELEMENT_TYPE;
use crate::error::{PrepError, PrepResult};
use crate::loads::{effective_loads, ConcentratedForce, DisplacementRestraint, NodalLoad};
use crate::model::{ModelNames, StructuralModel};

/// Floating point precision of solver output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    #[default]
    Single,
    Double,
}

/// Memory granted to the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryPolicy {
    /// Share of physical memory, 1-100
    Percentage(u8),
    /// Absolute limit
    Megabytes(u64),
}

impl Default for MemoryPolicy {
    fn default() -> Self {
        MemoryPolicy::Percentage(90)
    }
}

/// How the solver should execute the job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionPolicy {
    pub precision: Precision,
    pub nodal_output_precision: Precision,
    pub memory: MemoryPolicy,
    /// Let the solver estimate memory from the analysis
    pub memory_from_analysis: bool,
    pub num_cpus: usize,
    pub num_gpus: usize,
    pub description: String,
}

impl Default for ExecutionPolicy {
    fn default() -> Self {
        Self {
            precision: Precision::Single,
            nodal_output_precision: Precision::Single,
            memory: MemoryPolicy::default(),
            memory_from_analysis: true,
            num_cpus: 1,
            num_gpus: 0,
            description: String::new(),
        }
    }
}

impl ExecutionPolicy {
    fn validate(&self) -> PrepResult<()> {
        if self.num_cpus == 0 {
            return Err(PrepError::InvalidInput(
                "job needs at least one CPU".to_string(),
            ));
        }
        if let MemoryPolicy::Percentage(p) = self.memory {
            if p == 0 || p > 100 {
                return Err(PrepError::InvalidInput(format!(
                    "memory percentage {} outside 1-100",
                    p
                )));
            }
        }
        Ok(())
    }
}

/// Result quantities requested from the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRequests {
    /// Nodal outputs (displacements, reaction forces)
    pub nodal: Vec<String>,
    /// Element outputs (stresses)
    pub element: Vec<String>,
}

impl Default for OutputRequests {
    fn default() -> Self {
        Self {
            nodal: vec!["U".to_string(), "RF".to_string()],
            element: vec!["S".to_string()],
        }
    }
}

/// Everything the external solver needs for one analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub names: ModelNames,
    /// Solver element type of every member
    pub element_type: String,
    pub model: StructuralModel,
    pub step: AnalysisStep,
    /// Restraints in constraint-row order
    pub restraints: Vec<DisplacementRestraint>,
    /// Force records in force-row order
    pub loads: Vec<ConcentratedForce>,
    /// Forces summed per node and direction
    pub effective_loads: Vec<NodalLoad>,
    pub outputs: OutputRequests,
    pub execution: ExecutionPolicy,
}

impl JobDescriptor {
    /// Job name handed to the solver
    pub fn name(&self) -> &str {
        &self.names.job
    }

    /// Serialize the descriptor as pretty JSON
    pub fn to_json(&self) -> PrepResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Packages the assembled pieces into a [`JobDescriptor`]
#[derive(Debug, Clone)]
pub struct JobDescriptorBuilder {
    names: ModelNames,
    execution: ExecutionPolicy,
    outputs: OutputRequests,
}

impl JobDescriptorBuilder {
    pub fn new(names: ModelNames) -> Self {
        Self {
            names,
            execution: ExecutionPolicy::default(),
            outputs: OutputRequests::default(),
        }
    }

    /// Override the execution policy
    pub fn with_execution(mut self, execution: ExecutionPolicy) -> Self {
        self.execution = execution;
        self
    }

    /// Override the requested outputs
    pub fn with_outputs(mut self, outputs: OutputRequests) -> Self {
        self.outputs = outputs;
        self
    }

    /// Check consistency and build the descriptor
    pub fn build(
        self,
        model: StructuralModel,
        step: AnalysisStep,
        restraints: Vec<DisplacementRestraint>,
        loads: Vec<ConcentratedForce>,
    ) -> PrepResult<JobDescriptor> {
        if model.name != self.names.model {
            return Err(PrepError::InvalidInput(format!(
                "model '{}' does not match job context '{}'",
                model.name, self.names.model
            )));
        }
        if !model.sections_assigned() {
            return Err(PrepError::InvalidInput(
                "sections must be assigned before building the job".to_string(),
            ));
        }
        if step.name != self.names.step {
            return Err(PrepError::InvalidInput(format!(
                "step '{}' does not match job context '{}'",
                step.name, self.names.step
            )));
        }
        self.execution.validate()?;

        if restraints.is_empty() {
            tracing::warn!("Job '{}' has no displacement restraints", self.names.job);
        }

        let effective_loads = effective_loads(&loads);

        tracing::info!(
            "Job '{}': {} sections, {} restraints, {} loads on {} nodes, {} CPU / {} GPU",
            self.names.job,
            model.sections().len(),
            restraints.len(),
            loads.len(),
            effective_loads.len(),
            self.execution.num_cpus,
            self.execution.num_gpus
        );

        Ok(JobDescriptor {
            names: self.names,
            element_type: TRUSS_ELEMENT_TYPE.to_string(),
            model,
            step,
            restraints,
            loads,
            effective_loads,
            outputs: self.outputs,
            execution: self.execution,
        })
    }
}
