//! Analysis step definition

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Name of the solver's implicit base state
pub const INITIAL_STEP: &str = "Initial";

/// Analysis procedure of a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Procedure {
    #[default]
    Static,
}

/// Overridable increment controls for the analysis step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepOptions {
    /// Geometric nonlinearity (large displacements)
    pub nlgeom: bool,
    /// First time increment
    pub initial_increment: f64,
    /// Smallest allowed increment
    pub min_increment: f64,
    /// Largest allowed increment
    pub max_increment: f64,
    /// Total step time
    pub time_period: f64,
}

impl Default for StepOptions {
    fn default() -> Self {
        Self {
            nlgeom: true,
            initial_increment: 0.01,
            min_increment: 1e-30,
            max_increment: 0.05,
            time_period: 1.0,
        }
    }
}

impl StepOptions {
    /// Set the increment controls
    pub fn with_increments(mut self, initial: f64, min: f64, max: f64) -> Self {
        self.initial_increment = initial;
        self.min_increment = min;
        self.max_increment = max;
        self
    }

    /// Set the geometric nonlinearity flag
    pub fn with_nlgeom(mut self, nlgeom: bool) -> Self {
        self.nlgeom = nlgeom;
        self
    }

    fn validate(&self) -> PrepResult<()> {
        let all_positive = [
            self.initial_increment,
            self.min_increment,
            self.max_increment,
            self.time_period,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
        if !all_positive {
            return Err(PrepError::InvalidInput(
                "step increments and time period must be positive".to_string(),
            ));
        }
        if self.min_increment > self.initial_increment || self.initial_increment > self.max_increment
        {
            return Err(PrepError::InvalidInput(format!(
                "step increments must satisfy min <= initial <= max (got {}, {}, {})",
                self.min_increment, self.initial_increment, self.max_increment
            )));
        }
        if self.max_increment > self.time_period {
            return Err(PrepError::InvalidInput(format!(
                "maximum increment {} exceeds time period {}",
                self.max_increment, self.time_period
            )));
        }
        Ok(())
    }
}

/// The single analysis step of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStep {
    pub name: String,
    /// Step this one follows
    pub previous: String,
    pub procedure: Procedure,
    pub nlgeom: bool,
    pub initial_increment: f64,
    pub min_increment: f64,
    pub max_increment: f64,
    pub time_period: f64,
}

impl AnalysisStep {
    /// Build the static step `name` following the initial state
    pub fn build(name: &str, options: &StepOptions) -> PrepResult<Self> {
        options.validate()?;
        let step = Self {
            name: name.to_string(),
            previous: INITIAL_STEP.to_string(),
            procedure: Procedure::Static,
            nlgeom: options.nlgeom,
            initial_increment: options.initial_increment,
            min_increment: options.min_increment,
            max_increment: options.max_increment,
            time_period: options.time_period,
        };
        tracing::info!(
            "Step '{}': {:?}, nlgeom={}, inc {}/{}/{}",
            step.name,
            step.procedure,
            step.nlgeom,
            step.initial_increment,
            step.min_increment,
            step.max_increment
        );
        Ok(step)
    }
}
