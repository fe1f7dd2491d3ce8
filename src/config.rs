//! Run configuration
//!
//! Values come from an optional JSON file and are then overridden by
//! environment variables:
//!
//! | variable       | field         |
//! |----------------|---------------|
//! | `TRUSS_MODEL`  | `model_name`  |
//! | `TRUSS_CASE`   | `case`        |
//! | `TRUSS_UNIT`   | `unit`        |
//! | `TRUSS_INPUT`  | `input_root`  |
//! | `TRUSS_OUTPUT` | `output_root` |
//! | `TRUSS_SUBMIT` | `submit`      |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::StepOptions;
use crate::elements::{Material, MaterialCatalog, SectionPolicy};
use crate::error::{PrepError, PrepResult};
use crate::job::ExecutionPolicy;
use crate::model::ModelNames;

/// Length unit the input tables are written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "mm")]
    Millimeter,
}

impl LengthUnit {
    /// Model length units per metre
    pub fn scale(self) -> f64 {
        match self {
            LengthUnit::Meter => 1.0,
            LengthUnit::Millimeter => 1000.0,
        }
    }

    /// Directory name of the unit below the model's input directory
    pub fn dir_name(self) -> &'static str {
        match self {
            LengthUnit::Meter => "m",
            LengthUnit::Millimeter => "mm",
        }
    }

    pub fn parse(value: &str) -> PrepResult<Self> {
        match value.trim() {
            "m" => Ok(LengthUnit::Meter),
            "mm" => Ok(LengthUnit::Millimeter),
            other => Err(PrepError::InvalidInput(format!(
                "unknown length unit '{}' (expected m or mm)",
                other
            ))),
        }
    }
}

/// Everything a single preprocessing run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model_name: String,
    /// Load case identifier embedded in the table file names
    pub case: String,
    pub unit: LengthUnit,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub section_policy: SectionPolicy,
    pub step: StepOptions,
    pub execution: ExecutionPolicy,
    /// Additional catalog materials, in SI units
    pub materials: Vec<Material>,
    /// Submit the job to the solver after writing it
    pub submit: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_name: "25_bar".to_string(),
            case: "1".to_string(),
            unit: LengthUnit::Meter,
            input_root: PathBuf::from("input"),
            output_root: PathBuf::from("output"),
            section_policy: SectionPolicy::PerElement,
            step: StepOptions::default(),
            execution: ExecutionPolicy::default(),
            materials: Vec::new(),
            submit: false,
        }
    }
}

impl RunConfig {
    /// Read a configuration file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> PrepResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `TRUSS_*` overrides from the process environment
    pub fn apply_env(self) -> PrepResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> PrepResult<Self> {
        if let Some(model) = lookup("TRUSS_MODEL") {
            self.model_name = model;
        }
        if let Some(case) = lookup("TRUSS_CASE") {
            self.case = case;
        }
        if let Some(unit) = lookup("TRUSS_UNIT") {
            self.unit = LengthUnit::parse(&unit)?;
        }
        if let Some(input) = lookup("TRUSS_INPUT") {
            self.input_root = PathBuf::from(input);
        }
        if let Some(output) = lookup("TRUSS_OUTPUT") {
            self.output_root = PathBuf::from(output);
        }
        if let Some(submit) = lookup("TRUSS_SUBMIT") {
            self.submit = matches!(submit.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(self)
    }

    /// Directory holding the case tables: `<input_root>/<model>/<unit>`
    pub fn input_dir(&self) -> PathBuf {
        self.input_root
            .join(&self.model_name)
            .join(self.unit.dir_name())
    }

    /// Directory receiving the job artifacts: `<output_root>/<model>`
    pub fn work_dir(&self) -> PathBuf {
        self.output_root.join(&self.model_name)
    }

    pub fn names(&self) -> ModelNames {
        ModelNames::new(&self.model_name)
    }

    /// Built-in catalog plus configured materials, in model units
    pub fn catalog(&self) -> PrepResult<MaterialCatalog> {
        let scale = self.unit.scale();
        let mut catalog = MaterialCatalog::standard(scale);
        for material in &self.materials {
            catalog.insert(material.in_units(scale))?;
        }
        Ok(catalog)
    }
}
