//! Truss Prep - a preprocessor for pin-jointed truss analyses
//!
//! This library turns the tabular description of a truss load case into a
//! complete, solver-ready analysis job:
//! - Node coordinates and 2-node truss members (`T3D2`)
//! - One linear-elastic section per member (or shared per area/material)
//! - Displacement restraints and concentrated loads decoded from axis codes
//! - A static, geometrically nonlinear analysis step
//! - A job descriptor with the solver execution policy
//!
//! Solving is left to an external [`solver::Solver`]; a CalculiX adapter is
//! included.
//!
//! ## Example
//! ```rust
//! use truss_prep::prelude::*;
//!
//! let tables = CaseTables {
//!     case: "1".to_string(),
//!     topology: parse_topology("con_1.csv", "1,2,1.0,polymer\n2,3,1.0,polymer\n").unwrap(),
//!     coordinates: parse_coordinates("coord_1.csv", "0,0,0\n1,0,0\n1,1,0\n").unwrap(),
//!     forces: parse_directional("forces_1.csv", "3,2,500.0\n3,4,-200.0\n").unwrap(),
//!     constraints: parse_directional("constraints_1.csv", "1,4,0\n1,2,0\n1,1,0\n").unwrap(),
//! };
//!
//! let job = assemble_tables(&RunConfig::default(), &tables).unwrap();
//! assert_eq!(job.model.sections().len(), 2);
//! assert_eq!(job.effective_loads[0].components, [Some(-200.0), Some(500.0), None]);
//! ```

pub mod analysis;
pub mod config;
pub mod dof;
pub mod elements;
pub mod error;
pub mod job;
pub mod loads;
pub mod model;
pub mod pipeline;
pub mod solver;
pub mod tables;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisStep, Procedure, StepOptions};
    pub use crate::config::{LengthUnit, RunConfig};
    pub use crate::dof::{decode, AxisCode, DofVector};
    pub use crate::elements::{
        Element, Material, MaterialCatalog, Node, NodeId, Section, SectionPolicy,
    };
    pub use crate::error::{PrepError, PrepResult};
    pub use crate::job::{
        ExecutionPolicy, JobDescriptor, JobDescriptorBuilder, MemoryPolicy, Precision,
    };
    pub use crate::loads::{
        assign_boundaries, assign_loads, effective_loads, ConcentratedForce,
        DisplacementRestraint, NodalLoad,
    };
    pub use crate::model::{ModelNames, StructuralModel};
    pub use crate::pipeline::{assemble, assemble_tables, write_artifacts, Artifacts};
    pub use crate::solver::{CalculixSolver, JobHandle, JobOutcome, Solver};
    pub use crate::tables::{
        parse_coordinates, parse_directional, parse_topology, CaseTables, CoordinateRow,
        DirectionalRow, TopologyRow,
    };
}
