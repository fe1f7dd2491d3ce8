//! Axis-code decoding for restraints and loads
//!
//! Each force or constraint row names one Cartesian direction with a compact
//! code. The mapping is a closed set of three single-axis values:
//!
//! | code | component |
//! |------|-----------|
//! | 4    | 0 (x)     |
//! | 2    | 1 (y)     |
//! | 1    | 2 (z)     |
//!
//! Combined codes (3, 5, 6, 7) and 0 have no meaning and are rejected.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Three translational components; `None` means the direction is not
/// restrained or loaded, which is different from `Some(0.0)`.
pub type DofVector = [Option<f64>; 3];

/// A single Cartesian direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisCode {
    X,
    Y,
    Z,
}

impl AxisCode {
    /// Component index in a [`DofVector`]
    pub fn component(self) -> usize {
        match self {
            AxisCode::X => 0,
            AxisCode::Y => 1,
            AxisCode::Z => 2,
        }
    }

    /// Code as written in the input tables
    pub fn code(self) -> i64 {
        match self {
            AxisCode::X => 4,
            AxisCode::Y => 2,
            AxisCode::Z => 1,
        }
    }

    /// 1-based degree of freedom number used by the solver
    pub fn dof(self) -> usize {
        self.component() + 1
    }
}

impl TryFrom<i64> for AxisCode {
    type Error = PrepError;

    fn try_from(code: i64) -> PrepResult<Self> {
        match code {
            4 => Ok(AxisCode::X),
            2 => Ok(AxisCode::Y),
            1 => Ok(AxisCode::Z),
            other => Err(PrepError::InvalidAxisCode(other)),
        }
    }
}

/// Decode an axis code into a vector with exactly one component set
pub fn decode(axis_code: i64, magnitude: f64) -> PrepResult<DofVector> {
    let axis = AxisCode::try_from(axis_code)?;
    let mut components = [None; 3];
    components[axis.component()] = Some(magnitude);
    Ok(components)
}

/// `(component, value)` for each set component
pub fn set_components(v: &DofVector) -> impl Iterator<Item = (usize, f64)> + '_ {
    v.iter()
        .enumerate()
        .filter_map(|(idx, value)| value.map(|value| (idx, value)))
}

/// Add `other` into `total` component-wise; unset stays unset only if both are
pub fn accumulate(total: &mut DofVector, other: &DofVector) {
    for (sum, value) in total.iter_mut().zip(other) {
        if let Some(value) = value {
            *sum = Some(sum.unwrap_or(0.0) + value);
        }
    }
}
