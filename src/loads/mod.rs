//! Boundary conditions and concentrated loads decoded from directional rows

mod boundary;
mod concentrated;

pub use boundary::{assign_boundaries, DisplacementRestraint};
pub use concentrated::{assign_loads, effective_loads, ConcentratedForce, NodalLoad};

use crate::dof::{self, DofVector};
use crate::elements::NodeId;
use crate::error::PrepResult;
use crate::model::StructuralModel;
use crate::tables::DirectionalRow;

/// Check the target node exists and decode the row's direction
fn decode_row(
    model: &StructuralModel,
    table: &'static str,
    idx: usize,
    row: &DirectionalRow,
) -> PrepResult<(NodeId, DofVector)> {
    model.resolve(row.node).map_err(|e| e.at_row(table, idx))?;
    let components =
        dof::decode(row.axis_code, row.magnitude).map_err(|e| e.at_row(table, idx))?;
    tracing::debug!(
        "{} row {}: node {} code {} -> {:?}",
        table,
        idx,
        row.node,
        row.axis_code,
        components
    );
    Ok((row.node, components))
}
