//! Concentrated nodal forces

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::decode_row;
use crate::dof::{self, DofVector};
use crate::elements::NodeId;
use crate::error::PrepResult;
use crate::model::StructuralModel;
use crate::tables::DirectionalRow;

/// One force row applied to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentratedForce {
    /// Unique name (`Load-<row>`)
    pub name: String,
    /// Loaded node
    pub node: NodeId,
    /// Force per direction; unset directions carry no load
    pub components: DofVector,
}

/// The summed load acting on one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodalLoad {
    pub node: NodeId,
    /// Sum of every force row on this node, per direction
    pub components: DofVector,
    /// Names of the contributing force records
    pub sources: Vec<String>,
}

/// Turn force rows into concentrated forces, one per row in input order
pub fn assign_loads(
    model: &StructuralModel,
    rows: &[DirectionalRow],
) -> PrepResult<Vec<ConcentratedForce>> {
    let loads = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let (node, components) = decode_row(model, "forces", idx, row)?;
            Ok(ConcentratedForce {
                name: format!("Load-{}", idx),
                node,
                components,
            })
        })
        .collect::<PrepResult<Vec<_>>>()?;

    tracing::info!("Assigned {} concentrated forces", loads.len());
    Ok(loads)
}

/// Combine forces per node, adding rows that share a node and direction
///
/// Result is ordered by node id.
pub fn effective_loads(loads: &[ConcentratedForce]) -> Vec<NodalLoad> {
    let mut per_node: BTreeMap<NodeId, NodalLoad> = BTreeMap::new();

    for load in loads {
        let entry = per_node.entry(load.node).or_insert_with(|| NodalLoad {
            node: load.node,
            components: [None; 3],
            sources: Vec::new(),
        });
        for (component, _) in dof::set_components(&load.components) {
            if entry.components[component].is_some() {
                tracing::warn!(
                    "Node {} direction {} loaded by several rows; summing",
                    load.node,
                    component + 1
                );
            }
        }
        dof::accumulate(&mut entry.components, &load.components);
        entry.sources.push(load.name.clone());
    }

    per_node.into_values().collect()
}
