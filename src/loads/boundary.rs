//! Displacement restraints

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::decode_row;
use crate::dof::{self, DofVector};
use crate::elements::NodeId;
use crate::error::PrepResult;
use crate::model::StructuralModel;
use crate::tables::DirectionalRow;

/// A prescribed displacement on one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementRestraint {
    /// Unique name (`BC-<row>`)
    pub name: String,
    /// Restrained node
    pub node: NodeId,
    /// Prescribed displacement per direction; unset directions stay free
    pub components: DofVector,
}

/// Turn constraint rows into restraints, one per row in input order
pub fn assign_boundaries(
    model: &StructuralModel,
    rows: &[DirectionalRow],
) -> PrepResult<Vec<DisplacementRestraint>> {
    let mut prescribed: HashMap<(NodeId, usize), f64> = HashMap::new();
    let mut restraints = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let (node, components) = decode_row(model, "constraints", idx, row)?;

        for (component, value) in dof::set_components(&components) {
            if let Some(previous) = prescribed.insert((node, component), value) {
                if previous != value {
                    tracing::warn!(
                        "Node {} direction {} restrained twice ({} then {}); the solver sees both",
                        node,
                        component + 1,
                        previous,
                        value
                    );
                }
            }
        }

        restraints.push(DisplacementRestraint {
            name: format!("BC-{}", idx),
            node,
            components,
        });
    }

    tracing::info!("Assigned {} displacement restraints", restraints.len());
    Ok(restraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use crate::tables::{CoordinateRow, TopologyRow};

    fn model() -> StructuralModel {
        let coords = [
            CoordinateRow { x: 0.0, y: 0.0, z: 0.0 },
            CoordinateRow { x: 1.0, y: 0.0, z: 0.0 },
        ];
        let topology = [TopologyRow {
            start: NodeId(1),
            end: NodeId(2),
            area: 1.0,
            material: "polymer".to_string(),
        }];
        StructuralModel::build("bc", &topology, &coords).unwrap()
    }

    fn row(node: usize, axis_code: i64, magnitude: f64) -> DirectionalRow {
        DirectionalRow {
            node: NodeId(node),
            axis_code,
            magnitude,
        }
    }

    #[test]
    fn test_x_restraint_on_node_one() {
        let restraints = assign_boundaries(&model(), &[row(1, 4, 0.0)]).unwrap();
        assert_eq!(restraints.len(), 1);
        assert_eq!(restraints[0].node, NodeId(1));
        assert_eq!(restraints[0].components, [Some(0.0), None, None]);
        assert_eq!(restraints[0].name, "BC-0");
    }

    #[test]
    fn test_names_unique_and_in_row_order() {
        let rows = [row(1, 4, 0.0), row(1, 2, 0.0), row(2, 1, 0.0)];
        let restraints = assign_boundaries(&model(), &rows).unwrap();
        let names: Vec<_> = restraints.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["BC-0", "BC-1", "BC-2"]);
        assert_eq!(restraints[2].components, [None, None, Some(0.0)]);
    }

    #[test]
    fn test_dangling_node() {
        let err = assign_boundaries(&model(), &[row(1, 4, 0.0), row(3, 4, 0.0)]).unwrap_err();
        match err {
            PrepError::AtRow { table, row, source } => {
                assert_eq!(table, "constraints");
                assert_eq!(row, 1);
                assert!(matches!(*source, PrepError::DanglingReference { node: 3, .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_combined_axis_code_rejected() {
        let err = assign_boundaries(&model(), &[row(1, 6, 0.0)]).unwrap_err();
        assert!(matches!(err.root(), PrepError::InvalidAxisCode(6)));
    }
}
