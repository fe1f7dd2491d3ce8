//! Truss element - a 2-node axial member

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Element type code handed to the solver (2-node 3D truss)
pub const TRUSS_ELEMENT_TYPE: &str = "T3D2";

/// A 2-node truss member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// 0-based row index in the topology table
    pub index: usize,
    /// Start node (1-based)
    pub start: NodeId,
    /// End node (1-based)
    pub end: NodeId,
    /// Cross-sectional area in model units
    pub area: f64,
    /// Catalog name of the member material
    pub material: String,
    /// Resolved 0-based indices of `start` and `end`
    pub(crate) node_indices: [usize; 2],
}

impl Element {
    /// External node ids at both ends
    pub fn node_ids(&self) -> [NodeId; 2] {
        [self.start, self.end]
    }

    /// Internal node array indices at both ends
    pub fn node_indices(&self) -> [usize; 2] {
        self.node_indices
    }

    /// 1-based element label used in solver input
    pub fn label(&self) -> usize {
        self.index + 1
    }
}
