//! Node - a joint of the truss in 3D space

use std::fmt;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// External 1-based node identifier, as written in the input tables
///
/// Conversion to an internal array index happens only in
/// [`StructuralModel::resolve`](crate::model::StructuralModel::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A truss joint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 1-based identifier (coordinate table row + 1)
    pub id: NodeId,
    /// Position in model length units
    pub position: Point3<f64>,
}

impl Node {
    /// Create a node at the given coordinates
    pub fn new(id: NodeId, x: f64, y: f64, z: f64) -> Self {
        Self {
            id,
            position: Point3::new(x, y, z),
        }
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(NodeId(1), 1.0, 2.0, 3.0);
        assert_eq!(node.id, NodeId(1));
        assert_eq!(node.coords(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(NodeId(1), 0.0, 0.0, 0.0);
        let n2 = Node::new(NodeId(2), 3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }
}
