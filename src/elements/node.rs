//! Node - a point in 3D space with six global DOFs

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// A 3D node referenced by elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
    /// Global DOF indices [DX, DY, DZ, RX, RY, RZ], assigned by the model
    #[serde(default)]
    pub dofs: [usize; 6],
}

impl Node {
    /// Create a new node at the given coordinates
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            dofs: [0; 6],
        }
    }

    /// Assign the DOF block `6 * index .. 6 * index + 6`
    pub fn with_index(mut self, index: usize) -> Self {
        for (i, d) in self.dofs.iter_mut().enumerate() {
            *d = 6 * index + i;
        }
        self
    }

    /// Get the coordinates as an array
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn location(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.location() - self.location()).norm()
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = Node::new(1.0, 2.0, 3.0);
        assert_eq!(node.coords(), [1.0, 2.0, 3.0]);
        assert_eq!(node.dofs, [0; 6]);
    }

    #[test]
    fn test_node_distance() {
        let n1 = Node::new(0.0, 0.0, 0.0);
        let n2 = Node::new(3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_with_index() {
        let node = Node::new(0.0, 0.0, 0.0).with_index(2);
        assert_eq!(node.dofs, [12, 13, 14, 15, 16, 17]);
    }
}
