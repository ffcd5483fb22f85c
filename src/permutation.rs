//! Mapping between a helper's compact DOF order and the canonical element layout
//!
//! The canonical layout of an element with `n` nodes has `6 * n` entries,
//! node by node, each node ordered `[Dx, Dy, Dz, Rx, Ry, Rz]`.

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::math::{Mat, Vector};

/// One of the six DOFs of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dof {
    Dx,
    Dy,
    Dz,
    Rx,
    Ry,
    Rz,
}

impl Dof {
    pub const ALL: [Dof; 6] = [Dof::Dx, Dof::Dy, Dof::Dz, Dof::Rx, Dof::Ry, Dof::Rz];

    /// Position inside a node block
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_rotation(self) -> bool {
        self.index() >= 3
    }
}

/// A DOF of a specific node of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalDof {
    pub node: usize,
    pub dof: Dof,
}

impl LocalDof {
    pub fn new(node: usize, dof: Dof) -> Self {
        Self { node, dof }
    }

    /// Index in the canonical layout
    pub fn index(&self) -> usize {
        self.node * 6 + self.dof.index()
    }
}

/// Node-major DOF order for `node_count` nodes that each carry `dofs`
pub fn node_major_order(node_count: usize, dofs: &[Dof]) -> Vec<LocalDof> {
    (0..node_count)
        .flat_map(|n| dofs.iter().map(move |d| LocalDof::new(n, *d)))
        .collect()
}

fn check_map(map: &[LocalDof], size: usize) -> FEAResult<()> {
    if let Some(bad) = map.iter().find(|d| d.index() >= size) {
        return Err(FEAError::DimensionError {
            expected: (size, size),
            actual: (bad.index() + 1, bad.index() + 1),
        });
    }
    Ok(())
}

/// Add a helper matrix into the canonical element matrix
pub fn scatter_matrix(target: &mut Mat, source: &Mat, map: &[LocalDof]) -> FEAResult<()> {
    if source.nrows() != map.len() || source.ncols() != map.len() {
        return Err(FEAError::DimensionError {
            expected: (map.len(), map.len()),
            actual: source.shape(),
        });
    }
    if target.nrows() != target.ncols() {
        return Err(FEAError::DimensionError {
            expected: (target.nrows(), target.nrows()),
            actual: target.shape(),
        });
    }
    check_map(map, target.nrows())?;

    for (i, di) in map.iter().enumerate() {
        for (j, dj) in map.iter().enumerate() {
            target[(di.index(), dj.index())] += source[(i, j)];
        }
    }
    Ok(())
}

/// Add a helper vector into the canonical element vector
pub fn scatter_vector(target: &mut Vector, source: &Vector, map: &[LocalDof]) -> FEAResult<()> {
    if source.len() != map.len() {
        return Err(FEAError::DimensionError {
            expected: (map.len(), 1),
            actual: (source.len(), 1),
        });
    }
    check_map(map, target.len())?;

    for (i, d) in map.iter().enumerate() {
        target[d.index()] += source[i];
    }
    Ok(())
}

/// Pick the helper's DOFs out of a canonical vector
pub fn gather(source: &Vector, map: &[LocalDof]) -> FEAResult<Vector> {
    check_map(map, source.len())?;
    Ok(Vector::from_iterator(
        map.len(),
        map.iter().map(|d| source[d.index()]),
    ))
}

/// `P` with `P[i, map[i]] = 1`, so that `helper = P * canonical`
pub fn permutation_matrix(map: &[LocalDof], node_count: usize) -> FEAResult<Mat> {
    let size = 6 * node_count;
    check_map(map, size)?;
    let mut p = Mat::zeros(map.len(), size);
    for (i, d) in map.iter().enumerate() {
        p[(i, d.index())] = 1.0;
    }
    Ok(p)
}

/// Zero the rows and columns of the given canonical indices
pub fn zero_dofs(k: &mut Mat, indices: &[usize]) -> FEAResult<()> {
    if let Some(bad) = indices.iter().find(|i| **i >= k.nrows() || **i >= k.ncols()) {
        return Err(FEAError::DimensionError {
            expected: k.shape(),
            actual: (bad + 1, bad + 1),
        });
    }
    for &i in indices {
        k.row_mut(i).fill(0.0);
        k.column_mut(i).fill(0.0);
    }
    Ok(())
}
