//! End releases of bar elements (allowing specific DOFs to rotate/translate freely)

use serde::{Deserialize, Serialize};

use crate::permutation::Dof;

/// Connection of one local DOF to its node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DofConstraint {
    #[default]
    Fixed,
    Released,
}

impl DofConstraint {
    pub fn is_released(self) -> bool {
        self == DofConstraint::Released
    }
}

/// Release conditions at one end of an element, per local DOF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndRelease {
    pub dx: DofConstraint,
    pub dy: DofConstraint,
    pub dz: DofConstraint,
    pub rx: DofConstraint,
    pub ry: DofConstraint,
    pub rz: DofConstraint,
}

impl EndRelease {
    /// Rigid connection
    pub fn fixed() -> Self {
        Self::default()
    }

    /// Moment releases (pin)
    pub fn hinged() -> Self {
        Self::fixed()
            .with(Dof::Ry, DofConstraint::Released)
            .with(Dof::Rz, DofConstraint::Released)
    }

    pub fn fully_released() -> Self {
        Dof::ALL
            .iter()
            .fold(Self::fixed(), |r, d| r.with(*d, DofConstraint::Released))
    }

    /// Constraint of a single DOF
    pub fn constraint(&self, dof: Dof) -> DofConstraint {
        match dof {
            Dof::Dx => self.dx,
            Dof::Dy => self.dy,
            Dof::Dz => self.dz,
            Dof::Rx => self.rx,
            Dof::Ry => self.ry,
            Dof::Rz => self.rz,
        }
    }

    /// Copy with one DOF set to `c`
    pub fn with(mut self, dof: Dof, c: DofConstraint) -> Self {
        let slot = match dof {
            Dof::Dx => &mut self.dx,
            Dof::Dy => &mut self.dy,
            Dof::Dz => &mut self.dz,
            Dof::Rx => &mut self.rx,
            Dof::Ry => &mut self.ry,
            Dof::Rz => &mut self.rz,
        };
        *slot = c;
        self
    }

    /// Released DOFs in canonical order
    pub fn released_dofs(&self) -> Vec<Dof> {
        Dof::ALL
            .iter()
            .copied()
            .filter(|d| self.constraint(*d).is_released())
            .collect()
    }

    pub fn is_fixed(&self) -> bool {
        self.released_dofs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hinged() {
        let r = EndRelease::hinged();
        assert_eq!(r.released_dofs(), vec![Dof::Ry, Dof::Rz]);
        assert_eq!(r.constraint(Dof::Dx), DofConstraint::Fixed);
        assert!(!r.is_fixed());
    }

    #[test]
    fn test_fully_released() {
        let r = EndRelease::fully_released();
        assert_eq!(r.released_dofs().len(), 6);
        assert!(EndRelease::fixed().is_fixed());
    }

    #[test]
    fn test_with_single_dof() {
        let r = EndRelease::fixed().with(Dof::Rx, DofConstraint::Released);
        assert!(r.constraint(Dof::Rx).is_released());
        assert_eq!(r.released_dofs(), vec![Dof::Rx]);
    }
}
