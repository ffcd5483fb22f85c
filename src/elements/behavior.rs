//! Behavior flags selecting which helpers formulate an element

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Set of kinematic behaviors of an element
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Behavior(u16);

impl Behavior {
    pub const NONE: Behavior = Behavior(0);
    /// Axial stiffness of a bar
    pub const TRUSS: Behavior = Behavior(1 << 0);
    /// Torsional stiffness of a bar
    pub const SHAFT: Behavior = Behavior(1 << 1);
    /// Euler-Bernoulli bending in the local x-z plane (DOFs Dz, Ry)
    pub const BEAM_Y_EULER_BERNOULLI: Behavior = Behavior(1 << 2);
    /// Euler-Bernoulli bending in the local x-y plane (DOFs Dy, Rz)
    pub const BEAM_Z_EULER_BERNOULLI: Behavior = Behavior(1 << 3);
    pub const BEAM_Y_TIMOSHENKO: Behavior = Behavior(1 << 4);
    pub const BEAM_Z_TIMOSHENKO: Behavior = Behavior(1 << 5);
    /// In-plane stiffness of a planar element
    pub const MEMBRANE: Behavior = Behavior(1 << 6);
    /// Bending of a planar element (DKT/DKQ)
    pub const THIN_PLATE: Behavior = Behavior(1 << 7);
    /// Fictitious in-plane rotational stiffness
    pub const DRILLING_DOF: Behavior = Behavior(1 << 8);
    pub const SOLID: Behavior = Behavior(1 << 9);

    pub const FRAME: Behavior = Behavior(
        Self::TRUSS.0 | Self::SHAFT.0 | Self::BEAM_Y_EULER_BERNOULLI.0 | Self::BEAM_Z_EULER_BERNOULLI.0,
    );
    pub const TIMOSHENKO_FRAME: Behavior =
        Behavior(Self::TRUSS.0 | Self::SHAFT.0 | Self::BEAM_Y_TIMOSHENKO.0 | Self::BEAM_Z_TIMOSHENKO.0);
    pub const FLAT_SHELL: Behavior = Behavior(Self::MEMBRANE.0 | Self::THIN_PLATE.0 | Self::DRILLING_DOF.0);

    /// All flags that need a two node bar
    pub const BAR_FLAGS: Behavior = Behavior(Self::FRAME.0 | Self::TIMOSHENKO_FRAME.0);
    /// All flags that need a triangle or quadrilateral
    pub const PLANAR_FLAGS: Behavior = Self::FLAT_SHELL;

    const NAMES: [(Behavior, &'static str); 10] = [
        (Self::TRUSS, "Truss"),
        (Self::SHAFT, "Shaft"),
        (Self::BEAM_Y_EULER_BERNOULLI, "BeamYEulerBernoulli"),
        (Self::BEAM_Z_EULER_BERNOULLI, "BeamZEulerBernoulli"),
        (Self::BEAM_Y_TIMOSHENKO, "BeamYTimoshenko"),
        (Self::BEAM_Z_TIMOSHENKO, "BeamZTimoshenko"),
        (Self::MEMBRANE, "Membrane"),
        (Self::THIN_PLATE, "ThinPlate"),
        (Self::DRILLING_DOF, "DrillingDof"),
        (Self::SOLID, "Solid"),
    ];

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Every flag of `other` is set
    pub fn contains(self, other: Behavior) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one flag of `other` is set
    pub fn intersects(self, other: Behavior) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flags that are not in `other`
    pub fn difference(self, other: Behavior) -> Behavior {
        Behavior(self.0 & !other.0)
    }
}

impl BitOr for Behavior {
    type Output = Behavior;

    fn bitor(self, rhs: Behavior) -> Behavior {
        Behavior(self.0 | rhs.0)
    }
}

impl BitOrAssign for Behavior {
    fn bitor_assign(&mut self, rhs: Behavior) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Behavior(None)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(b, _)| self.contains(*b))
            .map(|(_, n)| *n)
            .collect();
        write!(f, "Behavior({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composites() {
        assert!(Behavior::FRAME.contains(Behavior::TRUSS));
        assert!(Behavior::FRAME.contains(Behavior::BEAM_Z_EULER_BERNOULLI));
        assert!(!Behavior::FRAME.intersects(Behavior::BEAM_Y_TIMOSHENKO));
        assert!(Behavior::FLAT_SHELL.contains(Behavior::DRILLING_DOF));
    }

    #[test]
    fn test_bit_or_and_difference() {
        let mut b = Behavior::TRUSS | Behavior::SHAFT;
        b |= Behavior::MEMBRANE;
        assert!(b.intersects(Behavior::PLANAR_FLAGS));
        assert_eq!(b.difference(Behavior::BAR_FLAGS), Behavior::MEMBRANE);
        assert!(Behavior::NONE.is_empty());
    }

    #[test]
    fn test_debug_names() {
        let b = Behavior::TRUSS | Behavior::SOLID;
        assert_eq!(format!("{b:?}"), "Behavior(Truss | Solid)");
    }
}
