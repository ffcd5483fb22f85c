//! Six component force and displacement records

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::math::Vec3;
use crate::permutation::Dof;

/// Force and moment at a point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Force {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
    pub mx: f64,
    pub my: f64,
    pub mz: f64,
}

impl Force {
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    pub fn from_vectors(forces: Vec3, moments: Vec3) -> Self {
        Self::new(forces.x, forces.y, forces.z, moments.x, moments.y, moments.z)
    }

    pub fn forces(&self) -> Vec3 {
        Vec3::new(self.fx, self.fy, self.fz)
    }

    pub fn moments(&self) -> Vec3 {
        Vec3::new(self.mx, self.my, self.mz)
    }

    /// Equivalent force when the point of application moves from `from` to `to`
    pub fn move_to(&self, from: Vec3, to: Vec3) -> Self {
        let f = self.forces();
        Self::from_vectors(f, self.moments() + (from - to).cross(&f))
    }

    pub fn component(&self, dof: Dof) -> f64 {
        self.to_array()[dof.index()]
    }

    /// Copy keeping only the listed components
    pub fn masked(&self, dofs: &[Dof]) -> Self {
        let src = self.to_array();
        let mut arr = [0.0; 6];
        for d in dofs {
            arr[d.index()] = src[d.index()];
        }
        Self::from_array(arr)
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        self.forces().norm()
    }

    /// Get total moment magnitude
    pub fn moment_magnitude(&self) -> f64 {
        self.moments().norm()
    }
}

/// Translations and rotations at a point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Displacement {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Displacement {
    pub fn new(dx: f64, dy: f64, dz: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self { dx, dy, dz, rx, ry, rz }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    pub fn from_vectors(translations: Vec3, rotations: Vec3) -> Self {
        Self::new(
            translations.x,
            translations.y,
            translations.z,
            rotations.x,
            rotations.y,
            rotations.z,
        )
    }

    pub fn translations(&self) -> Vec3 {
        Vec3::new(self.dx, self.dy, self.dz)
    }

    pub fn rotations(&self) -> Vec3 {
        Vec3::new(self.rx, self.ry, self.rz)
    }

    /// Displacement of `to` when the body moves rigidly with this displacement at `from`
    pub fn move_to(&self, from: Vec3, to: Vec3) -> Self {
        let r = self.rotations();
        Self::from_vectors(self.translations() + r.cross(&(to - from)), r)
    }

    pub fn component(&self, dof: Dof) -> f64 {
        self.to_array()[dof.index()]
    }

    /// Copy keeping only the listed components
    pub fn masked(&self, dofs: &[Dof]) -> Self {
        let src = self.to_array();
        let mut arr = [0.0; 6];
        for d in dofs {
            arr[d.index()] = src[d.index()];
        }
        Self::from_array(arr)
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        self.translations().norm()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        self.rotations().norm()
    }
}

macro_rules! six_component_ops {
    ($t:ident) => {
        impl Add for $t {
            type Output = $t;

            fn add(self, rhs: $t) -> $t {
                let (a, b) = (self.to_array(), rhs.to_array());
                $t::from_array(std::array::from_fn(|i| a[i] + b[i]))
            }
        }

        impl Sub for $t {
            type Output = $t;

            fn sub(self, rhs: $t) -> $t {
                self + (-rhs)
            }
        }

        impl Neg for $t {
            type Output = $t;

            fn neg(self) -> $t {
                self * -1.0
            }
        }

        impl Mul<f64> for $t {
            type Output = $t;

            fn mul(self, k: f64) -> $t {
                $t::from_array(self.to_array().map(|v| v * k))
            }
        }

        impl AddAssign for $t {
            fn add_assign(&mut self, rhs: $t) {
                *self = *self + rhs;
            }
        }

        impl std::iter::Sum for $t {
            fn sum<I: Iterator<Item = $t>>(iter: I) -> $t {
                iter.fold($t::zero(), |acc, x| acc + x)
            }
        }
    };
}

six_component_ops!(Force);
six_component_ops!(Displacement);
