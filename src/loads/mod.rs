//! Loads applied on an element's body
//!
//! A load is a plain record. Turning it into equivalent nodal loads, and
//! recovering the internal force or displacement it causes between the nodes,
//! is the job of a [`LoadHandler`] picked per helper by [`handler_for`].

mod handlers;

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::math::{IsoPoint, Polynomial, Vec3};
use crate::results::Force;
use crate::transform::TransformManager;

pub use handlers::{
    handler_for, BarConcentratedHandler, BarDistributedHandler, EulerBernoulliNonUniformHandler,
    EulerBernoulliUniformHandler, InertHandler, LoadHandler, PlanarConcentratedHandler,
    PlanarUniformHandler, TrussImposedStrainHandler, TrussUniformHandler, HANDLERS,
};

/// Axes a load's direction or components are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateSystem {
    #[default]
    Global,
    Local,
}

/// Direction of a load in local axes, normalized
fn local_unit_direction(
    direction: &Vec3,
    cs: CoordinateSystem,
    t: &TransformManager,
) -> FEAResult<Vec3> {
    let unit = direction
        .try_normalize(0.0)
        .ok_or_else(|| FEAError::InvalidInput("load direction is the zero vector".into()))?;
    Ok(match cs {
        CoordinateSystem::Global => t.global_to_local_vector(&unit),
        CoordinateSystem::Local => unit,
    })
}

/// Constant load over the whole element body.
///
/// Per unit length on bars, per unit area on planar elements and per unit
/// volume on solids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniformLoad {
    /// Direction, normalized when the load is applied
    pub direction: Vec3,
    /// Intensity along `direction`
    pub magnitude: f64,
    pub coordinate_system: CoordinateSystem,
}

impl UniformLoad {
    pub fn new(direction: Vec3, magnitude: f64, coordinate_system: CoordinateSystem) -> Self {
        Self {
            direction,
            magnitude,
            coordinate_system,
        }
    }

    /// Load in global axes
    pub fn global(direction: Vec3, magnitude: f64) -> Self {
        Self::new(direction, magnitude, CoordinateSystem::Global)
    }

    /// Load in local axes
    pub fn local(direction: Vec3, magnitude: f64) -> Self {
        Self::new(direction, magnitude, CoordinateSystem::Local)
    }

    /// Gravity style load along negative global Y
    pub fn downward(magnitude: f64) -> Self {
        Self::global(-Vec3::y(), magnitude.abs())
    }

    /// Intensity vector in local axes
    pub fn local_intensity(&self, t: &TransformManager) -> FEAResult<Vec3> {
        Ok(local_unit_direction(&self.direction, self.coordinate_system, t)? * self.magnitude)
    }
}

/// Force and moment acting at one point inside the element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentratedLoad {
    pub force: Force,
    /// Point of application
    pub iso_location: IsoPoint,
    pub coordinate_system: CoordinateSystem,
}

impl ConcentratedLoad {
    pub fn new(force: Force, iso_location: IsoPoint, coordinate_system: CoordinateSystem) -> Self {
        Self {
            force,
            iso_location,
            coordinate_system,
        }
    }

    /// Force in local axes
    pub fn local_force(&self, t: &TransformManager) -> Force {
        match self.coordinate_system {
            CoordinateSystem::Global => t.force_to_local(&self.force),
            CoordinateSystem::Local => self.force,
        }
    }
}

/// Distributed load on part of a bar whose severity varies along it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialNonUniformLoad {
    /// Direction, normalized when the load is applied
    pub direction: Vec3,
    /// Intensity along `direction` as a polynomial of xi
    pub severity: Polynomial,
    /// Start of the loaded span in iso coordinates
    pub start_xi: f64,
    /// End of the loaded span in iso coordinates
    pub end_xi: f64,
    pub coordinate_system: CoordinateSystem,
}

impl PartialNonUniformLoad {
    pub fn new(
        direction: Vec3,
        severity: Polynomial,
        start_xi: f64,
        end_xi: f64,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        Self {
            direction,
            severity,
            start_xi,
            end_xi,
            coordinate_system,
        }
    }

    /// Intensity varying linearly from `w_start` at `start_xi` to `w_end` at `end_xi`
    pub fn linear(
        direction: Vec3,
        w_start: f64,
        w_end: f64,
        start_xi: f64,
        end_xi: f64,
        coordinate_system: CoordinateSystem,
    ) -> FEAResult<Self> {
        let severity = Polynomial::through_two_points(start_xi, w_start, end_xi, w_end)?;
        Ok(Self::new(direction, severity, start_xi, end_xi, coordinate_system))
    }

    /// Triangular load, zero at the start of the span
    pub fn triangular(
        direction: Vec3,
        w_max: f64,
        start_xi: f64,
        end_xi: f64,
        coordinate_system: CoordinateSystem,
    ) -> FEAResult<Self> {
        Self::linear(direction, 0.0, w_max, start_xi, end_xi, coordinate_system)
    }

    /// Fail with `InvalidInput` unless `-1 <= start_xi < end_xi <= 1`
    pub fn validate(&self, tol: f64) -> FEAResult<()> {
        if !(self.start_xi < self.end_xi) || self.start_xi < -1.0 - tol || self.end_xi > 1.0 + tol {
            return Err(FEAError::InvalidInput(format!(
                "load span [{}, {}] is not inside [-1, 1]",
                self.start_xi, self.end_xi
            )));
        }
        Ok(())
    }

    /// Unit direction in local axes
    pub fn local_direction(&self, t: &TransformManager) -> FEAResult<Vec3> {
        local_unit_direction(&self.direction, self.coordinate_system, t)
    }

    /// Severity at `xi`, zero outside the loaded span
    pub fn severity_at(&self, xi: f64) -> f64 {
        if xi < self.start_xi || xi > self.end_xi {
            0.0
        } else {
            self.severity.evaluate(xi)
        }
    }
}

/// Axial strain imposed on a bar, e.g. from a temperature change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImposedStrainLoad {
    /// Positive strain elongates the bar
    pub strain: f64,
}

impl ImposedStrainLoad {
    pub fn new(strain: f64) -> Self {
        Self { strain }
    }

    /// Strain from a uniform temperature change
    pub fn thermal(alpha: f64, delta_t: f64) -> Self {
        Self::new(alpha * delta_t)
    }
}

/// Any load that can be applied on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementalLoad {
    Uniform(UniformLoad),
    Concentrated(ConcentratedLoad),
    PartialNonUniform(PartialNonUniformLoad),
    ImposedStrain(ImposedStrainLoad),
}

impl ElementalLoad {
    /// Variant name, for logs and error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ElementalLoad::Uniform(_) => "uniform",
            ElementalLoad::Concentrated(_) => "concentrated",
            ElementalLoad::PartialNonUniform(_) => "partial non-uniform",
            ElementalLoad::ImposedStrain(_) => "imposed strain",
        }
    }

    /// True for loads distributed along the body
    pub fn is_distributed(&self) -> bool {
        matches!(
            self,
            ElementalLoad::Uniform(_) | ElementalLoad::PartialNonUniform(_)
        )
    }
}

impl From<UniformLoad> for ElementalLoad {
    fn from(l: UniformLoad) -> Self {
        ElementalLoad::Uniform(l)
    }
}

impl From<ConcentratedLoad> for ElementalLoad {
    fn from(l: ConcentratedLoad) -> Self {
        ElementalLoad::Concentrated(l)
    }
}

impl From<PartialNonUniformLoad> for ElementalLoad {
    fn from(l: PartialNonUniformLoad) -> Self {
        ElementalLoad::PartialNonUniform(l)
    }
}

impl From<ImposedStrainLoad> for ElementalLoad {
    fn from(l: ImposedStrainLoad) -> Self {
        ElementalLoad::ImposedStrain(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat3;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_intensity_is_normalized() {
        let load = UniformLoad::global(Vec3::new(0.0, -3.0, 0.0), 2.0);
        let q = load.local_intensity(&TransformManager::identity()).unwrap();
        assert_relative_eq!(q.y, -2.0, epsilon = 1e-14);
        assert_relative_eq!(q.norm(), 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_global_direction_rotated_to_local() {
        // local x along global Y
        let t = TransformManager::new(Mat3::new(0.0, 1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        let q = UniformLoad::downward(5.0).local_intensity(&t).unwrap();
        assert_relative_eq!(q.x, -5.0, epsilon = 1e-14);
        assert_relative_eq!(q.y, 0.0, epsilon = 1e-14);

        let local = UniformLoad::local(Vec3::y(), 5.0).local_intensity(&t).unwrap();
        assert_relative_eq!(local.y, 5.0, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_direction_rejected() {
        let load = UniformLoad::global(Vec3::zeros(), 1.0);
        assert!(load.local_intensity(&TransformManager::identity()).is_err());
    }

    #[test]
    fn test_partial_severity_outside_span() {
        let load = PartialNonUniformLoad::linear(Vec3::y(), 1.0, 3.0, -0.5, 0.5, CoordinateSystem::Local)
            .unwrap();
        assert_relative_eq!(load.severity_at(0.0), 2.0, epsilon = 1e-14);
        assert_eq!(load.severity_at(0.75), 0.0);
        assert!(load.validate(1e-9).is_ok());

        let reversed = PartialNonUniformLoad::new(
            Vec3::y(),
            Polynomial::constant(1.0),
            0.5,
            -0.5,
            CoordinateSystem::Local,
        );
        assert!(reversed.validate(1e-9).is_err());
    }

    #[test]
    fn test_load_json_round_trip() {
        let load: ElementalLoad = UniformLoad::downward(12.5).into();
        let json = serde_json::to_string(&load).unwrap();
        let back: ElementalLoad = serde_json::from_str(&json).unwrap();
        assert_eq!(back, load);
    }
}
