//! Section properties for bar and planar elements

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::math::Polynomial;

/// Geometric properties of a bar cross section at one position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossSectionProperties {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Effective shear area for shear along local y in m²
    pub ay: f64,
    /// Effective shear area for shear along local z in m²
    pub az: f64,
    /// Moment of inertia about local y-axis in m⁴
    pub iy: f64,
    /// Moment of inertia about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
    /// First moment of area about y in m³
    pub qy: f64,
    /// First moment of area about z in m³
    pub qz: f64,
    /// Product of inertia in m⁴
    pub iyz: f64,
}

impl CrossSectionProperties {
    /// Create properties with basic values; shear areas default to the area
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self {
            a,
            ay: a,
            az: a,
            iy,
            iz,
            j,
            ..Self::default()
        }
    }

    /// Set the effective shear areas
    pub fn with_shear_areas(mut self, ay: f64, az: f64) -> Self {
        self.ay = ay;
        self.az = az;
        self
    }

    /// Create a rectangular section
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = width * depth.powi(3) / 12.0;
        let iz = depth * width.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (a_dim, b_dim) = if width > depth { (width, depth) } else { (depth, width) };
        let j = a_dim * b_dim.powi(3) / 3.0 * (1.0 - 0.63 * b_dim / a_dim);

        Self::new(a, iy, iz, j).with_shear_areas(5.0 / 6.0 * a, 5.0 / 6.0 * a)
    }

    /// Create a circular section
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;
        let j = std::f64::consts::PI * r.powi(4) / 2.0;

        Self::new(a, i, i, j).with_shear_areas(0.9 * a, 0.9 * a)
    }

    /// Create a hollow circular (pipe) section
    pub fn pipe(outer_diameter: f64, wall_thickness: f64) -> Self {
        let r_o = outer_diameter / 2.0;
        let r_i = r_o - wall_thickness;

        let a = std::f64::consts::PI * (r_o.powi(2) - r_i.powi(2));
        let i = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 4.0;
        let j = std::f64::consts::PI * (r_o.powi(4) - r_i.powi(4)) / 2.0;

        Self::new(a, i, i, j).with_shear_areas(0.5 * a, 0.5 * a)
    }

    /// Polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }
}

/// Each property of a section given as a polynomial of xi in [-1, 1]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolynomialSection {
    pub a: Polynomial,
    pub ay: Polynomial,
    pub az: Polynomial,
    pub iy: Polynomial,
    pub iz: Polynomial,
    pub j: Polynomial,
}

impl PolynomialSection {
    /// Section whose properties vary linearly from `start` (xi = -1) to `end` (xi = 1)
    pub fn tapered(start: CrossSectionProperties, end: CrossSectionProperties) -> Self {
        let lin = |s: f64, e: f64| Polynomial::linear((s + e) / 2.0, (e - s) / 2.0);
        Self {
            a: lin(start.a, end.a),
            ay: lin(start.ay, end.ay),
            az: lin(start.az, end.az),
            iy: lin(start.iy, end.iy),
            iz: lin(start.iz, end.iz),
            j: lin(start.j, end.j),
        }
    }

    fn max_degree(&self) -> usize {
        [&self.a, &self.ay, &self.az, &self.iy, &self.iz, &self.j]
            .iter()
            .map(|p| p.degree())
            .max()
            .unwrap_or(0)
    }
}

/// Cross section of a bar element, constant or varying along its length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BarSection {
    Uniform(CrossSectionProperties),
    Polynomial(PolynomialSection),
}

impl BarSection {
    /// Properties at iso coordinate `xi`
    pub fn properties_at(&self, xi: f64) -> FEAResult<CrossSectionProperties> {
        let props = match self {
            BarSection::Uniform(p) => *p,
            BarSection::Polynomial(p) => CrossSectionProperties {
                a: p.a.evaluate(xi),
                ay: p.ay.evaluate(xi),
                az: p.az.evaluate(xi),
                iy: p.iy.evaluate(xi),
                iz: p.iz.evaluate(xi),
                j: p.j.evaluate(xi),
                ..CrossSectionProperties::default()
            },
        };
        if props.a < 0.0 || props.iy < 0.0 || props.iz < 0.0 || props.j < 0.0 {
            return Err(FEAError::InvalidInput(format!(
                "negative section property at xi = {xi}"
            )));
        }
        Ok(props)
    }

    /// Highest polynomial degree of any property along the bar
    pub fn max_function_order(&self) -> usize {
        match self {
            BarSection::Uniform(_) => 0,
            BarSection::Polynomial(p) => p.max_degree(),
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.max_function_order() == 0
    }
}

impl Default for BarSection {
    fn default() -> Self {
        // Default to a 200mm x 200mm rectangular section
        BarSection::Uniform(CrossSectionProperties::rectangular(0.2, 0.2))
    }
}

impl From<CrossSectionProperties> for BarSection {
    fn from(p: CrossSectionProperties) -> Self {
        BarSection::Uniform(p)
    }
}

/// In-plane stress state assumed by membrane behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MembraneFormulation {
    /// Thin sheet, no stress through the thickness
    #[default]
    PlaneStress,
    /// Slice of a long body, no strain through the thickness
    PlaneStrain,
}

/// Section of a planar (membrane, plate or shell) element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarSection {
    /// Thickness in m
    pub thickness: f64,
    #[serde(default)]
    pub formulation: MembraneFormulation,
}

impl PlanarSection {
    pub fn new(thickness: f64) -> Self {
        Self {
            thickness,
            formulation: MembraneFormulation::PlaneStress,
        }
    }

    /// Plane strain slice of the given thickness
    pub fn plane_strain(thickness: f64) -> Self {
        Self {
            thickness,
            formulation: MembraneFormulation::PlaneStrain,
        }
    }
}

impl Default for PlanarSection {
    fn default() -> Self {
        Self::new(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let section = CrossSectionProperties::rectangular(0.3, 0.5);
        let expected_a = 0.3 * 0.5;
        let expected_iy = 0.3 * 0.5_f64.powi(3) / 12.0;

        assert!((section.a - expected_a).abs() < 1e-10);
        assert!((section.iy - expected_iy).abs() < 1e-10);
        assert!((section.ay - 5.0 / 6.0 * expected_a).abs() < 1e-10);
    }

    #[test]
    fn test_circular_section() {
        let section = CrossSectionProperties::circular(0.5);
        let r: f64 = 0.25;
        let expected_a = std::f64::consts::PI * r.powi(2);

        assert!((section.a - expected_a).abs() < 1e-10);
        assert!((section.iy - section.iz).abs() < 1e-10); // Should be equal for circle
        assert_relative_eq!(section.ip(), section.j, epsilon = 1e-12);
    }

    #[test]
    fn test_tapered_section() {
        let s = CrossSectionProperties::new(1e-3, 1e-4, 2e-4, 1e-5);
        let e = CrossSectionProperties::new(3e-3, 3e-4, 4e-4, 3e-5);
        let sec = BarSection::Polynomial(PolynomialSection::tapered(s, e));

        assert_eq!(sec.max_function_order(), 1);
        assert!(!sec.is_uniform());
        assert_relative_eq!(sec.properties_at(-1.0).unwrap().a, 1e-3, epsilon = 1e-15);
        assert_relative_eq!(sec.properties_at(0.0).unwrap().iy, 2e-4, epsilon = 1e-15);
        assert_relative_eq!(sec.properties_at(1.0).unwrap().j, 3e-5, epsilon = 1e-15);
    }

    #[test]
    fn test_negative_property_rejected() {
        let s = CrossSectionProperties::new(1e-3, 1e-4, 1e-4, 1e-5);
        let e = CrossSectionProperties::new(-1e-3, 1e-4, 1e-4, 1e-5);
        let sec = BarSection::Polynomial(PolynomialSection::tapered(s, e));
        assert!(sec.properties_at(1.0).is_err());
        assert!(sec.properties_at(-1.0).is_ok());
    }

    #[test]
    fn test_planar_section_formulation_defaults_to_plane_stress() {
        let section: PlanarSection = serde_json::from_str(r#"{ "thickness": 0.2 }"#).unwrap();
        assert_eq!(section.formulation, MembraneFormulation::PlaneStress);
        assert_eq!(PlanarSection::plane_strain(1.0).formulation, MembraneFormulation::PlaneStrain);
    }
}
