//! Material properties

use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::math::Polynomial;

/// Mechanical properties of a material at one position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Moduli of elasticity in Pa
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
    /// Shear moduli in Pa
    pub gxy: f64,
    pub gyz: f64,
    pub gzx: f64,
    /// Poisson's ratios
    pub nu_xy: f64,
    pub nu_yx: f64,
    pub nu_yz: f64,
    pub nu_zy: f64,
    pub nu_zx: f64,
    pub nu_xz: f64,
    /// Density in kg/m³
    pub rho: f64,
    /// Damping coefficient
    pub mu: f64,
}

impl MaterialProperties {
    /// Isotropic properties from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        let g = e / (2.0 * (1.0 + nu));
        Self {
            ex: e,
            ey: e,
            ez: e,
            gxy: g,
            gyz: g,
            gzx: g,
            nu_xy: nu,
            nu_yx: nu,
            nu_yz: nu,
            nu_zy: nu,
            nu_zx: nu,
            nu_xz: nu,
            rho,
            mu: 0.0,
        }
    }

    /// Isotropic properties with an explicit shear modulus
    pub fn isotropic_with_g(e: f64, g: f64, nu: f64, rho: f64) -> Self {
        let mut p = Self::isotropic(e, nu, rho);
        p.gxy = g;
        p.gyz = g;
        p.gzx = g;
        p
    }

    /// Standard steel
    pub fn steel() -> Self {
        Self::isotropic_with_g(
            200e9, // 200 GPa
            77e9,  // 77 GPa
            0.3, 7850.0,
        )
    }

    /// Set the damping coefficient
    pub fn with_damping(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }
}

/// Isotropic material whose properties are polynomials of xi in [-1, 1]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolynomialMaterial {
    pub e: Polynomial,
    pub g: Polynomial,
    pub rho: Polynomial,
    pub mu: Polynomial,
    pub nu: f64,
}

/// Material of an element, constant or varying over it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Uniform(MaterialProperties),
    Polynomial(PolynomialMaterial),
}

impl Material {
    /// Uniform isotropic material
    pub fn isotropic(e: f64, nu: f64, rho: f64) -> Self {
        Material::Uniform(MaterialProperties::isotropic(e, nu, rho))
    }

    /// Uniform steel
    pub fn steel() -> Self {
        Material::Uniform(MaterialProperties::steel())
    }

    /// Set the damping coefficient. A polynomial material gets a constant one.
    pub fn with_damping(self, mu: f64) -> Self {
        match self {
            Material::Uniform(p) => Material::Uniform(p.with_damping(mu)),
            Material::Polynomial(mut p) => {
                p.mu = Polynomial::constant(mu);
                Material::Polynomial(p)
            }
        }
    }

    /// Properties at iso coordinate `xi`
    pub fn properties_at(&self, xi: f64) -> FEAResult<MaterialProperties> {
        match self {
            Material::Uniform(p) => Ok(*p),
            Material::Polynomial(p) => {
                let e = p.e.evaluate(xi);
                let g = p.g.evaluate(xi);
                if e <= 0.0 || g <= 0.0 {
                    return Err(FEAError::InvalidInput(format!(
                        "non-positive modulus at xi = {xi}"
                    )));
                }
                let mut props = MaterialProperties::isotropic_with_g(e, g, p.nu, p.rho.evaluate(xi));
                props.mu = p.mu.evaluate(xi);
                Ok(props)
            }
        }
    }

    /// Highest polynomial degree of any property
    pub fn max_function_order(&self) -> usize {
        match self {
            Material::Uniform(_) => 0,
            Material::Polynomial(p) => [&p.e, &p.g, &p.rho, &p.mu]
                .iter()
                .map(|q| q.degree())
                .max()
                .unwrap_or(0),
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.max_function_order() == 0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}

impl From<MaterialProperties> for Material {
    fn from(p: MaterialProperties) -> Self {
        Material::Uniform(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_isotropic_material() {
        let mat = MaterialProperties::isotropic(200e9, 0.3, 7850.0);
        let expected_g = 200e9 / (2.0 * 1.3);
        assert!((mat.gxy - expected_g).abs() < 1.0);
        assert_eq!(mat.ey, mat.ex);
        assert_eq!(mat.mu, 0.0);
    }

    #[test]
    fn test_steel_properties() {
        let steel = Material::steel().with_damping(0.5);
        let p = steel.properties_at(0.3).unwrap();
        assert_eq!(p.ex, 200e9);
        assert_eq!(p.gxy, 77e9);
        assert_eq!(p.mu, 0.5);
        assert!(steel.is_uniform());
    }

    #[test]
    fn test_polynomial_material() {
        let mat = Material::Polynomial(PolynomialMaterial {
            e: Polynomial::linear(200e9, 20e9),
            g: Polynomial::constant(80e9),
            rho: Polynomial::constant(7850.0),
            mu: Polynomial::zero(),
            nu: 0.3,
        });
        assert_eq!(mat.max_function_order(), 1);
        assert_relative_eq!(mat.properties_at(1.0).unwrap().ex, 220e9);
        assert_relative_eq!(mat.properties_at(-1.0).unwrap().ez, 180e9);
    }

    #[test]
    fn test_non_positive_modulus_rejected() {
        let mat = Material::Polynomial(PolynomialMaterial {
            e: Polynomial::linear(0.0, 1.0),
            g: Polynomial::constant(1.0),
            ..PolynomialMaterial::default()
        });
        assert!(mat.properties_at(-0.5).is_err());
    }
}
