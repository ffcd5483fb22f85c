//! Linear four node tetrahedron

use super::{ElementHelper, HelperKind, IsoDomain};
use crate::elements::{Element, MaterialProperties, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{invert_jacobian, IsoPoint, Mat, Mat3, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy, Default)]
pub struct TetrahedronHelper;

/// 3D elasticity in Voigt order `xx, yy, zz, xy, yz, zx` with engineering
/// shear strains, the inverse of the orthotropic compliance.
///
/// `nu_ij` is the contraction along `j` under a stress along `i`.
pub fn orthotropic_elasticity(m: &MaterialProperties) -> FEAResult<Mat> {
    if m.ex <= 0.0 || m.ey <= 0.0 || m.ez <= 0.0 {
        return Err(FEAError::InvalidInput(format!(
            "moduli must be positive, got ({}, {}, {})",
            m.ex, m.ey, m.ez
        )));
    }
    if m.gxy <= 0.0 || m.gyz <= 0.0 || m.gzx <= 0.0 {
        return Err(FEAError::InvalidInput(format!(
            "shear moduli must be positive, got ({}, {}, {})",
            m.gxy, m.gyz, m.gzx
        )));
    }

    #[rustfmt::skip]
    let compliance = Mat3::new(
        1.0 / m.ex, -m.nu_yx / m.ey, -m.nu_zx / m.ez,
        -m.nu_xy / m.ex, 1.0 / m.ey, -m.nu_zy / m.ez,
        -m.nu_xz / m.ex, -m.nu_yz / m.ey, 1.0 / m.ez,
    );
    // symmetric part, supplied ratios may break reciprocity slightly
    let compliance = (compliance + compliance.transpose()) * 0.5;
    let normal = compliance
        .try_inverse()
        .ok_or_else(|| FEAError::InvalidInput("material compliance is singular".into()))?;

    let mut d = Mat::zeros(6, 6);
    for i in 0..3 {
        for j in 0..3 {
            d[(i, j)] = normal[(i, j)];
        }
    }
    d[(3, 3)] = m.gxy;
    d[(4, 4)] = m.gyz;
    d[(5, 5)] = m.gzx;
    Ok(d)
}

impl ElementHelper for TetrahedronHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Tetrahedron
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dx, Dof::Dy, Dof::Dz]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Tetrahedron
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        if elm.topology() != Topology::Tetra4 {
            return Err(FEAError::unsupported(format!(
                "solid behavior needs a tetrahedron, got {:?}",
                elm.topology()
            )));
        }
        let mat = elm.material()?.properties_at(0.0)?;
        if mat.nu_xy >= 0.5 {
            return Err(FEAError::InvalidInput(format!(
                "poisson ratio {} is incompressible",
                mat.nu_xy
            )));
        }
        let det = self.det_j_at(elm, IsoPoint::default())?;
        if det.abs() < elm.options().geometry_tolerance {
            return Err(FEAError::degenerate("tetrahedron has zero volume"));
        }
        Ok(())
    }

    /// Rows `[u, v, w]`
    fn n_matrix_at(&self, _elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let n = IsoDomain::Tetrahedron.shape_values(iso);
        let mut m = Mat::zeros(3, 12);
        for (i, v) in n.iter().enumerate() {
            for c in 0..3 {
                m[(c, 3 * i + c)] = *v;
            }
        }
        Ok(m)
    }

    /// Constant strain `[exx, eyy, ezz, gxy, gyz, gzx]`
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let j = self.j_matrix_at(elm, iso)?;
        let (inv, _) = invert_jacobian(&j, elm.options().geometry_tolerance)?;
        let dn = inv * IsoDomain::Tetrahedron.shape_derivatives(iso);

        let mut b = Mat::zeros(6, 12);
        for i in 0..4 {
            let (dx, dy, dz) = (dn[(0, i)], dn[(1, i)], dn[(2, i)]);
            let c = 3 * i;
            b[(0, c)] = dx;
            b[(1, c + 1)] = dy;
            b[(2, c + 2)] = dz;
            b[(3, c)] = dy;
            b[(3, c + 1)] = dx;
            b[(4, c + 1)] = dz;
            b[(4, c + 2)] = dy;
            b[(5, c)] = dz;
            b[(5, c + 2)] = dx;
        }
        Ok(b)
    }

    fn d_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        orthotropic_elasticity(&elm.material()?.properties_at(0.0)?)
    }

    fn rho_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::identity(3, 3) * elm.material()?.properties_at(0.0)?.rho)
    }

    fn mu_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::identity(3, 3) * elm.material()?.properties_at(0.0)?.mu)
    }

    fn j_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let nodes = elm.local_node_coordinates()?;
        IsoDomain::Tetrahedron.jacobian(&nodes, iso)
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        self.n_matrix_at(elm, iso)
    }

    fn n_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 1, 1])
    }

    fn b_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn local_internal_force_at(&self, _elm: &Element, _u: &Vector, _iso: IsoPoint) -> FEAResult<Force> {
        Err(FEAError::unsupported(
            "solid internal force, use local_stress_at for stresses",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Node};
    use crate::math::max_asymmetry;
    use approx::assert_relative_eq;

    fn unit_tet() -> Element {
        Element::tetrahedron(
            41,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
                Node::new(0.0, 0.0, 1.0),
            ],
        )
        .with_material(Material::isotropic(1e9, 0.25, 1000.0))
    }

    #[test]
    fn test_consistent_mass() {
        let m = TetrahedronHelper.local_mass_matrix(&unit_tet()).unwrap();
        let v = 1.0 / 6.0;
        assert_relative_eq!(m[(0, 0)], 1000.0 * v / 10.0, max_relative = 1e-12);
        assert_relative_eq!(m[(0, 3)], 1000.0 * v / 20.0, max_relative = 1e-12);
        assert_relative_eq!(m[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_six_rigid_modes() {
        let k = TetrahedronHelper.local_stiffness_matrix(&unit_tet()).unwrap();
        assert!(max_asymmetry(&k) < 1e-9 * k.amax());
        let eig = k.symmetric_eigenvalues();
        let scale = eig.amax();
        assert_eq!(eig.iter().filter(|v| v.abs() < 1e-9 * scale).count(), 6);
    }

    #[test]
    fn test_uniaxial_stress() {
        let elm = unit_tet();
        let eps = 1e-3;
        let nodes = elm.local_node_coordinates().unwrap();
        let u = Vector::from_iterator(12, nodes.iter().flat_map(|p| [eps * p.x, 0.0, 0.0]));
        let s = TetrahedronHelper
            .local_stress_at(&elm, &u, IsoPoint::new(0.25, 0.25, 0.25))
            .unwrap();
        let d = orthotropic_elasticity(&elm.material().unwrap().properties_at(0.0).unwrap()).unwrap();
        assert_relative_eq!(s[0], d[(0, 0)] * eps, max_relative = 1e-12);
        assert_relative_eq!(s[1], d[(0, 1)] * eps, max_relative = 1e-12);
        assert_relative_eq!(s[3], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_tetrahedron_is_degenerate() {
        let elm = Element::tetrahedron(
            42,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
                Node::new(1.0, 1.0, 0.0),
            ],
        )
        .with_material(Material::isotropic(1e9, 0.25, 1000.0));
        assert!(TetrahedronHelper.local_stiffness_matrix(&elm).is_err());
    }

    #[test]
    fn test_isotropic_elasticity_matches_lame() {
        let (e, nu) = (70e9, 0.25);
        let d = orthotropic_elasticity(&MaterialProperties::isotropic(e, nu, 0.0)).unwrap();
        let lambda = e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu));
        let mu = e / (2.0 * (1.0 + nu));
        assert_relative_eq!(d[(0, 0)], lambda + 2.0 * mu, max_relative = 1e-12);
        assert_relative_eq!(d[(1, 2)], lambda, max_relative = 1e-12);
        assert_relative_eq!(d[(4, 4)], mu, max_relative = 1e-12);
    }

    #[test]
    fn test_solid_uses_material_shear_modulus() {
        let m = MaterialProperties::isotropic_with_g(200e9, 50e9, 0.3, 7850.0);
        let d = orthotropic_elasticity(&m).unwrap();
        for i in 3..6 {
            assert_relative_eq!(d[(i, i)], 50e9, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_orthotropic_elasticity_inverts_compliance() {
        let mut m = MaterialProperties::isotropic(10e9, 0.2, 500.0);
        m.ey = 4e9;
        m.ez = 2e9;
        // reciprocal ratios nu_ji = nu_ij * Ej / Ei
        m.nu_yx = m.nu_xy * m.ey / m.ex;
        m.nu_zx = m.nu_xz * m.ez / m.ex;
        m.nu_zy = m.nu_yz * m.ez / m.ey;
        let d = orthotropic_elasticity(&m).unwrap();
        assert!(max_asymmetry(&d) < 1e-6 * d.amax());

        // a uniaxial stress along y strains y by sigma / Ey
        let sigma = Vector::from_vec(vec![0.0, 1e6, 0.0, 0.0, 0.0, 0.0]);
        let eps = d.clone().lu().solve(&sigma).unwrap();
        assert_relative_eq!(eps[1], 1e6 / 4e9, max_relative = 1e-9);
        assert_relative_eq!(eps[0], -m.nu_yx * 1e6 / 4e9, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_shear_modulus_rejected() {
        let mut m = MaterialProperties::isotropic(10e9, 0.2, 500.0);
        m.gyz = 0.0;
        assert!(matches!(orthotropic_elasticity(&m), Err(FEAError::InvalidInput(_))));
    }
}
