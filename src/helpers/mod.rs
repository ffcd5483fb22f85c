//! Element helpers
//!
//! A helper formulates one kinematic behavior of an element (axial, torsion,
//! bending in one plane, membrane, plate bending, solid) over the subset of
//! DOFs it owns. An element composes the matrices of all its helpers.

mod bar;
mod cst;
mod dkq;
mod dkt;
mod euler_bernoulli;
mod planar;
mod q4_membrane;
mod shaft;
mod tetrahedron;
mod timoshenko;
mod truss;

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::elements::{Element, MaterialProperties, MembraneFormulation};
use crate::error::{FEAError, FEAResult};
use crate::math::{check_domain, gauss_point_count, GaussianIntegrator, IsoPoint, Mat, Vec3, Vector};
use crate::permutation::{node_major_order, Dof, LocalDof};
use crate::results::{Displacement, Force};

pub use bar::{bar_end_fixity, bar_jacobian};
pub use cst::CstHelper;
pub use dkq::DkqHelper;
pub use dkt::DktHelper;
pub use euler_bernoulli::EulerBernoulliBeamHelper;
pub use q4_membrane::Q4MembraneHelper;
pub use shaft::ShaftHelper;
pub use tetrahedron::{orthotropic_elasticity, TetrahedronHelper};
pub use timoshenko::TimoshenkoBeamHelper;
pub use truss::TrussHelper;

/// Bending plane of a beam helper, named after the moment axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeamDirection {
    /// Bending about local y: DOFs Dz, Ry
    Y,
    /// Bending about local z: DOFs Dy, Rz
    Z,
}

impl BeamDirection {
    /// Translation and rotation DOF of the bending plane
    pub fn dofs(self) -> &'static [Dof] {
        match self {
            BeamDirection::Y => &[Dof::Dz, Dof::Ry],
            BeamDirection::Z => &[Dof::Dy, Dof::Rz],
        }
    }

    /// Sign relating the rotation DOF to the slope of the deflection
    pub fn rotation_sign(self) -> f64 {
        match self {
            BeamDirection::Y => -1.0,
            BeamDirection::Z => 1.0,
        }
    }
}

/// Identifies a helper implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Truss,
    Shaft,
    EulerBernoulliBeam(BeamDirection),
    TimoshenkoBeam(BeamDirection),
    Cst,
    Q4Membrane,
    Dkt,
    Dkq,
    Tetrahedron,
}

impl HelperKind {
    pub fn is_bar(self) -> bool {
        matches!(
            self,
            HelperKind::Truss
                | HelperKind::Shaft
                | HelperKind::EulerBernoulliBeam(_)
                | HelperKind::TimoshenkoBeam(_)
        )
    }

    pub fn beam_direction(self) -> Option<BeamDirection> {
        match self {
            HelperKind::EulerBernoulliBeam(d) | HelperKind::TimoshenkoBeam(d) => Some(d),
            _ => None,
        }
    }
}

/// Iso-parametric domain of a helper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsoDomain {
    /// xi in [-1, 1]
    Line,
    /// xi, eta >= 0, xi + eta <= 1
    Triangle,
    /// xi, eta in [-1, 1]
    Rectangle,
    /// xi, eta, lambda >= 0, xi + eta + lambda <= 1
    Tetrahedron,
}

impl IsoDomain {
    /// Integrator exact for a polynomial integrand with the given per-axis degrees.
    ///
    /// Collapsed domains raise the degree seen by the outer axes.
    pub fn integrator(self, degrees: [usize; 3]) -> GaussianIntegrator<'static> {
        let [d0, d1, d2] = degrees;
        match self {
            IsoDomain::Line => GaussianIntegrator::line(-1.0, 1.0, gauss_point_count(d0)),
            IsoDomain::Rectangle => {
                GaussianIntegrator::rectangle(gauss_point_count(d0), gauss_point_count(d1))
            }
            IsoDomain::Triangle => {
                GaussianIntegrator::triangle(gauss_point_count(d0), gauss_point_count(d0 + d1 + 1))
            }
            IsoDomain::Tetrahedron => GaussianIntegrator::tetrahedron(
                gauss_point_count(d0),
                gauss_point_count(d0 + d1 + 1),
                gauss_point_count(d0 + d1 + d2 + 2),
            ),
        }
    }

    /// Iso coordinates of the corner nodes
    pub fn node_locations(self) -> Vec<IsoPoint> {
        match self {
            IsoDomain::Line => vec![IsoPoint::on_line(-1.0), IsoPoint::on_line(1.0)],
            IsoDomain::Triangle => vec![
                IsoPoint::on_plane(0.0, 0.0),
                IsoPoint::on_plane(1.0, 0.0),
                IsoPoint::on_plane(0.0, 1.0),
            ],
            IsoDomain::Rectangle => vec![
                IsoPoint::on_plane(-1.0, -1.0),
                IsoPoint::on_plane(1.0, -1.0),
                IsoPoint::on_plane(1.0, 1.0),
                IsoPoint::on_plane(-1.0, 1.0),
            ],
            IsoDomain::Tetrahedron => vec![
                IsoPoint::new(0.0, 0.0, 0.0),
                IsoPoint::new(1.0, 0.0, 0.0),
                IsoPoint::new(0.0, 1.0, 0.0),
                IsoPoint::new(0.0, 0.0, 1.0),
            ],
        }
    }

    /// Fail with `DomainError` when `iso` lies outside the domain
    pub fn check(self, iso: IsoPoint, tol: f64) -> FEAResult<()> {
        match self {
            IsoDomain::Line => check_domain(iso.xi, -1.0, 1.0, tol),
            IsoDomain::Rectangle => {
                check_domain(iso.xi, -1.0, 1.0, tol)?;
                check_domain(iso.eta, -1.0, 1.0, tol)
            }
            IsoDomain::Triangle => {
                check_domain(iso.xi, 0.0, 1.0, tol)?;
                check_domain(iso.eta, 0.0, 1.0, tol)?;
                check_domain(iso.xi + iso.eta, 0.0, 1.0, tol)
            }
            IsoDomain::Tetrahedron => {
                check_domain(iso.xi, 0.0, 1.0, tol)?;
                check_domain(iso.eta, 0.0, 1.0, tol)?;
                check_domain(iso.lambda, 0.0, 1.0, tol)?;
                check_domain(iso.xi + iso.eta + iso.lambda, 0.0, 1.0, tol)
            }
        }
    }

    /// Geometric (linear or bilinear) shape function values
    pub fn shape_values(self, iso: IsoPoint) -> Vec<f64> {
        let IsoPoint { xi, eta, lambda } = iso;
        match self {
            IsoDomain::Line => vec![(1.0 - xi) / 2.0, (1.0 + xi) / 2.0],
            IsoDomain::Triangle => vec![1.0 - xi - eta, xi, eta],
            IsoDomain::Rectangle => vec![
                0.25 * (1.0 - xi) * (1.0 - eta),
                0.25 * (1.0 + xi) * (1.0 - eta),
                0.25 * (1.0 + xi) * (1.0 + eta),
                0.25 * (1.0 - xi) * (1.0 + eta),
            ],
            IsoDomain::Tetrahedron => vec![1.0 - xi - eta - lambda, xi, eta, lambda],
        }
    }

    /// Derivatives of the geometric shape functions, one row per iso axis
    pub fn shape_derivatives(self, iso: IsoPoint) -> Mat {
        let IsoPoint { xi, eta, .. } = iso;
        match self {
            IsoDomain::Line => Mat::from_row_slice(1, 2, &[-0.5, 0.5]),
            IsoDomain::Triangle => Mat::from_row_slice(2, 3, &[-1.0, 1.0, 0.0, -1.0, 0.0, 1.0]),
            #[rustfmt::skip]
            IsoDomain::Rectangle => Mat::from_row_slice(2, 4, &[
                -0.25 * (1.0 - eta), 0.25 * (1.0 - eta), 0.25 * (1.0 + eta), -0.25 * (1.0 + eta),
                -0.25 * (1.0 - xi), -0.25 * (1.0 + xi), 0.25 * (1.0 + xi), 0.25 * (1.0 - xi),
            ]),
            #[rustfmt::skip]
            IsoDomain::Tetrahedron => Mat::from_row_slice(3, 4, &[
                -1.0, 1.0, 0.0, 0.0,
                -1.0, 0.0, 1.0, 0.0,
                -1.0, 0.0, 0.0, 1.0,
            ]),
        }
    }

    /// Dimension of the iso space
    pub fn dimension(self) -> usize {
        match self {
            IsoDomain::Line => 1,
            IsoDomain::Triangle | IsoDomain::Rectangle => 2,
            IsoDomain::Tetrahedron => 3,
        }
    }

    /// Jacobian `d(x..)/d(xi..)` from local node coordinates
    pub fn jacobian(self, nodes: &[Vec3], iso: IsoPoint) -> FEAResult<Mat> {
        let dn = self.shape_derivatives(iso);
        if dn.ncols() != nodes.len() {
            return Err(FEAError::DimensionError {
                expected: (dn.ncols(), 3),
                actual: (nodes.len(), 3),
            });
        }
        let dim = self.dimension();
        let coords = Mat::from_fn(nodes.len(), dim, |i, j| nodes[i][j]);
        Ok(dn * coords)
    }

    /// Local coordinates of an iso point
    pub fn iso_to_local(self, nodes: &[Vec3], iso: IsoPoint) -> FEAResult<Vec3> {
        let n = self.shape_values(iso);
        if n.len() != nodes.len() {
            return Err(FEAError::DimensionError {
                expected: (n.len(), 3),
                actual: (nodes.len(), 3),
            });
        }
        Ok(n.iter().zip(nodes).fold(Vec3::zeros(), |acc, (w, p)| acc + p * *w))
    }

    /// Iso coordinates of a local point; bilinear quads are inverted by Newton iteration
    pub fn local_to_iso(
        self,
        nodes: &[Vec3],
        p: Vec3,
        geometry_tol: f64,
        iso_tol: f64,
    ) -> FEAResult<IsoPoint> {
        let expected = self.node_locations().len();
        if nodes.len() != expected {
            return Err(FEAError::DimensionError {
                expected: (expected, 3),
                actual: (nodes.len(), 3),
            });
        }

        if self == IsoDomain::Line {
            let axis = nodes[1] - nodes[0];
            let length = axis.norm();
            if length < geometry_tol {
                return Err(FEAError::degenerate("bar has zero length"));
            }
            let xi = 2.0 * (p - nodes[0]).dot(&axis) / (length * length) - 1.0;
            let iso = IsoPoint::on_line(xi);
            self.check(iso, iso_tol)?;
            return Ok(iso);
        }

        let dim = self.dimension();
        let mut iso = match self {
            IsoDomain::Triangle => IsoPoint::on_plane(1.0 / 3.0, 1.0 / 3.0),
            IsoDomain::Tetrahedron => IsoPoint::new(0.25, 0.25, 0.25),
            _ => IsoPoint::default(),
        };

        for _ in 0..50 {
            let r = p - self.iso_to_local(nodes, iso)?;
            let jt = self.jacobian(nodes, iso)?.transpose();
            let (inv, _) = crate::math::invert_jacobian(&jt, geometry_tol)?;
            let rhs = Vector::from_iterator(dim, (0..dim).map(|i| r[i]));
            let d = inv * rhs;
            iso.xi += d[0];
            if dim > 1 {
                iso.eta += d[1];
            }
            if dim > 2 {
                iso.lambda += d[2];
            }
            if d.norm() < 1e-14 {
                break;
            }
        }
        self.check(iso, iso_tol)?;
        Ok(iso)
    }
}

/// Plane stress constitutive matrix `[[d11, d12, 0], [d12, d22, 0], [0, 0, gxy]]`
pub fn plane_stress_matrix(m: &MaterialProperties) -> Mat {
    let den = 1.0 - m.nu_xy * m.nu_yx;
    #[rustfmt::skip]
    let d = Mat::from_row_slice(3, 3, &[
        m.ex / den, m.ex * m.nu_yx / den, 0.0,
        m.ex * m.nu_yx / den, m.ey / den, 0.0,
        0.0, 0.0, m.gxy,
    ]);
    d
}

/// In-plane block of the 3D elasticity, zero out-of-plane strain
pub fn plane_strain_matrix(m: &MaterialProperties) -> FEAResult<Mat> {
    let full = orthotropic_elasticity(m)?;
    let mut d = Mat::zeros(3, 3);
    for (r, fr) in [0, 1, 3].into_iter().enumerate() {
        for (c, fc) in [0, 1, 3].into_iter().enumerate() {
            d[(r, c)] = full[(fr, fc)];
        }
    }
    Ok(d)
}

/// Membrane constitutive matrix for the section's formulation
pub fn membrane_matrix(m: &MaterialProperties, formulation: MembraneFormulation) -> FEAResult<Mat> {
    match formulation {
        MembraneFormulation::PlaneStress => Ok(plane_stress_matrix(m)),
        MembraneFormulation::PlaneStrain => plane_strain_matrix(m),
    }
}

fn check_vector_len(u: &Vector, expected: usize) -> FEAResult<()> {
    if u.len() != expected {
        return Err(FEAError::DimensionError {
            expected: (expected, 1),
            actual: (u.len(), 1),
        });
    }
    Ok(())
}

/// Strategy computing the matrices of one kinematic behavior of an element
pub trait ElementHelper: fmt::Debug + Send + Sync {
    fn kind(&self) -> HelperKind;

    /// DOFs this helper owns at every node
    fn dofs_per_node(&self) -> &'static [Dof];

    /// Components interpolated by `interpolation_at`, one per row
    fn interpolated_dofs(&self) -> &'static [Dof] {
        self.dofs_per_node()
    }

    fn domain(&self) -> IsoDomain;

    /// `UnsupportedFormulation` or `DegenerateGeometry` if the element cannot be formulated
    fn check(&self, elm: &Element) -> FEAResult<()>;

    /// Helper DOFs in the order of matrix rows and columns
    fn dof_order(&self, elm: &Element) -> Vec<LocalDof> {
        node_major_order(elm.node_count(), self.dofs_per_node())
    }

    fn n_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;
    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;
    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;
    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;
    fn j_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;

    fn det_j_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<f64> {
        Ok(self.j_matrix_at(elm, iso)?.determinant())
    }

    /// Field values of `interpolated_dofs` in terms of the helper DOFs
    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat>;

    /// Per axis polynomial degree of the interpolation
    fn n_max_order(&self, elm: &Element) -> FEAResult<[usize; 3]>;
    fn b_max_order(&self, elm: &Element) -> FEAResult<[usize; 3]>;
    fn det_j_order(&self, elm: &Element) -> FEAResult<[usize; 3]>;

    /// Per axis polynomial degree of section and material properties
    fn property_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0; 3])
    }

    /// `integral of B^T D B |J|`
    fn local_stiffness_matrix(&self, elm: &Element) -> FEAResult<Mat> {
        self.check(elm)?;
        let degrees = integrand_degrees(
            self.b_max_order(elm)?,
            self.det_j_order(elm)?,
            self.property_order(elm)?,
        );
        debug!("{:?}: stiffness integrand degrees {:?}", self.kind(), degrees);

        self.domain().integrator(degrees).integrate(|xi, eta, gamma| {
            let iso = IsoPoint::new(xi, eta, gamma);
            let b = self.b_matrix_at(elm, iso)?;
            let d = self.d_matrix_at(elm, iso)?;
            let det = self.det_j_at(elm, iso)?;
            Ok(b.transpose() * d * b * det.abs())
        })
    }

    /// `integral of N^T rho N |J|`
    fn local_mass_matrix(&self, elm: &Element) -> FEAResult<Mat> {
        self.check(elm)?;
        let degrees = integrand_degrees(
            self.n_max_order(elm)?,
            self.det_j_order(elm)?,
            self.property_order(elm)?,
        );
        self.domain().integrator(degrees).integrate(|xi, eta, gamma| {
            let iso = IsoPoint::new(xi, eta, gamma);
            let n = self.interpolation_at(elm, iso)?;
            let rho = self.rho_matrix_at(elm, iso)?;
            let det = self.det_j_at(elm, iso)?;
            Ok(n.transpose() * rho * n * det.abs())
        })
    }

    /// `integral of N^T mu N |J|`
    fn local_damping_matrix(&self, elm: &Element) -> FEAResult<Mat> {
        self.check(elm)?;
        let degrees = integrand_degrees(
            self.n_max_order(elm)?,
            self.det_j_order(elm)?,
            self.property_order(elm)?,
        );
        self.domain().integrator(degrees).integrate(|xi, eta, gamma| {
            let iso = IsoPoint::new(xi, eta, gamma);
            let n = self.interpolation_at(elm, iso)?;
            let mu = self.mu_matrix_at(elm, iso)?;
            let det = self.det_j_at(elm, iso)?;
            Ok(n.transpose() * mu * n * det.abs())
        })
    }

    /// Internal force at `iso` caused by the helper DOF values `u`
    fn local_internal_force_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Force>;

    /// Interpolated displacement at `iso` from the helper DOF values `u`
    fn local_displacement_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Displacement> {
        self.domain().check(iso, elm.options().iso_tolerance)?;
        check_vector_len(u, self.dof_order(elm).len())?;
        let values = self.interpolation_at(elm, iso)? * u;
        let mut arr = [0.0; 6];
        for (row, dof) in self.interpolated_dofs().iter().enumerate() {
            arr[dof.index()] = values[row];
        }
        Ok(Displacement::from_array(arr))
    }

    /// Generalized stress `D * B * u`: stress resultants for bars, membranes
    /// and plates, Cauchy stress for solids
    fn local_stress_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Vector> {
        self.domain().check(iso, elm.options().iso_tolerance)?;
        check_vector_len(u, self.dof_order(elm).len())?;
        let b = self.b_matrix_at(elm, iso)?;
        let d = self.d_matrix_at(elm, iso)?;
        Ok(d * b * u)
    }
}

/// Degree of `X^T P X |J|` where X has per axis degree `x`
fn integrand_degrees(x: [usize; 3], det: [usize; 3], props: [usize; 3]) -> [usize; 3] {
    std::array::from_fn(|i| 2 * x[i] + det[i] + props[i])
}

/// Helpers that formulate `elm` according to its behavior flags
pub fn helpers_for(elm: &Element) -> FEAResult<Vec<Box<dyn ElementHelper>>> {
    use crate::elements::{Behavior, Topology};

    let b = elm.behavior();
    let mut out: Vec<Box<dyn ElementHelper>> = Vec::new();

    if b.contains(Behavior::TRUSS) {
        out.push(Box::new(TrussHelper));
    }
    if b.contains(Behavior::SHAFT) {
        out.push(Box::new(ShaftHelper));
    }
    for (flag, dir) in [
        (Behavior::BEAM_Y_EULER_BERNOULLI, BeamDirection::Y),
        (Behavior::BEAM_Z_EULER_BERNOULLI, BeamDirection::Z),
    ] {
        if b.contains(flag) {
            out.push(Box::new(EulerBernoulliBeamHelper::new(dir)));
        }
    }
    for (flag, dir) in [
        (Behavior::BEAM_Y_TIMOSHENKO, BeamDirection::Y),
        (Behavior::BEAM_Z_TIMOSHENKO, BeamDirection::Z),
    ] {
        if b.contains(flag) {
            out.push(Box::new(TimoshenkoBeamHelper::new(dir)));
        }
    }
    if b.contains(Behavior::MEMBRANE) {
        match elm.topology() {
            Topology::Triangle3 => out.push(Box::new(CstHelper)),
            Topology::Quad4 => out.push(Box::new(Q4MembraneHelper)),
            t => return Err(FEAError::unsupported(format!("membrane on {t:?}"))),
        }
    }
    if b.contains(Behavior::THIN_PLATE) {
        match elm.topology() {
            Topology::Triangle3 => out.push(Box::new(DktHelper)),
            Topology::Quad4 => out.push(Box::new(DkqHelper)),
            t => return Err(FEAError::unsupported(format!("thin plate on {t:?}"))),
        }
    }
    if b.contains(Behavior::SOLID) {
        out.push(Box::new(TetrahedronHelper));
    }
    Ok(out)
}
