//! Gauss-Legendre quadrature and the nested iso-parametric integrator

use std::sync::OnceLock;

use log::trace;

use super::Mat;
use crate::error::{FEAError, FEAResult};

/// Largest supported number of points per axis
pub const MAX_GAUSS_POINTS: usize = 32;

/// A 1D Gauss point on [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussPoint {
    pub coord: f64,
    pub weight: f64,
}

/// Number of points that integrates a polynomial of `degree` exactly
pub fn gauss_point_count(degree: usize) -> usize {
    degree / 2 + 1
}

fn legendre_points(n: usize) -> Vec<GaussPoint> {
    let mut points = vec![GaussPoint { coord: 0.0, weight: 0.0 }; n];
    let nf = n as f64;
    for i in 0..(n + 1) / 2 {
        let mut x = (std::f64::consts::PI * (i as f64 + 0.75) / (nf + 0.5)).cos();
        let mut dp = 1.0;
        for _ in 0..100 {
            let (mut p0, mut p1) = (1.0, x);
            for k in 2..=n {
                let kf = k as f64;
                let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
                p0 = p1;
                p1 = p2;
            }
            dp = nf * (x * p1 - p0) / (x * x - 1.0);
            let dx = p1 / dp;
            x -= dx;
            if dx.abs() < 1e-15 {
                break;
            }
        }
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points[i] = GaussPoint { coord: -x, weight: w };
        points[n - 1 - i] = GaussPoint { coord: x, weight: w };
    }
    points
}

fn table() -> &'static [Vec<GaussPoint>] {
    static TABLE: OnceLock<Vec<Vec<GaussPoint>>> = OnceLock::new();
    TABLE.get_or_init(|| (1..=MAX_GAUSS_POINTS).map(legendre_points).collect())
}

/// Gauss-Legendre points on [-1, 1], in ascending coordinate order
pub fn gauss_legendre(n: usize) -> FEAResult<&'static [GaussPoint]> {
    if n == 0 || n > MAX_GAUSS_POINTS {
        return Err(FEAError::unsupported(format!(
            "{n} gauss points requested, supported range is 1..={MAX_GAUSS_POINTS}"
        )));
    }
    Ok(&table()[n - 1])
}

/// Integrates a matrix valued function `H(xi, eta, gamma)` over
///
/// ```text
/// gamma in [a1, a2]
///   eta in [f1(gamma), f2(gamma)]
///     xi in [g1(eta, gamma), g2(eta, gamma)]
/// ```
///
/// Axes that a problem does not use are given the unit range [0, 1] with a
/// single point, which contributes a factor of one.
pub struct GaussianIntegrator<'a> {
    pub a1: f64,
    pub a2: f64,
    pub f1: Box<dyn Fn(f64) -> f64 + 'a>,
    pub f2: Box<dyn Fn(f64) -> f64 + 'a>,
    pub g1: Box<dyn Fn(f64, f64) -> f64 + 'a>,
    pub g2: Box<dyn Fn(f64, f64) -> f64 + 'a>,
    pub xi_points: usize,
    pub eta_points: usize,
    pub gamma_points: usize,
}

impl<'a> GaussianIntegrator<'a> {
    /// Integrate along `xi` over `[a, b]`
    pub fn line(a: f64, b: f64, points: usize) -> Self {
        Self {
            a1: 0.0,
            a2: 1.0,
            f1: Box::new(|_| 0.0),
            f2: Box::new(|_| 1.0),
            g1: Box::new(move |_, _| a),
            g2: Box::new(move |_, _| b),
            xi_points: points,
            eta_points: 1,
            gamma_points: 1,
        }
    }

    /// Bi-unit square `[-1, 1] x [-1, 1]`
    pub fn rectangle(xi_points: usize, eta_points: usize) -> Self {
        Self {
            a1: 0.0,
            a2: 1.0,
            f1: Box::new(|_| -1.0),
            f2: Box::new(|_| 1.0),
            g1: Box::new(|_, _| -1.0),
            g2: Box::new(|_, _| 1.0),
            xi_points,
            eta_points,
            gamma_points: 1,
        }
    }

    /// Unit triangle `xi >= 0, eta >= 0, xi + eta <= 1`
    pub fn triangle(xi_points: usize, eta_points: usize) -> Self {
        Self {
            a1: 0.0,
            a2: 1.0,
            f1: Box::new(|_| 0.0),
            f2: Box::new(|_| 1.0),
            g1: Box::new(|_, _| 0.0),
            g2: Box::new(|eta, _| 1.0 - eta),
            xi_points,
            eta_points,
            gamma_points: 1,
        }
    }

    /// Unit tetrahedron `xi, eta, gamma >= 0, xi + eta + gamma <= 1`
    pub fn tetrahedron(xi_points: usize, eta_points: usize, gamma_points: usize) -> Self {
        Self {
            a1: 0.0,
            a2: 1.0,
            f1: Box::new(|_| 0.0),
            f2: Box::new(|gamma| 1.0 - gamma),
            g1: Box::new(|_, _| 0.0),
            g2: Box::new(|eta, gamma| 1.0 - eta - gamma),
            xi_points,
            eta_points,
            gamma_points,
        }
    }

    /// Evaluate the integral. All integrand samples must share one shape.
    pub fn integrate<H>(&self, mut h: H) -> FEAResult<Mat>
    where
        H: FnMut(f64, f64, f64) -> FEAResult<Mat>,
    {
        let gammas = gauss_legendre(self.gamma_points)?;
        let etas = gauss_legendre(self.eta_points)?;
        let xis = gauss_legendre(self.xi_points)?;
        trace!(
            "gauss integration with {}x{}x{} points",
            self.xi_points,
            self.eta_points,
            self.gamma_points
        );

        let mut sum: Option<Mat> = None;

        let gamma_half = (self.a2 - self.a1) / 2.0;
        let gamma_mid = (self.a2 + self.a1) / 2.0;
        for gp in gammas {
            let gamma = gamma_mid + gamma_half * gp.coord;
            let (e1, e2) = ((self.f1)(gamma), (self.f2)(gamma));
            let eta_half = (e2 - e1) / 2.0;
            let eta_mid = (e2 + e1) / 2.0;

            for ep in etas {
                let eta = eta_mid + eta_half * ep.coord;
                let (x1, x2) = ((self.g1)(eta, gamma), (self.g2)(eta, gamma));
                let xi_half = (x2 - x1) / 2.0;
                let xi_mid = (x2 + x1) / 2.0;

                for xp in xis {
                    let xi = xi_mid + xi_half * xp.coord;
                    let w = gp.weight * gamma_half * ep.weight * eta_half * xp.weight * xi_half;
                    let value = h(xi, eta, gamma)?;

                    match sum.as_mut() {
                        None => sum = Some(value * w),
                        Some(acc) => {
                            if acc.shape() != value.shape() {
                                return Err(FEAError::DimensionError {
                                    expected: acc.shape(),
                                    actual: value.shape(),
                                });
                            }
                            *acc += value * w;
                        }
                    }
                }
            }
        }

        sum.ok_or_else(|| FEAError::MathError("empty integration domain".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_known_points() {
        let p2 = gauss_legendre(2).unwrap();
        assert_relative_eq!(p2[0].coord, -1.0 / 3f64.sqrt(), epsilon = 1e-14);
        assert_relative_eq!(p2[1].weight, 1.0, epsilon = 1e-14);

        let p3 = gauss_legendre(3).unwrap();
        assert_relative_eq!(p3[1].coord, 0.0, epsilon = 1e-14);
        assert_relative_eq!(p3[1].weight, 8.0 / 9.0, epsilon = 1e-14);
        assert_relative_eq!(p3[2].coord, (0.6f64).sqrt(), epsilon = 1e-14);
        assert_relative_eq!(p3[0].weight, 5.0 / 9.0, epsilon = 1e-14);

        let p1 = gauss_legendre(1).unwrap();
        assert_relative_eq!(p1[0].coord, 0.0, epsilon = 1e-14);
        assert_relative_eq!(p1[0].weight, 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_weights_sum_to_two() {
        for n in 1..=MAX_GAUSS_POINTS {
            let s: f64 = gauss_legendre(n).unwrap().iter().map(|p| p.weight).sum();
            assert_relative_eq!(s, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(gauss_legendre(0).is_err());
        assert!(gauss_legendre(MAX_GAUSS_POINTS + 1).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_point_count_is_exact_for_degree() {
        // x^7 + x^6 on [0, 2]
        let degree = 7;
        let n = gauss_point_count(degree);
        let intg = GaussianIntegrator::line(0.0, 2.0, n);
        let r = intg
            .integrate(|x, _, _| Ok(Mat::from_element(1, 1, x.powi(7) + x.powi(6))))
            .unwrap();
        assert_relative_eq!(r[(0, 0)], 256.0 / 8.0 + 128.0 / 7.0, epsilon = 1e-10);
    }

    #[test]
    fn test_triangle_area_and_moment() {
        let intg = GaussianIntegrator::triangle(2, 2);
        let r = intg
            .integrate(|xi, eta, _| Ok(Mat::from_row_slice(1, 2, &[1.0, xi * eta])))
            .unwrap();
        assert_relative_eq!(r[(0, 0)], 0.5, epsilon = 1e-14);
        assert_relative_eq!(r[(0, 1)], 1.0 / 24.0, epsilon = 1e-14);
    }

    #[test]
    fn test_tetrahedron_volume() {
        let intg = GaussianIntegrator::tetrahedron(1, 1, 1);
        let r = intg.integrate(|_, _, _| Ok(Mat::from_element(1, 1, 1.0))).unwrap();
        assert_relative_eq!(r[(0, 0)], 1.0 / 6.0, epsilon = 1e-14);
    }

    #[test]
    fn test_rectangle() {
        let intg = GaussianIntegrator::rectangle(2, 2);
        let r = intg
            .integrate(|xi, eta, _| Ok(Mat::from_element(1, 1, xi * xi * eta * eta)))
            .unwrap();
        assert_relative_eq!(r[(0, 0)], 4.0 / 9.0, epsilon = 1e-14);
    }

    #[test]
    fn test_shape_change_is_dimension_error() {
        let intg = GaussianIntegrator::line(-1.0, 1.0, 2);
        let err = intg
            .integrate(|xi, _, _| {
                let n = if xi < 0.0 { 1 } else { 2 };
                Ok(Mat::zeros(n, 1))
            })
            .unwrap_err();
        assert!(matches!(err, FEAError::DimensionError { .. }));
    }
}
