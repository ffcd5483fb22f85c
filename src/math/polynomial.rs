//! Single variable polynomials
//!
//! Used for shape functions, for section and material properties that vary
//! along an element and for the severity of partial loads.

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

/// Polynomial `c0 + c1*x + c2*x^2 + ...`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polynomial {
    /// Coefficients in ascending power order
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Create from coefficients in ascending power order
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Create from coefficients in descending power order (highest first)
    pub fn from_descending(coefficients: &[f64]) -> Self {
        Self::new(coefficients.iter().rev().copied().collect())
    }

    pub fn zero() -> Self {
        Self::new(Vec::new())
    }

    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    /// `a0 + a1*x`
    pub fn linear(a0: f64, a1: f64) -> Self {
        Self::new(vec![a0, a1])
    }

    /// Polynomial of degree one through `(x0, y0)` and `(x1, y1)`
    pub fn through_two_points(x0: f64, y0: f64, x1: f64, y1: f64) -> FEAResult<Self> {
        if (x1 - x0).abs() < f64::EPSILON {
            return Err(FEAError::MathError(format!(
                "cannot fit a line through coincident abscissae {x0}"
            )));
        }
        let slope = (y1 - y0) / (x1 - x0);
        Ok(Self::linear(y0 - slope * x0, slope))
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree ignoring trailing zero coefficients. The zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients
            .iter()
            .rposition(|c| *c != 0.0)
            .unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|c| *c == 0.0)
    }

    /// Evaluate with Horner's rule
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * x + c)
    }

    /// First derivative
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() <= 1 {
            return Self::zero();
        }
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    /// `n`-th derivative
    pub fn nth_derivative(&self, n: usize) -> Self {
        (0..n).fold(self.clone(), |p, _| p.derivative())
    }

    /// Value of the `n`-th derivative at `x`
    pub fn evaluate_derivative(&self, x: f64, n: usize) -> f64 {
        self.nth_derivative(n).evaluate(x)
    }

    /// Antiderivative with zero constant term
    pub fn antiderivative(&self) -> Self {
        let mut c = Vec::with_capacity(self.coefficients.len() + 1);
        c.push(0.0);
        c.extend(
            self.coefficients
                .iter()
                .enumerate()
                .map(|(i, a)| a / (i as f64 + 1.0)),
        );
        Self::new(c)
    }

    /// Definite integral over `[a, b]`
    pub fn integrate(&self, a: f64, b: f64) -> f64 {
        let p = self.antiderivative();
        p.evaluate(b) - p.evaluate(a)
    }

    /// Multiply every coefficient by `k`
    pub fn scaled(&self, k: f64) -> Self {
        Self::new(self.coefficients.iter().map(|c| c * k).collect())
    }

    /// `p(a*x + b)`
    pub fn compose_affine(&self, a: f64, b: f64) -> Self {
        let inner = Self::linear(b, a);
        self.coefficients
            .iter()
            .rev()
            .fold(Self::zero(), |acc, c| &(&acc * &inner) + &Self::constant(*c))
    }

    /// Interpolating polynomial through the sample points.
    ///
    /// The degree is `xs.len() - 1`; solves the Vandermonde system.
    pub fn interpolate(xs: &[f64], ys: &[f64]) -> FEAResult<Self> {
        if xs.len() != ys.len() || xs.is_empty() {
            return Err(FEAError::DimensionError {
                expected: (xs.len(), 1),
                actual: (ys.len(), 1),
            });
        }
        let n = xs.len();
        let v = DMatrix::from_fn(n, n, |i, j| xs[i].powi(j as i32));
        let rhs = DVector::from_column_slice(ys);
        let sol = v
            .lu()
            .solve(&rhs)
            .ok_or_else(|| FEAError::MathError("singular Vandermonde system".into()))?;
        Ok(Self::new(sol.iter().copied().collect()))
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coefficients.len().max(rhs.coefficients.len());
        Polynomial::new(
            (0..n)
                .map(|i| {
                    self.coefficients.get(i).copied().unwrap_or(0.0)
                        + rhs.coefficients.get(i).copied().unwrap_or(0.0)
                })
                .collect(),
        )
    }
}

impl Sub for &Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &Polynomial) -> Polynomial {
        self + &(-rhs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scaled(-1.0)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        if self.coefficients.is_empty() || rhs.coefficients.is_empty() {
            return Polynomial::zero();
        }
        let mut c = vec![0.0; self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                c[i + j] += a * b;
            }
        }
        Polynomial::new(c)
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, k: f64) -> Polynomial {
        self.scaled(k)
    }
}
