//! Closed form shape functions of two node bar elements
//!
//! Shape functions are looked up from tables keyed by the fixity of the end
//! DOFs, so that end releases change the interpolation itself. A beam with
//! both rotations released interpolates linearly and has no bending
//! stiffness, without any special casing downstream.

use std::sync::OnceLock;

use super::Polynomial;
use crate::elements::DofConstraint;

/// Fixity of the four DOFs a bending helper sees on a two node bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarEndFixity {
    pub start_translation: DofConstraint,
    pub start_rotation: DofConstraint,
    pub end_translation: DofConstraint,
    pub end_rotation: DofConstraint,
}

impl BarEndFixity {
    pub fn fully_fixed() -> Self {
        Self {
            start_translation: DofConstraint::Fixed,
            start_rotation: DofConstraint::Fixed,
            end_translation: DofConstraint::Fixed,
            end_rotation: DofConstraint::Fixed,
        }
    }

    /// Table key, fixed = 1: start translation is the most significant bit
    pub fn key(&self) -> usize {
        let bit = |c: DofConstraint| usize::from(c == DofConstraint::Fixed);
        bit(self.start_translation) * 8
            + bit(self.start_rotation) * 4
            + bit(self.end_translation) * 2
            + bit(self.end_rotation)
    }

    pub fn is_fully_fixed(&self) -> bool {
        self.key() == 15
    }
}

/// Cubic shape functions of a beam in xi, `[n1, m1, n2, m2]`.
///
/// `n` interpolate end translations, `m` the end slopes `dv/dxi`; callers
/// scale `m` by the jacobian to obtain rotation shape functions.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamShapeSet {
    pub n1: Polynomial,
    pub m1: Polynomial,
    pub n2: Polynomial,
    pub m2: Polynomial,
}

/// Linear shape functions of a truss or shaft, `[n1, n2]`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearShapeSet {
    pub n1: Polynomial,
    pub n2: Polynomial,
}

const Z: [f64; 4] = [0.0; 4];
const ONE: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

/// Coefficients `[a3, a2, a1, a0]` of n1, n2, m1, m2 for each key
#[rustfmt::skip]
const BEAM_COEFFICIENTS: [[[f64; 4]; 4]; 16] = [
    // 0: nothing fixed
    [ONE, Z, [0.0, 0.0, 1.0, 1.0], Z],
    // 1: end rotation only
    [ONE, Z, Z, [0.0, 0.0, 1.0, 1.0]],
    // 2: end translation only
    [[0.0, 0.0, -0.5, 0.5], [0.0, 0.0, 0.5, 0.5], Z, Z],
    // 3: end fully fixed
    [Z, ONE, Z, [0.0, 0.0, 1.0, -1.0]],
    // 4: start rotation only
    [ONE, Z, [0.0, 0.0, 1.0, 1.0], Z],
    // 5: both rotations
    [ONE, Z, [0.0, -0.25, 0.5, 0.75], [0.0, 0.25, 0.5, 0.25]],
    // 6: start rotation, end translation
    [Z, ONE, [0.0, 0.0, 1.0, -1.0], Z],
    // 7: start translation released
    [Z, ONE, [0.0, -0.25, 0.5, -0.25], [0.0, 0.25, 0.5, -0.75]],
    // 8: start translation only
    [ONE, Z, [0.0, 0.0, 1.0, 1.0], Z],
    // 9: start translation, end rotation
    [ONE, Z, Z, [0.0, 0.0, 1.0, 1.0]],
    // 10: both translations (pinned-pinned)
    [[0.0, 0.0, -0.5, 0.5], [0.0, 0.0, 0.5, 0.5], Z, Z],
    // 11: start rotation released
    [[0.0625, 0.1875, -0.5625, 0.3125], [-0.0625, -0.1875, 0.5625, 0.6875], Z, [0.125, 0.375, -0.125, -0.375]],
    // 12: start fully fixed (cantilever)
    [ONE, Z, [0.0, 0.0, 1.0, 1.0], Z],
    // 13: end translation released
    [ONE, Z, [0.0, -0.25, 0.5, 0.75], [0.0, 0.25, 0.5, 0.25]],
    // 14: end rotation released
    [[0.0625, -0.1875, -0.5625, 0.6875], [-0.0625, 0.1875, 0.5625, 0.3125], [0.125, -0.375, -0.125, 0.375], Z],
    // 15: fully fixed
    [[0.25, 0.0, -0.75, 0.5], [-0.25, 0.0, 0.75, 0.5], [0.25, -0.25, -0.25, 0.25], [0.25, 0.25, -0.25, -0.25]],
];

fn beam_table() -> &'static [BeamShapeSet; 16] {
    static TABLE: OnceLock<[BeamShapeSet; 16]> = OnceLock::new();
    TABLE.get_or_init(|| {
        BEAM_COEFFICIENTS.map(|[n1, n2, m1, m2]| BeamShapeSet {
            n1: Polynomial::from_descending(&n1),
            m1: Polynomial::from_descending(&m1),
            n2: Polynomial::from_descending(&n2),
            m2: Polynomial::from_descending(&m2),
        })
    })
}

fn linear_table() -> &'static [LinearShapeSet; 4] {
    static TABLE: OnceLock<[LinearShapeSet; 4]> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            // both released
            LinearShapeSet { n1: Polynomial::zero(), n2: Polynomial::zero() },
            // end fixed
            LinearShapeSet { n1: Polynomial::zero(), n2: Polynomial::constant(1.0) },
            // start fixed
            LinearShapeSet { n1: Polynomial::constant(1.0), n2: Polynomial::zero() },
            // both fixed
            LinearShapeSet { n1: Polynomial::linear(0.5, -0.5), n2: Polynomial::linear(0.5, 0.5) },
        ]
    })
}

/// Beam shape functions for the given end fixity
pub fn beam_shape_functions(fixity: BarEndFixity) -> &'static BeamShapeSet {
    &beam_table()[fixity.key()]
}

/// Truss/shaft shape functions for the given fixity of the single DOF at each end
pub fn linear_shape_functions(start: DofConstraint, end: DofConstraint) -> &'static LinearShapeSet {
    let key = usize::from(start == DofConstraint::Fixed) * 2 + usize::from(end == DofConstraint::Fixed);
    &linear_table()[key]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use DofConstraint::{Fixed, Released};

    fn fixity(key: usize) -> BarEndFixity {
        let c = |bit: usize| if key & bit != 0 { Fixed } else { Released };
        BarEndFixity {
            start_translation: c(8),
            start_rotation: c(4),
            end_translation: c(2),
            end_rotation: c(1),
        }
    }

    #[test]
    fn test_key_round_trip() {
        for key in 0..16 {
            assert_eq!(fixity(key).key(), key);
        }
        assert!(BarEndFixity::fully_fixed().is_fully_fixed());
    }

    #[test]
    fn test_fixed_fixed_kronecker_delta() {
        let s = beam_shape_functions(BarEndFixity::fully_fixed());
        // values at the ends
        assert_relative_eq!(s.n1.evaluate(-1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.n1.evaluate(1.0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(s.n2.evaluate(1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.m1.evaluate(-1.0), 0.0, epsilon = 1e-14);
        assert_relative_eq!(s.m2.evaluate(1.0), 0.0, epsilon = 1e-14);
        // slopes at the ends
        assert_relative_eq!(s.m1.evaluate_derivative(-1.0, 1), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.m2.evaluate_derivative(1.0, 1), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.n1.evaluate_derivative(-1.0, 1), 0.0, epsilon = 1e-14);
        assert_relative_eq!(s.n2.evaluate_derivative(1.0, 1), 0.0, epsilon = 1e-14);
        assert_relative_eq!(s.m1.evaluate_derivative(1.0, 1), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_released_rotation_has_zero_moment() {
        // start rotation released: curvature vanishes at xi = -1
        let s = beam_shape_functions(fixity(11));
        for p in [&s.n1, &s.m1, &s.n2, &s.m2] {
            assert_relative_eq!(p.evaluate_derivative(-1.0, 2), 0.0, epsilon = 1e-14);
        }
        assert_relative_eq!(s.n1.evaluate(-1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.n2.evaluate(1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(s.m2.evaluate_derivative(1.0, 1), 1.0, epsilon = 1e-14);

        // end rotation released
        let s = beam_shape_functions(fixity(14));
        for p in [&s.n1, &s.m1, &s.n2, &s.m2] {
            assert_relative_eq!(p.evaluate_derivative(1.0, 2), 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_pinned_pinned_is_linear() {
        let s = beam_shape_functions(fixity(10));
        for p in [&s.n1, &s.m1, &s.n2, &s.m2] {
            assert_eq!(p.nth_derivative(2).evaluate(0.3), 0.0);
        }
        assert!(s.m1.is_zero() && s.m2.is_zero());
    }

    #[test]
    fn test_all_sets_represent_rigid_translation() {
        // every set with a fixed translation keeps n1 + n2 == 1
        for key in 0..16 {
            let f = fixity(key);
            if f.start_translation == Released && f.end_translation == Released {
                continue;
            }
            let s = beam_shape_functions(f);
            for xi in [-1.0, -0.4, 0.2, 1.0] {
                assert_relative_eq!(s.n1.evaluate(xi) + s.n2.evaluate(xi), 1.0, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_linear_table() {
        let s = linear_shape_functions(Fixed, Fixed);
        assert_relative_eq!(s.n1.evaluate(-1.0), 1.0);
        assert_relative_eq!(s.n2.evaluate(-1.0), 0.0);
        assert_relative_eq!(s.n2.evaluate(1.0), 1.0);

        let s = linear_shape_functions(Fixed, Released);
        assert_relative_eq!(s.n1.evaluate(0.5), 1.0);
        assert!(s.n2.is_zero());

        let s = linear_shape_functions(Released, Released);
        assert!(s.n1.is_zero() && s.n2.is_zero());
    }
}
