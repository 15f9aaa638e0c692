//! Closed-form generalized mass matrix of the leg/trunk pendulum.

use crate::params::PhysicalParams;
use qs_core::Real;

/// Symmetric 2×2 mass matrix `[[m11, m12], [m12, m22]]` in ankle/hip
/// coordinates. Only the hip angle enters it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassMatrix {
    pub m11: Real,
    pub m12: Real,
    pub m22: Real,
}

impl MassMatrix {
    /// Evaluate at relative hip angle `theta_h`.
    #[inline]
    pub fn at(p: &PhysicalParams, theta_h: Real) -> Self {
        let d_t2 = p.d_t * p.d_t;
        let coupling = p.d_t * p.l_l * theta_h.cos();
        Self {
            m11: p.i_l
                + p.i_t
                + p.d_l * p.d_l * p.m_l
                + p.m_t * (p.l_l * p.l_l + d_t2 + 2.0 * coupling),
            m12: p.i_t + p.m_t * (d_t2 + coupling),
            m22: p.i_t + p.m_t * d_t2,
        }
    }

    pub fn determinant(&self) -> Real {
        self.m11 * self.m22 - self.m12 * self.m12
    }

    /// `m22 - m12² / m11`, the pivot left after eliminating the ankle row.
    pub fn schur_denominator(&self) -> Real {
        self.m22 - self.m12 * self.m12 / self.m11
    }

    /// Smallest determinant over all hip angles (reached at `cos θh = ±1`):
    ///
    /// ```text
    /// (I_L + m_L d_L² + m_T l_L²)(I_T + m_T d_T²) - (m_T l_L d_T)²
    /// ```
    ///
    /// Returns `(bound, scale)` where `scale` is the larger magnitude of the
    /// two terms, for relative comparisons.
    pub fn determinant_lower_bound(p: &PhysicalParams) -> (Real, Real) {
        let ankle = p.i_l + p.m_l * p.d_l * p.d_l + p.m_t * p.l_l * p.l_l;
        let hip = p.i_t + p.m_t * p.d_t * p.d_t;
        let cross = p.m_t * p.l_l * p.d_t;
        let product = ankle * hip;
        let cross2 = cross * cross;
        (product - cross2, product.abs().max(cross2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qs_core::{Tolerances, nearly_equal};

    #[test]
    fn reference_upright_entries() {
        let tol = Tolerances::default();
        let m = MassMatrix::at(&PhysicalParams::reference(), 0.0);
        assert!(nearly_equal(m.m11, 19.65, tol));
        assert!(nearly_equal(m.m12, 4.4, tol));
        assert!(nearly_equal(m.m22, 1.4, tol));
        assert!(nearly_equal(m.schur_denominator(), m.determinant() / m.m11, tol));
    }

    #[test]
    fn lower_bound_is_attained_at_straight_hip() {
        let p = PhysicalParams::reference();
        let (bound, _) = MassMatrix::determinant_lower_bound(&p);
        assert!((MassMatrix::at(&p, 0.0).determinant() - bound).abs() < 1e-10);
        assert!((MassMatrix::at(&p, std::f64::consts::PI).determinant() - bound).abs() < 1e-10);
        for k in 1..20 {
            let det = MassMatrix::at(&p, k as Real * 0.3).determinant();
            assert!(det >= bound - 1e-10);
        }
    }

    #[test]
    fn point_masses_on_massless_leg_degenerate() {
        let p = PhysicalParams {
            i_l: 0.0,
            i_t: 0.0,
            d_l: 0.0,
            ..PhysicalParams::reference()
        };
        let (bound, _) = MassMatrix::determinant_lower_bound(&p);
        assert!(bound.abs() < 1e-12);
        // Away from the straight configuration the matrix is still regular.
        assert!(MassMatrix::at(&p, 0.5).determinant() > 0.0);
    }
}
