//! Physical parameters of the leg/trunk pendulum.

use qs_core::units::{Accel, Inertia, Length, Mass, si};
use qs_core::{QsResult, Real, ensure_finite};
use serde::{Deserialize, Serialize};

/// Geometry, mass and gravity of the two-link model.
///
/// The leg rotates about the ankle, the trunk about the hip at the top of
/// the leg. All values are SI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParams {
    /// Ankle to hip distance (m)
    pub l_l: Real,
    /// Ankle to leg mass center (m)
    pub d_l: Real,
    /// Hip to trunk mass center (m)
    pub d_t: Real,
    /// Leg mass (kg)
    pub m_l: Real,
    /// Trunk mass (kg)
    pub m_t: Real,
    /// Leg moment of inertia about its mass center (kg·m²)
    pub i_l: Real,
    /// Trunk moment of inertia about its mass center (kg·m²)
    pub i_t: Real,
    /// Gravitational acceleration (m/s²)
    pub g: Real,
}

impl PhysicalParams {
    /// Number of scalar entries in the flat layout.
    pub const LEN: usize = 8;

    /// A compact, well-conditioned parameter set used throughout the tests.
    pub fn reference() -> Self {
        Self {
            l_l: 1.0,
            d_l: 0.5,
            d_t: 0.3,
            m_l: 5.0,
            m_t: 10.0,
            i_l: 1.0,
            i_t: 0.5,
            g: 9.81,
        }
    }

    /// Build from typed quantities.
    #[allow(clippy::too_many_arguments)]
    pub fn from_quantities(
        l_l: Length,
        d_l: Length,
        d_t: Length,
        m_l: Mass,
        m_t: Mass,
        i_l: Inertia,
        i_t: Inertia,
        g: Accel,
    ) -> Self {
        Self {
            l_l: si::meters(l_l),
            d_l: si::meters(d_l),
            d_t: si::meters(d_t),
            m_l: si::kilograms(m_l),
            m_t: si::kilograms(m_t),
            i_l: si::kilogram_square_meters(i_l),
            i_t: si::kilogram_square_meters(i_t),
            g: si::meters_per_second_squared(g),
        }
    }

    /// Positional order: `l_L, d_L, d_T, m_L, m_T, I_L, I_T, g`.
    pub fn from_array(v: &[Real; Self::LEN]) -> Self {
        Self {
            l_l: v[0],
            d_l: v[1],
            d_t: v[2],
            m_l: v[3],
            m_t: v[4],
            i_l: v[5],
            i_t: v[6],
            g: v[7],
        }
    }

    pub fn to_array(&self) -> [Real; Self::LEN] {
        [
            self.l_l, self.d_l, self.d_t, self.m_l, self.m_t, self.i_l, self.i_t, self.g,
        ]
    }

    /// Reject NaN or infinite entries.
    pub fn ensure_finite(&self) -> QsResult<()> {
        ensure_finite(self.l_l, "l_L")?;
        ensure_finite(self.d_l, "d_L")?;
        ensure_finite(self.d_t, "d_T")?;
        ensure_finite(self.m_l, "m_L")?;
        ensure_finite(self.m_t, "m_T")?;
        ensure_finite(self.i_l, "I_L")?;
        ensure_finite(self.i_t, "I_T")?;
        ensure_finite(self.g, "g")?;
        Ok(())
    }

    /// Combined first moment of mass about the ankle for the leg and the
    /// hip point (kg·m).
    #[inline]
    pub(crate) fn ankle_moment(&self) -> Real {
        self.d_l * self.m_l + self.l_l * self.m_t
    }
}
