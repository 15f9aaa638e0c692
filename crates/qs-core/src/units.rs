// qs-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Length as UomLength, Mass as UomMass,
    MomentOfInertia as UomMomentOfInertia,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Inertia = UomMomentOfInertia;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn kgm2(v: f64) -> Inertia {
    use uom::si::moment_of_inertia::kilogram_square_meter;
    Inertia::new::<kilogram_square_meter>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

/// SI magnitudes, for feeding the scalar kernels.
pub mod si {
    use super::*;

    #[inline]
    pub fn meters(l: Length) -> f64 {
        l.get::<uom::si::length::meter>()
    }

    #[inline]
    pub fn kilograms(m: Mass) -> f64 {
        m.get::<uom::si::mass::kilogram>()
    }

    #[inline]
    pub fn kilogram_square_meters(i: Inertia) -> f64 {
        i.get::<uom::si::moment_of_inertia::kilogram_square_meter>()
    }

    #[inline]
    pub fn meters_per_second_squared(a: Accel) -> f64 {
        a.get::<uom::si::acceleration::meter_per_second_squared>()
    }
}
