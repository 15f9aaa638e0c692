use crate::QsError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, QsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(QsError::NonFinite { what, value: v })
    }
}

/// Check every entry of `values`, reporting the first non-finite one.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), QsError> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(QsError::NonFinite { what, value }),
        None => Ok(()),
    }
}

/// Borrow `values` as a fixed-size array, or report the length mismatch.
///
/// Nothing past `values.len()` is ever read.
pub fn fixed_len<'a, const N: usize>(
    values: &'a [Real],
    what: &'static str,
) -> Result<&'a [Real; N], QsError> {
    values.try_into().map_err(|_| QsError::LengthMismatch {
        what,
        expected: N,
        actual: values.len(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nearly_equal_is_symmetric(a in -1e6_f64..1e6, b in -1e6_f64..1e6) {
            let tol = Tolerances::default();
            prop_assert_eq!(nearly_equal(a, b, tol), nearly_equal(b, a, tol));
        }
    }
}
