use crate::{CoreError, CoreResult};

/// Floating point type used throughout the system
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

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// True when `value` lies inside the relative band `target ± frac*|target|`.
///
/// Used for settling-band checks. Falls back to an absolute band when the
/// target is zero (a relative band around zero would be empty).
pub fn within_band(value: Real, target: Real, frac: Real) -> bool {
    let half_width = if target == 0.0 {
        frac
    } else {
        frac * target.abs()
    };
    (value - target).abs() <= half_width
}
