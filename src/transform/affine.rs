//! Affine transform helpers.

use crate::foundation::core::Affine;
use crate::foundation::error::{WavyteError, WavyteResult};

/// Determinants at or below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// `a * b`: apply `b` first, then `a`.
#[inline]
pub fn compose(a: Affine, b: Affine) -> Affine {
    a * b
}

/// The identity transform.
#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

/// Return `true` when `a` has finite coefficients and a usable inverse.
pub fn is_invertible(a: Affine) -> bool {
    let det = a.determinant();
    a.is_finite() && det.is_finite() && det.abs() > SINGULAR_EPSILON
}

/// Inverse of `a`, or a validation error when `a` is singular.
pub fn checked_inverse(a: Affine) -> WavyteResult<Affine> {
    if !is_invertible(a) {
        return Err(WavyteError::validation(format!(
            "affine {:?} is not invertible",
            a.as_coeffs()
        )));
    }
    Ok(a.inverse())
}

/// `t` composed with itself `k` times; negative `k` uses the inverse.
///
/// `power(t, 0)` is the identity.
pub fn power(t: Affine, k: i64) -> WavyteResult<Affine> {
    let mut base = if k < 0 { checked_inverse(t)? } else { t };
    let mut n = k.unsigned_abs();
    let mut acc = Affine::IDENTITY;
    while n > 0 {
        if n & 1 == 1 {
            acc = compose(acc, base);
        }
        base = compose(base, base);
        n >>= 1;
    }
    Ok(acc)
}

/// Max absolute coefficient difference between two transforms.
pub fn max_coeff_delta(a: Affine, b: Affine) -> f64 {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
