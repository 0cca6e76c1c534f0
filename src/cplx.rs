//! Complex-number support for wave amplitude arithmetic.
//!
//! The crate works with [`num_complex::Complex64`] throughout. This module
//! adds the pieces the scattering code needs beyond the standard field
//! operations: division guarded against near-zero divisors, exact integer
//! powers of the imaginary unit, and a documented phase convention.
//!
//! # Branch convention
//!
//! Every principal-branch function (`sqrt`, `ln`, `powf`, `asin`, ...) is
//! taken from `num_complex`, whose argument is `atan2(im, re)` with range
//! `(-pi, pi]` and a branch cut along the negative real axis. Downstream
//! code handling evanescent or absorbing-medium waves must be written
//! against this convention.

use num_complex::Complex64;

use crate::config::NEAR_ZERO;
use crate::error::{Error, Result};


/// Guarded operations on complex amplitudes.
pub trait ComplexOps: Sized {
    /// Divides by `rhs`, failing when `|rhs|` is below [`NEAR_ZERO`].
    fn checked_div(self, rhs: Complex64) -> Result<Complex64>;

    /// Divides by the real scalar `rhs`, failing when `|rhs|` is below [`NEAR_ZERO`].
    fn checked_div_f64(self, rhs: f64) -> Result<Complex64>;

    /// Multiplicative inverse, failing when `|self|` is below [`NEAR_ZERO`].
    fn checked_inv(self) -> Result<Complex64>;

    /// Phase of the complex number in `(-pi, pi]`, the crate-wide branch convention.
    fn argument(self) -> f64;
}

impl ComplexOps for Complex64 {
    fn checked_div(self, rhs: Complex64) -> Result<Complex64> {
        let norm = rhs.norm();
        if norm < NEAR_ZERO {
            return Err(Error::DivisionByNearZero { norm });
        }
        Ok(self / rhs)
    }

    fn checked_div_f64(self, rhs: f64) -> Result<Complex64> {
        let norm = rhs.abs();
        if norm < NEAR_ZERO {
            return Err(Error::DivisionByNearZero { norm });
        }
        Ok(self / rhs)
    }

    fn checked_inv(self) -> Result<Complex64> {
        let norm = self.norm();
        if norm < NEAR_ZERO {
            return Err(Error::DivisionByNearZero { norm });
        }
        Ok(self.inv())
    }

    fn argument(self) -> f64 {
        self.im.atan2(self.re)
    }
}

/// Returns `i^k` exactly, for any integer `k`.
///
/// Powers of the imaginary unit cycle with period four, so the value is a
/// table lookup on `k mod 4` with no floating-point error. Used when
/// assembling SVWF prefactors of the form `i^(n - n')`.
pub fn aim(k: i32) -> Complex64 {
    match k.rem_euclid(4) {
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        3 => Complex64::new(0.0, -1.0),
        _ => Complex64::new(1.0, 0.0),
    }
}
