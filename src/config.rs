//! Numeric thresholds and iteration caps shared across the crate.

/// Magnitude threshold below which a divisor is treated as zero.
pub const NEAR_ZERO: f64 = 1e-14;
/// Accuracy of polynomial roots in Newton and secant refinement.
pub const EPS_ROOT: f64 = 1e-12;
/// Maximum number of iterations when refining a polynomial root.
pub const MAX_ROOT_ITER: usize = 1000;
/// Below this argument magnitude, spherical Bessel functions use the power series.
pub const BESSEL_SMALL_ARG: f64 = 1e-3;
/// Above this argument magnitude, spherical Bessel functions use the asymptotic form.
pub const BESSEL_LARGE_ARG: f64 = 1e3;
/// Controls the start order of the backward Bessel recurrence, `Mn = n + sqrt(FACT * n)`.
pub const BESSEL_START_FACTOR: f64 = 400.0;
/// Seed value of the backward Bessel recurrence.
pub const BESSEL_INIT: f64 = 1e-35;
/// Upper bound of the running Bessel sequence before a rescale is applied.
pub const BESSEL_SEQ_UPPER: f64 = 1e10;
/// Lower bound of the running Bessel sequence before a rescale is applied.
pub const BESSEL_SEQ_LOWER: f64 = 1e-10;
