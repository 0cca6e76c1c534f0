//! Orthogonal polynomial families.
//!
//! Every family evaluates through a three-term recurrence and exposes the
//! same surface: lazy value/derivative sequences, the squared norm
//! `int P_n(x)^2 w(x) dx`, Christoffel numbers for Gauss-type quadrature,
//! and root finding. Concrete families live in [`crate::legendre`],
//! [`crate::laguerre`] and [`crate::arbitrary`]; Gauss meshes consume the
//! trait object directly.
//!
//! Sequences are finite, restartable and side-effect free: each call to
//! `compute` or `roots` re-runs the recurrence from scratch, and dropping
//! the iterator early costs nothing.

use crate::config::{EPS_ROOT, MAX_ROOT_ITER};
use crate::error::{Error, Result};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn secant_finds_bracketed_root() {
        // f(x) = x^2 - 2 on [0, 2]
        let f = |x: f64| Ok(x * x - 2.0);
        let root = secant(0.0, 2.0, -2.0, 2.0, 2, 0, f).unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn newton_reports_root_and_degree_on_failure() {
        // a_0 = a_1 = 0, b_1 = -1 gives p_2(x) = x^2 + 1, which has no real
        // root, so the iteration can never settle
        let pol =
            crate::arbitrary::Arbitrary::from_moments(-5.0, 5.0, 1, &[1.0, 0.0, -1.0, 0.0])
                .unwrap();
        let err = newton(&pol, 1.0, 2, 0).unwrap_err();
        assert_eq!(err, Error::RootNotFound { root: 0, degree: 2 });
    }
}

/// Value of a polynomial and its derivative at one degree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyValue {
    /// Degree of the polynomial.
    pub n: i32,
    /// Value `P_n(x)`.
    pub p: f64,
    /// Derivative `P_n'(x)`.
    pub dp: f64,
}

impl PolyValue {
    pub(crate) fn zero(n: i32) -> Self {
        Self { n, p: 0.0, dp: 0.0 }
    }
}

/// Lazy sequence of [`PolyValue`] for degrees `0..=n` (or the valid subset).
pub type Values<'a> = Box<dyn Iterator<Item = PolyValue> + 'a>;

/// Lazy sequence of polynomial roots; a failed refinement surfaces in place.
pub type Roots<'a> = Box<dyn Iterator<Item = Result<f64>> + 'a>;

/// A family of orthogonal polynomials evaluated by recurrence.
pub trait Polynomial {
    /// Left bound of the orthogonality interval.
    fn left(&self) -> f64 {
        f64::NEG_INFINITY
    }

    /// Right bound of the orthogonality interval.
    fn right(&self) -> f64 {
        f64::INFINITY
    }

    /// Evaluates the family at `x` for all degrees up to `n`.
    ///
    /// Fails with [`Error::ArgumentOutOfRange`] when `n` is negative or `x`
    /// lies outside an interval the family enforces. A family parameter that
    /// leaves no valid degree (associated Legendre with `|m| > n`) yields an
    /// empty sequence instead of an error.
    fn compute(&self, x: f64, n: i32) -> Result<Values<'_>>;

    /// Evaluates a single degree, defaulting to zero when the sequence does
    /// not reach it.
    fn compute_one(&self, x: f64, n: i32) -> Result<PolyValue> {
        Ok(self
            .compute(x, n)?
            .find(|v| v.n == n)
            .unwrap_or_else(|| PolyValue::zero(n)))
    }

    /// Squared norm `int P_n(x)^2 w(x) dx` over the orthogonality interval.
    fn norm(&self, n: i32) -> f64;

    /// Christoffel number (Gauss quadrature weight) for root `x` of degree `n`.
    fn cristoffel(&self, x: f64, n: i32) -> Result<f64>;

    /// Roots of the degree-`n` polynomial.
    fn roots(&self, n: i32) -> Roots<'_>;
}

/// Refines a root inside `[a, b]` with the false-position method.
///
/// `fa` and `fb` must have opposite signs so the bracket contains a root.
/// The bracket shrinks until two successive estimates agree to [`EPS_ROOT`];
/// exceeding [`MAX_ROOT_ITER`] fails with the offending `root` index and
/// polynomial `degree`.
pub(crate) fn secant<F>(
    mut a: f64,
    mut b: f64,
    mut fa: f64,
    mut fb: f64,
    degree: i32,
    root: usize,
    mut f: F,
) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    let mut x = a;
    for _ in 0..MAX_ROOT_ITER {
        let x1 = x;
        x = a - (b - a) / (fb - fa) * fa;
        let fx = f(x)?;
        if fx == 0.0 {
            return Ok(x);
        }
        if fx.signum() * fb.signum() < 0.0 {
            a = x;
            fa = fx;
        } else if fx.signum() * fa.signum() < 0.0 {
            b = x;
            fb = fx;
        } else {
            return Ok(x);
        }
        if (x - x1).abs() < EPS_ROOT {
            return Ok(x);
        }
    }
    Err(Error::RootNotFound { root, degree })
}

/// Newton iteration on `compute_one`, starting from the guess `z`.
pub(crate) fn newton<P>(pol: &P, mut z: f64, n: i32, root: usize) -> Result<f64>
where
    P: Polynomial + ?Sized,
{
    for _ in 0..MAX_ROOT_ITER {
        let val = pol.compute_one(z, n)?;
        let z1 = z;
        z = z1 - val.p / val.dp;
        if (z - z1).abs() <= EPS_ROOT {
            return Ok(z);
        }
    }
    Err(Error::RootNotFound { root, degree: n })
}

/// Computes all roots of degree `n` from the interlacing property: the roots
/// of degree `n` are separated by the roots of degree `n - 1`, so each
/// bracket between consecutive lower-degree roots (padded with the interval
/// bounds) contains exactly one root. Builds up recursively from degree 0.
pub(crate) fn roots_interlacing<P>(pol: &P, xmin: f64, xmax: f64, n: i32) -> Result<Vec<f64>>
where
    P: Polynomial + ?Sized,
{
    if n <= 0 {
        return Ok(Vec::new());
    }

    let inner = roots_interlacing(pol, xmin, xmax, n - 1)?;
    let mut out = Vec::with_capacity(n as usize);

    let mut x1 = xmin;
    let mut fx1 = pol.compute_one(x1, n)?.p;
    for &x in &inner {
        let fx = pol.compute_one(x, n)?.p;
        let z = secant(x1, x, fx1, fx, n, out.len(), |t| {
            Ok(pol.compute_one(t, n)?.p)
        })?;
        out.push(z);
        x1 = x;
        fx1 = fx;
    }

    let fx2 = pol.compute_one(xmax, n)?.p;
    let z = secant(x1, xmax, fx1, fx2, n, out.len(), |t| {
        Ok(pol.compute_one(t, n)?.p)
    })?;
    out.push(z);

    Ok(out)
}

/// Adapts an eagerly computed root set to the lazy [`Roots`] contract.
pub(crate) fn roots_from_result(res: Result<Vec<f64>>) -> Roots<'static> {
    match res {
        Ok(v) => Box::new(v.into_iter().map(Ok)),
        Err(e) => Box::new(std::iter::once(Err(e))),
    }
}
