//! Orthogonal polynomials defined by an arbitrary weight function.
//!
//! The family is represented by its monic three-term recurrence
//! `p_{i+1} = (x - a_i) p_i - b_i p_{i-1}`, with the coefficients derived
//! either from the weight function itself (inner products evaluated on an
//! internal Gauss-Legendre mesh) or from precomputed moments
//! `M_k = int w(x) x^k dx` via the classical moment determinants.
//!
//! Both procedures are numerically unstable for high orders: the moment
//! matrix is severely ill-conditioned, and the discretized inner products
//! inherit the resolution of the internal mesh. This is a known limitation
//! of the construction, not something the crate tries to repair; keep the
//! order modest or supply a family with an analytic recurrence instead.

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::legendre::Legendre;
use crate::mesh::{Mesh, MeshGauss};
use crate::poly::{roots_from_result, roots_interlacing, PolyValue, Polynomial, Roots, Values};

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn unit_weight_reproduces_legendre_roots() {
        let n = 5;
        let pol = Arbitrary::from_weight(-1.0, 1.0, n, |_| 1.0, 100).unwrap();
        let leg = Legendre::new(0);

        let mut got: Vec<f64> = pol.roots(n).collect::<Result<_>>().unwrap();
        got.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut expected: Vec<f64> = leg.roots(n).collect::<Result<_>>().unwrap();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());

        assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-7, "{g} vs {e}");
        }
    }

    #[test]
    fn self_consistent_roots_for_monomial_weight() {
        for n in 1..=4 {
            let pol = Arbitrary::from_weight(0.0, 1.0, n, |x| x * x, 100).unwrap();
            let roots: Vec<f64> = pol.roots(n).collect::<Result<_>>().unwrap();
            assert_eq!(roots.len(), n as usize);
            for x in roots {
                assert!(pol.compute_one(x, n).unwrap().p.abs() < 1e-7);
            }
        }
    }

    #[test]
    fn moments_reproduce_legendre_roots() {
        // moments of the unit weight on [-1, 1]
        let order = 4;
        let moments: Vec<f64> = (0..2 * (order + 1))
            .map(|k| if k % 2 == 0 { 2.0 / (k + 1) as f64 } else { 0.0 })
            .collect();
        let pol = Arbitrary::from_moments(-1.0, 1.0, order as i32, &moments).unwrap();
        let leg = Legendre::new(0);

        let mut got: Vec<f64> = pol.roots(4).collect::<Result<_>>().unwrap();
        got.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut expected: Vec<f64> = leg.roots(4).collect::<Result<_>>().unwrap();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-7, "{g} vs {e}");
        }
    }

    #[test]
    fn short_moment_array_rejected() {
        let moments = [2.0, 0.0, 2.0 / 3.0];
        assert!(matches!(
            Arbitrary::from_moments(-1.0, 1.0, 2, &moments),
            Err(Error::ArgumentOutOfRange(_))
        ));
    }

    #[test]
    fn christoffel_numbers_build_a_gauss_rule() {
        let pol = Arbitrary::from_weight(-1.0, 1.0, 4, |_| 1.0, 100).unwrap();
        let mesh = MeshGauss::new(3, &pol).unwrap();
        let got = crate::mesh::integrate(&mesh, |x| x * x);
        assert!((got - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn degree_beyond_order_rejected() {
        let pol = Arbitrary::from_weight(-1.0, 1.0, 2, |_| 1.0, 50).unwrap();
        assert!(pol.compute(0.0, 3).is_ok()); // order + 1 is reachable
        assert!(matches!(
            pol.compute(0.0, 4),
            Err(Error::ArgumentOutOfRange(_))
        ));
    }
}

/// Monic orthogonal polynomials determined by a weight function or its
/// moments, with the recurrence coefficients fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Arbitrary {
    /// Recurrence coefficients `a_i` (diagonal of the Jacobi matrix).
    coef_a: Array1<f64>,
    /// Recurrence coefficients `b_i` (`b_0` is unused and kept at zero).
    coef_b: Array1<f64>,
    /// `||p_0||^2 = int w(x) dx`.
    norm0: f64,
    left: f64,
    right: f64,
}

impl Arbitrary {
    /// Derives the recurrence coefficients up to `order` from the weight
    /// function, with inner products evaluated on an internal `weight_n`-point
    /// Gauss-Legendre mesh rescaled to `[left, right]`.
    pub fn from_weight<F>(left: f64, right: f64, order: i32, weight: F, weight_n: usize) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        if order < 0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "polynomial order must not be negative (order = {order})"
            )));
        }

        let mesh = MeshGauss::with_range(weight_n, &Legendre::new(0), left, right)?;

        let mut coef_a: Vec<f64> = Vec::with_capacity(order as usize + 1);
        let mut coef_b: Vec<f64> = Vec::with_capacity(order as usize + 1);
        let mut norm0 = 0.0;
        let mut pp_prev = 0.0;
        for i in 0..=order as usize {
            // <p_i, p_i> and <x p_i, p_i> against the weight
            let mut pp = 0.0;
            let mut xpp = 0.0;
            for node in mesh.nodes() {
                let p = eval(&coef_a, &coef_b, node.point, i).0;
                let val = p * p * weight(node.point) * node.weight * mesh.norm();
                pp += val;
                xpp += val * node.point;
            }

            coef_a.push(xpp / pp);
            coef_b.push(if i > 0 { pp / pp_prev } else { 0.0 });
            if i == 0 {
                norm0 = pp;
            }
            pp_prev = pp;
        }

        Ok(Self {
            coef_a: Array1::from(coef_a),
            coef_b: Array1::from(coef_b),
            norm0,
            left,
            right,
        })
    }

    /// Derives the recurrence coefficients up to `order` from the moments
    /// `M_k = int w(x) x^k dx`; at least `2 (order + 1)` moments are needed.
    pub fn from_moments(left: f64, right: f64, order: i32, moments: &[f64]) -> Result<Self> {
        if order < 0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "polynomial order must not be negative (order = {order})"
            )));
        }
        let order = order as usize;
        if moments.len() < 2 * (order + 1) {
            return Err(Error::ArgumentOutOfRange(format!(
                "{} moments are required for order {order} (got {})",
                2 * (order + 1),
                moments.len()
            )));
        }

        // triangular table of monomial coefficients, row i holding p_i
        let mut coef = vec![0.0; (order + 2) * (order + 3) / 2];
        coef[0] = 1.0;

        let mut coef_a: Vec<f64> = Vec::with_capacity(order + 1);
        let mut coef_b: Vec<f64> = Vec::with_capacity(order + 1);
        let mut norm0 = 0.0;
        let mut pp_prev = 0.0;
        for i in 0..=order {
            // <p_i, p_i> and <x p_i, p_i> from the moments
            let j1 = (i + 1) * i / 2;
            let mut pp = 0.0;
            let mut xpp = 0.0;
            for j in 0..=i {
                for k in 0..=i {
                    pp += coef[j1 + j] * coef[j1 + k] * moments[j + k];
                    xpp += coef[j1 + j] * coef[j1 + k] * moments[j + k + 1];
                }
            }

            coef_a.push(xpp / pp);
            coef_b.push(if i > 0 { pp / pp_prev } else { 0.0 });
            if i == 0 {
                norm0 = pp;
            }
            pp_prev = pp;

            // expand p_{i+1} = (x - a_i) p_i - b_i p_{i-1} in monomials
            let j0 = j1 - i;
            let j2 = j1 + i + 1;
            for j in 0..i {
                coef[j2 + j] = -coef_b[i] * coef[j0 + j];
            }
            for j in 0..=i {
                coef[j2 + j] += -coef_a[i] * coef[j1 + j];
                coef[j2 + j + 1] += coef[j1 + j];
            }
        }

        Ok(Self {
            coef_a: Array1::from(coef_a),
            coef_b: Array1::from(coef_b),
            norm0,
            left,
            right,
        })
    }
}

/// Runs the recurrence with the given (possibly partial) coefficient tables,
/// returning the value and derivative at degree `n`.
fn eval(coef_a: &[f64], coef_b: &[f64], x: f64, n: usize) -> (f64, f64) {
    let mut p1 = 0.0;
    let mut p2 = 1.0;
    let mut dp1 = 0.0;
    let mut dp2 = 0.0;
    for i in 0..n {
        let dpt = dp2;
        dp2 = p2 + (x - coef_a[i]) * dpt - coef_b[i] * dp1;
        dp1 = dpt;

        let pt = p2;
        p2 = (x - coef_a[i]) * pt - coef_b[i] * p1;
        p1 = pt;
    }
    (p2, dp2)
}

impl Polynomial for Arbitrary {
    fn left(&self) -> f64 {
        self.left
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn compute(&self, x: f64, n: i32) -> Result<Values<'_>> {
        if n < 0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "polynomial degree must not be negative (n = {n})"
            )));
        }
        if n as usize > self.coef_a.len() {
            return Err(Error::ArgumentOutOfRange(format!(
                "maximum degree of the constructed family exceeded ({n} > {})",
                self.coef_a.len()
            )));
        }

        let mut p1 = 0.0;
        let mut p2 = 1.0;
        let mut dp1 = 0.0;
        let mut dp2 = 0.0;
        let mut i = 0;
        let mut first = true;
        Ok(Box::new(std::iter::from_fn(move || {
            if first {
                first = false;
                return Some(PolyValue {
                    n: 0,
                    p: 1.0,
                    dp: 0.0,
                });
            }
            if i >= n {
                return None;
            }

            let dpt = dp2;
            dp2 = p2 + (x - self.coef_a[i as usize]) * dpt - self.coef_b[i as usize] * dp1;
            dp1 = dpt;

            let pt = p2;
            p2 = (x - self.coef_a[i as usize]) * pt - self.coef_b[i as usize] * p1;
            p1 = pt;

            i += 1;
            Some(PolyValue {
                n: i,
                p: p2,
                dp: dp2,
            })
        })))
    }

    fn norm(&self, n: i32) -> f64 {
        // ||p_n||^2 = b_n ||p_{n-1}||^2
        let mut res = self.norm0;
        for i in 1..=n {
            res *= self.coef_b[i as usize];
        }
        res
    }

    fn cristoffel(&self, x: f64, n: i32) -> Result<f64> {
        let p1 = self.compute_one(x, n + 1)?.p;
        let pp = self.compute_one(x, n)?.dp;
        Ok(-self.norm(n) / (p1 * pp))
    }

    fn roots(&self, n: i32) -> Roots<'_> {
        roots_from_result(roots_interlacing(self, self.left, self.right, n))
    }
}
