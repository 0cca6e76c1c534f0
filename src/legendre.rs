//! Legendre polynomials of the first kind, including associated polynomials.
//!
//! Convention: `P_0(x) = 1`, `P_1(x) = x`, `P_2(x) = (3x^2 - 1)/2`, and for
//! the associated polynomials
//! `P_n^m(x) = (-1)^m (1 - x^2)^{m/2} d^m/dx^m P_n(x)`.
//!
//! Evaluation uses the three-term recurrence
//! `(n - m + 1) P^m_{n+1} = (2n + 1) x P^m_n - (n + m) P^m_{n-1}`,
//! seeded from the closed form of `P^{|m|}_{|m|}`. The derivative follows
//! `(x^2 - 1) P^m_n{}' = n x P^m_n - (n + m) P^m_{n-1}`; at the interval
//! ends with `m = 0` the closed-form limit `+-n(n+1)/2` replaces the
//! indeterminate quotient.

use std::f64::consts::PI;
use std::iter;

use crate::error::{Error, Result};
use crate::poly::{newton, PolyValue, Polynomial, Roots, Values};


/// (Associated) Legendre polynomials `P_n^m`, with the order `m` fixed at
/// construction; `m = 0` gives the plain Legendre polynomials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Legendre {
    /// Associated order.
    pub m: i32,
}

impl Legendre {
    pub fn new(m: i32) -> Self {
        Self { m }
    }
}

impl Polynomial for Legendre {
    fn left(&self) -> f64 {
        -1.0
    }

    fn right(&self) -> f64 {
        1.0
    }

    fn compute(&self, x: f64, n: i32) -> Result<Values<'_>> {
        if x.abs() > 1.0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "Legendre argument must lie in [-1, 1] (x = {x})"
            )));
        }
        if n < 0 {
            return Err(Error::ArgumentOutOfRange(format!(
                "polynomial degree must not be negative (n = {n})"
            )));
        }

        let m = self.m;
        let ml = m.abs();
        if ml > n {
            return Ok(Box::new(iter::empty()));
        }

        // seed P^m_{ml}; negative orders through the factorial prefactor
        let mut p1 = if m < 0 {
            let mut fact = 1.0;
            for j in 1..=2 * ml {
                fact *= j as f64;
            }
            if m % 2 == 0 {
                1.0 / fact
            } else {
                -1.0 / fact
            }
        } else {
            1.0
        };
        if ml > 0 {
            let y = (1.0 - x * x).sqrt();
            for j in 0..ml {
                p1 *= -((2 * j + 1) as f64) * y;
            }
        }

        let mut p2 = 0.0;
        let mut j = ml;
        Ok(Box::new(iter::from_fn(move || {
            if j > n {
                return None;
            }
            if j == ml {
                let dp = if ml == 0 {
                    0.0
                } else {
                    p1 * ml as f64 * x / (x * x - 1.0)
                };
                j += 1;
                return Some(PolyValue { n: ml, p: p1, dp });
            }

            let p3 = p2;
            p2 = p1;
            p1 = ((2 * j - 1) as f64 * x * p2 - (j - 1 + m) as f64 * p3) / (j - m) as f64;
            let dp = if x.abs() >= 1.0 && m == 0 {
                let sign = if j % 2 == 0 { x.signum() } else { 1.0 };
                sign * (j * (j + 1)) as f64 / 2.0
            } else {
                (j as f64 * x * p1 - (j + m) as f64 * p2) / (x * x - 1.0)
            };
            let val = PolyValue { n: j, p: p1, dp };
            j += 1;
            Some(val)
        })))
    }

    fn norm(&self, n: i32) -> f64 {
        let mut res = 2.0 / (2 * n + 1) as f64;
        if self.m != 0 {
            for i in (n - self.m + 1)..=(n + self.m) {
                res *= i as f64;
            }
        }
        res
    }

    fn cristoffel(&self, x: f64, n: i32) -> Result<f64> {
        let dp = self.compute_one(x, n)?.dp;
        Ok(2.0 / ((1.0 - x * x) * dp * dp))
    }

    fn roots(&self, n: i32) -> Roots<'_> {
        if self.m != 0 {
            return Box::new(iter::once(Err(Error::ArgumentOutOfRange(
                "root finding requires the plain polynomial (m = 0)".into(),
            ))));
        }

        // Newton iteration from the cosine first guess; roots come in
        // symmetric pairs, with a single middle root for odd degrees.
        let n2 = (n + 1) / 2;
        Box::new((1..=n2).flat_map(move |i| {
            let z0 = (PI * (i as f64 - 0.25) / (n as f64 + 0.5)).cos();
            match newton(self, z0, n, (i - 1) as usize) {
                Ok(z) => {
                    let mut pair = Vec::with_capacity(2);
                    if i - 1 != n - i {
                        pair.push(Ok(-z));
                    }
                    pair.push(Ok(z));
                    pair.into_iter()
                }
                Err(e) => vec![Err(e)].into_iter(),
            }
        }))
    }
}
