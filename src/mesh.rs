//! Quadrature meshes for the angular integrals of multipole coefficients.
//!
//! A mesh is a finite weighted node sequence approximating
//! `int_left^right f(x) dx ~ norm * sum w_i f(x_i)`. Two constructions:
//! composite Newton-Cotes rules on a homogeneous grid ([`MeshRect`]) and
//! Gauss-type rules built from the roots and Christoffel numbers of an
//! orthogonal polynomial family ([`MeshGauss`]). Node sequences are lazy
//! and restartable; the point and weight arrays are computed once at
//! construction.

use std::iter;

use ndarray::Array1;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::poly::Polynomial;


/// One quadrature node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshNode {
    /// Abscissa.
    pub point: f64,
    /// Weight, to be multiplied by the mesh normalization factor.
    pub weight: f64,
}

/// Lazy sequence of mesh nodes.
pub type Nodes<'a> = Box<dyn Iterator<Item = MeshNode> + 'a>;

/// An integration rule over a one-dimensional range.
pub trait Mesh {
    /// Left bound of the integration range.
    fn left(&self) -> f64;

    /// Right bound of the integration range.
    fn right(&self) -> f64;

    /// Normalization factor applied to the weighted sum.
    fn norm(&self) -> f64;

    /// Iterates over the nodes of the rule.
    fn nodes(&self) -> Nodes<'_>;
}

/// Approximates `int f dx` over the mesh range.
pub fn integrate<F>(mesh: &dyn Mesh, f: F) -> f64
where
    F: Fn(f64) -> f64,
{
    mesh.norm()
        * mesh
            .nodes()
            .map(|nd| nd.weight * f(nd.point))
            .sum::<f64>()
}

/// Composite Newton-Cotes rule subtype.
///
/// Each rule is exact for polynomials of its panel degree; the total node
/// count must be `order * k + 1` panels worth of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectRule {
    /// Panel weights `1 1`, exact for linear functions.
    Trapezoidal,
    /// Panel weights `1 4 1`, exact for cubics.
    Simpson,
    /// Panel weights `1 3 3 1`, exact for cubics with smaller error constant.
    Simpson38,
}

impl RectRule {
    fn order(self) -> usize {
        match self {
            RectRule::Trapezoidal => 1,
            RectRule::Simpson => 2,
            RectRule::Simpson38 => 3,
        }
    }

    fn weights(self) -> &'static [f64] {
        match self {
            RectRule::Trapezoidal => &[1.0, 1.0],
            RectRule::Simpson => &[1.0, 4.0, 1.0],
            RectRule::Simpson38 => &[1.0, 3.0, 3.0, 1.0],
        }
    }

    fn norm(self, h: f64) -> f64 {
        match self {
            RectRule::Trapezoidal => h / 2.0,
            RectRule::Simpson => h / 3.0,
            RectRule::Simpson38 => 3.0 * h / 8.0,
        }
    }
}

/// Composite Newton-Cotes rule on a homogeneous grid.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRect {
    count: usize,
    left: f64,
    right: f64,
    norm: f64,
    rule: RectRule,
}

impl MeshRect {
    /// Builds a rule with `count` homogeneously distributed nodes.
    ///
    /// `count - 1` must be a multiple of the rule order so the panels tile
    /// the range exactly; anything else is an unsatisfiable configuration.
    pub fn new(count: usize, left: f64, right: f64, rule: RectRule) -> Result<Self> {
        if count < 2 {
            return Err(Error::MeshConfig(format!(
                "at least two integration points are required (count = {count})"
            )));
        }
        if (count - 1) % rule.order() != 0 {
            return Err(Error::MeshConfig(format!(
                "the number of integration points must be {} * k + 1 (count = {count})",
                rule.order()
            )));
        }

        let h = (right - left) / (count - 1) as f64;
        Ok(Self {
            count,
            left,
            right,
            norm: rule.norm(h),
            rule,
        })
    }
}

impl Mesh for MeshRect {
    fn left(&self) -> f64 {
        self.left
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn norm(&self) -> f64 {
        self.norm
    }

    fn nodes(&self) -> Nodes<'_> {
        let h = (self.right - self.left) / (self.count - 1) as f64;
        let t_last = self.count - 1;
        let weights = self.rule.weights();
        let w_last = weights.len() - 1;

        let mut point = self.left;
        let mut i = 0usize;
        let mut j = 1usize;
        Box::new(iter::from_fn(move || {
            if i == 0 {
                i = 1;
                return Some(MeshNode {
                    point,
                    weight: weights[0],
                });
            }
            if i > t_last {
                return None;
            }
            point += h;
            // at a panel junction the closing and opening weights merge
            let weight = if j == w_last && i != t_last {
                weights[0] + weights[w_last]
            } else {
                weights[j]
            };
            i += 1;
            j = if j == w_last { 1 } else { j + 1 };
            Some(MeshNode { point, weight })
        }))
    }
}

/// Gauss-type rule: nodes are the roots of an orthogonal polynomial, weights
/// its Christoffel numbers, exact for polynomials of degree `2n - 1` against
/// the family's weight function.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGauss {
    points: Array1<f64>,
    weights: Array1<f64>,
    left: f64,
    right: f64,
    norm: f64,
}

impl MeshGauss {
    /// Builds a `count`-point rule on the polynomial's native interval.
    pub fn new(count: usize, pol: &dyn Polynomial) -> Result<Self> {
        if count == 0 {
            return Err(Error::MeshConfig(
                "a Gauss rule needs at least one integration point".into(),
            ));
        }

        let points: Vec<f64> = pol.roots(count as i32).collect::<Result<_>>()?;
        let mut weights = Vec::with_capacity(points.len());
        for &x in &points {
            weights.push(pol.cristoffel(x, count as i32)?);
        }

        Ok(Self {
            points: Array1::from(points),
            weights: Array1::from(weights),
            left: pol.left(),
            right: pol.right(),
            norm: 1.0,
        })
    }

    /// Builds a `count`-point rule rescaled from the polynomial's native
    /// interval to `[left, right]` by a linear map.
    ///
    /// When the native interval is unbounded, or the scale factor fails to
    /// be finite, the mesh is left on the native interval.
    pub fn with_range(count: usize, pol: &dyn Polynomial, left: f64, right: f64) -> Result<Self> {
        let mut mesh = Self::new(count, pol)?;

        let native = pol.right() - pol.left();
        let h = (right - left) / native;
        if native.is_finite() && h.is_finite() {
            let shift = pol.left();
            mesh.points.mapv_inplace(|p| (p - shift) * h + left);
            mesh.norm = h;
            mesh.left = left;
            mesh.right = right;
        }
        Ok(mesh)
    }

    /// Quadrature abscissas.
    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    /// Quadrature weights (Christoffel numbers, possibly rescaled).
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }
}

impl Mesh for MeshGauss {
    fn left(&self) -> f64 {
        self.left
    }

    fn right(&self) -> f64 {
        self.right
    }

    fn norm(&self) -> f64 {
        self.norm
    }

    fn nodes(&self) -> Nodes<'_> {
        Box::new(
            self.points
                .iter()
                .zip(self.weights.iter())
                .map(|(&point, &weight)| MeshNode { point, weight }),
        )
    }
}
