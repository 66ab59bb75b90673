//! NURBS curve built on the knot vector engine.

use cst_core::{KnotError, Result, Validate};
use cst_math::{Point3, Vector3, DVec3};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::nurbs::{
    change_rational_nurbs_end_weights, clamp_knot_vector, evaluate, evaluate_with_derivative,
    insert_knot, reparameterize_rational_nurbs, unclamp, ControlPoints, KnotEnd, KnotVector, Side,
};

/// A (possibly rational) NURBS curve: a valid knot vector and a matching
/// control point array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NurbsCurveParts")]
pub struct NurbsCurve {
    knots: KnotVector,
    cvs: ControlPoints,
}

#[derive(Deserialize)]
struct NurbsCurveParts {
    knots: KnotVector,
    cvs: ControlPoints,
}

impl TryFrom<NurbsCurveParts> for NurbsCurve {
    type Error = KnotError;

    fn try_from(parts: NurbsCurveParts) -> Result<Self> {
        Self::new(parts.knots, parts.cvs)
    }
}

impl NurbsCurve {
    pub fn new(knots: KnotVector, cvs: ControlPoints) -> Result<Self> {
        if cvs.count() != knots.cv_count() {
            return Err(KnotError::CvCountMismatch {
                expected: knots.cv_count(),
                found: cvs.count(),
            });
        }
        knots.validate()?;
        Ok(Self { knots, cvs })
    }

    /// Non-rational curve on a clamped uniform knot vector with unit spacing.
    pub fn from_points(order: usize, points: &[Point3]) -> Result<Self> {
        let knots = KnotVector::clamped_uniform(order, points.len(), 1.0)?;
        Self::new(knots, ControlPoints::from_points(points))
    }

    /// Rational curve on a clamped uniform knot vector with unit spacing.
    pub fn from_weighted_points(order: usize, points: &[Point3], weights: &[f64]) -> Result<Self> {
        let knots = KnotVector::clamped_uniform(order, points.len(), 1.0)?;
        Self::new(knots, ControlPoints::from_weighted_points(points, weights)?)
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn cvs(&self) -> &ControlPoints {
        &self.cvs
    }

    pub fn order(&self) -> usize {
        self.knots.order()
    }

    pub fn is_rational(&self) -> bool {
        self.cvs.is_rational()
    }

    /// See [`insert_knot`].
    pub fn insert_knot(&mut self, value: f64, multiplicity: usize) -> Result<usize> {
        insert_knot(&mut self.knots, &mut self.cvs, value, multiplicity, None)
    }

    pub fn clamp(&mut self, end: KnotEnd) -> Result<()> {
        clamp_knot_vector(&mut self.knots, &mut self.cvs, end)
    }

    /// A copy of this curve with unclamped end knots.
    pub fn unclamp(&self, end: KnotEnd) -> Result<Self> {
        let unclamped = unclamp(&self.knots, &self.cvs, end)?;
        Ok(Self {
            knots: unclamped.knots,
            cvs: unclamped.cvs,
        })
    }

    /// Reverse the direction; the domain `(t0, t1)` becomes `(-t1, -t0)`.
    pub fn reverse(&mut self) {
        self.knots.reverse();
        self.cvs.reverse();
    }

    pub fn set_domain(&mut self, t0: f64, t1: f64) -> Result<()> {
        self.knots.set_domain(t0, t1)
    }

    /// Möbius reparameterization of a rational curve, see [`reparameterize_rational_nurbs`].
    pub fn reparameterize(&mut self, c: f64) -> Result<()> {
        reparameterize_rational_nurbs(&mut self.knots, &mut self.cvs, c)
    }

    pub fn change_end_weights(&mut self, w0: f64, w1: f64) -> Result<()> {
        change_rational_nurbs_end_weights(&mut self.knots, &mut self.cvs, w0, w1)
    }

    fn split(&self, h: &[f64]) -> (DVec3, f64) {
        let dim = self.cvs.dim();
        let mut p = DVec3::ZERO;
        for (axis, value) in h.iter().take(dim.min(3)).enumerate() {
            p[axis] = *value;
        }
        let w = if self.is_rational() { h[dim] } else { 1.0 };
        (p, w)
    }
}

impl Curve for NurbsCurve {
    /// NaN when the curve has no Euclidean point at `t` (zero weight).
    fn point_at(&self, t: f64) -> Point3 {
        match evaluate(&self.knots, &self.cvs, t, Side::Above, None) {
            Ok(h) => {
                let (a, w) = self.split(&h);
                if w == 0.0 {
                    Point3::NAN
                } else {
                    a / w
                }
            }
            Err(_) => Point3::NAN,
        }
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        match evaluate_with_derivative(&self.knots, &self.cvs, t, Side::Above, None) {
            Ok((h, dh)) => {
                let (a, w) = self.split(&h);
                let (da, dw) = self.split(&dh);
                let dw = if self.is_rational() { dw } else { 0.0 };
                if w == 0.0 {
                    da
                } else {
                    let c = a / w;
                    (da - dw * c) / w
                }
            }
            Err(_) => Vector3::NAN,
        }
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain()
    }

    fn is_closed(&self) -> bool {
        if self.knots.is_periodic() {
            return true;
        }
        let (t0, t1) = self.domain();
        let a = self.point_at(t0);
        let b = self.point_at(t1);
        let scale = a.abs().max_element().max(b.abs().max_element()).max(1.0);
        a.abs_diff_eq(b, self.knots.tolerance().relative * scale)
    }
}
