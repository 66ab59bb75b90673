//! Clamped, periodic, uniform, and Bezier-span classification.

use cst_core::Validate;
use serde::{Deserialize, Serialize};

use super::greville::minimum_cv_count;
use super::knot::KnotVector;

/// Which end(s) of a knot vector an operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnotEnd {
    Start,
    End,
    #[default]
    Both,
}

impl KnotEnd {
    /// `0` = start, `1` = end, `2` = both.
    pub fn from_raw(end: i32) -> Option<Self> {
        match end {
            0 => Some(KnotEnd::Start),
            1 => Some(KnotEnd::End),
            2 => Some(KnotEnd::Both),
            _ => None,
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            KnotEnd::Start => 0,
            KnotEnd::End => 1,
            KnotEnd::Both => 2,
        }
    }

    pub fn includes_start(self) -> bool {
        matches!(self, KnotEnd::Start | KnotEnd::Both)
    }

    pub fn includes_end(self) -> bool {
        matches!(self, KnotEnd::End | KnotEnd::Both)
    }
}

/// Classification of a knot vector's spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnotStyle {
    /// Invalid knot vector.
    Unknown,
    /// Unclamped with constant spacing.
    Uniform,
    /// Clamped ends with uniform interior spacing.
    QuasiUniform,
    /// Clamped, every interior knot has multiplicity `order - 1`.
    PiecewiseBezier,
    /// Clamped, otherwise irregular.
    ClampedEnd,
    NonUniform,
}

impl KnotStyle {
    pub fn to_raw(self) -> i32 {
        match self {
            KnotStyle::Unknown => 0,
            KnotStyle::Uniform => 1,
            KnotStyle::QuasiUniform => 2,
            KnotStyle::PiecewiseBezier => 3,
            KnotStyle::ClampedEnd => 4,
            KnotStyle::NonUniform => 5,
        }
    }

    pub fn from_raw(style: i32) -> Self {
        match style {
            1 => KnotStyle::Uniform,
            2 => KnotStyle::QuasiUniform,
            3 => KnotStyle::PiecewiseBezier,
            4 => KnotStyle::ClampedEnd,
            5 => KnotStyle::NonUniform,
            _ => KnotStyle::Unknown,
        }
    }
}

impl KnotVector {
    /// Whether the `order - 1` knots at the requested end(s) coincide.
    pub fn is_clamped(&self, end: KnotEnd) -> bool {
        let outer = self.order() - 2;
        let start = !end.includes_start() || (0..outer).all(|j| self.coincide(j));
        let finish = !end.includes_end()
            || (self.cv_count() - 1..self.knot_count() - 1).all(|j| self.coincide(j));
        start && finish
    }

    /// Whether the knot spacing wraps around the domain.
    ///
    /// Order 2 vectors are never periodic by convention.
    pub fn is_periodic(&self) -> bool {
        let order = self.order();
        if order < 3 || self.cv_count() < minimum_cv_count(order, true) {
            return false;
        }
        let k = self.knots();
        let p = self.cv_count() - order + 1;
        let tol = self.domain_tolerance();
        (1..=2 * order - 4).all(|i| ((k[i] - k[0]) - (k[i + p] - k[p])).abs() <= tol)
    }

    /// Whether the knots are equally spaced.
    ///
    /// For clamped vectors only the interior spacing is tested.
    pub fn is_uniform(&self) -> bool {
        let k = self.knots();
        let order = self.order();
        let delta = k[order - 1] - k[order - 2];
        if delta <= 0.0 {
            return false;
        }
        let (i0, i1) = if self.is_clamped(KnotEnd::Both) {
            (order, self.cv_count())
        } else {
            (1, self.knot_count())
        };
        let tol = self.tolerance();
        (i0..i1).all(|i| tol.relative_eq(k[i] - k[i - 1], delta, delta))
    }

    /// Whether the vector is clamped and every span is a Bezier span.
    pub fn has_bezier_spans(&self) -> bool {
        let full = self.order() - 1;
        let mut clusters = 0;
        let mut i = 0;
        while i < self.knot_count() {
            let (lo, hi) = self.cluster(i);
            if hi - lo + 1 != full {
                return false;
            }
            clusters += 1;
            i = hi + 1;
        }
        clusters >= 2
    }

    pub fn style(&self) -> KnotStyle {
        if !self.is_valid() {
            return KnotStyle::Unknown;
        }
        if self.is_clamped(KnotEnd::Both) {
            if self.cv_count() == self.order() {
                KnotStyle::PiecewiseBezier
            } else if self.is_uniform() {
                KnotStyle::QuasiUniform
            } else if self.has_bezier_spans() {
                KnotStyle::PiecewiseBezier
            } else {
                KnotStyle::ClampedEnd
            }
        } else if self.is_uniform() {
            KnotStyle::Uniform
        } else {
            KnotStyle::NonUniform
        }
    }
}
