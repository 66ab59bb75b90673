//! Control point arrays paired with a knot vector.

use cst_core::{KnotError, Result};
use cst_math::{dehomogenize, homogenize, DVec4, Point3};
use serde::{Deserialize, Serialize};

/// A flat array of control points.
///
/// Each control point occupies `stride` values of which the first `cv_dim()`
/// are used. Rational control points are stored homogeneously: the weight is
/// the last used coordinate and the others are pre-multiplied by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControlPointsParts")]
pub struct ControlPoints {
    dim: usize,
    is_rational: bool,
    stride: usize,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct ControlPointsParts {
    dim: usize,
    is_rational: bool,
    stride: usize,
    data: Vec<f64>,
}

impl TryFrom<ControlPointsParts> for ControlPoints {
    type Error = KnotError;

    fn try_from(parts: ControlPointsParts) -> Result<Self> {
        Self::new(parts.dim, parts.is_rational, parts.stride, parts.data)
    }
}

impl ControlPoints {
    pub fn new(dim: usize, is_rational: bool, stride: usize, data: Vec<f64>) -> Result<Self> {
        if dim == 0 {
            return Err(KnotError::InvalidLayout("dimension must be >= 1".into()));
        }
        let cv_dim = dim + is_rational as usize;
        if stride < cv_dim {
            return Err(KnotError::InvalidLayout(format!(
                "stride {stride} is smaller than the control point size {cv_dim}"
            )));
        }
        if data.len() % stride != 0 {
            return Err(KnotError::InvalidLayout(format!(
                "{} values do not fill a whole number of control points of stride {stride}",
                data.len()
            )));
        }
        Ok(Self {
            dim,
            is_rational,
            stride,
            data,
        })
    }

    /// Non-rational 3-D control points.
    pub fn from_points(points: &[Point3]) -> Self {
        let data = points.iter().flat_map(|p| p.to_array()).collect();
        Self {
            dim: 3,
            is_rational: false,
            stride: 3,
            data,
        }
    }

    /// Rational 3-D control points from Euclidean locations and weights.
    pub fn from_weighted_points(points: &[Point3], weights: &[f64]) -> Result<Self> {
        if points.len() != weights.len() {
            return Err(KnotError::CvCountMismatch {
                expected: points.len(),
                found: weights.len(),
            });
        }
        if let Some((i, w)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite() || **w == 0.0) {
            return Err(KnotError::InvalidWeight(format!("weight[{i}]={w}")));
        }
        let data = points
            .iter()
            .zip(weights)
            .flat_map(|(p, &w)| homogenize(*p, w).to_array())
            .collect();
        Ok(Self {
            dim: 3,
            is_rational: true,
            stride: 4,
            data,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_rational(&self) -> bool {
        self.is_rational
    }

    /// Number of used values per control point.
    pub fn cv_dim(&self) -> usize {
        self.dim + self.is_rational as usize
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn count(&self) -> usize {
        self.data.len() / self.stride
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// The used values of control point `i`.
    pub fn cv(&self, i: usize) -> Option<&[f64]> {
        let start = i.checked_mul(self.stride)?;
        self.data.get(start..start + self.cv_dim())
    }

    pub(crate) fn cv_mut(&mut self, i: usize) -> Option<&mut [f64]> {
        let start = i.checked_mul(self.stride)?;
        let cv_dim = self.cv_dim();
        self.data.get_mut(start..start + cv_dim)
    }

    /// Weight of control point `i`; 1 for non-rational arrays.
    pub fn weight(&self, i: usize) -> Option<f64> {
        let cv = self.cv(i)?;
        Some(if self.is_rational { cv[self.dim] } else { 1.0 })
    }

    /// Euclidean location of control point `i`, padded or truncated to 3-D.
    ///
    /// `None` when out of range or when a rational weight is zero.
    pub fn point(&self, i: usize) -> Option<Point3> {
        let cv = self.cv(i)?;
        let mut h = DVec4::new(0.0, 0.0, 0.0, 1.0);
        for (axis, value) in cv.iter().take(self.dim.min(3)).enumerate() {
            h[axis] = *value;
        }
        if self.is_rational {
            h.w = cv[self.dim];
        }
        dehomogenize(h)
    }

    /// Multiply every used coordinate of control point `i` by `s`.
    ///
    /// For rational arrays this scales the weight without moving the point.
    pub fn scale_cv(&mut self, i: usize, s: f64) {
        if let Some(cv) = self.cv_mut(i) {
            for value in cv {
                *value *= s;
            }
        }
    }

    /// Set the weight of rational control point `i` to exactly `w`, keeping its location.
    pub(crate) fn set_weight(&mut self, i: usize, w: f64) {
        let dim = self.dim;
        if !self.is_rational {
            return;
        }
        if let Some(cv) = self.cv_mut(i) {
            let current = cv[dim];
            if current == w {
                return;
            }
            let s = w / current;
            for value in &mut cv[..dim] {
                *value *= s;
            }
            cv[dim] = w;
        }
    }

    /// Reverse the order of the control points.
    pub fn reverse(&mut self) {
        let n = self.count();
        for i in 0..n / 2 {
            let j = n - 1 - i;
            for c in 0..self.stride {
                self.data.swap(i * self.stride + c, j * self.stride + c);
            }
        }
    }

    /// Copy `len` consecutive control points starting at `start`, packed to `cv_dim`.
    pub(crate) fn gather(&self, start: usize, len: usize) -> Vec<f64> {
        let cv_dim = self.cv_dim();
        let mut packed = Vec::with_capacity(len * cv_dim);
        for i in start..start + len {
            if let Some(cv) = self.cv(i) {
                packed.extend_from_slice(cv);
            }
        }
        packed
    }

    /// Overwrite control point `i` with the first `cv_dim` values of `values`.
    pub(crate) fn set_cv(&mut self, i: usize, values: &[f64]) {
        if let Some(cv) = self.cv_mut(i) {
            cv.copy_from_slice(&values[..cv.len()]);
        }
    }

    /// Insert a control point before index `i`; unused stride slots are zeroed.
    pub(crate) fn insert_cv(&mut self, i: usize, values: &[f64]) {
        let cv_dim = self.cv_dim();
        let mut slot = vec![0.0; self.stride];
        slot[..cv_dim].copy_from_slice(&values[..cv_dim]);
        let at = i * self.stride;
        self.data.splice(at..at, slot);
    }
}
