//! Greville abscissae and their inverse mapping.
//!
//! The Greville abscissa of control point `i` is the mean of the `order - 1`
//! knots `knot[i..i+order-1]`.

use cst_core::{KnotError, Result, Tolerance, Validate};
use nalgebra::{DMatrix, DVector};

use super::knot::{check_counts, knot_count, KnotVector};

/// Singular values below this are treated as zero when solving for knots.
const SINGULAR_EPS: f64 = 1e-12;

/// Fewest control points a knot vector of this order may have.
///
/// Periodic vectors alias their first `order - 1` control points, so they
/// need `2*order - 2` (and at least `order + 1`).
pub fn minimum_cv_count(order: usize, periodic: bool) -> usize {
    if periodic {
        (2 * order).saturating_sub(2).max(order + 1)
    } else {
        order
    }
}

/// Greville abscissa of the first `order - 1` values of `knots`.
///
/// The mean snaps to the first or last of those knots when it is within
/// tolerance of them. Returns `None` if `knots` is too short.
pub fn greville_abscissa(order: usize, knots: &[f64], tolerance: Tolerance) -> Option<f64> {
    if order < 2 || knots.len() < order - 1 {
        return None;
    }
    Some(abscissa(order, knots, tolerance))
}

fn abscissa(order: usize, knots: &[f64], tolerance: Tolerance) -> f64 {
    let k0 = knots[0];
    let k1 = knots[order - 2];
    if order == 2 || k0 == k1 {
        return k0;
    }
    let g = knots[..order - 1].iter().sum::<f64>() / (order - 1) as f64;
    let width = k1 - k0;
    if tolerance.relative_eq(g, k0, width) {
        k0
    } else if tolerance.relative_eq(g, k1, width) {
        k1
    } else {
        g
    }
}

fn check_abscissae(g: &[f64]) -> Result<()> {
    if let Some((i, &value)) = g.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(KnotError::InvalidOperation(format!(
            "greville abscissa g[{i}]={value} is not finite"
        )));
    }
    if let Some(i) = g.windows(2).position(|w| w[1] < w[0]) {
        return Err(KnotError::InvalidOperation(format!(
            "greville abscissae must be non-decreasing: g[{i}]={} > g[{}]={}",
            g[i],
            i + 1,
            g[i + 1]
        )));
    }
    Ok(())
}

fn solve_least_squares(a: DMatrix<f64>, b: DVector<f64>) -> Result<DVector<f64>> {
    a.svd(true, true)
        .solve(&b, SINGULAR_EPS)
        .map_err(|e| KnotError::InvalidOperation(format!("greville knot system: {e}")))
}

impl KnotVector {
    /// Number of Greville abscissae: one per control point, or one per free
    /// control point for periodic vectors.
    pub fn greville_abscissae_count(&self, periodic: bool) -> usize {
        if periodic {
            self.cv_count() - self.order() + 1
        } else {
            self.cv_count()
        }
    }

    pub fn greville_abscissae(&self, periodic: bool) -> Vec<f64> {
        let tol = self.tolerance();
        (0..self.greville_abscissae_count(periodic))
            .map(|i| abscissa(self.order(), &self.knots()[i..], tol))
            .collect()
    }

    /// Index of the first control point whose Greville abscissa lies in the domain.
    ///
    /// For periodic vectors the result is in `0..=order-2`; the free control
    /// points starting there line up with increasing parameters across the
    /// domain. Non-periodic vectors have offset 0.
    pub fn greville_abscissa_offset(&self, periodic: bool) -> usize {
        if !periodic {
            return 0;
        }
        let order = self.order();
        let (t0, _) = self.domain();
        let dtol = self.domain_tolerance();
        let tol = self.tolerance();
        (0..=order - 2)
            .find(|&i| abscissa(order, &self.knots()[i..], tol) >= t0 - dtol)
            .unwrap_or(order - 2)
    }

    /// Clamped knot vector whose Greville abscissae are `g` (one per control point).
    ///
    /// The end knots are fixed at `g[0]` and `g[last]`; interior knots are the
    /// least-squares solution of the averaging equations, which is exact when
    /// `g` came from a clamped knot vector.
    pub fn from_greville_abscissae(order: usize, g: &[f64]) -> Result<Self> {
        let cv_count = g.len();
        check_counts(order, cv_count)?;
        check_abscissae(g)?;

        let d = order - 1;
        let n = knot_count(order, cv_count);
        let unknowns = cv_count - order;
        let mut knots = vec![g[0]; n];
        for k in &mut knots[n - d..] {
            *k = g[cv_count - 1];
        }

        if unknowns > 0 {
            let rows = cv_count - 2;
            let mut a = DMatrix::zeros(rows, unknowns);
            let mut b = DVector::zeros(rows);
            for (r, i) in (1..cv_count - 1).enumerate() {
                let mut rhs = d as f64 * g[i];
                for j in i..i + d {
                    if (d..d + unknowns).contains(&j) {
                        a[(r, j - d)] = 1.0;
                    } else {
                        rhs -= knots[j];
                    }
                }
                b[r] = rhs;
            }
            let x = solve_least_squares(a, b)?;
            knots[d..d + unknowns].copy_from_slice(x.as_slice());
        }

        let kv = Self::from_parts(order, cv_count, knots);
        kv.validate()?;
        Ok(kv)
    }

    /// Periodic knot vector whose first `g.len()` Greville abscissae are `g`.
    ///
    /// `period` is the domain length. The knots wrap with that period; when the
    /// averaging equations are singular the solution closest to uniform
    /// spacing is returned.
    pub fn from_periodic_greville_abscissae(order: usize, g: &[f64], period: f64) -> Result<Self> {
        if order < 3 {
            return Err(KnotError::InvalidOperation(format!(
                "periodic knot vectors need order >= 3, got {order}"
            )));
        }
        let p = g.len();
        let cv_count = p + order - 1;
        check_counts(order, cv_count)?;
        let minimum = minimum_cv_count(order, true);
        if cv_count < minimum {
            return Err(KnotError::InvalidCvCount {
                order,
                cv_count,
                minimum,
            });
        }
        check_abscissae(g)?;
        if !(period.is_finite() && period > 0.0) {
            return Err(KnotError::InvalidSpacing(period));
        }

        let d = order - 1;
        let delta = period / p as f64;
        let base = g[0] - 0.5 * (d - 1) as f64 * delta;
        let uniform: Vec<f64> = (0..p).map(|j| base + j as f64 * delta).collect();

        // unknowns are knot[0..p] relative to uniform spacing;
        // knot[j] = x[j % p] + (j / p) * period
        let mut a = DMatrix::zeros(p, p);
        let mut b = DVector::zeros(p);
        for i in 0..p {
            let mut rhs = d as f64 * g[i];
            for j in i..i + d {
                let col = j % p;
                a[(i, col)] += 1.0;
                rhs -= (j / p) as f64 * period + uniform[col];
            }
            b[i] = rhs;
        }
        let y = solve_least_squares(a, b)?;

        let knots = (0..knot_count(order, cv_count))
            .map(|j| uniform[j % p] + y[j % p] + (j / p) as f64 * period)
            .collect();
        let kv = Self::from_parts(order, cv_count, knots);
        kv.validate()?;
        Ok(kv)
    }
}
