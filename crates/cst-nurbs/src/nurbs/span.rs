//! Span counting and span index lookup.

use super::knot::KnotVector;

/// Which span to pick when a parameter lies on a knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Evaluate from below: the span ending at the knot.
    Below,
    /// Evaluate from above: the span starting at the knot.
    #[default]
    Above,
}

impl Side {
    /// `side < 0` means below, `0` and positive values mean above.
    pub fn from_raw(side: i32) -> Self {
        if side < 0 {
            Side::Below
        } else {
            Side::Above
        }
    }
}

/// Result of advancing a span index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextSpan {
    /// The input was below the valid range; start at span 0.
    First,
    /// Index of the next non-empty span.
    Next(usize),
    /// The input already named the last span, which is returned unchanged.
    Last(usize),
    /// The input was above the valid range.
    OutOfRange,
}

impl NextSpan {
    pub fn index(self) -> Option<usize> {
        match self {
            NextSpan::First => Some(0),
            NextSpan::Next(i) | NextSpan::Last(i) => Some(i),
            NextSpan::OutOfRange => None,
        }
    }

    /// Integer form: `0`, the span index, or `-1` above the range.
    pub fn to_raw(self) -> i32 {
        match self {
            NextSpan::First => 0,
            NextSpan::Next(i) | NextSpan::Last(i) => i as i32,
            NextSpan::OutOfRange => -1,
        }
    }
}

impl KnotVector {
    /// Number of non-empty spans in the domain.
    pub fn span_count(&self) -> usize {
        (self.order() - 2..self.cv_count() - 1)
            .filter(|&j| !self.coincide(j))
            .count()
    }

    /// Distinct breakpoints of the domain, `span_count() + 1` values.
    pub fn span_vector(&self) -> Vec<f64> {
        let k = self.knots();
        let start = self.order() - 2;
        let mut breakpoints = Vec::with_capacity(self.span_count() + 1);
        breakpoints.push(k[start]);
        for j in start..self.cv_count() - 1 {
            if !self.coincide(j) {
                breakpoints.push(k[j + 1]);
            }
        }
        breakpoints
    }

    /// Index of the span used to evaluate at `t`.
    ///
    /// The returned `i` is in `0..=cv_count-order`; knots
    /// `knot[i..i+2*order-2]` and control points `cv[i..i+order]` support the
    /// span. Parameters outside the domain map to the first or last span.
    /// `hint`, typically the span of a previous evaluation, only speeds up
    /// the search.
    ///
    /// At an interior knot of multiplicity `m`, [`Side::Below`] and
    /// [`Side::Above`] return indices `m` apart: both name non-empty spans,
    /// so they are adjacent in the order of non-empty spans and differ by
    /// exactly 1 only for a simple knot.
    pub fn span_index(&self, t: f64, side: Side, hint: Option<usize>) -> usize {
        let tol = self.tolerance();
        // breakpoints of the domain, d[0] = knot[order-2]
        let d = &self.knots()[self.order() - 2..self.cv_count()];
        let last = d.len() - 2;
        let starts = &d[..=last];

        let count = match hint.filter(|&h| h <= last) {
            Some(h) if d[h] <= t => h + starts[h..].partition_point(|&k| k <= t),
            Some(h) => starts[..h].partition_point(|&k| k <= t),
            None => starts.partition_point(|&k| k <= t),
        };
        let mut j = count.saturating_sub(1);

        match side {
            Side::Below => {
                while j > 0 && tol.param_eq(d[j], t) {
                    j -= 1;
                }
            }
            Side::Above => {
                while j < last && tol.param_eq(d[j + 1], t) {
                    j += 1;
                }
            }
        }
        j
    }

    /// Advance `span_index` to the next non-empty span.
    pub fn next_span_index(&self, span_index: i32) -> NextSpan {
        if span_index < 0 {
            return NextSpan::First;
        }
        let last = self.cv_count() - self.order();
        let i = span_index as usize;
        if i > last {
            return NextSpan::OutOfRange;
        }
        if i == last {
            return NextSpan::Last(last);
        }
        let mut j = i + 1;
        while j < last && self.coincide(j + self.order() - 2) {
            j += 1;
        }
        NextSpan::Next(j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn double_knot() -> KnotVector {
        // cubic, double knot at 2
        KnotVector::new(4, 7, vec![0.0, 0.0, 0.0, 1.0, 2.0, 2.0, 3.0, 3.0, 3.0]).unwrap()
    }

    #[test]
    fn test_span_count() {
        assert_eq!(double_knot().span_count(), 3);
        let bezier = KnotVector::new(4, 4, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(bezier.span_count(), 1);
    }

    #[test]
    fn test_span_vector() {
        assert_eq!(double_knot().span_vector(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_span_index_interior() {
        let kv = double_knot();
        assert_eq!(kv.span_index(0.5, Side::Above, None), 0);
        assert_eq!(kv.span_index(1.5, Side::Above, None), 1);
        assert_eq!(kv.span_index(2.5, Side::Above, None), 3);
    }

    #[test]
    fn test_span_index_side_at_double_knot() {
        let kv = double_knot();
        assert_eq!(kv.span_index(2.0, Side::Above, None), 3);
        assert_eq!(kv.span_index(2.0, Side::Below, None), 1);
        assert_eq!(kv.span_index(1.0, Side::Above, None), 1);
        assert_eq!(kv.span_index(1.0, Side::Below, None), 0);
    }

    #[test]
    fn test_span_index_outside_domain() {
        let kv = double_knot();
        assert_eq!(kv.span_index(-5.0, Side::Above, None), 0);
        assert_eq!(kv.span_index(0.0, Side::Below, None), 0);
        assert_eq!(kv.span_index(3.0, Side::Above, None), 3);
        assert_eq!(kv.span_index(10.0, Side::Below, None), 3);
    }

    #[test]
    fn test_span_index_hint_does_not_change_result() {
        let kv = double_knot();
        for &t in &[-1.0, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 4.0] {
            for side in [Side::Below, Side::Above] {
                let expected = kv.span_index(t, side, None);
                for hint in 0..6 {
                    assert_eq!(kv.span_index(t, side, Some(hint)), expected, "t={t} hint={hint}");
                }
            }
        }
    }

    #[test]
    fn test_next_span_index() {
        let kv = double_knot();
        assert_eq!(kv.next_span_index(-3), NextSpan::First);
        assert_eq!(kv.next_span_index(0), NextSpan::Next(1));
        // span 2 is empty
        assert_eq!(kv.next_span_index(1), NextSpan::Next(3));
        assert_eq!(kv.next_span_index(3), NextSpan::Last(3));
        assert_eq!(kv.next_span_index(4), NextSpan::OutOfRange);
        assert_eq!(kv.next_span_index(4).to_raw(), -1);
        assert_eq!(kv.next_span_index(3).to_raw(), 3);
        assert_eq!(kv.next_span_index(-1).to_raw(), 0);
    }

    #[test]
    fn test_side_from_raw() {
        assert_eq!(Side::from_raw(-1), Side::Below);
        assert_eq!(Side::from_raw(0), Side::Above);
        assert_eq!(Side::from_raw(1), Side::Above);
    }
}
