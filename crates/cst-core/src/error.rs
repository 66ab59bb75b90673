use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnotError {
    #[error("Invalid order {order}: order must be >= 2")]
    InvalidOrder { order: usize },

    #[error("Invalid control point count {cv_count} for order {order}: need at least {minimum}")]
    InvalidCvCount {
        order: usize,
        cv_count: usize,
        minimum: usize,
    },

    #[error("Knot count mismatch: expected {expected}, got {found}")]
    KnotCountMismatch { expected: usize, found: usize },

    #[error("knot[{index}]={value} is not a finite number")]
    NonFiniteKnot { index: usize, value: f64 },

    #[error("knot[{index}]={prev} > knot[{next_index}]={next} (knots must be non-decreasing)", next_index = .index + 1)]
    Decreasing { index: usize, prev: f64, next: f64 },

    #[error("knot[{index}]={value} has multiplicity {multiplicity} > {max}")]
    MultiplicityExceeded {
        index: usize,
        value: f64,
        multiplicity: usize,
        max: usize,
    },

    #[error("Empty {end} span: knot[{index}]={value} coincides with its neighbor")]
    EmptyEndSpan {
        end: &'static str,
        index: usize,
        value: f64,
    },

    #[error("Invalid knot spacing {0}: spacing must be finite and > 0")]
    InvalidSpacing(f64),

    #[error("Invalid domain ({0}, {1})")]
    InvalidDomain(f64, f64),

    #[error("Parameter {t} is outside the domain ({t0}, {t1})")]
    OutsideDomain { t: f64, t0: f64, t1: f64 },

    #[error("Invalid control point layout: {0}")]
    InvalidLayout(String),

    #[error("Control point count mismatch: knot vector expects {expected}, array has {found}")]
    CvCountMismatch { expected: usize, found: usize },

    #[error("Invalid knot multiplicity {multiplicity}: must be in 1..={max}")]
    InvalidMultiplicity { multiplicity: usize, max: usize },

    #[error("Invalid reparameterization constant {0}: must be finite and > 0")]
    InvalidReparameterization(f64),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Operation requires rational control points")]
    NotRational,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, KnotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decreasing_message_names_both_knots() {
        let err = KnotError::Decreasing {
            index: 3,
            prev: 2.0,
            next: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "knot[3]=2 > knot[4]=1.5 (knots must be non-decreasing)"
        );
    }
}
