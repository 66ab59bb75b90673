//! The knot vector engine: validity, span queries, classification, Greville
//! abscissae, and the operators that rewrite knots together with their
//! control points.

mod clamp;
mod classify;
mod construct;
mod cv;
mod deboor;
mod domain;
mod greville;
mod insert;
mod knot;
mod rational;
pub mod raw;
mod span;

pub use clamp::{clamp_knot_vector, unclamp, Unclamped};
pub use classify::{KnotEnd, KnotStyle};
pub use cv::ControlPoints;
pub use deboor::{basis_functions, basis_functions_derivs, evaluate, evaluate_with_derivative};
pub use greville::{greville_abscissa, minimum_cv_count};
pub use insert::insert_knot;
pub use knot::{knot_count, KnotVector};
pub use rational::{
    change_rational_bezier_weights, change_rational_nurbs_end_weights,
    reparameterize_rational_bezier, reparameterize_rational_nurbs,
};
pub use span::{NextSpan, Side};
