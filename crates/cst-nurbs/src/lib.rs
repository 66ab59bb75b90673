//! CSTEngine NURBS: knot vectors, control points, and the curves built on them.

pub mod curve;
pub mod nurbs;

pub use curve::{Curve, NurbsCurve};
pub use nurbs::{ControlPoints, KnotEnd, KnotStyle, KnotVector, Side};
