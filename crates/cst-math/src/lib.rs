pub mod homogeneous;

pub use glam::{DVec3, DVec4};
pub use homogeneous::{dehomogenize, homogenize};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
