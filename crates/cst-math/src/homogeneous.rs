//! Homogeneous (rational) point conversions.
//!
//! A rational control point `P` with weight `w` is stored as `(w*P, w)`.

use crate::{DVec4, Point3};

/// Convert a Euclidean point and weight to homogeneous form `(w*x, w*y, w*z, w)`.
pub fn homogenize(point: Point3, weight: f64) -> DVec4 {
    (point * weight).extend(weight)
}

/// Convert a homogeneous point back to Euclidean space.
///
/// Returns `None` when the weight is zero, which has no Euclidean image.
pub fn dehomogenize(h: DVec4) -> Option<Point3> {
    if h.w == 0.0 {
        None
    } else {
        Some(h.truncate() / h.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::dvec3;

    #[test]
    fn test_homogenize_scales_coordinates() {
        let h = homogenize(dvec3(1.0, -2.0, 3.0), 0.5);
        assert_eq!(h, DVec4::new(0.5, -1.0, 1.5, 0.5));
    }

    #[test]
    fn test_dehomogenize_inverts_homogenize() {
        let p = dvec3(0.25, 4.0, -1.0);
        let back = dehomogenize(homogenize(p, 3.0)).unwrap();
        assert_relative_eq!(back.x, p.x);
        assert_relative_eq!(back.y, p.y);
        assert_relative_eq!(back.z, p.z);
    }

    #[test]
    fn test_zero_weight_has_no_image() {
        assert!(dehomogenize(DVec4::new(1.0, 1.0, 1.0, 0.0)).is_none());
    }
}
