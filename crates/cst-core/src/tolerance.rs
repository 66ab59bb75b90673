/// Tolerance settings for knot and parameter comparisons.
///
/// Knot values are compared relative to the magnitude of the values involved,
/// with an absolute floor so that comparisons near zero stay meaningful.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Relative factor applied to the scale of the compared values
    pub relative: f64,
    /// Smallest tolerance ever returned for two distinct values
    pub absolute: f64,
}

impl Tolerance {
    /// Square root of the double precision machine epsilon.
    pub const DEFAULT_RELATIVE: f64 = 1.490116119384765625e-8;
    pub const DEFAULT_ABSOLUTE: f64 = f64::EPSILON;

    pub fn new(relative: f64, absolute: f64) -> Self {
        Self { relative, absolute }
    }

    pub fn default_precision() -> Self {
        Self {
            relative: Self::DEFAULT_RELATIVE,
            absolute: Self::DEFAULT_ABSOLUTE,
        }
    }

    pub fn loose() -> Self {
        Self {
            relative: 1e-6,
            absolute: 1e-12,
        }
    }

    pub fn tight() -> Self {
        Self {
            relative: 1e-12,
            absolute: f64::EPSILON,
        }
    }

    /// Tolerance for comparing parameters in the interval spanned by `a` and `b`.
    ///
    /// Returns 0 when `a == b`.
    pub fn domain_tolerance(self, a: f64, b: f64) -> f64 {
        if a == b {
            return 0.0;
        }
        let tol = (a.abs() + b.abs() + (a - b).abs()) * self.relative;
        tol.max(self.absolute)
    }

    /// Check if two parameter values coincide within the domain tolerance.
    pub fn param_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.domain_tolerance(a, b)
    }

    /// Check if `value` differs from `reference` by at most `relative * scale`.
    pub fn relative_eq(self, value: f64, reference: f64, scale: f64) -> bool {
        (value - reference).abs() <= self.relative * scale.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
