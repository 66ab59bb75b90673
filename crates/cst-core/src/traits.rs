use crate::error::Result;

/// Validate structural integrity of a geometric entity.
///
/// `Err` carries the first problem found as diagnostic text.
pub trait Validate {
    fn validate(&self) -> Result<()>;

    /// Boolean form of [`Validate::validate`].
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}
