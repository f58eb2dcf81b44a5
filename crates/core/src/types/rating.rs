//! Star rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Rating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The value is outside the 1-5 star range.
    #[error("rating must be between {min} and {max} (got {got})")]
    OutOfRange {
        /// Smallest allowed rating.
        min: i32,
        /// Largest allowed rating.
        max: i32,
        /// The rejected value.
        got: i64,
    },
}

/// A review rating of one to five stars.
///
/// ```
/// use shopsphere_core::Rating;
///
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: i32 = 1;
    /// Highest allowed rating.
    pub const MAX: i32 = 5;

    /// Validate a star count.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` unless `1 <= value <= 5`.
    pub fn new(value: i64) -> Result<Self, RatingError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (1..=5).contains(v))
            .map(Self)
            .ok_or(RatingError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                got: value,
            })
    }

    /// The star count as an integer.
    #[must_use]
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    /// All ratings, highest first.
    #[must_use]
    pub fn all_descending() -> [Self; 5] {
        [Self(5), Self(4), Self(3), Self(2), Self(1)]
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.get()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().get(), i32::try_from(value).unwrap());
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        for value in [-1, 0, 6, 255, 256, i64::MAX] {
            assert!(matches!(
                Rating::new(value),
                Err(RatingError::OutOfRange { got, .. }) if got == value
            ));
        }
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert_eq!(serde_json::to_string(&Rating::new(3).unwrap()).unwrap(), "3");
    }
}
