//! Field-present wrapper for partial updates.

use serde::{Deserialize, Deserializer};

/// A field in a partial-update request body.
///
/// Distinguishes a field that was omitted from one that was sent, so a value
/// like `0` or `""` is validated instead of silently skipped. Use with
/// `#[serde(default)]`:
///
/// ```
/// use serde::Deserialize;
/// use shopsphere_core::Patch;
///
/// #[derive(Deserialize)]
/// struct Body {
///     #[serde(default)]
///     rating: Patch<i64>,
/// }
///
/// let absent: Body = serde_json::from_str("{}").unwrap();
/// assert!(absent.rating.is_absent());
///
/// let zero: Body = serde_json::from_str(r#"{"rating": 0}"#).unwrap();
/// assert_eq!(zero.rating.into_option(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// The field was not in the request.
    #[default]
    Absent,
    /// The field was sent with this value.
    Present(T),
}

impl<T> Patch<T> {
    /// Whether the field was omitted.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Convert into an `Option`, losing nothing since absence is the only
    /// non-value state.
    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Absent => None,
            Self::Present(v) => Some(v),
        }
    }

    /// Validate or transform a present value, leaving absence untouched.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        match self {
            Self::Absent => Ok(Patch::Absent),
            Self::Present(v) => f(v).map(Patch::Present),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Present)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        title: Patch<String>,
        #[serde(default)]
        pros: Patch<Vec<String>>,
    }

    #[test]
    fn test_empty_string_is_present() {
        let body: Body = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(body.title, Patch::Present(String::new()));
        assert!(body.pros.is_absent());
    }

    #[test]
    fn test_try_map_skips_absent() {
        let patch: Patch<i64> = Patch::Absent;
        let mapped: Result<Patch<i64>, ()> = patch.try_map(|_| Err(()));
        assert_eq!(mapped, Ok(Patch::Absent));
    }

    #[test]
    fn test_try_map_validates_present() {
        let patch = Patch::Present(0_i64);
        let mapped = patch.try_map(|v| if v > 0 { Ok(v) } else { Err("zero") });
        assert_eq!(mapped, Err("zero"));
    }
}
