//! Pagination parameters and paged results.

use serde::Serialize;

/// Default page size when the client sends none (or garbage).
pub const DEFAULT_LIMIT: u32 = 20;
/// Largest page a client may request.
pub const MAX_LIMIT: u32 = 100;

/// A clamped `(limit, offset)` window.
///
/// Only the leading integer of a query value counts and trailing junk is
/// ignored, so `35abc` means 35. A limit that is missing, zero or not a
/// number falls back to 20; an unreadable offset is 0. The result is
/// clamped: `limit` lands in `1..=100` and `offset` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// The leading optionally-signed integer of `value`, if there is one.
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let digits_start = usize::from(value.starts_with(['-', '+']));
    let digits_end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| digits_start + i);
    if digits_end == digits_start {
        return None;
    }
    // Saturate instead of failing on absurdly long inputs
    Some(value[..digits_end].parse::<i64>().unwrap_or(if value.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

impl Pagination {
    /// Build a window from raw query-string values.
    #[must_use]
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(leading_int)
            .filter(|&v| v != 0)
            .map_or(DEFAULT_LIMIT, |v| {
                u32::try_from(v.clamp(1, i64::from(MAX_LIMIT))).unwrap_or(DEFAULT_LIMIT)
            });
        let offset = offset
            .and_then(leading_int)
            .map_or(0, |v| u64::try_from(v.max(0)).unwrap_or(0));

        Self { limit, offset }
    }

    /// Apply the window to an in-memory, already-sorted sequence.
    pub fn slice<T>(self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        items
            .into_iter()
            .skip(usize::try_from(self.offset).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect()
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
