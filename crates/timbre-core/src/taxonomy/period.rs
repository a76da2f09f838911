use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive window of release years.
///
/// A range whose `start` is after its `end` is valid but matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    /// Bounds of the year picker offered to users.
    pub const PICKER_BOUNDS: Self = Self::new(1990, 2019);

    /// Window a new session starts with.
    pub const DEFAULT: Self = Self::new(2015, 2017);

    #[must_use]
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Grow the range so that it includes `year`.
    #[must_use]
    pub fn including(self, year: i32) -> Self {
        Self {
            start: self.start.min(year),
            end: self.end.max(year),
        }
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
