// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time ranges and interval arithmetic.
//!
//! ## Invariants
//!
//! - A range covers `[begin, end)`: `begin` is included, `end` is not
//! - Ranges that only touch at an endpoint do not overlap
//! - Zero-length ranges overlap nothing, including themselves
//! - Subtraction never produces zero-length pieces

use crate::error::DomainError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open interval of time `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeRange {
    begin: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new `TimeRange` without validation.
    ///
    /// Callers are trusted to pass `begin <= end`. A reversed range behaves
    /// like an empty one: it overlaps nothing and has no pieces left after
    /// subtraction.
    #[must_use]
    pub const fn new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { begin, end }
    }

    /// Creates a new `TimeRange`, rejecting ranges that end before they begin.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` if `end < begin`.
    pub fn try_new(begin: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end < begin {
            return Err(DomainError::InvalidTimeRange { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// Returns the inclusive start of the range.
    #[must_use]
    pub const fn begin(&self) -> DateTime<Utc> {
        self.begin
    }

    /// Returns the exclusive end of the range.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the range. Reversed ranges report zero.
    #[must_use]
    pub fn duration(&self) -> Duration {
        if self.is_empty() {
            Duration::zero()
        } else {
            self.end - self.begin
        }
    }

    /// Whether the range covers no instant at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin >= self.end
    }

    /// Whether the two ranges share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self, other)
    }

    /// Whether `other` lies entirely within this range.
    ///
    /// An empty `other` is never contained.
    #[must_use]
    pub fn contains_range(&self, other: &Self) -> bool {
        !other.is_empty() && self.begin <= other.begin && other.end <= self.end
    }

    /// Extends the range by `before` at the start and `after` at the end.
    ///
    /// Saturates at the earliest and latest representable instants.
    #[must_use]
    pub fn buffered(&self, before: Duration, after: Duration) -> Self {
        Self {
            begin: self
                .begin
                .checked_sub_signed(before)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: self
                .end
                .checked_add_signed(after)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Shared part of two ranges, if any.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self {
            begin: self.begin.max(other.begin),
            end: self.end.min(other.end),
        })
    }

    /// Removes `other` from this range.
    ///
    /// Returns zero pieces when `other` covers the whole range, one piece
    /// when it clips one side (or misses entirely), and two pieces when it
    /// splits the range in the middle.
    #[must_use]
    pub fn subtract(&self, other: &Self) -> Vec<Self> {
        if self.is_empty() {
            return Vec::new();
        }
        if !self.overlaps(other) {
            return vec![*self];
        }

        let mut pieces: Vec<Self> = Vec::with_capacity(2);
        if self.begin < other.begin {
            pieces.push(Self::new(self.begin, other.begin));
        }
        if other.end < self.end {
            pieces.push(Self::new(other.end, self.end));
        }
        pieces
    }
}

/// Whether two half-open ranges share any instant.
///
/// `a.begin < b.end && b.begin < a.end`, so touching ranges do not overlap
/// and zero-length ranges never overlap anything.
#[must_use]
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    !a.is_empty() && !b.is_empty() && a.begin < b.end && b.begin < a.end
}

/// Removes every exclusion from every window.
///
/// The result is sorted by start time and does not depend on the order of
/// `exclusions`.
#[must_use]
pub fn subtract_all(windows: &[TimeRange], exclusions: &[TimeRange]) -> Vec<TimeRange> {
    let mut remaining: Vec<TimeRange> = windows.iter().filter(|w| !w.is_empty()).copied().collect();

    for exclusion in exclusions {
        if exclusion.is_empty() {
            continue;
        }
        remaining = remaining
            .iter()
            .flat_map(|window| window.subtract(exclusion))
            .collect();
    }

    remaining.sort();
    remaining
}

/// Sorts ranges and joins those that overlap or touch.
#[must_use]
pub fn merge_ranges(ranges: &[TimeRange]) -> Vec<TimeRange> {
    let mut sorted: Vec<TimeRange> = ranges.iter().filter(|r| !r.is_empty()).copied().collect();
    sorted.sort();

    let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if range.begin <= last.end => {
                last.end = last.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}
