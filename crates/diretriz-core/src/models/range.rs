// ABOUTME: Closed numeric range used by every prescription field
// ABOUTME: Serialized as a two-element [lo, hi] array, with (0, 0) as the unset sentinel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pair `(lo, hi)` with `lo <= hi`
///
/// `(0, 0)` is the sentinel for "unset": such ranges never participate in
/// narrowing and behave as the identity element of intersection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Range {
    /// Lower bound (inclusive)
    pub lo: f64,
    /// Upper bound (inclusive)
    pub hi: f64,
}

impl Range {
    /// The unset sentinel
    pub const UNSET: Self = Self { lo: 0.0, hi: 0.0 };

    /// Create a range from its bounds
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Whether this is the `(0, 0)` sentinel
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.lo == 0.0 && self.hi == 0.0
    }

    /// Whether the bounds are finite, non-negative and ordered
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo >= 0.0 && self.lo <= self.hi
    }

    /// Intersection of two ranges, `None` when they do not overlap
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Self { lo, hi })
    }

    /// Whether `other` lies entirely inside this range
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }
}

impl From<(f64, f64)> for Range {
    fn from((lo, hi): (f64, f64)) -> Self {
        Self { lo, hi }
    }
}

impl From<Range> for (f64, f64) {
    fn from(range: Range) -> Self {
        (range.lo, range.hi)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", format_number(self.lo), format_number(self.hi))
    }
}

/// Format a number without a trailing `.0` when it is integral
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
