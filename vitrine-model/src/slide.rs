use std::fmt;
use std::num::NonZeroU32;

use crate::error::{ModelError, Result};

/// Number of slides in a collection. Fixed for a session and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct SlideCount(NonZeroU32);

impl SlideCount {
    pub fn new(total: u32) -> Option<Self> {
        NonZeroU32::new(total).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub fn first(self) -> SlideNumber {
        SlideNumber(1)
    }

    pub fn last(self) -> SlideNumber {
        SlideNumber(self.get())
    }

    pub fn contains(self, slide: SlideNumber) -> bool {
        slide.0 <= self.get()
    }

    /// Every slide of the collection in display order.
    pub fn iter(self) -> impl Iterator<Item = SlideNumber> {
        (1..=self.get()).map(SlideNumber)
    }
}

impl TryFrom<u32> for SlideCount {
    type Error = ModelError;

    fn try_from(total: u32) -> Result<Self> {
        Self::new(total).ok_or(ModelError::EmptyCollection)
    }
}

impl From<SlideCount> for u32 {
    fn from(count: SlideCount) -> Self {
        count.get()
    }
}

impl fmt::Display for SlideCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One-based slide number. Slide `0` does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SlideNumber(u32);

impl SlideNumber {
    pub const FIRST: SlideNumber = SlideNumber(1);

    /// Returns `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// Clamps an arbitrary integer into `1..=total`.
    pub fn clamped(value: i64, total: SlideCount) -> Self {
        Self(value.clamp(1, i64::from(total.get())) as u32)
    }

    /// Interprets externally supplied text (a query parameter, a CLI
    /// argument) as a slide number. Text without a leading integer maps to
    /// the first slide; out-of-range values are clamped.
    pub fn parse_clamped(raw: Option<&str>, total: SlideCount) -> Self {
        match raw.and_then(parse_leading_int) {
            Some(value) => Self::clamped(value, total),
            None => Self::FIRST,
        }
    }

    /// Moves `delta` slides, wrapping past either end of the collection.
    pub fn offset(self, delta: i64, total: SlideCount) -> Self {
        let total = i64::from(total.get());
        // Both terms stay below `total`, so the sum cannot overflow.
        let zero_based =
            (i64::from(self.0) - 1 + delta.rem_euclid(total)).rem_euclid(total);
        Self((zero_based + 1) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SlideNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for SlideNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SlideNumber> for u32 {
    fn from(slide: SlideNumber) -> Self {
        slide.0
    }
}

/// Visible position counter, rendered as `"<index> / <total>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCounter {
    pub current: SlideNumber,
    pub total: SlideCount,
}

impl SlideCounter {
    pub fn new(current: SlideNumber, total: SlideCount) -> Self {
        Self { current, total }
    }
}

impl fmt::Display for SlideCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.current, self.total)
    }
}

/// Reads the leading base-10 integer of `raw`.
///
/// Leading whitespace is skipped and an optional sign is accepted; parsing
/// stops at the first non-digit, so `"17abc"` is `17` and `"3.9"` is `3`.
/// Returns `None` when no digit follows. Values beyond `i64` saturate.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let run: &str = {
        let end = digits
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };

    if run.is_empty() {
        return None;
    }

    let magnitude = run.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}
