//! Half-open windows over a sequence

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

/// A half-open interval `[start, end)` of sequence positions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Window {
    /// First position covered
    pub start: usize,
    /// One past the last position covered
    pub end: usize,
}

impl Window {
    /// Create a new window
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "Window start must not exceed its end");
        Self { start, end }
    }

    /// Create a window, checking it against a sequence length
    pub fn checked(start: usize, end: usize, length: usize) -> Result<Self, SequenceError> {
        if start > end || end > length {
            return Err(SequenceError::WindowOutOfBounds { start, end, length });
        }
        Ok(Self { start, end })
    }

    /// Window covering a whole sequence of the given length
    pub fn full(length: usize) -> Self {
        Self {
            start: 0,
            end: length,
        }
    }

    /// Number of positions covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the window covers no position
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The window as a range, for slicing
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Check if a position lies inside the window
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    /// Check if two windows share at least one position
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if `other` lies entirely inside this window
    pub fn covers(&self, other: &Window) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The shared span of two windows, if non-empty
    pub fn overlap(&self, other: &Window) -> Option<Window> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then(|| Window { start, end })
    }

    /// Grow the window by `margin` on both sides, clipped to `[0, length)`
    pub fn expand(&self, margin: usize, length: usize) -> Window {
        Window {
            start: self.start.saturating_sub(margin).min(length),
            end: self.end.saturating_add(margin).min(length),
        }
    }

    /// Split into consecutive windows of at most `max_span` positions
    pub fn subdivide(&self, max_span: usize) -> Vec<Window> {
        assert!(max_span > 0, "Span must be positive");
        (self.start..self.end)
            .step_by(max_span)
            .map(|start| Window::new(start, (start + max_span).min(self.end)))
            .collect()
    }
}

/// Merge overlapping or touching windows into sorted disjoint runs
pub fn merge_windows(windows: &[Window]) -> Vec<Window> {
    let mut sorted = windows.to_vec();
    sorted.sort_unstable();

    let mut merged: Vec<Window> = Vec::with_capacity(sorted.len());
    for window in sorted {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => last.end = last.end.max(window.end),
            _ => merged.push(window),
        }
    }
    merged
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl From<Range<usize>> for Window {
    fn from(range: Range<usize>) -> Self {
        Window::new(range.start, range.end)
    }
}
