use std::ops::Range;
use std::sync::Arc;

/// Cumulative item heights: `sums[0] == 0`, `sums[i + 1] == sums[i] + height[i]`.
///
/// The table is immutable once built. A new height list produces a new table,
/// so clones handed to other readers never observe a partial rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixSumTable {
    sums: Arc<[f64]>,
}

impl Default for PrefixSumTable {
    fn default() -> Self {
        Self::build(&[])
    }
}

impl PrefixSumTable {
    /// Negative and non-finite heights count as zero.
    #[must_use]
    pub fn build(item_heights: &[f64]) -> Self {
        let mut sums = Vec::with_capacity(item_heights.len() + 1);
        let mut total = 0.0;
        sums.push(total);
        for &height in item_heights {
            total += normalize_height(height);
            sums.push(total);
        }
        Self { sums: sums.into() }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.sums
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.sums.len().saturating_sub(1)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.sums.last().copied().unwrap_or(0.0)
    }

    /// Offset of the top edge of `index`, if it exists.
    #[must_use]
    pub fn item_offset(&self, index: usize) -> Option<f64> {
        (index < self.item_count()).then(|| self.sums[index])
    }

    /// Index `i` with `sums[i] <= position < sums[i + 1]`.
    ///
    /// `position` is clamped into `[0, total - EPSILON]`, so anything past the
    /// end resolves to the last item. Returns `None` for an empty table and
    /// `Some(0)` when every item has zero height. Runs in `O(log n)`.
    #[must_use]
    pub fn locate(&self, position: f64) -> Option<usize> {
        let item_count = self.item_count();
        if item_count == 0 {
            return None;
        }

        let total_height = self.total_height();
        if total_height <= 0.0 {
            return Some(0);
        }

        let position = clamp(position, 0.0, total_height - f64::EPSILON);
        let index = self.sums[1..].partition_point(|&end| end <= position);
        Some(index.min(item_count - 1))
    }

    /// Items that must be materialized for a viewport scrolled to `scroll_top`.
    ///
    /// `scroll_top` is clamped into `[0, max(0, total - viewport_height)]`,
    /// then the strictly visible range is widened by `overscan` items on both
    /// sides and clamped to the item bounds.
    #[must_use]
    pub fn query_visible(&self, viewport_height: f64, overscan: f64, scroll_top: f64) -> VisibleRange {
        let item_count = self.item_count();
        if item_count == 0 {
            return VisibleRange::EMPTY;
        }

        let total_height = self.total_height();
        let viewport_height = viewport_height.max(0.0);
        let overscan = normalize_overscan(overscan);
        let max_scroll_top = (total_height - viewport_height).max(0.0);
        let scroll_top = clamp(scroll_top, 0.0, max_scroll_top);

        let first = self.locate(scroll_top).unwrap_or(0);
        let viewport_bottom = scroll_top + (viewport_height - f64::EPSILON).max(0.0);
        let last = self.locate(viewport_bottom).unwrap_or(first);

        VisibleRange {
            start: first.saturating_sub(overscan),
            end: last.saturating_add(overscan).min(item_count - 1) + 1,
        }
    }
}

/// Half-open index range `start..end` of items to materialize.
///
/// The empty range (`0..0`) stands for "nothing to render".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub start: usize,
    pub end: usize,
}

impl VisibleRange {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn first_index(self) -> Option<usize> {
        (!self.is_empty()).then_some(self.start)
    }

    /// Inclusive last index; `None` for the empty range.
    #[must_use]
    pub fn last_index(self) -> Option<usize> {
        (!self.is_empty()).then(|| self.end - 1)
    }

    #[must_use]
    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        self.as_range().contains(&index)
    }
}

fn normalize_height(height: f64) -> f64 {
    if height.is_finite() { height.max(0.0) } else { 0.0 }
}

fn normalize_overscan(overscan: f64) -> usize {
    if !overscan.is_finite() || overscan <= 0.0 {
        return 0;
    }
    overscan.floor() as usize
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}
