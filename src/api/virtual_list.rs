use tracing::{debug, trace};

use crate::core::{PrefixSumTable, VisibleRange};

use super::config::DEFAULT_OVERSCAN;

/// Scroll notification from a host list container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub scroll_top: f64,
}

impl ScrollEvent {
    #[must_use]
    pub const fn new(scroll_top: f64) -> Self {
        Self { scroll_top }
    }
}

/// Keeps the materialized range of a virtualized list in sync with scroll
/// position, viewport height and item heights.
///
/// The prefix-sum table is rebuilt only when the height list actually
/// changes; every scroll event is answered in `O(log n)`.
#[derive(Debug, Clone)]
pub struct VisibleRangeTracker {
    heights: Vec<f64>,
    table: PrefixSumTable,
    viewport_height: f64,
    overscan: usize,
    scroll_top: f64,
    visible: VisibleRange,
}

impl Default for VisibleRangeTracker {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_OVERSCAN)
    }
}

impl VisibleRangeTracker {
    #[must_use]
    pub fn new(viewport_height: f64, overscan: usize) -> Self {
        Self {
            heights: Vec::new(),
            table: PrefixSumTable::default(),
            viewport_height,
            overscan,
            scroll_top: 0.0,
            visible: VisibleRange::EMPTY,
        }
    }

    #[must_use]
    pub fn with_item_heights(mut self, heights: &[f64]) -> Self {
        self.set_item_heights(heights);
        self
    }

    /// Replaces the item heights. Returns the (possibly unchanged) range.
    pub fn set_item_heights(&mut self, heights: &[f64]) -> VisibleRange {
        if self.heights.as_slice() != heights {
            self.heights = heights.to_vec();
            self.table = PrefixSumTable::build(heights);
            debug!(
                items = self.table.item_count(),
                total_height = self.table.total_height(),
                "rebuilt prefix sums"
            );
        }
        self.refresh()
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) -> VisibleRange {
        self.viewport_height = viewport_height;
        self.refresh()
    }

    pub fn set_overscan(&mut self, overscan: usize) -> VisibleRange {
        self.overscan = overscan;
        self.refresh()
    }

    pub fn on_scroll(&mut self, event: ScrollEvent) -> VisibleRange {
        self.set_scroll_top(event.scroll_top)
    }

    /// Records the raw scroll position; clamping happens at query time so a
    /// later height change can still reveal the requested offset.
    pub fn set_scroll_top(&mut self, scroll_top: f64) -> VisibleRange {
        self.scroll_top = scroll_top;
        self.refresh()
    }

    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        self.visible
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    #[must_use]
    pub fn total_height(&self) -> f64 {
        self.table.total_height()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.table.item_count()
    }

    /// Offset of `index`'s top edge, for absolutely positioning an item.
    #[must_use]
    pub fn item_offset(&self, index: usize) -> Option<f64> {
        self.table.item_offset(index)
    }

    #[must_use]
    pub fn find_index_by_position(&self, position: f64) -> Option<usize> {
        self.table.locate(position)
    }

    /// Shared snapshot of the current table.
    #[must_use]
    pub fn table(&self) -> &PrefixSumTable {
        &self.table
    }

    fn refresh(&mut self) -> VisibleRange {
        let next = self.table.query_visible(
            self.viewport_height,
            self.overscan as f64,
            self.scroll_top,
        );
        if next != self.visible {
            trace!(start = next.start, end = next.end, "visible range changed");
            self.visible = next;
        }
        next
    }
}
