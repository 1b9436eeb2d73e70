use genome_viewport::api::{ScrollEvent, ViewportConfig, VisibleRangeTracker};
use genome_viewport::core::VisibleRange;

fn row_heights(count: usize) -> Vec<f64> {
    (0..count).map(|i| if i % 3 == 0 { 48.0 } else { 24.0 }).collect()
}

#[test]
fn tracker_uses_configured_overscan() {
    let config = ViewportConfig::default();
    let mut tracker = VisibleRangeTracker::new(15.0, config.overscan);

    let range = tracker.set_item_heights(&[10.0; 5]);
    assert_eq!(range.as_range(), 0..3);
}

#[test]
fn scrolling_advances_window() {
    let mut tracker = VisibleRangeTracker::new(100.0, 0).with_item_heights(&[20.0; 50]);

    assert_eq!(tracker.visible_range().as_range(), 0..5);
    assert_eq!(tracker.on_scroll(ScrollEvent::new(210.0)).as_range(), 10..16);
    assert_eq!(tracker.scroll_top(), 210.0);
}

#[test]
fn scroll_past_end_is_clamped_at_query_time() {
    let mut tracker = VisibleRangeTracker::new(100.0, 0).with_item_heights(&[20.0; 10]);

    let range = tracker.set_scroll_top(5_000.0);
    assert_eq!(range.as_range(), 5..10);
    assert_eq!(tracker.scroll_top(), 5_000.0);
}

#[test]
fn growing_list_reveals_previously_clamped_offset() {
    let mut tracker = VisibleRangeTracker::new(100.0, 0).with_item_heights(&[20.0; 10]);
    tracker.set_scroll_top(400.0);

    let range = tracker.set_item_heights(&[20.0; 40]);
    assert_eq!(range.as_range(), 20..25);
}

#[test]
fn viewport_and_overscan_changes_recompute() {
    let mut tracker = VisibleRangeTracker::new(100.0, 0).with_item_heights(&[20.0; 50]);
    tracker.set_scroll_top(200.0);

    assert_eq!(tracker.set_viewport_height(40.0).as_range(), 10..12);
    assert_eq!(tracker.set_overscan(2).as_range(), 8..14);
}

#[test]
fn variable_heights_resolve_positions() {
    let heights = row_heights(1_000);
    let tracker = VisibleRangeTracker::new(600.0, 1).with_item_heights(&heights);

    assert_eq!(tracker.item_count(), 1_000);
    assert_eq!(tracker.item_offset(3), Some(96.0));
    assert_eq!(tracker.find_index_by_position(96.0), Some(3));
    assert_eq!(tracker.find_index_by_position(95.9), Some(2));
    assert_eq!(tracker.total_height(), tracker.table().total_height());
}

#[test]
fn emptied_list_reports_empty_range() {
    let mut tracker = VisibleRangeTracker::new(100.0, 2).with_item_heights(&[30.0; 4]);
    assert!(!tracker.visible_range().is_empty());

    let range = tracker.set_item_heights(&[]);
    assert_eq!(range, VisibleRange::EMPTY);
    assert_eq!(tracker.find_index_by_position(0.0), None);
}
