pub mod focus;
pub mod scale;
pub mod types;
pub mod windowing;

pub use focus::{
    FocusFitOptions, FocusKey, KeywordRegionOfInterest, RegionOfInterest, compute_focused_view,
    find_focus_range,
};
pub use scale::{DEFAULT_MIN_SPAN_WIDTH, DomainScale, drawable_width};
pub use types::{
    BackingSize, FocusRange, GenomeDataset, GenomeFeature, GenomeTrack, LogicalSize,
    PhysicalViewport, ViewState,
};
pub use windowing::{PrefixSumTable, VisibleRange};
