mod config;
mod dataset_json;
mod render_surface;
mod resize;
mod view_state_owner;
mod virtual_list;

pub use config::{DEFAULT_OVERSCAN, DEFAULT_PADDING_X, ViewportConfig};
pub use render_surface::{DrawCallback, RenderOutcome, RenderStats, RenderSurface};
pub use resize::{ManualSizeObserver, ObserverGuard, ResizeTrigger, SizeObserver};
pub use view_state_owner::{
    CallbackViewState, ExternalViewState, SharedViewStore, ViewStateListener, ViewStateSource,
};
pub use virtual_list::{ScrollEvent, VisibleRangeTracker};
