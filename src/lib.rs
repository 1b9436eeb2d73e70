//! genome-viewport: interactive pan/zoom viewport engine for linear genome
//! coordinates.
//!
//! The crate keeps a strict split between pure math (`core`), gesture state
//! (`interaction`), drawing contracts and backends (`render`) and the
//! stateful surface/list controllers hosts embed (`api`).

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{RenderSurface, ViewportConfig, VisibleRangeTracker};
pub use crate::core::{DomainScale, GenomeDataset, PrefixSumTable, ViewState, compute_focused_view};
pub use error::{ViewportError, ViewportResult};
