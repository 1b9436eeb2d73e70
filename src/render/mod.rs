mod frame;
mod primitives;
mod recording;
mod track_painter;
mod transform_scope;

pub use frame::RenderFrame;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};
pub use recording::{DrawCommand, RecordingContext, RecordingSurface};
pub use track_painter::{GenomeTrackPainter, TrackPainterStyle};
pub use transform_scope::TransformScope;

use kurbo::Affine;

use crate::core::{BackingSize, PhysicalViewport, ViewState};
use crate::error::ViewportResult;
use crate::interaction::PointerId;

/// Contract implemented by anything that can paint a `RenderFrame`.
///
/// Frames are fully materialized and deterministic, so drawing code stays
/// isolated from dataset and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ViewportResult<()>;
}

/// Stateful 2D drawing context with a save/restore transform stack,
/// modelled after the HTML canvas context.
pub trait DrawingContext: Renderer {
    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops the most recently saved transform; a no-op on an empty stack.
    fn restore(&mut self);

    fn current_transform(&self) -> Affine;

    fn set_transform(&mut self, transform: Affine);

    /// Post-multiplies the current transform: later drawing goes through
    /// `current * transform`.
    fn transform(&mut self, transform: Affine);

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform(Affine::translate((dx, dy)));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(Affine::scale_non_uniform(sx, sy));
    }

    /// Clears a rectangle given in current user-space units.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Everything a draw callback needs to lay out one frame.
#[derive(Debug)]
pub struct RenderContext<'a, D> {
    pub data: Option<&'a D>,
    pub view_state: ViewState,
    pub viewport: PhysicalViewport,
}

impl<D> Clone for RenderContext<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for RenderContext<'_, D> {}

/// Immutable description of a surface handed to draw callbacks next to the
/// context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHandle {
    pub backing: BackingSize,
    pub device_pixel_ratio: f64,
}

/// Host drawing surface: a backing pixel buffer plus the context drawing
/// into it.
pub trait DrawingSurface {
    type Context: DrawingContext;

    /// Display density, `None` when the host cannot report it.
    fn device_pixel_ratio(&self) -> Option<f64>;

    fn backing_size(&self) -> BackingSize;

    /// Destructively resizes the backing buffer. Context state (transform
    /// stack included) does not survive a resize.
    fn resize_backing(&mut self, size: BackingSize) -> ViewportResult<()>;

    /// `None` when the surface cannot provide a 2D context.
    fn context_mut(&mut self) -> Option<&mut Self::Context>;

    fn set_pointer_capture(&mut self, _pointer: PointerId) {}

    fn release_pointer_capture(&mut self, _pointer: PointerId) {}
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContext, CairoRenderStats, CairoSurface};
