use kurbo::Affine;
use tracing::{debug, trace, warn};

use crate::core::{LogicalSize, PhysicalViewport, ViewState};
use crate::error::ViewportResult;
use crate::interaction::{
    self, EventDisposition, InteractionMode, PanGesture, PointerEvent, ScaleLimits, WheelEvent,
};
use crate::render::{
    DrawingContext, DrawingSurface, RenderContext, SurfaceHandle, TransformScope,
};

use super::config::ViewportConfig;
use super::resize::{ManualSizeObserver, ObserverGuard, SizeObserver};
use super::view_state_owner::{ExternalViewState, ViewStateSource};

/// Caller-supplied drawing routine, invoked once per render cycle.
pub type DrawCallback<C, D> =
    Box<dyn FnMut(&mut C, &SurfaceHandle, &RenderContext<'_, D>) -> ViewportResult<()>>;

/// Result of one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered,
    /// Nothing changed since the previous frame.
    Unchanged,
    /// Width or height is zero; waiting for a real measurement.
    SkippedUnmeasured,
    /// The surface cannot provide a drawing context.
    SkippedNoContext,
    /// The backing buffer could not be resized.
    SkippedBackend,
    /// The draw callback returned an error; the frame was abandoned.
    CallbackFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub callback_failures: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RenderKey {
    view_state: ViewState,
    size: LogicalSize,
    device_pixel_ratio: Option<f64>,
    data_revision: u64,
}

/// Output of the resize phase. Only the resize phase can create one, so the
/// draw phase cannot run before the backing buffer has its final size.
struct FramePlan {
    viewport: PhysicalViewport,
    handle: SurfaceHandle,
}

/// Binds a drawing surface to a view state and runs the pan/zoom loop.
///
/// All visual output is delegated to the draw callback. The view state is
/// either owned by the surface or by an external owner (see
/// [`ViewStateSource`]); in the latter case gestures only propose new states.
pub struct RenderSurface<S: DrawingSurface, D, O: SizeObserver = ManualSizeObserver> {
    surface: S,
    observer: ObserverGuard<O>,
    source: ViewStateSource,
    data: Option<D>,
    data_revision: u64,
    size: LogicalSize,
    limits: ScaleLimits,
    zoom_step: f64,
    wheel_zoom_sensitivity: f64,
    pan: PanGesture,
    reset_target: ViewState,
    draw: Option<DrawCallback<S::Context, D>>,
    last_rendered: Option<RenderKey>,
    stats: RenderStats,
}

impl<S: DrawingSurface, D, O: SizeObserver> RenderSurface<S, D, O> {
    /// Creates an uncontrolled surface seeded with the default view state.
    ///
    /// An invalid `config` is logged; unusable zoom step or wheel
    /// sensitivity values fall back to their defaults.
    pub fn new(surface: S, observer: O, config: &ViewportConfig) -> Self {
        if let Err(err) = config.validate() {
            warn!(error = %err, "invalid viewport config");
        }
        let defaults = ViewportConfig::default();
        Self {
            surface,
            observer: ObserverGuard::new(observer),
            source: ViewStateSource::default(),
            data: None,
            data_revision: 0,
            size: LogicalSize::default(),
            limits: config.scale_limits(),
            zoom_step: positive_or(config.zoom_step, defaults.zoom_step),
            wheel_zoom_sensitivity: positive_or(
                config.wheel_zoom_sensitivity,
                defaults.wheel_zoom_sensitivity,
            ),
            pan: PanGesture::default(),
            reset_target: ViewState::default(),
            draw: None,
            last_rendered: None,
            stats: RenderStats::default(),
        }
    }

    /// Seeds the internally owned state and makes it the target of
    /// [`reset_view`](Self::reset_view). In controlled mode only the reset
    /// target is kept.
    #[must_use]
    pub fn with_initial_view_state(mut self, initial: ViewState) -> Self {
        if let ViewStateSource::Internal { cell, .. } = &mut self.source {
            *cell = initial;
        }
        self.reset_target = initial;
        self
    }

    /// Switches to controlled mode: `owner` holds the state and receives
    /// every proposed change. A listener installed earlier is dropped.
    #[must_use]
    pub fn with_external_view_state(mut self, owner: impl ExternalViewState + 'static) -> Self {
        if self.source.has_listener() {
            debug!("dropping view state listener on switch to controlled mode");
        }
        self.source = ViewStateSource::external(owner);
        self
    }

    /// Notifies `listener` of every committed state. Only uncontrolled
    /// surfaces keep it, so call it after any `with_external_view_state`
    /// decision has been made.
    #[must_use]
    pub fn with_view_state_listener(mut self, listener: impl FnMut(ViewState) + 'static) -> Self {
        self.source.set_listener(Box::new(listener));
        self
    }

    #[must_use]
    pub fn with_draw_callback(
        mut self,
        draw: impl FnMut(&mut S::Context, &SurfaceHandle, &RenderContext<'_, D>) -> ViewportResult<()>
        + 'static,
    ) -> Self {
        self.draw = Some(Box::new(draw));
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self.data_revision += 1;
        self
    }

    pub fn set_draw_callback(
        &mut self,
        draw: impl FnMut(&mut S::Context, &SurfaceHandle, &RenderContext<'_, D>) -> ViewportResult<()>
        + 'static,
    ) -> RenderOutcome {
        self.draw = Some(Box::new(draw));
        self.last_rendered = None;
        self.request_render()
    }

    /// Replaces the dataset and re-renders.
    pub fn set_data(&mut self, data: Option<D>) -> RenderOutcome {
        self.data = data;
        self.data_revision += 1;
        debug!(
            revision = self.data_revision,
            has_data = self.data.is_some(),
            "render surface dataset replaced"
        );
        self.request_render()
    }

    #[must_use]
    pub fn data(&self) -> Option<&D> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.source.current()
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.source.is_controlled()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.pan.mode()
    }

    #[must_use]
    pub fn scale_limits(&self) -> ScaleLimits {
        self.limits
    }

    pub fn set_scale_limits(&mut self, min_scale: f64, max_scale: f64) {
        self.limits = ScaleLimits::new(min_scale, max_scale);
    }

    #[must_use]
    pub fn logical_size(&self) -> LogicalSize {
        self.size
    }

    #[must_use]
    pub fn physical_viewport(&self) -> PhysicalViewport {
        PhysicalViewport::new(self.size, self.surface.device_pixel_ratio())
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Direct access to the host surface, e.g. to change its pixel ratio.
    /// Call [`Self::request_render`] afterwards.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        self.observer.observer()
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Applies the latest size reported by the observer, if any.
    ///
    /// A resize only changes the physical viewport, never the view state.
    pub fn poll_resize(&mut self) -> RenderOutcome {
        let Some(size) = self.observer.take_size() else {
            return RenderOutcome::Unchanged;
        };
        if size != self.size {
            debug!(width = size.width, height = size.height, "render surface resized");
            self.size = size;
        }
        self.request_render()
    }

    pub fn on_pointer_down(&mut self, event: PointerEvent) -> EventDisposition {
        if !self.pan.on_pointer_down(event) {
            return EventDisposition::Ignored;
        }
        self.surface.set_pointer_capture(event.pointer_id);
        EventDisposition::Consumed
    }

    pub fn on_pointer_move(&mut self, event: PointerEvent) -> EventDisposition {
        let Some((dx, dy)) = self.pan.on_pointer_move(event.x, event.y) else {
            return EventDisposition::Ignored;
        };
        let next = interaction::pan(self.source.current(), dx, dy);
        self.commit(next);
        EventDisposition::Consumed
    }

    pub fn on_pointer_up(&mut self, _event: PointerEvent) -> EventDisposition {
        self.end_pan()
    }

    pub fn on_pointer_cancel(&mut self, _event: PointerEvent) -> EventDisposition {
        self.end_pan()
    }

    /// Cursor-anchored zoom. Always consumed: the host must suppress its
    /// default scroll handling for wheel events over the surface.
    pub fn on_wheel(&mut self, event: WheelEvent) -> EventDisposition {
        let next = interaction::wheel_zoom(
            self.source.current(),
            event.delta_y,
            event.pointer_x,
            self.limits,
            self.wheel_zoom_sensitivity,
        );
        self.commit(next);
        EventDisposition::Consumed
    }

    pub fn zoom_in(&mut self) -> RenderOutcome {
        let next = interaction::step_zoom(self.source.current(), self.zoom_step, self.limits);
        self.commit(next)
    }

    pub fn zoom_out(&mut self) -> RenderOutcome {
        let next = interaction::step_zoom(self.source.current(), 1.0 / self.zoom_step, self.limits);
        self.commit(next)
    }

    /// Returns to the seeded view, or the default view when none was seeded.
    pub fn reset_view(&mut self) -> RenderOutcome {
        self.commit(self.reset_target)
    }

    /// Commits (uncontrolled) or proposes (controlled) `next`, then
    /// re-renders if anything visible changed.
    pub fn commit(&mut self, next: ViewState) -> RenderOutcome {
        trace!(
            scale = next.scale,
            offset_x = next.offset_x,
            offset_y = next.offset_y,
            controlled = self.source.is_controlled(),
            "commit view state"
        );
        self.source.commit(next);
        self.request_render()
    }

    /// Renders when the view state, dataset, size or pixel ratio changed
    /// since the last frame.
    pub fn request_render(&mut self) -> RenderOutcome {
        if self.last_rendered == Some(self.render_key()) {
            return RenderOutcome::Unchanged;
        }
        self.render_frame()
    }

    /// Runs one full render cycle unconditionally.
    pub fn render_frame(&mut self) -> RenderOutcome {
        let key = self.render_key();
        let outcome = match self.resize_phase() {
            Ok(plan) => self.draw_phase(plan, key.view_state),
            Err(skipped) => skipped,
        };

        match outcome {
            RenderOutcome::Rendered => {
                self.stats.frames_rendered += 1;
                self.last_rendered = Some(key);
            }
            RenderOutcome::CallbackFailed => {
                self.stats.callback_failures += 1;
                self.last_rendered = Some(key);
            }
            _ => self.stats.frames_skipped += 1,
        }
        outcome
    }

    fn render_key(&self) -> RenderKey {
        RenderKey {
            view_state: self.source.current(),
            size: self.size,
            device_pixel_ratio: self.surface.device_pixel_ratio(),
            data_revision: self.data_revision,
        }
    }

    fn resize_phase(&mut self) -> Result<FramePlan, RenderOutcome> {
        if !self.size.is_measured() {
            trace!(
                width = self.size.width,
                height = self.size.height,
                "skip render: surface not measured"
            );
            return Err(RenderOutcome::SkippedUnmeasured);
        }
        if self.surface.context_mut().is_none() {
            trace!("skip render: no drawing context");
            return Err(RenderOutcome::SkippedNoContext);
        }

        let viewport = PhysicalViewport::new(self.size, self.surface.device_pixel_ratio());
        let backing = viewport.backing_size();
        if let Err(err) = self.surface.resize_backing(backing) {
            warn!(
                error = %err,
                width = backing.width,
                height = backing.height,
                "skip render: backing resize failed"
            );
            return Err(RenderOutcome::SkippedBackend);
        }

        Ok(FramePlan {
            viewport,
            handle: SurfaceHandle {
                backing,
                device_pixel_ratio: viewport.device_pixel_ratio,
            },
        })
    }

    fn draw_phase(&mut self, plan: FramePlan, view_state: ViewState) -> RenderOutcome {
        let Some(context) = self.surface.context_mut() else {
            return RenderOutcome::SkippedNoContext;
        };
        let viewport = plan.viewport;

        context.set_transform(Affine::scale(viewport.device_pixel_ratio));
        context.clear_rect(0.0, 0.0, viewport.width, viewport.height);

        let render = RenderContext {
            data: self.data.as_ref(),
            view_state,
            viewport,
        };

        let result = {
            let mut scope = TransformScope::new(context);
            scope.translate(view_state.offset_x, view_state.offset_y);
            scope.scale(view_state.scale, 1.0);
            match self.draw.as_mut() {
                Some(draw) => draw(&mut *scope, &plan.handle, &render),
                None => Ok(()),
            }
        };

        match result {
            Ok(()) => RenderOutcome::Rendered,
            Err(err) => {
                warn!(error = %err, "draw callback failed; frame abandoned");
                RenderOutcome::CallbackFailed
            }
        }
    }

    fn end_pan(&mut self) -> EventDisposition {
        match self.pan.on_pointer_up() {
            Some(pointer) => {
                self.surface.release_pointer_capture(pointer);
                EventDisposition::Consumed
            }
            None => EventDisposition::Ignored,
        }
    }
}

impl<S: DrawingSurface, D, O: SizeObserver> Drop for RenderSurface<S, D, O> {
    fn drop(&mut self) {
        if let Some(pointer) = self.pan.on_pointer_up() {
            self.surface.release_pointer_capture(pointer);
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
