use serde::{Deserialize, Serialize};

use crate::core::ViewState;

pub const DEFAULT_MIN_SCALE: f64 = 0.1;
pub const DEFAULT_MAX_SCALE: f64 = 50.0;
pub const DEFAULT_ZOOM_STEP: f64 = 1.2;
/// Exponential wheel sensitivity: one unit of `delta_y` scales by `exp(-k)`.
pub const DEFAULT_WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
    Other(u16),
}

/// Pointer sample in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    #[must_use]
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            pointer_id: PointerId(1),
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    #[must_use]
    pub fn with_pointer_id(mut self, pointer_id: PointerId) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Wheel sample; `pointer_x` is relative to the surface's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f64,
    pub pointer_x: f64,
}

impl WheelEvent {
    #[must_use]
    pub fn new(delta_y: f64, pointer_x: f64) -> Self {
        Self { delta_y, pointer_x }
    }
}

/// What the host should do with the platform's default handling of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// The engine consumed the event; suppress default behavior (page scroll).
    Consumed,
    Ignored,
}

/// Inclusive `[min, max]` bounds for engine-driven scale changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    min: f64,
    max: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
    }
}

impl ScaleLimits {
    /// Bounds given in the wrong order are swapped rather than rejected.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    /// Clamps into the limits; NaN maps to `min`.
    #[must_use]
    pub fn clamp(self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min;
        }
        scale.max(self.min).min(self.max)
    }

    #[must_use]
    pub fn contains(self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

/// Pan gesture state machine: `Idle -> Panning` on primary pointer-down,
/// back to `Idle` on pointer-up or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    mode: InteractionMode,
    pointer_id: Option<PointerId>,
    last_x: f64,
    last_y: f64,
}

impl Default for PanGesture {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            pointer_id: None,
            last_x: 0.0,
            last_y: 0.0,
        }
    }
}

impl PanGesture {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    /// Pointer currently captured by the gesture.
    #[must_use]
    pub fn captured_pointer(self) -> Option<PointerId> {
        self.pointer_id
    }

    /// Returns `true` when the event starts a pan.
    pub fn on_pointer_down(&mut self, event: PointerEvent) -> bool {
        if event.button != PointerButton::Primary || !event.x.is_finite() || !event.y.is_finite() {
            return false;
        }
        self.mode = InteractionMode::Panning;
        self.pointer_id = Some(event.pointer_id);
        self.last_x = event.x;
        self.last_y = event.y;
        true
    }

    /// Returns `(dx, dy)` since the previous recorded position while panning.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.mode != InteractionMode::Panning || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let delta = (x - self.last_x, y - self.last_y);
        self.last_x = x;
        self.last_y = y;
        Some(delta)
    }

    /// Ends the pan and returns the pointer whose capture must be released.
    pub fn on_pointer_up(&mut self) -> Option<PointerId> {
        if self.mode != InteractionMode::Panning {
            return None;
        }
        self.mode = InteractionMode::Idle;
        self.pointer_id.take()
    }
}

/// Applies a pan delta.
#[must_use]
pub fn pan(view: ViewState, dx: f64, dy: f64) -> ViewState {
    view.translated(dx, dy)
}

/// Cursor-anchored wheel zoom.
///
/// The domain point under `pointer_x` stays under it:
/// `(pointer_x - next.offset_x) / next.scale == (pointer_x - view.offset_x) / view.scale`.
/// Non-finite inputs leave the view unchanged.
#[must_use]
pub fn wheel_zoom(
    view: ViewState,
    delta_y: f64,
    pointer_x: f64,
    limits: ScaleLimits,
    sensitivity: f64,
) -> ViewState {
    if !delta_y.is_finite() || !pointer_x.is_finite() || !sensitivity.is_finite() {
        return view;
    }
    let next_scale = limits.clamp(current_scale(view, limits) * (-delta_y * sensitivity).exp());
    zoom_around(view, next_scale, pointer_x, limits)
}

/// Re-scales so the domain point under `anchor_x` stays fixed.
#[must_use]
pub fn zoom_around(view: ViewState, next_scale: f64, anchor_x: f64, limits: ScaleLimits) -> ViewState {
    let scale = current_scale(view, limits);
    let next_scale = limits.clamp(next_scale);
    let anchored_domain_px = (anchor_x - view.offset_x) / scale;
    ViewState {
        scale: next_scale,
        offset_x: anchor_x - anchored_domain_px * next_scale,
        offset_y: view.offset_y,
    }
}

/// Button-driven zoom: multiplies the scale by `factor` and clamps.
///
/// Offsets are left untouched.
#[must_use]
pub fn step_zoom(view: ViewState, factor: f64, limits: ScaleLimits) -> ViewState {
    if !factor.is_finite() || factor <= 0.0 {
        return view;
    }
    view.with_scale(limits.clamp(current_scale(view, limits) * factor))
}

fn current_scale(view: ViewState, limits: ScaleLimits) -> f64 {
    if view.scale.is_finite() && view.scale > 0.0 {
        view.scale
    } else {
        limits.clamp(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        InteractionMode, PanGesture, PointerButton, PointerEvent, ScaleLimits, step_zoom,
        wheel_zoom,
    };
    use crate::core::ViewState;

    #[test]
    fn secondary_button_does_not_start_pan() {
        let mut gesture = PanGesture::default();
        let started =
            gesture.on_pointer_down(PointerEvent::primary(0.0, 0.0).with_button(PointerButton::Secondary));
        assert!(!started);
        assert_eq!(gesture.mode(), InteractionMode::Idle);
        assert_eq!(gesture.on_pointer_move(5.0, 5.0), None);
    }

    #[test]
    fn pan_deltas_are_relative_to_last_sample() {
        let mut gesture = PanGesture::default();
        assert!(gesture.on_pointer_down(PointerEvent::primary(10.0, 10.0)));
        assert_eq!(gesture.on_pointer_move(15.0, 8.0), Some((5.0, -2.0)));
        assert_eq!(gesture.on_pointer_move(20.0, 8.0), Some((5.0, 0.0)));
        assert!(gesture.on_pointer_up().is_some());
        assert_eq!(gesture.on_pointer_up(), None);
    }

    #[test]
    fn inverted_limits_are_swapped() {
        let limits = ScaleLimits::new(50.0, 0.1);
        assert_eq!(limits.min(), 0.1);
        assert_eq!(limits.max(), 50.0);
        assert_eq!(limits.clamp(f64::NAN), 0.1);
    }

    #[test]
    fn zero_wheel_delta_keeps_view() {
        let view = ViewState::new(2.0, 30.0, 5.0);
        let next = wheel_zoom(view, 0.0, 100.0, ScaleLimits::default(), 0.0015);
        assert_eq!(next, view);
    }

    #[test]
    fn nan_wheel_delta_is_ignored() {
        let view = ViewState::new(2.0, 30.0, 5.0);
        assert_eq!(wheel_zoom(view, f64::NAN, 10.0, ScaleLimits::default(), 0.0015), view);
    }

    #[test]
    fn step_zoom_clamps_at_max() {
        let view = ViewState::new(45.0, 0.0, 0.0);
        let next = step_zoom(view, 1.2, ScaleLimits::default());
        assert_eq!(next.scale, 50.0);
    }
}
