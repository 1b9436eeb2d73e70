use serde::{Deserialize, Serialize};

use crate::core::FocusFitOptions;
use crate::core::focus::{DEFAULT_FALLBACK_SCALE, DEFAULT_FILL_RATIO};
use crate::error::{ViewportError, ViewportResult};
use crate::interaction::{
    DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, DEFAULT_WHEEL_ZOOM_SENSITIVITY, DEFAULT_ZOOM_STEP,
    ScaleLimits,
};

pub const DEFAULT_PADDING_X: f64 = 20.0;
pub const DEFAULT_OVERSCAN: usize = 1;

/// Options recognized by the viewport engine.
///
/// Serializable so hosts can keep view setup next to their own settings.
/// Every field falls back to its default when missing from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Multiplier applied by zoom-in/zoom-out buttons.
    pub zoom_step: f64,
    pub padding_x: f64,
    pub fill_ratio: f64,
    pub fallback_scale: f64,
    /// Extra items materialized on each side of a virtualized range.
    pub overscan: usize,
    pub wheel_zoom_sensitivity: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
            padding_x: DEFAULT_PADDING_X,
            fill_ratio: DEFAULT_FILL_RATIO,
            fallback_scale: DEFAULT_FALLBACK_SCALE,
            overscan: DEFAULT_OVERSCAN,
            wheel_zoom_sensitivity: DEFAULT_WHEEL_ZOOM_SENSITIVITY,
        }
    }
}

impl ViewportConfig {
    #[must_use]
    pub fn with_scale_limits(mut self, min_scale: f64, max_scale: f64) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }

    #[must_use]
    pub fn with_zoom_step(mut self, zoom_step: f64) -> Self {
        self.zoom_step = zoom_step;
        self
    }

    #[must_use]
    pub fn with_padding_x(mut self, padding_x: f64) -> Self {
        self.padding_x = padding_x;
        self
    }

    #[must_use]
    pub fn with_fill_ratio(mut self, fill_ratio: f64) -> Self {
        self.fill_ratio = fill_ratio;
        self
    }

    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn with_wheel_zoom_sensitivity(mut self, sensitivity: f64) -> Self {
        self.wheel_zoom_sensitivity = sensitivity;
        self
    }

    /// Scale bounds; `min_scale > max_scale` is normalized by swapping.
    #[must_use]
    pub fn scale_limits(&self) -> ScaleLimits {
        ScaleLimits::new(self.min_scale, self.max_scale)
    }

    #[must_use]
    pub fn focus_fit_options(&self, viewport_width: f64) -> FocusFitOptions {
        FocusFitOptions::new(viewport_width, self.min_scale, self.max_scale)
            .with_padding_x(self.padding_x)
            .with_fill_ratio(self.fill_ratio)
            .with_fallback_scale(self.fallback_scale)
    }

    /// Rejects values the engine cannot normalize on its own.
    ///
    /// Swapped scale limits are accepted; see [`Self::scale_limits`].
    pub fn validate(&self) -> ViewportResult<()> {
        for (name, value) in [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("zoom_step", self.zoom_step),
            ("fill_ratio", self.fill_ratio),
            ("fallback_scale", self.fallback_scale),
            ("wheel_zoom_sensitivity", self.wheel_zoom_sensitivity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ViewportError::InvalidData(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        if !self.padding_x.is_finite() || self.padding_x < 0.0 {
            return Err(ViewportError::InvalidData(
                "`padding_x` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ViewportResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ViewportError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ViewportResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ViewportError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
