use serde::{Deserialize, Serialize};

/// Pan/zoom transform of an interactive view.
///
/// `scale` zooms the domain (horizontal) axis only; `offset_x`/`offset_y` are
/// logical-pixel translations applied before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl ViewState {
    #[must_use]
    pub const fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// Returns a copy translated by `(dx, dy)` logical pixels.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
    }

    #[must_use]
    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }
}

/// Logical (CSS pixel) size of a host element's content box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

impl LogicalSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` once both dimensions are finite and non-zero.
    #[must_use]
    pub fn is_measured(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Physical pixel size of a backing buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

/// Measured drawing area and display density for one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalViewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl PhysicalViewport {
    /// Builds a viewport, replacing a missing or unusable ratio with `1`.
    #[must_use]
    pub fn new(size: LogicalSize, device_pixel_ratio: Option<f64>) -> Self {
        Self {
            width: size.width,
            height: size.height,
            device_pixel_ratio: resolve_device_pixel_ratio(device_pixel_ratio),
        }
    }

    #[must_use]
    pub fn logical_size(self) -> LogicalSize {
        LogicalSize::new(self.width, self.height)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.logical_size().is_measured()
    }

    /// `floor(width * dpr) x floor(height * dpr)`.
    #[must_use]
    pub fn backing_size(self) -> BackingSize {
        BackingSize {
            width: to_pixel_count(self.width * self.device_pixel_ratio),
            height: to_pixel_count(self.height * self.device_pixel_ratio),
        }
    }
}

#[must_use]
pub fn resolve_device_pixel_ratio(device_pixel_ratio: Option<f64>) -> f64 {
    device_pixel_ratio
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .unwrap_or(1.0)
        .max(1.0)
}

fn to_pixel_count(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor().min(f64::from(u32::MAX)) as u32
}

/// One annotated half-open interval `[start, end)` on the domain axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl GenomeFeature {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            id: None,
            start,
            end,
            name: None,
            label: None,
            color: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Returns `(min, max)` of the endpoints, or `None` when either is not finite.
    #[must_use]
    pub fn normalized_interval(&self) -> Option<(f64, f64)> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return None;
        }
        Some((self.start.min(self.end), self.start.max(self.end)))
    }

    /// Text used to identify the feature: label, then name, then id.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.label
            .as_deref()
            .or(self.name.as_deref())
            .or(self.id.as_deref())
    }

    /// Text of the feature's label chip: label, then id, then name, skipping
    /// empty strings.
    #[must_use]
    pub fn chip_text(&self) -> Option<&str> {
        [&self.label, &self.id, &self.name]
            .into_iter()
            .filter_map(|text| text.as_deref())
            .find(|text| !text.is_empty())
    }
}

/// Ordered group of features sharing one visual lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeTrack {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub features: Vec<GenomeFeature>,
}

impl GenomeTrack {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            height: None,
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_feature(mut self, feature: GenomeFeature) -> Self {
        self.features.push(feature);
        self
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Tracks laid out over a linear coordinate space `0..length`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenomeDataset {
    pub length: f64,
    #[serde(default)]
    pub tracks: Vec<GenomeTrack>,
}

impl GenomeDataset {
    #[must_use]
    pub fn new(length: f64) -> Self {
        Self {
            length,
            tracks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_track(mut self, track: GenomeTrack) -> Self {
        self.tracks.push(track);
        self
    }

    /// Addressable span, never below `1`.
    #[must_use]
    pub fn domain_length(&self) -> f64 {
        clamp_domain_length(self.length)
    }

    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.tracks.iter().map(|track| track.features.len()).sum()
    }
}

#[must_use]
pub fn clamp_domain_length(length: f64) -> f64 {
    if length.is_finite() { length.max(1.0) } else { 1.0 }
}

/// Domain interval framed by focus-fit, `0 <= start <= end <= domain_length`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusRange {
    pub start: f64,
    pub end: f64,
}

impl FocusRange {
    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn center(self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::{GenomeFeature, LogicalSize, PhysicalViewport, ViewState};

    #[test]
    fn backing_size_floors_scaled_dimensions() {
        let viewport = PhysicalViewport::new(LogicalSize::new(300.5, 150.25), Some(2.0));
        let backing = viewport.backing_size();
        assert_eq!(backing.width, 601);
        assert_eq!(backing.height, 300);
    }

    #[test]
    fn unusable_device_pixel_ratio_falls_back_to_one() {
        for ratio in [None, Some(0.0), Some(-2.0), Some(f64::NAN), Some(f64::INFINITY)] {
            let viewport = PhysicalViewport::new(LogicalSize::new(10.0, 10.0), ratio);
            assert_eq!(viewport.device_pixel_ratio, 1.0);
        }
    }

    #[test]
    fn translated_keeps_scale() {
        let view = ViewState::new(2.5, 10.0, -4.0).translated(3.0, 4.0);
        assert_eq!(view, ViewState::new(2.5, 13.0, 0.0));
    }

    #[test]
    fn feature_display_text_prefers_label_then_name_then_id() {
        let feature = GenomeFeature::new(0.0, 1.0).with_id("f1");
        assert_eq!(feature.display_text(), Some("f1"));
        let feature = feature.with_name("named");
        assert_eq!(feature.display_text(), Some("named"));
        let feature = feature.with_label("P-01");
        assert_eq!(feature.display_text(), Some("P-01"));
    }

    #[test]
    fn chip_text_prefers_label_then_id_then_name() {
        let feature = GenomeFeature::new(0.0, 1.0).with_name("named");
        assert_eq!(feature.chip_text(), Some("named"));
        let feature = feature.with_id("f1");
        assert_eq!(feature.chip_text(), Some("f1"));
        let feature = feature.with_label("");
        assert_eq!(feature.chip_text(), Some("f1"));
        let feature = feature.with_label("P-01");
        assert_eq!(feature.chip_text(), Some("P-01"));
        assert_eq!(GenomeFeature::new(0.0, 1.0).with_id("").chip_text(), None);
    }

    #[test]
    fn reversed_interval_is_normalized() {
        let feature = GenomeFeature::new(90.0, 10.0);
        assert_eq!(feature.normalized_interval(), Some((10.0, 90.0)));
        assert_eq!(GenomeFeature::new(f64::NAN, 1.0).normalized_interval(), None);
    }
}
