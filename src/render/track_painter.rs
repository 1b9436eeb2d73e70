use kurbo::Affine;
use tracing::trace;

use crate::core::{DomainScale, GenomeDataset, GenomeFeature, GenomeTrack, PhysicalViewport, ViewState};
use crate::error::ViewportResult;
use crate::render::{
    Color, DrawingContext, LinePrimitive, RectPrimitive, RenderContext, RenderFrame,
    SurfaceHandle, TextPrimitive,
};

/// Average glyph advance as a fraction of the font size, used when no text
/// shaping backend is available to measure labels.
const GLYPH_ADVANCE_RATIO: f64 = 0.6;
const GRID_DIVISIONS: u32 = 10;

/// Layout constants and palette of the default genome track view.
///
/// Lengths are in logical pixels before the layout scale is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPainterStyle {
    pub padding_x: f64,
    pub header_y: f64,
    pub track_start_y: f64,
    pub track_gap: f64,
    pub default_track_height: f64,
    pub grid_bottom_margin: f64,
    pub feature_corner_radius: f64,
    pub min_feature_width: f64,
    pub background: Color,
    pub title_color: Color,
    pub subtitle_color: Color,
    pub grid_color: Color,
    pub track_label_color: Color,
    pub guide_line_color: Color,
    pub default_feature_color: Color,
    pub label_background: Color,
    pub label_border: Color,
    pub label_text_color: Color,
}

impl Default for TrackPainterStyle {
    fn default() -> Self {
        Self {
            padding_x: crate::api::DEFAULT_PADDING_X,
            header_y: 28.0,
            track_start_y: 64.0,
            track_gap: 28.0,
            default_track_height: 18.0,
            grid_bottom_margin: 20.0,
            feature_corner_radius: 6.0,
            min_feature_width: 2.0,
            background: Color::rgb8(0xf8, 0xfa, 0xfc),
            title_color: Color::rgb8(0x0f, 0x17, 0x2a),
            subtitle_color: Color::rgb8(0x47, 0x55, 0x69),
            grid_color: Color::rgb8(0xe2, 0xe8, 0xf0),
            track_label_color: Color::rgb8(0x64, 0x74, 0x8b),
            guide_line_color: Color::rgb8(0xe5, 0xe7, 0xeb),
            default_feature_color: Color::rgb8(0x38, 0xbd, 0xf8),
            label_background: Color::rgb(1.0, 1.0, 1.0),
            label_border: Color::rgb8(0xe2, 0xe8, 0xf0),
            label_text_color: Color::rgb8(0x0f, 0x17, 0x2a),
        }
    }
}

/// Default draw routine for genome datasets: header, grid, one lane per
/// track with rounded feature bars and label chips.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenomeTrackPainter {
    style: TrackPainterStyle,
}

impl GenomeTrackPainter {
    #[must_use]
    pub fn new(style: TrackPainterStyle) -> Self {
        Self { style }
    }

    #[must_use]
    pub fn style(&self) -> &TrackPainterStyle {
        &self.style
    }

    /// Text and chip sizes grow with tall viewports, capped at 1.4x.
    #[must_use]
    pub fn layout_scale(viewport: PhysicalViewport) -> f64 {
        (viewport.height / 400.0).clamp(1.0, 1.4)
    }

    /// Screen x of a domain position under `view`.
    #[must_use]
    pub fn screen_x(&self, dataset: &GenomeDataset, viewport: PhysicalViewport, view: ViewState, position: f64) -> f64 {
        let scale = self.band_scale(dataset, viewport);
        self.style.padding_x + view.offset_x + scale.domain_to_pixel(position) * view.scale
    }

    fn band_scale(&self, dataset: &GenomeDataset, viewport: PhysicalViewport) -> DomainScale {
        DomainScale::new(
            dataset.domain_length(),
            viewport.width - self.style.padding_x * 2.0,
            0.0,
        )
    }

    #[must_use]
    pub fn build_frame(&self, dataset: &GenomeDataset, viewport: PhysicalViewport, view: ViewState) -> RenderFrame {
        let style = &self.style;
        let layout = Self::layout_scale(viewport);
        let mut frame = RenderFrame::new(viewport.logical_size(), style.background);

        self.push_header(&mut frame, dataset, layout);
        self.push_grid(&mut frame, viewport, layout);

        let lanes = LaneGeometry {
            band: self.band_scale(dataset, viewport),
            viewport,
            view,
            layout,
        };
        let mut y = style.track_start_y * layout + view.offset_y;
        for track in &dataset.tracks {
            let track_height = track_height(track, style.default_track_height) * layout;
            self.push_track(&mut frame, &lanes, track, y, track_height);
            y += track_height + style.track_gap * layout;
        }

        trace!(
            primitives = frame.primitive_count(),
            rects = frame.rects.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "built genome track frame"
        );
        frame
    }

    /// Paints `render.data` in logical pixels.
    ///
    /// The transform is reset to the device-pixel-ratio scale first, so bars
    /// and text are not skewed by the surface's horizontal-only zoom.
    pub fn draw<C: DrawingContext + ?Sized>(
        &self,
        context: &mut C,
        render: &RenderContext<'_, GenomeDataset>,
    ) -> ViewportResult<()> {
        let Some(dataset) = render.data else {
            return Ok(());
        };
        context.set_transform(Affine::scale(render.viewport.device_pixel_ratio));
        let frame = self.build_frame(dataset, render.viewport, render.view_state);
        context.render(&frame)
    }

    /// Adapts the painter to the draw-callback shape of `RenderSurface`.
    pub fn into_draw_callback<C: DrawingContext>(
        self,
    ) -> impl FnMut(&mut C, &SurfaceHandle, &RenderContext<'_, GenomeDataset>) -> ViewportResult<()> + 'static
    {
        move |context: &mut C, _surface: &SurfaceHandle, render: &RenderContext<'_, GenomeDataset>| {
            self.draw(context, render)
        }
    }

    fn push_header(&self, frame: &mut RenderFrame, dataset: &GenomeDataset, layout: f64) {
        let style = &self.style;
        let header_y = style.header_y * layout;
        frame.texts.push(
            TextPrimitive::new(
                "Genome length",
                style.padding_x,
                header_y - 6.0 * layout,
                14.0 * layout,
                style.title_color,
            )
            .bold(),
        );
        frame.texts.push(TextPrimitive::new(
            format!("{} bp", format_thousands(dataset.length)),
            style.padding_x,
            header_y + 10.0 * layout,
            12.0 * layout,
            style.subtitle_color,
        ));
    }

    fn push_grid(&self, frame: &mut RenderFrame, viewport: PhysicalViewport, layout: f64) {
        let style = &self.style;
        let step = (viewport.width - style.padding_x * 2.0) / f64::from(GRID_DIVISIONS);
        let top = style.track_start_y * layout - 16.0 * layout;
        let bottom = viewport.height - style.grid_bottom_margin;
        for index in 0..=GRID_DIVISIONS {
            let x = style.padding_x + f64::from(index) * step;
            frame
                .lines
                .push(LinePrimitive::new(x, top, x, bottom, 1.0, style.grid_color));
        }
    }

    fn push_track(
        &self,
        frame: &mut RenderFrame,
        lanes: &LaneGeometry,
        track: &GenomeTrack,
        y: f64,
        track_height: f64,
    ) {
        let style = &self.style;
        let LaneGeometry {
            band,
            viewport,
            view,
            layout,
        } = *lanes;
        let name = track.display_name();
        if !name.is_empty() {
            frame.texts.push(TextPrimitive::new(
                name,
                style.padding_x,
                y - 10.0 * layout,
                12.0 * layout,
                style.track_label_color,
            ));
        }

        let guide_y = y + track_height / 2.0;
        frame.lines.push(LinePrimitive::new(
            style.padding_x,
            guide_y,
            viewport.width - style.padding_x,
            guide_y,
            1.0,
            style.guide_line_color,
        ));

        for feature in &track.features {
            if !feature.start.is_finite() || !feature.end.is_finite() {
                continue;
            }
            let x = style.padding_x + view.offset_x + band.domain_to_pixel(feature.start) * view.scale;
            let width = (band.span_to_width(feature.start, feature.end, 0.0) * view.scale)
                .max(style.min_feature_width);
            if !x.is_finite() || !width.is_finite() {
                continue;
            }
            let radius = style.feature_corner_radius.min(track_height / 2.0);
            frame.rects.push(
                RectPrimitive::new(x, y, width, track_height, self.feature_color(feature))
                    .with_corner_radius(radius),
            );

            if let Some(label) = feature.chip_text() {
                self.push_label_chip(frame, label, x, y + track_height, layout);
            }
        }
    }

    fn push_label_chip(&self, frame: &mut RenderFrame, label: &str, bar_x: f64, bar_bottom: f64, layout: f64) {
        let style = &self.style;
        let font_size = 11.0 * layout;
        let padding_x = 6.0 * layout;
        let padding_y = 3.0 * layout;
        let chip_width = estimate_text_width(label, font_size) + padding_x * 2.0;
        let chip_height = 16.0 * layout + padding_y;
        let chip_x = bar_x + 6.0 * layout;
        let chip_y = bar_bottom + 6.0 * layout;

        frame.rects.push(
            RectPrimitive::new(chip_x, chip_y, chip_width, chip_height, style.label_background)
                .with_border(1.0, style.label_border)
                .with_corner_radius(6.0 * layout),
        );
        frame.texts.push(
            TextPrimitive::new(
                label,
                chip_x + padding_x,
                chip_y + 12.0 * layout,
                font_size,
                style.label_text_color,
            )
            .bold(),
        );
    }

    fn feature_color(&self, feature: &GenomeFeature) -> Color {
        feature
            .color
            .as_deref()
            .and_then(|hex| Color::from_hex(hex).ok())
            .unwrap_or(self.style.default_feature_color)
    }
}

/// Per-frame values shared by every lane.
#[derive(Clone, Copy)]
struct LaneGeometry {
    band: DomainScale,
    viewport: PhysicalViewport,
    view: ViewState,
    layout: f64,
}

fn track_height(track: &GenomeTrack, default_height: f64) -> f64 {
    track
        .height
        .filter(|height| height.is_finite() && *height >= 0.0)
        .unwrap_or(default_height)
}

fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_ADVANCE_RATIO
}

/// Formats a length with `,` thousands separators, dropping fractions.
fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::format_thousands;

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(format_thousands(12_000.0), "12,000");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1_234_567.4), "1,234,567");
        assert_eq!(format_thousands(-4_500.0), "-4,500");
        assert_eq!(format_thousands(f64::NAN), "0");
    }
}
