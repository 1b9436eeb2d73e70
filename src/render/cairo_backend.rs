use std::f64::consts::{FRAC_PI_2, PI};

use cairo::{Context, Format, ImageSurface, Matrix, Operator};
use kurbo::Affine;
use pango::{FontDescription, Weight};
use tracing::warn;

use crate::core::BackingSize;
use crate::error::{ViewportError, ViewportResult};
use crate::render::{
    Color, DrawingContext, DrawingSurface, RectPrimitive, RenderFrame, Renderer, TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango drawing context over an ARGB32 image surface.
#[derive(Debug)]
pub struct CairoContext {
    image: ImageSurface,
    context: Context,
    save_depth: usize,
    last_stats: CairoRenderStats,
}

impl CairoContext {
    fn new(size: BackingSize) -> ViewportResult<Self> {
        let width = i32::try_from(size.width)
            .map_err(|_| ViewportError::Backend(format!("surface width {} too large", size.width)))?;
        let height = i32::try_from(size.height).map_err(|_| {
            ViewportError::Backend(format!("surface height {} too large", size.height))
        })?;
        let image = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            image,
            context,
            save_depth: 0,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn image_surface(&self) -> &ImageSurface {
        &self.image
    }

    #[must_use]
    pub fn cairo_context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn draw_frame(&mut self, frame: &RenderFrame) -> ViewportResult<()> {
        let context = &self.context;
        let mut stats = CairoRenderStats::default();

        append_rect_path(context, frame.background_rect());
        apply_color(context, frame.background);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill background", err))?;

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for rect in &frame.rects {
            append_rect_path(context, *rect);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let mut font = FontDescription::from_string("Sans");
            font.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
            if text.bold {
                font.set_weight(Weight::Bold);
            }
            layout.set_font_description(Some(&font));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };
            // `text.y` is the baseline; Pango positions the layout's top edge.
            let baseline = f64::from(layout.baseline()) / f64::from(pango::SCALE);

            apply_color(context, text.color);
            context.move_to(x, text.y - baseline);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoContext {
    fn render(&mut self, frame: &RenderFrame) -> ViewportResult<()> {
        frame.validate()?;
        self.draw_frame(frame)
    }
}

impl DrawingContext for CairoContext {
    fn save(&mut self) {
        match self.context.save() {
            Ok(()) => self.save_depth += 1,
            Err(err) => warn!(error = %err, "cairo save failed"),
        }
    }

    fn restore(&mut self) {
        // Cairo treats an unbalanced restore as a sticky context error.
        if self.save_depth == 0 {
            return;
        }
        self.save_depth -= 1;
        if let Err(err) = self.context.restore() {
            warn!(error = %err, "cairo restore failed");
        }
    }

    fn current_transform(&self) -> Affine {
        let matrix = self.context.matrix();
        Affine::new([
            matrix.xx(),
            matrix.yx(),
            matrix.xy(),
            matrix.yy(),
            matrix.x0(),
            matrix.y0(),
        ])
    }

    fn set_transform(&mut self, transform: Affine) {
        self.context.set_matrix(to_matrix(transform));
    }

    fn transform(&mut self, transform: Affine) {
        self.context.transform(to_matrix(transform));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let context = &self.context;
        if let Err(err) = context.save() {
            warn!(error = %err, "cairo save failed");
            return;
        }
        context.set_operator(Operator::Clear);
        context.rectangle(x, y, width, height);
        if let Err(err) = context.fill() {
            warn!(error = %err, "cairo clear failed");
        }
        if let Err(err) = context.restore() {
            warn!(error = %err, "cairo restore failed");
        }
    }
}

/// Offscreen drawing surface backed by a Cairo image surface.
///
/// The image and its context are recreated on every backing resize, so no
/// transform state survives a resize.
#[derive(Debug)]
pub struct CairoSurface {
    context: CairoContext,
    backing: BackingSize,
    device_pixel_ratio: Option<f64>,
}

impl CairoSurface {
    pub fn new(device_pixel_ratio: Option<f64>) -> ViewportResult<Self> {
        let backing = BackingSize::default();
        Ok(Self {
            context: CairoContext::new(backing)?,
            backing,
            device_pixel_ratio,
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    pub fn set_device_pixel_ratio(&mut self, device_pixel_ratio: Option<f64>) {
        self.device_pixel_ratio = device_pixel_ratio;
    }

    #[must_use]
    pub fn image_surface(&self) -> &ImageSurface {
        self.context.image_surface()
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.context.last_stats()
    }

    /// Encodes the current backing buffer as PNG.
    pub fn to_png_bytes(&self) -> ViewportResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.context
            .image_surface()
            .write_to_png(&mut bytes)
            .map_err(|err| ViewportError::Backend(format!("failed to encode png: {err}")))?;
        Ok(bytes)
    }
}

impl DrawingSurface for CairoSurface {
    type Context = CairoContext;

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn resize_backing(&mut self, size: BackingSize) -> ViewportResult<()> {
        self.context = CairoContext::new(size)?;
        self.backing = size;
        Ok(())
    }

    fn context_mut(&mut self) -> Option<&mut CairoContext> {
        Some(&mut self.context)
    }
}

fn to_matrix(transform: Affine) -> Matrix {
    let [xx, yx, xy, yy, x0, y0] = transform.as_coeffs();
    Matrix::new(xx, yx, xy, yy, x0, y0)
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ViewportError {
    ViewportError::Backend(format!("{prefix}: {err}"))
}
