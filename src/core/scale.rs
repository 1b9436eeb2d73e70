use crate::core::types::clamp_domain_length;

/// Smallest on-screen width given to any mapped interval.
pub const DEFAULT_MIN_SPAN_WIDTH: f64 = 2.0;

/// Linear mapping from domain positions (`0..domain_length`) to logical pixels.
///
/// The drawable band is `viewport_width - 2 * padding_x` wide (at least one
/// pixel) and starts at `padding_x`. Construction never fails: a degenerate
/// domain length is clamped to `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainScale {
    padding_x: f64,
    drawable_width: f64,
    pixels_per_unit: f64,
}

impl DomainScale {
    #[must_use]
    pub fn new(domain_length: f64, viewport_width: f64, padding_x: f64) -> Self {
        let domain_length = clamp_domain_length(domain_length);
        let drawable_width = drawable_width(viewport_width, padding_x);
        Self {
            padding_x,
            drawable_width,
            pixels_per_unit: drawable_width / domain_length,
        }
    }

    #[must_use]
    pub fn pixels_per_unit(self) -> f64 {
        self.pixels_per_unit
    }

    #[must_use]
    pub fn drawable_width(self) -> f64 {
        self.drawable_width
    }

    #[must_use]
    pub fn padding_x(self) -> f64 {
        self.padding_x
    }

    #[must_use]
    pub fn domain_to_pixel(self, position: f64) -> f64 {
        self.padding_x + position * self.pixels_per_unit
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        (pixel - self.padding_x) / self.pixels_per_unit
    }

    /// Pixel width of `[start, end)`, floored at `min_width`.
    #[must_use]
    pub fn span_to_width(self, start: f64, end: f64, min_width: f64) -> f64 {
        ((end - start) * self.pixels_per_unit).max(min_width)
    }
}

/// `max(1, viewport_width - 2 * padding_x)`.
#[must_use]
pub fn drawable_width(viewport_width: f64, padding_x: f64) -> f64 {
    let width = viewport_width - padding_x * 2.0;
    if width.is_finite() { width.max(1.0) } else { 1.0 }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MIN_SPAN_WIDTH, DomainScale};

    #[test]
    fn zero_domain_length_is_clamped_to_one() {
        let scale = DomainScale::new(0.0, 100.0, 0.0);
        assert_eq!(scale.pixels_per_unit(), 100.0);
    }

    #[test]
    fn padding_wider_than_viewport_keeps_one_pixel_band() {
        let scale = DomainScale::new(10.0, 30.0, 20.0);
        assert_eq!(scale.drawable_width(), 1.0);
        assert!((scale.pixels_per_unit() - 0.1).abs() <= 1e-12);
    }

    #[test]
    fn sub_pixel_span_gets_minimum_width() {
        let scale = DomainScale::new(1_000_000.0, 1000.0, 0.0);
        assert_eq!(
            scale.span_to_width(10.0, 11.0, DEFAULT_MIN_SPAN_WIDTH),
            DEFAULT_MIN_SPAN_WIDTH
        );
        assert_eq!(scale.span_to_width(0.0, 500_000.0, DEFAULT_MIN_SPAN_WIDTH), 500.0);
    }
}
