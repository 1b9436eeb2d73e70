use approx::assert_relative_eq;
use genome_viewport::core::{DEFAULT_MIN_SPAN_WIDTH, DomainScale, drawable_width};

#[test]
fn domain_endpoints_map_to_band_edges() {
    let scale = DomainScale::new(12_000.0, 1_000.0, 20.0);

    assert_relative_eq!(scale.drawable_width(), 960.0);
    assert_relative_eq!(scale.domain_to_pixel(0.0), 20.0);
    assert_relative_eq!(scale.domain_to_pixel(12_000.0), 980.0);
    assert_relative_eq!(scale.domain_to_pixel(6_000.0), 500.0);
}

#[test]
fn pixel_to_domain_inverts_mapping() {
    let scale = DomainScale::new(48_502.0, 1_440.0, 20.0);

    let original = 17_345.5;
    let pixel = scale.domain_to_pixel(original);
    let recovered = scale.pixel_to_domain(pixel);

    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn degenerate_domain_length_is_clamped_to_one() {
    for length in [0.0, -50.0, f64::NAN] {
        let scale = DomainScale::new(length, 120.0, 10.0);
        assert_relative_eq!(scale.pixels_per_unit(), 100.0);
    }
}

#[test]
fn narrow_viewport_keeps_one_pixel_band() {
    assert_relative_eq!(drawable_width(30.0, 20.0), 1.0);
    assert_relative_eq!(drawable_width(f64::INFINITY, 20.0), 1.0);

    let scale = DomainScale::new(1_000.0, 10.0, 20.0);
    assert_relative_eq!(scale.drawable_width(), 1.0);
    assert!(scale.domain_to_pixel(500.0).is_finite());
}

#[test]
fn short_spans_get_minimum_width() {
    let scale = DomainScale::new(1_000_000.0, 1_040.0, 20.0);

    let width = scale.span_to_width(10.0, 11.0, DEFAULT_MIN_SPAN_WIDTH);
    assert_relative_eq!(width, DEFAULT_MIN_SPAN_WIDTH);

    let wide = scale.span_to_width(0.0, 500_000.0, DEFAULT_MIN_SPAN_WIDTH);
    assert_relative_eq!(wide, 500.0);
}
