use approx::assert_relative_eq;
use genome_viewport::api::ViewportConfig;
use genome_viewport::core::{
    DomainScale, FocusFitOptions, FocusKey, GenomeDataset, GenomeFeature, GenomeTrack,
    KeywordRegionOfInterest, RegionOfInterest, compute_focused_view, drawable_width,
    find_focus_range,
};

fn demo_genome() -> GenomeDataset {
    GenomeDataset::new(12_000.0)
        .with_track(
            GenomeTrack::new("genes")
                .with_name("Genes")
                .with_feature(GenomeFeature::new(100.0, 3_000.0).with_label("geneA"))
                .with_feature(GenomeFeature::new(6_000.0, 9_500.0).with_label("geneB")),
        )
        .with_track(
            GenomeTrack::new("primers")
                .with_name("Primers")
                .with_feature(GenomeFeature::new(400.0, 1_200.0).with_label("P-01")),
        )
}

fn options(viewport_width: f64) -> FocusFitOptions {
    FocusFitOptions::new(viewport_width, 0.1, 50.0)
}

#[test]
fn focus_track_features_frame_the_view() {
    let dataset = demo_genome();
    let region = KeywordRegionOfInterest::default();

    let focus = find_focus_range(&dataset, &region).expect("focus range");
    assert_relative_eq!(focus.start, 200.0);
    assert_relative_eq!(focus.end, 1_400.0);

    let view = compute_focused_view(&dataset, options(1_000.0), &region);
    assert_relative_eq!(view.scale, 7.8, epsilon = 1e-9);
    assert_eq!(view.offset_y, 0.0);
}

#[test]
fn focus_center_lands_mid_drawable() {
    let dataset = demo_genome();
    let view = compute_focused_view(&dataset, options(1_000.0), &KeywordRegionOfInterest::default());

    let drawable = drawable_width(1_000.0, 20.0);
    let band = DomainScale::new(dataset.domain_length(), 1_000.0 - 40.0, 0.0);
    let center_x = 20.0 + view.offset_x + band.domain_to_pixel(800.0) * view.scale;

    assert_relative_eq!(center_x, 20.0 + drawable / 2.0, epsilon = 1e-6);
}

#[test]
fn feature_labels_are_used_when_no_track_matches() {
    let dataset = GenomeDataset::new(10_000.0).with_track(
        GenomeTrack::new("annotations")
            .with_feature(GenomeFeature::new(2_000.0, 2_100.0).with_label("Amplicon 1"))
            .with_feature(GenomeFeature::new(7_000.0, 8_000.0).with_label("gene")),
    );

    let focus = find_focus_range(&dataset, &KeywordRegionOfInterest::default()).expect("focus");
    assert_relative_eq!(focus.start, 1_975.0);
    assert_relative_eq!(focus.end, 2_125.0);
}

#[test]
fn focus_track_wins_over_feature_matches_elsewhere() {
    let dataset = GenomeDataset::new(10_000.0)
        .with_track(
            GenomeTrack::new("notes")
                .with_feature(GenomeFeature::new(9_000.0, 9_100.0).with_label("primer dimer")),
        )
        .with_track(
            GenomeTrack::new("target-region").with_feature(GenomeFeature::new(1_000.0, 1_400.0)),
        );

    let focus = find_focus_range(&dataset, &KeywordRegionOfInterest::default()).expect("focus");
    assert_relative_eq!(focus.start, 900.0);
    assert_relative_eq!(focus.end, 1_500.0);
}

#[test]
fn no_match_falls_back_to_default_scale() {
    let dataset = GenomeDataset::new(5_000.0).with_track(
        GenomeTrack::new("genes").with_feature(GenomeFeature::new(10.0, 20.0).with_label("geneA")),
    );

    let view = compute_focused_view(
        &dataset,
        options(800.0).with_fallback_scale(2.5),
        &KeywordRegionOfInterest::default(),
    );
    assert_eq!(view.scale, 2.5);
    assert_eq!(view.offset_x, 0.0);
    assert_eq!(view.offset_y, 0.0);
}

#[test]
fn tiny_focus_is_clamped_to_max_scale() {
    let dataset = GenomeDataset::new(1_000_000.0).with_track(
        GenomeTrack::new("primer")
            .with_feature(GenomeFeature::new(500_000.0, 500_000.0)),
    );

    let view = compute_focused_view(&dataset, options(1_200.0), &KeywordRegionOfInterest::default());
    assert_eq!(view.scale, 50.0);
}

#[test]
fn focus_range_is_clamped_to_domain() {
    let dataset = GenomeDataset::new(1_000.0)
        .with_track(GenomeTrack::new("primers").with_feature(GenomeFeature::new(950.0, 20.0)));

    let focus = find_focus_range(&dataset, &KeywordRegionOfInterest::default()).expect("focus");
    assert_eq!(focus.start, 0.0);
    assert_eq!(focus.end, 1_000.0);
}

#[test]
fn non_finite_features_are_skipped() {
    let dataset = GenomeDataset::new(1_000.0).with_track(
        GenomeTrack::new("primers")
            .with_feature(GenomeFeature::new(f64::NAN, 10.0))
            .with_feature(GenomeFeature::new(100.0, 140.0)),
    );

    let focus = find_focus_range(&dataset, &KeywordRegionOfInterest::default()).expect("focus");
    assert_relative_eq!(focus.start, 90.0);
    assert_relative_eq!(focus.end, 150.0);
}

#[test]
fn fill_ratio_is_clamped() {
    let dataset = demo_genome();
    let region = KeywordRegionOfInterest::default();

    let view = compute_focused_view(&dataset, options(1_000.0).with_fill_ratio(4.0), &region);
    assert_relative_eq!(view.scale, 10.0 * 0.98, epsilon = 1e-9);
}

#[test]
fn custom_region_predicate_replaces_keywords() {
    struct GeneB;

    impl RegionOfInterest for GeneB {
        fn matches_track(&self, _track: &GenomeTrack) -> bool {
            false
        }

        fn matches_feature(&self, feature: &GenomeFeature) -> bool {
            feature.display_text() == Some("geneB")
        }
    }

    let focus = find_focus_range(&demo_genome(), &GeneB).expect("focus");
    assert_relative_eq!(focus.start, 6_000.0 - 875.0);
    assert_relative_eq!(focus.end, 9_500.0 + 875.0);
}

#[test]
fn config_builds_focus_options() {
    let config = ViewportConfig::default().with_padding_x(32.0).with_fill_ratio(0.5);
    let options = config.focus_fit_options(640.0);

    assert_eq!(options.viewport_width, 640.0);
    assert_eq!(options.padding_x, 32.0);
    assert_eq!(options.fill_ratio, 0.5);
    assert_eq!(options.min_scale, 0.1);
    assert_eq!(options.max_scale, 50.0);
}

#[test]
fn focus_key_changes_with_inputs() {
    let dataset = demo_genome();
    let key = FocusKey::new(&dataset, 1_000.2);

    assert_eq!(key, FocusKey::new(&dataset, 999.8));
    assert_ne!(key, FocusKey::new(&dataset, 1_200.0));

    let grown = dataset.clone().with_track(GenomeTrack::new("extra"));
    assert_ne!(key, FocusKey::new(&grown, 1_000.0));
}
