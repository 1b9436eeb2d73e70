//! One-shot computation of an initial view framing a region of interest.
//!
//! Relevance is decided by a [`RegionOfInterest`] predicate. The default
//! [`KeywordRegionOfInterest`] looks for primer/amplicon/target markers.

use serde::{Deserialize, Serialize};

use crate::core::scale::drawable_width;
use crate::core::types::{FocusRange, GenomeDataset, GenomeFeature, GenomeTrack, ViewState};
use crate::interaction::ScaleLimits;

pub const DEFAULT_FILL_RATIO: f64 = 0.78;
pub const MIN_FILL_RATIO: f64 = 0.1;
pub const MAX_FILL_RATIO: f64 = 0.98;
pub const DEFAULT_FALLBACK_SCALE: f64 = 1.0;
pub const DEFAULT_FOCUS_KEYWORDS: [&str; 3] = ["primer", "amplicon", "target"];

/// Margin added on each side of the matched bounds, as a fraction of their span.
const FOCUS_MARGIN_RATIO: f64 = 0.25;
const MIN_FOCUS_MARGIN: f64 = 1.0;

/// Decides which tracks and features the initial view should frame.
pub trait RegionOfInterest {
    fn matches_track(&self, track: &GenomeTrack) -> bool;
    fn matches_feature(&self, feature: &GenomeFeature) -> bool;
}

/// Case-insensitive substring match against a fixed vocabulary.
///
/// Tracks match on id or name; features match on their display text
/// (label, else name, else id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRegionOfInterest {
    keywords: Vec<String>,
}

impl Default for KeywordRegionOfInterest {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_KEYWORDS)
    }
}

impl KeywordRegionOfInterest {
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        let normalized = text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }
}

impl RegionOfInterest for KeywordRegionOfInterest {
    fn matches_track(&self, track: &GenomeTrack) -> bool {
        self.matches_text(&track.id) || track.name.as_deref().is_some_and(|name| self.matches_text(name))
    }

    fn matches_feature(&self, feature: &GenomeFeature) -> bool {
        feature
            .display_text()
            .is_some_and(|text| self.matches_text(text))
    }
}

/// Inputs of [`compute_focused_view`] besides the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusFitOptions {
    pub viewport_width: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub padding_x: f64,
    pub fill_ratio: f64,
    pub fallback_scale: f64,
}

impl FocusFitOptions {
    #[must_use]
    pub fn new(viewport_width: f64, min_scale: f64, max_scale: f64) -> Self {
        Self {
            viewport_width,
            min_scale,
            max_scale,
            padding_x: crate::api::DEFAULT_PADDING_X,
            fill_ratio: DEFAULT_FILL_RATIO,
            fallback_scale: DEFAULT_FALLBACK_SCALE,
        }
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
    pub fn with_fallback_scale(mut self, fallback_scale: f64) -> Self {
        self.fallback_scale = fallback_scale;
        self
    }
}

/// Finds the padded domain interval covering the region of interest.
///
/// Features of matching tracks win outright; individually matching features
/// elsewhere are only consulted when no matching track contributed any.
#[must_use]
pub fn find_focus_range(
    dataset: &GenomeDataset,
    region: &impl RegionOfInterest,
) -> Option<FocusRange> {
    let track_features: Vec<&GenomeFeature> = dataset
        .tracks
        .iter()
        .filter(|track| region.matches_track(track))
        .flat_map(|track| track.features.iter())
        .collect();

    let features = if track_features.is_empty() {
        dataset
            .tracks
            .iter()
            .flat_map(|track| track.features.iter())
            .filter(|feature| region.matches_feature(feature))
            .collect()
    } else {
        track_features
    };

    focus_range_of(&features, dataset.domain_length())
}

fn focus_range_of(features: &[&GenomeFeature], domain_length: f64) -> Option<FocusRange> {
    let (min_start, max_end) = features
        .iter()
        .filter_map(|feature| feature.normalized_interval())
        .fold(None, |bounds: Option<(f64, f64)>, (start, end)| {
            Some(match bounds {
                Some((min_start, max_end)) => (min_start.min(start), max_end.max(end)),
                None => (start, end),
            })
        })?;

    let span = (max_end - min_start).max(1.0);
    let margin = (span * FOCUS_MARGIN_RATIO).max(MIN_FOCUS_MARGIN);

    Some(FocusRange {
        start: (min_start - margin).clamp(0.0, domain_length),
        end: (max_end + margin).clamp(0.0, domain_length),
    })
}

/// Initial view that centers the region of interest and scales it to fill
/// `fill_ratio` of the drawable width.
///
/// Without a region of interest the fallback scale is returned with zero
/// offsets. Scale limits given in the wrong order are swapped.
#[must_use]
pub fn compute_focused_view(
    dataset: &GenomeDataset,
    options: FocusFitOptions,
    region: &impl RegionOfInterest,
) -> ViewState {
    let limits = ScaleLimits::new(options.min_scale, options.max_scale);
    let Some(focus) = find_focus_range(dataset, region) else {
        return ViewState::new(limits.clamp(options.fallback_scale), 0.0, 0.0);
    };

    let domain_length = dataset.domain_length();
    let drawable_width = drawable_width(options.viewport_width, options.padding_x);
    let fill_ratio = if options.fill_ratio.is_finite() {
        options.fill_ratio.clamp(MIN_FILL_RATIO, MAX_FILL_RATIO)
    } else {
        DEFAULT_FILL_RATIO
    };
    let span = focus.span().max(1.0);

    let scale = limits.clamp((domain_length / span) * fill_ratio);
    let offset_x = drawable_width / 2.0 - (focus.center() / domain_length) * drawable_width * scale;

    ViewState::new(scale, offset_x, 0.0)
}

/// Identity of a focus-fit result.
///
/// Focus-fit seeds a fresh interactive session; callers recompute it only
/// when this key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusKey {
    pub domain_length: u64,
    pub track_count: usize,
    pub feature_count: usize,
    pub viewport_width: i64,
}

impl FocusKey {
    #[must_use]
    pub fn new(dataset: &GenomeDataset, viewport_width: f64) -> Self {
        let viewport_width = if viewport_width.is_finite() {
            viewport_width.round() as i64
        } else {
            0
        };
        Self {
            domain_length: dataset.domain_length() as u64,
            track_count: dataset.tracks.len(),
            feature_count: dataset.feature_count(),
            viewport_width,
        }
    }
}
