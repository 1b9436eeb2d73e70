use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::{GenomeDataset, GenomeFeature, GenomeTrack};
use crate::error::{ViewportError, ViewportResult};

impl GenomeDataset {
    /// Parses a dataset document, tolerating the shapes produced by
    /// annotation pipelines.
    ///
    /// - `start`/`end` may be spelled `start_bp`/`end_bp` and may be numeric
    ///   strings; a missing end defaults to the start.
    /// - track and feature ids may be numbers.
    /// - features without a usable start and tracks without an id are
    ///   skipped.
    ///
    /// Only a non-object document (or unparsable JSON) is an error.
    pub fn from_json_str(input: &str) -> ViewportResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| ViewportError::InvalidData(format!("failed to parse dataset: {e}")))?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> ViewportResult<Self> {
        let Some(root) = value.as_object() else {
            return Err(ViewportError::InvalidData(
                "dataset must be a JSON object".to_owned(),
            ));
        };

        let length = root.get("length").and_then(lenient_number).unwrap_or(0.0);
        let mut dataset = Self::new(length);
        let mut skipped = SkipCounts::default();

        for entry in root.get("tracks").and_then(Value::as_array).into_iter().flatten() {
            match parse_track(entry, &mut skipped) {
                Some(track) => dataset.tracks.push(track),
                None => skipped.tracks += 1,
            }
        }

        if skipped.tracks > 0 || skipped.features > 0 {
            warn!(
                skipped_tracks = skipped.tracks,
                skipped_features = skipped.features,
                "dataset contained malformed entries"
            );
        }
        debug!(
            length = dataset.length,
            tracks = dataset.tracks.len(),
            features = dataset.feature_count(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Canonical form: `start`/`end` as numbers, absent optionals omitted.
    pub fn to_json_pretty(&self) -> ViewportResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ViewportError::InvalidData(format!("failed to serialize dataset: {e}")))
    }
}

#[derive(Default)]
struct SkipCounts {
    tracks: usize,
    features: usize,
}

fn parse_track(value: &Value, skipped: &mut SkipCounts) -> Option<GenomeTrack> {
    let object = value.as_object()?;
    let mut track = GenomeTrack::new(lenient_text(object, "id")?);
    track.name = lenient_text(object, "name");
    track.height = object
        .get("height")
        .and_then(lenient_number)
        .filter(|height| *height >= 0.0);

    for entry in object.get("features").and_then(Value::as_array).into_iter().flatten() {
        match parse_feature(entry) {
            Some(feature) => track.features.push(feature),
            None => skipped.features += 1,
        }
    }
    Some(track)
}

fn parse_feature(value: &Value) -> Option<GenomeFeature> {
    let object = value.as_object()?;
    let start = first_number(object, &["start", "start_bp"])?;
    let end = first_number(object, &["end", "end_bp"]).unwrap_or(start);

    Some(GenomeFeature {
        id: lenient_text(object, "id"),
        start,
        end,
        name: lenient_text(object, "name"),
        label: lenient_text(object, "label"),
        color: lenient_text(object, "color"),
    })
}

/// First key present with a non-null value decides, even when that value
/// turns out to be unusable.
fn first_number(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|value| !value.is_null()))
        .and_then(lenient_number)
}

fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn lenient_text(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
