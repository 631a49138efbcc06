//! `tonearm classify`: profile labels, mood and key per track plus the album
//! consensus

use super::TrackInput;
use serde::Serialize;
use tonearm_core::TrackId;
use tonearm_profile::{estimate_key, Mood, MusicalKey, SonicProfileClassifier};
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub id: TrackId,
    pub title: String,
    /// `None` when the track lacks energy or valence
    pub labels: Option<Vec<&'static str>>,
    pub mood: Option<Mood>,
    pub key: Option<MusicalKey>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub tracks: Vec<TrackReport>,
    pub album_profile: Vec<&'static str>,
}

/// Classify every track and aggregate the album profile
pub fn classify(inputs: &[TrackInput]) -> ClassifyReport {
    let classifier = SonicProfileClassifier::new();

    let mut label_sets = Vec::with_capacity(inputs.len());
    let mut tracks = Vec::with_capacity(inputs.len());

    for input in inputs {
        let track = &input.track;
        let labels = classifier.classify(&track.features);

        let key = input.chroma.as_deref().and_then(|chroma| {
            estimate_key(chroma)
                .map_err(|e| warn!(track = %track.id, error = %e, "Key estimation skipped"))
                .ok()
        });

        tracks.push(TrackReport {
            id: track.id.clone(),
            title: track.title.clone(),
            labels: labels.as_ref().map(|set| set.iter().copied().collect()),
            mood: Mood::from_features(&track.features),
            key,
        });
        label_sets.push(labels);
    }

    let album_profile = classifier.aggregate(&label_sets).into_iter().collect();

    ClassifyReport {
        tracks,
        album_profile,
    }
}
