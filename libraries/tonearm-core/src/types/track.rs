use super::{AudioFeatures, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track information supplied by the library/API layer
///
/// Immutable from the engine's point of view: the playback engine clones and
/// compares tracks but never edits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Track duration in seconds
    pub duration_secs: f64,

    /// Audio analysis attributes (all optional)
    #[serde(default)]
    pub features: AudioFeatures,
}

impl Track {
    /// Create a track without analysis features
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration_secs: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration_secs,
            features: AudioFeatures::default(),
        }
    }

    /// Attach analysis features
    #[must_use]
    pub fn with_features(mut self, features: AudioFeatures) -> Self {
        self.features = features;
        self
    }

    /// Duration as a `Duration`
    ///
    /// Negative, NaN and unrepresentably large values collapse to zero.
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}
