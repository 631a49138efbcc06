//! Audio analysis attributes attached to a track

use serde::{Deserialize, Serialize};

/// Extracted audio features for a single track
///
/// Every attribute is optional: analysis may not have run yet, or may have
/// failed for part of the feature set. Consumers must treat a missing value
/// as "unknown", never as zero.
///
/// Ranges:
/// - `energy`, `valence`, `danceability`: 0.0 to 1.0
/// - `bpm`: unbounded positive
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// Perceived intensity (normalized RMS)
    #[serde(default)]
    pub energy: Option<f32>,

    /// Musical positiveness (spectral brightness proxy)
    #[serde(default)]
    pub valence: Option<f32>,

    /// Beat regularity
    #[serde(default)]
    pub danceability: Option<f32>,

    /// Tempo in beats per minute
    #[serde(default)]
    pub bpm: Option<f32>,
}

impl AudioFeatures {
    /// Whether these features can take part in profiling
    ///
    /// Energy and valence are the minimum feature set; a track without either
    /// is left out of album aggregation entirely.
    pub fn is_usable(&self) -> bool {
        self.energy.is_some() && self.valence.is_some()
    }
}
