//! Single-label mood from energy, valence and tempo

use serde::{Deserialize, Serialize};
use std::fmt;
use tonearm_core::AudioFeatures;

/// Primary mood descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// High energy at a fast tempo
    Energetic,
    /// Energetic and positive
    Happy,
    /// Low energy, low valence
    Melancholic,
    /// Low energy at a slow tempo
    Chill,
    /// Very high energy
    Intense,
    /// Nothing stands out
    Neutral,
}

impl Mood {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Happy => "happy",
            Mood::Melancholic => "melancholic",
            Mood::Chill => "chill",
            Mood::Intense => "intense",
            Mood::Neutral => "neutral",
        }
    }

    /// Mood of a track, if it has energy and valence
    pub fn from_features(features: &AudioFeatures) -> Option<Self> {
        Some(classify_mood(
            features.energy?,
            features.valence?,
            features.bpm,
        ))
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching rule wins
///
/// | rule | mood |
/// |---|---|
/// | energy > 0.6 and bpm > 120 | Energetic |
/// | energy > 0.5 and valence > 0.5 | Happy |
/// | energy < 0.4 and valence < 0.4 | Melancholic |
/// | energy < 0.5 and bpm < 100 | Chill |
/// | energy > 0.7 | Intense |
/// | otherwise | Neutral |
///
/// Tempo rules never fire without a tempo.
pub fn classify_mood(energy: f32, valence: f32, bpm: Option<f32>) -> Mood {
    let faster_than = |limit: f32| bpm.is_some_and(|b| b > limit);
    let slower_than = |limit: f32| bpm.is_some_and(|b| b < limit);

    if energy > 0.6 && faster_than(120.0) {
        Mood::Energetic
    } else if energy > 0.5 && valence > 0.5 {
        Mood::Happy
    } else if energy < 0.4 && valence < 0.4 {
        Mood::Melancholic
    } else if energy < 0.5 && slower_than(100.0) {
        Mood::Chill
    } else if energy > 0.7 {
        Mood::Intense
    } else {
        Mood::Neutral
    }
}
