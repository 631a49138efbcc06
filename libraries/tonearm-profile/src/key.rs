//! Musical key estimation (Krumhansl-Schmuckler)
//!
//! Correlates a 12-bin mean chroma vector against the major and minor key
//! profiles rotated to each of the 12 tonics; the best Pearson correlation
//! wins. Ties go to the earlier tonic, and to major over minor.

use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Krumhansl major key profile, tonic first
pub const MAJOR_PROFILE: [f32; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl minor key profile, tonic first
pub const MINOR_PROFILE: [f32; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Pitch-class names, C first
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Major or minor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Major key
    Major,
    /// Minor key
    Minor,
}

/// Tonic pitch class plus mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MusicalKey {
    /// Tonic as a pitch class (0 = C, 11 = B)
    pub tonic: u8,

    /// Major or minor
    pub mode: Mode,
}

impl MusicalKey {
    /// Tonic name, e.g. "F#"
    pub fn tonic_name(&self) -> &'static str {
        PITCH_CLASSES[usize::from(self.tonic % 12)]
    }
}

impl fmt::Display for MusicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        write!(f, "{} {mode}", self.tonic_name())
    }
}

/// Estimate the key of a 12-bin mean chroma vector
pub fn estimate_key(chroma: &[f32]) -> Result<MusicalKey> {
    if chroma.len() != 12 {
        return Err(ProfileError::InvalidChroma(chroma.len()));
    }

    let (lo, hi) = chroma
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if hi - lo <= f32::EPSILON {
        return Err(ProfileError::EmptyChroma);
    }

    let mut best: Option<(f32, MusicalKey)> = None;
    for tonic in 0..12u8 {
        for (mode, profile) in [(Mode::Major, &MAJOR_PROFILE), (Mode::Minor, &MINOR_PROFILE)] {
            let rotated = rotate(profile, usize::from(tonic));
            let Some(corr) = pearson(chroma, &rotated) else {
                continue;
            };
            if best.map_or(true, |(b, _)| corr > b) {
                best = Some((corr, MusicalKey { tonic, mode }));
            }
        }
    }

    best.map(|(_, key)| key).ok_or(ProfileError::EmptyChroma)
}

/// Profile with its tonic weight moved to `tonic`
fn rotate(profile: &[f32; 12], tonic: usize) -> [f32; 12] {
    let mut out = [0.0; 12];
    for (i, weight) in profile.iter().enumerate() {
        out[(i + tonic) % 12] = *weight;
    }
    out
}

/// Pearson correlation, `None` when undefined
fn pearson(a: &[f32], b: &[f32]) -> Option<f32> {
    let n = a.len() as f32;
    let mean_a = a.iter().sum::<f32>() / n;
    let mean_b = b.iter().sum::<f32>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let corr = cov / (var_a * var_b).sqrt();
    corr.is_finite().then_some(corr)
}
