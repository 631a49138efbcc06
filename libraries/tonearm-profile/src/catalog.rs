//! Sonic profile catalog
//!
//! Each profile is a conjunction of inclusive range bounds over the four
//! feature axes. An axis without a bound accepts anything, including a
//! missing value.

use tonearm_core::AudioFeatures;

/// Inclusive range over one feature axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bound {
    /// Lower limit (inclusive)
    pub min: Option<f32>,

    /// Upper limit (inclusive)
    pub max: Option<f32>,
}

impl Bound {
    /// No constraint
    pub const ANY: Bound = Bound {
        min: None,
        max: None,
    };

    /// `value >= min`
    pub const fn at_least(min: f32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// `value <= max`
    pub const fn at_most(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Whether this bound constrains anything
    pub fn is_declared(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Check a feature value against the bound
    ///
    /// A declared bound is never satisfied by a missing value.
    pub fn admits(&self, value: Option<f32>) -> bool {
        if !self.is_declared() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// A named rule over audio features
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SonicProfile {
    /// Label attached to matching tracks
    pub name: &'static str,

    /// Energy range
    pub energy: Bound,

    /// Valence range
    pub valence: Bound,

    /// Danceability range
    pub danceability: Bound,

    /// Tempo range (BPM)
    pub bpm: Bound,
}

impl SonicProfile {
    const fn new(name: &'static str) -> Self {
        Self {
            name,
            energy: Bound::ANY,
            valence: Bound::ANY,
            danceability: Bound::ANY,
            bpm: Bound::ANY,
        }
    }

    const fn energy(mut self, bound: Bound) -> Self {
        self.energy = bound;
        self
    }

    const fn valence(mut self, bound: Bound) -> Self {
        self.valence = bound;
        self
    }

    const fn danceability(mut self, bound: Bound) -> Self {
        self.danceability = bound;
        self
    }

    const fn bpm(mut self, bound: Bound) -> Self {
        self.bpm = bound;
        self
    }

    /// Whether every declared bound is satisfied
    pub fn matches(&self, features: &AudioFeatures) -> bool {
        self.energy.admits(features.energy)
            && self.valence.admits(features.valence)
            && self.danceability.admits(features.danceability)
            && self.bpm.admits(features.bpm)
    }
}

/// The built-in profiles
pub const CATALOG: [SonicProfile; 9] = [
    SonicProfile::new("High Energy").energy(Bound::at_least(0.8)),
    SonicProfile::new("Chill")
        .energy(Bound::at_most(0.4))
        .bpm(Bound::at_most(110.0)),
    SonicProfile::new("Dark").valence(Bound::at_most(0.3)),
    SonicProfile::new("Happy").valence(Bound::at_least(0.7)),
    SonicProfile::new("Danceable").danceability(Bound::at_least(0.7)),
    SonicProfile::new("Fast").bpm(Bound::at_least(140.0)),
    SonicProfile::new("Slow").bpm(Bound::at_most(90.0)),
    SonicProfile::new("Acoustic/Organic")
        .energy(Bound::at_most(0.5))
        .valence(Bound::at_least(0.4)),
    SonicProfile::new("Intense")
        .energy(Bound::at_least(0.7))
        .valence(Bound::at_most(0.4)),
];
