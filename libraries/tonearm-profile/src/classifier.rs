//! Per-track classification and album consensus

use crate::catalog::{SonicProfile, CATALOG};
use std::collections::{BTreeMap, BTreeSet};
use tonearm_core::{AudioFeatures, Track};
use tracing::debug;

/// Labels attached to one track
pub type LabelSet = BTreeSet<&'static str>;

/// Rule-based tagger over a fixed profile catalog
#[derive(Debug, Clone)]
pub struct SonicProfileClassifier {
    catalog: &'static [SonicProfile],
}

impl Default for SonicProfileClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SonicProfileClassifier {
    /// Classifier over the built-in catalog
    pub fn new() -> Self {
        Self { catalog: &CATALOG }
    }

    /// Profiles in evaluation order
    pub fn catalog(&self) -> &[SonicProfile] {
        self.catalog
    }

    /// Labels of every profile the features satisfy
    ///
    /// `None` when energy or valence is missing: such a track is unusable and
    /// must not count toward an album consensus.
    pub fn classify(&self, features: &AudioFeatures) -> Option<LabelSet> {
        if !features.is_usable() {
            return None;
        }

        Some(
            self.catalog
                .iter()
                .filter(|profile| profile.matches(features))
                .map(|profile| profile.name)
                .collect(),
        )
    }

    /// Consensus over per-track label sets
    ///
    /// A label is kept when at least 40% of the usable tracks carry it (and
    /// at least one does). Unusable tracks (`None`) are left out of the
    /// denominator. Output is ordered by label.
    pub fn aggregate(&self, label_sets: &[Option<LabelSet>]) -> LabelSet {
        let usable = label_sets.iter().flatten().count();
        if usable == 0 {
            return LabelSet::new();
        }

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for label in label_sets.iter().flatten().flatten() {
            *counts.entry(*label).or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|&(_, count)| count >= 1 && count * 5 >= usable * 2)
            .map(|(label, _)| label)
            .collect()
    }

    /// Classify every track and aggregate the result
    pub fn album_profile(&self, tracks: &[Track]) -> LabelSet {
        let label_sets: Vec<_> = tracks.iter().map(|t| self.classify(&t.features)).collect();
        let consensus = self.aggregate(&label_sets);
        debug!(
            tracks = tracks.len(),
            usable = label_sets.iter().flatten().count(),
            labels = consensus.len(),
            "Album profiled"
        );
        consensus
    }
}
