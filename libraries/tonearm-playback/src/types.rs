//! Core types for the playback engine

use crate::crossfade::CrossfadeSettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one of the two decks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeckId {
    /// First deck (active at engine start)
    A,

    /// Second deck
    B,
}

impl DeckId {
    /// The opposite deck
    pub fn other(self) -> Self {
        match self {
            DeckId::A => DeckId::B,
            DeckId::B => DeckId::A,
        }
    }

    /// Position in the two-element deck array
    pub(crate) fn index(self) -> usize {
        match self {
            DeckId::A => 0,
            DeckId::B => 1,
        }
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckId::A => write!(f, "A"),
            DeckId::B => write!(f, "B"),
        }
    }
}

/// How to move from the current track to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Instant switch with no overlap
    #[default]
    Cut,

    /// Overlapping complementary gain ramps
    Crossfade,
}

/// Playback state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing requested yet (no current index)
    Idle,

    /// Transition being initiated
    Loading,

    /// Active deck audible
    Playing,

    /// Active deck paused
    Paused,
}

/// State of a single deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckState {
    /// No source bound
    Empty,

    /// Source bound, stopped at position 0
    Loaded,

    /// Source playing
    Playing,

    /// Source paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when queue ends
    #[default]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only
    One,
}

/// What `load_queue` does with a track that is already playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueReplacePolicy {
    /// Keep playing if the current track is in the new queue (matched by id),
    /// otherwise stop and return to `Idle`
    #[default]
    PreserveByIdentity,

    /// Always stop and return to `Idle`
    Stop,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Crossfade window and curve (constructor-time constant)
    pub crossfade: CrossfadeSettings,

    /// Number of equalizer bands (default: 10)
    pub eq_bands: usize,

    /// Recently-played list size (default: 50)
    pub history_size: usize,

    /// Initial master volume (0-100, default: 80)
    pub volume: u8,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Transition used when a track ends on its own (default: Cut)
    pub on_track_end: TransitionKind,

    /// Queue replacement policy (default: PreserveByIdentity)
    pub queue_replace: QueueReplacePolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            crossfade: CrossfadeSettings::default(),
            eq_bands: 10,
            history_size: 50,
            volume: 80,
            shuffle: false,
            repeat: RepeatMode::Off,
            on_track_end: TransitionKind::Cut,
            queue_replace: QueueReplacePolicy::PreserveByIdentity,
        }
    }
}
