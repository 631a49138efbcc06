//! Playback Events
//!
//! Event-based communication for UI synchronization. Events are queued at key
//! points and drained by the caller:
//! - State changes (play/pause/loading)
//! - Track changes (when a transition is initiated)
//! - Crossfade completion and cancellation (from the ramp task)
//! - Queue, EQ and volume changes

use crate::types::{DeckId, PlaybackState, TransitionKind};
use serde::{Deserialize, Serialize};
use tonearm_core::TrackId;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// Current track changed
    TrackChanged {
        /// New queue index
        index: usize,
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// A deck transition was initiated
    TransitionStarted {
        /// Deck that was audible before (if any)
        from: Option<DeckId>,
        /// Deck that is now active
        to: DeckId,
        /// Cut or crossfade
        kind: TransitionKind,
    },

    /// Crossfade ramp reached its end; the outgoing deck has been stopped
    CrossfadeCompleted {
        /// Deck that faded in
        deck: DeckId,
    },

    /// Crossfade ramp abandoned by a newer request
    CrossfadeCancelled {
        /// Deck that was fading out and has been force-stopped
        deck: DeckId,
    },

    /// Active track played to its end
    TrackEnded {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Track ended with nothing left to play
    QueueExhausted,

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Equalizer band changed
    EqChanged {
        /// Band index
        band: usize,
        /// New gain in dB
        gain_db: f32,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Error occurred during playback
    Error {
        /// Error message
        message: String,
    },
}
