//! Error types for the playback engine

use crate::types::DeckId;
use thiserror::Error;
use tonearm_core::TrackId;

/// Playback errors
///
/// Every error is reported synchronously to the caller of the operation that
/// triggered it. None are retried by the engine.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Queue index outside `[0, len)`; rejected before any state change
    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// The audio source for a track could not be opened
    #[error("Track {track_id} unavailable: {reason}")]
    TrackUnavailable { track_id: TrackId, reason: String },

    /// Attempted to load a deck that is still playing
    #[error("Deck {0} is busy")]
    DeckBusy(DeckId),

    /// Attempted to start a deck with nothing loaded
    #[error("Deck {0} has no track loaded")]
    DeckEmpty(DeckId),

    /// Equalizer band index outside `[0, bands)`
    #[error("Invalid EQ band {band} (bank has {bands} bands)")]
    InvalidBand { band: usize, bands: usize },

    /// Equalizer gain is NaN or infinite
    #[error("Invalid EQ gain: {0}")]
    InvalidGain(f32),

    /// No tokio runtime available to drive transitions
    #[error("Playback engine requires a tokio runtime")]
    NoRuntime,
}

/// Error returned by a [`SourceProvider`](crate::SourceProvider)
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source does not exist (deleted, never uploaded, bad id)
    #[error("Source not found: {0}")]
    NotFound(String),

    /// Stream could not be opened (network, permissions, decoder)
    #[error("Stream error: {0}")]
    Stream(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
