//! Platform-agnostic audio source traits
//!
//! Abstracts the streaming audio backend (browser media element, native
//! decoder, network stream) so the engine only deals in playable handles.

use crate::error::{Result, SourceError};
use std::time::Duration;
use tonearm_core::Track;

/// Playable stream handle bound to a deck
///
/// Implementors wrap an already-decodable stream and an output gain stage.
/// Position is owned by the backend; the engine only starts, stops, pauses
/// and sets gain.
pub trait AudioSource: Send {
    /// Begin playback from position 0
    fn start(&mut self) -> Result<()>;

    /// Halt playback and rewind to position 0
    fn stop(&mut self);

    /// Pause at the current position
    fn pause(&mut self);

    /// Continue from the paused position
    fn resume(&mut self) -> Result<()>;

    /// Set linear output gain (0.0 to 1.0)
    fn set_gain(&mut self, gain: f32);

    /// Current playback position
    fn position(&self) -> Duration;

    /// Check if the stream has been played to its end
    fn is_finished(&self) -> bool;
}

/// Factory for audio sources
///
/// Given a track, produces a playable stream handle. Failure to produce one
/// surfaces from the engine as `PlaybackError::TrackUnavailable`.
pub trait SourceProvider: Send + Sync {
    /// Open a stream for `track`
    fn open(&self, track: &Track) -> std::result::Result<Box<dyn AudioSource>, SourceError>;
}

/// Dummy audio source for testing
///
/// Plays silence and never runs out on its own.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct DummyAudioSource {
    pub playing: bool,
    pub gain: f32,
    pub finished: bool,
    pub starts: u32,
    position: Duration,
}

#[cfg(test)]
impl DummyAudioSource {
    /// Create new dummy source
    pub fn new() -> Self {
        Self::default()
    }

    /// Box it for `Deck::load`
    pub fn boxed() -> Box<dyn AudioSource> {
        Box::new(Self::new())
    }
}

#[cfg(test)]
impl AudioSource for DummyAudioSource {
    fn start(&mut self) -> Result<()> {
        self.playing = true;
        self.finished = false;
        self.position = Duration::ZERO;
        self.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = Duration::ZERO;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
