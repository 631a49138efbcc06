//! A single playback deck
//!
//! Wraps one audio source with an independent gain stage. The engine owns
//! exactly two of these and only ever loads the one that is not audible.

use crate::{
    error::{PlaybackError, Result},
    source::AudioSource,
    types::{DeckId, DeckState},
};
use serde::Serialize;
use tonearm_core::{Track, TrackId};

/// Read-only view of a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSnapshot {
    /// Deck identity
    pub id: DeckId,

    /// Loaded track (if any)
    pub track_id: Option<TrackId>,

    /// Linear output gain
    pub gain: f32,

    /// Deck state
    pub state: DeckState,
}

/// One of the two playback paths
pub struct Deck {
    id: DeckId,
    track: Option<Track>,
    source: Option<Box<dyn AudioSource>>,
    gain: f32,
    state: DeckState,
}

impl Deck {
    /// Create an empty deck
    pub fn new(id: DeckId) -> Self {
        Self {
            id,
            track: None,
            source: None,
            gain: 0.0,
            state: DeckState::Empty,
        }
    }

    /// Deck identity
    pub fn id(&self) -> DeckId {
        self.id
    }

    /// Bind a new source, replacing whatever was loaded, with gain reset to 0
    ///
    /// Fails with `DeckBusy` while the deck is playing or paused.
    pub fn load(&mut self, track: Track, mut source: Box<dyn AudioSource>) -> Result<()> {
        if matches!(self.state, DeckState::Playing | DeckState::Paused) {
            return Err(PlaybackError::DeckBusy(self.id));
        }

        source.set_gain(0.0);
        self.gain = 0.0;
        self.track = Some(track);
        self.source = Some(source);
        self.state = DeckState::Loaded;
        Ok(())
    }

    /// Begin playback from position 0
    pub fn start(&mut self) -> Result<()> {
        let source = self
            .source
            .as_mut()
            .ok_or(PlaybackError::DeckEmpty(self.id))?;
        source.start()?;
        self.state = DeckState::Playing;
        Ok(())
    }

    /// Halt and rewind to position 0
    pub fn stop(&mut self) {
        if let Some(source) = self.source.as_mut() {
            source.stop();
            self.state = DeckState::Loaded;
        }
    }

    /// Pause mid-track
    pub fn pause(&mut self) {
        if self.state == DeckState::Playing {
            if let Some(source) = self.source.as_mut() {
                source.pause();
            }
            self.state = DeckState::Paused;
        }
    }

    /// Resume a paused deck; a stopped deck starts over from position 0
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            DeckState::Paused => {
                let source = self
                    .source
                    .as_mut()
                    .ok_or(PlaybackError::DeckEmpty(self.id))?;
                source.resume()?;
                self.state = DeckState::Playing;
                Ok(())
            }
            DeckState::Loaded => self.start(),
            DeckState::Playing => Ok(()),
            DeckState::Empty => Err(PlaybackError::DeckEmpty(self.id)),
        }
    }

    /// Set linear output gain, clamped to [0.0, 1.0]
    pub fn set_gain(&mut self, gain: f32) {
        let gain = gain.clamp(0.0, 1.0);
        self.gain = gain;
        if let Some(source) = self.source.as_mut() {
            source.set_gain(gain);
        }
    }

    /// Current linear gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Current deck state
    pub fn state(&self) -> DeckState {
        self.state
    }

    /// Whether the deck is audible-capable right now
    pub fn is_playing(&self) -> bool {
        self.state == DeckState::Playing
    }

    /// Loaded track
    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    /// Whether the source ran out while playing
    pub fn is_finished(&self) -> bool {
        self.state == DeckState::Playing
            && self.source.as_ref().is_some_and(|s| s.is_finished())
    }

    /// Read-only view
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            id: self.id,
            track_id: self.track.as_ref().map(|t| t.id.clone()),
            gain: self.gain,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DummyAudioSource;

    fn track(id: &str) -> Track {
        Track::new(id, "Song", "Artist", "Album", 200.0)
    }

    #[test]
    fn load_resets_gain() {
        let mut deck = Deck::new(DeckId::A);
        deck.set_gain(0.7);
        deck.load(track("t1"), DummyAudioSource::boxed()).unwrap();

        assert_eq!(deck.gain(), 0.0);
        assert_eq!(deck.state(), DeckState::Loaded);
        assert_eq!(deck.snapshot().track_id, Some(TrackId::new("t1")));
    }

    #[test]
    fn load_while_playing_is_busy() {
        let mut deck = Deck::new(DeckId::B);
        deck.load(track("t1"), DummyAudioSource::boxed()).unwrap();
        deck.start().unwrap();

        let err = deck.load(track("t2"), DummyAudioSource::boxed()).unwrap_err();
        assert!(matches!(err, PlaybackError::DeckBusy(DeckId::B)));
        assert_eq!(deck.snapshot().track_id, Some(TrackId::new("t1")));

        deck.stop();
        assert!(deck.load(track("t2"), DummyAudioSource::boxed()).is_ok());
    }

    #[test]
    fn start_empty_deck_fails() {
        let mut deck = Deck::new(DeckId::A);
        assert!(matches!(
            deck.start().unwrap_err(),
            PlaybackError::DeckEmpty(DeckId::A)
        ));
    }

    #[test]
    fn gain_is_clamped() {
        let mut deck = Deck::new(DeckId::A);
        deck.set_gain(1.5);
        assert_eq!(deck.gain(), 1.0);
        deck.set_gain(-0.2);
        assert_eq!(deck.gain(), 0.0);
    }

    #[test]
    fn pause_resume_and_restart_after_stop() {
        let mut deck = Deck::new(DeckId::A);
        deck.load(track("t1"), DummyAudioSource::boxed()).unwrap();
        deck.start().unwrap();

        deck.pause();
        assert_eq!(deck.state(), DeckState::Paused);
        deck.resume().unwrap();
        assert_eq!(deck.state(), DeckState::Playing);

        deck.stop();
        assert_eq!(deck.state(), DeckState::Loaded);
        deck.resume().unwrap();
        assert!(deck.is_playing());
    }
}
