//! Playback manager - core orchestration
//!
//! Owns the queue and the playback state machine, and drives the two decks
//! through the crossfade controller. All user operations are serialized
//! through `&mut self`; only the crossfade ramp and history logging run in
//! the background.

use crate::{
    crossfade::CrossfadeController,
    deck::DeckSnapshot,
    equalizer::EqualizerBank,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::{NoopHistory, PlayHistory, RecentlyPlayed},
    mixer::{lock, Mixer, SharedMixer},
    output::OutputDevice,
    queue::QueueNavigator,
    source::SourceProvider,
    types::{DeckId, PlaybackConfig, PlaybackState, QueueReplacePolicy, RepeatMode, TransitionKind},
    volume::MasterVolume,
};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::runtime::Handle;
use tonearm_core::{Track, TrackId};
use tracing::{debug, info, warn};

/// Main playback manager
pub struct PlaybackManager {
    config: PlaybackConfig,
    mixer: SharedMixer,
    crossfade: CrossfadeController,
    provider: Arc<dyn SourceProvider>,
    history: Arc<dyn PlayHistory>,
    runtime: Handle,

    queue: Vec<Track>,
    current_index: Option<usize>,
    state: PlaybackState,
    shuffle: bool,
    repeat: RepeatMode,
    volume: MasterVolume,
    recent: RecentlyPlayed,
    rng: StdRng,
}

impl PlaybackManager {
    /// Create a new playback manager
    ///
    /// Must be called from within a tokio runtime, which drives crossfade
    /// ramps and history logging for the lifetime of the manager.
    pub fn new(
        config: PlaybackConfig,
        provider: Arc<dyn SourceProvider>,
        output: Box<dyn OutputDevice>,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
        let volume = MasterVolume::new(config.volume);

        let mut mixer = Mixer::new(EqualizerBank::new(config.eq_bands), output);
        mixer.activate(DeckId::A);
        mixer.output.set_master_gain(volume.gain());
        let mixer = mixer.shared();

        let crossfade = CrossfadeController::new(mixer.clone(), config.crossfade, runtime.clone());

        debug!(
            eq_bands = config.eq_bands,
            crossfade_ms = config.crossfade.duration_ms,
            "Playback manager created"
        );

        Ok(Self {
            mixer,
            crossfade,
            provider,
            history: Arc::new(NoopHistory),
            runtime,
            queue: Vec::new(),
            current_index: None,
            state: PlaybackState::Idle,
            shuffle: config.shuffle,
            repeat: config.repeat,
            volume,
            recent: RecentlyPlayed::new(config.history_size),
            rng: StdRng::from_entropy(),
            config,
        })
    }

    /// Replace the "track played" sink
    pub fn set_history(&mut self, history: Arc<dyn PlayHistory>) {
        self.history = history;
    }

    /// Reseed the shuffle RNG
    pub fn seed_shuffle(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ===== Queue =====

    /// Replace the queue
    ///
    /// With [`QueueReplacePolicy::PreserveByIdentity`] a playing track that is
    /// also in the new queue keeps playing and the current index follows it.
    /// Otherwise playback stops and the engine returns to `Idle`.
    pub fn load_queue(&mut self, tracks: Vec<Track>) {
        let current_id = self.current_track().map(|t| t.id.clone());
        self.queue = tracks;
        self.push_event(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });

        let preserved = match (self.config.queue_replace, current_id) {
            (QueueReplacePolicy::PreserveByIdentity, Some(id)) => {
                self.queue.iter().position(|t| t.id == id)
            }
            _ => None,
        };

        match preserved {
            Some(index) => {
                debug!(index, "Current track kept across queue replacement");
                self.current_index = Some(index);
            }
            None => self.stop_to_idle(),
        }

        info!(length = self.queue.len(), "Queue loaded");
    }

    /// Tracks in play order
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    // ===== Playback Control =====

    /// Play the track at `index` using `kind`
    ///
    /// On error the engine is left in the state it was in before the call.
    pub fn play_track(&mut self, index: usize, kind: TransitionKind) -> Result<()> {
        let len = self.queue.len();
        let Some(track) = self.queue.get(index).cloned() else {
            return Err(PlaybackError::IndexOutOfRange { index, len });
        };

        let prior = self.state;
        self.set_state(PlaybackState::Loading);

        let source = match self.provider.open(&track) {
            Ok(source) => source,
            Err(e) => {
                warn!(track = %track.id, error = %e, "Source unavailable");
                self.set_state(prior);
                let err = PlaybackError::TrackUnavailable {
                    track_id: track.id,
                    reason: e.to_string(),
                };
                self.push_event(PlaybackEvent::Error {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        let transition = match self.crossfade.transition(kind, track.clone(), source) {
            Ok(transition) => transition,
            Err(e) => {
                self.set_state(prior);
                return Err(e);
            }
        };

        let previous_track_id = self.current_track().map(|t| t.id.clone());
        self.current_index = Some(index);

        self.push_event(PlaybackEvent::TransitionStarted {
            from: transition.from,
            to: transition.to,
            kind,
        });
        self.push_event(PlaybackEvent::TrackChanged {
            index,
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.set_state(PlaybackState::Playing);

        self.recent.push(track.id.clone());
        self.log_play(track.id);
        Ok(())
    }

    /// Toggle between playing and paused
    ///
    /// From `Idle` this starts the queue from the top with a cut; with an
    /// empty queue it does nothing.
    pub fn toggle_play(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Idle => {
                if self.queue.is_empty() {
                    debug!("Toggle ignored: queue is empty");
                    return Ok(());
                }
                self.play_track(0, TransitionKind::Cut)
            }
            PlaybackState::Playing => {
                self.crossfade.settle();
                {
                    let mut mixer = lock(&self.mixer);
                    let active = mixer.active;
                    mixer.deck_mut(active).pause();
                }
                self.set_state(PlaybackState::Paused);
                Ok(())
            }
            PlaybackState::Paused => {
                {
                    let mut mixer = lock(&self.mixer);
                    let active = mixer.active;
                    let deck = mixer.deck_mut(active);
                    deck.resume()?;
                    deck.set_gain(1.0);
                }
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            PlaybackState::Loading => Ok(()),
        }
    }

    /// Advance according to shuffle and repeat (cut transition)
    ///
    /// Does nothing when there is no next track.
    pub fn play_next(&mut self) -> Result<()> {
        match self.next_index() {
            Some(index) => self.play_track(index, TransitionKind::Cut),
            None => Ok(()),
        }
    }

    /// Go back one track (cut transition)
    ///
    /// Does nothing at the head of the queue or when nothing is current.
    pub fn play_previous(&mut self) -> Result<()> {
        match QueueNavigator::previous(self.current_index) {
            Some(index) => self.play_track(index, TransitionKind::Cut),
            None => Ok(()),
        }
    }

    /// React to a deck running out of audio
    ///
    /// Ignored unless playing and `deck` is the active deck. Advances like
    /// [`play_next`](Self::play_next) but with the configured track-end
    /// transition. When nothing follows, the active deck is stopped and the
    /// engine pauses with the current index kept.
    pub fn handle_track_end(&mut self, deck: DeckId) -> Result<()> {
        if self.state != PlaybackState::Playing || deck != self.active_deck() {
            debug!(deck = %deck, state = ?self.state, "Ignoring track end");
            return Ok(());
        }

        if let Some(track_id) = self.current_track().map(|t| t.id.clone()) {
            self.push_event(PlaybackEvent::TrackEnded { track_id });
        }

        let Some(index) = self.next_index() else {
            self.stop_at_end();
            self.push_event(PlaybackEvent::QueueExhausted);
            info!("Queue exhausted");
            return Ok(());
        };

        if let Err(e) = self.play_track(index, self.config.on_track_end) {
            // The finished deck cannot keep "playing"
            self.stop_at_end();
            return Err(e);
        }
        Ok(())
    }

    /// Check the active deck for exhaustion and advance if it ran out
    ///
    /// Convenience for driver loops that have no end-of-stream callback.
    pub fn poll(&mut self) -> Result<()> {
        if self.state != PlaybackState::Playing {
            return Ok(());
        }

        let finished = {
            let mixer = lock(&self.mixer);
            let active = mixer.active;
            mixer.deck(active).is_finished().then_some(active)
        };

        match finished {
            Some(deck) => self.handle_track_end(deck),
            None => Ok(()),
        }
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
        debug!(shuffle, "Shuffle changed");
    }

    /// Get shuffle flag
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
        debug!(?repeat, "Repeat changed");
    }

    /// Get repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    // ===== Equalizer =====

    /// Set one EQ band gain (dB) on the active output path
    pub fn set_band_gain(&mut self, band: usize, gain_db: f32) -> Result<()> {
        {
            let mut mixer = lock(&self.mixer);
            let active = mixer.active;
            let Mixer { eq, output, .. } = &mut *mixer;
            eq.set_band_gain(band, gain_db, output.as_mut(), active)?;
        }
        self.push_event(PlaybackEvent::EqChanged { band, gain_db });
        Ok(())
    }

    /// All band gains (dB), in band order
    pub fn eq_gains(&self) -> Vec<f32> {
        lock(&self.mixer).eq.gains()
    }

    // ===== Volume =====

    /// Set master volume (0-100)
    pub fn set_volume(&mut self, level: u8) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Master volume level (0-100)
    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    /// Mute output
    pub fn mute(&mut self) {
        self.volume.mute();
        self.apply_volume();
    }

    /// Unmute output
    pub fn unmute(&mut self) {
        self.volume.unmute();
        self.apply_volume();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== State Queries =====

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Queue position of the current track
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// Whether the engine is in `Playing`
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Deck currently routed to the output
    pub fn active_deck(&self) -> DeckId {
        lock(&self.mixer).active
    }

    /// Read-only view of one deck
    pub fn deck(&self, id: DeckId) -> DeckSnapshot {
        lock(&self.mixer).deck(id).snapshot()
    }

    /// Whether a crossfade ramp is in flight
    pub fn is_crossfading(&self) -> bool {
        self.crossfade.is_active()
    }

    /// Recently played tracks
    pub fn recently_played(&self) -> &RecentlyPlayed {
        &self.recent
    }

    /// Configuration the manager was built with
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut lock(&self.mixer).events)
    }

    // ===== Internal =====

    fn next_index(&mut self) -> Option<usize> {
        QueueNavigator::next(
            self.queue.len(),
            self.current_index,
            self.shuffle,
            self.repeat,
            &mut self.rng,
        )
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.push_event(PlaybackEvent::StateChanged { state });
        }
    }

    fn push_event(&self, event: PlaybackEvent) {
        lock(&self.mixer).push_event(event);
    }

    /// Stop the active deck and pause with the index kept
    fn stop_at_end(&mut self) {
        self.crossfade.settle();
        {
            let mut mixer = lock(&self.mixer);
            let active = mixer.active;
            mixer.deck_mut(active).stop();
        }
        self.set_state(PlaybackState::Paused);
    }

    fn stop_to_idle(&mut self) {
        self.crossfade.halt();
        self.current_index = None;
        self.set_state(PlaybackState::Idle);
    }

    fn apply_volume(&mut self) {
        let mut mixer = lock(&self.mixer);
        mixer.output.set_master_gain(self.volume.gain());
        mixer.push_event(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    /// Fire-and-forget "track played" notification
    fn log_play(&self, track_id: TrackId) {
        let history = Arc::clone(&self.history);
        self.runtime.spawn(async move {
            if let Err(e) = history.track_played(&track_id).await {
                debug!(track = %track_id, error = %e, "Play history update failed");
            }
        });
    }
}
