//! Shared mixer state
//!
//! Everything the crossfade ramp task touches lives here, behind one mutex
//! shared by the manager, the controller and the ramp. The lock is never held
//! across an `.await`.

use crate::{
    deck::Deck, equalizer::EqualizerBank, events::PlaybackEvent, output::OutputDevice,
    types::DeckId,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

pub(crate) type SharedMixer = Arc<Mutex<Mixer>>;

/// An in-flight crossfade ramp
pub(crate) struct Fade {
    pub token: CancellationToken,

    /// Deck fading out (`None` when ramping in from silence)
    pub outgoing: Option<DeckId>,

    /// Deck fading in (always the active deck)
    pub incoming: DeckId,
}

pub(crate) struct Mixer {
    pub decks: [Deck; 2],
    pub active: DeckId,
    pub eq: EqualizerBank,
    pub output: Box<dyn OutputDevice>,
    pub fade: Option<Fade>,
    pub events: Vec<PlaybackEvent>,
}

impl Mixer {
    pub fn new(eq: EqualizerBank, output: Box<dyn OutputDevice>) -> Self {
        Self {
            decks: [Deck::new(DeckId::A), Deck::new(DeckId::B)],
            active: DeckId::A,
            eq,
            output,
            fade: None,
            events: Vec::new(),
        }
    }

    pub fn shared(self) -> SharedMixer {
        Arc::new(Mutex::new(self))
    }

    pub fn deck(&self, id: DeckId) -> &Deck {
        &self.decks[id.index()]
    }

    pub fn deck_mut(&mut self, id: DeckId) -> &mut Deck {
        &mut self.decks[id.index()]
    }

    /// Make `id` the audible deck and move the EQ chain onto it
    pub fn activate(&mut self, id: DeckId) {
        self.active = id;
        self.eq.route_to(self.output.as_mut(), id);
    }

    /// Silence and stop a deck immediately
    pub fn force_stop(&mut self, id: DeckId) {
        let deck = self.deck_mut(id);
        deck.set_gain(0.0);
        deck.stop();
    }

    pub fn push_event(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }
}

/// Lock the mixer, recovering from a poisoned mutex
pub(crate) fn lock(mixer: &Mutex<Mixer>) -> MutexGuard<'_, Mixer> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}
