//! Tonearm - Dual-Deck Playback
//!
//! Platform-agnostic playback engine built around two symmetric decks.
//!
//! This crate provides:
//! - Two decks with independent gain stages
//! - Hard-cut and crossfade transitions (time-driven gain ramps)
//! - Multi-band equalizer on the active output path
//! - Shuffle and repeat (Off, All, One) navigation
//! - Master volume (logarithmic, 0-100%, mute/unmute)
//! - Recently played list and fire-and-forget play history
//! - Event queue for UI synchronization
//!
//! # Architecture
//!
//! `tonearm-playback` never touches an audio device or a decoder directly:
//! - Streams come from a [`SourceProvider`]
//! - Routing, EQ and master gain go to an injected [`OutputDevice`]
//! - Play logging goes to a [`PlayHistory`]
//!
//! Crossfade ramps and history logging run on the tokio runtime the
//! manager was created in.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tonearm_core::Track;
//! use tonearm_playback::{
//!     AudioSource, NullOutput, PlaybackConfig, PlaybackManager, SourceError, SourceProvider,
//!     TransitionKind,
//! };
//!
//! struct Streams;
//!
//! impl SourceProvider for Streams {
//!     fn open(&self, track: &Track) -> Result<Box<dyn AudioSource>, SourceError> {
//!         Err(SourceError::NotFound(track.id.to_string()))
//!     }
//! }
//!
//! # async fn run() -> tonearm_playback::Result<()> {
//! let mut manager = PlaybackManager::new(
//!     PlaybackConfig::default(),
//!     Arc::new(Streams),
//!     Box::new(NullOutput),
//! )?;
//!
//! manager.load_queue(vec![
//!     Track::new("t1", "Intro", "Artist", "Album", 95.0),
//!     Track::new("t2", "Second", "Artist", "Album", 210.0),
//! ]);
//! manager.play_track(0, TransitionKind::Cut)?;
//! manager.play_track(1, TransitionKind::Crossfade)?;
//! manager.set_band_gain(2, -3.0)?;
//!
//! for event in manager.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

mod crossfade;
mod deck;
mod equalizer;
mod error;
mod events;
mod history;
mod manager;
mod mixer;
mod output;
mod queue;
mod source;
pub mod types;
mod volume;

// Public exports
pub use crossfade::{
    CrossfadeController, CrossfadeSettings, FadeCurve, Transition, MAX_CROSSFADE_MS,
};
pub use deck::{Deck, DeckSnapshot};
pub use equalizer::{EqBand, EqualizerBank, ISO_10_BAND_FREQUENCIES, ISO_31_BAND_FREQUENCIES};
pub use error::{PlaybackError, Result, SourceError};
pub use events::PlaybackEvent;
pub use history::{NoopHistory, PlayHistory, RecentlyPlayed};
pub use manager::PlaybackManager;
pub use output::{NullOutput, OutputDevice};
pub use queue::QueueNavigator;
pub use source::{AudioSource, SourceProvider};
pub use types::{
    DeckId, DeckState, PlaybackConfig, PlaybackState, QueueReplacePolicy, RepeatMode,
    TransitionKind,
};
pub use volume::MasterVolume;
