//! Deck transitions
//!
//! Two policies move playback from the active deck to the idle one:
//! - Cut: instant switch under one lock
//! - Crossfade: complementary gain ramps driven by elapsed time on a
//!   background task
//!
//! Fade curves:
//! - Linear: gains sum to 1 (default; has a 3dB power dip at the midpoint)
//! - SquareRoot: faster rise than linear
//! - S-Curve: slow start and end
//! - Equal Power: constant perceived loudness

use crate::{
    error::Result,
    events::PlaybackEvent,
    mixer::{lock, Fade, Mixer, SharedMixer},
    source::AudioSource,
    types::{DeckId, DeckState, TransitionKind},
};
use serde::{Deserialize, Serialize};
use std::{f32::consts::PI, time::Duration};
use tokio::{
    runtime::Handle,
    time::{interval, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tonearm_core::Track;
use tracing::{debug, error, info, warn};

/// Longest allowed crossfade window
pub const MAX_CROSSFADE_MS: u32 = 10_000;

/// Crossfade curve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeCurve {
    /// Linear fade: fade-in and fade-out gains always sum to 1.0
    #[default]
    Linear,

    /// Square root fade (t^0.5)
    SquareRoot,

    /// S-Curve fade: slow start, fast middle, slow end
    SCurve,

    /// Equal power fade: sin/cos pair, constant summed power
    EqualPower,
}

impl FadeCurve {
    /// Calculate the fade gain at a given position
    ///
    /// # Arguments
    /// * `position` - Normalized position in the fade (0.0 to 1.0)
    /// * `fade_out` - If true, calculates fade-out gain; if false, fade-in gain
    ///
    /// # Returns
    /// Gain multiplier (0.0 to 1.0)
    #[inline]
    pub fn calculate_gain(&self, position: f32, fade_out: bool) -> f32 {
        let position = position.clamp(0.0, 1.0);
        let t = if fade_out { 1.0 - position } else { position };

        match self {
            FadeCurve::Linear => t,
            FadeCurve::SquareRoot => t.max(0.0).sqrt(),
            FadeCurve::SCurve => (1.0 - (PI * t).cos()) * 0.5,
            FadeCurve::EqualPower => (t * PI * 0.5).sin(),
        }
    }

    /// Get a human-readable name for the curve
    pub fn display_name(&self) -> &'static str {
        match self {
            FadeCurve::Linear => "Linear",
            FadeCurve::SquareRoot => "Square Root",
            FadeCurve::SCurve => "S-Curve",
            FadeCurve::EqualPower => "Equal Power",
        }
    }
}

/// Crossfade settings, fixed for the engine lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossfadeSettings {
    /// Crossfade window in milliseconds (0 = instant, max 10000)
    pub duration_ms: u32,

    /// Fade curve type
    pub curve: FadeCurve,

    /// Gain update period in milliseconds
    pub tick_ms: u32,
}

impl Default for CrossfadeSettings {
    fn default() -> Self {
        Self {
            duration_ms: 4000,
            curve: FadeCurve::Linear,
            tick_ms: 20,
        }
    }
}

impl CrossfadeSettings {
    /// Create settings with a specific duration (clamped to 10 s)
    pub fn with_duration(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms.min(MAX_CROSSFADE_MS),
            ..Self::default()
        }
    }

    /// Crossfade window
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.duration_ms.min(MAX_CROSSFADE_MS)))
    }

    /// Gain update period (at least 1 ms)
    pub fn tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_ms.max(1)))
    }
}

/// Outcome of an initiated transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Deck that was audible before (if any)
    pub from: Option<DeckId>,

    /// Deck that is now active
    pub to: DeckId,
}

/// Executes transitions between the two decks
///
/// Loading always targets the deck that is not active. A transition
/// requested while a ramp is in flight cancels that ramp first: the deck
/// fading out is force-stopped and the deck fading in becomes the outgoing
/// side of the new transition.
pub struct CrossfadeController {
    mixer: SharedMixer,
    settings: CrossfadeSettings,
    runtime: Handle,
}

impl CrossfadeController {
    pub(crate) fn new(mixer: SharedMixer, settings: CrossfadeSettings, runtime: Handle) -> Self {
        Self {
            mixer,
            settings,
            runtime,
        }
    }

    /// Settings in effect
    pub fn settings(&self) -> &CrossfadeSettings {
        &self.settings
    }

    /// Whether a crossfade ramp is in flight
    pub fn is_active(&self) -> bool {
        lock(&self.mixer).fade.is_some()
    }

    /// Load `track` on the idle deck and switch to it
    ///
    /// Returns once the transition is initiated; a crossfade ramp keeps
    /// running in the background. If the new deck cannot be started, a ramp
    /// that was interrupted is settled with the active deck at full gain.
    pub fn transition(
        &self,
        kind: TransitionKind,
        track: Track,
        source: Box<dyn AudioSource>,
    ) -> Result<Transition> {
        let mut mixer = lock(&self.mixer);
        let interrupted = cancel_fade(&mut mixer);

        let outgoing = mixer.active;
        let target = outgoing.other();
        let track_id = track.id.clone();
        let from = (mixer.deck(outgoing).state() == DeckState::Playing).then_some(outgoing);

        let loaded = mixer.deck_mut(target).load(track, source);
        let started = loaded
            .map_err(|e| {
                error!(deck = %target, error = %e, "Idle deck refused load");
                e
            })
            .and_then(|()| mixer.deck_mut(target).start());

        if let Err(e) = started {
            // The interrupted ramp cannot resume; leave the active deck fully up
            if interrupted {
                mixer.deck_mut(outgoing).set_gain(1.0);
            }
            warn!(track = %track_id, deck = %target, error = %e, "Transition aborted");
            return Err(e);
        }

        if from.is_none() {
            // Paused or stopped leftovers never overlap the new track
            mixer.force_stop(outgoing);
        }

        match kind {
            TransitionKind::Cut => {
                mixer.deck_mut(target).set_gain(1.0);
                if let Some(old) = from {
                    mixer.force_stop(old);
                }
                mixer.activate(target);
                info!(track = %track_id, deck = %target, "Cut");
            }
            TransitionKind::Crossfade => {
                mixer.activate(target);

                if self.settings.duration().is_zero() {
                    if let Some(old) = from {
                        mixer.force_stop(old);
                    }
                    mixer.deck_mut(target).set_gain(1.0);
                    mixer.push_event(PlaybackEvent::CrossfadeCompleted { deck: target });
                } else {
                    let token = CancellationToken::new();
                    mixer.fade = Some(Fade {
                        token: token.clone(),
                        outgoing: from,
                        incoming: target,
                    });
                    self.runtime.spawn(run_ramp(
                        self.mixer.clone(),
                        token,
                        from,
                        target,
                        self.settings,
                        Instant::now(),
                    ));
                }
                info!(
                    track = %track_id,
                    from = ?from,
                    to = %target,
                    duration_ms = self.settings.duration_ms,
                    "Crossfade started"
                );
            }
        }

        Ok(Transition { from, to: target })
    }

    /// Abandon any in-flight ramp and leave only the active deck audible
    pub fn settle(&self) {
        let mut mixer = lock(&self.mixer);
        if cancel_fade(&mut mixer) {
            let active = mixer.active;
            mixer.deck_mut(active).set_gain(1.0);
        }
    }

    /// Cancel any ramp and stop both decks
    pub fn halt(&self) {
        let mut mixer = lock(&self.mixer);
        cancel_fade(&mut mixer);
        mixer.force_stop(DeckId::A);
        mixer.force_stop(DeckId::B);
    }
}

/// Cancel the in-flight ramp, force-stopping the deck it was fading out
///
/// Returns whether a ramp was cancelled.
fn cancel_fade(mixer: &mut Mixer) -> bool {
    let Some(fade) = mixer.fade.take() else {
        return false;
    };

    fade.token.cancel();
    if let Some(out) = fade.outgoing {
        mixer.force_stop(out);
        mixer.push_event(PlaybackEvent::CrossfadeCancelled { deck: out });
    }
    debug!(
        outgoing = ?fade.outgoing,
        incoming = %fade.incoming,
        "Crossfade cancelled"
    );
    true
}

/// Drive complementary gains from elapsed time until the window closes
async fn run_ramp(
    mixer: SharedMixer,
    token: CancellationToken,
    from: Option<DeckId>,
    to: DeckId,
    settings: CrossfadeSettings,
    started: Instant,
) {
    let window = settings.duration().as_secs_f32();
    let mut ticker = interval(settings.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = token.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let progress = (started.elapsed().as_secs_f32() / window).min(1.0);

        let mut guard = lock(&mixer);
        // A newer transition may have cancelled us while we waited for the lock
        if token.is_cancelled() {
            return;
        }

        guard
            .deck_mut(to)
            .set_gain(settings.curve.calculate_gain(progress, false));
        if let Some(old) = from {
            guard
                .deck_mut(old)
                .set_gain(settings.curve.calculate_gain(progress, true));
        }

        if progress >= 1.0 {
            if let Some(old) = from {
                guard.force_stop(old);
            }
            guard.deck_mut(to).set_gain(1.0);
            guard.fade = None;
            guard.push_event(PlaybackEvent::CrossfadeCompleted { deck: to });
            debug!(deck = %to, "Crossfade completed");
            return;
        }
    }
}
