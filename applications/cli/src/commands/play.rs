//! `tonearm play`: drive the engine through a queue on simulated audio

use crate::config::CliConfig;
use crate::error::Result;
use crate::simulate::{LogHistory, SimulatedProvider, TracingOutput};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tonearm_core::{Track, TrackId};
use tonearm_playback::{
    PlaybackEvent, PlaybackManager, PlaybackState, RepeatMode, TransitionKind,
};
use tracing::{debug, info, warn};

/// Command-line overrides on top of [`CliConfig`]
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    /// Crossfade into the next track at track end
    pub crossfade: bool,
    pub shuffle: bool,
    pub repeat: Option<RepeatMode>,
    /// Stop after this many tracks have played to their end
    pub max_tracks: Option<usize>,
    /// Fixed shuffle seed
    pub seed: Option<u64>,
}

/// Why the play loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Last track ended with repeat off
    QueueExhausted,
    /// `max_tracks` reached
    TrackLimit,
    /// Engine left `Playing` on its own
    Halted,
    /// Shutdown requested
    Interrupted,
}

/// Outcome of a play run
#[derive(Debug, Clone, Serialize)]
pub struct PlaySummary {
    /// Tracks in the order they were started
    pub started: Vec<TrackId>,
    /// Tracks that played to their end
    pub finished: Vec<TrackId>,
    pub reason: StopReason,
    pub final_state: PlaybackState,
}

/// Play `tracks` until the queue runs out, the track limit is hit or
/// `shutdown` fires
pub async fn play(
    tracks: Vec<Track>,
    config: &CliConfig,
    options: PlayOptions,
    shutdown: CancellationToken,
) -> Result<PlaySummary> {
    let mut playback = config.playback.clone();
    if options.crossfade {
        playback.on_track_end = TransitionKind::Crossfade;
    }
    if options.shuffle {
        playback.shuffle = true;
    }
    if let Some(repeat) = options.repeat {
        playback.repeat = repeat;
    }

    let provider = Arc::new(SimulatedProvider::new(config.simulation.time_scale));
    let mut manager = PlaybackManager::new(playback, provider, Box::new(TracingOutput))?;
    manager.set_history(Arc::new(LogHistory));
    if let Some(seed) = options.seed {
        manager.seed_shuffle(seed);
    }

    manager.load_queue(tracks);
    manager.toggle_play()?;

    info!(
        tracks = manager.queue().len(),
        on_track_end = ?manager.config().on_track_end,
        repeat = ?manager.repeat(),
        shuffle = manager.shuffle(),
        "Playback started"
    );

    let mut started = Vec::new();
    let mut finished = Vec::new();

    let mut ticker =
        tokio::time::interval(Duration::from_millis(config.simulation.poll_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        tokio::select! {
            () = shutdown.cancelled() => break StopReason::Interrupted,
            _ = ticker.tick() => {}
        }

        if let Err(e) = manager.poll() {
            warn!(error = %e, "Could not advance to the next track");
        }

        let mut exhausted = false;
        for event in manager.drain_events() {
            log_event(&event);
            match event {
                PlaybackEvent::TrackChanged { track_id, .. } => started.push(track_id),
                PlaybackEvent::TrackEnded { track_id } => finished.push(track_id),
                PlaybackEvent::QueueExhausted => exhausted = true,
                _ => {}
            }
        }

        if exhausted {
            break StopReason::QueueExhausted;
        }
        if options.max_tracks.is_some_and(|max| finished.len() >= max) {
            break StopReason::TrackLimit;
        }
        if manager.state() != PlaybackState::Playing {
            break StopReason::Halted;
        }
    };

    if manager.is_playing() {
        manager.toggle_play()?;
    }
    for event in manager.drain_events() {
        log_event(&event);
    }

    info!(
        reason = ?reason,
        started = started.len(),
        finished = finished.len(),
        recent = manager.recently_played().len(),
        "Playback stopped"
    );

    Ok(PlaySummary {
        started,
        finished,
        reason,
        final_state: manager.state(),
    })
}

fn log_event(event: &PlaybackEvent) {
    match event {
        PlaybackEvent::TrackChanged {
            index, track_id, ..
        } => info!(index, track = %track_id, "Now playing"),
        PlaybackEvent::TransitionStarted { from, to, kind } => {
            debug!(from = ?from, to = %to, kind = ?kind, "Transition started");
        }
        PlaybackEvent::CrossfadeCompleted { deck } => info!(deck = %deck, "Crossfade complete"),
        PlaybackEvent::CrossfadeCancelled { deck } => {
            debug!(deck = %deck, "Crossfade cancelled");
        }
        PlaybackEvent::TrackEnded { track_id } => debug!(track = %track_id, "Track ended"),
        PlaybackEvent::QueueExhausted => info!("End of queue"),
        PlaybackEvent::Error { message } => warn!(%message, "Playback error"),
        other => debug!(event = ?other, "Playback event"),
    }
}
