//! Simulated audio backend
//!
//! Stands in for a real decoder and sound card: a source is a stopwatch on
//! the tokio clock that runs out after the track's duration (sped up by the
//! time scale), and the output device just logs what it is told.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tonearm_core::{Track, TrackId};
use tonearm_playback::{
    AudioSource, DeckId, OutputDevice, PlayHistory, SourceError, SourceProvider,
};
use tracing::{debug, info};

/// Opens a [`SimulatedSource`] for any track with a positive duration
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    time_scale: f64,
}

impl SimulatedProvider {
    pub fn new(time_scale: f64) -> Self {
        Self { time_scale }
    }
}

impl SourceProvider for SimulatedProvider {
    fn open(&self, track: &Track) -> Result<Box<dyn AudioSource>, SourceError> {
        let length = track.duration();
        if length.is_zero() {
            return Err(SourceError::Stream(format!(
                "{} has no playable duration",
                track.id
            )));
        }
        debug!(track = %track.id, secs = length.as_secs_f64(), "Opening simulated stream");
        Ok(Box::new(SimulatedSource::new(
            track.id.clone(),
            length,
            self.time_scale,
        )))
    }
}

/// Wall-clock stream of a fixed length
#[derive(Debug)]
pub struct SimulatedSource {
    track_id: TrackId,
    length: Duration,
    time_scale: f64,
    started_at: Option<Instant>,
    played: Duration,
    gain: f32,
}

impl SimulatedSource {
    pub fn new(track_id: TrackId, length: Duration, time_scale: f64) -> Self {
        Self {
            track_id,
            length,
            time_scale,
            started_at: None,
            played: Duration::ZERO,
            gain: 0.0,
        }
    }

    /// Current linear gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    fn running(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }
}

impl AudioSource for SimulatedSource {
    fn start(&mut self) -> tonearm_playback::Result<()> {
        self.played = Duration::ZERO;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn stop(&mut self) {
        self.started_at = None;
        self.played = Duration::ZERO;
    }

    fn pause(&mut self) {
        self.played += self.running();
        self.started_at = None;
    }

    fn resume(&mut self) -> tonearm_playback::Result<()> {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    fn position(&self) -> Duration {
        let scaled = (self.played + self.running()).as_secs_f64() * self.time_scale;
        match Duration::try_from_secs_f64(scaled) {
            Ok(position) => position.min(self.length),
            // Past anything a Duration can hold
            Err(_) if scaled > 0.0 => self.length,
            Err(_) => Duration::ZERO,
        }
    }

    fn is_finished(&self) -> bool {
        self.position() >= self.length
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        debug!(track = %self.track_id, "Simulated stream closed");
    }
}

/// Output device that logs routing and gain changes
#[derive(Debug, Default)]
pub struct TracingOutput;

impl OutputDevice for TracingOutput {
    fn route(&mut self, deck: DeckId) {
        debug!(deck = %deck, "Output routed");
    }

    fn apply_band(&mut self, deck: DeckId, band: usize, gain_db: f32) {
        debug!(deck = %deck, band, gain_db, "EQ band applied");
    }

    fn set_master_gain(&mut self, gain: f32) {
        debug!(gain, "Master gain");
    }
}

/// Play history that writes to the log
#[derive(Debug, Default)]
pub struct LogHistory;

#[async_trait]
impl PlayHistory for LogHistory {
    async fn track_played(&self, track_id: &TrackId) -> anyhow::Result<()> {
        info!(track = %track_id, "Track played");
        Ok(())
    }
}
