//! Shared test doubles for the playback integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tonearm_core::{Track, TrackId};
use tonearm_playback::{
    AudioSource, OutputDevice, PlayHistory, PlaybackConfig, PlaybackManager, SourceError,
    SourceProvider,
};

// ===== Sources =====

#[derive(Default)]
pub struct SourceLog {
    pub opened: Vec<TrackId>,
    pub finished: HashSet<TrackId>,
}

/// Provider whose streams never end unless told to
#[derive(Default)]
pub struct MockProvider {
    log: Arc<Mutex<SourceLog>>,
    unavailable: Mutex<HashSet<TrackId>>,
    refuse_start: Mutex<HashSet<TrackId>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `open` fail for a track
    pub fn make_unavailable(&self, id: &str) {
        self.unavailable.lock().unwrap().insert(TrackId::new(id));
    }

    /// Open the track normally but fail when its stream is started
    pub fn refuse_start(&self, id: &str) {
        self.refuse_start.lock().unwrap().insert(TrackId::new(id));
    }

    /// Make the playing stream of a track report exhaustion
    pub fn finish(&self, id: &str) {
        self.log.lock().unwrap().finished.insert(TrackId::new(id));
    }

    pub fn opened(&self) -> Vec<TrackId> {
        self.log.lock().unwrap().opened.clone()
    }
}

impl SourceProvider for MockProvider {
    fn open(&self, track: &Track) -> Result<Box<dyn AudioSource>, SourceError> {
        if self.unavailable.lock().unwrap().contains(&track.id) {
            return Err(SourceError::NotFound(track.id.to_string()));
        }
        self.log.lock().unwrap().opened.push(track.id.clone());
        Ok(Box::new(MockSource {
            id: track.id.clone(),
            log: Arc::clone(&self.log),
            playing: false,
            refuse_start: self.refuse_start.lock().unwrap().contains(&track.id),
        }))
    }
}

struct MockSource {
    id: TrackId,
    log: Arc<Mutex<SourceLog>>,
    playing: bool,
    refuse_start: bool,
}

impl AudioSource for MockSource {
    fn start(&mut self) -> tonearm_playback::Result<()> {
        if self.refuse_start {
            return Err(tonearm_playback::PlaybackError::TrackUnavailable {
                track_id: self.id.clone(),
                reason: "output stream rejected".to_string(),
            });
        }
        self.log.lock().unwrap().finished.remove(&self.id);
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) -> tonearm_playback::Result<()> {
        self.playing = true;
        Ok(())
    }

    fn set_gain(&mut self, _gain: f32) {}

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn is_finished(&self) -> bool {
        self.playing && self.log.lock().unwrap().finished.contains(&self.id)
    }
}

// ===== Output =====

#[derive(Default)]
pub struct OutputLog {
    pub routed: Vec<tonearm_playback::DeckId>,
    pub bands: Vec<(tonearm_playback::DeckId, usize, f32)>,
    pub master: Vec<f32>,
}

#[derive(Clone, Default)]
pub struct RecordingOutput(pub Arc<Mutex<OutputLog>>);

impl OutputDevice for RecordingOutput {
    fn route(&mut self, deck: tonearm_playback::DeckId) {
        self.0.lock().unwrap().routed.push(deck);
    }

    fn apply_band(&mut self, deck: tonearm_playback::DeckId, band: usize, gain_db: f32) {
        self.0.lock().unwrap().bands.push((deck, band, gain_db));
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.0.lock().unwrap().master.push(gain);
    }
}

// ===== History =====

#[derive(Default)]
pub struct RecordingHistory(pub Mutex<Vec<TrackId>>);

#[async_trait]
impl PlayHistory for RecordingHistory {
    async fn track_played(&self, track_id: &TrackId) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(track_id.clone());
        Ok(())
    }
}

pub struct FailingHistory;

#[async_trait]
impl PlayHistory for FailingHistory {
    async fn track_played(&self, _track_id: &TrackId) -> anyhow::Result<()> {
        anyhow::bail!("history service unreachable")
    }
}

// ===== Builders =====

pub fn tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| Track::new(format!("t{i}"), format!("Song {i}"), "Artist", "Album", 180.0))
        .collect()
}

pub struct Harness {
    pub manager: PlaybackManager,
    pub provider: Arc<MockProvider>,
    pub output: RecordingOutput,
}

/// Manager with a mock provider and a recording output, queue of `count`
pub fn harness(config: PlaybackConfig, count: usize) -> Harness {
    let provider = MockProvider::new();
    let output = RecordingOutput::default();
    let mut manager =
        PlaybackManager::new(config, provider.clone(), Box::new(output.clone())).unwrap();
    manager.load_queue(tracks(count));
    manager.drain_events();
    Harness {
        manager,
        provider,
        output,
    }
}
