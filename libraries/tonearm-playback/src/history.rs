//! Play history
//!
//! Two pieces:
//! - [`PlayHistory`]: the external collaborator that is told, fire-and-forget,
//!   that a track started playing
//! - [`RecentlyPlayed`]: a bounded in-memory list of what this engine played

use async_trait::async_trait;
use std::collections::VecDeque;
use tonearm_core::TrackId;

/// External "track played" log
///
/// Called from a detached task. Errors are swallowed by the engine and never
/// affect playback state; implementations must not retry on their own.
#[async_trait]
pub trait PlayHistory: Send + Sync {
    /// Record that `track_id` started playing
    async fn track_played(&self, track_id: &TrackId) -> anyhow::Result<()>;
}

/// History sink that records nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHistory;

#[async_trait]
impl PlayHistory for NoopHistory {
    async fn track_played(&self, _track_id: &TrackId) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Bounded list of recently played tracks
///
/// Ring buffer: once full, the oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    /// Most recent = back
    tracks: VecDeque<TrackId>,
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create an empty list holding at most `max_size` entries
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a play
    pub fn push(&mut self, track_id: TrackId) {
        if self.max_size == 0 {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(track_id);
    }

    /// Most recent play
    pub fn last(&self) -> Option<&TrackId> {
        self.tracks.back()
    }

    /// All entries, oldest first
    pub fn get_all(&self) -> Vec<&TrackId> {
        self.tracks.iter().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether nothing has been played
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(50)
    }
}
