//! Subcommand implementations

pub mod classify;
pub mod play;

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tonearm_core::Track;

/// One entry of a track list file
///
/// A plain [`Track`] object, optionally carrying the mean chroma vector used
/// for key estimation.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackInput {
    #[serde(flatten)]
    pub track: Track,

    #[serde(default)]
    pub chroma: Option<Vec<f32>>,
}

/// Read a JSON array of tracks
pub fn load_tracks(path: &Path) -> Result<Vec<TrackInput>> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let tracks: Vec<TrackInput> =
        serde_json::from_str(&raw).map_err(|source| CliError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    if tracks.is_empty() {
        return Err(CliError::EmptyQueue(path.to_path_buf()));
    }

    tracing::debug!(count = tracks.len(), path = ?path, "Track list loaded");
    Ok(tracks)
}
