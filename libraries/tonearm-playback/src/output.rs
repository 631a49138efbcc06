//! Output device abstraction
//!
//! Replaces a process-wide audio context: the engine is handed an explicit
//! device at construction and routes the equalized output path through it.

use crate::types::DeckId;

/// Output device the engine routes audio into
///
/// Implementations own device routing (which deck feeds the EQ chain),
/// the per-band gain stage and the master gain stage.
pub trait OutputDevice: Send {
    /// Route the equalized output path to `deck`
    fn route(&mut self, deck: DeckId);

    /// Apply one band gain (dB) to the path of `deck`
    fn apply_band(&mut self, deck: DeckId, band: usize, gain_db: f32);

    /// Set the master gain stage (linear)
    fn set_master_gain(&mut self, gain: f32);
}

/// Device that discards everything
///
/// Useful for headless runs and tests that only inspect deck state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl OutputDevice for NullOutput {
    fn route(&mut self, _deck: DeckId) {}

    fn apply_band(&mut self, _deck: DeckId, _band: usize, _gain_db: f32) {}

    fn set_master_gain(&mut self, _gain: f32) {}
}
