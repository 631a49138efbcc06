//! Equalizer bank
//!
//! N independent band gains applied to whichever deck is currently routed to
//! the output. Gains belong to the output path, not to a deck or a track, so
//! they survive every transition.

use crate::{
    error::{PlaybackError, Result},
    output::OutputDevice,
    types::DeckId,
};
use tracing::debug;

/// 10-band ISO standard frequencies (Hz)
pub const ISO_10_BAND_FREQUENCIES: [f32; 10] = [
    31.5, 63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0, 16000.0,
];

/// 31-band third-octave frequencies (Hz)
pub const ISO_31_BAND_FREQUENCIES: [f32; 31] = [
    20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
    500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0,
    8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
];

const MIN_FREQUENCY_HZ: f32 = 20.0;
const MAX_FREQUENCY_HZ: f32 = 20000.0;

/// One equalizer band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBand {
    /// Nominal centre frequency (descriptive, not used for filtering here)
    pub frequency_hz: f32,

    /// Gain in dB
    pub gain_db: f32,
}

/// Bank of band gains on the output path
#[derive(Debug, Clone)]
pub struct EqualizerBank {
    bands: Vec<EqBand>,
}

impl EqualizerBank {
    /// Create a flat bank with `band_count` bands
    pub fn new(band_count: usize) -> Self {
        let bands = band_frequencies(band_count)
            .into_iter()
            .map(|frequency_hz| EqBand {
                frequency_hz,
                gain_db: 0.0,
            })
            .collect();
        Self { bands }
    }

    /// Number of bands
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// All bands in order
    pub fn bands(&self) -> &[EqBand] {
        &self.bands
    }

    /// Band gains (dB) in order
    pub fn gains(&self) -> Vec<f32> {
        self.bands.iter().map(|b| b.gain_db).collect()
    }

    /// Set one band gain and push it to the active output path
    pub fn set_band_gain(
        &mut self,
        band: usize,
        gain_db: f32,
        output: &mut dyn OutputDevice,
        active: DeckId,
    ) -> Result<()> {
        let bands = self.bands.len();
        let slot = self
            .bands
            .get_mut(band)
            .ok_or(PlaybackError::InvalidBand { band, bands })?;

        if !gain_db.is_finite() {
            return Err(PlaybackError::InvalidGain(gain_db));
        }

        slot.gain_db = gain_db;
        output.apply_band(active, band, gain_db);
        debug!(band, gain_db, deck = %active, "EQ band updated");
        Ok(())
    }

    /// Route the output to `deck` and re-apply every band to it
    pub fn route_to(&self, output: &mut dyn OutputDevice, deck: DeckId) {
        output.route(deck);
        for (index, band) in self.bands.iter().enumerate() {
            output.apply_band(deck, index, band.gain_db);
        }
    }

    /// Linear multiplier for a band (`10^(dB/20)`)
    pub fn linear_gain(&self, band: usize) -> Option<f32> {
        self.bands
            .get(band)
            .map(|b| 10.0_f32.powf(b.gain_db / 20.0))
    }
}

/// Centre frequencies for a bank of `count` bands
///
/// ISO sets for 10 and 31 bands, log-spaced 20 Hz to 20 kHz otherwise.
fn band_frequencies(count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![1000.0],
        10 => ISO_10_BAND_FREQUENCIES.to_vec(),
        31 => ISO_31_BAND_FREQUENCIES.to_vec(),
        n => {
            let ratio = (MAX_FREQUENCY_HZ / MIN_FREQUENCY_HZ).ln();
            (0..n)
                .map(|i| MIN_FREQUENCY_HZ * (ratio * i as f32 / (n - 1) as f32).exp())
                .collect()
        }
    }
}
