//! Master volume
//!
//! A perceptual 0-100 control mapped onto -60..0 dB. It drives the output
//! device's master stage, which sits after the deck gains, so cut and
//! crossfade gains stay exact regardless of volume.

const FLOOR_DB: f32 = -60.0;

/// Master volume with mute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterVolume {
    level: u8,
    muted: bool,
}

impl MasterVolume {
    /// Create a volume control at `level` (clamped to 100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
            muted: false,
        }
    }

    /// Set level (clamped to 100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
    }

    /// Current level (0-100), preserved while muted
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Silence output without losing the level
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Restore the level
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Flip mute
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level in dB (-60 for silence or mute)
    pub fn to_db(&self) -> f32 {
        if self.muted || self.level == 0 {
            FLOOR_DB
        } else {
            (f32::from(self.level) - 100.0) * (-FLOOR_DB / 100.0)
        }
    }

    /// Linear multiplier for the master stage
    ///
    /// `10^(dB/20)`, with level 0 and mute mapping to exactly 0.0.
    pub fn gain(&self) -> f32 {
        if self.muted || self.level == 0 {
            0.0
        } else {
            10.0_f32.powf(self.to_db() / 20.0)
        }
    }
}

impl Default for MasterVolume {
    fn default() -> Self {
        Self::new(80)
    }
}
