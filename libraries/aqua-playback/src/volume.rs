//! Volume level
//!
//! Gain handed to the transport, kept in `[0.0, 1.0]`. Out-of-range requests
//! are clamped rather than rejected.

/// Clamped volume level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Level in 0.0-1.0
    level: f32,
}

impl Volume {
    /// Create a volume, clamping `level` into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
        }
    }

    /// Set level, clamping into range
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp(level);
    }

    /// Current level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as a whole percentage, for display
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// NaN maps to silence
    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
