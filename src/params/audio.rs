//! Audio capture configuration and constants.

use serde::Deserialize;

use crate::config::ConfigError;

/// What a frame shows when the audio block for it could not be captured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureErrorPolicy {
    /// Render an empty block: every bar collapses to zero height
    #[default]
    Silence,

    /// Keep rendering the last block that was captured successfully
    Hold,

    /// Stop the visualizer with a failure status
    Abort,
}

/// Live capture configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Capture sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Interleaved channel count
    pub channels: u16,

    /// Length of the block captured for each rendered frame (milliseconds)
    /// 22ms ≈ 45 frames per second
    pub capture_ms: u32,

    /// Extra time a capture may wait for the device before timing out
    pub capture_timeout_ms: u32,

    /// Failure handling for individual captures
    pub on_error: CaptureErrorPolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::SAMPLE_RATE_HZ,
            channels: audio_constants::CHANNELS,
            capture_ms: audio_constants::DEFAULT_CAPTURE_MS,
            capture_timeout_ms: 250,
            on_error: CaptureErrorPolicy::default(),
        }
    }
}

impl CaptureConfig {
    /// Number of interleaved samples in a block of `duration_ms`
    pub fn samples_for(&self, duration_ms: u32) -> usize {
        let frames = u64::from(self.sample_rate_hz) * u64::from(duration_ms) / 1000;
        frames as usize * usize::from(self.channels)
    }

    /// Validate configuration (positive capture length, non-zero rate)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture_ms == 0 {
            return Err(ConfigError::InvalidConfiguration {
                key: "CaptureMs",
                reason: "capture length must be > 0".to_string(),
            });
        }
        if self.sample_rate_hz == 0 || self.channels == 0 {
            return Err(ConfigError::InvalidConfiguration {
                key: "CaptureMs",
                reason: "sample rate and channel count must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Audio constants (fixed stereo 16-bit PCM)
pub mod audio_constants {
    /// Capture sample rate (Hz)
    pub const SAMPLE_RATE_HZ: u32 = 44_100;

    /// Stereo, interleaved left/right
    pub const CHANNELS: u16 = 2;

    /// Block length captured per frame (milliseconds)
    pub const DEFAULT_CAPTURE_MS: u32 = 22;
}
