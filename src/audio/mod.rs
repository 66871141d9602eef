//! Live audio capture.
//!
//! A source hands out fixed-duration blocks of interleaved stereo 16-bit
//! samples. The render loop feeds each result through [`SampleFrames`],
//! which decides what a failed capture looks like on screen.

mod capture;
mod frames;

// Re-export public types
pub use capture::CpalCapture;
pub use frames::SampleFrames;

/// Errors raised while opening or reading the capture device.
#[derive(Debug, thiserror::Error)]
pub enum AudioCaptureError {
    #[error("no audio input device found")]
    NoInputDevice,
    #[error("failed to query input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported input sample format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("input stream error: {0}")]
    Stream(String),
    #[error("capture timed out after {received} of {wanted} samples")]
    Timeout { wanted: usize, received: usize },
    #[error("capture buffer poisoned by a panicked audio callback")]
    Poisoned,
}

/// Producer of captured audio blocks
pub trait AudioSource {
    /// Block the caller for `duration_ms` of audio and return it interleaved
    fn capture(&mut self, duration_ms: u32) -> Result<Vec<i16>, AudioCaptureError>;
}
