//! Top-level error type.

use crate::audio::AudioCaptureError;
use crate::config::ConfigError;
use crate::rendering::GraphicsInitError;

/// Any failure that ends the visualizer with a non-zero status
#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("audio capture error: {0}")]
    Audio(#[from] AudioCaptureError),
    #[error("graphics error: {0}")]
    Graphics(#[from] GraphicsInitError),
}
