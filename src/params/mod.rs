//! Runtime parameters with documented units and ranges.
//!
//! Every tunable of the visualizer lives here, grouped by subsystem:
//! - Bar row (count, margin)
//! - Audio capture (rate, block length, failure policy)
//! - Window and color

mod audio;
mod bars;
mod render;

// Re-export all types
pub use audio::{audio_constants, CaptureConfig, CaptureErrorPolicy};
pub use bars::BarConfig;
pub use render::RenderConfig;
