//! Bar layout engine: row geometry and amplitude-to-height mapping.
//!
//! The row is laid out once from a bar count and margin. Every frame each bar
//! is regenerated from a captured sample; its quad is expressed directly in
//! clip space so it can be uploaded without a transform.

mod bar;
mod layout;
mod set;

// Re-export public types
pub use bar::Bar;
pub use layout::{BarLayout, FALLBACK_COVERAGE, LAYOUT_SCALE, MAX_BARS};
pub use set::BarSet;

use bytemuck::{Pod, Zeroable};

/// Height units per unit of 16-bit amplitude (±32757 spans the two-unit clip height)
pub const AMPLITUDE_STEP: f64 = 2.0 / 32757.0;

/// Two triangles per bar
pub const VERTICES_PER_BAR: usize = 6;

/// Largest vertex buffer a default-limits wgpu device accepts (256 MiB)
pub const MAX_VERTEX_BUFFER_BYTES: u64 = 1 << 28;

/// Vertex data for a bar quad (clip-space position)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

impl Vertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }
}

/// Bar height for a raw sample; out-of-range values are not clamped
pub fn amplitude_to_height(sample: i16) -> f32 {
    (f64::from(sample) * AMPLITUDE_STEP) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_buffer_cap_matches_device_default() {
        assert_eq!(
            MAX_VERTEX_BUFFER_BYTES,
            wgpu::Limits::default().max_buffer_size
        );
        let row_bytes = (MAX_BARS * VERTICES_PER_BAR * std::mem::size_of::<Vertex>()) as u64;
        assert!(row_bytes <= MAX_VERTEX_BUFFER_BYTES);
        assert!(row_bytes + 48 > MAX_VERTEX_BUFFER_BYTES);
    }

    #[test]
    fn test_full_scale_amplitude() {
        assert_eq!(amplitude_to_height(32757), 2.0);
        assert_eq!(amplitude_to_height(-32757), -2.0);
        assert_eq!(amplitude_to_height(0), 0.0);
    }

    #[test]
    fn test_amplitude_beyond_nominal_range() {
        // i16 extremes overshoot the clip height slightly
        assert!(amplitude_to_height(i16::MAX) > 2.0);
        assert!(amplitude_to_height(i16::MIN) < -2.0);
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 8);
        assert_eq!(std::mem::size_of::<[Vertex; VERTICES_PER_BAR]>(), 48);
    }
}
