//! A single bar as an immutable value record.

use glam::Vec2;

use super::Vertex;

/// One bar of the row, regenerated every frame from its height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Position in the row, also the sample index it visualizes
    pub index: usize,

    /// Width in layout units (shared by the whole row)
    pub width: f32,

    /// Full vertical extent in clip-space units (negative flips the quad)
    pub height: f32,

    /// Accumulated left offset, fixed at construction
    pub horizontal_offset: f32,

    /// Effective margin of the row (shared)
    pub margin: f32,
}

impl Bar {
    /// Same bar with a new height
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Horizontal shift from the left clip edge
    ///
    /// Doubled when the margin is positive; applied once for the
    /// zero or negative margins of the fallback layout.
    pub fn horizontal_shift(&self) -> f32 {
        if self.margin <= 0.0 {
            self.horizontal_offset
        } else {
            self.horizontal_offset * 2.0
        }
    }

    /// Corners `(left, -height / 2)` and `(right, height / 2)`
    pub fn bounding_box(&self) -> (Vec2, Vec2) {
        let half = self.height / 2.0;
        let left = -1.0 + self.horizontal_shift();
        (
            Vec2::new(left, -half),
            Vec2::new(left + self.width, half),
        )
    }

    /// Two triangles covering the bounding box
    pub fn geometry(&self) -> [Vertex; 6] {
        let (lo, hi) = self.bounding_box();
        [
            Vertex::new(lo.x, lo.y),
            Vertex::new(hi.x, lo.y),
            Vertex::new(hi.x, hi.y),
            Vertex::new(lo.x, lo.y),
            Vertex::new(hi.x, hi.y),
            Vertex::new(lo.x, hi.y),
        ]
    }
}
