//! The full row of bars and its per-frame update.

use super::{amplitude_to_height, Bar, BarLayout, Vertex, VERTICES_PER_BAR};
use crate::config::ConfigError;

/// Fixed-size row of bars, indexed by sample position
#[derive(Debug, Clone)]
pub struct BarSet {
    layout: BarLayout,
    bars: Box<[Bar]>,
}

impl BarSet {
    /// Build a row of `count` flat bars separated by `margin`
    pub fn create(count: usize, margin: f32) -> Result<Self, ConfigError> {
        Ok(Self::new(BarLayout::new(count, margin)?))
    }

    /// Build a row of flat bars for an existing layout
    pub fn new(layout: BarLayout) -> Self {
        let bars = layout
            .offsets()
            .enumerate()
            .map(|(index, horizontal_offset)| Bar {
                index,
                width: layout.width(),
                height: 0.0,
                horizontal_offset,
                margin: layout.margin(),
            })
            .collect();

        Self { layout, bars }
    }

    pub fn layout(&self) -> &BarLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    /// Replace bar `index` with a copy at `height`, returning the new record
    pub fn set_height(&mut self, index: usize, height: f32) -> Option<Bar> {
        let slot = self.bars.get_mut(index)?;
        *slot = slot.with_height(height);
        Some(*slot)
    }

    /// Map one captured block onto the row
    ///
    /// Bar `i` takes `samples[i]`; bars past the end of the block drop to zero.
    pub fn apply_samples(&mut self, samples: &[i16]) {
        for bar in self.bars.iter_mut() {
            let height = samples
                .get(bar.index)
                .map_or(0.0, |&sample| amplitude_to_height(sample));
            *bar = bar.with_height(height);
        }
    }

    /// Number of vertices needed to draw the whole row
    pub fn vertex_count(&self) -> usize {
        self.bars.len() * VERTICES_PER_BAR
    }

    /// Write every quad, in index order, into `out`
    pub fn write_vertices(&self, out: &mut Vec<Vertex>) {
        out.clear();
        out.reserve(self.vertex_count());
        for bar in self.bars.iter() {
            out.extend_from_slice(&bar.geometry());
        }
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        let mut out = Vec::new();
        self.write_vertices(&mut out);
        out
    }
}
