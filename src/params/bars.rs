//! Bar row parameters.

/// Bar row configuration as loaded from the settings file
#[derive(Debug, Clone)]
pub struct BarConfig {
    /// Number of bars (one per sample index)
    pub count: usize,

    /// Requested gap between bars, as a fraction of the unit interval
    /// Must stay below 1 / count or the layout falls back to overlapping bars
    pub margin: f32,
}
