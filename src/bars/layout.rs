//! Horizontal layout of the bar row.

use super::{Vertex, MAX_VERTEX_BUFFER_BYTES, VERTICES_PER_BAR};
use crate::config::ConfigError;
use crate::params::BarConfig;

/// Scale from the unit interval the margin is expressed in to layout units
pub const LAYOUT_SCALE: f32 = 4.0;

/// Share of the unit interval covered by bars when the requested margin is infeasible
pub const FALLBACK_COVERAGE: f32 = 0.8;

/// Most bars whose quads fit one vertex buffer
pub const MAX_BARS: usize =
    MAX_VERTEX_BUFFER_BYTES as usize / (VERTICES_PER_BAR * std::mem::size_of::<Vertex>());

/// Shared width and spacing of every bar in a row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    count: usize,
    unit_width: f32,
    width: f32,
    margin: f32,
    fallback: bool,
}

impl BarLayout {
    /// Compute the layout for `count` bars separated by `requested_margin`
    ///
    /// The unit width is `(1 - margin * (count + 1)) / count`. When that is not
    /// positive the row falls back to a unit width of `0.8 / count` and a
    /// negative margin of `-(count * unit_width) / (count + 1)`, so bars overlap
    /// slightly instead of failing. The unit width is then scaled by
    /// [`LAYOUT_SCALE`]; the margin is not.
    pub fn new(count: usize, requested_margin: f32) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidConfiguration {
                key: "TILES",
                reason: "bar count must be > 0".to_string(),
            });
        }
        if count > MAX_BARS {
            return Err(ConfigError::InvalidConfiguration {
                key: "TILES",
                reason: format!("bar count must be at most {MAX_BARS}, got {count}"),
            });
        }
        if !requested_margin.is_finite() {
            return Err(ConfigError::InvalidConfiguration {
                key: "Margin",
                reason: format!("margin must be finite, got {requested_margin}"),
            });
        }

        let n = count as f64;
        let primary = (1.0 - f64::from(requested_margin) * (n + 1.0)) / n;

        let (unit_width, margin, fallback) = if primary > 0.0 {
            (primary as f32, requested_margin, false)
        } else {
            let unit_width = (f64::from(FALLBACK_COVERAGE) / n) as f32;
            let margin = -(count as f32 * unit_width) / (count as f32 + 1.0);
            log::warn!(
                "Margin {} leaves no room for {} bars; using width {} and margin {}",
                requested_margin,
                count,
                unit_width,
                margin
            );
            (unit_width, margin, true)
        };

        let layout = Self {
            count,
            unit_width,
            width: unit_width * LAYOUT_SCALE,
            margin,
            fallback,
        };
        log::info!(
            "Margin must stay below {:.6} for {} bars",
            layout.max_margin(),
            count
        );
        Ok(layout)
    }

    /// Layout for a loaded bar configuration
    pub fn from_config(config: &BarConfig) -> Result<Self, ConfigError> {
        Self::new(config.count, config.margin)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Bar width before scaling, as a fraction of the unit interval
    pub fn unit_width(&self) -> f32 {
        self.unit_width
    }

    /// Bar width in layout units
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Effective margin (negative on the fallback path)
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Whether the requested margin was replaced
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Upper bound on the margin for this bar count (`1 / count`)
    pub fn max_margin(&self) -> f32 {
        1.0 / self.count as f32
    }

    /// Left offsets of every bar, accumulated from the initial margin
    pub fn offsets(&self) -> impl Iterator<Item = f32> + '_ {
        let step = self.width + self.margin;
        (0..self.count).scan(self.margin, move |offset, _| {
            let current = *offset;
            *offset += step;
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_four_bars_primary_layout() {
        let layout = BarLayout::new(4, 0.05).unwrap();

        // (1 - 0.05 * 5) / 4 = 0.1875, scaled by 4
        assert!(!layout.is_fallback());
        assert!(approx(layout.unit_width(), 0.1875));
        assert!(approx(layout.width(), 0.75));
        assert!(approx(layout.margin(), 0.05));

        let offsets: Vec<f32> = layout.offsets().collect();
        let expected = [0.05, 0.85, 1.65, 2.45];
        assert_eq!(offsets.len(), expected.len());
        for (got, want) in offsets.iter().zip(expected) {
            assert!(approx(*got, want), "offset {got} != {want}");
        }
    }

    #[test]
    fn test_fallback_when_margin_too_large() {
        let layout = BarLayout::new(10, 0.5).unwrap();

        assert!(layout.is_fallback());
        assert!(approx(layout.unit_width(), 0.08));
        assert!(approx(layout.width(), 0.32));
        assert!(approx(layout.margin(), -0.8 / 11.0));
        assert!(approx(layout.margin(), -0.072_727));
    }

    #[test]
    fn test_fallback_produces_positive_width_and_non_positive_margin() {
        for count in 1..=64usize {
            // Exactly 1 / (count + 1) makes the primary width zero
            let edge = 1.0 / (count as f32 + 1.0);
            for margin in [edge, edge * 1.5, 1.0, 10.0] {
                let layout = BarLayout::new(count, margin).unwrap();
                if !layout.is_fallback() {
                    continue;
                }
                assert!(approx(layout.unit_width(), 0.8 / count as f32));
                assert!(layout.width() > 0.0);
                assert!(layout.margin() <= 0.0);
            }
        }
    }

    #[test]
    fn test_feasible_margin_fits_the_span() {
        for count in 1..=32usize {
            let max = 1.0 / count as f32;
            for fraction in [0.05, 0.25, 0.5] {
                let margin = max * fraction / 2.0;
                let layout = BarLayout::new(count, margin).unwrap();
                assert!(!layout.is_fallback());
                let used = count as f32 * layout.width() + (count as f32 + 1.0) * margin;
                assert!(used <= LAYOUT_SCALE + 1e-4);
            }
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            BarLayout::new(0, 0.1),
            Err(ConfigError::InvalidConfiguration { key: "TILES", .. })
        ));
    }

    #[test]
    fn test_count_capped_by_vertex_buffer() {
        assert!(BarLayout::new(MAX_BARS, 0.0).is_ok());
        assert!(matches!(
            BarLayout::new(MAX_BARS + 1, 0.0),
            Err(ConfigError::InvalidConfiguration { key: "TILES", .. })
        ));
    }

    #[test]
    fn test_max_margin() {
        let layout = BarLayout::new(4, 0.01).unwrap();
        assert_eq!(layout.max_margin(), 0.25);
    }

    #[test]
    fn test_non_finite_margin_rejected() {
        assert!(matches!(
            BarLayout::new(4, f32::NAN),
            Err(ConfigError::InvalidConfiguration { key: "Margin", .. })
        ));
    }
}
