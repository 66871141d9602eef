//! Window and drawing configuration.

use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window title
    pub title: String,

    /// Window width as a percentage of the monitor width, in (0, 100]
    pub width_ratio: f32,

    /// Window height as a percentage of the monitor height, in (0, 100]
    pub height_ratio: f32,

    /// Bar fill color (RGBA, straight alpha, each channel in [0, 1])
    pub color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "MiCava".to_string(),
            width_ratio: 50.0,
            height_ratio: 25.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl RenderConfig {
    /// Window size for a monitor: monitor size / (100 / ratio), at least one pixel
    pub fn window_size(&self, monitor: PhysicalSize<u32>) -> PhysicalSize<u32> {
        let scale = |extent: u32, ratio: f32| {
            let divisor = 100.0 / ratio;
            ((extent as f32 / divisor) as u32).max(1)
        };
        PhysicalSize::new(
            scale(monitor.width, self.width_ratio),
            scale(monitor.height, self.height_ratio),
        )
    }

    /// Top-left position that centers `window` on the monitor
    pub fn centered_position(
        monitor_origin: PhysicalPosition<i32>,
        monitor: PhysicalSize<u32>,
        window: PhysicalSize<u32>,
    ) -> PhysicalPosition<i32> {
        let offset = |outer: u32, inner: u32| (outer as i32 - inner as i32) / 2;
        PhysicalPosition::new(
            monitor_origin.x + offset(monitor.width, window.width),
            monitor_origin.y + offset(monitor.height, window.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_size_follows_ratios() {
        let config = RenderConfig {
            width_ratio: 50.0,
            height_ratio: 20.0,
            ..RenderConfig::default()
        };

        let size = config.window_size(PhysicalSize::new(1920, 1080));
        assert_eq!(size, PhysicalSize::new(960, 216));
    }

    #[test]
    fn test_window_size_never_zero() {
        let config = RenderConfig {
            width_ratio: 0.01,
            height_ratio: 0.01,
            ..RenderConfig::default()
        };

        let size = config.window_size(PhysicalSize::new(640, 480));
        assert_eq!(size, PhysicalSize::new(1, 1));
    }

    #[test]
    fn test_centered_position() {
        let pos = RenderConfig::centered_position(
            PhysicalPosition::new(1920, 0),
            PhysicalSize::new(1920, 1080),
            PhysicalSize::new(960, 216),
        );
        assert_eq!(pos, PhysicalPosition::new(1920 + 480, 432));
    }
}
