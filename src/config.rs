//! One-shot settings loading from `config.json`.
//!
//! The file uses the keys `TILES`, `Color`, `Margin`, `WidthRatio` and
//! `HeightRatio` (all required) plus the optional `CaptureMs` and
//! `OnCaptureError`. Any required key that is absent fails the load with an
//! error naming it, before a window is ever created.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bars::MAX_BARS;
use crate::params::{BarConfig, CaptureConfig, CaptureErrorPolicy, RenderConfig};

/// Default settings file, resolved against the working directory
pub const CONFIG_FILE: &str = "config.json";

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing configuration key `{key}`")]
    MissingConfiguration { key: &'static str },
    #[error("invalid configuration for `{key}`: {reason}")]
    InvalidConfiguration { key: &'static str, reason: String },
}

/// Settings document as written on disk
#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(rename = "TILES")]
    tiles: Option<i64>,
    #[serde(rename = "Color")]
    color: Option<String>,
    #[serde(rename = "Margin")]
    margin: Option<f32>,
    #[serde(rename = "WidthRatio")]
    width_ratio: Option<f32>,
    #[serde(rename = "HeightRatio")]
    height_ratio: Option<f32>,
    #[serde(rename = "CaptureMs")]
    capture_ms: Option<u32>,
    #[serde(rename = "OnCaptureError")]
    on_capture_error: Option<CaptureErrorPolicy>,
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub bars: BarConfig,
    pub capture: CaptureConfig,
    pub render: RenderConfig,
}

impl Settings {
    /// Load settings from [`CONFIG_FILE`] in the working directory
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(CONFIG_FILE)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&text)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate a settings document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(text)?;

        let tiles = required(raw.tiles, "TILES")?;
        let color = required(raw.color, "Color")?;
        let margin = required(raw.margin, "Margin")?;
        let width_ratio = required(raw.width_ratio, "WidthRatio")?;
        let height_ratio = required(raw.height_ratio, "HeightRatio")?;

        let count = usize::try_from(tiles)
            .ok()
            .filter(|&count| count > 0 && count <= MAX_BARS)
            .ok_or_else(|| ConfigError::InvalidConfiguration {
                key: "TILES",
                reason: format!("bar count must be between 1 and {MAX_BARS}, got {tiles}"),
            })?;

        if !margin.is_finite() {
            return Err(ConfigError::InvalidConfiguration {
                key: "Margin",
                reason: "margin must be a finite number".to_string(),
            });
        }

        let bars = BarConfig { count, margin };

        let render = RenderConfig {
            width_ratio: window_ratio(width_ratio, "WidthRatio")?,
            height_ratio: window_ratio(height_ratio, "HeightRatio")?,
            color: parse_color(&color)?,
            ..RenderConfig::default()
        };

        let defaults = CaptureConfig::default();
        let capture = CaptureConfig {
            capture_ms: raw.capture_ms.unwrap_or(defaults.capture_ms),
            on_error: raw.on_capture_error.unwrap_or(defaults.on_error),
            ..defaults
        };
        capture.validate()?;

        Ok(Self {
            bars,
            capture,
            render,
        })
    }
}

fn required<T>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::MissingConfiguration { key })
}

fn window_ratio(ratio: f32, key: &'static str) -> Result<f32, ConfigError> {
    if ratio.is_finite() && ratio > 0.0 && ratio <= 100.0 {
        Ok(ratio)
    } else {
        Err(ConfigError::InvalidConfiguration {
            key,
            reason: format!("ratio must be in (0, 100], got {ratio}"),
        })
    }
}

/// Parse an `"r,g,b,a"` color string into four channels in [0, 1]
pub fn parse_color(text: &str) -> Result<[f32; 4], ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidConfiguration {
        key: "Color",
        reason,
    };

    let channels = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| invalid(format!("`{}` is not a number: {e}", part.trim())))
        })
        .collect::<Result<Vec<f32>, ConfigError>>()?;

    let color: [f32; 4] = channels
        .try_into()
        .map_err(|c: Vec<f32>| invalid(format!("expected 4 components, got {}", c.len())))?;

    if let Some(bad) = color.iter().find(|c| !(0.0..=1.0).contains(*c)) {
        return Err(invalid(format!("component {bad} is outside [0, 1]")));
    }

    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "TILES": 16,
        "Color": "1.0,0.0,0.0,1.0",
        "Margin": 0.01,
        "WidthRatio": 50,
        "HeightRatio": 25
    }"#;

    #[test]
    fn test_valid_settings() {
        let settings = Settings::from_json_str(VALID).unwrap();

        assert_eq!(settings.bars.count, 16);
        assert!((settings.bars.margin - 0.01).abs() < 1e-6);
        assert_eq!(settings.render.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(settings.render.width_ratio, 50.0);
        assert_eq!(settings.render.height_ratio, 25.0);
        assert_eq!(settings.capture.capture_ms, 22);
        assert_eq!(settings.capture.on_error, CaptureErrorPolicy::Silence);
    }

    #[test]
    fn test_each_missing_key_is_named() {
        for key in ["TILES", "Color", "Margin", "WidthRatio", "HeightRatio"] {
            let mut doc: serde_json::Value = serde_json::from_str(VALID).unwrap();
            doc.as_object_mut().unwrap().remove(key);

            match Settings::from_json_str(&doc.to_string()) {
                Err(ConfigError::MissingConfiguration { key: missing }) => {
                    assert_eq!(missing, key)
                }
                other => panic!("expected missing `{key}`, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        let doc = VALID.replace("\"Margin\": 0.01", "\"Margin\": null");
        assert!(matches!(
            Settings::from_json_str(&doc),
            Err(ConfigError::MissingConfiguration { key: "Margin" })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json_str("{ \"TILES\": "),
            Err(ConfigError::Parse(_))
        ));
        // Wrong value type is a parse failure too
        let doc = VALID.replace("\"TILES\": 16", "\"TILES\": \"sixteen\"");
        assert!(matches!(
            Settings::from_json_str(&doc),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_non_positive_tiles() {
        for tiles in ["0", "-3"] {
            let doc = VALID.replace("\"TILES\": 16", &format!("\"TILES\": {tiles}"));
            assert!(matches!(
                Settings::from_json_str(&doc),
                Err(ConfigError::InvalidConfiguration { key: "TILES", .. })
            ));
        }
    }

    #[test]
    fn test_oversized_tiles() {
        for tiles in ["5000000000".to_string(), (MAX_BARS + 1).to_string()] {
            let doc = VALID.replace("\"TILES\": 16", &format!("\"TILES\": {tiles}"));
            assert!(matches!(
                Settings::from_json_str(&doc),
                Err(ConfigError::InvalidConfiguration { key: "TILES", .. })
            ));
        }

        let doc = VALID.replace("\"TILES\": 16", &format!("\"TILES\": {MAX_BARS}"));
        assert_eq!(Settings::from_json_str(&doc).unwrap().bars.count, MAX_BARS);
    }

    #[test]
    fn test_ratio_bounds() {
        let doc = VALID.replace("\"WidthRatio\": 50", "\"WidthRatio\": 0");
        assert!(matches!(
            Settings::from_json_str(&doc),
            Err(ConfigError::InvalidConfiguration {
                key: "WidthRatio",
                ..
            })
        ));

        let doc = VALID.replace("\"HeightRatio\": 25", "\"HeightRatio\": 150");
        assert!(matches!(
            Settings::from_json_str(&doc),
            Err(ConfigError::InvalidConfiguration {
                key: "HeightRatio",
                ..
            })
        ));
    }

    #[test]
    fn test_optional_capture_keys() {
        let doc = VALID.replace(
            "\"Margin\": 0.01",
            "\"Margin\": 0.01, \"CaptureMs\": 40, \"OnCaptureError\": \"hold\"",
        );
        let settings = Settings::from_json_str(&doc).unwrap();

        assert_eq!(settings.capture.capture_ms, 40);
        assert_eq!(settings.capture.on_error, CaptureErrorPolicy::Hold);

        let doc = VALID.replace("\"Margin\": 0.01", "\"Margin\": 0.01, \"CaptureMs\": 0");
        assert!(Settings::from_json_str(&doc).is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(
            parse_color(" 0.5, 0.25 ,1,0 ").unwrap(),
            [0.5, 0.25, 1.0, 0.0]
        );
        assert!(parse_color("1.0,0.0,0.0").is_err());
        assert!(parse_color("1.0,0.0,0.0,1.0,1.0").is_err());
        assert!(parse_color("1.0,0.0,0.0,2.0").is_err());
        assert!(parse_color("1.0,0.0,0.0);discard;(1").is_err());
        assert!(parse_color("").is_err());
    }
}
