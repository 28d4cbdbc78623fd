// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Every field has a default matching the stock tool
// behaviour, so an empty JSON object is a valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for the transformation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated processing time of the passthrough placeholder, in ms.
    pub fallback_delay_ms: u64,
    /// Serve unsupported tools with the passthrough placeholder. When false
    /// they fail with `UnsupportedOperation`.
    pub passthrough_unsupported: bool,
    /// PDF header version for documents created from scratch.
    pub pdf_version: String,
    /// Flate-compress uncompressed streams before writing.
    pub compress_streams: bool,
    /// Prefix of the generic output name `{prefix}_{tool}_result.pdf`.
    pub output_prefix: String,
    pub watermark: WatermarkStyle,
    pub page_numbers: PageNumberStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 1500,
            passthrough_unsupported: true,
            pdf_version: "1.7".to_string(),
            compress_streams: true,
            output_prefix: "exepdf".to_string(),
            watermark: WatermarkStyle::default(),
            page_numbers: PageNumberStyle::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

/// Visual attributes of the diagonal watermark stamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    pub font_size: f32,
    /// Gray level of the fill, 0.0 (black) to 1.0 (white).
    pub gray: f32,
    pub opacity: f32,
    pub angle_degrees: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font_size: 50.0,
            gray: 0.7,
            opacity: 0.5,
            angle_degrees: 45.0,
        }
    }
}

/// Visual attributes of the page-number stamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageNumberStyle {
    pub font_size: f32,
    /// Distance from the relevant page edges, in points.
    pub margin: f32,
}

impl Default for PageNumberStyle {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            margin: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.fallback_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config =
            EngineConfig::from_json(r#"{"fallback_delay_ms":0,"watermark":{"opacity":0.25}}"#)
                .unwrap();
        assert_eq!(config.fallback_delay_ms, 0);
        assert_eq!(config.watermark.opacity, 0.25);
        assert_eq!(config.watermark.font_size, 50.0);
        assert!(config.passthrough_unsupported);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exepdf.json");
        std::fs::write(&path, r#"{"passthrough_unsupported":false}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert!(!config.passthrough_unsupported);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = EngineConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::ExePdfError::Serialization(_)));
    }
}
