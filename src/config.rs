use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable parameters of the conversion pipeline.
///
/// `line_break_ratio` trades under- against over-segmentation of lines,
/// `ocr_scale` trades recognition accuracy against memory and CPU per page,
/// and `max_ocr_pages` bounds the worst-case runtime of an OCR run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// A vertical jump larger than this fraction of the previous font size starts a new line.
    pub line_break_ratio: f64,
    /// Font size assumed before the first fragment reports one.
    pub default_font_size: f64,
    /// When set, a vertical jump larger than this fraction of the font size also ends the paragraph.
    pub paragraph_gap_ratio: Option<f64>,
    /// Rasterization scale for OCR pages.
    pub ocr_scale: f32,
    /// Hard cap on pages eligible for OCR.
    pub max_ocr_pages: usize,
    /// Language code passed to the OCR engine provider.
    pub ocr_language: String,
    /// Location of the OCR engine's language data, if not the provider default.
    pub ocr_asset_path: Option<String>,
    /// Overrides the title heading of the output document.
    pub title: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            line_break_ratio: 0.5,
            default_font_size: 12.0,
            paragraph_gap_ratio: None,
            ocr_scale: 2.0,
            max_ocr_pages: 200,
            ocr_language: "eng".to_string(),
            ocr_asset_path: None,
            title: None,
        }
    }
}

impl ConversionConfig {
    /// Parse and validate a TOML config. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ConversionConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.line_break_ratio > 0.0) {
            return Err(ConfigError::Invalid {
                field: "line_break_ratio",
                message: format!("must be positive, got {}", self.line_break_ratio),
            });
        }
        if !(self.default_font_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_font_size",
                message: format!("must be positive, got {}", self.default_font_size),
            });
        }
        if let Some(ratio) = self.paragraph_gap_ratio {
            if !(ratio > self.line_break_ratio) {
                return Err(ConfigError::Invalid {
                    field: "paragraph_gap_ratio",
                    message: format!(
                        "must exceed line_break_ratio ({}), got {}",
                        self.line_break_ratio, ratio
                    ),
                });
            }
        }
        if !(self.ocr_scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "ocr_scale",
                message: format!("must be positive, got {}", self.ocr_scale),
            });
        }
        if self.max_ocr_pages == 0 {
            return Err(ConfigError::Invalid {
                field: "max_ocr_pages",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversionConfig::default();
        assert_eq!(config.line_break_ratio, 0.5);
        assert_eq!(config.ocr_scale, 2.0);
        assert_eq!(config.max_ocr_pages, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConversionConfig::from_toml_str("max_ocr_pages = 50\ntitle = \"Report\"").unwrap();
        assert_eq!(config.max_ocr_pages, 50);
        assert_eq!(config.title.as_deref(), Some("Report"));
        assert_eq!(config.line_break_ratio, 0.5);
        assert_eq!(config.ocr_language, "eng");
    }

    #[test]
    fn test_rejects_zero_page_cap() {
        let err = ConversionConfig::from_toml_str("max_ocr_pages = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_ocr_pages", .. }));
    }

    #[test]
    fn test_rejects_paragraph_gap_below_line_break() {
        let err = ConversionConfig::from_toml_str("paragraph_gap_ratio = 0.3").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "paragraph_gap_ratio", .. }));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = ConversionConfig::from_toml_str("ocr_scale = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
