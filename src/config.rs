use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::tools::DEFAULT_TOOL_KEYS;
use crate::foundation::color::Color;
use crate::foundation::error::{EngraveError, EngraveResult};
use crate::render::engraving::EngravingConfig;

/// Page-wide settings. Every field is optional in JSON; missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Accent hue used for the tinted logo, emblem and glow.
    pub accent: Color,
    pub background: Color,
    /// Scan-line spacing in CSS pixels.
    pub line_spacing: f64,
    /// Logo asset path, relative to the asset root.
    pub logo_path: String,
    /// Hero scroll distance in viewport heights.
    pub scroll_length: f64,
    /// Tool documents to preload, by key.
    pub tool_keys: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let engraving = EngravingConfig::default();
        Self {
            accent: engraving.accent,
            background: engraving.background,
            line_spacing: engraving.line_spacing,
            logo_path: "assets/logo.webp".to_owned(),
            scroll_length: 3.0,
            tool_keys: DEFAULT_TOOL_KEYS.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

impl SiteConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> EngraveResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| EngraveError::validation(format!("parse site config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> EngraveResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EngraveError::validation(format!("open site config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> EngraveResult<()> {
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(EngraveError::validation(format!(
                "line_spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if !self.scroll_length.is_finite() || self.scroll_length < 1.0 {
            return Err(EngraveError::validation(format!(
                "scroll_length must be at least 1 viewport, got {}",
                self.scroll_length
            )));
        }
        if self.logo_path.trim().is_empty() {
            return Err(EngraveError::validation("logo_path must be non-empty"));
        }
        if let Some(bad) = self
            .tool_keys
            .iter()
            .find(|k| k.is_empty() || k.contains(['/', '\\', '?', '#']))
        {
            return Err(EngraveError::validation(format!("invalid tool key '{bad}'")));
        }
        Ok(())
    }

    pub fn engraving(&self) -> EngravingConfig {
        EngravingConfig {
            accent: self.accent,
            background: self.background,
            line_spacing: self.line_spacing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_mirror_the_page() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.accent.to_rgba8(), [0xC9, 0xA9, 0x6E, 0xFF]);
        assert_eq!(cfg.background.to_rgba8(), [0x0A, 0x0A, 0x0A, 0xFF]);
        assert_eq!(cfg.line_spacing, 3.0);
        assert_eq!(cfg.logo_path, "assets/logo.webp");
        assert_eq!(cfg.scroll_length, 3.0);
        assert_eq!(cfg.tool_keys, vec!["ue", "maya", "mb"]);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = SiteConfig::from_reader(
            r##"{"accent": "#FFD700", "tool_keys": ["houdini"]}"##.as_bytes(),
        )
        .unwrap();
        assert_eq!(cfg.accent.to_rgba8(), [0xFF, 0xD7, 0x00, 0xFF]);
        assert_eq!(cfg.tool_keys, vec!["houdini"]);
        assert_eq!(cfg.logo_path, "assets/logo.webp");
    }

    #[test]
    fn rejects_bad_values_and_unknown_fields() {
        assert!(SiteConfig::from_reader(r#"{"line_spacing": 0}"#.as_bytes()).is_err());
        assert!(SiteConfig::from_reader(r#"{"scroll_length": 0.5}"#.as_bytes()).is_err());
        assert!(SiteConfig::from_reader(r#"{"tool_keys": ["../x"]}"#.as_bytes()).is_err());
        let err = SiteConfig::from_reader(r##"{"colour": "#fff"}"##.as_bytes()).unwrap_err();
        assert!(err.to_string().starts_with("validation error"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, r#"{"line_spacing": 4}"#).unwrap();
        let cfg = SiteConfig::from_path(&path).unwrap();
        assert_eq!(cfg.engraving().line_spacing, 4.0);
        assert!(SiteConfig::from_path(dir.path().join("missing.json")).is_err());
    }
}
