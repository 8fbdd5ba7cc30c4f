//! Studio style presets.

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One visual preset offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description for the gallery.
    pub description: String,
    /// Style instruction embedded in the outbound prompt.
    pub prompt: String,
    /// Preview image reference.
    pub preview_image: String,
}

impl StyleDescriptor {
    fn preset(id: &str, name: &str, description: &str, prompt: &str, preview: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt: prompt.to_string(),
            preview_image: preview.to_string(),
        }
    }
}

/// Immutable, non-empty list of styles with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCatalog {
    styles: Vec<StyleDescriptor>,
}

impl StyleCatalog {
    /// Builds a catalog, rejecting empty lists and duplicate ids.
    pub fn new(styles: Vec<StyleDescriptor>) -> Result<Self> {
        if styles.is_empty() {
            return Err(StudioError::InvalidRequest("style catalog is empty".into()));
        }
        let mut seen = HashSet::new();
        for style in &styles {
            if !seen.insert(style.id.as_str()) {
                return Err(StudioError::InvalidRequest(format!(
                    "duplicate style id: {}",
                    style.id
                )));
            }
        }
        Ok(Self { styles })
    }

    /// Parses a JSON array of styles.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Loads a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// The presets shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            styles: vec![
                StyleDescriptor::preset(
                    "prof-portrait",
                    "Professional Portrait",
                    "Classic studio portrait with a soft key light and a refined backdrop",
                    "Professional high-end studio portrait photography. Soft Rembrandt lighting, subtle bokeh background, high resolution, sharp focus on the subject, neutral grey studio backdrop, 8k quality.",
                    "https://picsum.photos/seed/port1/400/500",
                ),
                StyleDescriptor::preset(
                    "cinematic-studio",
                    "Cinematic Mood",
                    "Film-like staging with strong contrast and atmospheric light",
                    "Cinematic studio lighting, dramatic shadows, moody atmosphere, teal and orange color grading, professional photography, high contrast, anamorphic lens flares, rich textures.",
                    "https://picsum.photos/seed/cine/400/500",
                ),
                StyleDescriptor::preset(
                    "minimalist-clean",
                    "Minimal Clean",
                    "Bright, clean, white-toned modern studio look",
                    "Minimalist clean studio setup, bright high-key lighting, pure white background, soft shadows, airy atmosphere, modern aesthetic, professional editorial photography.",
                    "https://picsum.photos/seed/clean/400/500",
                ),
                StyleDescriptor::preset(
                    "luxury-product",
                    "Luxury Product / Brand",
                    "Brand editorial feel with premium props and textures",
                    "Luxury editorial photography, marble and gold props, elegant composition, professional studio product lighting, sharp details, premium feel, vogue style.",
                    "https://picsum.photos/seed/lux/400/500",
                ),
                StyleDescriptor::preset(
                    "vintage-film",
                    "Vintage Film",
                    "Warm, cozy analog film photography",
                    "Vintage film photography, warm grain, Kodak Portra 400 aesthetic, soft natural studio light, nostalgic mood, authentic film textures, gentle colors.",
                    "https://picsum.photos/seed/film/400/500",
                ),
            ],
        }
    }

    /// All styles, in catalog order.
    pub fn styles(&self) -> &[StyleDescriptor] {
        &self.styles
    }

    /// The first style; selected by default.
    pub fn default_style(&self) -> &StyleDescriptor {
        &self.styles[0]
    }

    /// Looks up a style by id.
    pub fn get(&self, id: &str) -> Option<&StyleDescriptor> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.styles.iter().position(|s| s.id == id)
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(catalog.styles().len(), 5);
        assert_eq!(catalog.default_style().id, "prof-portrait");
        assert!(catalog.get("vintage-film").is_some());
        assert!(catalog.get("unknown").is_none());
        // Built-ins obey the same rules as loaded catalogs.
        assert!(StyleCatalog::new(catalog.styles().to_vec()).is_ok());
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {
                "id": "noir",
                "name": "Noir",
                "description": "Black and white",
                "prompt": "High contrast black and white studio portrait.",
                "previewImage": "noir.png"
            }
        ]"#;
        let catalog = StyleCatalog::from_json(json).unwrap();
        assert_eq!(catalog.default_style().preview_image, "noir.png");
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            StyleCatalog::from_json("[]"),
            Err(StudioError::InvalidRequest(_))
        ));

        let style = StyleCatalog::builtin().default_style().clone();
        let err = StyleCatalog::new(vec![style.clone(), style]).unwrap_err();
        assert!(err.to_string().contains("duplicate style id"));
    }
}
