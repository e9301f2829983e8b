//! FontProvider trait for abstracting installed-font resolution.
//!
//! The descriptor cache resolves a family + style to font bytes through this
//! trait, so conversion works the same against system fonts, a font
//! directory, or fonts registered in memory by a test or host application.

use fixpdf_types::FontStyle;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for font resolution and descriptor construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Font not found: {family} ({style})")]
    NotFound { family: String, style: FontStyle },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data for '{name}': {message}")]
    InvalidData { name: String, message: String },
}

/// Shared font data type (reference-counted bytes).
pub type SharedFontData = Arc<Vec<u8>>;

/// A query for finding an installed font.
#[derive(Debug, Clone)]
pub struct FontQuery<'a> {
    /// Primary family name to search for
    pub family: &'a str,
    /// Fallback families to try if primary is not found
    pub fallbacks: &'a [&'a str],
    pub style: FontStyle,
    /// Point size the font is used at. Only a resolution hint for providers
    /// that carry optical-size variants; the resulting data is size-independent.
    pub size: Option<f32>,
}

impl<'a> FontQuery<'a> {
    pub fn new(family: &'a str) -> Self {
        Self {
            family,
            fallbacks: &[],
            style: FontStyle::REGULAR,
            size: None,
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: &'a [&'a str]) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }
}

/// A source of installed fonts.
///
/// # Implementations
///
/// - `InMemoryFontProvider`: fonts registered up front (always available)
/// - `SystemFontProvider` (in `fixpdf-fonts`): fontdb-backed discovery of
///   system fonts and font directories
pub trait FontProvider: Send + Sync + Debug {
    /// Load the font program best matching `query`.
    ///
    /// Providers try the primary family first, then the fallbacks.
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError>;

    fn has_font(&self, query: &FontQuery<'_>) -> bool {
        self.load_font(query).is_ok()
    }

    /// Unique family names this provider can resolve.
    fn list_families(&self) -> Vec<String>;

    /// Returns a human-readable name for this provider (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// An in-memory font provider.
///
/// Fonts are registered before use. Family matching is ASCII
/// case-insensitive.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    fonts: RwLock<Vec<(String, FontStyle, SharedFontData)>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font program for `family` in `style`.
    ///
    /// # Errors
    ///
    /// Returns `FontError::LoadFailed` if the internal lock is poisoned.
    pub fn add_font(&self, family: impl Into<String>, style: FontStyle, data: Vec<u8>) -> Result<(), FontError> {
        self.add_font_shared(family, style, Arc::new(data))
    }

    pub fn add_font_shared(
        &self,
        family: impl Into<String>,
        style: FontStyle,
        data: SharedFontData,
    ) -> Result<(), FontError> {
        let family = family.into();
        let mut fonts = self.fonts.write().map_err(|_| FontError::LoadFailed {
            path: format!("{}:{}", family, style),
            message: "font store lock poisoned".to_string(),
        })?;
        fonts.push((family, style, data));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut fonts) = self.fonts.write() {
            fonts.clear();
        }
    }

    fn find_match(&self, query: &FontQuery<'_>) -> Option<SharedFontData> {
        let fonts = self.fonts.read().ok()?;
        let families = std::iter::once(query.family).chain(query.fallbacks.iter().copied());

        let exact = |family: &str| {
            fonts
                .iter()
                .find(|(f, s, _)| f.eq_ignore_ascii_case(family) && *s == query.style)
                .map(|(_, _, data)| data.clone())
        };
        let any_style = |family: &str| {
            fonts
                .iter()
                .find(|(f, _, _)| f.eq_ignore_ascii_case(family))
                .map(|(_, _, data)| data.clone())
        };

        if let Some(data) = families.clone().find_map(exact) {
            return Some(data);
        }
        let fallback = families.clone().find_map(any_style);
        if fallback.is_some() {
            log::warn!(
                "No {} face registered for '{}'; using another style of the family",
                query.style,
                query.family
            );
        }
        fallback
    }
}

impl FontProvider for InMemoryFontProvider {
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
        self.find_match(query).ok_or_else(|| FontError::NotFound {
            family: query.family.to_string(),
            style: query.style,
        })
    }

    fn has_font(&self, query: &FontQuery<'_>) -> bool {
        self.find_match(query).is_some()
    }

    fn list_families(&self) -> Vec<String> {
        let mut families: Vec<_> = match self.fonts.read() {
            Ok(f) => f.iter().map(|(family, _, _)| family.clone()).collect(),
            Err(_) => return Vec::new(),
        };
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "InMemoryFontProvider"
    }
}
