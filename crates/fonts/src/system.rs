//! fontdb-backed provider for installed fonts.

use fixpdf_traits::{FontError, FontProvider, FontQuery, SharedFontData};
use fixpdf_types::FontStyle;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Resolves families against a fontdb database of system fonts, font
/// directories and registered font data.
///
/// Unlike a general text-layout font stack there is no generic sans-serif
/// fallback here: a family that is not installed is `FontError::NotFound`.
pub struct SystemFontProvider {
    db: RwLock<fontdb::Database>,
}

impl SystemFontProvider {
    /// An empty database; add sources with [`add_font_dir`](Self::add_font_dir)
    /// or [`add_font_data`](Self::add_font_data).
    pub fn new() -> Self {
        Self {
            db: RwLock::new(fontdb::Database::new()),
        }
    }

    /// A database populated with the host's installed fonts.
    pub fn with_system_fonts() -> Self {
        let provider = Self::new();
        if let Ok(mut db) = provider.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font face(s)", db.len());
        }
        provider
    }

    pub fn add_font_dir<P: AsRef<Path>>(&self, path: P) {
        if let Ok(mut db) = self.db.write() {
            let before = db.len();
            db.load_fonts_dir(path.as_ref());
            log::debug!(
                "Loaded {} font face(s) from {}",
                db.len() - before,
                path.as_ref().display()
            );
        }
    }

    pub fn add_font_data(&self, data: Vec<u8>) {
        if let Ok(mut db) = self.db.write() {
            db.load_font_data(data);
        }
    }

    pub fn face_count(&self) -> usize {
        self.db.read().map(|db| db.len()).unwrap_or(0)
    }
}

impl Default for SystemFontProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SystemFontProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFontProvider")
            .field("faces", &self.face_count())
            .finish()
    }
}

fn to_fontdb(style: FontStyle) -> (fontdb::Weight, fontdb::Style) {
    let weight = if style.is_bold() {
        fontdb::Weight::BOLD
    } else {
        fontdb::Weight::NORMAL
    };
    let slant = if style.is_italic() {
        fontdb::Style::Italic
    } else {
        fontdb::Style::Normal
    };
    (weight, slant)
}

impl FontProvider for SystemFontProvider {
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
        let db = self.db.read().map_err(|_| FontError::LoadFailed {
            path: query.family.to_string(),
            message: "fontdb lock poisoned".to_string(),
        })?;
        let (weight, style) = to_fontdb(query.style);

        let families: Vec<fontdb::Family<'_>> = std::iter::once(query.family)
            .chain(query.fallbacks.iter().copied())
            .map(fontdb::Family::Name)
            .collect();
        let id = db
            .query(&fontdb::Query {
                families: &families,
                weight,
                stretch: fontdb::Stretch::Normal,
                style,
            })
            .ok_or_else(|| FontError::NotFound {
                family: query.family.to_string(),
                style: query.style,
            })?;

        if let Some(face) = db.face(id) {
            let primary = face
                .families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(query.family));
            if !primary {
                log::warn!(
                    "Font family '{}' not installed; using fallback '{}'",
                    query.family,
                    face.post_script_name
                );
            }
            log::debug!("Matched {} {} to {:?}", query.family, query.style, face.post_script_name);
        }

        let data = db
            .with_face_data(id, |data, _index| data.to_vec())
            .ok_or_else(|| FontError::LoadFailed {
                path: query.family.to_string(),
                message: "font source could not be read".to_string(),
            })?;
        Ok(Arc::new(data))
    }

    fn list_families(&self) -> Vec<String> {
        let Ok(db) = self.db.read() else {
            return Vec::new();
        };
        let mut families: Vec<String> = db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "SystemFontProvider"
    }
}
