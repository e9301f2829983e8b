use crate::encoding::{win_ansi_char, win_ansi_code, FIRST_CHAR, LAST_CHAR};
use crate::selector::FontSelector;
use fixpdf_traits::{FontError, FontProvider, FontQuery, SharedFontData};
use fixpdf_types::{FontStyle, LogicalFont};
use std::fmt;

// PDF font descriptor flags (PDF 32000-1, table 123).
const FLAG_FIXED_PITCH: u32 = 1 << 0;
const FLAG_NONSYMBOLIC: u32 = 1 << 5;
const FLAG_ITALIC: u32 = 1 << 6;
const FLAG_FORCE_BOLD: u32 = 1 << 18;

/// How a descriptor came to be. Only visible through `Debug`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    /// Resolved from an installed family; `size` is the point size used to
    /// resolve the file.
    Logical { size: f32 },
    /// Parsed from a caller-supplied font program.
    RawData,
}

/// Parsed, immutable font resource data for exactly one [`FontSelector`].
///
/// Holds the metrics a PDF `FontDescriptor` dictionary needs, advance widths
/// for the WinAnsi range in 1/1000 text-space units, and the font program
/// for embedding. Construction is the expensive part; everything after is a
/// cheap read, so a descriptor is shared as `Arc<FontDescriptor>`.
pub struct FontDescriptor {
    selector: FontSelector,
    origin: Origin,
    postscript_name: String,
    family_name: String,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    cap_height: i16,
    x_height: i16,
    italic_angle: f32,
    stem_v: u16,
    bbox: [i16; 4],
    flags: u32,
    widths: Vec<u16>,
    missing_width: u16,
    data: SharedFontData,
}

/// Metrics pulled out of a parsed face while it borrows the font bytes.
struct ParsedMetrics {
    postscript_name: Option<String>,
    family_name: Option<String>,
    units_per_em: u16,
    ascent: i16,
    descent: i16,
    line_gap: i16,
    cap_height: i16,
    x_height: i16,
    bbox: [i16; 4],
    monospaced: bool,
    widths: Vec<u16>,
    missing_width: u16,
}

impl FontDescriptor {
    /// Resolves `font` through `provider` and parses the result.
    ///
    /// # Errors
    ///
    /// `FontError::NotFound` when the provider has no match,
    /// `FontError::InvalidData` when the resolved bytes do not parse.
    pub fn from_font(font: &LogicalFont, provider: &dyn FontProvider) -> Result<Self, FontError> {
        let selector = FontSelector::from_font(font);
        let query = FontQuery::new(font.name())
            .with_style(font.style)
            .with_size(font.size);
        let data = provider.load_font(&query)?;
        log::debug!(
            "Resolved {} via {} ({} bytes)",
            selector,
            provider.name(),
            data.len()
        );
        Self::parse(selector, Origin::Logical { size: font.size }, data)
    }

    /// Parses a caller-supplied font program registered under `name`.
    pub fn from_data(name: &str, data: impl Into<SharedFontData>) -> Result<Self, FontError> {
        Self::parse(FontSelector::from_name(name), Origin::RawData, data.into())
    }

    fn parse(selector: FontSelector, origin: Origin, data: SharedFontData) -> Result<Self, FontError> {
        let metrics = read_metrics(&data).map_err(|message| FontError::InvalidData {
            name: selector.name().to_string(),
            message,
        })?;

        let style = selector.style();
        let mut flags = FLAG_NONSYMBOLIC;
        if metrics.monospaced {
            flags |= FLAG_FIXED_PITCH;
        }
        if style.is_italic() {
            flags |= FLAG_ITALIC;
        }
        if style.is_bold() {
            flags |= FLAG_FORCE_BOLD;
        }

        let postscript_name = metrics
            .postscript_name
            .unwrap_or_else(|| styled_postscript_name(selector.name(), style));
        let family_name = metrics
            .family_name
            .unwrap_or_else(|| selector.name().to_string());

        Ok(Self {
            origin,
            postscript_name,
            family_name,
            units_per_em: metrics.units_per_em,
            ascent: metrics.ascent,
            descent: metrics.descent,
            line_gap: metrics.line_gap,
            cap_height: metrics.cap_height,
            x_height: metrics.x_height,
            italic_angle: if style.is_italic() { -12.0 } else { 0.0 },
            stem_v: if style.is_bold() { 120 } else { 80 },
            bbox: metrics.bbox,
            flags,
            widths: metrics.widths,
            missing_width: metrics.missing_width,
            data,
            selector,
        })
    }

    pub fn selector(&self) -> &FontSelector {
        &self.selector
    }

    pub fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Ascent in 1/1000 em.
    pub fn ascent(&self) -> i16 {
        self.ascent
    }

    /// Descent in 1/1000 em (negative below the baseline).
    pub fn descent(&self) -> i16 {
        self.descent
    }

    pub fn line_gap(&self) -> i16 {
        self.line_gap
    }

    pub fn cap_height(&self) -> i16 {
        self.cap_height
    }

    pub fn x_height(&self) -> i16 {
        self.x_height
    }

    pub fn italic_angle(&self) -> f32 {
        self.italic_angle
    }

    pub fn stem_v(&self) -> u16 {
        self.stem_v
    }

    /// `[x_min, y_min, x_max, y_max]` in 1/1000 em.
    pub fn bbox(&self) -> [i16; 4] {
        self.bbox
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`.
    pub fn widths(&self) -> &[u16] {
        &self.widths
    }

    pub fn missing_width(&self) -> u16 {
        self.missing_width
    }

    /// Advance width of a WinAnsi code in 1/1000 em.
    pub fn width_of_code(&self, code: u8) -> u16 {
        code.checked_sub(FIRST_CHAR)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    /// Advance width of `c` in 1/1000 em. Characters outside WinAnsi get the
    /// missing width.
    pub fn width_of(&self, c: char) -> u16 {
        win_ansi_code(c)
            .map(|code| self.width_of_code(code))
            .unwrap_or(self.missing_width)
    }

    /// Width of an encoded string at `size` points.
    pub fn text_width(&self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded.iter().map(|&c| self.width_of_code(c) as u32).sum();
        units as f32 * size / 1000.0
    }

    /// The raw font program, for embedding as `FontFile2`.
    pub fn font_program(&self) -> &SharedFontData {
        &self.data
    }
}

impl fmt::Debug for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontDescriptor")
            .field("selector", &self.selector.to_string())
            .field("origin", &self.origin)
            .field("postscript_name", &self.postscript_name)
            .field("units_per_em", &self.units_per_em)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// `Arial` + Bold → `Arial-Bold`; spaces are not allowed in PostScript names.
fn styled_postscript_name(name: &str, style: FontStyle) -> String {
    let base: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    if style.is_regular() {
        base
    } else {
        format!("{}-{}", base, style.name())
    }
}

fn read_metrics(data: &[u8]) -> Result<ParsedMetrics, String> {
    let face = ttf_parser::Face::parse(data, 0).map_err(|e| e.to_string())?;

    let units_per_em = face.units_per_em();
    let scale = 1000.0 / units_per_em as f32;
    let to_pdf = |v: i16| (v as f32 * scale).round() as i16;

    let bbox = face.global_bounding_box();
    let ascent = to_pdf(face.ascender());
    let advance = |c: char| {
        face.glyph_index(c)
            .and_then(|id| face.glyph_hor_advance(id))
            .map(|adv| (adv as f32 * scale).round() as u16)
    };
    let missing_width = advance(' ').unwrap_or(500);
    let widths = (FIRST_CHAR..=LAST_CHAR)
        .map(|code| win_ansi_char(code).and_then(&advance).unwrap_or(missing_width))
        .collect();

    Ok(ParsedMetrics {
        postscript_name: postscript_name(&face),
        family_name: name_record(&face, ttf_parser::name_id::FAMILY),
        units_per_em,
        ascent,
        descent: to_pdf(face.descender()),
        line_gap: to_pdf(face.line_gap()),
        cap_height: face.capital_height().map(&to_pdf).unwrap_or(ascent),
        x_height: face.x_height().map(&to_pdf).unwrap_or(ascent / 2),
        bbox: [to_pdf(bbox.x_min), to_pdf(bbox.y_min), to_pdf(bbox.x_max), to_pdf(bbox.y_max)],
        monospaced: face.is_monospaced(),
        widths,
        missing_width,
    })
}

fn name_record(face: &ttf_parser::Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|n| n.name_id == id)
        .find_map(|n| n.to_string())
        .filter(|s| !s.is_empty())
}

/// PostScript name (ID 6), else full name (ID 4) or family (ID 1) with the
/// spaces stripped.
fn postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    if let Some(ps_name) = name_record(face, ttf_parser::name_id::POST_SCRIPT_NAME) {
        return Some(ps_name);
    }
    let fallback = name_record(face, ttf_parser::name_id::FULL_NAME)
        .or_else(|| name_record(face, ttf_parser::name_id::FAMILY))?;
    log::debug!("No PostScript name record, using '{}'", fallback);
    Some(fallback.replace(' ', ""))
}
