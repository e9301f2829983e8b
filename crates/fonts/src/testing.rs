//! A builder for tiny but well-formed TrueType fonts, so tests can exercise
//! real descriptor parsing without shipping font files.
//!
//! The font carries `cmap`, `head`, `hhea`, `hmtx`, `maxp` and `name` tables:
//! 1000 units/em, ascender 800, descender -200, printable ASCII mapped to
//! glyphs 1..=95. Space advances 250 units; every other glyph advances 500
//! (550 when bold).

use fixpdf_types::FontStyle;

const UNITS_PER_EM: u16 = 1000;
const FIRST_MAPPED: u16 = 0x20;
const LAST_MAPPED: u16 = 0x7E;
const NUM_GLYPHS: u16 = LAST_MAPPED - FIRST_MAPPED + 2;

/// Builds a font whose family name record is `family` and whose PostScript
/// name is the family without spaces, suffixed with `-Bold`, `-Italic` or
/// `-BoldItalic` for non-regular styles.
pub fn synthetic_font(family: &str, style: FontStyle) -> Vec<u8> {
    let postscript: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    let postscript = if style.is_regular() {
        postscript
    } else {
        format!("{}-{}", postscript, style.name())
    };

    // Sorted by tag; lookups binary-search the table directory.
    let tables: [(&[u8; 4], Vec<u8>); 6] = [
        (b"cmap", cmap()),
        (b"head", head(style)),
        (b"hhea", hhea()),
        (b"hmtx", hmtx(style)),
        (b"maxp", maxp()),
        (b"name", name(family, style.name(), &postscript)),
    ];

    let mut out = Vec::new();
    put_u32(&mut out, 0x0001_0000);
    put_u16(&mut out, tables.len() as u16);
    put_u16(&mut out, 64); // searchRange
    put_u16(&mut out, 2); // entrySelector
    put_u16(&mut out, tables.len() as u16 * 16 - 64); // rangeShift

    let mut offset = 12 + 16 * tables.len() as u32;
    for (tag, body) in &tables {
        out.extend_from_slice(*tag);
        put_u32(&mut out, 0); // checksum, unchecked by parsers
        put_u32(&mut out, offset);
        put_u32(&mut out, body.len() as u32);
        offset += padded_len(body.len()) as u32;
    }
    for (_, body) in &tables {
        out.extend_from_slice(body);
        out.resize(out.len() + padded_len(body.len()) - body.len(), 0);
    }
    out
}

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

/// Format 4 subtable with one real segment (printable ASCII) and the
/// mandatory 0xFFFF terminator.
fn cmap() -> Vec<u8> {
    let mut t = Vec::new();
    put_u16(&mut t, 0); // version
    put_u16(&mut t, 1); // numTables
    put_u16(&mut t, 3); // platform: Windows
    put_u16(&mut t, 1); // encoding: Unicode BMP
    put_u32(&mut t, 12);

    put_u16(&mut t, 4); // format
    put_u16(&mut t, 32); // length
    put_u16(&mut t, 0); // language
    put_u16(&mut t, 4); // segCountX2
    put_u16(&mut t, 4); // searchRange
    put_u16(&mut t, 1); // entrySelector
    put_u16(&mut t, 0); // rangeShift
    put_u16(&mut t, LAST_MAPPED);
    put_u16(&mut t, 0xFFFF);
    put_u16(&mut t, 0); // reservedPad
    put_u16(&mut t, FIRST_MAPPED);
    put_u16(&mut t, 0xFFFF);
    put_i16(&mut t, 1 - FIRST_MAPPED as i16); // idDelta: 0x20 -> glyph 1
    put_i16(&mut t, 1);
    put_u16(&mut t, 0); // idRangeOffset
    put_u16(&mut t, 0);
    t
}

fn head(style: FontStyle) -> Vec<u8> {
    let mut t = Vec::new();
    put_u32(&mut t, 0x0001_0000); // version
    put_u32(&mut t, 0x0001_0000); // fontRevision
    put_u32(&mut t, 0); // checkSumAdjustment
    put_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    put_u16(&mut t, 0); // flags
    put_u16(&mut t, UNITS_PER_EM);
    t.extend_from_slice(&[0; 16]); // created, modified
    put_i16(&mut t, -50);
    put_i16(&mut t, -200);
    put_i16(&mut t, 1000);
    put_i16(&mut t, 800);
    put_u16(&mut t, style.bits() as u16); // macStyle: bit 0 bold, bit 1 italic
    put_u16(&mut t, 8); // lowestRecPPEM
    put_i16(&mut t, 2); // fontDirectionHint
    put_i16(&mut t, 0); // indexToLocFormat
    put_i16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea() -> Vec<u8> {
    let mut t = Vec::new();
    put_u32(&mut t, 0x0001_0000);
    put_i16(&mut t, 800); // ascender
    put_i16(&mut t, -200); // descender
    put_i16(&mut t, 0); // lineGap
    put_u16(&mut t, 550); // advanceWidthMax
    put_i16(&mut t, 0); // minLeftSideBearing
    put_i16(&mut t, 0); // minRightSideBearing
    put_i16(&mut t, 1000); // xMaxExtent
    put_i16(&mut t, 1); // caretSlopeRise
    put_i16(&mut t, 0); // caretSlopeRun
    put_i16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0; 8]); // reserved
    put_i16(&mut t, 0); // metricDataFormat
    put_u16(&mut t, NUM_GLYPHS);
    t
}

fn hmtx(style: FontStyle) -> Vec<u8> {
    let glyph_advance = if style.is_bold() { 550 } else { 500 };
    let mut t = Vec::new();
    for glyph in 0..NUM_GLYPHS {
        let advance = if glyph == 1 { 250 } else { glyph_advance };
        put_u16(&mut t, advance);
        put_i16(&mut t, 0);
    }
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::new();
    put_u32(&mut t, 0x0000_5000);
    put_u16(&mut t, NUM_GLYPHS);
    t
}

fn name(family: &str, subfamily: &str, postscript: &str) -> Vec<u8> {
    let full = if subfamily == "Regular" {
        family.to_string()
    } else {
        format!("{} {}", family, subfamily)
    };
    let records: [(u16, &str); 4] = [(1, family), (2, subfamily), (4, &full), (6, postscript)];

    let mut storage = Vec::new();
    let mut t = Vec::new();
    put_u16(&mut t, 0); // format
    put_u16(&mut t, records.len() as u16);
    put_u16(&mut t, 6 + 12 * records.len() as u16);
    for (name_id, value) in records {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
        put_u16(&mut t, 3); // platform: Windows
        put_u16(&mut t, 1); // encoding: Unicode BMP
        put_u16(&mut t, 0x0409); // language: en-US
        put_u16(&mut t, name_id);
        put_u16(&mut t, encoded.len() as u16);
        put_u16(&mut t, storage.len() as u16);
        storage.extend_from_slice(&encoded);
    }
    t.extend_from_slice(&storage);
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_font_parses() {
        let data = synthetic_font("Probe", FontStyle::ITALIC);
        let face = ttf_parser::Face::parse(&data, 0).expect("synthetic font should parse");
        assert_eq!(face.units_per_em(), 1000);
        assert_eq!(face.number_of_glyphs(), NUM_GLYPHS);
        let glyph = face.glyph_index('A').expect("ASCII is mapped");
        assert_eq!(face.glyph_hor_advance(glyph), Some(500));
    }

    #[test]
    fn distinct_families_produce_distinct_bytes() {
        assert_ne!(
            synthetic_font("One", FontStyle::REGULAR),
            synthetic_font("Two", FontStyle::REGULAR)
        );
    }
}
