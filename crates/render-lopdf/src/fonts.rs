use crate::writer::PdfObjectWriter;
use fixpdf_fonts::encoding::{FIRST_CHAR, LAST_CHAR};
use fixpdf_fonts::FontDescriptor;
use lopdf::{dictionary, Object, ObjectId, Stream};
use std::io::{Seek, Write};

/// Writes a descriptor as a simple TrueType font: the font dictionary, its
/// `FontDescriptor` dictionary and the complete program as `FontFile2`.
///
/// Returns the id of the font dictionary.
pub fn embed_truetype_font<W: Write + Seek>(
    writer: &mut PdfObjectWriter<W>,
    descriptor: &FontDescriptor,
) -> ObjectId {
    let program = descriptor.font_program();
    let file_id = writer.buffer_object(Object::Stream(Stream::new(
        dictionary! { "Length1" => program.len() as i64 },
        program.to_vec(),
    )));

    let base_font = Object::Name(descriptor.postscript_name().as_bytes().to_vec());
    let bbox: Vec<Object> = descriptor.bbox().iter().map(|v| Object::Integer(*v as i64)).collect();
    let descriptor_id = writer.buffer_object(
        dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            "FontFamily" => Object::string_literal(descriptor.family_name()),
            "Flags" => descriptor.flags() as i64,
            "FontBBox" => bbox,
            "ItalicAngle" => descriptor.italic_angle(),
            "Ascent" => descriptor.ascent() as i64,
            "Descent" => descriptor.descent() as i64,
            "CapHeight" => descriptor.cap_height() as i64,
            "XHeight" => descriptor.x_height() as i64,
            "StemV" => descriptor.stem_v() as i64,
            "MissingWidth" => descriptor.missing_width() as i64,
            "FontFile2" => file_id,
        }
        .into(),
    );

    let widths: Vec<Object> = descriptor
        .widths()
        .iter()
        .map(|w| Object::Integer(*w as i64))
        .collect();
    writer.buffer_object(
        dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => base_font,
            "FirstChar" => FIRST_CHAR as i64,
            "LastChar" => LAST_CHAR as i64,
            "Widths" => widths,
            "FontDescriptor" => descriptor_id,
            "Encoding" => "WinAnsiEncoding",
        }
        .into(),
    )
}
