use lopdf::{Document as LopdfDocument, Object};
use std::collections::BTreeSet;

pub fn load_pdf(bytes: &[u8]) -> Result<LopdfDocument, lopdf::Error> {
    LopdfDocument::load_mem(bytes)
}

/// Width and height of every page, in page order.
pub fn page_sizes(doc: &LopdfDocument) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .filter_map(|id| doc.get_dictionary(*id).ok())
        .filter_map(|page| page.get(b"MediaBox").ok().and_then(|b| b.as_array().ok()))
        .map(|media_box| {
            let value = |i: usize| media_box.get(i).and_then(|o| o.as_float().ok()).unwrap_or(f32::NAN);
            (value(2), value(3))
        })
        .collect()
}

/// `BaseFont` names of every font dictionary in the document.
pub fn font_names(doc: &LopdfDocument) -> BTreeSet<String> {
    doc.objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| dict.get(b"Type").and_then(Object::as_name).ok() == Some(b"Font".as_slice()))
        .filter_map(|dict| dict.get(b"BaseFont").and_then(Object::as_name).ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

/// Number of embedded `FontFile2` programs.
pub fn embedded_program_count(doc: &LopdfDocument) -> usize {
    doc.objects
        .values()
        .filter_map(|object| object.as_dict().ok())
        .filter(|dict| dict.has(b"FontFile2"))
        .count()
}

#[macro_export]
macro_rules! assert_pdf_page_count {
    ($doc:expr, $expected:expr) => {
        assert_eq!(
            $doc.get_pages().len(),
            $expected,
            "expected {} page(s), found {}",
            $expected,
            $doc.get_pages().len()
        );
    };
}
