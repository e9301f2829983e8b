//! PDF backend for fixed-layout pages using lopdf.
//!
//! [`LopdfPageRenderer`] implements `PageRenderer`: it draws glyph runs and
//! paths into content streams and embeds every font it meets, once per
//! document, from the shared font descriptor cache.

mod content;
mod fonts;
mod renderer;
mod writer;

pub use fonts::embed_truetype_font;
pub use renderer::{LopdfPageRenderer, DEFAULT_PDF_VERSION};
pub use writer::PdfObjectWriter;
