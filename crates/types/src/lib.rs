//! Value types shared by every fixpdf crate: colors, geometry, font
//! identities and the fixed-layout source document model.

pub mod color;
pub mod document;
pub mod font;
pub mod geometry;

pub use color::Color;
pub use document::{FixedDocument, FixedPage, FontRef, GlyphRun, PageElement, PathElement, SourceDocument};
pub use font::{FontFamily, FontStyle, LogicalFont};
pub use geometry::{Point, Size};
