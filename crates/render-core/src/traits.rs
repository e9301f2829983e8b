use crate::error::RenderError;
use fixpdf_types::FixedPage;

/// A destination page created by [`PageRenderer::create_page`].
///
/// Handles are only meaningful to the renderer that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle {
    pub index: usize,
}

/// A trait for document renderers, abstracting the PDF-writing primitives.
///
/// A conversion calls `begin_document` once, then `create_page` followed by
/// `render_page` for every present source page, then `finish`.
pub trait PageRenderer {
    fn begin_document(&mut self) -> Result<(), RenderError>;

    /// Appends an empty destination page sized like `page`.
    fn create_page(&mut self, page: &FixedPage) -> Result<PageHandle, RenderError>;

    /// Draws the content of `page` onto a page created earlier.
    fn render_page(&mut self, handle: PageHandle, page: &FixedPage) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    /// Completes the document and returns the serialized PDF.
    fn finish(self: Box<Self>) -> Result<Vec<u8>, RenderError>;
}
