use crate::content::PageContext;
use crate::fonts::embed_truetype_font;
use crate::writer::PdfObjectWriter;
use fixpdf_fonts::{FontDescriptor, FontDescriptorCache, FontSelector};
use fixpdf_render_core::utils::{font_resource_name, validate_page_size};
use fixpdf_render_core::{PageHandle, PageRenderer, RenderError};
use fixpdf_traits::ResourceProvider;
use fixpdf_types::{FixedPage, FontFamily, FontRef, PageElement};
use lopdf::{dictionary, Object, ObjectId};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

pub const DEFAULT_PDF_VERSION: &str = "1.7";

/// A font already written into the current document.
struct EmbeddedFont {
    resource_name: String,
    // Keeps the descriptor alive for the whole run even if the cache is
    // cleared underneath us.
    _descriptor: Arc<FontDescriptor>,
}

struct PageSlot {
    id: ObjectId,
    media_box: [f32; 2],
}

/// A PDF renderer using the `lopdf` library.
///
/// Fonts come from a shared [`FontDescriptorCache`]; each distinct font is
/// embedded once per document and given a resource name `F1`, `F2`, ... in
/// first-use order. The document is buffered in memory and serialized by
/// [`PageRenderer::finish`].
pub struct LopdfPageRenderer {
    cache: Arc<FontDescriptorCache>,
    resources: Arc<dyn ResourceProvider>,
    pdf_version: String,
    writer: Option<PdfObjectWriter<Cursor<Vec<u8>>>>,
    fonts: HashMap<FontSelector, EmbeddedFont>,
    pages: Vec<PageSlot>,
}

impl LopdfPageRenderer {
    pub fn new(cache: Arc<FontDescriptorCache>, resources: Arc<dyn ResourceProvider>) -> Self {
        Self {
            cache,
            resources,
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
            writer: None,
            fonts: HashMap::new(),
            pages: Vec::new(),
        }
    }

    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    /// Number of distinct fonts embedded so far in the current document.
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn writer_mut(&mut self) -> Result<&mut PdfObjectWriter<Cursor<Vec<u8>>>, RenderError> {
        self.writer
            .as_mut()
            .ok_or_else(|| RenderError::Other("Document not started".into()))
    }

    /// Looks up (or constructs) the descriptor for `font` and returns the
    /// resource name it is drawn with, embedding it on first use.
    fn resolve_font(&mut self, font: &FontRef) -> Result<String, RenderError> {
        let descriptor = match font {
            FontRef::Installed { family, style } => self
                .cache
                .get_or_create_for_family(&FontFamily::new(family.as_str()), *style)?,
            FontRef::Embedded { name, resource } => {
                match self.cache.find(&FontSelector::from_name(name.as_str())) {
                    Some(found) => found,
                    None => {
                        let data = self.resources.load(resource)?;
                        self.cache.get_or_create_from_data(name, data)?
                    }
                }
            }
        };

        if let Some(embedded) = self.fonts.get(descriptor.selector()) {
            return Ok(embedded.resource_name.clone());
        }

        let resource_name = font_resource_name(self.fonts.len());
        let writer = self.writer_mut()?;
        let font_id = embed_truetype_font(writer, &descriptor);
        writer.add_font_resource(&resource_name, font_id);
        log::debug!(
            "Embedded {} as /{} ({})",
            descriptor.selector(),
            resource_name,
            descriptor.postscript_name()
        );

        self.fonts.insert(
            descriptor.selector().clone(),
            EmbeddedFont {
                resource_name: resource_name.clone(),
                _descriptor: descriptor,
            },
        );
        Ok(resource_name)
    }

    fn page_dict(&self, slot: &PageSlot, contents: Option<ObjectId>) -> Result<lopdf::Dictionary, RenderError> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| RenderError::Other("Document not started".into()))?;
        let [width, height] = slot.media_box;
        let media_box: Vec<Object> = vec![0.into(), 0.into(), width.into(), height.into()];
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => media_box,
            "Resources" => writer.resources_id,
        };
        if let Some(contents) = contents {
            page.set("Contents", contents);
        }
        Ok(page)
    }
}

impl PageRenderer for LopdfPageRenderer {
    fn begin_document(&mut self) -> Result<(), RenderError> {
        if self.writer.is_some() {
            return Err(RenderError::Other("Document already started".into()));
        }
        self.writer = Some(PdfObjectWriter::new(Cursor::new(Vec::new()), &self.pdf_version)?);
        self.fonts.clear();
        self.pages.clear();
        Ok(())
    }

    fn create_page(&mut self, page: &FixedPage) -> Result<PageHandle, RenderError> {
        validate_page_size(page).map_err(RenderError::InvalidPage)?;
        let writer = self.writer_mut()?;
        let id = writer.new_object_id();
        writer.push_page(id);

        let slot = PageSlot {
            id,
            media_box: [page.width, page.height],
        };
        let dict = self.page_dict(&slot, None)?;
        self.writer_mut()?.buffer_object_at_id(id, dict.into());
        self.pages.push(slot);
        Ok(PageHandle {
            index: self.pages.len() - 1,
        })
    }

    fn render_page(&mut self, handle: PageHandle, page: &FixedPage) -> Result<(), RenderError> {
        if handle.index >= self.pages.len() {
            return Err(RenderError::InvalidPage(format!(
                "no page with index {} in this document",
                handle.index
            )));
        }

        let mut ctx = PageContext::new(page.height);
        for element in &page.elements {
            match element {
                PageElement::Glyphs(run) => {
                    let resource_name = self.resolve_font(&run.font)?;
                    ctx.draw_glyph_run(run, &resource_name);
                }
                PageElement::Path(path) => ctx.draw_path(path),
            }
        }

        let contents = self.writer_mut()?.buffer_content_stream(ctx.finish())?;
        let slot = &self.pages[handle.index];
        let id = slot.id;
        let dict = self.page_dict(slot, Some(contents))?;
        self.writer_mut()?.buffer_object_at_id(id, dict.into());
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>, RenderError> {
        let mut renderer = *self;
        let writer = renderer.writer.take().ok_or_else(|| {
            RenderError::Other("Document was never started with begin_document".into())
        })?;
        let bytes = writer.finish()?.into_inner();
        log::debug!(
            "Finished PDF: {} page(s), {} font(s), {} bytes",
            renderer.pages.len(),
            renderer.fonts.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
