use crate::error::ConvertError;
use fixpdf_executor::{Executor, ExecutorImpl};
use fixpdf_fonts::FontDescriptorCache;
use fixpdf_render_core::PageRenderer;
use fixpdf_render_lopdf::LopdfPageRenderer;
use fixpdf_traits::ResourceProvider;
use fixpdf_types::SourceDocument;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Converts fixed-layout source documents into PDF files.
///
/// All conversions made through one `Converter` (and its clones) share a
/// single [`FontDescriptorCache`], so a font used by many pages or many jobs
/// is parsed once.
#[derive(Debug, Clone)]
pub struct Converter {
    pub(crate) cache: Arc<FontDescriptorCache>,
    pub(crate) resources: Arc<dyn ResourceProvider>,
    pub(crate) executor: ExecutorImpl,
    pub(crate) pdf_version: String,
}

/// One unit of work for [`Converter::convert_batch`].
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub source: SourceDocument,
    pub output: PathBuf,
    /// Label used in log lines and errors for this job.
    pub doc_index: usize,
}

impl ConversionJob {
    pub fn new(source: SourceDocument, output: impl Into<PathBuf>, doc_index: usize) -> Self {
        Self {
            source,
            output: output.into(),
            doc_index,
        }
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub doc_index: usize,
    /// Pages written to the output.
    pub pages: usize,
    /// Absent source pages that were skipped.
    pub skipped: usize,
    /// Distinct fonts embedded in the output.
    pub fonts: usize,
    pub bytes: usize,
    /// Destination file, when the output was written to disk.
    pub output: Option<PathBuf>,
}

struct PageTally {
    rendered: usize,
    skipped: usize,
}

impl Converter {
    pub fn cache(&self) -> &Arc<FontDescriptorCache> {
        &self.cache
    }

    pub fn executor(&self) -> &ExecutorImpl {
        &self.executor
    }

    pub fn pdf_version(&self) -> &str {
        &self.pdf_version
    }

    /// Reads and parses a JSON source document from disk.
    pub fn read_source<P: AsRef<Path>>(path: P) -> Result<SourceDocument, ConvertError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ConvertError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read source document '{}': {}", path.display(), e),
            ))
        })?;
        Ok(SourceDocument::from_json(&json)?)
    }

    /// Converts `source` into a PDF at `output_path`.
    ///
    /// Absent pages are skipped. The file only appears once every page has
    /// rendered: output goes to a temporary file in the destination directory
    /// which is then atomically renamed over `output_path`. On any error the
    /// destination is left untouched.
    pub fn convert<P: AsRef<Path>>(
        &self,
        source: &SourceDocument,
        output_path: P,
        doc_index: usize,
    ) -> Result<ConversionReport, ConvertError> {
        let output_path = output_path.as_ref();
        if output_path.as_os_str().is_empty() {
            return Err(ConvertError::InvalidArgument("output path must not be empty".into()));
        }

        let (bytes, mut report) = self.render(source, doc_index)?;
        persist(output_path, &bytes)?;
        report.output = Some(output_path.to_path_buf());

        log::info!(
            "doc={}: wrote {} page(s), {} font(s), {} bytes to '{}'",
            doc_index,
            report.pages,
            report.fonts,
            report.bytes,
            output_path.display()
        );
        Ok(report)
    }

    /// Like [`Converter::convert`], returning the PDF bytes instead of
    /// writing a file.
    pub fn convert_to_bytes(&self, source: &SourceDocument, doc_index: usize) -> Result<Vec<u8>, ConvertError> {
        let (bytes, report) = self.render(source, doc_index)?;
        log::info!(
            "doc={}: rendered {} page(s), {} font(s), {} bytes",
            doc_index,
            report.pages,
            report.fonts,
            report.bytes
        );
        Ok(bytes)
    }

    /// Converts every job with the configured executor. Results come back in
    /// job order; one failed job does not affect the others.
    pub fn convert_batch(&self, jobs: Vec<ConversionJob>) -> Vec<Result<ConversionReport, ConvertError>> {
        log::info!(
            "Converting {} job(s) with {} (parallelism {})",
            jobs.len(),
            self.executor.name(),
            self.executor.parallelism()
        );
        let worker = self.clone();
        self.executor
            .execute_all_fallible(jobs, move |job| worker.convert(&job.source, &job.output, job.doc_index))
    }

    fn render(&self, source: &SourceDocument, doc_index: usize) -> Result<(Vec<u8>, ConversionReport), ConvertError> {
        let mut renderer = LopdfPageRenderer::new(Arc::clone(&self.cache), Arc::clone(&self.resources))
            .with_pdf_version(self.pdf_version.clone());

        let tally = render_pages(&mut renderer, source, doc_index)?;
        if tally.rendered == 0 {
            log::warn!("doc={}: source contains no pages; output will be empty", doc_index);
        }
        let fonts = renderer.font_count();
        let bytes = Box::new(renderer)
            .finish()
            .map_err(ConvertError::render(doc_index, tally.rendered))?;

        let report = ConversionReport {
            doc_index,
            pages: tally.rendered,
            skipped: tally.skipped,
            fonts,
            bytes: bytes.len(),
            output: None,
        };
        Ok((bytes, report))
    }
}

/// Drives `renderer` over every present page of `source`, in document order
/// then page order. `page` in logs and errors counts rendered pages only.
fn render_pages(
    renderer: &mut dyn PageRenderer,
    source: &SourceDocument,
    doc_index: usize,
) -> Result<PageTally, ConvertError> {
    renderer.begin_document().map_err(ConvertError::render(doc_index, 0))?;

    let mut tally = PageTally { rendered: 0, skipped: 0 };
    for document in &source.documents {
        for page in &document.pages {
            let Some(page) = page else {
                tally.skipped += 1;
                continue;
            };
            log::debug!("doc={}, page={}", doc_index, tally.rendered);
            let handle = renderer
                .create_page(page)
                .map_err(ConvertError::render(doc_index, tally.rendered))?;
            renderer
                .render_page(handle, page)
                .map_err(ConvertError::render(doc_index, tally.rendered))?;
            tally.rendered += 1;
        }
    }
    if tally.skipped > 0 {
        log::debug!("doc={}: skipped {} absent page(s)", doc_index, tally.skipped);
    }
    Ok(tally)
}

fn persist(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| ConvertError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
