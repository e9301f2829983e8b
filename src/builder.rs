use crate::converter::Converter;
use crate::error::ConvertError;
use fixpdf_executor::{Executor, ExecutorImpl};
use fixpdf_fonts::{FontDescriptorCache, FontProvider};
use fixpdf_render_lopdf::DEFAULT_PDF_VERSION;
use fixpdf_resource::FilesystemResourceProvider;
use fixpdf_traits::{InMemoryResourceProvider, ResourceProvider};
use std::path::Path;
use std::sync::Arc;

const SUPPORTED_PDF_VERSIONS: &[&str] = &["1.4", "1.5", "1.6", "1.7", "2.0"];

enum CacheSource {
    Global,
    Shared(Arc<FontDescriptorCache>),
    Fresh(Arc<dyn FontProvider>),
}

/// A builder for creating a [`Converter`].
///
/// By default the converter uses the process-wide font cache, an empty
/// resource provider, the parallel executor and PDF 1.7.
pub struct ConverterBuilder {
    cache: CacheSource,
    resources: Option<Arc<dyn ResourceProvider>>,
    executor: Option<ExecutorImpl>,
    pdf_version: String,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self {
            cache: CacheSource::Global,
            resources: None,
            executor: None,
            pdf_version: DEFAULT_PDF_VERSION.to_string(),
        }
    }
}

impl ConverterBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Shares [`FontDescriptorCache::global`] with every other user in the process.
    pub fn with_global_cache(mut self) -> Self {
        self.cache = CacheSource::Global;
        self
    }

    /// Uses an existing cache, e.g. one shared with another converter.
    pub fn with_font_cache(mut self, cache: Arc<FontDescriptorCache>) -> Self {
        self.cache = CacheSource::Shared(cache);
        self
    }

    /// Builds a fresh cache, private to this converter, over `provider`.
    pub fn with_font_provider(mut self, provider: Arc<dyn FontProvider>) -> Self {
        self.cache = CacheSource::Fresh(provider);
        self
    }

    /// Sets where embedded parts (font programs) are loaded from.
    pub fn with_resources(mut self, resources: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Loads embedded parts from files under `root`.
    pub fn with_resource_dir<P: AsRef<Path>>(self, root: P) -> Self {
        self.with_resources(Arc::new(FilesystemResourceProvider::new(root)))
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_pdf_version(mut self, version: impl Into<String>) -> Self {
        self.pdf_version = version.into();
        self
    }

    /// Builds the converter.
    pub fn build(self) -> Result<Converter, ConvertError> {
        if !SUPPORTED_PDF_VERSIONS.contains(&self.pdf_version.as_str()) {
            return Err(ConvertError::Config(format!(
                "unsupported PDF version '{}' (expected one of {})",
                self.pdf_version,
                SUPPORTED_PDF_VERSIONS.join(", ")
            )));
        }

        let cache = match self.cache {
            CacheSource::Global => FontDescriptorCache::global(),
            CacheSource::Shared(cache) => cache,
            CacheSource::Fresh(provider) => Arc::new(FontDescriptorCache::new(provider)),
        };
        let resources = self
            .resources
            .unwrap_or_else(|| Arc::new(InMemoryResourceProvider::new()));
        let executor = self.executor.unwrap_or_default();

        log::debug!(
            "Building converter: PDF {}, executor {}, fonts via {}",
            self.pdf_version,
            executor.name(),
            cache.provider().name()
        );

        Ok(Converter {
            cache,
            resources,
            executor,
            pdf_version: self.pdf_version,
        })
    }
}
