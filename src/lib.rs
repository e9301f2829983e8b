//! Converts fixed-layout documents (absolutely positioned glyph runs and
//! paths, loaded from JSON) into PDF.
//!
//! ```no_run
//! use fixpdf::{Converter, ConverterBuilder};
//!
//! let converter = ConverterBuilder::new().build()?;
//! let source = Converter::read_source("report.json")?;
//! converter.convert(&source, "report.pdf", 0)?;
//! # Ok::<(), fixpdf::ConvertError>(())
//! ```
//!
//! Fonts are resolved once per process through the shared
//! [`FontDescriptorCache`]; see `fixpdf-fonts` for its guarantees.

mod builder;
mod converter;
mod error;

pub use builder::ConverterBuilder;
pub use converter::{ConversionJob, ConversionReport, Converter};
pub use error::ConvertError;

pub use fixpdf_executor::{Executor, ExecutorImpl};
pub use fixpdf_fonts::{
    force_release_cached_fonts, CacheStats, FontDescriptor, FontDescriptorCache, FontError, FontProvider,
    FontSelector, InMemoryFontProvider,
};
#[cfg(feature = "system-fonts")]
pub use fixpdf_fonts::SystemFontProvider;
pub use fixpdf_render_core::RenderError;
pub use fixpdf_resource::FilesystemResourceProvider;
pub use fixpdf_traits::{InMemoryResourceProvider, ResourceError, ResourceProvider};
pub use fixpdf_types::*;
