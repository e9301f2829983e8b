use fixpdf_render_core::RenderError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a conversion.
///
/// A conversion either produces its complete output or fails with one of
/// these; no partial file is ever left at the destination.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Source document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rendering failed (doc={doc}, page={page}): {source}")]
    Render {
        doc: usize,
        page: usize,
        #[source]
        source: RenderError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist output to '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Converter configuration is invalid: {0}")]
    Config(String),
}

impl ConvertError {
    pub(crate) fn render(doc: usize, page: usize) -> impl FnOnce(RenderError) -> Self {
        move |source| ConvertError::Render { doc, page, source }
    }
}
