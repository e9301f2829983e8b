#![allow(dead_code)]

pub mod pdf_assertions;

use fixpdf::{
    Converter, ConverterBuilder, ExecutorImpl, FixedPage, FontRef, FontStyle, GlyphRun, InMemoryFontProvider,
    InMemoryResourceProvider, PageElement, Point,
};
use fixpdf_fonts::testing::synthetic_font;
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const SANS: &str = "Test Sans";
pub const SERIF: &str = "Test Serif";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A provider holding `Test Sans` Regular and `Test Serif` Bold.
pub fn font_provider() -> Arc<InMemoryFontProvider> {
    let provider = InMemoryFontProvider::new();
    provider
        .add_font(SANS, FontStyle::REGULAR, synthetic_font(SANS, FontStyle::REGULAR))
        .expect("register sans");
    provider
        .add_font(SERIF, FontStyle::BOLD, synthetic_font(SERIF, FontStyle::BOLD))
        .expect("register serif");
    Arc::new(provider)
}

/// A sequential converter with its own cache over [`font_provider`].
pub fn converter() -> Converter {
    ConverterBuilder::new()
        .with_font_provider(font_provider())
        .with_executor(ExecutorImpl::sequential())
        .build()
        .expect("converter builds")
}

pub fn converter_with_resources(resources: InMemoryResourceProvider) -> Converter {
    ConverterBuilder::new()
        .with_font_provider(font_provider())
        .with_resources(Arc::new(resources))
        .with_executor(ExecutorImpl::sequential())
        .build()
        .expect("converter builds")
}

pub fn text(family: &str, style: FontStyle, content: &str, y: f32) -> PageElement {
    PageElement::Glyphs(GlyphRun {
        origin: Point::new(72.0, y),
        font: FontRef::installed(family, style),
        size: 12.0,
        text: content.to_string(),
        fill: Default::default(),
    })
}

/// A US-Letter page with one line of text per `(family, style, text)`.
pub fn page_with_text(lines: &[(&str, FontStyle, &str)]) -> FixedPage {
    lines
        .iter()
        .enumerate()
        .fold(FixedPage::new(612.0, 792.0), |page, (i, (family, style, content))| {
            page.with_element(text(family, *style, content, 72.0 + 20.0 * i as f32))
        })
}
