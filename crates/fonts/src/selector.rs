use fixpdf_types::{FontFamily, FontStyle, LogicalFont};
use std::fmt;

/// Identifies a logical font by name and style.
///
/// There is a one-to-one relationship between a selector and a parsed font
/// program. Names compare case-sensitively, exactly as constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSelector {
    name: String,
    style: FontStyle,
}

impl FontSelector {
    pub fn new(name: impl Into<String>, style: FontStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    pub fn from_font(font: &LogicalFont) -> Self {
        Self::new(font.name(), font.style)
    }

    pub fn from_family(family: &FontFamily, style: FontStyle) -> Self {
        Self::new(family.name.as_str(), style)
    }

    /// Keys a raw font program registered under a caller-chosen name. The
    /// style is always Regular, so distinct payloads registered under one
    /// name share a single identity.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self::new(name, FontStyle::REGULAR)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }
}

/// Diagnostic rendering only: `Arial(BoldItalic)`.
impl fmt::Display for FontSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.style.name())
    }
}
