//! The fixed-layout source model: a sequence of documents, each an ordered
//! list of pages carrying absolutely positioned glyph runs and paths.
//!
//! The model is loaded from JSON. A page entry of `null` is an absent page;
//! converters skip it.

use crate::color::Color;
use crate::font::FontStyle;
use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(default)]
    pub documents: Vec<FixedDocument>,
}

impl SourceDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Number of present (non-null) pages across all documents.
    pub fn page_count(&self) -> usize {
        self.documents.iter().map(FixedDocument::page_count).sum()
    }

    /// Iterates present pages in document order, then page order.
    pub fn pages(&self) -> impl Iterator<Item = &FixedPage> {
        self.documents
            .iter()
            .flat_map(|doc| doc.pages.iter().filter_map(Option::as_ref))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedDocument {
    #[serde(default)]
    pub pages: Vec<Option<FixedPage>>,
}

impl FixedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPage {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

impl FixedPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: PageElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Glyph runs on this page, in paint order.
    pub fn glyph_runs(&self) -> impl Iterator<Item = &GlyphRun> {
        self.elements.iter().filter_map(|e| match e {
            PageElement::Glyphs(run) => Some(run),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageElement {
    Glyphs(GlyphRun),
    Path(PathElement),
}

/// A run of text set in one font at one size, starting at a baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    pub origin: Point,
    pub font: FontRef,
    pub size: f32,
    pub text: String,
    #[serde(default)]
    pub fill: Color,
}

/// How a glyph run names its font.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontRef {
    /// A font program shipped inside the source package, identified by a
    /// caller-chosen name and loaded from `resource`.
    Embedded { name: String, resource: String },
    /// An installed font resolved by family and style.
    Installed {
        family: String,
        #[serde(default)]
        style: FontStyle,
    },
}

impl FontRef {
    pub fn installed(family: impl Into<String>, style: FontStyle) -> Self {
        FontRef::Installed {
            family: family.into(),
            style,
        }
    }

    pub fn embedded(name: impl Into<String>, resource: impl Into<String>) -> Self {
        FontRef::Embedded {
            name: name.into(),
            resource: resource.into(),
        }
    }
}

/// A closed polygon, filled and optionally stroked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathElement {
    pub points: Vec<Point>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub stroke: Option<Color>,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

fn default_stroke_width() -> f32 {
    1.0
}

impl PathElement {
    /// An axis-aligned filled rectangle.
    pub fn rect(x: f32, y: f32, width: f32, height: f32, fill: Color) -> Self {
        Self {
            points: vec![
                Point::new(x, y),
                Point::new(x + width, y),
                Point::new(x + width, y + height),
                Point::new(x, y + height),
            ],
            fill: Some(fill),
            stroke: None,
            stroke_width: default_stroke_width(),
        }
    }
}
