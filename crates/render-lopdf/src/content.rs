//! Page content stream construction.
//!
//! Source coordinates have a top-left origin with y growing downward; they
//! are flipped into PDF space as operators are emitted.

use fixpdf_fonts::encoding::encode_win_ansi;
use fixpdf_render_core::utils::flip_y;
use fixpdf_types::{Color, GlyphRun, PathElement};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

#[derive(Default, Clone, PartialEq)]
struct GraphicsState {
    font_name: String,
    font_size: f32,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

/// Accumulates the operators for one page, skipping redundant state changes.
pub(crate) struct PageContext {
    page_height: f32,
    content: Content,
    state: GraphicsState,
}

impl PageContext {
    pub(crate) fn new(page_height: f32) -> Self {
        Self {
            page_height,
            content: Content { operations: vec![] },
            state: GraphicsState::default(),
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.push("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.state.stroke_color != Some(color) {
            let [r, g, b] = color.to_unit_rgb();
            self.push("RG", vec![r.into(), g.into(), b.into()]);
            self.state.stroke_color = Some(color);
        }
        if self.state.line_width != Some(width) {
            self.push("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn set_font(&mut self, resource_name: &str, size: f32) {
        if self.state.font_name != resource_name || self.state.font_size != size {
            self.push("Tf", vec![Object::Name(resource_name.as_bytes().to_vec()), size.into()]);
            self.state.font_name = resource_name.to_string();
            self.state.font_size = size;
        }
    }

    /// Draws `run` with the font registered as `resource_name`. The run's
    /// origin is its baseline start.
    pub(crate) fn draw_glyph_run(&mut self, run: &GlyphRun, resource_name: &str) {
        if run.text.is_empty() {
            return;
        }
        self.push("BT", vec![]);
        self.set_font(resource_name, run.size);
        self.set_fill_color(run.fill);
        let pdf_y = flip_y(run.origin.y, self.page_height);
        self.push("Td", vec![run.origin.x.into(), pdf_y.into()]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    pub(crate) fn draw_path(&mut self, path: &PathElement) {
        let Some((first, rest)) = path.points.split_first() else {
            return;
        };
        if rest.is_empty() {
            log::debug!("Skipping single-point path at ({}, {})", first.x, first.y);
            return;
        }

        if let Some(fill) = path.fill {
            self.set_fill_color(fill);
        }
        if let Some(stroke) = path.stroke {
            self.set_stroke(stroke, path.stroke_width);
        }

        self.push("m", vec![first.x.into(), flip_y(first.y, self.page_height).into()]);
        for point in rest {
            self.push("l", vec![point.x.into(), flip_y(point.y, self.page_height).into()]);
        }
        self.push("h", vec![]);

        let paint = match (path.fill.is_some(), path.stroke.is_some()) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        };
        self.push(paint, vec![]);
    }
}
