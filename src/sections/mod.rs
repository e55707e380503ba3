//! Section renderers. Each one writes top-down through the shared
//! [`LayoutCursor`](crate::layout::LayoutCursor): reserve, draw, advance.

mod checklist;
mod clinical;
mod header;
mod key_value;
mod lab;
mod list;
mod paragraph;
mod risk;

pub(crate) use checklist::render_checklist;
pub(crate) use clinical::{render_case_information, render_planning_data, render_reflections};
pub(crate) use header::render_header;
pub(crate) use lab::{
    render_additional_lab_notes, render_case_identification, render_implant_site_notes,
    render_lab_notice, render_prosthetic_instructions, render_restoration_spec,
    render_team_assignment,
};
pub(crate) use risk::render_risk_assessment;

use crate::config::Typography;
use crate::fonts::TextMeasure;
use crate::layout::LayoutCursor;
use crate::model::{Color, Document, DrawCommand, FontFace, TextAlign};
use crate::text::{self, TextStyle};

pub(crate) const PLACEHOLDER: &str = "-";

/// Space between a heading and its first row.
const HEADING_GAP: f32 = 3.0;
/// Space after each section.
const SECTION_GAP: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Theme {
    pub(crate) accent: Color,
    pub(crate) text: Color,
    pub(crate) muted: Color,
}

impl Theme {
    pub(crate) fn new(accent: Color) -> Self {
        Self {
            accent,
            text: Color(31, 41, 55),
            muted: Color(100, 116, 139),
        }
    }
}

pub(crate) struct RenderContext<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) cursor: &'a mut LayoutCursor,
    pub(crate) fonts: &'a dyn TextMeasure,
    pub(crate) typography: Typography,
    pub(crate) theme: Theme,
}

impl RenderContext<'_> {
    pub(crate) fn left(&self) -> f32 {
        self.doc.geometry().margin_left
    }

    pub(crate) fn width(&self) -> f32 {
        self.doc.geometry().content_width()
    }

    pub(crate) fn line_height(&self, size: f32) -> f32 {
        self.typography.line_height(size)
    }

    pub(crate) fn wrap(&self, text: &str, width: f32, style: TextStyle) -> Vec<String> {
        text::wrap(text, width, style, self.fonts)
    }

    /// Baseline of a line whose box starts at `top`, centred in its leading.
    pub(crate) fn baseline(&self, top: f32, style: TextStyle) -> f32 {
        let line_h = self.line_height(style.size);
        top + (line_h - style.size) / 2.0 + style.size * self.fonts.ascender_ratio(style.face)
    }

    pub(crate) fn emit(&mut self, command: DrawCommand) {
        assert!(
            self.cursor.is_reserved(),
            "draw command emitted without reserved space"
        );
        self.doc.push(self.cursor.page(), command);
    }

    pub(crate) fn text(
        &mut self,
        x: f32,
        baseline: f32,
        text: impl Into<String>,
        style: TextStyle,
        color: Color,
        align: TextAlign,
    ) {
        self.emit(DrawCommand::Text {
            x,
            y: baseline,
            text: text.into(),
            face: style.face,
            size: style.size,
            color,
            align,
        });
    }

    pub(crate) fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Color, radius: f32) {
        self.emit(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill,
            radius,
        });
    }

    /// Reserve `height`, let `draw` write below the block's top y, then move
    /// past it.
    pub(crate) fn block(&mut self, height: f32, draw: impl FnOnce(&mut Self, f32)) {
        self.cursor.ensure_space(self.doc, height);
        let top = self.cursor.y();
        draw(self, top);
        self.cursor.advance(height);
    }

    pub(crate) fn heading_height(&self, size: f32) -> f32 {
        self.line_height(size) + HEADING_GAP
    }

    /// Bold heading kept on the same page as the first `keep_with` points of
    /// what follows it.
    pub(crate) fn heading(&mut self, title: &str, size: f32, keep_with: f32) {
        let style = TextStyle::new(FontFace::Bold, size);
        let height = self.heading_height(size);
        self.cursor.ensure_space(self.doc, height + keep_with);
        let oversized = !self.cursor.fits(height + keep_with);
        let top = self.cursor.y();
        let (x, baseline, color) = (self.left(), self.baseline(top, style), self.theme.text);
        self.text(x, baseline, title, style, color, TextAlign::Left);
        self.cursor.advance(height);
        if oversized {
            self.cursor.keep_with_next();
        }
    }

    /// Already-wrapped lines, one block per line so long text may continue
    /// on the next page.
    pub(crate) fn lines(&mut self, lines: &[String], x: f32, style: TextStyle, color: Color) {
        let line_h = self.line_height(style.size);
        for line in lines {
            self.block(line_h, |ctx, top| {
                let baseline = ctx.baseline(top, style);
                ctx.text(x, baseline, line.as_str(), style, color, TextAlign::Left);
            });
        }
    }

    pub(crate) fn gap(&mut self, height: f32) {
        self.cursor.gap(height);
    }

    pub(crate) fn end_section(&mut self) {
        self.cursor.gap(SECTION_GAP);
    }

    pub(crate) fn body_style(&self) -> TextStyle {
        TextStyle::new(FontFace::Regular, self.typography.body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::config::PageGeometry;
    use crate::fonts::FontSet;
    use crate::variant::Variant;

    pub(crate) fn document() -> Document {
        Document::new(
            Variant::Dentist,
            "Test",
            PageGeometry::default(),
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    /// Run `render` against a fresh document whose cursor sits at the top
    /// margin of page one.
    pub(crate) fn render_with(render: impl FnOnce(&mut RenderContext<'_>)) -> Document {
        let mut doc = document();
        let mut cursor = LayoutCursor::new(&doc);
        let top = doc.geometry().content_top();
        cursor.ensure_space(&mut doc, top);
        cursor.advance(top);
        let fonts = FontSet::standard();
        let mut ctx = RenderContext {
            doc: &mut doc,
            cursor: &mut cursor,
            fonts: &fonts,
            typography: Typography::default(),
            theme: Theme::new(Color(47, 128, 237)),
        };
        render(&mut ctx);
        doc
    }

    pub(crate) fn texts(doc: &Document) -> Vec<String> {
        doc.pages()
            .iter()
            .flat_map(|p| p.texts().map(str::to_string))
            .collect()
    }
}
