use super::{PLACEHOLDER, RenderContext};
use crate::model::{FontFace, TextAlign};
use crate::text::TextStyle;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct KeyValueRow {
    pub(crate) label: String,
    pub(crate) value: Option<String>,
}

impl KeyValueRow {
    pub(crate) fn new(label: impl Into<String>, value: Option<String>) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct KeyValueStyle {
    /// Offset of the value column from the left margin.
    pub(crate) value_offset: f32,
    pub(crate) size: f32,
    pub(crate) label_face: FontFace,
    pub(crate) value_face: FontFace,
}

impl KeyValueStyle {
    pub(crate) fn plain(value_offset: f32, size: f32) -> Self {
        Self {
            value_offset,
            size,
            label_face: FontFace::Regular,
            value_face: FontFace::Regular,
        }
    }
}

/// Space kept between the end of a label and its value column.
const COLUMN_GAP: f32 = 8.0;
/// The value column never starts further right than this share of the width.
const MAX_LABEL_SHARE: f32 = 0.6;

/// Wrapped label and value lines of one row.
struct RowLines {
    label: Vec<String>,
    value: Vec<String>,
}

impl RowLines {
    fn count(&self) -> usize {
        self.label.len().max(self.value.len())
    }
}

/// Value column offset for a whole table: the configured offset, pushed right
/// when a label would run into it.
fn value_offset(ctx: &RenderContext<'_>, rows: &[KeyValueRow], style: KeyValueStyle) -> f32 {
    let widest = rows
        .iter()
        .map(|row| ctx.fonts.text_width(&row.label, style.label_face, style.size))
        .fold(0.0_f32, f32::max);
    let limit = (ctx.width() * MAX_LABEL_SHARE).max(style.value_offset);
    (widest + COLUMN_GAP).clamp(style.value_offset, limit)
}

/// Height of the first row, for keeping a heading with it.
pub(crate) fn first_row_height(
    ctx: &RenderContext<'_>,
    rows: &[KeyValueRow],
    style: KeyValueStyle,
) -> f32 {
    let offset = value_offset(ctx, rows, style);
    rows.first()
        .map(|row| row_lines(ctx, row, style, offset).count() as f32 * ctx.line_height(style.size))
        .unwrap_or(0.0)
}

fn row_lines(ctx: &RenderContext<'_>, row: &KeyValueRow, style: KeyValueStyle, offset: f32) -> RowLines {
    let value = row.value.as_deref().unwrap_or(PLACEHOLDER);
    let mut value = ctx.wrap(value, ctx.width() - offset, TextStyle::new(style.value_face, style.size));
    if value.is_empty() {
        value.push(PLACEHOLDER.to_string());
    }
    let label = ctx.wrap(&row.label, offset - COLUMN_GAP, TextStyle::new(style.label_face, style.size));
    RowLines { label, value }
}

/// Label/value table. Values wrap inside their column and a missing value
/// prints the placeholder. Labels too long for their column wrap instead of
/// running into the value.
pub(crate) fn render_key_values(
    ctx: &mut RenderContext<'_>,
    heading: Option<&str>,
    rows: &[KeyValueRow],
    style: KeyValueStyle,
) {
    if let Some(title) = heading {
        let keep = first_row_height(ctx, rows, style);
        let size = ctx.typography.heading;
        ctx.heading(title, size, keep);
    }

    let label_style = TextStyle::new(style.label_face, style.size);
    let value_style = TextStyle::new(style.value_face, style.size);
    let line_h = ctx.line_height(style.size);
    let left = ctx.left();
    let offset = value_offset(ctx, rows, style);
    let (label_color, value_color) = (ctx.theme.muted, ctx.theme.text);

    for row in rows {
        let lines = row_lines(ctx, row, style, offset);
        ctx.block(lines.count() as f32 * line_h, |ctx, top| {
            for (i, line) in lines.label.into_iter().enumerate() {
                let baseline = ctx.baseline(top + i as f32 * line_h, label_style);
                ctx.text(left, baseline, line, label_style, label_color, TextAlign::Left);
            }
            for (i, line) in lines.value.into_iter().enumerate() {
                let baseline = ctx.baseline(top + i as f32 * line_h, value_style);
                ctx.text(left + offset, baseline, line, value_style, value_color, TextAlign::Left);
            }
        });
    }
}
