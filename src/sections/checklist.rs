use super::{PLACEHOLDER, RenderContext};
use crate::case::ChecklistItem;
use crate::fonts::{BALLOT_BOX, BALLOT_BOX_CHECKED};
use crate::model::{FontFace, TextAlign};
use crate::text::TextStyle;

const TEXT_INDENT: f32 = 22.0;
const NOTE_INDENT: f32 = 11.0;
const NOTE_GAP: f32 = 2.0;
const ITEM_GAP: f32 = 5.0;

/// A checklist item and its note, measured as one unit.
struct ItemLayout {
    text: Vec<String>,
    note: Vec<String>,
    height: f32,
}

fn measure_item(
    ctx: &RenderContext<'_>,
    item: &ChecklistItem,
    redact_notes: bool,
    text_style: TextStyle,
    note_style: TextStyle,
) -> ItemLayout {
    let text_width = ctx.width() - TEXT_INDENT;
    let mut text = ctx.wrap(item.text.as_deref().unwrap_or_default(), text_width, text_style);
    if text.is_empty() {
        text.push(PLACEHOLDER.to_string());
    }

    let note = match item.notes.as_deref() {
        Some(notes) if !redact_notes => ctx.wrap(
            &format!("Note: {notes}"),
            text_width - NOTE_INDENT,
            note_style,
        ),
        _ => Vec::new(),
    };

    let mut height = text.len() as f32 * ctx.line_height(text_style.size);
    if !note.is_empty() {
        height += NOTE_GAP + note.len() as f32 * ctx.line_height(note_style.size);
    }
    ItemLayout { text, note, height }
}

/// Checkbox list. Each item together with its note is one unit that never
/// splits across pages. Notes are left out entirely when `redact_notes` is
/// set. An empty list draws nothing. Returns whether anything was drawn.
pub(crate) fn render_checklist(
    ctx: &mut RenderContext<'_>,
    title: &str,
    items: &[ChecklistItem],
    redact_notes: bool,
) -> bool {
    if items.is_empty() {
        return false;
    }

    let text_style = TextStyle::new(FontFace::Regular, ctx.typography.checklist);
    let note_style = TextStyle::new(FontFace::Regular, ctx.typography.note);
    let left = ctx.left();
    let theme = ctx.theme;
    let text_lh = ctx.line_height(text_style.size);
    let note_lh = ctx.line_height(note_style.size);

    let layouts: Vec<ItemLayout> = items
        .iter()
        .map(|item| measure_item(ctx, item, redact_notes, text_style, note_style))
        .collect();

    let size = ctx.typography.subheading;
    ctx.heading(title, size, layouts[0].height);

    for (item, layout) in items.iter().zip(layouts) {
        ctx.block(layout.height, |ctx, top| {
            let (glyph, glyph_color) = if item.completed {
                (BALLOT_BOX_CHECKED, theme.accent)
            } else {
                (BALLOT_BOX, theme.muted)
            };
            let baseline = ctx.baseline(top, text_style);
            ctx.text(left, baseline, glyph, text_style, glyph_color, TextAlign::Left);

            let mut y = top;
            for line in layout.text {
                let baseline = ctx.baseline(y, text_style);
                ctx.text(left + TEXT_INDENT, baseline, line, text_style, theme.text, TextAlign::Left);
                y += text_lh;
            }
            if !layout.note.is_empty() {
                y += NOTE_GAP;
                for line in layout.note {
                    let baseline = ctx.baseline(y, note_style);
                    ctx.text(
                        left + TEXT_INDENT + NOTE_INDENT,
                        baseline,
                        line,
                        note_style,
                        theme.muted,
                        TextAlign::Left,
                    );
                    y += note_lh;
                }
            }
        });
        ctx.gap(ITEM_GAP);
    }
    true
}
