use super::RenderContext;
use crate::model::TextAlign;

const BULLET: &str = "\u{2022}";
const BULLET_INDENT: f32 = 11.0;
const ITEM_GAP: f32 = 2.0;

/// Whether any item has printable text.
pub(crate) fn has_items(items: &[String]) -> bool {
    items.iter().any(|item| !item.trim().is_empty())
}

/// Bulleted list with an optional bold heading. Items are wrapped one by one
/// with a hanging indent. An empty list draws nothing, heading included.
/// Returns whether anything was drawn.
pub(crate) fn render_bullets(
    ctx: &mut RenderContext<'_>,
    heading: Option<&str>,
    items: &[String],
) -> bool {
    if !has_items(items) {
        return false;
    }
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let style = ctx.body_style();
    let line_h = ctx.line_height(style.size);
    let x = ctx.left() + BULLET_INDENT;
    let width = ctx.width() - 2.0 * BULLET_INDENT;
    let color = ctx.theme.text;

    if let Some(title) = heading {
        let size = ctx.typography.body;
        ctx.heading(title, size, line_h);
    }

    for item in items {
        let lines = ctx.wrap(item, width, style);
        for (i, line) in lines.iter().enumerate() {
            ctx.block(line_h, |ctx, top| {
                let baseline = ctx.baseline(top, style);
                if i == 0 {
                    ctx.text(x - BULLET_INDENT / 1.5, baseline, BULLET, style, color, TextAlign::Left);
                }
                ctx.text(x, baseline, line.as_str(), style, color, TextAlign::Left);
            });
        }
        ctx.gap(ITEM_GAP);
    }
    true
}
