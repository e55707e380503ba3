use super::RenderContext;
use crate::model::{Color, TextAlign};
use crate::text::TextStyle;

const LABEL_GAP: f32 = 1.0;

/// Height of a paragraph label, gap included.
pub(crate) fn label_height(ctx: &RenderContext<'_>) -> f32 {
    ctx.line_height(ctx.typography.body) + LABEL_GAP
}

/// Wrapped free text under an optional muted label. The label is kept with
/// the first line; the rest may break across pages line by line. Returns
/// false without drawing when the text is blank.
pub(crate) fn render_paragraph(
    ctx: &mut RenderContext<'_>,
    label: Option<&str>,
    text: &str,
    style: TextStyle,
    color: Color,
) -> bool {
    let width = ctx.width();
    let lines = ctx.wrap(text, width, style);
    if lines.is_empty() {
        return false;
    }

    let left = ctx.left();
    let line_h = ctx.line_height(style.size);
    if let Some(label) = label {
        let label_style = ctx.body_style();
        let label_h = label_height(ctx);
        let muted = ctx.theme.muted;
        ctx.cursor.ensure_space(ctx.doc, label_h + line_h);
        let top = ctx.cursor.y();
        let baseline = ctx.baseline(top, label_style);
        ctx.text(left, baseline, label, label_style, muted, TextAlign::Left);
        ctx.cursor.advance(label_h);
    }
    ctx.lines(&lines, left, style, color);
    true
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::model::FontFace;

    #[test]
    fn blank_text_draws_nothing() {
        let doc = render_with(|ctx| {
            let style = ctx.body_style();
            assert!(!render_paragraph(ctx, Some("Additional Notes:"), " \n ", style, Color::WHITE));
        });
        assert!(texts(&doc).is_empty());
    }

    #[test]
    fn label_precedes_the_wrapped_lines() {
        let doc = render_with(|ctx| {
            let style = TextStyle::new(FontFace::Italic, 10.0);
            let text = "unusual ".repeat(50);
            assert!(render_paragraph(ctx, Some("What was unexpected:"), &text, style, Color(0, 0, 0)));
        });
        let texts = texts(&doc);
        assert_eq!(texts[0], "What was unexpected:");
        assert!(texts.len() > 3);
        assert!(texts[1..].iter().all(|t| t.starts_with("unusual")));
    }
}
