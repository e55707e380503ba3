use chrono::{DateTime, Utc};

use super::RenderContext;
use crate::model::{Color, FontFace, TextAlign};
use crate::text::TextStyle;
use crate::variant::ReportVariantPolicy;

/// Full-bleed title band across the top of page one.
pub(crate) fn render_header(
    ctx: &mut RenderContext<'_>,
    policy: &ReportVariantPolicy,
    generated_at: DateTime<Utc>,
) {
    let geometry = *ctx.doc.geometry();
    let band = geometry.header_band;
    let title_style = TextStyle::new(FontFace::Bold, ctx.typography.title);
    let meta_style = ctx.body_style();
    let date_line = format!(
        "{}: {}",
        policy.date_label,
        generated_at.format("%Y-%m-%d")
    );

    ctx.block(band, |ctx, top| {
        ctx.rect(0.0, top, geometry.width, band, policy.accent, 0.0);
        let right = geometry.right_edge();
        ctx.text(
            geometry.margin_left,
            top + band * 0.63,
            policy.title,
            title_style,
            Color::WHITE,
            TextAlign::Left,
        );
        ctx.text(
            right,
            top + band * 0.63,
            date_line,
            meta_style,
            Color::WHITE,
            TextAlign::Right,
        );
        ctx.text(
            right,
            top + band * 0.8,
            policy.copy_label,
            meta_style,
            Color::WHITE,
            TextAlign::Right,
        );
    });
    ctx.end_section();
}
