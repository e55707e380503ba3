use super::RenderContext;
use super::key_value::{KeyValueRow, KeyValueStyle, render_key_values};
use super::list::{has_items, render_bullets};
use super::paragraph::render_paragraph;
use crate::case::RiskAssessment;
use crate::model::{Color, FontFace, TextAlign};
use crate::text::TextStyle;

const BADGE_WIDTH: f32 = 170.0;
const BADGE_HEIGHT: f32 = 22.0;
const BADGE_RADIUS: f32 = 5.7;
const BADGE_GAP: f32 = 10.0;
const DETAIL_OFFSET: f32 = 102.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "moderate" => Some(RiskLevel::Moderate),
            "high" => Some(RiskLevel::High),
            _ => None,
        }
    }

    fn color(self) -> Color {
        match self {
            RiskLevel::Low => Color(16, 185, 129),
            RiskLevel::Moderate => Color(245, 158, 11),
            RiskLevel::High => Color(239, 68, 68),
        }
    }
}

/// Badge fill and label for a raw level. Unknown levels keep their text on a
/// muted badge.
pub(crate) fn badge(raw: Option<&str>, muted: Color) -> (Color, String) {
    let fill = raw.and_then(RiskLevel::parse).map_or(muted, RiskLevel::color);
    let label = raw.map_or_else(|| "UNSPECIFIED".to_string(), |r| r.trim().to_uppercase());
    (fill, format!("Overall: {label}"))
}

fn render_badge(ctx: &mut RenderContext<'_>, risk: &RiskAssessment) {
    let (fill, label) = badge(risk.overall_risk.as_deref(), ctx.theme.muted);
    let style = TextStyle::new(FontFace::Bold, ctx.typography.body);
    let left = ctx.left();
    let width = ctx
        .fonts
        .text_width(&label, style.face, style.size)
        .max(BADGE_WIDTH - 12.0)
        + 12.0;
    ctx.block(BADGE_HEIGHT, |ctx, top| {
        ctx.rect(left, top, width, BADGE_HEIGHT, fill, BADGE_RADIUS);
        let baseline = top + BADGE_HEIGHT / 2.0 + style.size * 0.35;
        ctx.text(left + 6.0, baseline, label, style, Color::WHITE, TextAlign::Left);
    });
    ctx.gap(BADGE_GAP);
}

/// Badge, detail rows, summary, supporting lists and the backup plan.
pub(crate) fn render_risk_assessment(ctx: &mut RenderContext<'_>, risk: &RiskAssessment) {
    let heading = ctx.typography.heading;
    ctx.heading("Risk Assessment", heading, BADGE_HEIGHT);
    render_badge(ctx, risk);

    let details: Vec<KeyValueRow> = [
        ("Primary Issue:", &risk.primary_issue),
        ("Complexity:", &risk.case_complexity),
        ("Timing:", &risk.implant_timing),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.clone().map(|v| KeyValueRow::new(label, Some(v))))
    .collect();
    let detail_style = KeyValueStyle {
        label_face: FontFace::Bold,
        ..KeyValueStyle::plain(DETAIL_OFFSET, ctx.typography.body)
    };
    render_key_values(ctx, None, &details, detail_style);

    let body = ctx.body_style();
    let text = ctx.theme.text;
    if let Some(summary) = &risk.plain_language_summary {
        ctx.gap(4.0);
        render_paragraph(ctx, None, summary, body, text);
    }
    if let Some(expanded) = &risk.primary_issue_expanded {
        ctx.gap(4.0);
        render_paragraph(ctx, Some("Primary Issue Detail:"), expanded, body, text);
    }

    for (title, items) in [
        ("Clinical Considerations:", &risk.considerations),
        ("Risk Factors:", &risk.factors),
        ("Risk Modifiers:", &risk.risk_modifiers),
        ("Complexity Drivers:", &risk.complexity_drivers),
        ("Clinical Rationale:", &risk.clinical_rationale),
    ] {
        if has_items(items) {
            ctx.gap(6.0);
            render_bullets(ctx, Some(title), items);
        }
    }

    if let Some(eligible) = risk.immediate_placement_eligible {
        ctx.gap(6.0);
        let verdict = if eligible { "Eligible" } else { "Not eligible" };
        let row = [KeyValueRow::new("Immediate Placement:", Some(verdict.to_string()))];
        render_key_values(ctx, None, &row, detail_style);
        render_bullets(ctx, None, &risk.immediate_placement_reasons);
    }

    if let Some(backup) = &risk.backup_awareness {
        ctx.gap(6.0);
        render_paragraph(ctx, Some("Backup Awareness:"), backup, body, text);
    }
    ctx.end_section();
}

#[cfg(test)]
mod tests {
    use super::super::Theme;
    use super::super::testing::*;
    use super::*;
    use crate::config::Typography;
    use crate::model::DrawCommand;

    const MUTED: Color = Color(1, 2, 3);

    #[test]
    fn known_levels_are_colored() {
        assert_eq!(badge(Some("high"), MUTED), (Color(239, 68, 68), "Overall: HIGH".into()));
        assert_eq!(badge(Some(" Low"), MUTED).0, Color(16, 185, 129));
    }

    #[test]
    fn unknown_levels_keep_their_text_on_muted() {
        assert_eq!(badge(Some("extreme"), MUTED), (MUTED, "Overall: EXTREME".into()));
    }

    #[test]
    fn missing_level_is_never_shown_as_moderate() {
        let risk = RiskAssessment {
            factors: vec!["Thin buccal plate".into()],
            ..RiskAssessment::default()
        };
        let doc = render_with(|ctx| render_risk_assessment(ctx, &risk));
        let texts = texts(&doc);
        assert!(texts.contains(&"Overall: UNSPECIFIED".to_string()), "{texts:?}");
        assert!(texts.iter().all(|t| !t.contains("MODERATE")));
        let fill = doc.pages()[0]
            .content()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .unwrap();
        assert_ne!(fill, RiskLevel::Moderate.color());
        assert_eq!(fill, Theme::new(Color::WHITE).muted);
    }

    #[test]
    fn absent_lists_leave_no_blank_space() {
        let risk = RiskAssessment {
            overall_risk: Some("low".into()),
            backup_awareness: Some("Short implant".into()),
            considerations: vec!["  ".into()],
            ..RiskAssessment::default()
        };
        let doc = render_with(|ctx| render_risk_assessment(ctx, &risk));
        let content = doc.pages()[0].content();
        let badge_bottom = content
            .iter()
            .find_map(|c| match c {
                DrawCommand::Rect { y, height, .. } => Some(y + height),
                _ => None,
            })
            .unwrap();
        let label = content
            .iter()
            .find_map(|c| match c {
                DrawCommand::Text { y, text, .. } if text == "Backup Awareness:" => Some(*y),
                _ => None,
            })
            .unwrap();
        let line_h = Typography::default().line_height(Typography::default().body);
        assert!(label - badge_bottom < BADGE_GAP + 6.0 + line_h, "gap {}", label - badge_bottom);
    }

    #[test]
    fn renders_only_present_parts() {
        let risk = RiskAssessment {
            overall_risk: Some("moderate".into()),
            primary_issue: Some("Thin buccal plate".into()),
            plain_language_summary: Some("Manageable with grafting.".into()),
            factors: vec!["Smoker".into()],
            ..RiskAssessment::default()
        };
        let doc = render_with(|ctx| render_risk_assessment(ctx, &risk));
        let texts = texts(&doc);
        assert_eq!(texts[0], "Risk Assessment");
        assert_eq!(texts[1], "Overall: MODERATE");
        assert!(texts.contains(&"Primary Issue:".to_string()));
        assert!(!texts.contains(&"Complexity:".to_string()));
        assert!(texts.contains(&"Risk Factors:".to_string()));
        assert!(!texts.contains(&"Clinical Considerations:".to_string()));
        assert!(!texts.contains(&"Backup Awareness:".to_string()));

        let badge_fill = doc.pages()[0].content().iter().find_map(|c| match c {
            DrawCommand::Rect { fill, radius, .. } if *radius > 0.0 => Some(*fill),
            _ => None,
        });
        assert_eq!(badge_fill, Some(Color(245, 158, 11)));
    }
}
