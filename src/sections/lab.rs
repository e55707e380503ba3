//! Sections of the lab fabrication order.

use std::collections::BTreeMap;

use super::key_value::{KeyValueRow, KeyValueStyle, render_key_values};
use super::paragraph::render_paragraph;
use super::{PLACEHOLDER, RenderContext};
use crate::case::{CaseRecord, display_date};
use crate::model::{Color, FontFace, TextAlign};
use crate::text::TextStyle;

const VALUE_OFFSET: f32 = 130.0;
const BOX_PADDING: f32 = 11.0;
const BOX_RADIUS: f32 = 5.7;
const BOX_GAP: f32 = 11.0;
const INSTRUCTION_VALUE_OFFSET: f32 = 187.0;

const NOT_SPECIFIED: &str = "Not specified";

const ROLE_ORDER: [(&str, &str); 4] = [
    ("clinician", "Clinician"),
    ("implantologist", "Implantologist"),
    ("prosthodontist", "Prosthodontist"),
    ("assistant", "Assistant"),
];

const RESTORATION_TYPES: [(&str, &str); 4] = [
    ("single_crown", "Single Implant Crown"),
    ("bridge_abutment", "Bridge Abutment"),
    ("overdenture", "Overdenture Support"),
    ("fixed_prosthesis", "Fixed Full Arch Prosthesis"),
];

const LAB_NOTICE_TITLE: &str = "IMPORTANT LAB NOTICE:";
const LAB_NOTICE: &str = "This order is for prosthetic fabrication only. The laboratory assumes no \
    clinical responsibility. All measurements, specifications, and clinical decisions remain the \
    sole responsibility of the treating clinician. Confirm all details before proceeding with \
    fabrication.";

const PANEL_FILL: Color = Color(245, 245, 245);
const ROW_FILL: Color = Color(250, 250, 250);
const NOTICE_FILL: Color = Color(255, 250, 230);
const NOTICE_TITLE: Color = Color(180, 83, 9);
const NOTICE_TEXT: Color = Color(120, 53, 15);

/// Display text for a restoration code; unknown codes pass through as given.
pub(crate) fn restoration_label(code: Option<&str>) -> String {
    let Some(code) = code else {
        return NOT_SPECIFIED.to_string();
    };
    RESTORATION_TYPES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or_else(|| code.to_string(), |(_, label)| label.to_string())
}

/// Team rows in fixed role order, then any other roles verbatim.
pub(crate) fn team_rows(team: &BTreeMap<String, String>) -> Vec<KeyValueRow> {
    let known = ROLE_ORDER
        .iter()
        .filter_map(|(code, label)| {
            team.get(*code)
                .map(|name| KeyValueRow::new(format!("{label}:"), Some(name.clone())))
        });
    let other = team
        .iter()
        .filter(|(code, _)| !ROLE_ORDER.iter().any(|(known, _)| *known == code.as_str()))
        .map(|(code, name)| KeyValueRow::new(format!("{code}:"), Some(name.clone())));
    known.chain(other).collect()
}

pub(crate) fn render_case_identification(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let rows = [
        KeyValueRow::new("Case Name:", case.case_name.clone()),
        KeyValueRow::new("Tooth Number:", case.tooth_number.as_ref().map(|t| format!("#{t}"))),
        KeyValueRow::new("Order Date:", case.created_at.as_deref().map(display_date)),
    ];
    let style = KeyValueStyle {
        value_face: FontFace::Bold,
        ..KeyValueStyle::plain(VALUE_OFFSET, ctx.typography.body + 1.0)
    };
    render_key_values(ctx, Some("Case Identification"), &rows, style);
    ctx.end_section();
}

pub(crate) fn render_team_assignment(ctx: &mut RenderContext<'_>, team: &BTreeMap<String, String>) {
    let rows = team_rows(team);
    let style = KeyValueStyle::plain(VALUE_OFFSET, ctx.typography.body);
    render_key_values(ctx, Some("Team Assignment"), &rows, style);
    ctx.end_section();
}

/// A shaded panel holding wrapped lines, drawn as one unit.
fn render_panel(
    ctx: &mut RenderContext<'_>,
    lines: &[(String, TextStyle, Color)],
    fill: Color,
) -> f32 {
    let height = panel_height(ctx, lines);
    let (left, width) = (ctx.left(), ctx.width());
    ctx.block(height, |ctx, top| {
        ctx.rect(left, top, width, height, fill, BOX_RADIUS);
        let mut y = top + BOX_PADDING / 1.5;
        for (line, style, color) in lines {
            let baseline = ctx.baseline(y, *style);
            ctx.text(left + BOX_PADDING, baseline, line.as_str(), *style, *color, TextAlign::Left);
            y += ctx.line_height(style.size);
        }
    });
    height
}

fn panel_height(ctx: &RenderContext<'_>, lines: &[(String, TextStyle, Color)]) -> f32 {
    let text: f32 = lines.iter().map(|(_, style, _)| ctx.line_height(style.size)).sum();
    text + 2.0 * BOX_PADDING / 1.5
}

pub(crate) fn render_restoration_spec(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let label = restoration_label(case.planning_text("restorativeContext").as_deref());
    let style = TextStyle::new(FontFace::Bold, ctx.typography.subheading);
    let text_color = ctx.theme.text;
    let lines: Vec<_> = ctx
        .wrap(&label, ctx.width() - 2.0 * BOX_PADDING, style)
        .into_iter()
        .map(|line| (line, style, text_color))
        .collect();

    let heading = ctx.typography.heading;
    let keep = panel_height(ctx, &lines);
    ctx.heading("Restoration Specification", heading, keep);
    render_panel(ctx, &lines, PANEL_FILL);
    ctx.end_section();
}

pub(crate) fn render_implant_site_notes(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let or_unspecified = |v: Option<String>| Some(v.unwrap_or_else(|| NOT_SPECIFIED.to_string()));
    let rows = [
        KeyValueRow::new(
            "Location:",
            Some(format!(
                "Tooth #{}",
                case.tooth_number.as_deref().unwrap_or(PLACEHOLDER)
            )),
        ),
        KeyValueRow::new(
            "Esthetic Zone:",
            or_unspecified(case.planning_text("estheticZone").map(|z| z.to_uppercase())),
        ),
        KeyValueRow::new("Adjacent Teeth:", or_unspecified(case.planning_text("adjacentTeeth"))),
    ];
    let style = KeyValueStyle::plain(VALUE_OFFSET, ctx.typography.body);
    render_key_values(ctx, Some("Implant Site Notes"), &rows, style);
    ctx.end_section();
}

fn instruction_rows(case: &CaseRecord) -> [(&'static str, &'static str); 4] {
    let esthetic_high = case
        .planning_text("estheticZone")
        .is_some_and(|z| z.eq_ignore_ascii_case("high"));
    [
        ("Retention Type:", "Screw-retained (confirm with clinician)"),
        (
            "Emergence Profile:",
            if esthetic_high {
                "Critical - confirm ideal contour with clinician"
            } else {
                "Standard profile (clinician to confirm)"
            },
        ),
        ("Margin Depth:", "Per clinician instruction"),
        (
            "Provisional Required:",
            if esthetic_high {
                "Yes - esthetic zone"
            } else {
                "Confirm with clinician"
            },
        ),
    ]
}

pub(crate) fn render_prosthetic_instructions(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let body = ctx.body_style();
    let line_h = ctx.line_height(body.size);
    let (left, width) = (ctx.left(), ctx.width());
    let (muted, text) = (ctx.theme.muted, ctx.theme.text);
    let value_width = width - INSTRUCTION_VALUE_OFFSET - BOX_PADDING;

    let rows: Vec<(&str, Vec<String>)> = instruction_rows(case)
        .into_iter()
        .map(|(label, value)| (label, ctx.wrap(value, value_width, body)))
        .collect();
    let row_height = |lines: usize| lines.max(1) as f32 * line_h + BOX_PADDING;

    let heading = ctx.typography.heading;
    ctx.heading("Prosthetic Instructions", heading, row_height(rows[0].1.len()));

    for (label, lines) in rows {
        let height = row_height(lines.len());
        ctx.block(height, |ctx, top| {
            ctx.rect(left, top, width, height, ROW_FILL, BOX_RADIUS);
            let first = top + BOX_PADDING / 2.0;
            let baseline = ctx.baseline(first, body);
            ctx.text(left + BOX_PADDING, baseline, label, body, muted, TextAlign::Left);
            for (i, line) in lines.into_iter().enumerate() {
                let baseline = ctx.baseline(first + i as f32 * line_h, body);
                ctx.text(
                    left + INSTRUCTION_VALUE_OFFSET,
                    baseline,
                    line,
                    body,
                    text,
                    TextAlign::Left,
                );
            }
        });
        ctx.gap(BOX_GAP / 2.0);
    }
    ctx.end_section();
}

pub(crate) fn render_additional_lab_notes(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let body = ctx.body_style();
    let (muted, text) = (ctx.theme.muted, ctx.theme.text);
    let (heading, keep) = (ctx.typography.heading, ctx.line_height(body.size));
    ctx.heading("Additional Lab Notes", heading, keep);

    let notes = case.planning_text("additionalNotes");
    let drawn = notes
        .as_deref()
        .is_some_and(|notes| render_paragraph(ctx, None, notes, body, text));
    if !drawn {
        let italic = TextStyle::new(FontFace::Italic, body.size);
        render_paragraph(ctx, None, "No additional notes provided.", italic, muted);
    }

    if let Some(occlusion) = case.planning_text("occlusion") {
        ctx.gap(6.0);
        render_paragraph(ctx, Some("Occlusal Notes:"), &occlusion, body, text);
    }
    ctx.end_section();
}

/// The notice box is measured and placed whole.
pub(crate) fn render_lab_notice(ctx: &mut RenderContext<'_>) {
    let title = TextStyle::new(FontFace::Bold, ctx.typography.checklist);
    let body = TextStyle::new(FontFace::Regular, ctx.typography.note);
    let mut lines = vec![(LAB_NOTICE_TITLE.to_string(), title, NOTICE_TITLE)];
    lines.extend(
        ctx.wrap(LAB_NOTICE, ctx.width() - 2.0 * BOX_PADDING, body)
            .into_iter()
            .map(|line| (line, body, NOTICE_TEXT)),
    );
    render_panel(ctx, &lines, NOTICE_FILL);
}
