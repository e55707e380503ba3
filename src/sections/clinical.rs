//! Sections of the dentist report built from case and planning data.

use super::RenderContext;
use super::key_value::{KeyValueRow, KeyValueStyle, render_key_values};
use super::list::render_bullets;
use super::paragraph::{label_height, render_paragraph};
use crate::case::{CaseRecord, Feedback, PlanningData};

const CASE_VALUE_OFFSET: f32 = 102.0;
const PLANNING_VALUE_OFFSET: f32 = 130.0;

pub(crate) fn render_case_information(ctx: &mut RenderContext<'_>, case: &CaseRecord) {
    let mut rows = vec![
        KeyValueRow::new("Case Name:", case.case_name.clone()),
        KeyValueRow::new("Tooth Number:", case.tooth_number.as_ref().map(|t| format!("#{t}"))),
        KeyValueRow::new("Status:", case.status_display()),
        KeyValueRow::new("Created:", case.created_display()),
    ];
    if let Some(age) = &case.optional_age {
        rows.push(KeyValueRow::new("Patient Age:", Some(format!("{age} years"))));
    }
    if let Some(sex) = &case.optional_sex {
        rows.push(KeyValueRow::new("Patient Sex:", Some(sex.clone())));
    }
    let style = KeyValueStyle::plain(CASE_VALUE_OFFSET, ctx.typography.body);
    render_key_values(ctx, Some("Case Information"), &rows, style);
    ctx.end_section();
}

pub(crate) fn render_planning_data(ctx: &mut RenderContext<'_>, planning: &PlanningData) {
    let mut rows: Vec<KeyValueRow> = [
        ("Bone Availability:", "boneAvailability"),
        ("Bone Height:", "boneHeight"),
        ("Bone Width:", "boneWidth"),
        ("Esthetic Zone:", "estheticZone"),
        ("Soft Tissue Biotype:", "softTissueBiotype"),
    ]
    .into_iter()
    .map(|(label, key)| KeyValueRow::new(label, planning.text(key)))
    .collect();
    rows.push(KeyValueRow::new(
        "Restorative Context:",
        planning.text("restorativeContext").map(|c| c.replace('_', " ")),
    ));
    rows.push(KeyValueRow::new("Smoking Status:", planning.text("smokingStatus")));
    rows.push(KeyValueRow::new("Diabetes Status:", planning.text("diabetesStatus")));
    for (label, key) in [
        ("Medications:", "medications"),
        ("Systemic Modifiers:", "systemicModifiers"),
    ] {
        if let Some(joined) = planning.text(key) {
            rows.push(KeyValueRow::new(label, Some(joined)));
        }
    }

    let style = KeyValueStyle::plain(PLANNING_VALUE_OFFSET, ctx.typography.body);
    render_key_values(ctx, Some("Planning Data"), &rows, style);

    if let Some(notes) = planning.text("additionalNotes") {
        ctx.gap(6.0);
        let (body, text) = (ctx.body_style(), ctx.theme.text);
        render_paragraph(ctx, Some("Additional Notes:"), &notes, body, text);
    }
    ctx.end_section();
}

pub(crate) fn render_reflections(ctx: &mut RenderContext<'_>, feedback: &Feedback) {
    let body = ctx.body_style();
    let text = ctx.theme.text;
    // label plus the first line of the first reflection
    let keep = label_height(ctx) + ctx.line_height(body.size);
    let size = ctx.typography.heading;
    ctx.heading("Learning Reflections", size, keep);

    for (label, value) in [
        ("What was unexpected:", &feedback.what_was_unexpected),
        ("What to double-check next time:", &feedback.what_to_double_check_next_time),
    ] {
        if let Some(value) = value
            && render_paragraph(ctx, Some(label), value, body, text)
        {
            ctx.gap(6.0);
        }
    }
    render_bullets(
        ctx,
        Some("Checklist Suggestions:"),
        &feedback.custom_checklist_suggestions,
    );
    ctx.end_section();
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use serde_json::json;

    fn planning(value: serde_json::Value) -> PlanningData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn optional_demographics_only_when_present() {
        let case = CaseRecord {
            case_name: Some("Upper left molar".into()),
            tooth_number: Some("26".into()),
            status: Some("in_progress".into()),
            optional_age: Some("54".into()),
            ..CaseRecord::default()
        };
        let texts = texts(&render_with(|ctx| render_case_information(ctx, &case)));
        assert!(texts.contains(&"#26".to_string()));
        assert!(texts.contains(&"IN PROGRESS".to_string()));
        assert!(texts.contains(&"54 years".to_string()));
        assert!(!texts.contains(&"Patient Sex:".to_string()));
        // no creation date on record
        let created = texts.iter().position(|t| t == "Created:").unwrap();
        assert_eq!(texts[created + 1], "-");
    }

    #[test]
    fn planning_rows_translate_and_skip_empty_lists() {
        let data = planning(json!({
            "restorativeContext": "single_crown",
            "medications": [],
            "systemicModifiers": ["Diabetes", "Bisphosphonates"],
        }));
        let texts = texts(&render_with(|ctx| render_planning_data(ctx, &data)));
        assert!(texts.contains(&"single crown".to_string()));
        assert!(!texts.contains(&"Medications:".to_string()));
        assert!(texts.contains(&"Diabetes, Bisphosphonates".to_string()));
        assert!(!texts.contains(&"Additional Notes:".to_string()));
    }

    #[test]
    fn reflections_heading_moves_with_its_first_label_and_line() {
        let feedback = Feedback {
            what_was_unexpected: Some("Dehiscence on the buccal side".into()),
            ..Feedback::default()
        };
        let doc = render_with(|ctx| {
            let body = ctx.line_height(ctx.typography.body);
            // room for the heading, two bare lines and half a point
            let room = ctx.heading_height(ctx.typography.heading) + 2.0 * body + 0.5;
            let filler = ctx.doc.geometry().content_bottom() - ctx.cursor.y() - room;
            ctx.block(filler, |_, _| {});
            render_reflections(ctx, &feedback);
        });
        assert_eq!(doc.pages()[0].texts().count(), 0);
        let first: Vec<_> = doc.pages()[1].texts().take(2).collect();
        assert_eq!(first, ["Learning Reflections", "What was unexpected:"]);
    }

    #[test]
    fn reflections_print_both_prompts_and_suggestions() {
        let feedback = Feedback {
            what_was_unexpected: Some("Dehiscence on the buccal side".into()),
            custom_checklist_suggestions: vec!["Check CBCT slice spacing".into()],
            ..Feedback::default()
        };
        let texts = texts(&render_with(|ctx| render_reflections(ctx, &feedback)));
        assert_eq!(texts[0], "Learning Reflections");
        assert_eq!(texts[1], "What was unexpected:");
        assert!(!texts.contains(&"What to double-check next time:".to_string()));
        assert!(texts.contains(&"Check CBCT slice spacing".to_string()));
    }
}
