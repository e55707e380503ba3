mod common;

use case_report_pdf::{BALLOT_BOX, BALLOT_BOX_CHECKED, CaseRecord, ReportGenerator, Variant};

fn texts(case: &CaseRecord, variant: Variant) -> Vec<String> {
    let doc = ReportGenerator::default().layout(case, variant, common::fixed_time());
    common::body_texts(&doc)
}

#[test]
fn absent_risk_assessment_has_no_heading() {
    let mut case = common::sample_case();
    case.risk_assessment = None;
    let texts = texts(&case, Variant::Dentist);
    assert!(!texts.iter().any(|t| t == "Risk Assessment"));
    assert!(texts.iter().any(|t| t == "Planning Data"));
}

#[test]
fn present_risk_assessment_is_drawn() {
    let texts = texts(&common::sample_case(), Variant::Dentist);
    assert!(texts.iter().any(|t| t == "Risk Assessment"));
    assert!(texts.iter().any(|t| t == "Overall: MODERATE"));
}

#[test]
fn empty_checklists_draw_no_heading_and_no_checkboxes() {
    let mut case = common::sample_case();
    case.pre_treatment_checklist.clear();
    case.treatment_checklist.clear();
    for variant in Variant::ALL {
        let texts = texts(&case, variant);
        for heading in ["Pre-Treatment Checklist", "Treatment Checklist", "Post-Treatment Checklist"] {
            assert!(!texts.iter().any(|t| t == heading), "{variant}: {heading}");
        }
        assert!(
            !texts
                .iter()
                .any(|t| t.contains(BALLOT_BOX) || t.contains(BALLOT_BOX_CHECKED)),
            "{variant} drew a checkbox"
        );
    }
}

#[test]
fn null_checklist_is_treated_as_empty() {
    let texts = texts(&common::sample_case(), Variant::Dentist);
    assert!(texts.iter().any(|t| t == "Pre-Treatment Checklist"));
    assert!(!texts.iter().any(|t| t == "Post-Treatment Checklist"));
}

#[test]
fn empty_record_still_builds_both_variants() {
    let generator = ReportGenerator::default();
    for variant in Variant::ALL {
        let report = generator
            .generate_at(&CaseRecord::default(), variant, common::fixed_time())
            .unwrap();
        assert!(report.page_count >= 1);
        assert!(report.filename.starts_with("case_"));
    }
}
