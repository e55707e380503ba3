#![allow(dead_code)]

use case_report_pdf::{CaseRecord, ChecklistItem, Document, DrawCommand};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

/// Fixed generation time so builds are reproducible.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()
}

/// A fully populated case, decoded from JSON the way the backend sends it.
pub fn sample_case() -> CaseRecord {
    let value = json!({
        "id": 4711,
        "caseName": "Upper left first molar",
        "toothNumber": 26,
        "optionalAge": 54,
        "optionalSex": "female",
        "status": "in_progress",
        "createdAt": "2025-05-28T14:03:11Z",
        "planningData": {
            "boneAvailability": "adequate",
            "boneHeight": "9 mm",
            "boneWidth": "6 mm",
            "estheticZone": "low",
            "softTissueBiotype": "thick",
            "restorativeContext": "single_crown",
            "smokingStatus": "never",
            "diabetesStatus": "controlled",
            "medications": ["Metformin"],
            "systemicModifiers": [],
            "additionalNotes": "Patient prefers morning appointments.",
            "occlusion": "Group function on the left side."
        },
        "riskAssessment": {
            "overallRisk": "moderate",
            "factors": ["Controlled diabetes"],
            "considerations": ["Extended healing time"],
            "plainLanguageSummary": "Placement is feasible with standard precautions.",
            "primaryIssue": "Sinus proximity",
            "caseComplexity": "moderate",
            "implantTiming": "delayed",
            "immediatePlacementEligible": false,
            "immediatePlacementReasons": ["Residual infection"],
            "backupAwareness": "Consider a short implant if the sinus floor is lower than expected."
        },
        "preTreatmentChecklist": [
            { "id": "p1", "text": "Review CBCT", "completed": true, "notes": "Sinus floor at 9 mm" },
            { "id": "p2", "text": "Medical history", "completed": false }
        ],
        "treatmentChecklist": [
            { "id": "t1", "text": "Confirm torque", "completed": null }
        ],
        "postTreatmentChecklist": null,
        "feedback": {
            "whatWasUnexpected": "Thin buccal plate",
            "customChecklistSuggestions": ["Measure plate thickness pre-op"]
        },
        "caseTeam": {
            "surgeon": "Dr. Lind",
            "restorative": "Dr. Berg"
        }
    });
    serde_json::from_value(value).unwrap()
}

/// A case whose only content is a long pre-treatment checklist.
pub fn checklist_case(items: usize, note_len: usize) -> CaseRecord {
    CaseRecord {
        case_name: Some(format!("Checklist {items}")),
        pre_treatment_checklist: checklist(items, note_len),
        ..CaseRecord::default()
    }
}

pub fn checklist(items: usize, note_len: usize) -> Vec<ChecklistItem> {
    (0..items)
        .map(|i| {
            let item = ChecklistItem::new(format!("Step {} of the protocol", i + 1), i % 3 == 0);
            if note_len == 0 {
                item
            } else {
                item.with_notes(note(note_len))
            }
        })
        .collect()
}

/// Words of prose totalling roughly `len` characters.
pub fn note(len: usize) -> String {
    const WORDS: [&str; 6] = ["graft", "healing", "abutment", "torque", "margin", "tissue"];
    let mut out = String::new();
    let mut i = 0;
    while out.len() < len {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(WORDS[i % WORDS.len()]);
        i += 1;
    }
    out
}

/// Body text strings of every page, footers excluded.
pub fn body_texts(doc: &Document) -> Vec<String> {
    doc.pages()
        .iter()
        .flat_map(|page| page.texts().map(str::to_string))
        .collect()
}

/// Lowest y a body command reaches: baseline for text, bottom edge for shapes.
pub fn bottom(cmd: &DrawCommand) -> f32 {
    match cmd {
        DrawCommand::Text { y, .. } => *y,
        DrawCommand::Rect { y, height, .. } => y + height,
    }
}
