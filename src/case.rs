//! The case record handed over by the backend.
//!
//! Decoding is lenient: any field may be missing or `null`, and scalars that
//! arrive as numbers or booleans where text is expected are accepted as text.
//! Nothing here rejects a record that is syntactically valid JSON of the
//! right overall shape.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaseRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub case_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub tooth_number: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub optional_age: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub optional_sex: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    pub planning_data: Option<PlanningData>,
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(deserialize_with = "null_as_default")]
    pub pre_treatment_checklist: Vec<ChecklistItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub treatment_checklist: Vec<ChecklistItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub post_treatment_checklist: Vec<ChecklistItem>,
    pub feedback: Option<Feedback>,
    #[serde(deserialize_with = "team_map")]
    pub case_team: BTreeMap<String, String>,
}

impl CaseRecord {
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn case_name(&self) -> Option<&str> {
        self.case_name.as_deref()
    }

    /// `in_progress` -> `IN PROGRESS`.
    pub fn status_display(&self) -> Option<String> {
        self.status
            .as_deref()
            .map(|s| s.replace('_', " ").to_uppercase())
    }

    pub fn created_display(&self) -> Option<String> {
        self.created_at.as_deref().map(display_date)
    }

    pub fn planning_text(&self, key: &str) -> Option<String> {
        self.planning_data.as_ref().and_then(|p| p.text(key))
    }

    pub fn has_reflections(&self) -> bool {
        self.feedback.as_ref().is_some_and(Feedback::has_reflections)
    }
}

/// Free-form planning answers keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PlanningData(Map<String, Value>);

impl PlanningData {
    /// A key's value as display text. Strings are trimmed, booleans become
    /// `Yes`/`No` and arrays are joined with `, `. Empty strings, `null` and
    /// objects count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Array(items) => {
                let parts = items.iter().filter_map(scalar_text).collect::<Vec<_>>();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            other => scalar_text(other),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(deserialize_with = "lenient_text")]
    pub overall_risk: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub factors: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub considerations: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub plain_language_summary: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub primary_issue: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub case_complexity: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub implant_timing: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub brief_rationale: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub primary_issue_expanded: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub complexity_drivers: Vec<String>,
    pub immediate_placement_eligible: Option<bool>,
    #[serde(deserialize_with = "lenient_list")]
    pub immediate_placement_reasons: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub risk_modifiers: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub clinical_rationale: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub backup_awareness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistItem {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(deserialize_with = "lenient_text")]
    pub completed_at: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_custom: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: Some(text.into()),
            completed,
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into()).filter(|n: &String| !n.trim().is_empty());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Feedback {
    #[serde(deserialize_with = "lenient_text")]
    pub what_was_unexpected: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub what_to_double_check_next_time: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub custom_checklist_suggestions: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub reflection_completed_at: Option<String>,
}

impl Feedback {
    pub fn has_reflections(&self) -> bool {
        self.what_was_unexpected.is_some() || self.what_to_double_check_next_time.is_some()
    }
}

/// Format an ISO-8601 timestamp or date as `YYYY-MM-DD`; anything that does
/// not parse is shown as given.
pub fn display_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    // Python's isoformat() without an offset
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn team_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(role, name)| scalar_text(&name).map(|name| (role, name)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> CaseRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_object_is_a_valid_record() {
        let case = parse(json!({}));
        assert_eq!(case, CaseRecord::default());
        assert!(case.pre_treatment_checklist.is_empty());
        assert!(case.risk_assessment.is_none());
    }

    #[test]
    fn nulls_everywhere_degrade_to_defaults() {
        let case = parse(json!({
            "caseName": null,
            "toothNumber": null,
            "preTreatmentChecklist": null,
            "caseTeam": null,
            "feedback": null,
            "riskAssessment": {"factors": null, "overallRisk": null},
        }));
        assert!(case.case_name.is_none());
        assert!(case.pre_treatment_checklist.is_empty());
        assert!(case.case_team.is_empty());
        let risk = case.risk_assessment.unwrap();
        assert!(risk.factors.is_empty());
        assert!(risk.overall_risk.is_none());
    }

    #[test]
    fn numeric_scalars_are_read_as_text() {
        let case = parse(json!({"toothNumber": 8, "optionalAge": 54}));
        assert_eq!(case.tooth_number.as_deref(), Some("8"));
        assert_eq!(case.optional_age.as_deref(), Some("54"));
    }

    #[test]
    fn blank_strings_count_as_absent() {
        let case = parse(json!({"caseName": "   ", "preTreatmentChecklist": [
            {"id": "a", "text": "Review history", "completed": true, "notes": ""}
        ]}));
        assert!(case.case_name.is_none());
        assert!(case.pre_treatment_checklist[0].notes.is_none());
        assert!(case.pre_treatment_checklist[0].completed);
    }

    #[test]
    fn planning_accessors_render_display_text() {
        let case = parse(json!({"planningData": {
            "boneHeight": " 10mm ",
            "medications": ["Aspirin", "Metformin"],
            "estheticZone": "high",
            "smokingStatus": false,
            "occlusion": {"nested": true},
            "additionalNotes": ""
        }}));
        let planning = case.planning_data.as_ref().unwrap();
        assert_eq!(planning.text("boneHeight").as_deref(), Some("10mm"));
        assert_eq!(planning.text("medications").as_deref(), Some("Aspirin, Metformin"));
        assert_eq!(planning.text("smokingStatus").as_deref(), Some("No"));
        assert_eq!(planning.text("occlusion"), None);
        assert_eq!(planning.text("additionalNotes"), None);
        assert_eq!(planning.text("missing"), None);
    }

    #[test]
    fn team_map_drops_unnamed_roles() {
        let case = parse(json!({"caseTeam": {"clinician": "Dr. Reyes", "assistant": null}}));
        assert_eq!(case.case_team.len(), 1);
        assert_eq!(case.case_team["clinician"], "Dr. Reyes");
    }

    #[test]
    fn status_display_upper_cases_every_underscore() {
        let case = CaseRecord {
            status: Some("in_progress_review".into()),
            ..CaseRecord::default()
        };
        assert_eq!(case.status_display().as_deref(), Some("IN PROGRESS REVIEW"));
    }

    #[test]
    fn dates_display_as_iso_days() {
        assert_eq!(display_date("2024-03-05T14:22:10.123456+00:00"), "2024-03-05");
        assert_eq!(display_date("2024-03-05T14:22:10.123456"), "2024-03-05");
        assert_eq!(display_date("2024-03-05"), "2024-03-05");
        assert_eq!(display_date("last tuesday"), "last tuesday");
    }

    #[test]
    fn reflections_need_one_text() {
        let mut feedback = Feedback::default();
        assert!(!feedback.has_reflections());
        feedback.custom_checklist_suggestions.push("Check torque".into());
        assert!(!feedback.has_reflections());
        feedback.what_was_unexpected = Some("Thin buccal plate".into());
        assert!(feedback.has_reflections());
    }

    #[test]
    fn malformed_json_is_an_invalid_case() {
        let err = CaseRecord::from_json(b"{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidCase(_)));
    }
}
