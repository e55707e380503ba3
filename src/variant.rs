use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Color;

/// Which of the two document shapes to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Dentist,
    Lab,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Dentist, Variant::Lab];

    pub fn policy(self) -> &'static ReportVariantPolicy {
        match self {
            Variant::Dentist => &DENTIST,
            Variant::Lab => &LAB,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Dentist => "Dentist",
            Variant::Lab => "Lab",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChecklistStage {
    PreTreatment,
    Treatment,
    PostTreatment,
}

impl ChecklistStage {
    pub fn title(self) -> &'static str {
        match self {
            ChecklistStage::PreTreatment => "Pre-Treatment Checklist",
            ChecklistStage::Treatment => "Treatment Checklist",
            ChecklistStage::PostTreatment => "Post-Treatment Checklist",
        }
    }
}

/// A section descriptor. The composer visits these in policy order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    CaseInformation,
    PlanningData,
    RiskAssessment,
    Checklist(ChecklistStage),
    LearningReflections,
    CaseIdentification,
    TeamAssignment,
    RestorationSpecification,
    ImplantSiteNotes,
    ProstheticInstructions,
    AdditionalLabNotes,
    LabNotice,
}

/// Fields a variant must never print.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Redactions {
    /// Clinician free-text notes attached to checklist items.
    pub checklist_notes: bool,
}

#[derive(Debug, PartialEq)]
pub struct ReportVariantPolicy {
    pub variant: Variant,
    pub title: &'static str,
    pub copy_label: &'static str,
    /// Label in front of the generation date in the header band.
    pub date_label: &'static str,
    pub accent: Color,
    pub disclaimer: &'static str,
    pub sections: &'static [SectionKind],
    pub redactions: Redactions,
}

static DENTIST: ReportVariantPolicy = ReportVariantPolicy {
    variant: Variant::Dentist,
    title: "Clinical Case Documentation",
    copy_label: "Dentist Copy",
    date_label: "Generated",
    accent: Color(47, 128, 237),
    disclaimer: "Decision support only. Final clinical responsibility lies with the treating clinician.",
    sections: &[
        SectionKind::Header,
        SectionKind::CaseInformation,
        SectionKind::PlanningData,
        SectionKind::RiskAssessment,
        SectionKind::Checklist(ChecklistStage::PreTreatment),
        SectionKind::Checklist(ChecklistStage::Treatment),
        SectionKind::Checklist(ChecklistStage::PostTreatment),
        SectionKind::LearningReflections,
    ],
    redactions: Redactions {
        checklist_notes: false,
    },
};

static LAB: ReportVariantPolicy = ReportVariantPolicy {
    variant: Variant::Lab,
    title: "Prosthetic Fabrication Order",
    copy_label: "Lab Copy",
    date_label: "Date",
    accent: Color(16, 185, 129),
    disclaimer: "For prosthetic fabrication only - No clinical responsibility",
    sections: &[
        SectionKind::Header,
        SectionKind::CaseIdentification,
        SectionKind::TeamAssignment,
        SectionKind::RestorationSpecification,
        SectionKind::ImplantSiteNotes,
        SectionKind::ProstheticInstructions,
        SectionKind::Checklist(ChecklistStage::PreTreatment),
        SectionKind::Checklist(ChecklistStage::Treatment),
        SectionKind::Checklist(ChecklistStage::PostTreatment),
        SectionKind::AdditionalLabNotes,
        SectionKind::LabNotice,
    ],
    redactions: Redactions {
        checklist_notes: true,
    },
};
