use chrono::{DateTime, Utc};

use crate::case::{CaseRecord, ChecklistItem};
use crate::config::ReportConfig;
use crate::fonts::TextMeasure;
use crate::footer::FooterStamper;
use crate::layout::LayoutCursor;
use crate::model::Document;
use crate::sections::{self, RenderContext, Theme};
use crate::variant::{ChecklistStage, ReportVariantPolicy, SectionKind, Variant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComposerState {
    Initializing,
    RenderingSection(usize),
    Finalizing,
    Done,
}

/// Drives one document build: visits the policy's sections in order, then
/// stamps footers once the page count is final.
pub struct Composer<'a> {
    case: &'a CaseRecord,
    policy: &'static ReportVariantPolicy,
    config: &'a ReportConfig,
    fonts: &'a dyn TextMeasure,
    state: ComposerState,
    checklists_started: bool,
}

/// Whether a section has the data it needs. Absent sections get no heading
/// and no space.
pub fn section_present(kind: SectionKind, case: &CaseRecord) -> bool {
    match kind {
        SectionKind::PlanningData => case.planning_data.is_some(),
        SectionKind::RiskAssessment => case.risk_assessment.is_some(),
        SectionKind::Checklist(stage) => !checklist(case, stage).is_empty(),
        SectionKind::LearningReflections => case.has_reflections(),
        SectionKind::TeamAssignment => !case.case_team.is_empty(),
        SectionKind::Header
        | SectionKind::CaseInformation
        | SectionKind::CaseIdentification
        | SectionKind::RestorationSpecification
        | SectionKind::ImplantSiteNotes
        | SectionKind::ProstheticInstructions
        | SectionKind::AdditionalLabNotes
        | SectionKind::LabNotice => true,
    }
}

fn checklist(case: &CaseRecord, stage: ChecklistStage) -> &[ChecklistItem] {
    match stage {
        ChecklistStage::PreTreatment => &case.pre_treatment_checklist,
        ChecklistStage::Treatment => &case.treatment_checklist,
        ChecklistStage::PostTreatment => &case.post_treatment_checklist,
    }
}

impl<'a> Composer<'a> {
    pub fn new(
        case: &'a CaseRecord,
        variant: Variant,
        config: &'a ReportConfig,
        fonts: &'a dyn TextMeasure,
    ) -> Self {
        Self {
            case,
            policy: variant.policy(),
            config,
            fonts,
            state: ComposerState::Initializing,
            checklists_started: false,
        }
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Run the build to `Done` and hand back the finalized document.
    pub fn compose(mut self, generated_at: DateTime<Utc>) -> Document {
        let mut doc = self.start(generated_at);
        let mut cursor = LayoutCursor::new(&doc);
        while self.state != ComposerState::Done {
            self.step(&mut doc, &mut cursor);
        }
        doc
    }

    pub(crate) fn start(&self, generated_at: DateTime<Utc>) -> Document {
        let title = match self.case.case_name() {
            Some(name) => format!("{} - {name}", self.policy.title),
            None => self.policy.title.to_string(),
        };
        Document::new(
            self.policy.variant,
            title,
            self.config.geometry,
            generated_at,
        )
    }

    /// Advance the state machine by one transition.
    pub(crate) fn step(&mut self, doc: &mut Document, cursor: &mut LayoutCursor) -> ComposerState {
        let next = match self.state {
            ComposerState::Initializing => self.section_state(0),
            ComposerState::RenderingSection(index) => {
                let kind = self.policy.sections[index];
                if section_present(kind, self.case) {
                    self.render(kind, doc, cursor);
                } else {
                    log::debug!("Skipping {kind:?}: no data");
                }
                self.section_state(index + 1)
            }
            ComposerState::Finalizing => {
                FooterStamper::for_policy(self.policy, &self.config.typography).stamp(doc);
                doc.finalize();
                ComposerState::Done
            }
            ComposerState::Done => ComposerState::Done,
        };
        if next != self.state {
            log::debug!("Composer: {:?} -> {next:?}", self.state);
        }
        self.state = next;
        next
    }

    fn section_state(&self, index: usize) -> ComposerState {
        if index < self.policy.sections.len() {
            ComposerState::RenderingSection(index)
        } else {
            ComposerState::Finalizing
        }
    }

    fn render(&mut self, kind: SectionKind, doc: &mut Document, cursor: &mut LayoutCursor) {
        let bottom = doc.geometry().content_bottom();
        let breaks = self.config.breaks;
        match kind {
            SectionKind::Checklist(_) => {
                let reserve = if self.checklists_started {
                    breaks.checklist
                } else {
                    breaks.checklists_start
                };
                self.checklists_started = true;
                cursor.new_page_if_below(doc, bottom - reserve);
            }
            SectionKind::LearningReflections => {
                cursor.new_page_if_below(doc, bottom - breaks.reflections);
            }
            _ => {}
        }

        let case = self.case;
        let policy = self.policy;
        let generated_at = doc.generated_at;
        let mut ctx = RenderContext {
            doc,
            cursor,
            fonts: self.fonts,
            typography: self.config.typography,
            theme: Theme::new(policy.accent),
        };
        match kind {
            SectionKind::Header => sections::render_header(&mut ctx, policy, generated_at),
            SectionKind::CaseInformation => sections::render_case_information(&mut ctx, case),
            SectionKind::PlanningData => {
                if let Some(planning) = &case.planning_data {
                    sections::render_planning_data(&mut ctx, planning);
                }
            }
            SectionKind::RiskAssessment => {
                if let Some(risk) = &case.risk_assessment {
                    sections::render_risk_assessment(&mut ctx, risk);
                }
            }
            SectionKind::Checklist(stage) => {
                let redact = policy.redactions.checklist_notes;
                if sections::render_checklist(&mut ctx, stage.title(), checklist(case, stage), redact) {
                    ctx.end_section();
                }
            }
            SectionKind::LearningReflections => {
                if let Some(feedback) = &case.feedback {
                    sections::render_reflections(&mut ctx, feedback);
                }
            }
            SectionKind::CaseIdentification => sections::render_case_identification(&mut ctx, case),
            SectionKind::TeamAssignment => sections::render_team_assignment(&mut ctx, &case.case_team),
            SectionKind::RestorationSpecification => sections::render_restoration_spec(&mut ctx, case),
            SectionKind::ImplantSiteNotes => sections::render_implant_site_notes(&mut ctx, case),
            SectionKind::ProstheticInstructions => {
                sections::render_prosthetic_instructions(&mut ctx, case)
            }
            SectionKind::AdditionalLabNotes => sections::render_additional_lab_notes(&mut ctx, case),
            SectionKind::LabNotice => sections::render_lab_notice(&mut ctx),
        }
    }
}
