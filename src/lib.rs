mod case;
mod compose;
pub mod config;
mod error;
mod fonts;
mod footer;
mod layout;
mod model;
pub mod pdf;
mod sections;
pub mod text;
mod variant;

pub use case::{CaseRecord, ChecklistItem, Feedback, PlanningData, RiskAssessment, display_date};
pub use compose::{Composer, ComposerState, section_present};
pub use config::{BreakReserves, PageGeometry, ReportConfig, Typography};
pub use error::Error;
pub use fonts::{BALLOT_BOX, BALLOT_BOX_CHECKED, FaceMetrics, FontSet, StandardFont, TextMeasure, TrueTypeFace};
pub use footer::FooterStamper;
pub use layout::LayoutCursor;
pub use model::{Color, Document, DrawCommand, FontFace, Page, TextAlign};
pub use variant::{ChecklistStage, Redactions, ReportVariantPolicy, SectionKind, Variant};

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};

/// Characters that cannot appear in a filename on common host systems.
const UNSAFE_FILENAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Builds reports from case records. Holds a validated configuration and the
/// fonts used both for measuring and for embedding.
#[derive(Clone, Debug, Default)]
pub struct ReportGenerator {
    config: ReportConfig,
    fonts: FontSet,
}

/// A finished PDF and the name it should be saved under.
#[derive(Clone, Debug)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
    pub variant: Variant,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Write the report into `out_dir` under its suggested filename.
    pub fn save(&self, out_dir: &Path) -> Result<PathBuf, Error> {
        let path = out_dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            fonts: FontSet::standard(),
        })
    }

    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Lay out a case into a finalized document, footers included.
    pub fn layout(&self, case: &CaseRecord, variant: Variant, generated_at: DateTime<Utc>) -> Document {
        Composer::new(case, variant, &self.config, &self.fonts).compose(generated_at)
    }

    pub fn generate(&self, case: &CaseRecord, variant: Variant) -> Result<Report, Error> {
        self.generate_at(case, variant, Utc::now())
    }

    pub fn generate_at(
        &self,
        case: &CaseRecord,
        variant: Variant,
        generated_at: DateTime<Utc>,
    ) -> Result<Report, Error> {
        let t0 = Instant::now();

        let doc = self.layout(case, variant, generated_at);
        let t_layout = t0.elapsed();

        let bytes = pdf::write_pdf(&doc, &self.fonts)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing ({variant}): layout={:.1}ms, encode={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            doc.page_count(),
            bytes.len(),
        );

        Ok(Report {
            bytes,
            filename: suggested_filename(case.case_name().unwrap_or_default(), variant, generated_at),
            page_count: doc.page_count(),
            variant,
            generated_at,
        })
    }
}

/// `{case_name}_{Variant}_{YYYY-MM-DD}.pdf` with whitespace runs collapsed to
/// `_` and filesystem-unsafe characters removed.
pub fn suggested_filename(case_name: &str, variant: Variant, generated_at: DateTime<Utc>) -> String {
    let cleaned: String = case_name
        .chars()
        .filter(|c| !UNSAFE_FILENAME_CHARS.contains(c))
        .collect();
    let name = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    let name = if name.is_empty() { "case" } else { name.as_str() };
    format!("{name}_{variant}_{}.pdf", generated_at.format("%Y-%m-%d"))
}

pub fn convert_case_json(input: &[u8], variant: Variant, generator: &ReportGenerator) -> Result<Report, Error> {
    let case = CaseRecord::from_json(input)?;
    generator.generate(&case, variant)
}

pub fn convert_case_file(input: &Path, out_dir: &Path, variant: Variant) -> Result<PathBuf, Error> {
    let data = std::fs::read(input)?;
    let report = convert_case_json(&data, variant, &ReportGenerator::default())?;
    report.save(out_dir)
}
