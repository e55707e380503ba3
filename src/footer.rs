use crate::config::Typography;
use crate::model::{Color, Document, DrawCommand, FontFace, TextAlign};
use crate::variant::ReportVariantPolicy;

const FOOTER_COLOR: Color = Color(100, 116, 139);

/// Finalization pass: stamps the disclaimer and `Page p of N` on every page.
///
/// Precondition: layout has finished, so `N` is the final page count. It runs
/// exactly once per document.
#[derive(Debug, Clone, Copy)]
pub struct FooterStamper<'a> {
    disclaimer: &'a str,
    size: f32,
}

impl<'a> FooterStamper<'a> {
    pub fn new(disclaimer: &'a str, size: f32) -> Self {
        Self { disclaimer, size }
    }

    pub fn for_policy(policy: &'a ReportVariantPolicy, typography: &Typography) -> Self {
        Self::new(policy.disclaimer, typography.footer)
    }

    pub fn stamp(&self, doc: &mut Document) {
        assert!(
            doc.pages().iter().all(|page| page.footer().is_empty()),
            "footer stamped twice"
        );
        let geometry = *doc.geometry();
        let total = doc.page_count();
        let baseline = geometry.footer_baseline();

        for index in 0..total {
            doc.push_footer(
                index,
                DrawCommand::Text {
                    x: geometry.width / 2.0,
                    y: baseline,
                    text: self.disclaimer.to_string(),
                    face: FontFace::Regular,
                    size: self.size,
                    color: FOOTER_COLOR,
                    align: TextAlign::Center,
                },
            );
            doc.push_footer(
                index,
                DrawCommand::Text {
                    x: geometry.right_edge(),
                    y: baseline,
                    text: format!("Page {} of {}", index + 1, total),
                    face: FontFace::Regular,
                    size: self.size,
                    color: FOOTER_COLOR,
                    align: TextAlign::Right,
                },
            );
        }
        log::debug!("Stamped footers on {total} pages");
    }
}
