//! Report configuration types.
//!
//! Every field has a default, so an empty JSON object is a valid config. All
//! lengths are PDF points; the layout model measures y downward from the top
//! edge of the page.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Smallest usable content area, below which no section can make progress.
const MIN_CONTENT_HEIGHT: f32 = 72.0;

/// Fixed page geometry shared by every page of a document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Distance from the bottom page edge to the footer baseline.
    pub footer_offset: f32,
    /// Height of the colored title band on the first page.
    pub header_band: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 57.0,
            margin_bottom: 62.0,
            margin_left: 40.0,
            margin_right: 40.0,
            footer_offset: 28.0,
            header_band: 99.0,
        }
    }
}

impl PageGeometry {
    pub fn content_top(&self) -> f32 {
        self.margin_top
    }

    /// Lowest y any body content may start at.
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin_bottom
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f32 {
        self.content_bottom() - self.content_top()
    }

    pub fn footer_baseline(&self) -> f32 {
        self.height - self.footer_offset
    }

    pub fn right_edge(&self) -> f32 {
        self.width - self.margin_right
    }
}

/// Font sizes (pt) and the leading multiplier used for every wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Typography {
    pub title: f32,
    pub heading: f32,
    pub subheading: f32,
    pub body: f32,
    pub checklist: f32,
    pub note: f32,
    pub footer: f32,
    pub leading: f32,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title: 20.0,
            heading: 14.0,
            subheading: 12.0,
            body: 10.0,
            checklist: 9.0,
            note: 8.0,
            footer: 8.0,
            leading: 1.42,
        }
    }
}

impl Typography {
    pub fn line_height(&self, size: f32) -> f32 {
        size * self.leading
    }
}

/// Distances above the content bottom at which a coarse page break is forced
/// before sections whose total height is not measured up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakReserves {
    /// Before the first checklist of a report.
    pub checklists_start: f32,
    /// Before each checklist.
    pub checklist: f32,
    /// Before the learning reflections.
    pub reflections: f32,
}

impl Default for BreakReserves {
    fn default() -> Self {
        Self {
            checklists_start: 212.6,
            checklist: 70.9,
            reflections: 127.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportConfig {
    pub geometry: PageGeometry,
    pub typography: Typography,
    pub breaks: BreakReserves,
}

impl ReportConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: ReportConfig = serde_json::from_str(json).map_err(Error::InvalidConfig)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no layout can honour. Called before a build
    /// starts so that a bad config never produces a partial document.
    pub fn validate(&self) -> Result<(), Error> {
        let g = &self.geometry;
        let invalid = |msg: String| Err(Error::InvalidGeometry(msg));

        for (name, value) in [("width", g.width), ("height", g.height)] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("page {name} must be positive, got {value}"));
            }
        }
        for (name, value) in [
            ("margin_top", g.margin_top),
            ("margin_bottom", g.margin_bottom),
            ("margin_left", g.margin_left),
            ("margin_right", g.margin_right),
            ("footer_offset", g.footer_offset),
            ("header_band", g.header_band),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number, got {value}"));
            }
        }
        if g.margin_left + g.margin_right >= g.width {
            return invalid(format!(
                "horizontal margins ({} + {}) leave no room on a {}pt wide page",
                g.margin_left, g.margin_right, g.width
            ));
        }
        if g.content_height() < MIN_CONTENT_HEIGHT {
            return invalid(format!(
                "content area is {:.1}pt tall, need at least {MIN_CONTENT_HEIGHT}pt",
                g.content_height()
            ));
        }
        if g.header_band + MIN_CONTENT_HEIGHT > g.content_bottom() {
            return invalid(format!(
                "header band ({}pt) leaves no room for content on the first page",
                g.header_band
            ));
        }
        if g.footer_offset == 0.0 || g.footer_offset >= g.margin_bottom {
            return invalid(format!(
                "footer baseline ({}pt above the edge) must sit inside the bottom margin ({}pt)",
                g.footer_offset, g.margin_bottom
            ));
        }

        let t = &self.typography;
        for (name, size) in [
            ("title", t.title),
            ("heading", t.heading),
            ("subheading", t.subheading),
            ("body", t.body),
            ("checklist", t.checklist),
            ("note", t.note),
            ("footer", t.footer),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return invalid(format!("{name} font size must be positive, got {size}"));
            }
        }
        if !t.leading.is_finite() || t.leading < 1.0 {
            return invalid(format!("leading must be at least 1.0, got {}", t.leading));
        }
        if t.line_height(t.title) > g.content_height() {
            return invalid("title line is taller than the content area".into());
        }

        let b = &self.breaks;
        for (name, reserve) in [
            ("checklists_start", b.checklists_start),
            ("checklist", b.checklist),
            ("reflections", b.reflections),
        ] {
            if !reserve.is_finite() || reserve < 0.0 || reserve >= g.content_height() {
                return invalid(format!(
                    "break reserve {name} ({reserve}pt) must lie within the content area"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ReportConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = ReportConfig::from_json("{}").unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn partial_json_overrides_single_fields() {
        let config = ReportConfig::from_json(r#"{"geometry": {"marginLeft": 50}}"#).unwrap();
        assert_eq!(config.geometry.margin_left, 50.0);
        assert_eq!(config.geometry.width, PageGeometry::default().width);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = ReportConfig::from_json(r#"{"geometry": "#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "{err}");
        assert!(err.to_string().starts_with("invalid report config"));
    }

    #[test]
    fn margin_larger_than_page_is_rejected() {
        let mut config = ReportConfig::default();
        config.geometry.margin_top = 900.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)), "{err}");
    }

    #[test]
    fn horizontal_margins_consuming_width_are_rejected() {
        let mut config = ReportConfig::default();
        config.geometry.margin_left = 300.0;
        config.geometry.margin_right = 300.0;
        assert!(matches!(config.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn footer_outside_bottom_margin_is_rejected() {
        let mut config = ReportConfig::default();
        config.geometry.footer_offset = config.geometry.margin_bottom + 1.0;
        assert!(matches!(config.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn non_finite_dimensions_are_rejected() {
        let mut config = ReportConfig::default();
        config.geometry.height = f32::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn zero_font_size_is_rejected() {
        let mut config = ReportConfig::default();
        config.typography.body = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn geometry_helpers() {
        let g = PageGeometry::default();
        assert!((g.content_bottom() - (841.89 - 62.0)).abs() < 1e-3);
        assert!((g.content_width() - (595.28 - 80.0)).abs() < 1e-3);
        assert!(g.footer_baseline() > g.content_bottom());
    }
}
