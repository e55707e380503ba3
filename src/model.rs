use chrono::{DateTime, Utc};

use crate::config::PageGeometry;
use crate::variant::Variant;

/// RGB color, 0-255 per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);

    pub(crate) fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontFace {
    Regular,
    Bold,
    Italic,
}

impl FontFace {
    pub const ALL: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Italic];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// `x` is the anchor named by `align`; `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
        align: TextAlign,
    },
    /// Filled rectangle with its top-left corner at (`x`, `y`).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
        radius: f32,
    },
}

impl DrawCommand {
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Topmost y the command touches.
    pub fn top(&self) -> f32 {
        match self {
            DrawCommand::Text { y, size, .. } => y - size,
            DrawCommand::Rect { y, .. } => *y,
        }
    }
}

/// One page: body commands written during streaming layout, then footer
/// commands written by the finalization pass. Both lists only grow.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    content: Vec<DrawCommand>,
    footer: Vec<DrawCommand>,
}

impl Page {
    fn new() -> Self {
        Self {
            content: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn content(&self) -> &[DrawCommand] {
        &self.content
    }

    pub fn footer(&self) -> &[DrawCommand] {
        &self.footer
    }

    /// Body and footer commands in paint order.
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.content.iter().chain(self.footer.iter())
    }

    /// Body text strings in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(DrawCommand::text)
    }

    pub fn footer_texts(&self) -> impl Iterator<Item = &str> {
        self.footer.iter().filter_map(DrawCommand::text)
    }
}

/// The document under construction. Pages are appended by the layout cursor
/// and never removed; once [`Document::finalize`] runs, nothing else may be
/// written.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub variant: Variant,
    pub generated_at: DateTime<Utc>,
    pub title: String,
    geometry: PageGeometry,
    pages: Vec<Page>,
    finalized: bool,
}

impl Document {
    /// A new document always starts with its first page allocated.
    pub fn new(
        variant: Variant,
        title: impl Into<String>,
        geometry: PageGeometry,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            variant,
            generated_at,
            title: title.into(),
            geometry,
            pages: vec![Page::new()],
            finalized: false,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Append a page, returning its index.
    pub(crate) fn add_page(&mut self) -> usize {
        assert!(!self.finalized, "page appended to a finalized document");
        self.pages.push(Page::new());
        self.pages.len() - 1
    }

    pub(crate) fn push(&mut self, page: usize, command: DrawCommand) {
        assert!(!self.finalized, "content appended to a finalized document");
        self.pages[page].content.push(command);
    }

    pub(crate) fn push_footer(&mut self, page: usize, command: DrawCommand) {
        assert!(!self.finalized, "footer appended to a finalized document");
        self.pages[page].footer.push(command);
    }

    pub(crate) fn finalize(&mut self) {
        assert!(!self.finalized, "document finalized twice");
        self.finalized = true;
    }
}
