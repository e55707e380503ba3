use crate::config::PageGeometry;
use crate::model::Document;

const EPSILON: f32 = 1e-3;

/// Where the next block goes: a page index and a top-down y offset.
///
/// Every block is written under a reservation: [`LayoutCursor::ensure_space`]
/// for its height, then the draw commands, then [`LayoutCursor::advance`] past
/// it. Advancing without a matching reservation is a bug and panics.
#[derive(Debug)]
pub struct LayoutCursor {
    page: usize,
    y: f32,
    top: f32,
    bottom: f32,
    reserved: Option<f32>,
    /// The next block belongs to a heading already placed at the top of this
    /// page and must not be pushed away from it.
    hold_next: bool,
}

impl LayoutCursor {
    /// A cursor at the top edge of the document's first page. The first page
    /// starts above the top margin so a full-bleed header band can be placed.
    pub fn new(doc: &Document) -> Self {
        let geometry: &PageGeometry = doc.geometry();
        Self {
            page: doc.page_count() - 1,
            y: 0.0,
            top: geometry.content_top(),
            bottom: geometry.content_bottom(),
            reserved: None,
            hold_next: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.bottom + EPSILON
    }

    /// Nothing has been written below the top margin of the current page yet.
    pub fn at_page_top(&self) -> bool {
        self.y <= self.top + EPSILON
    }

    pub(crate) fn is_reserved(&self) -> bool {
        self.reserved.is_some()
    }

    /// Reserve `height` for the next block, breaking to a new page when it would
    /// cross the content bottom. Returns true if a page was added.
    ///
    /// A block taller than a whole content area is placed at the top of a fresh
    /// page and overflows; it is never split.
    pub fn ensure_space(&mut self, doc: &mut Document, height: f32) -> bool {
        let held = std::mem::take(&mut self.hold_next);
        let mut broke = false;
        if !self.fits(height) && !self.at_page_top() && !held {
            self.break_page(doc);
            broke = true;
        }
        if !self.fits(height) {
            log::warn!(
                "Block of {height:.1}pt exceeds the {:.1}pt content area on page {}; it will overflow",
                self.bottom - self.y,
                self.page + 1
            );
        }
        self.reserved = Some(height);
        broke
    }

    /// Move past a block that was reserved with [`LayoutCursor::ensure_space`]
    /// and has been written.
    pub fn advance(&mut self, height: f32) {
        let reserved = self.reserved.take();
        assert!(
            reserved.is_some_and(|r| height <= r + EPSILON),
            "advance({height}) without a matching ensure_space (reserved {reserved:?})"
        );
        self.y += height;
    }

    /// Pin the next block to the current page. Used after a heading that
    /// already sits at the top of a page together with an oversized first
    /// block: breaking again would leave the heading alone.
    pub fn keep_with_next(&mut self) {
        self.hold_next = true;
    }

    /// Coarse break for blocks whose height is not measured up front: start a
    /// new page if the cursor is already below `threshold`.
    pub fn new_page_if_below(&mut self, doc: &mut Document, threshold: f32) -> bool {
        assert!(
            self.reserved.is_none(),
            "page break requested while a block is reserved"
        );
        self.hold_next = false;
        if self.y > threshold && !self.at_page_top() {
            self.break_page(doc);
            return true;
        }
        false
    }

    /// Vertical gap between blocks. Gaps never emit content, are clamped to the
    /// content bottom and are dropped at the top of a page.
    pub fn gap(&mut self, height: f32) {
        if (self.y - self.top).abs() <= EPSILON {
            return;
        }
        self.y = (self.y + height).min(self.bottom);
    }

    fn break_page(&mut self, doc: &mut Document) {
        self.page = doc.add_page();
        log::debug!("Page {} allocated (break at y={:.1})", self.page + 1, self.y);
        self.y = self.top;
    }
}
