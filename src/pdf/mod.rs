//! Byte encoding of a finished [`Document`].
//!
//! The layout model measures y downward from the top edge; PDF user space
//! grows upward, so every y is flipped against the page height here and
//! nowhere else. Output depends only on the document and the fonts: objects
//! are allocated in a fixed order and fonts are keyed by ordered maps.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{BALLOT_BOX_CHECKED, FontEntry, FontSet, TextMeasure, is_checkbox, register_font};
use crate::model::{Color, Document, DrawCommand, FontFace, TextAlign};

const PRODUCER: &str = concat!("case-report-pdf ", env!("CARGO_PKG_VERSION"));

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

struct FontTable {
    entries: Vec<FontEntry>,
    by_face: BTreeMap<FontFace, usize>,
}

impl FontTable {
    fn get(&self, face: FontFace) -> Option<&FontEntry> {
        self.by_face.get(&face).map(|&i| &self.entries[i])
    }
}

/// Needs a vector fallback: a checkbox the face cannot draw.
fn is_fallback_glyph(fonts: &FontSet, face: FontFace, ch: char) -> bool {
    is_checkbox(ch) && !fonts.face(face).has_glyph(ch)
}

fn collect_chars(doc: &Document, fonts: &FontSet) -> BTreeMap<FontFace, BTreeSet<char>> {
    let mut used: BTreeMap<FontFace, BTreeSet<char>> = BTreeMap::new();
    for page in doc.pages() {
        for cmd in page.commands() {
            if let DrawCommand::Text { text, face, .. } = cmd {
                let chars = text
                    .chars()
                    .filter(|&ch| !is_fallback_glyph(fonts, *face, ch));
                used.entry(*face).or_default().extend(chars);
            }
        }
    }
    used.retain(|_, chars| !chars.is_empty());
    used
}

/// Register one PDF font per distinct font source. Faces that resolve to the
/// same source (a TrueType regular face standing in for bold) share it.
fn register_fonts(
    pdf: &mut Pdf,
    fonts: &FontSet,
    used: &BTreeMap<FontFace, BTreeSet<char>>,
    alloc: &mut impl FnMut() -> Ref,
) -> FontTable {
    let mut groups: Vec<(FontFace, BTreeSet<char>)> = Vec::new();
    let mut by_face = BTreeMap::new();
    for (&face, chars) in used {
        let metrics = fonts.face(face);
        let index = match groups
            .iter()
            .position(|(other, _)| fonts.face(*other).same_source(metrics))
        {
            Some(i) => {
                groups[i].1.extend(chars.iter().copied());
                i
            }
            None => {
                groups.push((face, chars.clone()));
                groups.len() - 1
            }
        };
        by_face.insert(face, index);
    }

    let entries = groups
        .iter()
        .enumerate()
        .map(|(i, (face, chars))| {
            for &ch in chars {
                if !fonts.face(*face).has_glyph(ch) && !ch.is_whitespace() {
                    log::warn!("Font for {face:?} has no glyph for {ch:?}");
                }
            }
            register_font(pdf, fonts.face(*face), format!("F{}", i + 1), alloc, chars)
        })
        .collect();

    FontTable { entries, by_face }
}

fn rounded_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, radius: f32) {
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * KAPPA;
    content.move_to(x + r, y);
    content.line_to(x + w - r, y);
    content.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    content.line_to(x + w, y + h - r);
    content.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    content.line_to(x + r, y + h);
    content.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    content.line_to(x, y + r);
    content.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    content.close_path();
}

/// Square box (ticked when `checked`) standing in for a missing ballot glyph.
fn draw_checkbox(content: &mut Content, x: f32, baseline: f32, size: f32, checked: bool, color: Color) {
    let side = size * 0.7;
    let left = x + size * 0.05;
    let bottom = baseline - size * 0.02;
    let (r, g, b) = color.to_unit();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(size * 0.07);
    content.rect(left, bottom, side, side);
    content.stroke();
    if checked {
        content.move_to(left + side * 0.2, bottom + side * 0.5);
        content.line_to(left + side * 0.42, bottom + side * 0.22);
        content.line_to(left + side * 0.82, bottom + side * 0.8);
        content.stroke();
    }
}

fn show_run(content: &mut Content, entry: Option<&FontEntry>, run: &str, x: f32, baseline: f32, size: f32) {
    let Some(entry) = entry else {
        return;
    };
    if run.is_empty() {
        return;
    }
    content
        .begin_text()
        .set_font(Name(entry.pdf_name.as_bytes()), size)
        .next_line(x, baseline)
        .show(Str(&entry.encode(run)))
        .end_text();
}

struct TextRun<'a> {
    x: f32,
    y: f32,
    text: &'a str,
    face: FontFace,
    size: f32,
    color: Color,
    align: TextAlign,
}

fn draw_text(content: &mut Content, run: TextRun<'_>, page_height: f32, fonts: &FontSet, table: &FontTable) {
    let width = fonts.text_width(run.text, run.face, run.size);
    let start_x = match run.align {
        TextAlign::Left => run.x,
        TextAlign::Center => run.x - width / 2.0,
        TextAlign::Right => run.x - width,
    };
    let baseline = page_height - run.y;
    let entry = table.get(run.face);
    let (r, g, b) = run.color.to_unit();
    content.set_fill_rgb(r, g, b);

    let mut pending = String::new();
    let mut pending_x = start_x;
    let mut pen = start_x;
    for ch in run.text.chars() {
        let advance = fonts.char_width_1000(run.face, ch) * run.size / 1000.0;
        if is_fallback_glyph(fonts, run.face, ch) {
            show_run(content, entry, &pending, pending_x, baseline, run.size);
            pending.clear();
            draw_checkbox(content, pen, baseline, run.size, ch == BALLOT_BOX_CHECKED, run.color);
            pen += advance;
            pending_x = pen;
        } else {
            pending.push(ch);
            pen += advance;
        }
    }
    show_run(content, entry, &pending, pending_x, baseline, run.size);
}

fn draw_command(content: &mut Content, cmd: &DrawCommand, page_height: f32, fonts: &FontSet, table: &FontTable) {
    match cmd {
        DrawCommand::Text {
            x,
            y,
            text,
            face,
            size,
            color,
            align,
        } => draw_text(
            content,
            TextRun {
                x: *x,
                y: *y,
                text,
                face: *face,
                size: *size,
                color: *color,
                align: *align,
            },
            page_height,
            fonts,
            table,
        ),
        DrawCommand::Rect {
            x,
            y,
            width,
            height,
            fill,
            radius,
        } => {
            let (r, g, b) = fill.to_unit();
            content.set_fill_rgb(r, g, b);
            let bottom = page_height - y - height;
            if *radius > 0.0 {
                rounded_rect(content, *x, bottom, *width, *height, *radius);
            } else {
                content.rect(*x, bottom, *width, *height);
            }
            content.fill_nonzero();
        }
    }
}

fn pdf_date(doc: &Document) -> Date {
    let t = doc.generated_at;
    Date::new(u16::try_from(t.year()).unwrap_or(0))
        .month(t.month() as u8)
        .day(t.day() as u8)
        .hour(t.hour() as u8)
        .minute(t.minute() as u8)
        .second(t.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0)
}

pub fn write_pdf(doc: &Document, fonts: &FontSet) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: fonts, subset to the characters actually drawn
    let used = collect_chars(doc, fonts);
    let table = register_fonts(&mut pdf, fonts, &used, &mut alloc);
    let t_fonts = t0.elapsed();

    // Phase 2: one compressed content stream per page
    let geometry = *doc.geometry();
    let n = doc.page_count();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages().iter().enumerate() {
        let mut content = Content::new();
        for cmd in page.commands() {
            draw_command(&mut content, cmd, geometry.height, fonts, &table);
        }
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }
    let t_pages = t0.elapsed();

    // Phase 3: page tree and document info
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let font_pairs: Vec<(&str, Ref)> = table
        .entries
        .iter()
        .map(|e| (e.pdf_name.as_str(), e.font_ref))
        .collect();

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in &font_pairs {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    let policy = doc.variant.policy();
    pdf.document_info(info_id)
        .title(TextStr(&doc.title))
        .subject(TextStr(policy.copy_label))
        .producer(TextStr(PRODUCER))
        .creation_date(pdf_date(doc));

    let bytes = pdf.finish();
    let t_total = t0.elapsed();

    log::info!(
        "Encode phases: fonts={:.1}ms, pages={:.1}ms, assembly={:.1}ms ({} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_pages - t_fonts).as_secs_f64() * 1000.0,
        (t_total - t_pages).as_secs_f64() * 1000.0,
        n,
        bytes.len(),
    );

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageGeometry;
    use crate::fonts::BALLOT_BOX;
    use crate::variant::Variant;
    use chrono::{DateTime, Utc};

    fn doc_with(texts: &[(&str, FontFace)], pages: usize) -> Document {
        let mut doc = Document::new(
            Variant::Dentist,
            "Encoder test",
            PageGeometry::default(),
            DateTime::<Utc>::UNIX_EPOCH,
        );
        for _ in 1..pages {
            doc.add_page();
        }
        for (text, face) in texts {
            doc.push(
                0,
                DrawCommand::Text {
                    x: 40.0,
                    y: 100.0,
                    text: text.to_string(),
                    face: *face,
                    size: 10.0,
                    color: Color(0, 0, 0),
                    align: TextAlign::Left,
                },
            );
        }
        doc.push(
            0,
            DrawCommand::Rect {
                x: 40.0,
                y: 120.0,
                width: 100.0,
                height: 20.0,
                fill: Color(245, 245, 245),
                radius: 4.0,
            },
        );
        doc
    }

    fn operators(bytes: &[u8], page_number: u32) -> Vec<String> {
        let pdf = lopdf::Document::load_mem(bytes).unwrap();
        let page_id = pdf.get_pages()[&page_number];
        let data = pdf.get_page_content(page_id).unwrap();
        lopdf::content::Content::decode(&data)
            .unwrap()
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect()
    }

    #[test]
    fn page_count_survives_a_round_trip_through_a_reader() {
        let doc = doc_with(&[("Hello", FontFace::Regular)], 3);
        let bytes = write_pdf(&doc, &FontSet::standard()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 3);
    }

    #[test]
    fn only_used_faces_are_registered() {
        let doc = doc_with(&[("Body", FontFace::Regular), ("Head", FontFace::Bold)], 1);
        let fonts = FontSet::standard();
        let used = collect_chars(&doc, &fonts);
        assert_eq!(used.keys().copied().collect::<Vec<_>>(), [FontFace::Regular, FontFace::Bold]);
        let bytes = write_pdf(&doc, &fonts).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Helvetica-Bold"));
        assert!(!text.contains("/Helvetica-Oblique"));
    }

    #[test]
    fn missing_checkbox_glyph_is_drawn_as_a_vector_box() {
        let boxed = format!("{BALLOT_BOX_CHECKED}");
        let doc = doc_with(&[(boxed.as_str(), FontFace::Regular)], 1);
        let fonts = FontSet::standard();
        assert!(collect_chars(&doc, &fonts).is_empty());
        let ops = operators(&write_pdf(&doc, &fonts).unwrap(), 1);
        assert!(ops.iter().any(|op| op == "re"));
        assert!(ops.iter().filter(|op| *op == "S").count() >= 2, "box and tick: {ops:?}");
        assert!(!ops.iter().any(|op| op == "Tj"));
    }

    #[test]
    fn text_around_a_checkbox_is_split_into_runs() {
        let mixed = format!("a{BALLOT_BOX}b");
        let doc = doc_with(&[(mixed.as_str(), FontFace::Regular)], 1);
        let ops = operators(&write_pdf(&doc, &FontSet::standard()).unwrap(), 1);
        assert_eq!(ops.iter().filter(|op| *op == "Tj").count(), 2);
    }

    #[test]
    fn rounded_rect_uses_curves() {
        let doc = doc_with(&[], 1);
        let ops = operators(&write_pdf(&doc, &FontSet::standard()).unwrap(), 1);
        assert_eq!(ops.iter().filter(|op| *op == "c").count(), 4);
        assert!(ops.iter().any(|op| op == "f"));
    }

    #[test]
    fn equal_documents_encode_identically() {
        let doc = doc_with(&[("Stable", FontFace::Italic)], 2);
        let fonts = FontSet::standard();
        assert_eq!(write_pdf(&doc, &fonts).unwrap(), write_pdf(&doc, &fonts).unwrap());
    }
}
