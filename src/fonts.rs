use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;
use crate::model::FontFace;

pub const BALLOT_BOX: char = '\u{2610}';
pub const BALLOT_BOX_CHECKED: char = '\u{2611}';

/// Advance of a checkbox glyph when the face cannot draw it and the encoder
/// falls back to a vector box.
const CHECKBOX_ADVANCE: f32 = 800.0;

pub(crate) fn is_checkbox(ch: char) -> bool {
    ch == BALLOT_BOX || ch == BALLOT_BOX_CHECKED
}

/// Text metrics used by layout. Widths are in 1000-units per em.
pub trait TextMeasure {
    fn char_width_1000(&self, face: FontFace, ch: char) -> f32;

    /// Ascender as a fraction of the font size.
    fn ascender_ratio(&self, face: FontFace) -> f32;

    fn text_width(&self, text: &str, face: FontFace, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(face, ch))
            .sum::<f32>()
            * size
            / 1000.0
    }

    fn space_width(&self, face: FontFace, size: f32) -> f32 {
        self.char_width_1000(face, ' ') * size / 1000.0
    }
}

/// One of the standard 14 Helvetica faces, drawn without embedding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardFont {
    base_font: &'static str,
    widths: &'static [u16; 95],
}

/// A TrueType/OpenType face supplied by the host, measured with `ttf-parser`
/// and subset on embedding.
#[derive(Debug)]
pub struct TrueTypeFace {
    family: String,
    data: Vec<u8>,
    index: u32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    cap_height: f32,
    bbox: [f32; 4],
    /// char -> (glyph id, advance in 1000-units)
    glyphs: BTreeMap<char, (u16, f32)>,
    notdef_advance: f32,
}

/// Code point ranges scanned when indexing a face: Latin, general punctuation,
/// currency, letterlike, arrows, math, box drawing through dingbats.
const INDEXED_RANGES: [(u32, u32); 8] = [
    (0x0020, 0x007E),
    (0x00A0, 0x024F),
    (0x2000, 0x206F),
    (0x20A0, 0x20CF),
    (0x2100, 0x215F),
    (0x2190, 0x21FF),
    (0x2200, 0x22FF),
    (0x2500, 0x27BF),
];

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

impl TrueTypeFace {
    pub fn parse(data: Vec<u8>) -> Result<Self, Error> {
        Self::parse_index(data, 0)
    }

    /// Parse face `index` of a font file or collection.
    pub fn parse_index(data: Vec<u8>, index: u32) -> Result<Self, Error> {
        let face = Face::parse(&data, index).map_err(|e| Error::InvalidFont(e.to_string()))?;

        let units = face.units_per_em() as f32;
        let to_1000 = |v: f32| v / units * 1000.0;

        let mut glyphs = BTreeMap::new();
        for (start, end) in INDEXED_RANGES {
            for ch in (start..=end).filter_map(char::from_u32) {
                if let Some(gid) = face.glyph_index(ch) {
                    let advance = face
                        .glyph_hor_advance(gid)
                        .map(|adv| to_1000(adv as f32))
                        .unwrap_or(0.0);
                    glyphs.insert(ch, (gid.0, advance));
                }
            }
        }
        if glyphs.is_empty() {
            return Err(Error::InvalidFont("face maps no Latin characters".into()));
        }

        let notdef_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .map(|adv| to_1000(adv as f32))
            .unwrap_or(500.0);
        let bb = face.global_bounding_box();
        let family = font_family_name(&face).unwrap_or_else(|| "EmbeddedFont".to_string());

        log::debug!(
            "Indexed TrueType face {family}: {} glyphs, {} units/em",
            glyphs.len(),
            face.units_per_em()
        );

        Ok(Self {
            family,
            units_per_em: units,
            ascender: face.ascender() as f32,
            descender: face.descender() as f32,
            cap_height: face
                .capital_height()
                .map(|h| to_1000(h as f32))
                .unwrap_or(700.0),
            bbox: [
                to_1000(bb.x_min as f32),
                to_1000(bb.y_min as f32),
                to_1000(bb.x_max as f32),
                to_1000(bb.y_max as f32),
            ],
            glyphs,
            notdef_advance,
            data,
            index,
        })
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }
}

#[derive(Clone, Debug)]
pub enum FaceMetrics {
    Standard(StandardFont),
    TrueType(Arc<TrueTypeFace>),
}

impl FaceMetrics {
    fn char_width_1000(&self, ch: char) -> f32 {
        match self {
            FaceMetrics::Standard(font) => {
                if is_checkbox(ch) {
                    return CHECKBOX_ADVANCE;
                }
                let byte = char_to_winansi(ch);
                match byte {
                    32..=126 => font.widths[(byte - 32) as usize] as f32,
                    128..=255 => high_winansi_width(byte) as f32,
                    // Unmappable characters are dropped when encoding.
                    _ => 0.0,
                }
            }
            FaceMetrics::TrueType(face) => match face.glyphs.get(&ch) {
                Some(&(_, advance)) => advance,
                None if is_checkbox(ch) => CHECKBOX_ADVANCE,
                None => face.notdef_advance,
            },
        }
    }

    pub fn has_glyph(&self, ch: char) -> bool {
        match self {
            FaceMetrics::Standard(_) => char_to_winansi(ch) != 0,
            FaceMetrics::TrueType(face) => face.has_glyph(ch),
        }
    }

    fn ascender_ratio(&self) -> f32 {
        match self {
            // Helvetica AFM ascender 718
            FaceMetrics::Standard(_) => 0.718,
            FaceMetrics::TrueType(face) => face.ascender / face.units_per_em,
        }
    }

    pub(crate) fn same_source(&self, other: &FaceMetrics) -> bool {
        match (self, other) {
            (FaceMetrics::Standard(a), FaceMetrics::Standard(b)) => a == b,
            (FaceMetrics::TrueType(a), FaceMetrics::TrueType(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The three faces a report draws with.
#[derive(Clone, Debug)]
pub struct FontSet {
    regular: FaceMetrics,
    bold: FaceMetrics,
    italic: FaceMetrics,
}

impl Default for FontSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl FontSet {
    /// Helvetica, Helvetica-Bold and Helvetica-Oblique.
    pub fn standard() -> Self {
        Self {
            regular: FaceMetrics::Standard(StandardFont {
                base_font: "Helvetica",
                widths: &HELVETICA_WIDTHS,
            }),
            bold: FaceMetrics::Standard(StandardFont {
                base_font: "Helvetica-Bold",
                widths: &HELVETICA_BOLD_WIDTHS,
            }),
            italic: FaceMetrics::Standard(StandardFont {
                base_font: "Helvetica-Oblique",
                widths: &HELVETICA_WIDTHS,
            }),
        }
    }

    /// Embedded TrueType faces. Missing bold/italic faces reuse the regular one.
    pub fn truetype(
        regular: TrueTypeFace,
        bold: Option<TrueTypeFace>,
        italic: Option<TrueTypeFace>,
    ) -> Self {
        let regular = Arc::new(regular);
        let or_regular =
            |face: Option<TrueTypeFace>| face.map(Arc::new).unwrap_or_else(|| Arc::clone(&regular));
        let bold = or_regular(bold);
        let italic = or_regular(italic);
        Self {
            regular: FaceMetrics::TrueType(regular),
            bold: FaceMetrics::TrueType(bold),
            italic: FaceMetrics::TrueType(italic),
        }
    }

    pub fn face(&self, face: FontFace) -> &FaceMetrics {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Italic => &self.italic,
        }
    }
}

impl TextMeasure for FontSet {
    fn char_width_1000(&self, face: FontFace, ch: char) -> f32 {
        self.face(face).char_width_1000(ch)
    }

    fn ascender_ratio(&self, face: FontFace) -> f32 {
        self.face(face).ascender_ratio()
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Characters outside the code page are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(char_to_winansi)
        .filter(|&b| b != 0)
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &BTreeMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Helvetica advance widths (AFM, 1000 units/em) for ASCII 32..=126.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, //  !"#$%&'()
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556, // *+,-./0123
    556, 556, 556, 556, 556, 556, 278, 278, 584, 584, // 456789:;<=
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, // >?@ABCDEFG
    722, 278, 500, 667, 556, 833, 722, 778, 667, 778, // HIJKLMNOPQ
    722, 667, 611, 722, 667, 944, 667, 667, 611, 278, // RSTUVWXYZ[
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556, // \]^_`abcde
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // fghijklmno
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, // pqrstuvwxy
    500, 334, 260, 334, 584,                          // z{|}~
];

/// Helvetica-Bold advance widths (AFM, 1000 units/em) for ASCII 32..=126.
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, //  !"#$%&'()
    389, 584, 278, 333, 278, 278, 556, 556, 556, 556, // *+,-./0123
    556, 556, 556, 556, 556, 556, 333, 333, 584, 584, // 456789:;<=
    584, 611, 975, 722, 722, 722, 722, 667, 611, 778, // >?@ABCDEFG
    722, 278, 556, 722, 611, 833, 722, 778, 667, 778, // HIJKLMNOPQ
    722, 667, 611, 722, 667, 944, 667, 667, 611, 333, // RSTUVWXYZ[
    278, 333, 584, 556, 333, 556, 611, 556, 611, 556, // \]^_`abcde
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // fghijklmno
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, // pqrstuvwxy
    500, 389, 280, 389, 584,                          // z{|}~
];

/// Approximate Helvetica widths for WinAnsi bytes 0x80..=0xFF.
fn high_winansi_width(byte: u8) -> u16 {
    match byte {
        0x85 | 0x89 | 0x8C | 0x97 | 0x99 | 0xC6 => 1000,
        0x82 | 0x91 | 0x92 => 222,
        0x84 | 0x88 | 0x8B | 0x93 | 0x94 | 0x98 | 0x9B => 333,
        0x95 => 350,
        0x9C | 0xE6 => 944,
        0xA0 | 0xB7 | 0xCC..=0xCF | 0xEC..=0xEF => 278,
        0xB0 => 400,
        0xB1 | 0xD7 | 0xF7 => 584,
        0xC7 | 0xD0 | 0xD1 | 0xD9..=0xDC => 722,
        0xD2..=0xD6 | 0xD8 => 778,
        0x8A | 0x9F | 0xC0..=0xC5 | 0xC8..=0xCB | 0xDD | 0xDE => 667,
        0x8E | 0xDF => 611,
        0x9A | 0x9E | 0xE7 | 0xFD | 0xFF => 500,
        _ => 556,
    }
}

/// A face registered in a PDF under a resource name.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    char_to_gid: Option<BTreeMap<char, u16>>,
}

impl FontEntry {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    face: &TrueTypeFace,
    used_chars: &BTreeSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> BTreeMap<char, u16> {
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = BTreeMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(&(gid, advance)) = face.glyphs.get(&ch) {
            let new_gid = remapper.remap(gid);
            char_to_gid.insert(ch, new_gid);
            gid_widths.push((new_gid, advance));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(&face.data, face.index, &remapper).unwrap_or_else(|e| {
        log::warn!(
            "Font subsetting failed for {}: {e}; embedding full font",
            face.family
        );
        face.data.clone()
    });

    let data_len = i32::try_from(subset_data.len()).unwrap_or(i32::MAX);
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = face.family.replace(' ', "");
    let [x_min, y_min, x_max, y_max] = face.bbox;

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(x_min, y_min, x_max, y_max))
        .italic_angle(0.0)
        .ascent(face.ascender / face.units_per_em * 1000.0)
        .descent(face.descender / face.units_per_em * 1000.0)
        .cap_height(face.cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    for (&ch, &new_gid) in &char_to_gid {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    char_to_gid
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    metrics: &FaceMetrics,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &BTreeSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match metrics {
        FaceMetrics::Standard(font) => {
            pdf.type1_font(font_ref)
                .base_font(Name(font.base_font.as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            None
        }
        FaceMetrics::TrueType(face) => Some(embed_truetype(pdf, font_ref, face, used_chars, alloc)),
    };

    log::debug!(
        "register_font: {pdf_name} ({} chars) → {:.1}ms",
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
