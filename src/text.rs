use crate::fonts::TextMeasure;
use crate::model::FontFace;

/// Slack for accumulated f32 error when comparing a line against its column.
const WIDTH_EPSILON: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32) -> Self {
        Self { face, size }
    }

    pub fn width(&self, text: &str, measure: &dyn TextMeasure) -> f32 {
        measure.text_width(text, self.face, self.size)
    }
}

/// Greedy word wrap against `max_width`.
///
/// Tokens are whitespace-separated words; they are never split, so a token
/// wider than the column sits alone on its own line. `\n` forces a break and
/// blank lines are dropped. Empty input gives no lines.
pub fn wrap(text: &str, max_width: f32, style: TextStyle, measure: &dyn TextMeasure) -> Vec<String> {
    let space_w = measure.space_width(style.face, style.size);
    let mut lines = Vec::new();

    for hard_line in text.lines() {
        let mut current = String::new();
        let mut current_w = 0.0f32;

        for word in hard_line.split_whitespace() {
            let word_w = style.width(word, measure);
            if current.is_empty() {
                current.push_str(word);
                current_w = word_w;
            } else if current_w + space_w + word_w <= max_width + WIDTH_EPSILON {
                current.push(' ');
                current.push_str(word);
                current_w += space_w + word_w;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = word_w;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}
