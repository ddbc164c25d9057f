//! Character-count text measurement.
//!
//! Helvetica glyphs average about half an em wide, which is close enough
//! to size blocks before anything is drawn.

/// Points to millimetres
pub const PT_TO_MM: f32 = 25.4 / 72.0;

const AVG_GLYPH_EM: f32 = 0.5;
const LINE_SPACING: f32 = 1.25;

/// How many characters fit across `width_mm` at `font_pt`
pub fn chars_per_line(width_mm: f32, font_pt: f32) -> usize {
    let glyph = font_pt * PT_TO_MM * AVG_GLYPH_EM;
    if glyph <= 0.0 || !glyph.is_finite() || !width_mm.is_finite() {
        return 1;
    }
    ((width_mm / glyph).floor() as usize).max(1)
}

/// Height of one line of text at `font_pt`, in millimetres
pub fn line_height(font_pt: f32) -> f32 {
    font_pt * PT_TO_MM * LINE_SPACING
}

/// Word-wrap `text` to at most `max_chars` per line.
///
/// Words longer than a line are hard-split. Always returns at least one
/// line so an empty cell still occupies a row.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Cut `text` to `max_chars` characters, appending "..." when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
