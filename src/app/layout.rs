use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::Story;

/// Title row: title, pad, then `(score)` flush against the right edge. The
/// pad is computed without the separating space, so the widest row still
/// keeps one space before its score.
pub fn title_line(story: &Story, width: usize) -> String {
    let score = format!("({})", story.score);
    let pad = width.saturating_sub(story.title.width() + score.width());
    pad_to_columns(&format!("{}{}{}", story.title, " ".repeat(pad), score), width)
}

pub fn url_line(story: &Story, width: usize) -> String {
    pad_to_columns(&story.url, width)
}

/// Header and footer bars: the fixed label clipped or padded to the board
/// width.
pub fn bar_line(text: &str, width: usize) -> String {
    pad_to_columns(text, width)
}

/// Clips or right-pads to exactly `width` display columns. A wide grapheme
/// that would straddle the edge is dropped, never split.
fn pad_to_columns(text: &str, width: usize) -> String {
    let mut line = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        line.push(ch);
    }
    for _ in used..width {
        line.push(' ');
    }
    line
}
