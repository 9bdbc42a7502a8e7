//! Tiny bitmap glyph renderer.
//!
//! Charts and video overlays are lettered without any font machinery: each
//! character is a 3x5 pixel glyph scaled up by an integer factor. Lowercase
//! input is drawn with the uppercase glyphs; characters without a glyph come
//! out as a filled block.

use forage_core::Frame;

const GLYPH_WIDTH: usize = 3;

/// Horizontal advance per character at scale 1 (glyph plus a one pixel gap).
const CHAR_ADVANCE: usize = GLYPH_WIDTH + 1;

/// Glyph rows, one 3-bit pattern per row, most significant bit leftmost.
fn glyph(ch: char) -> [u8; 5] {
    match ch {
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b011, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'X' => [0b101, 0b010, 0b010, 0b010, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        _ => [0b111, 0b111, 0b111, 0b111, 0b111],
    }
}

/// Draws one line of text with its top-left corner at `(x, y)`.
pub(crate) fn draw_text(frame: &mut Frame, x: usize, y: usize, text: &str, scale: usize, color: [u8; 3]) {
    let scale = scale.max(1);
    let mut cursor = x;
    for ch in text.chars() {
        let rows = glyph(ch.to_ascii_uppercase());
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits >> (GLYPH_WIDTH - 1 - col) & 1 == 1 {
                    let px = cursor + col * scale;
                    let py = y + row * scale;
                    frame.fill_rect(px, py, px + scale, py + scale, color);
                }
            }
        }
        cursor += CHAR_ADVANCE * scale;
    }
}

/// Draws `text` horizontally centered on `cx`.
pub(crate) fn draw_text_centered(frame: &mut Frame, cx: usize, y: usize, text: &str, scale: usize, color: [u8; 3]) {
    let x = cx.saturating_sub(text_width(text, scale) / 2);
    draw_text(frame, x, y, text, scale, color);
}

/// Width in pixels of `text` drawn at `scale`, without the trailing gap.
pub(crate) fn text_width(text: &str, scale: usize) -> usize {
    let scale = scale.max(1);
    match text.chars().count() {
        0 => 0,
        n => n * CHAR_ADVANCE * scale - scale,
    }
}
