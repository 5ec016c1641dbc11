//! Seven-segment glyphs for the score readout
//!
//! Only digits and `-` have shapes. Anything else advances the pen.

use crate::Rect;

/// Glyph height as a fraction of the font size
const CAP_HEIGHT: f32 = 0.72;
/// Glyph width as a fraction of glyph height
const ASPECT: f32 = 0.55;
/// Segment thickness as a fraction of glyph height
const STROKE: f32 = 0.12;
/// Space after each glyph as a fraction of the font size
const TRACKING: f32 = 0.15;

// Segment bits, clockwise from the top, then the middle bar
const A: u8 = 1 << 0;
const B: u8 = 1 << 1;
const C: u8 = 1 << 2;
const D: u8 = 1 << 3;
const E: u8 = 1 << 4;
const F: u8 = 1 << 5;
const G: u8 = 1 << 6;

/// Lit segments for a character
pub fn segments(ch: char) -> Option<u8> {
    let bits = match ch {
        '0' => A | B | C | D | E | F,
        '1' => B | C,
        '2' => A | B | D | E | G,
        '3' => A | B | C | D | G,
        '4' => B | C | F | G,
        '5' => A | C | D | F | G,
        '6' => A | C | D | E | F | G,
        '7' => A | B | C,
        '8' => A | B | C | D | E | F | G,
        '9' => A | B | C | D | F | G,
        '-' => G,
        _ => return None,
    };
    Some(bits)
}

/// Pixel size from a CSS-style font string such as `"bold 24px sans-serif"`
pub fn font_px(font: &str) -> Option<f32> {
    font.split_whitespace()
        .find_map(|token| token.strip_suffix("px"))
        .and_then(|size| size.parse::<f32>().ok())
        .filter(|size| *size > 0.0)
}

/// Horizontal advance of one glyph cell
pub fn advance(font_px: f32) -> f32 {
    font_px * (CAP_HEIGHT * ASPECT + TRACKING)
}

/// Segment rectangles for `text` with its baseline at `(x, baseline)`
pub fn layout(text: &str, x: f32, baseline: f32, font_px: f32) -> Vec<Rect> {
    let h = font_px * CAP_HEIGHT;
    let w = h * ASPECT;
    let t = h * STROKE;
    let top = baseline - h;
    let mid = top + h / 2.0;

    let mut rects = Vec::new();
    let mut pen = x;
    for ch in text.chars() {
        if let Some(bits) = segments(ch) {
            let parts = [
                (A, Rect::new(pen, top, w, t)),
                (B, Rect::new(pen + w - t, top, t, h / 2.0)),
                (C, Rect::new(pen + w - t, mid, t, h / 2.0)),
                (D, Rect::new(pen, baseline - t, w, t)),
                (E, Rect::new(pen, mid, t, h / 2.0)),
                (F, Rect::new(pen, top, t, h / 2.0)),
                (G, Rect::new(pen, mid - t / 2.0, w, t)),
            ];
            rects.extend(
                parts
                    .iter()
                    .filter(|(bit, _)| bits & bit != 0)
                    .map(|(_, rect)| *rect),
            );
        }
        pen += advance(font_px);
    }
    rects
}
