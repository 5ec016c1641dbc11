//! CPU-side quad batching
//!
//! Turns canvas-style draw calls into a triangle list in pixel space. The GPU
//! backend uploads the result once per frame; tests and the headless runner
//! just inspect it.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use super::{Color, Renderer, glyphs};
use crate::Rect;
use crate::consts::SCORE_FONT;

/// Collects a frame's worth of rectangles
#[derive(Debug, Clone)]
pub struct QuadBatch {
    size: Vec2,
    vertices: Vec<Vertex>,
    fill: Color,
    line_width: f32,
    font_px: f32,
    background: Color,
}

impl QuadBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            vertices: Vec::with_capacity(1024),
            fill: colors::OUTLINE,
            line_width: 1.0,
            font_px: glyphs::font_px(SCORE_FONT).unwrap_or(24.0),
            background: colors::BACKGROUND,
        }
    }

    /// Vertices in pixel space, two triangles per quad
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 6
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn fill_color(&self) -> Color {
        self.fill
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Push one solid rectangle
    pub fn push_rect(&mut self, rect: Rect, color: Color) {
        if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
            return;
        }
        let (min, max) = (rect.min, rect.max());
        self.vertices.extend_from_slice(&[
            Vertex::new(min.x, min.y, color),
            Vertex::new(max.x, min.y, color),
            Vertex::new(max.x, max.y, color),
            Vertex::new(min.x, min.y, color),
            Vertex::new(max.x, max.y, color),
            Vertex::new(min.x, max.y, color),
        ]);
    }

    /// The four bars of an outline centred on the rectangle's edge
    fn outline(rect: Rect, width: f32) -> [Rect; 4] {
        let half = width / 2.0;
        let outer = rect.inset(-half);
        let inner_h = (rect.size.y - width).max(0.0);
        [
            Rect::new(outer.min.x, outer.min.y, outer.size.x, width),
            Rect::new(outer.min.x, rect.max().y - half, outer.size.x, width),
            Rect::new(outer.min.x, rect.min.y + half, width, inner_h),
            Rect::new(rect.max().x - half, rect.min.y + half, width, inner_h),
        ]
    }
}

impl Renderer for QuadBatch {
    fn width(&self) -> f32 {
        self.size.x
    }

    fn height(&self) -> f32 {
        self.size.y
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let rect = Rect::new(x, y, w, h);
        if rect.covers(&Rect::new(0.0, 0.0, self.size.x, self.size.y)) {
            self.vertices.clear();
        } else {
            let background = self.background;
            self.push_rect(rect, background);
        }
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        for bar in Self::outline(Rect::new(x, y, w, h), self.line_width) {
            self.push_rect(bar, colors::OUTLINE);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let fill = self.fill;
        self.push_rect(Rect::new(x, y, w, h), fill);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let fill = self.fill;
        for rect in glyphs::layout(text, x, y, self.font_px) {
            self.push_rect(rect, fill);
        }
    }

    fn set_line_width(&mut self, width: f32) {
        if width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_font(&mut self, font: &str) {
        match glyphs::font_px(font) {
            Some(px) => self.font_px = px,
            None => log::warn!("No pixel size in font {:?}, keeping {}px", font, self.font_px),
        }
    }
}
