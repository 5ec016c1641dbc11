//! Rendering module
//!
//! The game draws through the `Renderer` trait: a small canvas-like surface
//! with rectangle and text primitives. `QuadBatch` turns those calls into
//! vertices; `GpuRenderer` puts them on screen with WebGPU.

pub mod batch;
pub mod glyphs;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use batch::QuadBatch;
pub use pipeline::{GpuInitError, GpuRenderer};
pub use scene::draw_scene;
pub use vertex::{Vertex, colors};

/// RGBA, 0..1, sRGB
pub type Color = [f32; 4];

/// A drawing surface of fixed pixel size
///
/// Coordinates are pixels from the top-left corner, y down.
pub trait Renderer {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Outline in the outline color, `line_width` wide, centred on the edge
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Text with its baseline at `y`
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    fn set_line_width(&mut self, width: f32);
    fn set_fill_color(&mut self, color: Color);
    /// CSS-style font, e.g. `"24px sans-serif"`
    fn set_font(&mut self, font: &str);

    /// Called once after a frame has been drawn
    fn present(&mut self) {}
}
