//! Draws a game state onto a `Renderer`

use super::Renderer;
use super::vertex::colors;
use crate::Rect;
use crate::consts::{FILL_INSET, LINE_WIDTH, SCORE_FONT, SCORE_POS};
use crate::sim::{Column, GameState, Player};

/// Draw one frame: columns in view, the player, then the score
pub fn draw_scene<R: Renderer + ?Sized>(state: &GameState, renderer: &mut R) {
    let (w, h) = (renderer.width(), renderer.height());
    renderer.clear_rect(0.0, 0.0, w, h);
    renderer.set_line_width(LINE_WIDTH);

    for column in &state.columns {
        draw_column(column, state.tuning.viewport_width, renderer);
    }
    draw_player(&state.player, renderer);

    renderer.set_fill_color(colors::SCORE);
    renderer.set_font(SCORE_FONT);
    renderer.fill_text(&state.score.to_string(), SCORE_POS.0, SCORE_POS.1);
}

fn draw_column<R: Renderer + ?Sized>(column: &Column, viewport_width: f32, renderer: &mut R) {
    // Blocks only exist once the column has entered and picked its gap
    if !column.in_view(viewport_width) || column.gap.is_none() {
        return;
    }
    renderer.set_fill_color(colors::BLOCK);
    for i in (0..column.count).filter(|&i| !column.is_gap_block(i)) {
        draw_box(column.block_bounds(i), renderer);
    }
}

fn draw_player<R: Renderer + ?Sized>(player: &Player, renderer: &mut R) {
    renderer.set_fill_color(colors::PLAYER);
    draw_box(player.bounds(), renderer);
}

/// Outlined square with an inset fill
fn draw_box<R: Renderer + ?Sized>(rect: Rect, renderer: &mut R) {
    renderer.stroke_rect(rect.min.x, rect.min.y, rect.size.x, rect.size.y);
    let fill = rect.inset(FILL_INSET);
    renderer.fill_rect(fill.min.x, fill.min.y, fill.size.x, fill.size.y);
}
