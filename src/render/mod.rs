//! Canvas rendering for the per-agent replay panels.

pub mod freeway;
pub mod snake;

use std::hash::Hash;

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::model::{GameState, GameType};
use crate::sprites::{FreewayCache, SnakeCache, SpriteCache};
use crate::state::FrameView;

/// Paints one agent's panel for the current step. Dispatches on the game
/// tag; a missing or mismatched state renders the textual step placeholder,
/// and a terminated agent gets the dimming overlay on top of its frozen
/// frame.
pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    view: &FrameView<'_>,
    game: GameType,
    freeway_sprites: &FreewayCache,
    snake_sprites: &SnakeCache,
) {
    match (game, view.record.state.as_ref()) {
        (GameType::Freeway, Some(GameState::Freeway(state))) => {
            freeway::draw(ctx, width, height, state, freeway_sprites);
        }
        (GameType::Snake, Some(GameState::Snake(state))) => {
            snake::draw(ctx, width, height, state, snake_sprites);
        }
        _ => draw_step_placeholder(ctx, width, height, view.record.step),
    }
    if view.game_over {
        draw_terminated_overlay(ctx, width, height, view.record.step + 1);
    }
}

/// Per-draw capability check: sprite lookups are gated on the cache being
/// fully settled, and each individual miss falls back to a primitive.
pub(crate) fn sprite<K: Copy + Eq + Hash>(
    cache: &SpriteCache<K>,
    enabled: bool,
    key: K,
) -> Option<&HtmlImageElement> {
    if enabled { cache.get(key) } else { None }
}

fn draw_step_placeholder(ctx: &CanvasRenderingContext2d, width: f64, height: f64, step: u32) {
    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#f3f4f6");
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#374151");
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.fill_text(&format!("Step {}", step + 1), width / 2.0, height / 2.0)
        .ok();
    ctx.set_text_align("start");
    ctx.set_text_baseline("alphabetic");
}

/// Greys out an agent whose recorded episode is shorter than the shared
/// cursor; the other agents keep stepping.
fn draw_terminated_overlay(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    final_step: u32,
) {
    ctx.set_fill_style_str("rgba(75,85,99,0.7)");
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_font("bold 32px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_shadow_color("rgba(0,0,0,0.5)");
    ctx.set_shadow_blur(10.0);
    ctx.fill_text("GAME OVER", width / 2.0, height / 2.0).ok();
    ctx.set_shadow_blur(0.0);
    ctx.set_font("14px sans-serif");
    ctx.fill_text(
        &format!("Final Step: {final_step}"),
        width / 2.0,
        height / 2.0 + 40.0,
    )
    .ok();
    ctx.set_text_align("start");
    ctx.set_text_baseline("alphabetic");
}
