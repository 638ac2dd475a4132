// Snake pipeline: checkerboard interior, obstacles, food with life bars,
// then the snake assembled from sheet-derived directional sprites.

use web_sys::CanvasRenderingContext2d;

use super::sprite;
use crate::model::{Dir, SNAKE_BOARD, SnakeState};
use crate::sprites::{SnakeCache, SnakeSprite, TurnKind};
use crate::util::format_score;

/// Food life span the life bars are scaled against.
const FOOD_MAX_LIFE: f64 = 30.0;

/// Sprite for the head cell. A one-cell snake has no sheet body to join
/// onto and uses the standalone icon instead.
pub(crate) fn head_sprite(snake_len: usize, dir: Dir) -> SnakeSprite {
    if snake_len == 1 {
        SnakeSprite::Icon(dir)
    } else {
        SnakeSprite::Head(dir)
    }
}

/// Sprite for an interior segment, inferred from the offsets to its two
/// neighbours. The pair is canonicalized before the turn lookup so the
/// selection is independent of which neighbour is closer to the head.
pub(crate) fn body_sprite(prev: (i32, i32), curr: (i32, i32), next: (i32, i32)) -> SnakeSprite {
    let from = (prev.0 - curr.0, prev.1 - curr.1);
    let to = (next.0 - curr.0, next.1 - curr.1);
    if from.0 == 0 && to.0 == 0 {
        return SnakeSprite::StraightV;
    }
    if from.1 == 0 && to.1 == 0 {
        return SnakeSprite::StraightH;
    }
    let (a, b) = if from <= to { (from, to) } else { (to, from) };
    // rows grow downward, so up is (0,-1)
    match (a, b) {
        ((-1, 0), (0, -1)) => SnakeSprite::Turn(TurnKind::UpLeft),
        ((0, -1), (1, 0)) => SnakeSprite::Turn(TurnKind::UpRight),
        ((0, 1), (1, 0)) => SnakeSprite::Turn(TurnKind::DownRight),
        ((-1, 0), (0, 1)) => SnakeSprite::Turn(TurnKind::DownLeft),
        _ => SnakeSprite::StraightH,
    }
}

/// Sprite for the tail cell, pointing away from its single neighbour.
pub(crate) fn tail_sprite(neighbor: (i32, i32), tail: (i32, i32)) -> SnakeSprite {
    match (tail.0 - neighbor.0, tail.1 - neighbor.1) {
        (1, 0) => SnakeSprite::Tail(Dir::Right),
        (-1, 0) => SnakeSprite::Tail(Dir::Left),
        (0, -1) => SnakeSprite::Tail(Dir::Up),
        _ => SnakeSprite::Tail(Dir::Down),
    }
}

pub(super) fn draw(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    state: &SnakeState,
    sprites: &SnakeCache,
) {
    let cw = width / SNAKE_BOARD as f64;
    let ch = height / SNAKE_BOARD as f64;
    let use_sprites = sprites.loaded();

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#003333");
    ctx.fill_rect(0.0, 0.0, width, height);
    // checkerboard on the playable interior; the border ring stays backdrop
    for y in 1..SNAKE_BOARD - 1 {
        for x in 1..SNAKE_BOARD - 1 {
            let fill = if (x + y) % 2 == 0 { "#004d4d" } else { "#006666" };
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(x as f64 * cw, y as f64 * ch, cw, ch);
        }
    }

    for (x, y) in &state.obstacles {
        let px = *x as f64 * cw;
        let py = *y as f64 * ch;
        match sprite(sprites, use_sprites, SnakeSprite::Obstacle) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
            }
            None => {
                ctx.set_fill_style_str("#92400e");
                ctx.fill_rect(px, py, cw, ch);
                ctx.set_stroke_style_str("#451a03");
                ctx.set_line_width(2.0);
                ctx.stroke_rect(px + 1.0, py + 1.0, cw - 2.0, ch - 2.0);
            }
        }
    }

    for food in &state.food {
        if food.life() <= 0 {
            continue;
        }
        let px = food.x() as f64 * cw;
        let py = food.y() as f64 * ch;
        match sprite(sprites, use_sprites, SnakeSprite::Apple) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
            }
            None => {
                ctx.set_fill_style_str("#dc2626");
                ctx.begin_path();
                ctx.arc(
                    px + cw / 2.0,
                    py + ch / 2.0,
                    cw.min(ch) * 0.32,
                    0.0,
                    std::f64::consts::PI * 2.0,
                )
                .ok();
                ctx.fill();
            }
        }
        draw_life_bar(ctx, cw, px, py, food.life() as f64 / FOOD_MAX_LIFE);
    }

    let len = state.snake.len();
    for (i, cell) in state.snake.iter().enumerate() {
        let (x, y) = *cell;
        let px = x as f64 * cw;
        let py = y as f64 * ch;
        if i == 0 {
            let key = head_sprite(len, state.direction);
            match sprite(sprites, use_sprites, key) {
                Some(img) => {
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
                }
                None => draw_fallback_head(ctx, px, py, cw, ch, state.direction),
            }
        } else if i == len - 1 {
            let key = tail_sprite(state.snake[i - 1], (x, y));
            match sprite(sprites, use_sprites, key) {
                Some(img) => {
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
                }
                None => draw_fallback_segment(ctx, px, py, cw, ch, 0.28),
            }
        } else {
            let key = body_sprite(state.snake[i - 1], (x, y), state.snake[i + 1]);
            match sprite(sprites, use_sprites, key) {
                Some(img) => {
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
                }
                None => draw_fallback_segment(ctx, px, py, cw, ch, 0.38),
            }
        }
    }

    if let Some(thinking) = state.show_thinking {
        if let Some(&(hx, hy)) = state.snake.first() {
            let size = cw * 0.8;
            let ix = (hx as f64 * cw + cw * 0.7).clamp(0.0, width - size);
            let iy = (hy as f64 * ch - ch * 0.5).clamp(0.0, height - size);
            let key = if thinking {
                SnakeSprite::Thinking
            } else {
                SnakeSprite::Idea
            };
            match sprite(sprites, use_sprites, key) {
                Some(img) => {
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, ix, iy, size, size);
                }
                None => {
                    let (fill, glyph) = if thinking {
                        ("#e5e7eb", "…")
                    } else {
                        ("#ffd700", "!")
                    };
                    ctx.set_fill_style_str(fill);
                    ctx.begin_path();
                    ctx.arc(
                        ix + size / 2.0,
                        iy + size / 2.0,
                        size * 0.4,
                        0.0,
                        std::f64::consts::PI * 2.0,
                    )
                    .ok();
                    ctx.fill();
                    ctx.set_fill_style_str("#111827");
                    ctx.set_font("bold 12px sans-serif");
                    ctx.set_text_align("center");
                    ctx.set_text_baseline("middle");
                    ctx.fill_text(glyph, ix + size / 2.0, iy + size / 2.0).ok();
                    ctx.set_text_align("start");
                    ctx.set_text_baseline("alphabetic");
                }
            }
        }
    }

    if state.terminal {
        ctx.set_fill_style_str("rgba(0,0,0,0.5)");
        ctx.fill_rect(0.0, 0.0, width, height);
        let (text, color) = if state.game_turn < 100 {
            (
                format!("GAME OVER! REWARD {}", format_score(state.reward)),
                "#ff0000",
            )
        } else {
            (format!("REWARD {}", format_score(state.reward)), "#00ff00")
        };
        ctx.set_fill_style_str(color);
        ctx.set_font("bold 24px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(&text, width / 2.0, height / 2.0).ok();
        ctx.set_text_align("start");
        ctx.set_text_baseline("alphabetic");
    }
}

fn draw_life_bar(ctx: &CanvasRenderingContext2d, cw: f64, px: f64, py: f64, ratio: f64) {
    let bar_w = cw - 4.0;
    let bar_h = 6.0;
    let bx = px + 2.0;
    let by = py + 2.0;
    ctx.set_fill_style_str("#640000");
    ctx.fill_rect(bx, by, bar_w, bar_h);
    let ratio = ratio.clamp(0.0, 1.0);
    if ratio > 0.0 {
        let fill = if ratio > 0.6 {
            "#00ff00"
        } else if ratio > 0.3 {
            "#ffff00"
        } else {
            "#ff0000"
        };
        ctx.set_fill_style_str(fill);
        ctx.fill_rect(bx, by, bar_w * ratio, bar_h);
    }
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(bx, by, bar_w, bar_h);
}

/// Primitive head: filled circle with two eye dots shifted toward the
/// heading, so direction stays readable without any art.
fn draw_fallback_head(ctx: &CanvasRenderingContext2d, px: f64, py: f64, cw: f64, ch: f64, dir: Dir) {
    let cx = px + cw / 2.0;
    let cy = py + ch / 2.0;
    ctx.set_fill_style_str("#15803d");
    ctx.begin_path();
    ctx.arc(cx, cy, cw.min(ch) * 0.44, 0.0, std::f64::consts::PI * 2.0)
        .ok();
    ctx.fill();
    let (dx, dy) = dir.delta();
    let fx = cx + dx as f64 * cw * 0.18;
    let fy = cy + dy as f64 * ch * 0.18;
    ctx.set_fill_style_str("#ffffff");
    for side in [-1.0, 1.0] {
        let ex = fx + (-dy) as f64 * side * cw * 0.14;
        let ey = fy + dx as f64 * side * ch * 0.14;
        ctx.begin_path();
        ctx.arc(ex, ey, cw * 0.07, 0.0, std::f64::consts::PI * 2.0).ok();
        ctx.fill();
    }
}

fn draw_fallback_segment(
    ctx: &CanvasRenderingContext2d,
    px: f64,
    py: f64,
    cw: f64,
    ch: f64,
    radius: f64,
) {
    ctx.set_fill_style_str("#16a34a");
    ctx.begin_path();
    ctx.arc(
        px + cw / 2.0,
        py + ch / 2.0,
        cw.min(ch) * radius,
        0.0,
        std::f64::consts::PI * 2.0,
    )
    .ok();
    ctx.fill();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_neighbours_pick_the_vertical_straight() {
        // head (2,2), body (2,3), tail (2,4): shared x column
        assert_eq!(body_sprite((2, 2), (2, 3), (2, 4)), SnakeSprite::StraightV);
    }

    #[test]
    fn horizontal_neighbours_pick_the_horizontal_straight() {
        assert_eq!(body_sprite((1, 5), (2, 5), (3, 5)), SnakeSprite::StraightH);
    }

    #[test]
    fn turn_lookup_names_the_joined_sides() {
        // neighbours above and to the left
        assert_eq!(
            body_sprite((2, 1), (2, 2), (1, 2)),
            SnakeSprite::Turn(TurnKind::UpLeft)
        );
        // above and to the right
        assert_eq!(
            body_sprite((2, 1), (2, 2), (3, 2)),
            SnakeSprite::Turn(TurnKind::UpRight)
        );
        // below and to the right
        assert_eq!(
            body_sprite((2, 3), (2, 2), (3, 2)),
            SnakeSprite::Turn(TurnKind::DownRight)
        );
        // below and to the left
        assert_eq!(
            body_sprite((2, 3), (2, 2), (1, 2)),
            SnakeSprite::Turn(TurnKind::DownLeft)
        );
    }

    #[test]
    fn turn_lookup_is_order_independent() {
        let cells = [(2, 1), (1, 2), (3, 2), (2, 3)];
        for a in cells {
            for b in cells {
                if a == b {
                    continue;
                }
                assert_eq!(
                    body_sprite(a, (2, 2), b),
                    body_sprite(b, (2, 2), a),
                    "asymmetric selection for {a:?}/{b:?}"
                );
            }
        }
    }

    #[test]
    fn tail_points_away_from_its_neighbour() {
        // tail (2,4) sits below its neighbour (2,3)
        assert_eq!(tail_sprite((2, 3), (2, 4)), SnakeSprite::Tail(Dir::Down));
        assert_eq!(tail_sprite((2, 3), (2, 2)), SnakeSprite::Tail(Dir::Up));
        assert_eq!(tail_sprite((2, 3), (1, 3)), SnakeSprite::Tail(Dir::Left));
        assert_eq!(tail_sprite((2, 3), (3, 3)), SnakeSprite::Tail(Dir::Right));
    }

    #[test]
    fn single_cell_snakes_use_the_standalone_icon() {
        assert_eq!(head_sprite(1, Dir::Up), SnakeSprite::Icon(Dir::Up));
        assert_eq!(head_sprite(4, Dir::Up), SnakeSprite::Head(Dir::Up));
    }
}
