// Freeway pipeline: grass/road tiles, lane traffic, the crossing target,
// the chicken, overlays, turn counter, terminal banner.

use web_sys::CanvasRenderingContext2d;

use super::sprite;
use crate::model::{FREEWAY_COLS, FREEWAY_PLAYER_COL, FREEWAY_ROWS, FreewayState};
use crate::sprites::{FreewayCache, FreewaySprite};

/// Horizontal span of a car in grid cells: `(leftmost column, cell count)`.
/// The recorded x is the head cell, so rightward cars extend back to the
/// left while leftward cars extend to the right.
pub(crate) fn car_span(x: f64, speed: f64, length: u32) -> (f64, u32) {
    if speed > 0.0 {
        (x - length as f64 + 1.0, length)
    } else {
        (x, length)
    }
}

fn car_color(length: u32) -> &'static str {
    match length {
        1 => "#f85149",
        2 => "#58a6ff",
        3 => "#ffd700",
        _ => "#2ea043",
    }
}

pub(super) fn draw(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    state: &FreewayState,
    sprites: &FreewayCache,
) {
    let cw = width / FREEWAY_COLS as f64;
    let ch = height / FREEWAY_ROWS as f64;
    let use_sprites = sprites.loaded();

    ctx.clear_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str("#ffffff");
    ctx.fill_rect(0.0, 0.0, width, height);

    // Background: grass strips top and bottom, road lanes between, the
    // crossing column highlighted.
    for row in 0..FREEWAY_ROWS {
        for col in 0..FREEWAY_COLS {
            let px = col as f64 * cw;
            let py = row as f64 * ch;
            let key = if row == 0 || row == FREEWAY_ROWS - 1 {
                FreewaySprite::Grass
            } else if col == FREEWAY_PLAYER_COL {
                FreewaySprite::Yellow
            } else {
                FreewaySprite::Grey
            };
            match sprite(sprites, use_sprites, key) {
                Some(img) => {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, cw, ch);
                }
                None => {
                    let fill = match key {
                        FreewaySprite::Grass => "#3a7d44",
                        FreewaySprite::Yellow => "#ca8a04",
                        _ => "#4b5563",
                    };
                    ctx.set_fill_style_str(fill);
                    ctx.fill_rect(px, py, cw, ch);
                }
            }
            if row > 0 && row < FREEWAY_ROWS - 1 && col < FREEWAY_COLS - 1 {
                let line_x = (col + 1) as f64 * cw - 0.5;
                ctx.set_stroke_style_str("#ffffff");
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(line_x, py);
                ctx.line_to(line_x, py + ch);
                ctx.stroke();
            }
        }
    }

    for car in &state.cars {
        let (Some(x), Some(speed)) = (car.x(), car.speed()) else {
            continue;
        };
        let length = car.length();
        let (origin, cells) = car_span(x, speed, length);
        let px = origin * cw;
        let py = car.row() as f64 * ch;
        let pw = cells as f64 * cw;
        if px + pw <= 0.0 || px >= width {
            continue;
        }
        let heading_right = speed > 0.0;
        match sprite(sprites, use_sprites, FreewaySprite::for_car_length(length)) {
            Some(img) => {
                if heading_right {
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, px, py, pw, ch);
                } else {
                    // car art faces right; mirror for leftward traffic
                    ctx.save();
                    let _ = ctx.translate(px + pw, py);
                    let _ = ctx.scale(-1.0, 1.0);
                    let _ =
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, pw, ch);
                    ctx.restore();
                }
            }
            None => {
                let inset = ch * 0.18;
                ctx.set_fill_style_str(car_color(length));
                ctx.fill_rect(px + 2.0, py + inset, pw - 4.0, ch - 2.0 * inset);
                // arrowhead so the travel direction survives without art
                ctx.set_fill_style_str("#e5e7eb");
                ctx.begin_path();
                if heading_right {
                    let tip = px + pw - 4.0;
                    ctx.move_to(tip - cw * 0.35, py + inset + 2.0);
                    ctx.line_to(tip - cw * 0.35, py + ch - inset - 2.0);
                    ctx.line_to(tip, py + ch / 2.0);
                } else {
                    let tip = px + 4.0;
                    ctx.move_to(tip + cw * 0.35, py + inset + 2.0);
                    ctx.line_to(tip + cw * 0.35, py + ch - inset - 2.0);
                    ctx.line_to(tip, py + ch / 2.0);
                }
                ctx.close_path();
                ctx.fill();
            }
        }
    }

    // Target marker at the top of the crossing column.
    let target_x = FREEWAY_PLAYER_COL as f64 * cw;
    match sprite(sprites, use_sprites, FreewaySprite::Target) {
        Some(img) => {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                target_x + cw * 0.025,
                ch * 0.025,
                cw * 0.95,
                ch * 0.95,
            );
        }
        None => {
            ctx.set_fill_style_str("#dc2626");
            ctx.begin_path();
            ctx.arc(
                target_x + cw / 2.0,
                ch / 2.0,
                cw.min(ch) * 0.28,
                0.0,
                std::f64::consts::PI * 2.0,
            )
            .ok();
            ctx.fill();
            ctx.set_fill_style_str("#ffffff");
            ctx.begin_path();
            ctx.arc(
                target_x + cw / 2.0,
                ch / 2.0,
                cw.min(ch) * 0.10,
                0.0,
                std::f64::consts::PI * 2.0,
            )
            .ok();
            ctx.fill();
        }
    }

    // The chicken, fixed to the crossing column.
    let player_x = FREEWAY_PLAYER_COL as f64 * cw;
    let player_y = state.pos as f64 * ch;
    match sprite(sprites, use_sprites, FreewaySprite::Chicken) {
        Some(img) => {
            let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                player_x + cw * 0.025,
                player_y + ch * 0.025,
                cw * 0.95,
                ch * 0.95,
            );
        }
        None => {
            let cx = player_x + cw / 2.0;
            let cy = player_y + ch / 2.0;
            ctx.set_fill_style_str("#fde68a");
            ctx.begin_path();
            ctx.arc(cx, cy, cw.min(ch) * 0.34, 0.0, std::f64::consts::PI * 2.0)
                .ok();
            ctx.fill();
            // beak up the crossing direction, eye dot beside it
            ctx.set_fill_style_str("#f59e0b");
            ctx.begin_path();
            ctx.move_to(cx - cw * 0.10, cy - ch * 0.22);
            ctx.line_to(cx + cw * 0.10, cy - ch * 0.22);
            ctx.line_to(cx, cy - ch * 0.42);
            ctx.close_path();
            ctx.fill();
            ctx.set_fill_style_str("#111827");
            ctx.begin_path();
            ctx.arc(
                cx + cw * 0.10,
                cy - ch * 0.08,
                cw * 0.05,
                0.0,
                std::f64::consts::PI * 2.0,
            )
            .ok();
            ctx.fill();
        }
    }

    if state.show_hit {
        match sprite(sprites, use_sprites, FreewaySprite::Hit) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img, player_x, player_y, cw, ch,
                );
            }
            None => {
                ctx.set_stroke_style_str("#ef4444");
                ctx.set_line_width(3.0);
                ctx.begin_path();
                ctx.move_to(player_x + 4.0, player_y + 4.0);
                ctx.line_to(player_x + cw - 4.0, player_y + ch - 4.0);
                ctx.move_to(player_x + cw - 4.0, player_y + 4.0);
                ctx.line_to(player_x + 4.0, player_y + ch - 4.0);
                ctx.stroke();
            }
        }
    }

    if let Some(thinking) = state.show_thinking {
        let size = cw * 1.2;
        let ix = player_x + cw * 0.7;
        let iy = player_y - ch * 0.5;
        let key = if thinking {
            FreewaySprite::Thinking
        } else {
            FreewaySprite::Idea
        };
        match sprite(sprites, use_sprites, key) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, ix, iy, size, size);
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
                    size * 0.35,
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

    // Turn counter, boxed top-left.
    let label = format!("Turn: {}", state.game_turn);
    let bx = cw * 0.25;
    let by = ch * 0.25;
    ctx.set_font("bold 14px sans-serif");
    ctx.set_fill_style_str("#000000");
    ctx.fill_rect(bx - 5.0, by - 4.0, label.len() as f64 * 8.0 + 10.0, 24.0);
    ctx.set_fill_style_str("#ffffff");
    ctx.set_text_baseline("top");
    ctx.fill_text(&label, bx, by).ok();
    ctx.set_text_baseline("alphabetic");

    if state.terminal {
        ctx.set_fill_style_str("rgba(0,0,0,0.5)");
        ctx.fill_rect(0.0, 0.0, width, height);
        let (text, color) = if state.game_turn < 100 {
            (format!("SUCCESS in {} turns!", state.game_turn), "#00ff00")
        } else {
            ("GAME OVER".to_string(), "#ff0000")
        };
        ctx.set_fill_style_str(color);
        ctx.set_font("bold 28px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(&text, width / 2.0, height / 2.0).ok();
        ctx.set_text_align("start");
        ctx.set_text_baseline("alphabetic");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rightward_cars_anchor_on_the_head_cell() {
        // head at column 5, two cells long: occupies columns 4..=5
        assert_eq!(car_span(5.0, 1.0, 2), (4.0, 2));
        assert_eq!(car_span(0.0, 2.5, 4), (-3.0, 4));
    }

    #[test]
    fn leftward_cars_extend_to_the_right() {
        assert_eq!(car_span(5.0, -1.0, 3), (5.0, 3));
    }

    #[test]
    fn single_cell_cars_sit_on_their_head() {
        assert_eq!(car_span(2.0, 1.0, 1), (2.0, 1));
        assert_eq!(car_span(2.0, -1.0, 1), (2.0, 1));
    }
}
