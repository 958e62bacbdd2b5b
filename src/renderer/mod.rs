//! Canvas 2D renderer
//!
//! Draws one frame back-to-front: background, track, coins, obstacles,
//! player shadow, player, particles, HUD text. The only simulation state
//! this touches is the cosmetic coin spin.

use web_sys::CanvasRenderingContext2d;

use crate::consts::*;
use crate::lane_x;
use crate::sim::{CoinState, GameState};

/// Height of the track band along the bottom edge
const TRACK_HEIGHT: f64 = 240.0;

/// Per-frame cosmetic spin increment for idle coins
const COIN_SPIN_RATE: f32 = 0.12;

pub fn render(state: &mut GameState, ctx: &CanvasRenderingContext2d) {
    let w = state.width as f64;
    let h = state.height as f64;

    ctx.clear_rect(0.0, 0.0, w, h);
    draw_background(ctx, w, h);
    draw_track(ctx, state, w, h);
    draw_coins(ctx, state);
    draw_obstacles(ctx, state);
    draw_player(ctx, state);
    draw_particles(ctx, state);
    draw_hud(ctx, state);
}

/// One-shot prompt shown before the first run
pub fn render_idle(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    ctx.clear_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str("#071226");
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_fill_style_str("#d7e6ff");
    ctx.set_font("22px Inter, Arial");
    ctx.set_text_align("left");
    let _ = ctx.fill_text("Press Start to play", 36.0, 80.0);
}

fn draw_background(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
    let _ = gradient.add_color_stop(0.0, "#0b1220");
    let _ = gradient.add_color_stop(1.0, "#061021");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_track(ctx: &CanvasRenderingContext2d, state: &GameState, w: f64, h: f64) {
    let track_y = h - TRACK_HEIGHT;
    ctx.set_fill_style_str("#071926");
    ctx.fill_rect(0.0, track_y, w, TRACK_HEIGHT);

    // Faint lane guides
    ctx.set_fill_style_str("rgba(255,255,255,0.02)");
    for lane in 0..=MAX_LANE {
        let x = lane_x(lane, state.width) as f64;
        ctx.fill_rect(x - 4.0, track_y, 8.0, TRACK_HEIGHT);
    }
}

fn draw_coins(ctx: &CanvasRenderingContext2d, state: &mut GameState) {
    for coin in &mut state.coins {
        let size = coin.size as f64;
        ctx.save();
        let _ = ctx.translate(coin.pos.x as f64, coin.pos.y as f64);
        match coin.state {
            CoinState::Idle => {
                coin.rot += COIN_SPIN_RATE;
                let _ = ctx.rotate(coin.rot as f64);
                // Squash on one axis to fake a spinning disc
                let squash = 1.0 + 0.06 * (coin.rot * 2.0).sin();
                let _ = ctx.scale(squash as f64, 1.0);
                ctx.set_fill_style_str(COIN_PARTICLE_COLOR);
                ctx.begin_path();
                let _ = ctx.arc(0.0, 0.0, size, 0.0, std::f64::consts::TAU);
                ctx.fill();
                // Specular glint
                ctx.set_fill_style_str("rgba(255,255,255,0.45)");
                ctx.begin_path();
                let _ = ctx.ellipse(
                    -size * 0.18,
                    -size * 0.18,
                    size * 0.42,
                    size * 0.26,
                    0.0,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            CoinState::Collected { .. } => {
                let progress = coin.collect_progress() as f64;
                let scale = 1.0 + progress * 1.2;
                ctx.set_global_alpha(1.0 - progress);
                let _ = ctx.scale(scale, scale);
                ctx.set_fill_style_str(COIN_PARTICLE_COLOR);
                ctx.begin_path();
                let _ = ctx.arc(0.0, 0.0, size, 0.0, std::f64::consts::TAU);
                ctx.fill();
                ctx.set_global_alpha(1.0);
            }
        }
        ctx.restore();
    }
}

fn draw_obstacles(ctx: &CanvasRenderingContext2d, state: &GameState) {
    for o in &state.obstacles {
        let half = (o.size / 2.0) as f64;
        let x = o.pos.x as f64 - half;
        let y = o.pos.y as f64 - half;
        ctx.set_fill_style_str("#9c3040");
        ctx.fill_rect(x, y, o.size as f64, o.size as f64);
        // Darker inset face
        ctx.set_fill_style_str("#6e1f2d");
        ctx.fill_rect(x + 8.0, y + 8.0, o.size as f64 - 16.0, o.size as f64 - 16.0);
    }
}

fn draw_player(ctx: &CanvasRenderingContext2d, state: &GameState) {
    let x = state.player.x as f64;
    let y = state.player.y as f64;

    // Ground shadow
    ctx.save();
    ctx.set_fill_style_str("rgba(0,0,0,0.25)");
    ctx.begin_path();
    let _ = ctx.ellipse(x, y + 40.0, 40.0, 12.0, 0.0, 0.0, std::f64::consts::TAU);
    ctx.fill();
    ctx.restore();

    // Body and head fill the 110px sprite box above the baseline
    let w = PLAYER_DRAW_W as f64;
    ctx.set_fill_style_str("#2f6fab");
    ctx.fill_rect(x - w * 0.25, y - 70.0, w * 0.5, 70.0);
    ctx.set_fill_style_str("#f0b27a");
    ctx.begin_path();
    let _ = ctx.arc(x, y - 86.0, 24.0, 0.0, std::f64::consts::TAU);
    ctx.fill();
    // Headband
    ctx.set_fill_style_str("#1d3f63");
    ctx.fill_rect(x - 26.0, y - 96.0, 52.0, 8.0);
}

fn draw_particles(ctx: &CanvasRenderingContext2d, state: &GameState) {
    for p in &state.particles {
        let alpha = (1.0 - p.t / p.life).max(0.0) as f64;
        ctx.set_global_alpha(alpha);
        ctx.set_fill_style_str(p.color);
        ctx.begin_path();
        let _ = ctx.arc(
            p.pos.x as f64,
            p.pos.y as f64,
            p.size as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
}

fn draw_hud(ctx: &CanvasRenderingContext2d, state: &GameState) {
    ctx.set_fill_style_str("#fff");
    ctx.set_font("20px Arial");
    ctx.set_text_align("left");
    let _ = ctx.fill_text(&format!("Score: {}", state.score), 20.0, 30.0);
}
