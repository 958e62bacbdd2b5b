//! Per-frame simulation step
//!
//! Advances the whole world by one elapsed-time slice: spawning, scrolling,
//! lifecycles, player physics, collision, scoring. Pure with respect to the
//! platform; anything the shell must react to comes back as a `GameEvent`.

use glam::vec2;
use rand::Rng;

use super::spawn::{spawn_coin_pattern, spawn_obstacle, spawn_particles};
use super::state::{CoinState, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Advance the simulation by `dt` seconds (clamped to [`MAX_STEP_DT`]).
///
/// Returns the events produced this frame. An obstacle hit ends the frame
/// early: at most one game-over transition per call, no matter how many
/// obstacles overlap the player.
pub fn step(state: &mut GameState, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    // Clamp dt so a stalled tab cannot tunnel entities through the hitbox
    let dt = dt.min(MAX_STEP_DT);

    // Spawn opportunities fire once the timer passes the interval; the
    // overshoot is discarded, not carried into the next period.
    state.spawn_timer += dt;
    if state.spawn_timer > SPAWN_INTERVAL {
        state.spawn_timer = 0.0;
        if state.rng.random::<f32>() < OBSTACLE_CHANCE {
            spawn_obstacle(state);
        }
        if state.rng.random::<f32>() < COIN_CHANCE {
            spawn_coin_pattern(state);
        }
    }

    // Scroll obstacles and idle coins; cull everything past the bottom margin
    let dy = state.speed * dt;
    let despawn_y = state.height + DESPAWN_MARGIN;

    for o in &mut state.obstacles {
        o.pos.y += dy;
    }
    state.obstacles.retain(|o| o.pos.y <= despawn_y);

    for c in &mut state.coins {
        match c.state {
            CoinState::Idle => c.pos.y += dy,
            CoinState::Collected { ref mut t } => *t += dt,
        }
    }
    state.coins.retain(|c| match c.state {
        CoinState::Idle => c.pos.y <= despawn_y,
        CoinState::Collected { t } => t <= COIN_REMOVE_AFTER,
    });

    // Particles: age, fall, expire
    for p in &mut state.particles {
        p.t += dt;
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.pos += p.vel * dt;
    }
    state.particles.retain(|p| p.t <= p.life);

    // Player vertical physics with a hard ground clamp
    let ground = state.ground_y();
    let player = &mut state.player;
    player.vy += GRAVITY * dt;
    player.y += player.vy * dt;
    if player.y >= ground {
        player.y = ground;
        player.vy = 0.0;
        player.grounded = true;
    }

    // Ease toward the lane center; the gain is dt-scaled so convergence is
    // frame-rate independent up to the dt cap.
    player.x += (player.target_x - player.x) * (LANE_LERP_RATE * dt).min(1.0);

    let hitbox = state.player.hitbox();

    // Obstacle hit ends the run immediately; the rest of the frame is skipped
    if state.obstacles.iter().any(|o| hitbox.overlaps(&o.aabb())) {
        let burst = vec2(state.player.x, state.player.y - 40.0);
        spawn_particles(state, burst, CRASH_PARTICLE_COLOR, CRASH_PARTICLE_COUNT);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::Crashed);
        return events;
    }

    // Coin pickup: idle coins inside the pickup box flip to collected
    let picked: Vec<usize> = state
        .coins
        .iter()
        .enumerate()
        .filter(|(_, c)| c.state == CoinState::Idle && hitbox.overlaps(&c.pickup_box()))
        .map(|(i, _)| i)
        .collect();
    for i in picked {
        let pos = state.coins[i].pos;
        state.coins[i].state = CoinState::Collected { t: 0.0 };
        state.score += COIN_SCORE;
        spawn_particles(state, pos, COIN_PARTICLE_COLOR, COIN_PARTICLE_COUNT);
        events.push(GameEvent::CoinCollected);
    }

    // Distance accrual. The floor keeps this at zero for typical frame
    // times at the base speed; coins carry the scoring.
    state.score += (state.speed / 200.0 * dt * 10.0).max(0.0).floor() as u32;

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_x;
    use crate::sim::state::{Coin, Obstacle};
    use glam::vec2;

    const DT: f32 = 1.0 / 60.0;

    fn running_state() -> GameState {
        let mut state = GameState::new(42, 1000.0, 800.0);
        state.start();
        state
    }

    fn obstacle_at(pos: glam::Vec2) -> Obstacle {
        Obstacle {
            lane: 1,
            pos,
            size: OBSTACLE_SIZE,
        }
    }

    fn idle_coin_at(pos: glam::Vec2) -> Coin {
        Coin {
            lane: 1,
            pos,
            size: COIN_SIZE,
            rot: 0.0,
            state: CoinState::Idle,
        }
    }

    #[test]
    fn step_is_inert_unless_running() {
        let mut state = GameState::new(42, 1000.0, 800.0);
        assert!(step(&mut state, DT).is_empty());
        assert_eq!(state.spawn_timer, 0.0);

        state.phase = GamePhase::Paused;
        state.player.vy = -100.0;
        let y = state.player.y;
        step(&mut state, DT);
        assert_eq!(state.player.y, y);
    }

    #[test]
    fn dt_is_capped_per_call() {
        let mut state = running_state();
        state.obstacles.push(obstacle_at(vec2(0.0, 0.0)));
        step(&mut state, 10.0);
        // The tracked obstacle moved one capped step, not ten seconds
        let moved = state.obstacles[0].pos.y;
        assert!((moved - RUN_SPEED * MAX_STEP_DT).abs() < 1e-3);
    }

    #[test]
    fn jump_arc_returns_to_the_ground_line() {
        let mut state = running_state();
        let ground = state.ground_y();
        assert!(state.jump());

        let mut steps = 0;
        while !state.player.grounded {
            step(&mut state, DT);
            // Keep falling obstacles clear of the player while airborne
            state.obstacles.clear();
            steps += 1;
            assert!(steps < 1000, "player never landed");
        }
        assert_eq!(state.player.y, ground);
        assert_eq!(state.player.vy, 0.0);
        // -700 up against 1800 gravity is roughly 0.78s of air time
        assert!(steps > 30);
    }

    #[test]
    fn lateral_motion_converges_on_the_target_lane() {
        let mut state = running_state();
        state.move_lane(1);
        for _ in 0..120 {
            step(&mut state, DT);
            state.obstacles.clear();
        }
        assert!((state.player.x - lane_x(2, 1000.0)).abs() < 1.0);
    }

    #[test]
    fn obstacles_despawn_past_the_bottom_margin() {
        let mut state = running_state();
        state
            .obstacles
            .push(obstacle_at(vec2(lane_x(0, 1000.0), 800.0 + DESPAWN_MARGIN)));
        step(&mut state, DT);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn idle_coin_removed_offscreen_without_scoring() {
        let mut state = running_state();
        state
            .coins
            .push(idle_coin_at(vec2(lane_x(0, 1000.0), 800.0 + DESPAWN_MARGIN + 1.0)));
        let events = step(&mut state, DT);
        assert!(state.coins.is_empty());
        assert!(events.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn coin_pickup_scores_once_and_starts_the_collect_animation() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.coins.push(idle_coin_at(hb.center));

        let events = step(&mut state, DT);
        assert_eq!(events, vec![GameEvent::CoinCollected]);
        assert_eq!(state.score, COIN_SCORE);
        assert!(matches!(state.coins[0].state, CoinState::Collected { .. }));
        assert_eq!(state.particles.len(), COIN_PARTICLE_COUNT);

        // Already collected: no double pickup on the next frame
        let events = step(&mut state, DT);
        assert!(events.is_empty());
        assert_eq!(state.score, COIN_SCORE);
    }

    #[test]
    fn collected_coin_expires_after_its_animation() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.coins.push(idle_coin_at(hb.center));
        step(&mut state, DT);

        let mut elapsed = 0.0;
        while !state.coins.is_empty() {
            step(&mut state, DT);
            elapsed += DT;
            assert!(elapsed < 1.0, "collected coin never expired");
        }
        // Gone right after the removal cutoff, and it never scrolled again
        assert!(elapsed >= COIN_COLLECT_DURATION);
    }

    #[test]
    fn collect_progress_tracks_the_animation_clock() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.coins.push(idle_coin_at(hb.center));
        step(&mut state, DT);
        for _ in 0..6 {
            step(&mut state, DT);
        }
        let p = state.coins[0].collect_progress();
        assert!(p > 0.0 && p <= 1.0);
    }

    #[test]
    fn overlapping_obstacle_ends_the_run() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.obstacles.push(obstacle_at(hb.center));

        let events = step(&mut state, DT);
        assert_eq!(events, vec![GameEvent::Crashed]);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.particles.len(), CRASH_PARTICLE_COUNT);
    }

    #[test]
    fn simultaneous_hits_produce_a_single_game_over() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.obstacles.push(obstacle_at(hb.center));
        state.obstacles.push(obstacle_at(hb.center + vec2(5.0, 0.0)));

        let events = step(&mut state, DT);
        assert_eq!(events, vec![GameEvent::Crashed]);

        // Terminal: further steps do nothing
        let events = step(&mut state, DT);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn crash_skips_the_rest_of_the_frame() {
        let mut state = running_state();
        let hb = state.player.hitbox();
        state.obstacles.push(obstacle_at(hb.center));
        // A coin in reach must not be collected on the crash frame
        state.coins.push(idle_coin_at(hb.center));

        let events = step(&mut state, DT);
        assert_eq!(events, vec![GameEvent::Crashed]);
        assert_eq!(state.coins[0].state, CoinState::Idle);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn passive_accrual_floors_to_zero_at_base_speed() {
        // speed/200 * dt * 10 = 0.495 at the dt cap, so the floor eats it
        let mut state = running_state();
        for _ in 0..120 {
            step(&mut state, DT);
            state.obstacles.clear();
            state.coins.clear();
        }
        assert_eq!(state.score, 0);

        step(&mut state, MAX_STEP_DT);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn spawn_timer_resets_and_discards_overshoot() {
        let mut state = running_state();
        state.spawn_timer = SPAWN_INTERVAL;
        step(&mut state, 0.02);
        assert_eq!(state.spawn_timer, 0.0);

        // Below the interval nothing fires and the timer keeps the elapsed time
        step(&mut state, 0.02);
        assert!((state.spawn_timer - 0.02).abs() < 1e-6);
    }

    #[test]
    fn a_long_run_spawns_both_entity_kinds() {
        let mut state = running_state();
        let mut saw_obstacle = false;
        let mut saw_coin = false;
        for _ in 0..3600 {
            step(&mut state, DT);
            saw_obstacle |= !state.obstacles.is_empty();
            saw_coin |= !state.coins.is_empty();
            // Cull before anything reaches the player so the run never ends
            state.obstacles.retain(|o| o.pos.y < 300.0);
            state.coins.retain(|c| c.pos.y < 300.0);
        }
        assert!(saw_obstacle);
        assert!(saw_coin);
    }

    #[test]
    fn particles_age_out() {
        let mut state = running_state();
        spawn_particles(&mut state, vec2(100.0, 100.0), COIN_PARTICLE_COLOR, 10);
        for _ in 0..70 {
            step(&mut state, DT);
            state.obstacles.clear();
            state.coins.clear();
        }
        // Max lifetime is just under 0.9s
        assert!(state.particles.is_empty());
    }
}
