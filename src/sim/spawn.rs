//! Entity spawning: obstacles, coin clusters, particle bursts
//!
//! All placement randomness comes from the state-owned RNG so runs are
//! reproducible from their seed.

use glam::{Vec2, vec2};
use rand::Rng;

use super::state::{Coin, CoinState, GameState, Obstacle, Particle};
use crate::consts::*;
use crate::lane_x;

/// Drop an obstacle into a random lane just above the top edge
pub fn spawn_obstacle(state: &mut GameState) {
    let lane = state.rng.random_range(0..=MAX_LANE);
    state.obstacles.push(Obstacle {
        lane,
        pos: vec2(lane_x(lane, state.width), -OBSTACLE_SIZE - 10.0),
        size: OBSTACLE_SIZE,
    });
}

/// Roll a cluster size and base lane, then place the coins
pub fn spawn_coin_pattern(state: &mut GameState) {
    let count = state.rng.random_range(1..=4);
    let base_lane = state.rng.random_range(0..=MAX_LANE);
    spawn_coin_cluster(state, count, base_lane);
}

/// Place `count` coins fanned around `base_lane` and stacked above the
/// screen. Lane offsets are the coin's index minus half the cluster size,
/// clamped to the track.
pub fn spawn_coin_cluster(state: &mut GameState, count: usize, base_lane: usize) {
    for i in 0..count {
        let offset = i as i32 - (count / 2) as i32;
        let lane = (base_lane as i32 + offset).clamp(0, MAX_LANE as i32) as usize;
        state.coins.push(Coin {
            lane,
            pos: vec2(lane_x(lane, state.width), -40.0 - i as f32 * 30.0),
            size: COIN_SIZE,
            rot: 0.0,
            state: CoinState::Idle,
        });
    }
}

/// Burst of particles fountaining up and out from a point
pub fn spawn_particles(state: &mut GameState, pos: Vec2, color: &'static str, count: usize) {
    for _ in 0..count {
        let vel = vec2(
            state.rng.random_range(-220.0..220.0),
            state.rng.random_range(-420.0..-80.0),
        );
        state.particles.push(Particle {
            pos,
            vel,
            t: 0.0,
            life: state.rng.random_range(0.5..0.9),
            size: state.rng.random_range(2.0..5.0),
            color,
        });
    }
}
