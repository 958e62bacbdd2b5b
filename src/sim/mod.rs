//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - dt clamped to a fixed upper bound
//! - No rendering, storage, or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod step;

pub use collision::Aabb;
pub use spawn::{spawn_coin_cluster, spawn_coin_pattern, spawn_obstacle, spawn_particles};
pub use state::{Coin, CoinState, GameEvent, GamePhase, GameState, Obstacle, Particle, Player};
pub use step::step;
