//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;
use crate::lane_x;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Idle screen before the first run
    Ready,
    /// Active gameplay
    Running,
    /// Frozen mid-run; rendering continues
    Paused,
    /// Run ended on an obstacle hit
    GameOver,
}

/// Something the step function wants the shell to react to
/// (sound, leaderboard, overlay). Keeps the sim free of platform calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinCollected,
    Crashed,
}

/// The player sprite
///
/// `y` is the feet baseline; the sprite is drawn above it and the hitbox
/// hangs just over it.
#[derive(Debug, Clone)]
pub struct Player {
    /// Current lane index (0..=2)
    pub lane: usize,
    /// Continuous x position, converging toward `target_x`
    pub x: f32,
    /// Feet baseline, clamped to the ground line
    pub y: f32,
    /// Lane center the player is easing toward
    pub target_x: f32,
    /// Vertical velocity (down positive)
    pub vy: f32,
    pub grounded: bool,
}

impl Player {
    fn new(width: f32, height: f32) -> Self {
        let x = lane_x(1, width);
        Self {
            lane: 1,
            x,
            y: height - GROUND_OFFSET,
            target_x: x,
            vy: 0.0,
            grounded: true,
        }
    }

    /// Collision rectangle: smaller than the sprite, offset to sit near the
    /// feet so only real overlaps end the run.
    pub fn hitbox(&self) -> Aabb {
        let center = Vec2::new(
            self.x,
            self.y - PLAYER_HITBOX_OFFSET_Y - PLAYER_HITBOX_H / 2.0,
        );
        Aabb::new(center, Vec2::new(PLAYER_HITBOX_W, PLAYER_HITBOX_H))
    }
}

/// A falling obstacle; no behavior beyond constant descent
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub lane: usize,
    pub pos: Vec2,
    pub size: f32,
}

impl Obstacle {
    pub fn aabb(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// Coin lifecycle: idle coins fall and can be picked up; collected coins
/// freeze in place and play a fixed-length shrink/fade before removal.
/// There is no way back from `Collected`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoinState {
    Idle,
    Collected { t: f32 },
}

#[derive(Debug, Clone)]
pub struct Coin {
    pub lane: usize,
    pub pos: Vec2,
    pub size: f32,
    /// Cosmetic spin, advanced by the renderer
    pub rot: f32,
    pub state: CoinState,
}

impl Coin {
    /// Pickup uses a generous square twice the coin radius on a side
    pub fn pickup_box(&self) -> Aabb {
        Aabb::square(self.pos, self.size * 2.0)
    }

    /// Collect animation progress in [0, 1]
    pub fn collect_progress(&self) -> f32 {
        match self.state {
            CoinState::Idle => 0.0,
            CoinState::Collected { t } => (t / COIN_COLLECT_DURATION).min(1.0),
        }
    }
}

/// A cosmetic particle spawned on pickups and crashes
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Age in seconds
    pub t: f32,
    /// Assigned lifetime in seconds
    pub life: f32,
    pub size: f32,
    pub color: &'static str,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u32,
    /// Scroll speed, pixels/s (constant; there is no difficulty curve)
    pub speed: f32,
    /// Accumulates toward the spawn interval
    pub spawn_timer: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub particles: Vec<Particle>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a fresh state sized to the canvas, with a seeded RNG
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            phase: GamePhase::Ready,
            score: 0,
            speed: RUN_SPEED,
            spawn_timer: 0.0,
            player: Player::new(width, height),
            obstacles: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Vertical position of the ground line the player stands on
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_OFFSET
    }

    /// Clear the world back to a run's starting conditions
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.coins.clear();
        self.particles.clear();
        self.score = 0;
        self.spawn_timer = 0.0;
        self.player.lane = 1;
        self.player.x = lane_x(1, self.width);
        self.player.target_x = self.player.x;
        self.player.vy = 0.0;
        self.player.grounded = true;
    }

    /// Reset and begin a new run
    pub fn start(&mut self) {
        self.reset();
        self.phase = GamePhase::Running;
    }

    /// Pause toggle; only meaningful mid-run
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            other => other,
        };
    }

    /// Canvas size changed: re-anchor the player to the new ground line
    /// and re-target the lane center.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.player.y = self.ground_y();
        self.player.target_x = lane_x(self.player.lane, width);
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    /// Shift lanes by `delta`, clamping to the track edges (no wrap)
    pub fn move_lane(&mut self, delta: i32) {
        if !self.accepts_input() {
            return;
        }
        let lane = (self.player.lane as i32 + delta).clamp(0, MAX_LANE as i32);
        self.player.lane = lane as usize;
        self.player.target_x = lane_x(self.player.lane, self.width);
    }

    /// Launch a jump if grounded. Returns whether it fired, so the shell
    /// can key the jump sound off an actual launch.
    pub fn jump(&mut self) -> bool {
        if !self.accepts_input() || !self.player.grounded {
            return false;
        }
        self.player.vy = JUMP_VELOCITY;
        self.player.grounded = false;
        true
    }
}
