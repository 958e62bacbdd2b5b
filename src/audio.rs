//! Audio system using Web Audio API
//!
//! Short procedurally generated beeps - no sound assets needed. If the
//! context cannot be created (blocked or unsupported) the game simply
//! runs silent.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Coin picked up
    CoinPickup,
    /// Obstacle hit, run over
    Crash,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail if not in a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, muted: false }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => self.beep(ctx, 880.0, 0.12),
            SoundEffect::CoinPickup => self.beep(ctx, 1200.0, 0.08),
            SoundEffect::Crash => self.beep(ctx, 120.0, 0.25),
        }
    }

    /// Create a sine oscillator wired through a gain node
    fn create_osc(&self, ctx: &AudioContext, freq: f32) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(OscillatorType::Sine);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single beep: fast exponential attack, exponential decay over `duration`
    fn beep(&self, ctx: &AudioContext, freq: f32, duration: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, freq) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0001, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.08, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.0001, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.02).ok();
    }
}
