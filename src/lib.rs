//! Asteroid Field - a wrapped-plane arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, per-frame stepping)
//! - `renderer`: Drawable per-frame snapshot for an external renderer
//! - `audio`: Sound triggers for an external audio backend
//! - `settings`: Construction-time configuration
//! - `scoreboard`: Score ranking and winner selection

pub mod audio;
pub mod renderer;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use scoreboard::{ScoreEntry, Scoreboard};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game constants. Speeds and timers are per frame, not per second: the
/// simulation assumes the orchestrator really ticks at the target rate.
pub mod consts {
    /// Device identifier of the locally controlled player
    pub const LOCAL_PLAYER_ID: &str = "local";

    /// Ship rotation per frame of held input (degrees)
    pub const SHIP_ROTATION_STEP: f32 = 4.0;
    /// Remote tilt magnitude that equals one full rotation step
    pub const TILT_REFERENCE: f32 = 15.0;
    /// Remote tilt below this magnitude is ignored
    pub const TILT_DEAD_ZONE: f32 = 1.0;
    /// Ship top speed (pixels/frame)
    pub const SHIP_MAX_SPEED: f32 = 5.0;
    /// Fraction of max velocity gained per frame of thrust
    pub const SHIP_THRUST_RATE: f32 = 0.02;
    /// Fraction of max velocity lost per frame without thrust
    pub const SHIP_DRAG_RATE: f32 = 0.005;
    /// Hull scale applied once at construction
    pub const SHIP_HULL_SCALE: f32 = 0.6;
    /// Wrap margins, roughly the hull half-extents
    pub const SHIP_WRAP_MARGIN_X: f32 = 31.0;
    pub const SHIP_WRAP_MARGIN_Y: f32 = 43.0;

    /// Invulnerability granted on respawn (frames)
    pub const RESPAWN_INVULNERABLE_FRAMES: u32 = 300;
    /// Blink cycle while invulnerable: shown only while `timer % PERIOD < VISIBLE`
    pub const BLINK_PERIOD: u32 = 25;
    pub const BLINK_VISIBLE: u32 = 12;
    /// Death animation length (frames)
    pub const DEATH_ANIMATION_FRAMES: u32 = 180;
    /// Spin of each wreck segment (degrees/frame, sign picked at random)
    pub const DEATH_SPIN: f32 = 3.0;
    /// Score lost when an obstacle rams a ship
    pub const COLLISION_PENALTY: i64 = 10;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 2.5;
    pub const PROJECTILE_SPEED: f32 = 11.0;

    /// Velocity components closer to zero than this are resampled
    pub const VELOCITY_DEAD_ZONE: f32 = 0.1;
    /// Children spawned when a non-small obstacle breaks
    pub const SPLIT_CHILDREN: usize = 2;

    /// Particle burst defaults
    pub const PARTICLE_MIN_COUNT: usize = 3;
    pub const PARTICLE_MAX_COUNT: usize = 5;
    pub const PARTICLE_MAX_SPEED: f32 = 1.5;
    pub const PARTICLE_MIN_LIFE: u32 = 45;
    pub const PARTICLE_MAX_LIFE: u32 = 60;
    pub const PARTICLE_DECAY: f32 = 1.2;

    /// Screen shake defaults (applied by the renderer)
    pub const SHAKE_FRAMES: u32 = 15;
    pub const SHAKE_MAGNITUDE: i32 = 2;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit direction for a heading in degrees (0 = up, clockwise positive)
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Vec2::new(sin, -cos)
}
