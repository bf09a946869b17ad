//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` is one frame
//! - Seeded RNG only
//! - Stable iteration order (entity order, player join order)
//! - No rendering, audio or platform dependencies

pub mod geometry;
pub mod input;
pub mod registry;
pub mod state;
pub mod tick;

pub use geometry::{Circle, Polygon, Rect, Segment, rotate_point, scale_point};
pub use input::{FireTrigger, RemoteTilt, TickInput};
pub use registry::PlayerRegistry;
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, Particle, Projectile, Ship, ShipState, SizeClass,
    device_color,
};
pub use tick::{spawn_round, tick};
