//! Per-tick input commands
//!
//! Inputs are plain data so a recorded stream replays the same game.

use serde::{Deserialize, Serialize};

/// A tilt reading from a remote device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTilt {
    pub device_id: String,
    /// Positive turns clockwise; 15 equals one keyboard rotation step
    pub tilt: f32,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Local ship steering (held keys)
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Local ship thrust (held key)
    pub thrust: bool,
    /// Fire button level; a shot leaves only on the press edge
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Remote device messages received this frame. Unknown devices join.
    pub remote: Vec<RemoteTilt>,
}

/// Press-edge detector for a held button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireTrigger {
    held: bool,
}

impl FireTrigger {
    /// Feed the current button level. Returns true only on a released -> pressed edge.
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.held;
        self.held = pressed;
        fired
    }

    pub fn is_held(&self) -> bool {
        self.held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_only_on_press_edge() {
        let mut trigger = FireTrigger::default();
        let levels = [false, true, true, true, false, true, false, false];
        let fired: Vec<bool> = levels.iter().map(|&l| trigger.update(l)).collect();
        assert_eq!(fired, [false, true, false, false, false, true, false, false]);
        assert!(!trigger.is_held());
    }
}
