//! Audio triggers
//!
//! The simulation never plays sound itself. It raises [`GameEvent`]s; the
//! [`AudioManager`] maps them to sound effects and hands those to whatever
//! backend implements [`SoundSink`].

use serde::{Deserialize, Serialize};

use crate::sim::state::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Local or remote shot fired
    Fire,
    /// Obstacle destroyed by a projectile
    ObstacleShot,
    /// Obstacle destroyed by ramming a ship
    ObstacleRammed,
    /// Ship destroyed
    ShipDeath,
}

impl SoundEffect {
    /// Effect for an event, if it makes a sound
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::ProjectileFired { .. } => Some(SoundEffect::Fire),
            GameEvent::ObstacleShot { .. } => Some(SoundEffect::ObstacleShot),
            GameEvent::ObstacleRammed { .. } => Some(SoundEffect::ObstacleRammed),
            GameEvent::ShipDestroyed { .. } => Some(SoundEffect::ShipDeath),
            _ => None,
        }
    }

    /// Mix level of the effect at full master volume
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::Fire | SoundEffect::ShipDeath => 0.25,
            SoundEffect::ObstacleShot | SoundEffect::ObstacleRammed => 0.1,
        }
    }
}

/// Audio backend
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * effect.base_volume()
        }
    }

    /// Play every sound raised by one tick's events.
    /// Returns the number of effects sent to the sink.
    pub fn dispatch(&self, events: &[GameEvent], sink: &mut impl SoundSink) -> usize {
        let mut played = 0;
        for effect in events.iter().filter_map(SoundEffect::from_event) {
            let vol = self.effective_volume(effect);
            if vol <= 0.0 {
                continue;
            }
            sink.play(effect, vol);
            played += 1;
        }
        played
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SizeClass;

    #[derive(Default)]
    struct Recorder(Vec<(SoundEffect, f32)>);

    impl SoundSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.push((effect, volume));
        }
    }

    fn events() -> Vec<GameEvent> {
        vec![
            GameEvent::ProjectileFired {
                device_id: "local".into(),
            },
            GameEvent::ScreenShake,
            GameEvent::ObstacleShot {
                shooter: "local".into(),
                size: SizeClass::Large,
                points: 20,
            },
            GameEvent::ShipDestroyed {
                device_id: "device_1".into(),
            },
        ]
    }

    #[test]
    fn test_dispatch_maps_events() {
        let mut sink = Recorder::default();
        let mut audio = AudioManager::new();
        audio.set_master_volume(0.5);
        assert_eq!(audio.dispatch(&events(), &mut sink), 3);
        assert_eq!(
            sink.0,
            [
                (SoundEffect::Fire, 0.125),
                (SoundEffect::ObstacleShot, 0.05),
                (SoundEffect::ShipDeath, 0.125),
            ]
        );
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut sink = Recorder::default();
        let mut audio = AudioManager::default();
        audio.set_muted(true);
        assert_eq!(audio.dispatch(&events(), &mut sink), 0);
        assert!(sink.0.is_empty());
    }
}
