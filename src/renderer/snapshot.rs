//! Per-frame drawable snapshot

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scoreboard::{ScoreEntry, Scoreboard};
use crate::sim::geometry::{Circle, Segment};
use crate::sim::state::{GamePhase, GameState};

/// Entries shown on the HUD scoreboard
pub const HUD_SCOREBOARD_LEN: usize = 3;

/// A ship as line segments in its device color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipDrawable {
    pub device_id: String,
    pub color: [u8; 3],
    pub segments: [Segment; 3],
    /// False during the invulnerability blink
    pub visible: bool,
}

/// Everything an external renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub round: u32,
    pub ships: Vec<ShipDrawable>,
    pub projectiles: Vec<Circle>,
    /// World-space outlines
    pub obstacles: Vec<Vec<Vec2>>,
    pub particles: Vec<Vec2>,
    pub scoreboard: Vec<ScoreEntry>,
    /// Whole seconds, rounded up
    pub seconds_left: u32,
    pub shake: bool,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let ships = state
            .players
            .iter()
            .map(|ship| ShipDrawable {
                device_id: ship.device_id.clone(),
                color: ship.color,
                segments: ship.hull,
                visible: ship.is_visible(),
            })
            .collect();

        Self {
            phase: state.phase,
            round: state.round,
            ships,
            projectiles: state.projectiles.iter().map(|p| p.shape).collect(),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| o.shape.world_vertices().collect())
                .collect(),
            particles: state.particles.iter().map(|p| p.pos).collect(),
            scoreboard: Scoreboard::from_players(&state.players)
                .top(HUD_SCOREBOARD_LEN)
                .to_vec(),
            seconds_left: state.frames_left.div_ceil(state.settings.fps),
            shake: state.shake_requested(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::input::TickInput;
    use crate::sim::tick::tick;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(Settings::default());
        for id in ["device_1", "device_2", "device_3"] {
            assert!(state.add_player(id));
        }
        if let Some(ship) = state.players.get_mut("device_2") {
            ship.score = 50;
        }
        state.players.local_mut().invulnerable_ticks = 41;
        tick(&mut state, &TickInput::default());

        let frame = FrameSnapshot::capture(&state);
        assert_eq!(frame.round, 1);
        assert_eq!(frame.ships.len(), 4);
        assert_eq!(frame.obstacles.len(), state.obstacles.len());
        assert!(frame.obstacles.iter().all(|outline| outline.len() >= 3));
        assert_eq!(frame.scoreboard.len(), HUD_SCOREBOARD_LEN);
        assert_eq!(frame.scoreboard[0].device_id, "device_2");
        assert_eq!(frame.seconds_left, 90);
        // 40 % 25 = 15 falls in the hidden part of the blink
        assert!(!frame.ships[0].visible);
        assert!(frame.ships[1].visible);
        assert!(!frame.shake);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Settings::default());
        let json = serde_json::to_string(&FrameSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
