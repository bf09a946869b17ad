//! Asteroid Field headless entry point
//!
//! Runs one full round with a scripted local pilot and simulated remote
//! devices, then prints the final frame as JSON.
//!
//! Usage: `asteroid-field [settings.json]`

use std::error::Error;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use asteroid_field::Settings;
use asteroid_field::audio::{AudioManager, SoundEffect, SoundSink};
use asteroid_field::renderer::{FrameSnapshot, ScreenShake};
use asteroid_field::sim::{GameEvent, GamePhase, GameState, RemoteTilt, TickInput, tick};

/// Chance per frame that a new remote device shows up
const REMOTE_JOIN_CHANCE: f64 = 0.01;
/// Tilt readings a simulated device sends
const REMOTE_TILTS: [f32; 3] = [15.0, -15.0, 0.0];

/// Sound backend that only logs
struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sound {effect:?} at {volume:.2}");
    }
}

/// Stand-in for the network: devices join at random and tilt at random
struct RemoteDevices {
    rng: Pcg32,
    joined: Vec<String>,
}

impl RemoteDevices {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            joined: Vec::new(),
        }
    }

    /// Tilt messages for this frame. A new device only rolls to join while
    /// the registry has room.
    fn poll(&mut self, players: usize, max_players: usize) -> Vec<RemoteTilt> {
        if players < max_players && self.rng.random_bool(REMOTE_JOIN_CHANCE) {
            self.joined.push(format!("device_{}", self.joined.len() + 1));
        }
        let rng = &mut self.rng;
        self.joined
            .iter()
            .map(|device_id| RemoteTilt {
                device_id: device_id.clone(),
                tilt: REMOTE_TILTS[rng.random_range(0..REMOTE_TILTS.len())],
            })
            .collect()
    }
}

/// Local pilot: sweep around, thrust in bursts, tap fire
fn scripted_input(frame: u64) -> TickInput {
    TickInput {
        rotate_right: frame % 240 < 45,
        rotate_left: (120..150).contains(&(frame % 240)),
        thrust: frame % 180 < 60,
        fire: frame % 12 < 2,
        ..Default::default()
    }
}

fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("Loaded settings from {path}");
            Ok(Settings::from_json(&json)?)
        }
        None => Ok(Settings::default()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Asteroid Field (headless) starting...");

    let settings = load_settings()?;
    let mut remote = RemoteDevices::new(settings.seed.wrapping_add(1));
    let mut shake_rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(2));
    let mut state = GameState::new(settings);
    let audio = AudioManager::new();
    let mut sink = LogSink;
    let mut shake = ScreenShake::default();

    let mut frame = 0u64;
    while state.phase != GamePhase::GameOver {
        let mut input = scripted_input(frame);
        input.remote = remote.poll(state.players.len(), state.settings.max_players);
        tick(&mut state, &input);

        audio.dispatch(&state.events, &mut sink);
        for event in &state.events {
            match event {
                GameEvent::ScreenShake => shake.trigger(),
                GameEvent::ShipDestroyed { device_id } => log::info!("{device_id} destroyed"),
                _ => {}
            }
        }
        let offset = shake.next_offset(&mut shake_rng);
        if offset != [0, 0] {
            log::trace!("frame {frame}: shake {offset:?}");
        }
        frame += 1;
    }

    log::info!("Finished after {frame} frames, {} rounds", state.round);
    let snapshot = FrameSnapshot::capture(&state);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
