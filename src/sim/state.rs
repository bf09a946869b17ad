//! Game state and core simulation types
//!
//! Entities are plain records built from geometry primitives. All randomness
//! flows through the seeded RNG owned by [`GameState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::geometry::{Circle, Polygon, Rect, Segment, rotate_point, scale_point};
use super::input::FireTrigger;
use super::registry::PlayerRegistry;
use super::tick::spawn_round;
use crate::consts::*;
use crate::scoreboard::ScoreEntry;
use crate::settings::Settings;
use crate::{heading_vector, normalize_degrees};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Round timer ran out
    GameOver,
}

/// Something that happened during the last tick, for audio/render/HUD hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, obstacles: u32 },
    PlayerJoined { device_id: String },
    ProjectileFired { device_id: String },
    /// Obstacle destroyed by a projectile; `shooter` is the credited player
    ObstacleShot { shooter: String, size: SizeClass, points: i64 },
    /// Obstacle destroyed by running into a ship
    ObstacleRammed { device_id: String, size: SizeClass },
    ShipDestroyed { device_id: String },
    ShipRespawned { device_id: String },
    /// At most one per tick
    ScreenShake,
    GameOver { winner: String, score: i64 },
}

/// Stable per-device color: the low three bytes of the identifier's SHA-256
pub fn device_color(device_id: &str) -> [u8; 3] {
    let digest = Sha256::digest(device_id.as_bytes());
    [digest[29], digest[30], digest[31]]
}

/// Relocate a coordinate that left `[-margin, extent + margin]` to the opposite edge
#[inline]
pub fn wrap_axis(pos: f32, extent: f32, margin: f32) -> f32 {
    if pos > extent + margin {
        -margin
    } else if pos < -margin {
        extent + margin
    } else {
        pos
    }
}

/// Linear drift of each hull segment while the wreck drifts apart
const WRECK_DRIFT: [Vec2; 3] = [Vec2::new(-0.5, -0.5), Vec2::new(0.5, -0.5), Vec2::new(0.0, 0.5)];

/// Ship lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShipState {
    Alive,
    /// Wreck animation; each hull segment spins at its own rate
    Dying { timer: u32, spins: [f32; 3] },
}

/// A player's ship: three hull segments plus the apex projectiles leave from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub device_id: String,
    pub color: [u8; 3],
    pub hull: [Segment; 3],
    /// Nose of the hull
    pub apex: Vec2,
    pub center: Vec2,
    /// Heading in degrees, [0, 360), 0 = up
    pub angle: f32,
    pub vel: Vec2,
    /// Frames of invulnerability left
    pub invulnerable_ticks: u32,
    pub state: ShipState,
    pub score: i64,
    /// Carried over on respawn
    pub bonus_threshold_count: u32,
}

impl Ship {
    /// Fresh ship at rest in the middle of the playfield, pointing up
    pub fn new(device_id: impl Into<String>, playfield: Vec2) -> Self {
        let device_id = device_id.into();
        let mid = playfield * 0.5;
        let nose = mid + Vec2::new(0.0, -50.0);
        let port = mid + Vec2::new(-25.0, 20.0);
        let starboard = mid + Vec2::new(25.0, 20.0);
        let center = Rect::enclosing([nose, port, starboard]).center();

        let hull = [
            Segment::new(nose, port),
            Segment::new(nose, starboard),
            Segment::new(mid + Vec2::new(-20.0, 4.0), mid + Vec2::new(20.0, 4.0)),
        ]
        .map(|segment| segment.scaled(SHIP_HULL_SCALE, center));

        Self {
            color: device_color(&device_id),
            device_id,
            hull,
            apex: scale_point(nose, SHIP_HULL_SCALE, center),
            center,
            angle: 0.0,
            vel: Vec2::ZERO,
            invulnerable_ticks: 0,
            state: ShipState::Alive,
            score: 0,
            bonus_threshold_count: 1,
        }
    }

    /// Replacement for a finished wreck: same player, same score, temporarily safe
    pub fn respawn(&self, playfield: Vec2) -> Self {
        let mut ship = Self::new(self.device_id.clone(), playfield);
        ship.score = self.score;
        ship.bonus_threshold_count = self.bonus_threshold_count;
        ship.invulnerable_ticks = RESPAWN_INVULNERABLE_FRAMES;
        ship
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == ShipState::Alive
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ticks > 0
    }

    /// Invulnerable ships blink
    pub fn is_visible(&self) -> bool {
        !self.is_alive()
            || !self.is_invulnerable()
            || self.invulnerable_ticks % BLINK_PERIOD < BLINK_VISIBLE
    }

    /// Turn the whole hull about the ship center
    pub fn rotate(&mut self, delta_deg: f32) {
        self.angle = normalize_degrees(self.angle + delta_deg);
        for segment in &mut self.hull {
            segment.rotate(delta_deg, self.center);
        }
        self.apex = rotate_point(self.apex, delta_deg, self.center);
    }

    /// Keyboard steering; both keys cancel out
    pub fn steer(&mut self, left: bool, right: bool) {
        if left {
            self.rotate(-SHIP_ROTATION_STEP);
        }
        if right {
            self.rotate(SHIP_ROTATION_STEP);
        }
    }

    /// Analog steering from a remote device, proportional to `|tilt| / 15`
    pub fn apply_remote_tilt(&mut self, tilt: f32) {
        if tilt.abs() < TILT_DEAD_ZONE {
            return;
        }
        let amount = SHIP_ROTATION_STEP * (tilt.abs() / TILT_REFERENCE);
        self.rotate(amount.copysign(tilt));
    }

    /// Velocity the ship eases toward under thrust at its current heading
    pub fn max_velocity(&self) -> Vec2 {
        heading_vector(self.angle) * SHIP_MAX_SPEED
    }

    /// Ease toward max velocity under thrust, drift toward rest otherwise
    pub fn update_velocity(&mut self, thrust: bool) {
        let max = self.max_velocity();
        self.vel = if thrust {
            Vec2::new(ease_toward(self.vel.x, max.x), ease_toward(self.vel.y, max.y))
        } else {
            Vec2::new(decay_toward_zero(self.vel.x, max.x), decay_toward_zero(self.vel.y, max.y))
        };
    }

    /// Move hull, apex and center together
    pub fn translate(&mut self, delta: Vec2) {
        for segment in &mut self.hull {
            segment.translate(delta);
        }
        self.apex += delta;
        self.center += delta;
    }

    /// One frame of flight: velocity, displacement, screen wrap
    pub fn advance(&mut self, thrust: bool, playfield: Vec2) {
        self.update_velocity(thrust);
        self.translate(self.vel);
        self.wrap(playfield);
    }

    fn wrap(&mut self, playfield: Vec2) {
        let target = Vec2::new(
            wrap_axis(self.center.x, playfield.x, SHIP_WRAP_MARGIN_X),
            wrap_axis(self.center.y, playfield.y, SHIP_WRAP_MARGIN_Y),
        );
        if target != self.center {
            self.translate(target - self.center);
        }
    }

    pub fn tick_invulnerability(&mut self) {
        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
    }

    /// Start the wreck animation with a random spin direction per segment
    pub fn kill<R: Rng>(&mut self, rng: &mut R) {
        let spins = std::array::from_fn(|_| {
            if rng.random_bool(0.5) {
                DEATH_SPIN
            } else {
                -DEATH_SPIN
            }
        });
        self.state = ShipState::Dying {
            timer: DEATH_ANIMATION_FRAMES,
            spins,
        };
    }

    /// Advance the wreck animation. Returns true on the frame it finishes.
    pub fn advance_death(&mut self) -> bool {
        let ShipState::Dying { timer, spins } = &mut self.state else {
            return false;
        };
        for ((segment, drift), spin) in self.hull.iter_mut().zip(WRECK_DRIFT).zip(*spins) {
            segment.translate(drift);
            segment.spin(spin);
        }
        *timer = timer.saturating_sub(1);
        *timer == 0
    }
}

/// Thrust easing for one velocity component, never overshooting `max`
fn ease_toward(v: f32, max: f32) -> f32 {
    let next = v + max * SHIP_THRUST_RATE;
    if (max > 0.0 && next > max) || (max < 0.0 && next < max) {
        max
    } else {
        next
    }
}

/// Drag for one velocity component, snapping to zero instead of crossing it
fn decay_toward_zero(v: f32, max: f32) -> f32 {
    let step = max.abs() * SHIP_DRAG_RATE;
    if v > 0.0 {
        (v - step).max(0.0)
    } else if v < 0.0 {
        (v + step).min(0.0)
    } else {
        0.0
    }
}

/// A projectile, tagged with the device that fired it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub shape: Circle,
    pub vel: Vec2,
    pub owner: String,
}

impl Projectile {
    pub fn new(id: u32, origin: Vec2, heading: f32, owner: impl Into<String>) -> Self {
        Self {
            id,
            shape: Circle::new(origin, PROJECTILE_RADIUS),
            vel: heading_vector(heading) * PROJECTILE_SPEED,
            owner: owner.into(),
        }
    }

    pub fn advance(&mut self) {
        self.shape.translate(self.vel);
    }

    /// Projectiles do not wrap; anything on or past the edge is gone
    pub fn in_bounds(&self, playfield: Vec2) -> bool {
        let p = self.shape.center;
        p.x > 0.0 && p.x < playfield.x && p.y > 0.0 && p.y < playfield.y
    }
}

/// Obstacle size classes; splitting always moves one class smaller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

impl SizeClass {
    /// Outline scale relative to the template
    pub fn scale(self) -> f32 {
        match self {
            SizeClass::Large => 1.0,
            SizeClass::Medium => 0.625,
            SizeClass::Small => 0.325,
        }
    }

    /// Velocity component limit for freshly spawned obstacles (pixels/frame)
    pub fn speed(self) -> f32 {
        match self {
            SizeClass::Large => 1.0,
            SizeClass::Medium => 2.0,
            SizeClass::Small => 1.75,
        }
    }

    /// Points for shooting one down
    pub fn points(self) -> i64 {
        match self {
            SizeClass::Large => 20,
            SizeClass::Medium => 30,
            SizeClass::Small => 40,
        }
    }

    pub fn next_smaller(self) -> Option<Self> {
        match self {
            SizeClass::Large => Some(SizeClass::Medium),
            SizeClass::Medium => Some(SizeClass::Small),
            SizeClass::Small => None,
        }
    }
}

/// Obstacle outlines, drawn in an 80x80 box
pub const OBSTACLE_OUTLINES: [&[[f32; 2]]; 3] = [
    &[[23.0, 0.0], [72.0, 12.0], [79.0, 46.0], [64.0, 71.0], [25.0, 79.0], [0.0, 51.0], [0.0, 18.0]],
    &[[25.0, 0.0], [79.0, 24.0], [79.0, 54.0], [46.0, 79.0], [2.0, 61.0], [0.0, 19.0]],
    &[[25.0, 2.0], [66.0, 0.0], [79.0, 38.0], [67.0, 63.0], [38.0, 79.0], [14.0, 69.0], [0.0, 20.0]],
];

/// A drifting polygonal obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub shape: Polygon,
    pub vel: Vec2,
    pub size: SizeClass,
}

impl Obstacle {
    pub fn new(id: u32, shape: Polygon, vel: Vec2, size: SizeClass) -> Self {
        Self { id, shape, vel, size }
    }

    /// Drift one frame and wrap each axis using the outline's half-extents
    pub fn advance(&mut self, playfield: Vec2) {
        self.shape.translate(self.vel);
        let half = self.shape.bounds().half_extents();
        let center = self.shape.center;
        self.shape.center = Vec2::new(
            wrap_axis(center.x, playfield.x, half.x),
            wrap_axis(center.y, playfield.y, half.y),
        );
    }
}

/// A short-lived debris point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life, decays by `PARTICLE_DECAY` per frame
    pub timer: f32,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has expired.
    pub fn step(&mut self) -> bool {
        self.pos += self.vel;
        self.timer -= PARTICLE_DECAY;
        self.timer > 0.0
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Playfield size in pixels
    pub playfield: Vec2,
    pub rng: Pcg32,
    pub players: PlayerRegistry,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    /// Rounds started so far (1-based once the first round spawns)
    pub round: u32,
    /// Large obstacles spawned at the next round start
    pub obstacle_count: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Frames until the round timer expires
    pub frames_left: u32,
    /// Local fire button edge detector
    pub fire: FireTrigger,
    /// Set when the timer expires
    pub winner: Option<ScoreEntry>,
    /// Events raised by the last tick, plus any raised since by setup calls
    pub events: Vec<GameEvent>,
    /// Set when a tick finishes; the next event raised replaces the list
    events_stale: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game and spawn its first round.
    ///
    /// Panics if the settings are invalid.
    pub fn new(settings: Settings) -> Self {
        if let Err(err) = settings.validate() {
            panic!("invalid settings: {err}");
        }
        let playfield = settings.playfield();
        let mut state = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            players: PlayerRegistry::new(Ship::new(LOCAL_PLAYER_ID, playfield)),
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            round: 0,
            obstacle_count: settings.starting_obstacles,
            phase: GamePhase::Playing,
            time_ticks: 0,
            frames_left: settings.round_frames(),
            fire: FireTrigger::default(),
            winner: None,
            events: Vec::new(),
            events_stale: false,
            next_id: 1,
            playfield,
            settings,
        };
        spawn_round(&mut state);
        state
    }

    /// Start over with the same players: fresh ships, zero scores, first round
    pub fn reset(&mut self) {
        let playfield = self.playfield;
        self.players.rebuild(|ship| Ship::new(ship.device_id.clone(), playfield));
        self.projectiles.clear();
        self.obstacles.clear();
        self.particles.clear();
        self.events.clear();
        self.events_stale = false;
        self.round = 0;
        self.obstacle_count = self.settings.starting_obstacles;
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.frames_left = self.settings.round_frames();
        self.fire = FireTrigger::default();
        self.winner = None;
        log::info!("Game reset ({} players)", self.players.len());
        spawn_round(self);
    }

    /// Drop the previous tick's events if they are still listed. Events raised
    /// between ticks (first round, reset, joins) stay until the next tick ends.
    pub(crate) fn clear_stale_events(&mut self) {
        if self.events_stale {
            self.events.clear();
            self.events_stale = false;
        }
    }

    pub(crate) fn mark_events_stale(&mut self) {
        self.events_stale = true;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds left on the round timer
    pub fn seconds_left(&self) -> f32 {
        self.frames_left as f32 / self.settings.fps as f32
    }

    /// Register a new player. Returns false if the id is taken or the game is full.
    pub fn add_player(&mut self, device_id: &str) -> bool {
        if self.players.contains(device_id) {
            return false;
        }
        if self.players.len() >= self.settings.max_players {
            log::warn!("Player {device_id} refused: {} players max", self.settings.max_players);
            return false;
        }
        self.players.insert(Ship::new(device_id, self.playfield));
        log::info!("Player joined: {device_id}");
        self.clear_stale_events();
        self.events.push(GameEvent::PlayerJoined {
            device_id: device_id.to_owned(),
        });
        true
    }

    /// Drop a remote player. Panics for the local player.
    pub fn remove_player(&mut self, device_id: &str) -> Option<Ship> {
        let removed = self.players.remove(device_id);
        if removed.is_some() {
            log::info!("Player left: {device_id}");
        }
        removed
    }

    /// Steer a registered ship from a remote tilt reading.
    ///
    /// Panics if `device_id` is not registered.
    pub fn apply_remote_tilt(&mut self, device_id: &str, tilt: f32) {
        let ship = self
            .players
            .get_mut(device_id)
            .unwrap_or_else(|| panic!("remote tilt for unknown device {device_id:?}"));
        if ship.is_alive() {
            ship.apply_remote_tilt(tilt);
        }
    }

    /// Whether the last tick flagged a screen shake
    pub fn shake_requested(&self) -> bool {
        self.events.contains(&GameEvent::ScreenShake)
    }
}
