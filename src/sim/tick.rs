//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is
//! one frame; every speed and timer is expressed per frame.
//!
//! Collision passes never remove entities while iterating: hits are flagged,
//! the collections are compacted afterwards, and fragments are appended last
//! so nothing spawned this frame is tested again this frame.

use glam::Vec2;
use rand::Rng;

use super::geometry::Polygon;
use super::input::{RemoteTilt, TickInput};
use super::registry::PlayerRegistry;
use super::state::{
    GameEvent, GamePhase, GameState, OBSTACLE_OUTLINES, Obstacle, Particle, Projectile, SizeClass,
};
use crate::consts::*;
use crate::scoreboard::Scoreboard;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.clear_stale_events();
    step(state, input);
    state.mark_events_stale();
}

fn step(state: &mut GameState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    apply_remote_input(state, &input.remote);

    state.frames_left = state.frames_left.saturating_sub(1);
    if state.frames_left == 0 {
        finish_game(state);
        return;
    }

    // Field cleared: next round gets one more obstacle, up to the cap
    if state.obstacles.is_empty() {
        state.obstacle_count = (state.obstacle_count + 1).min(state.settings.max_obstacles);
        spawn_round(state);
    }

    update_ships(state, input);

    let playfield = state.playfield;
    for obstacle in &mut state.obstacles {
        obstacle.advance(playfield);
    }
    resolve_collisions(state);

    state.particles.retain_mut(Particle::step);

    update_projectiles(state, input.fire);
}

/// Remote messages: unknown devices join first, then the tilt steers their ship
fn apply_remote_input(state: &mut GameState, remote: &[RemoteTilt]) {
    for message in remote {
        if !state.players.contains(&message.device_id) && !state.add_player(&message.device_id) {
            continue;
        }
        state.apply_remote_tilt(&message.device_id, message.tilt);
    }
}

/// Invulnerability timers, wreck animations, respawns, then flight
fn update_ships(state: &mut GameState, input: &TickInput) {
    let playfield = state.playfield;

    let mut finished = Vec::new();
    for ship in state.players.iter_mut() {
        ship.tick_invulnerability();
        if ship.advance_death() {
            finished.push(ship.device_id.clone());
        }
    }
    for device_id in finished {
        let Some(fresh) = state.players.get(&device_id).map(|s| s.respawn(playfield)) else {
            continue;
        };
        state.players.replace(fresh);
        log::debug!("Ship respawned: {device_id}");
        state.events.push(GameEvent::ShipRespawned { device_id });
    }

    // Only the local ship reads the keyboard; remote ships steer by tilt
    let local_id = state.players.local_id().to_owned();
    for ship in state.players.iter_mut().filter(|s| s.is_alive()) {
        let is_local = ship.device_id == local_id;
        if is_local {
            ship.steer(input.rotate_left, input.rotate_right);
        }
        ship.advance(is_local && input.thrust, playfield);
    }
}

/// An obstacle destroyed this frame, waiting for its fragments
struct Wreck {
    center: Vec2,
    size: SizeClass,
}

/// Projectile and ship hits against every obstacle that existed at frame start
fn resolve_collisions(state: &mut GameState) {
    let mut spent = vec![false; state.projectiles.len()];
    let mut destroyed = vec![false; state.obstacles.len()];
    let mut wrecks = Vec::new();

    for (index, obstacle) in state.obstacles.iter().enumerate() {
        let shot = state
            .projectiles
            .iter()
            .enumerate()
            .find(|&(j, p)| !spent[j] && p.shape.intersects_polygon(&obstacle.shape))
            .map(|(j, _)| j);

        if let Some(j) = shot {
            // A shot obstacle is not tested against ships this frame
            spent[j] = true;
            let points = obstacle.size.points();
            let shooter = state.players.credit(&state.projectiles[j].owner, points);
            log::debug!("{shooter} shot a {:?} obstacle (+{points})", obstacle.size);
            state.events.push(GameEvent::ObstacleShot {
                shooter,
                size: obstacle.size,
                points,
            });
        } else if let Some(device_id) = ram_first_ship(&mut state.players, obstacle, &mut state.rng) {
            log::debug!("{device_id} destroyed by a {:?} obstacle", obstacle.size);
            state.events.push(GameEvent::ObstacleRammed {
                device_id: device_id.clone(),
                size: obstacle.size,
            });
            state.events.push(GameEvent::ShipDestroyed { device_id });
        } else {
            continue;
        }

        destroyed[index] = true;
        wrecks.push(Wreck {
            center: obstacle.shape.center,
            size: obstacle.size,
        });
    }

    retain_unflagged(&mut state.projectiles, &spent);
    retain_unflagged(&mut state.obstacles, &destroyed);

    if wrecks.is_empty() {
        return;
    }
    for wreck in &wrecks {
        split_obstacle(state, wreck.center, wreck.size);
        spawn_particles(state, wreck.center);
    }
    state.events.push(GameEvent::ScreenShake);
}

/// Kill the first living, vulnerable ship whose hull touches the obstacle
fn ram_first_ship<R: Rng>(
    players: &mut PlayerRegistry,
    obstacle: &Obstacle,
    rng: &mut R,
) -> Option<String> {
    let ship = players.iter_mut().find(|ship| {
        ship.is_alive()
            && !ship.is_invulnerable()
            && ship
                .hull
                .iter()
                .any(|segment| segment.intersects_polygon(&obstacle.shape))
    })?;
    ship.kill(rng);
    ship.score -= COLLISION_PENALTY;
    Some(ship.device_id.clone())
}

fn retain_unflagged<T>(items: &mut Vec<T>, flags: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !flags[index];
        index += 1;
        keep
    });
}

/// Advance and cull projectiles, then fire on a press edge
fn update_projectiles(state: &mut GameState, fire: bool) {
    let playfield = state.playfield;
    state.projectiles.retain_mut(|p| {
        p.advance();
        p.in_bounds(playfield)
    });

    if !state.fire.update(fire) {
        return;
    }
    let local = state.players.local();
    if !local.is_alive() {
        return;
    }
    let (origin, heading, owner) = (local.apex, local.angle, local.device_id.clone());
    let id = state.next_entity_id();
    state.projectiles.push(Projectile::new(id, origin, heading, owner.clone()));
    state.events.push(GameEvent::ProjectileFired { device_id: owner });
}

/// Round timer ran out: freeze the game and record the winner
fn finish_game(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.winner = Scoreboard::from_players(&state.players).winner().cloned();
    if let Some(winner) = &state.winner {
        log::info!("Game over: {} wins with {}", winner.device_id, winner.score);
        state.events.push(GameEvent::GameOver {
            winner: winner.device_id.clone(),
            score: winner.score,
        });
    }
}

/// Velocity sampler that keeps components out of the dead zone and avoids
/// repeating a component already used in the same batch
#[derive(Debug, Default)]
struct VelocityBatch {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl VelocityBatch {
    fn sample<R: Rng>(&mut self, rng: &mut R, limit: f32) -> Vec2 {
        let x = Self::component(rng, limit, &self.xs);
        let y = Self::component(rng, limit, &self.ys);
        self.xs.push(x);
        self.ys.push(y);
        Vec2::new(x, y)
    }

    fn component<R: Rng>(rng: &mut R, limit: f32, taken: &[f32]) -> f32 {
        loop {
            let v = rng.random_range(-limit..=limit);
            if v.abs() >= VELOCITY_DEAD_ZONE && !taken.contains(&v) {
                return v;
            }
        }
    }
}

fn random_outline<R: Rng>(rng: &mut R) -> Polygon {
    Polygon::from_outline(OBSTACLE_OUTLINES[rng.random_range(0..OBSTACLE_OUTLINES.len())])
}

/// Spawn regions as `[x0, x1, y0, y1]`: a thirds grid minus the middle cell
fn spawn_buckets(width: u32, height: u32) -> [[u32; 4]; 8] {
    let (w1, w2, half_w) = (width / 3, width * 2 / 3, width / 2);
    let (h1, h2) = (height / 3, height * 2 / 3);
    [
        [0, w1, 0, h1],
        [w1, w2, 0, h1],
        [w2, width, 0, h1],
        [0, w1, h1, h2],
        [w2, width, h1, h2],
        [0, w1, h2, height],
        [half_w, w2, h2, height],
        [w2, width, h2, height],
    ]
}

/// Spawn `obstacle_count` large obstacles around the edges of the field
pub fn spawn_round(state: &mut GameState) {
    let buckets = spawn_buckets(state.settings.width, state.settings.height);
    let mut batch = VelocityBatch::default();

    for _ in 0..state.obstacle_count {
        let vel = batch.sample(&mut state.rng, SizeClass::Large.speed());
        let mut shape = random_outline(&mut state.rng);
        let [x0, x1, y0, y1] = buckets[state.rng.random_range(0..buckets.len())];
        shape.center = Vec2::new(
            state.rng.random_range(x0..x1) as f32,
            state.rng.random_range(y0..y1) as f32,
        );
        let id = state.next_entity_id();
        state
            .obstacles
            .push(Obstacle::new(id, shape, vel, SizeClass::Large));
    }

    state.round += 1;
    log::info!("Round {}: {} obstacles", state.round, state.obstacle_count);
    state.events.push(GameEvent::RoundStarted {
        round: state.round,
        obstacles: state.obstacle_count,
    });
}

/// Two fragments one size smaller at `center`; small obstacles just vanish.
/// Returns the number of fragments spawned.
fn split_obstacle(state: &mut GameState, center: Vec2, size: SizeClass) -> usize {
    let Some(child) = size.next_smaller() else {
        return 0;
    };
    let mut batch = VelocityBatch::default();
    for _ in 0..SPLIT_CHILDREN {
        let vel = batch.sample(&mut state.rng, child.speed());
        let mut shape = random_outline(&mut state.rng);
        shape.scale(child.scale());
        shape.center = center;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, shape, vel, child));
    }
    SPLIT_CHILDREN
}

/// Debris burst at a destruction point
fn spawn_particles(state: &mut GameState, center: Vec2) {
    let count = state.rng.random_range(PARTICLE_MIN_COUNT..=PARTICLE_MAX_COUNT);
    let mut batch = VelocityBatch::default();
    for _ in 0..count {
        let vel = batch.sample(&mut state.rng, PARTICLE_MAX_SPEED);
        let timer = state.rng.random_range(PARTICLE_MIN_LIFE..=PARTICLE_MAX_LIFE) as f32;
        state.particles.push(Particle {
            pos: center,
            vel,
            timer,
        });
    }
}
