//! Player registry: device identifier -> current ship
//!
//! Iteration follows join order, which keeps collision checks deterministic.
//! One entry is the local player and can never be removed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::state::Ship;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRegistry {
    ships: IndexMap<String, Ship>,
    local_id: String,
}

impl PlayerRegistry {
    /// Registry holding just the local player's ship
    pub fn new(local: Ship) -> Self {
        let local_id = local.device_id.clone();
        let mut ships = IndexMap::new();
        ships.insert(local_id.clone(), local);
        Self { ships, local_id }
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn is_local(&self, device_id: &str) -> bool {
        self.local_id == device_id
    }

    pub fn local(&self) -> &Ship {
        &self.ships[self.local_id.as_str()]
    }

    pub fn local_mut(&mut self) -> &mut Ship {
        let id = self.local_id.as_str();
        self.ships
            .get_mut(id)
            .unwrap_or_else(|| panic!("local player {id:?} missing from registry"))
    }

    pub fn get(&self, device_id: &str) -> Option<&Ship> {
        self.ships.get(device_id)
    }

    pub fn get_mut(&mut self, device_id: &str) -> Option<&mut Ship> {
        self.ships.get_mut(device_id)
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.ships.contains_key(device_id)
    }

    /// Add a ship under its own device id. Returns false if the id is taken.
    pub fn insert(&mut self, ship: Ship) -> bool {
        if self.ships.contains_key(&ship.device_id) {
            return false;
        }
        self.ships.insert(ship.device_id.clone(), ship);
        true
    }

    /// Swap in a new ship for an already registered id, keeping its slot.
    ///
    /// Panics if the id is not registered.
    pub fn replace(&mut self, ship: Ship) {
        let slot = self
            .ships
            .get_mut(&ship.device_id)
            .unwrap_or_else(|| panic!("replacing unknown device {:?}", ship.device_id));
        *slot = ship;
    }

    /// Rebuild every ship in place
    pub fn rebuild(&mut self, mut build: impl FnMut(&Ship) -> Ship) {
        for ship in self.ships.values_mut() {
            *ship = build(ship);
        }
    }

    /// Remove a remote player. Panics for the local player.
    pub fn remove(&mut self, device_id: &str) -> Option<Ship> {
        assert!(
            !self.is_local(device_id),
            "the local player cannot be removed"
        );
        self.ships.shift_remove(device_id)
    }

    /// Add points to `device_id`, or to the local player if that id is unknown.
    /// Returns the id actually credited.
    pub fn credit(&mut self, device_id: &str, points: i64) -> String {
        let credited = if self.ships.contains_key(device_id) {
            device_id.to_owned()
        } else {
            self.local_id.clone()
        };
        if let Some(ship) = self.ships.get_mut(credited.as_str()) {
            ship.score += points;
        }
        credited
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ship> {
        self.ships.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const PLAYFIELD: Vec2 = Vec2::new(650.0, 650.0);

    fn registry() -> PlayerRegistry {
        let mut players = PlayerRegistry::new(Ship::new("local", PLAYFIELD));
        players.insert(Ship::new("device_1", PLAYFIELD));
        players.insert(Ship::new("device_2", PLAYFIELD));
        players
    }

    #[test]
    fn test_join_order_and_duplicates() {
        let mut players = registry();
        assert!(!players.insert(Ship::new("device_1", PLAYFIELD)));
        let ids: Vec<&str> = players.iter().map(|s| s.device_id.as_str()).collect();
        assert_eq!(ids, ["local", "device_1", "device_2"]);
        assert_eq!(players.local_id(), "local");
    }

    #[test]
    fn test_credit_falls_back_to_local() {
        let mut players = registry();
        assert_eq!(players.credit("device_2", 30), "device_2");
        assert_eq!(players.credit("ghost", 20), "local");
        assert_eq!(players.get("device_2").map(|s| s.score), Some(30));
        assert_eq!(players.local().score, 20);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut players = registry();
        let mut fresh = Ship::new("device_1", PLAYFIELD);
        fresh.score = 99;
        players.replace(fresh);
        let second = players.iter().nth(1).map(|s| (s.device_id.clone(), s.score));
        assert_eq!(second, Some(("device_1".to_string(), 99)));
    }

    #[test]
    fn test_remove_remote() {
        let mut players = registry();
        assert!(players.remove("device_1").is_some());
        assert!(players.remove("device_1").is_none());
        assert_eq!(players.len(), 2);
    }

    #[test]
    #[should_panic(expected = "local player cannot be removed")]
    fn test_remove_local_panics() {
        registry().remove("local");
    }
}
