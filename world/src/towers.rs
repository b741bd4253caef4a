//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use polygon_defence_core::{Playfield, TowerId, TowerSnapshot, TowerSpotId, WorldPoint};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Spot the tower occupies.
    pub(crate) spot: TowerSpotId,
    /// Simulated time accumulated since the tower last fired.
    pub(crate) since_last_attack: Duration,
}

impl TowerState {
    /// Center of the tower on the provided playfield.
    pub(crate) fn position(&self, playfield: Playfield) -> WorldPoint {
        self.spot
            .position()
            .map(|point| point.to_world(playfield))
            .unwrap_or_default()
    }

    pub(crate) fn snapshot(&self, playfield: Playfield) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            spot: self.spot,
            position: self.position(playfield),
            since_last_attack: self.since_last_attack,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Builds a tower on the spot, returning its identifier.
    pub(crate) fn insert(&mut self, spot: TowerSpotId) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(
            id,
            TowerState {
                id,
                spot,
                since_last_attack: Duration::ZERO,
            },
        );
        id
    }

    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Adds elapsed simulated time to every cooldown timer.
    pub(crate) fn accumulate(&mut self, elapsed: Duration) {
        for tower in self.entries.values_mut() {
            tower.since_last_attack = tower.since_last_attack.saturating_add(elapsed);
        }
    }

    /// Removes every tower while keeping identifiers unique across sessions.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygon_defence_core::DEFAULT_PLAYFIELD;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn identifiers_keep_increasing_after_clear() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(TowerSpotId::new(0));
        registry.clear();
        let second = registry.insert(TowerSpotId::new(0));

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn accumulate_advances_every_cooldown() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert(TowerSpotId::new(3));
        let _ = registry.insert(TowerSpotId::new(4));

        registry.accumulate(Duration::from_millis(700));
        registry.accumulate(Duration::from_millis(600));

        assert!(registry
            .iter()
            .all(|tower| tower.snapshot(DEFAULT_PLAYFIELD).is_ready()));
    }

    #[test]
    fn tower_position_follows_spot_table() {
        let mut registry = TowerRegistry::new();
        let tower = registry.insert(TowerSpotId::new(0));
        let state = registry.get_mut(tower).expect("tower registered");

        assert_eq!(
            state.position(Playfield::new(1_000.0, 500.0)),
            WorldPoint::new(200.0, 150.0)
        );
    }
}
