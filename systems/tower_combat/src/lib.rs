#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks targets for ready towers and emits firing commands.

use polygon_defence_core::{
    Command, MobId, MobView, SessionPhase, TowerView, WorldPoint, TOWER_DAMAGE, TOWER_RANGE,
};

/// Mob as the combat pass expects it to be once earlier shots land.
#[derive(Clone, Copy, Debug)]
struct PredictedMob {
    id: MobId,
    position: WorldPoint,
    health: u32,
}

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    predicted: Vec<PredictedMob>,
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FireTower` entries for towers ready to fire.
    ///
    /// Towers are visited in identifier order. Each one targets the nearest
    /// mob within range that earlier towers of the same pass have not
    /// already killed.
    pub fn handle(
        &mut self,
        phase: SessionPhase,
        towers: &TowerView,
        mobs: &MobView,
        out: &mut Vec<Command>,
    ) {
        if phase != SessionPhase::Playing || mobs.is_empty() {
            return;
        }

        self.predicted.clear();
        self.predicted.extend(mobs.iter().map(|mob| PredictedMob {
            id: mob.id,
            position: mob.position,
            health: mob.health,
        }));
        self.scratch.clear();

        for tower in towers.iter().filter(|tower| tower.is_ready()) {
            if let Some(index) = select_target(tower.position, &self.predicted) {
                let target = &mut self.predicted[index];
                target.health = target.health.saturating_sub(TOWER_DAMAGE);
                self.scratch.push(Command::FireTower {
                    tower: tower.id,
                    mob: target.id,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn select_target(origin: WorldPoint, mobs: &[PredictedMob]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, mob) in mobs.iter().enumerate() {
        if mob.health == 0 {
            continue;
        }
        let distance = origin.distance_to(mob.position);
        if distance > TOWER_RANGE {
            continue;
        }
        match best {
            Some((_, closest)) if closest <= distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}
