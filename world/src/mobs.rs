//! Mobs walking the path and the helpers walking it backwards.

use std::time::Duration;

use polygon_defence_core::{
    HelperId, HelperRetirement, MobId, MobSnapshot, MobSpec, WorldPoint, HELPER_ATTACK_RADIUS,
    HELPER_DAMAGE_BUDGET, HELPER_HIT_DAMAGE, HELPER_SPEED,
};

use crate::path::PathCurve;

/// Result of damaging a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DamageOutcome {
    /// The mob survived with the provided health.
    Survived(u32),
    /// The hit brought the mob to zero health.
    Destroyed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MobState {
    Alive,
    Destroyed,
    Escaped,
}

/// Live mob travelling from the start of the path to its end.
#[derive(Clone, Debug)]
pub(crate) struct Mob {
    pub(crate) id: MobId,
    spec: MobSpec,
    health: u32,
    distance: f32,
    position: WorldPoint,
    state: MobState,
    spawned_at: Duration,
}

impl Mob {
    /// Places a fresh mob at the start of the path at simulation time `spawned_at`.
    pub(crate) fn spawn(id: MobId, spec: MobSpec, path: &PathCurve, spawned_at: Duration) -> Self {
        Self {
            id,
            spec,
            health: spec.max_health(),
            distance: 0.0,
            position: path.point_at_fraction(0.0),
            state: MobState::Alive,
            spawned_at,
        }
    }

    /// Share of the window `tick_start..until` the mob spent on the path.
    pub(crate) fn time_on_path(&self, tick_start: Duration, until: Duration) -> Duration {
        until.saturating_sub(self.spawned_at.max(tick_start))
    }

    /// Moves the mob forward, returning `true` when it reached the end of the path.
    pub(crate) fn advance(&mut self, elapsed: Duration, path: &PathCurve) -> bool {
        if self.state != MobState::Alive {
            return false;
        }

        let length = path.length();
        self.distance += self.spec.speed() * elapsed.as_secs_f32();
        if self.distance >= length {
            self.distance = length;
            self.position = path.point_at_fraction(1.0);
            self.state = MobState::Escaped;
            return true;
        }

        self.position = path.point_at_fraction(self.distance / length);
        false
    }

    /// Subtracts health, saturating at zero.
    ///
    /// Damage against a mob that is no longer alive has no effect and reports
    /// `None`.
    pub(crate) fn apply_damage(&mut self, amount: u32) -> Option<DamageOutcome> {
        if self.state != MobState::Alive {
            return None;
        }

        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.state = MobState::Destroyed;
            return Some(DamageOutcome::Destroyed);
        }
        Some(DamageOutcome::Survived(self.health))
    }

    /// Keeps the travelled fraction when the path is rebuilt for a new playfield.
    pub(crate) fn rescale(&mut self, previous_length: f32, path: &PathCurve) {
        let fraction = progress_fraction(self.distance, previous_length);
        self.distance = fraction * path.length();
        self.position = path.point_at_fraction(fraction);
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state == MobState::Alive
    }

    pub(crate) fn spec(&self) -> &MobSpec {
        &self.spec
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn snapshot(&self) -> MobSnapshot {
        MobSnapshot {
            id: self.id,
            spec: self.spec,
            health: self.health,
            distance: self.distance,
            position: self.position,
        }
    }
}

/// Mobile defender that walks from the end of the path back to its start,
/// damaging every mob it passes.
#[derive(Clone, Debug)]
pub(crate) struct Helper {
    pub(crate) id: HelperId,
    distance: f32,
    position: WorldPoint,
    damage_dealt: u32,
    retirement: Option<HelperRetirement>,
}

impl Helper {
    /// Places a fresh helper at the end of the path.
    pub(crate) fn hire(id: HelperId, path: &PathCurve) -> Self {
        Self {
            id,
            distance: path.length(),
            position: path.point_at_fraction(1.0),
            damage_dealt: 0,
            retirement: None,
        }
    }

    /// Moves the helper backwards, returning `true` when it reached the start.
    pub(crate) fn advance(&mut self, elapsed: Duration, path: &PathCurve) -> bool {
        if self.retirement.is_some() {
            return false;
        }

        self.distance -= HELPER_SPEED * elapsed.as_secs_f32();
        if self.distance <= 0.0 {
            self.distance = 0.0;
            self.position = path.point_at_fraction(0.0);
            self.retirement = Some(HelperRetirement::ReachedStart);
            return true;
        }

        self.position = path.point_at_fraction(self.distance / path.length());
        false
    }

    /// Hits the mob if it is within reach and budget remains.
    ///
    /// The helper retires the moment its cumulative damage reaches the budget.
    pub(crate) fn strike(&mut self, mob: &mut Mob) -> Option<DamageOutcome> {
        if self.retirement.is_some() || !mob.is_alive() {
            return None;
        }
        if self.position.distance_to(mob.position()) > HELPER_ATTACK_RADIUS {
            return None;
        }

        let damage = HELPER_HIT_DAMAGE.min(HELPER_DAMAGE_BUDGET.saturating_sub(self.damage_dealt));
        let outcome = mob.apply_damage(damage)?;
        self.damage_dealt = self.damage_dealt.saturating_add(damage);
        if self.damage_dealt >= HELPER_DAMAGE_BUDGET {
            self.retirement = Some(HelperRetirement::BudgetSpent);
        }
        Some(outcome)
    }

    /// Keeps the travelled fraction when the path is rebuilt for a new playfield.
    pub(crate) fn rescale(&mut self, previous_length: f32, path: &PathCurve) {
        let fraction = progress_fraction(self.distance, previous_length);
        self.distance = fraction * path.length();
        self.position = path.point_at_fraction(fraction);
    }

    pub(crate) fn retirement(&self) -> Option<HelperRetirement> {
        self.retirement
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn damage_dealt(&self) -> u32 {
        self.damage_dealt
    }
}

fn progress_fraction(distance: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    (distance / length).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polygon_defence_core::MobTier;

    fn straight_path(length: f32) -> PathCurve {
        PathCurve::from_points(vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(length / 2.0, 0.0),
            WorldPoint::new(length, 0.0),
        ])
    }

    #[test]
    fn repeated_hits_reduce_health_until_destroyed() {
        let path = straight_path(1_000.0);
        let mut mob = Mob::spawn(MobId::new(0), MobTier::Triangle.spec(), &path, Duration::ZERO);

        assert_eq!(mob.apply_damage(10), Some(DamageOutcome::Survived(20)));
        assert_eq!(mob.apply_damage(10), Some(DamageOutcome::Survived(10)));
        assert_eq!(mob.apply_damage(25), Some(DamageOutcome::Destroyed));
        assert_eq!(
            mob.apply_damage(10),
            None,
            "destroyed mobs must not be destroyed twice"
        );
        assert_eq!(mob.snapshot().health, 0);
    }

    #[test]
    fn mob_escapes_once_it_covers_the_path() {
        let path = straight_path(200.0);
        let mut mob = Mob::spawn(MobId::new(1), MobTier::Square.spec(), &path, Duration::ZERO);

        assert!(!mob.advance(Duration::from_secs(1), &path));
        assert!((mob.snapshot().distance - 100.0).abs() < 0.01);
        assert!(mob.advance(Duration::from_secs(2), &path));
        assert!(!mob.is_alive());
        assert!(
            !mob.advance(Duration::from_secs(1), &path),
            "escape is reported only once"
        );
    }

    #[test]
    fn helper_walks_backwards_and_retires_at_start() {
        let path = straight_path(150.0);
        let mut helper = Helper::hire(HelperId::new(0), &path);

        assert!(!helper.advance(Duration::from_secs(1), &path));
        assert!(helper.advance(Duration::from_secs(1), &path));
        assert_eq!(helper.retirement(), Some(HelperRetirement::ReachedStart));
    }

    #[test]
    fn helper_never_exceeds_its_damage_budget() {
        let path = straight_path(1_000.0);
        let mut helper = Helper::hire(HelperId::new(0), &path);
        let mut boss = Mob::spawn(MobId::new(9), MobTier::Boss.spec(), &path, Duration::ZERO);
        boss.distance = 1_000.0;
        boss.position = path.point_at_fraction(1.0);

        let mut hits = 0;
        while helper.strike(&mut boss).is_some() {
            hits += 1;
        }

        assert_eq!(hits, 8, "150 budget spent as seven 20-point hits and one 10-point hit");
        assert_eq!(helper.damage_dealt(), HELPER_DAMAGE_BUDGET);
        assert_eq!(helper.retirement(), Some(HelperRetirement::BudgetSpent));
        assert_eq!(boss.snapshot().health, 450 - 150);
    }

    #[test]
    fn last_budget_points_go_to_the_first_mob_only() {
        let path = straight_path(1_000.0);
        let mut helper = Helper::hire(HelperId::new(0), &path);
        helper.damage_dealt = 140;
        let mut bosses = [MobId::new(0), MobId::new(1)].map(|id| {
            let mut boss = Mob::spawn(id, MobTier::Boss.spec(), &path, Duration::ZERO);
            boss.distance = 1_000.0;
            boss.position = path.point_at_fraction(1.0);
            boss
        });

        let [first, second] = &mut bosses;
        assert_eq!(helper.strike(first), Some(DamageOutcome::Survived(440)));
        assert_eq!(helper.strike(second), None);

        assert_eq!(helper.damage_dealt(), HELPER_DAMAGE_BUDGET);
        assert_eq!(helper.retirement(), Some(HelperRetirement::BudgetSpent));
        assert_eq!(bosses[0].snapshot().health, 440);
        assert_eq!(bosses[1].snapshot().health, 450);
    }

    #[test]
    fn late_spawns_only_count_time_after_their_spawn() {
        let path = straight_path(1_000.0);
        let mob = Mob::spawn(
            MobId::new(0),
            MobTier::Octagon.spec(),
            &path,
            Duration::from_millis(1_450),
        );

        assert_eq!(
            mob.time_on_path(Duration::from_millis(1_000), Duration::from_millis(2_000)),
            Duration::from_millis(550)
        );
        assert_eq!(
            mob.time_on_path(Duration::from_millis(2_000), Duration::from_millis(2_100)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn helper_ignores_mobs_out_of_reach() {
        let path = straight_path(1_000.0);
        let mut helper = Helper::hire(HelperId::new(0), &path);
        let mut mob = Mob::spawn(MobId::new(0), MobTier::Octagon.spec(), &path, Duration::ZERO);

        assert_eq!(helper.strike(&mut mob), None);
        assert_eq!(helper.damage_dealt(), 0);
    }

    #[test]
    fn rescale_preserves_travelled_fraction() {
        let short = straight_path(100.0);
        let long = straight_path(400.0);
        let mut mob = Mob::spawn(MobId::new(0), MobTier::Hexagon.spec(), &short, Duration::ZERO);
        let _ = mob.advance(Duration::from_millis(500), &short);

        mob.rescale(short.length(), &long);

        assert!((mob.snapshot().distance - 160.0).abs() < 0.5);
    }
}
