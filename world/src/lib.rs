#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Polygon Defence.
//!
//! The world owns the path, every live mob, helper and tower, the player's
//! health and gold, and the session state machine. It only changes in
//! response to [`Command`] values passed to [`apply`], and reports what
//! happened through [`Event`] values.

mod mobs;
mod path;
mod schedule;
mod towers;

use std::{
    collections::{BTreeSet, VecDeque},
    time::Duration,
};

use polygon_defence_core::{
    spawn_delay, ActionError, BannerMessage, Command, Difficulty, Event, GameSpeed, Gold, Health,
    HelperId, HelperRetirement, MobId, MobSpec, MobTier, Playfield, PlayerAction, SessionPhase,
    TowerId, TowerSpotId, WorldPoint, ATTACK_LINE_DURATION, ESCAPE_PENALTY, GAME_OVER_RESET_DELAY,
    RESET_GOLD, STARTING_GOLD, TOWER_DAMAGE, TOWER_RANGE, WAVE_DELAY,
};
use tracing::{debug, info, warn};

use self::{
    mobs::{DamageOutcome, Helper, Mob},
    path::PathCurve,
    schedule::Schedule,
    towers::TowerRegistry,
};

/// Timed transitions driven by the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScheduledAction {
    SpawnNext,
    RequestWave,
    ResetAfterGameOver,
}

/// Player resources tracked across a session.
#[derive(Clone, Copy, Debug)]
struct PlayerState {
    health: Health,
    gold: Gold,
    round: u32,
}

/// Spawn bookkeeping for the wave in progress.
#[derive(Clone, Debug, Default)]
struct WaveProgress {
    queue: VecDeque<MobSpec>,
    mobs_in_wave: u32,
    mobs_spawned: u32,
    spawn_delay: Duration,
    in_progress: bool,
    started: bool,
}

#[derive(Clone, Copy, Debug)]
struct AttackLine {
    tower: TowerId,
    mob: MobId,
    from: WorldPoint,
    to: WorldPoint,
    expires_at: Duration,
}

#[derive(Clone, Copy, Debug)]
struct ActiveBanner {
    message: BannerMessage,
    expires_at: Duration,
}

/// Represents the authoritative Polygon Defence world state.
#[derive(Debug)]
pub struct World {
    playfield: Playfield,
    path: PathCurve,
    phase: SessionPhase,
    difficulty: Option<Difficulty>,
    speed: GameSpeed,
    player: PlayerState,
    wave: WaveProgress,
    schedule: Schedule<ScheduledAction>,
    mobs: Vec<Mob>,
    helpers: Vec<Helper>,
    towers: TowerRegistry,
    available_spots: BTreeSet<TowerSpotId>,
    attack_lines: Vec<AttackLine>,
    banners: Vec<ActiveBanner>,
    next_mob_id: u32,
    next_helper_id: u32,
}

impl World {
    /// Creates a new world waiting for a difficulty on the default playfield.
    #[must_use]
    pub fn new() -> Self {
        let playfield = Playfield::default();
        Self {
            playfield,
            path: PathCurve::new(playfield),
            phase: SessionPhase::SelectingDifficulty,
            difficulty: None,
            speed: GameSpeed::Normal,
            player: PlayerState {
                health: Health::new(0),
                gold: STARTING_GOLD,
                round: 0,
            },
            wave: WaveProgress::default(),
            schedule: Schedule::new(),
            mobs: Vec::new(),
            helpers: Vec::new(),
            towers: TowerRegistry::new(),
            available_spots: TowerSpotId::all().collect(),
            attack_lines: Vec::new(),
            banners: Vec::new(),
            next_mob_id: 0,
            next_helper_id: 0,
        }
    }

    fn now(&self) -> Duration {
        self.schedule.now()
    }

    fn configure_playfield(&mut self, playfield: Playfield, out_events: &mut Vec<Event>) {
        if !playfield.is_valid() {
            warn!(
                width = playfield.width(),
                height = playfield.height(),
                "ignoring degenerate playfield"
            );
            return;
        }
        if playfield == self.playfield {
            return;
        }

        let previous_length = self.path.length();
        self.playfield = playfield;
        self.path = PathCurve::new(playfield);
        for mob in &mut self.mobs {
            mob.rescale(previous_length, &self.path);
        }
        for helper in &mut self.helpers {
            helper.rescale(previous_length, &self.path);
        }
        self.attack_lines.clear();

        debug!(
            width = playfield.width(),
            height = playfield.height(),
            path_length = self.path.length(),
            "playfield resized"
        );
        out_events.push(Event::PlayfieldConfigured { playfield });
    }

    fn select_difficulty(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::SelectingDifficulty {
            debug!(?difficulty, phase = ?self.phase, "difficulty selection ignored");
            return;
        }

        let health = difficulty.starting_health();
        self.difficulty = Some(difficulty);
        self.player.health = health;
        self.phase = SessionPhase::Playing;
        info!(?difficulty, %health, gold = %self.player.gold, "session started");
        out_events.push(Event::SessionStarted { difficulty, health });
        self.request_next_wave(out_events);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.phase == SessionPhase::SelectingDifficulty {
            return;
        }

        let scaled = dt.saturating_mul(self.speed.factor());
        let tick_start = self.now();
        let until = tick_start.saturating_add(scaled);
        out_events.push(Event::TimeAdvanced { dt: scaled });

        while let Some(action) = self.schedule.pop_due(until) {
            self.run_scheduled(action, out_events);
        }
        self.schedule.advance_to(until);

        if self.phase == SessionPhase::Playing {
            self.advance_mobs(tick_start, until, out_events);
        }
        if self.phase == SessionPhase::Playing {
            self.advance_helpers(scaled, out_events);
            self.towers.accumulate(scaled);
            self.check_wave_completion(out_events);
        }

        let now = self.now();
        self.attack_lines.retain(|line| line.expires_at > now);
        self.banners.retain(|banner| banner.expires_at > now);
    }

    fn run_scheduled(&mut self, action: ScheduledAction, out_events: &mut Vec<Event>) {
        match action {
            ScheduledAction::SpawnNext => self.spawn_next(out_events),
            ScheduledAction::RequestWave => self.request_next_wave(out_events),
            ScheduledAction::ResetAfterGameOver => self.reset_after_game_over(out_events),
        }
    }

    fn request_next_wave(&mut self, out_events: &mut Vec<Event>) {
        let round = self.player.round.saturating_add(1);
        debug!(round, "wave requested");
        out_events.push(Event::WaveRequested { round });
    }

    fn start_wave(&mut self, round: u32, spawn_queue: Vec<MobSpec>, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing
            || self.wave.in_progress
            || round != self.player.round.saturating_add(1)
        {
            debug!(round, current = self.player.round, "stale wave start ignored");
            return;
        }

        let delay = spawn_delay(round);
        let mob_count = u32::try_from(spawn_queue.len()).unwrap_or(u32::MAX);
        let bosses = spawn_queue
            .iter()
            .filter(|spec| spec.tier() == MobTier::Boss)
            .count();

        self.player.round = round;
        self.wave = WaveProgress {
            queue: spawn_queue.into(),
            mobs_in_wave: mob_count,
            mobs_spawned: 0,
            spawn_delay: delay,
            in_progress: true,
            started: true,
        };

        info!(round, mob_count, bosses, ?delay, "wave started");
        out_events.push(Event::WaveStarted {
            round,
            mob_count,
            spawn_delay: delay,
        });
        if bosses > 0 {
            let bosses = u32::try_from(bosses).unwrap_or(u32::MAX);
            self.show_banner(BannerMessage::BossWave { bosses }, out_events);
        }

        if self.wave.queue.is_empty() {
            self.check_wave_completion(out_events);
        } else {
            self.schedule
                .schedule_after(delay, ScheduledAction::SpawnNext);
        }
    }

    fn spawn_next(&mut self, out_events: &mut Vec<Event>) {
        let Some(spec) = self.wave.queue.pop_front() else {
            return;
        };

        let id = MobId::new(self.next_mob_id);
        self.next_mob_id = self.next_mob_id.saturating_add(1);
        self.mobs.push(Mob::spawn(id, spec, &self.path, self.now()));
        self.wave.mobs_spawned = self.wave.mobs_spawned.saturating_add(1);
        debug!(mob = id.get(), tier = ?spec.tier(), "mob spawned");
        out_events.push(Event::MobSpawned {
            mob: id,
            tier: spec.tier(),
        });

        if !self.wave.queue.is_empty() {
            self.schedule
                .schedule_after(self.wave.spawn_delay, ScheduledAction::SpawnNext);
        }
    }

    /// Mobs spawned during the tick only walk from their spawn instant on.
    fn advance_mobs(
        &mut self,
        tick_start: Duration,
        until: Duration,
        out_events: &mut Vec<Event>,
    ) {
        let mut health_depleted = false;
        for mob in &mut self.mobs {
            let elapsed = mob.time_on_path(tick_start, until);
            if !mob.advance(elapsed, &self.path) {
                continue;
            }

            self.player.health = self.player.health.saturating_sub(ESCAPE_PENALTY);
            debug!(mob = mob.id.get(), health = %self.player.health, "mob escaped");
            out_events.push(Event::MobEscaped {
                mob: mob.id,
                remaining_health: self.player.health,
            });
            if self.player.health.is_depleted() {
                health_depleted = true;
                break;
            }
        }

        self.mobs.retain(Mob::is_alive);
        if health_depleted {
            self.enter_game_over(out_events);
        }
    }

    fn advance_helpers(&mut self, elapsed: Duration, out_events: &mut Vec<Event>) {
        for helper in &mut self.helpers {
            if helper.advance(elapsed, &self.path) {
                debug!(helper = helper.id.get(), "helper reached the start of the path");
                out_events.push(Event::HelperRetired {
                    helper: helper.id,
                    reason: HelperRetirement::ReachedStart,
                });
            }
        }

        for helper in &mut self.helpers {
            if helper.retirement().is_some() {
                continue;
            }

            for mob in &mut self.mobs {
                let Some(outcome) = helper.strike(mob) else {
                    continue;
                };
                record_damage(mob, outcome, &mut self.player, out_events);

                if helper.retirement() == Some(HelperRetirement::BudgetSpent) {
                    debug!(helper = helper.id.get(), "helper spent its damage budget");
                    out_events.push(Event::HelperRetired {
                        helper: helper.id,
                        reason: HelperRetirement::BudgetSpent,
                    });
                    break;
                }
            }
        }

        self.helpers.retain(|helper| helper.retirement().is_none());
        self.mobs.retain(Mob::is_alive);
    }

    fn check_wave_completion(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave.in_progress || !self.wave.queue.is_empty() || !self.mobs.is_empty() {
            return;
        }

        self.wave.in_progress = false;
        info!(round = self.player.round, gold = %self.player.gold, "wave cleared");
        out_events.push(Event::WaveCleared {
            round: self.player.round,
        });
        self.schedule
            .schedule_after(WAVE_DELAY, ScheduledAction::RequestWave);
    }

    fn place_tower(
        &mut self,
        spot: TowerSpotId,
        out_events: &mut Vec<Event>,
    ) -> Result<TowerId, ActionError> {
        if !self.available_spots.contains(&spot) {
            return Err(ActionError::SpotUnavailable { spot });
        }
        self.player.gold = self.charge(PlayerAction::PlaceTower)?;

        let _ = self.available_spots.remove(&spot);
        let tower = self.towers.insert(spot);
        info!(tower = tower.get(), %spot, gold = %self.player.gold, "tower placed");
        out_events.push(Event::TowerPlaced { tower, spot });
        Ok(tower)
    }

    fn hire_helper(&mut self, out_events: &mut Vec<Event>) -> Result<HelperId, ActionError> {
        self.player.gold = self.charge(PlayerAction::HireHelper)?;

        let helper = HelperId::new(self.next_helper_id);
        self.next_helper_id = self.next_helper_id.saturating_add(1);
        self.helpers.push(Helper::hire(helper, &self.path));
        info!(helper = helper.get(), gold = %self.player.gold, "helper hired");
        out_events.push(Event::HelperHired { helper });
        Ok(helper)
    }

    /// Computes the balance left after paying for the action.
    fn charge(&self, action: PlayerAction) -> Result<Gold, ActionError> {
        let required = action.cost();
        self.player
            .gold
            .checked_sub(required)
            .ok_or(ActionError::InsufficientFunds {
                action,
                required,
                available: self.player.gold,
            })
    }

    fn reject(&mut self, action: PlayerAction, reason: ActionError, out_events: &mut Vec<Event>) {
        warn!(?action, %reason, "player action rejected");
        out_events.push(Event::ActionRejected { action, reason });
        if let ActionError::InsufficientFunds { .. } = reason {
            self.show_banner(BannerMessage::NotEnoughGold { action }, out_events);
        }
    }

    fn fire_tower(&mut self, tower: TowerId, mob: MobId, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        let playfield = self.playfield;
        let now = self.now();
        let Some(state) = self.towers.get_mut(tower) else {
            debug!(tower = tower.get(), "fire request for unknown tower");
            return;
        };
        if !state.snapshot(playfield).is_ready() {
            debug!(tower = tower.get(), "fire request before cooldown elapsed");
            return;
        }
        let Some(target) = self
            .mobs
            .iter_mut()
            .find(|candidate| candidate.id == mob && candidate.is_alive())
        else {
            debug!(tower = tower.get(), mob = mob.get(), "fire request for missing mob");
            return;
        };

        let from = state.position(playfield);
        let to = target.position();
        if from.distance_to(to) > TOWER_RANGE {
            debug!(tower = tower.get(), mob = mob.get(), "fire request out of range");
            return;
        }

        state.since_last_attack = Duration::ZERO;
        out_events.push(Event::TowerFired { tower, mob });
        self.attack_lines.push(AttackLine {
            tower,
            mob,
            from,
            to,
            expires_at: now.saturating_add(ATTACK_LINE_DURATION),
        });

        if let Some(outcome) = target.apply_damage(TOWER_DAMAGE) {
            record_damage(target, outcome, &mut self.player, out_events);
        }

        self.mobs.retain(Mob::is_alive);
        self.check_wave_completion(out_events);
    }

    fn toggle_speed(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        self.speed = self.speed.toggled();
        debug!(speed = ?self.speed, "speed changed");
        out_events.push(Event::SpeedChanged { speed: self.speed });
    }

    fn show_banner(&mut self, message: BannerMessage, out_events: &mut Vec<Event>) {
        self.banners.push(ActiveBanner {
            message,
            expires_at: self.now().saturating_add(message.duration()),
        });
        out_events.push(Event::BannerShown { message });
    }

    fn enter_game_over(&mut self, out_events: &mut Vec<Event>) {
        self.phase = SessionPhase::GameOver;
        self.schedule.cancel_all();
        self.attack_lines.clear();
        info!(round = self.player.round, "game over");
        out_events.push(Event::GameOver {
            round: self.player.round,
        });
        self.show_banner(BannerMessage::GameOver, out_events);
        self.schedule
            .schedule_after(GAME_OVER_RESET_DELAY, ScheduledAction::ResetAfterGameOver);
    }

    fn reset_after_game_over(&mut self, out_events: &mut Vec<Event>) {
        self.clear_session();
        self.player.gold = RESET_GOLD;
        info!(gold = %self.player.gold, "session reset after game over");
        out_events.push(Event::SessionReset);
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        self.clear_session();
        self.player.gold = STARTING_GOLD;
        info!("session ended");
        out_events.push(Event::SessionEnded);
    }

    fn clear_session(&mut self) {
        self.schedule.cancel_all();
        self.phase = SessionPhase::SelectingDifficulty;
        self.difficulty = None;
        self.speed = GameSpeed::Normal;
        self.player.health = Health::new(0);
        self.player.round = 0;
        self.wave = WaveProgress::default();
        self.mobs.clear();
        self.helpers.clear();
        self.towers.clear();
        self.available_spots = TowerSpotId::all().collect();
        self.attack_lines.clear();
        self.banners.clear();
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn record_damage(
    mob: &Mob,
    outcome: DamageOutcome,
    player: &mut PlayerState,
    out_events: &mut Vec<Event>,
) {
    match outcome {
        DamageOutcome::Survived(remaining) => {
            out_events.push(Event::MobDamaged {
                mob: mob.id,
                remaining,
            });
        }
        DamageOutcome::Destroyed => {
            let reward = mob.spec().gold_reward();
            player.gold = player.gold.saturating_add(reward);
            debug!(mob = mob.id.get(), gold = %player.gold, "mob destroyed");
            out_events.push(Event::MobDestroyed {
                mob: mob.id,
                reward,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigurePlayfield { width, height } => {
            world.configure_playfield(Playfield::new(width, height), out_events);
        }
        Command::SelectDifficulty { difficulty } => {
            world.select_difficulty(difficulty, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StartWave { round, spawn_queue } => {
            world.start_wave(round, spawn_queue, out_events);
        }
        Command::PlaceTower { spot } => {
            if world.phase != SessionPhase::Playing {
                return;
            }
            if let Err(reason) = world.place_tower(spot, out_events) {
                world.reject(PlayerAction::PlaceTower, reason, out_events);
            }
        }
        Command::HireHelper => {
            if world.phase != SessionPhase::Playing {
                return;
            }
            if let Err(reason) = world.hire_helper(out_events) {
                world.reject(PlayerAction::HireHelper, reason, out_events);
            }
        }
        Command::FireTower { tower, mob } => world.fire_tower(tower, mob, out_events),
        Command::ToggleSpeed => world.toggle_speed(out_events),
        Command::EndSession => world.end_session(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use polygon_defence_core::{
        BannerMessage, Difficulty, GameSpeed, Gold, Health, HelperId, MobId, MobView, Playfield,
        SessionPhase, SpotSnapshot, TowerId, TowerView, WorldPoint, HELPER_DAMAGE_BUDGET,
    };

    use super::World;

    /// Current lifecycle phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Difficulty chosen for the running session, if any.
    #[must_use]
    pub fn difficulty(world: &World) -> Option<Difficulty> {
        world.difficulty
    }

    /// Active simulation speed.
    #[must_use]
    pub fn speed(world: &World) -> GameSpeed {
        world.speed
    }

    /// Remaining player health.
    #[must_use]
    pub fn health(world: &World) -> Health {
        world.player.health
    }

    /// Gold owned by the player.
    #[must_use]
    pub fn gold(world: &World) -> Gold {
        world.player.gold
    }

    /// Round of the most recently started wave; zero before the first wave.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.player.round
    }

    /// Mobs of the current wave that are either queued or alive.
    ///
    /// Returns `None` until the first wave of the session started.
    #[must_use]
    pub fn mobs_remaining(world: &World) -> Option<u32> {
        if !world.wave.started {
            return None;
        }
        let alive = u32::try_from(world.mobs.len()).unwrap_or(u32::MAX);
        Some(
            world
                .wave
                .mobs_in_wave
                .saturating_sub(world.wave.mobs_spawned)
                .saturating_add(alive),
        )
    }

    /// Active playfield dimensions.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Total length of the mob path.
    #[must_use]
    pub fn path_length(world: &World) -> f32 {
        world.path.length()
    }

    /// Evenly spaced points along the path, suitable for drawing it.
    #[must_use]
    pub fn path_polyline(world: &World, segments: usize) -> Vec<WorldPoint> {
        world.path.polyline(segments)
    }

    /// Value of the simulation clock.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.now()
    }

    /// Number of timed actions waiting on the simulation clock.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.schedule.len()
    }

    /// Captures a read-only view of the live mobs.
    #[must_use]
    pub fn mob_view(world: &World) -> MobView {
        MobView::from_snapshots(world.mobs.iter().map(|mob| mob.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.snapshot(world.playfield))
                .collect(),
        )
    }

    /// Number of placed towers.
    #[must_use]
    pub fn tower_count(world: &World) -> usize {
        world.towers.len()
    }

    /// Tower spots that may still receive a tower, in table order.
    #[must_use]
    pub fn available_spots(world: &World) -> Vec<SpotSnapshot> {
        world
            .available_spots
            .iter()
            .filter_map(|spot| {
                spot.position().map(|position| SpotSnapshot {
                    id: *spot,
                    position: position.to_world(world.playfield),
                })
            })
            .collect()
    }

    /// Captures the live helpers in hiring order.
    #[must_use]
    pub fn helpers(world: &World) -> Vec<HelperSnapshot> {
        world
            .helpers
            .iter()
            .map(|helper| HelperSnapshot {
                id: helper.id,
                position: helper.position(),
                budget_spent: helper.damage_dealt() as f32 / HELPER_DAMAGE_BUDGET as f32,
            })
            .collect()
    }

    /// Lines between towers and the mobs they recently shot.
    #[must_use]
    pub fn attack_lines(world: &World) -> Vec<AttackLineSnapshot> {
        world
            .attack_lines
            .iter()
            .map(|line| AttackLineSnapshot {
                tower: line.tower,
                mob: line.mob,
                from: line.from,
                to: line.to,
            })
            .collect()
    }

    /// Visible banners together with the share of their lifetime still left.
    #[must_use]
    pub fn banners(world: &World) -> Vec<BannerSnapshot> {
        let now = world.now();
        world
            .banners
            .iter()
            .map(|banner| {
                let remaining = banner.expires_at.saturating_sub(now);
                let lifetime = banner.message.duration();
                let remaining_fraction = if lifetime.is_zero() {
                    0.0
                } else {
                    remaining.as_secs_f32() / lifetime.as_secs_f32()
                };
                BannerSnapshot {
                    message: banner.message,
                    remaining_fraction,
                }
            })
            .collect()
    }

    /// Immutable representation of a single helper.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct HelperSnapshot {
        /// Identifier assigned to the helper.
        pub id: HelperId,
        /// Current position in world units.
        pub position: WorldPoint,
        /// Share of the damage budget already dealt, in `[0, 1]`.
        pub budget_spent: f32,
    }

    /// Line drawn between a tower and the mob it shot.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AttackLineSnapshot {
        /// Tower that fired.
        pub tower: TowerId,
        /// Mob that was hit.
        pub mob: MobId,
        /// Tower position when it fired.
        pub from: WorldPoint,
        /// Mob position when it was hit.
        pub to: WorldPoint,
    }

    /// Banner visible on screen.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BannerSnapshot {
        /// Message carried by the banner.
        pub message: BannerMessage,
        /// Share of the banner lifetime still left, in `[0, 1]`.
        pub remaining_fraction: f32,
    }
}
