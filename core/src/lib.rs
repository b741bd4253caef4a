#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Polygon Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, read immutable
//! views such as [`MobView`] and [`TowerView`], and respond exclusively with
//! new command batches.
//!
//! Every gameplay constant lives here so adapters, systems and the world agree
//! on the same numbers.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title used by adapters when presenting the game.
pub const GAME_TITLE: &str = "Polygon Defence";

/// Gold granted to a brand new session.
pub const STARTING_GOLD: Gold = Gold::new(700);

/// Gold granted after a lost session returns to difficulty selection.
pub const RESET_GOLD: Gold = Gold::new(500);

/// Price of a single tower.
pub const TOWER_COST: Gold = Gold::new(150);

/// Price of a single helper.
pub const HELPER_COST: Gold = Gold::new(30);

/// Gold awarded for every destroyed mob.
pub const MOB_GOLD_REWARD: Gold = Gold::new(2);

/// Player health lost whenever a mob escapes.
pub const ESCAPE_PENALTY: u32 = 10;

/// Maximum distance between a tower and its target, in world units.
pub const TOWER_RANGE: f32 = 150.0;

/// Damage dealt by a single tower shot.
pub const TOWER_DAMAGE: u32 = 10;

/// Time a tower must accumulate between shots.
pub const TOWER_COOLDOWN: Duration = Duration::from_millis(1_300);

/// Speed of a helper walking the path backwards, in world units per second.
pub const HELPER_SPEED: f32 = 100.0;

/// Total damage a helper may deal before retiring.
pub const HELPER_DAMAGE_BUDGET: u32 = 150;

/// Damage a helper deals to each nearby mob per tick.
pub const HELPER_HIT_DAMAGE: u32 = 20;

/// Radius around a helper within which mobs are damaged.
pub const HELPER_ATTACK_RADIUS: f32 = 50.0;

/// Pause between a cleared wave and the request for the next one.
pub const WAVE_DELAY: Duration = Duration::from_millis(5_000);

/// Pause between entering game over and returning to difficulty selection.
pub const GAME_OVER_RESET_DELAY: Duration = Duration::from_millis(3_000);

/// Lifetime of the line drawn between a firing tower and its target.
pub const ATTACK_LINE_DURATION: Duration = Duration::from_millis(100);

/// Lifetime of a regular banner message.
pub const BANNER_DURATION: Duration = Duration::from_millis(2_000);

/// Lifetime of the banner announcing a boss wave.
pub const BOSS_BANNER_DURATION: Duration = Duration::from_millis(4_000);

/// Every round divisible by this interval includes bosses.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Spawn interval used for the first rounds before acceleration kicks in.
pub const BASE_SPAWN_DELAY: Duration = Duration::from_millis(1_500);

/// Lower bound on the interval between two spawns.
pub const MIN_SPAWN_DELAY: Duration = Duration::from_millis(500);

/// Reduction of the spawn interval per round.
pub const SPAWN_DELAY_STEP: Duration = Duration::from_millis(50);

/// Playfield dimensions used until an adapter reports its viewport.
pub const DEFAULT_PLAYFIELD: Playfield = Playfield::new(1_280.0, 720.0);

/// Candidate tower positions expressed as fractions of the playfield.
pub const TOWER_SPOTS: [NormalizedPoint; 16] = [
    NormalizedPoint::new(0.2, 0.3),
    NormalizedPoint::new(0.4, 0.48),
    NormalizedPoint::new(0.85, 0.13),
    NormalizedPoint::new(0.7, 0.5),
    NormalizedPoint::new(0.4, 0.22),
    NormalizedPoint::new(0.09, 0.5),
    NormalizedPoint::new(0.23, 0.7),
    NormalizedPoint::new(0.21, 0.52),
    NormalizedPoint::new(0.56, 0.8),
    NormalizedPoint::new(0.45, 0.73),
    NormalizedPoint::new(0.79, 0.3),
    NormalizedPoint::new(0.6, 0.3),
    NormalizedPoint::new(0.8, 0.83),
    NormalizedPoint::new(0.1, 0.73),
    NormalizedPoint::new(0.33, 0.84),
    NormalizedPoint::new(0.54, 0.52),
];

/// Control points of the mob path expressed as fractions of the playfield.
///
/// The first and last points sit slightly outside the playfield so mobs walk
/// in from the left edge and leave through the right edge.
pub const PATH_CONTROL_POINTS: [NormalizedPoint; 9] = [
    NormalizedPoint::new(-0.01, 0.07),
    NormalizedPoint::new(0.8, 0.2),
    NormalizedPoint::new(0.8, 0.4),
    NormalizedPoint::new(0.2, 0.4),
    NormalizedPoint::new(0.2, 0.8),
    NormalizedPoint::new(0.5, 0.6),
    NormalizedPoint::new(0.5, 0.8),
    NormalizedPoint::new(0.5, 0.9),
    NormalizedPoint::new(1.01, 0.93),
];

/// Computes the interval between two spawns of the provided round.
#[must_use]
pub fn spawn_delay(round: u32) -> Duration {
    BASE_SPAWN_DELAY
        .saturating_sub(SPAWN_DELAY_STEP.saturating_mul(round))
        .max(MIN_SPAWN_DELAY)
}

/// Reports whether the provided round injects bosses into its wave.
#[must_use]
pub const fn is_boss_round(round: u32) -> bool {
    round > 0 && round % BOSS_WAVE_INTERVAL == 0
}

/// Number of bosses appended to the wave of the provided round.
#[must_use]
pub const fn boss_count(round: u32) -> u32 {
    if is_boss_round(round) {
        round / BOSS_WAVE_INTERVAL
    } else {
        0
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the playfield, rescaling the path and every entity on it.
    ConfigurePlayfield {
        /// New playfield width in world units.
        width: f32,
        /// New playfield height in world units.
        height: f32,
    },
    /// Starts a session at the provided difficulty.
    SelectDifficulty {
        /// Difficulty chosen by the player.
        difficulty: Difficulty,
    },
    /// Advances the simulation clock by the provided real-time delta.
    ///
    /// The world scales the delta by the active [`GameSpeed`].
    Tick {
        /// Real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Launches the wave of the provided round with a generated spawn queue.
    StartWave {
        /// Round the wave belongs to.
        round: u32,
        /// Mobs to spawn, in spawn order.
        spawn_queue: Vec<MobSpec>,
    },
    /// Buys a tower on the provided spot.
    PlaceTower {
        /// Spot the tower should occupy.
        spot: TowerSpotId,
    },
    /// Buys a helper that walks the path backwards from its end.
    HireHelper,
    /// Requests that a ready tower shoots at a mob.
    FireTower {
        /// Tower that fires.
        tower: TowerId,
        /// Mob that receives the damage.
        mob: MobId,
    },
    /// Switches between normal and double simulation speed.
    ToggleSpeed,
    /// Abandons the session and restores a fresh world.
    EndSession,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the playfield was resized.
    PlayfieldConfigured {
        /// Playfield that is now active.
        playfield: Playfield,
    },
    /// Announces that the player picked a difficulty and the session began.
    SessionStarted {
        /// Difficulty chosen by the player.
        difficulty: Difficulty,
        /// Player health at the start of the session.
        health: Health,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Scaled duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Asks wave generation to produce the spawn queue for a round.
    WaveRequested {
        /// Round whose wave should be generated.
        round: u32,
    },
    /// Confirms that a wave started spawning.
    WaveStarted {
        /// Round the wave belongs to.
        round: u32,
        /// Number of mobs the wave will spawn.
        mob_count: u32,
        /// Interval between two spawns.
        spawn_delay: Duration,
    },
    /// Confirms that a mob entered the path.
    MobSpawned {
        /// Identifier assigned to the mob.
        mob: MobId,
        /// Tier of the spawned mob.
        tier: MobTier,
    },
    /// Reports that a mob took damage and survived.
    MobDamaged {
        /// Identifier of the damaged mob.
        mob: MobId,
        /// Health left after the hit.
        remaining: u32,
    },
    /// Reports that a mob ran out of health.
    MobDestroyed {
        /// Identifier of the destroyed mob.
        mob: MobId,
        /// Gold granted to the player.
        reward: Gold,
    },
    /// Reports that a mob reached the end of the path.
    MobEscaped {
        /// Identifier of the escaped mob.
        mob: MobId,
        /// Player health after the penalty.
        remaining_health: Health,
    },
    /// Reports that every mob of the wave was resolved.
    WaveCleared {
        /// Round that was cleared.
        round: u32,
    },
    /// Confirms that a tower was bought.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Spot the tower occupies.
        spot: TowerSpotId,
    },
    /// Confirms that a helper was bought.
    HelperHired {
        /// Identifier assigned to the helper.
        helper: HelperId,
    },
    /// Reports that a helper left the path.
    HelperRetired {
        /// Identifier of the retired helper.
        helper: HelperId,
        /// Why the helper retired.
        reason: HelperRetirement,
    },
    /// Confirms that a tower shot a mob.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Mob that was hit.
        mob: MobId,
    },
    /// Reports that a player action was refused.
    ActionRejected {
        /// Action the player attempted.
        action: PlayerAction,
        /// Why the action was refused.
        reason: ActionError,
    },
    /// Announces a new simulation speed.
    SpeedChanged {
        /// Speed that is now active.
        speed: GameSpeed,
    },
    /// Announces that a banner became visible.
    BannerShown {
        /// Message carried by the banner.
        message: BannerMessage,
    },
    /// Announces that the player ran out of health.
    GameOver {
        /// Round that was in progress when the session was lost.
        round: u32,
    },
    /// Announces that a lost session was cleared and difficulty selection resumed.
    SessionReset,
    /// Announces that the player abandoned the session.
    SessionEnded,
}

/// Difficulty levels offered on the selection screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Generous health pool.
    Easy,
    /// Regular health pool.
    Medium,
    /// Small health pool.
    Hard,
}

impl Difficulty {
    /// Every difficulty in the order shown on the selection screen.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Player health granted when the session starts.
    #[must_use]
    pub const fn starting_health(self) -> Health {
        match self {
            Self::Easy => Health::new(200),
            Self::Medium => Health::new(100),
            Self::Hard => Health::new(50),
        }
    }

    /// Label shown on the selection screen.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Lifecycle phase of a play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting for the player to pick a difficulty.
    #[default]
    SelectingDifficulty,
    /// Waves are running.
    Playing,
    /// The player lost; the world resets shortly.
    GameOver,
}

/// Simulation speed multiplier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameSpeed {
    /// Real-time simulation.
    #[default]
    Normal,
    /// Simulation runs twice as fast as real time.
    Double,
}

impl GameSpeed {
    /// Multiplier applied to every tick.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
        }
    }

    /// Returns the other speed.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Normal,
        }
    }

    /// Label shown on the speed button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "x1",
            Self::Double => "x2",
        }
    }
}

/// Amount of gold owned or required.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Gold(u32);

impl Gold {
    /// No gold at all.
    pub const ZERO: Gold = Gold(0);

    /// Wraps an amount of gold.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self(amount)
    }

    /// Retrieves the raw amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Subtracts a price, returning `None` when the balance is insufficient.
    #[must_use]
    pub const fn checked_sub(self, price: Gold) -> Option<Gold> {
        match self.0.checked_sub(price.0) {
            Some(amount) => Some(Gold(amount)),
            None => None,
        }
    }

    /// Adds a reward, saturating at the numeric upper bound.
    #[must_use]
    pub const fn saturating_add(self, reward: Gold) -> Gold {
        Gold(self.0.saturating_add(reward.0))
    }
}

impl fmt::Display for Gold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player health pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Health(u32);

impl Health {
    /// Wraps a health amount.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self(amount)
    }

    /// Retrieves the raw amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Removes health without dropping below zero.
    #[must_use]
    pub const fn saturating_sub(self, amount: u32) -> Health {
        Health(self.0.saturating_sub(amount))
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MobId(u32);

impl MobId {
    /// Creates a new mob identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a helper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HelperId(u32);

impl HelperId {
    /// Creates a new helper identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index of a candidate tower position within [`TOWER_SPOTS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TowerSpotId(u32);

impl TowerSpotId {
    /// Creates a new spot identifier with the provided index.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Normalized position of the spot, if the index is known.
    #[must_use]
    pub fn position(&self) -> Option<NormalizedPoint> {
        TOWER_SPOTS.get(self.0 as usize).copied()
    }

    /// Iterates over every spot identifier in table order.
    pub fn all() -> impl Iterator<Item = TowerSpotId> {
        (0..TOWER_SPOTS.len() as u32).map(TowerSpotId)
    }
}

impl fmt::Display for TowerSpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point expressed as fractions of the playfield width and height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizedPoint {
    x: f32,
    y: f32,
}

impl NormalizedPoint {
    /// Creates a normalized point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Fraction of the playfield width.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Fraction of the playfield height.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Projects the point onto a concrete playfield.
    #[must_use]
    pub fn to_world(&self, playfield: Playfield) -> WorldPoint {
        WorldPoint::new(self.x * playfield.width(), self.y * playfield.height())
    }
}

/// Point expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a world point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rectangle that hosts the path, towers and every moving entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playfield {
    width: f32,
    height: f32,
}

impl Playfield {
    /// Creates a playfield description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Reports whether both dimensions are finite and positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Larger of the two dimensions; every size-dependent radius derives from it.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.width.max(self.height)
    }

    /// Radius of a tower spot, also used for pointer hit tests.
    #[must_use]
    pub fn spot_radius(&self) -> f32 {
        self.max_dimension() * 0.025
    }

    /// Radius of a placed tower.
    #[must_use]
    pub fn tower_radius(&self) -> f32 {
        self.max_dimension() * 0.03
    }

    /// Stroke width of the drawn path.
    #[must_use]
    pub fn path_width(&self) -> f32 {
        self.max_dimension() * 0.05
    }
}

impl Default for Playfield {
    fn default() -> Self {
        DEFAULT_PLAYFIELD
    }
}

/// Visual color assigned to a mob tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl MobColor {
    /// Creates a new mob color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Mob archetypes, named after the polygon they are drawn as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MobTier {
    /// Three sides, fastest and frailest.
    Triangle,
    /// Four sides.
    Square,
    /// Five sides.
    Pentagon,
    /// Six sides.
    Hexagon,
    /// Seven sides.
    Heptagon,
    /// Eight sides, slowest regular mob.
    Octagon,
    /// Ten-sided boss injected every fifth round.
    Boss,
}

impl MobTier {
    /// Regular tiers that appear in every wave, in table order.
    pub const BASE: [MobTier; 6] = [
        MobTier::Triangle,
        MobTier::Square,
        MobTier::Pentagon,
        MobTier::Hexagon,
        MobTier::Heptagon,
        MobTier::Octagon,
    ];

    /// Static parameters of the tier.
    #[must_use]
    pub const fn spec(self) -> MobSpec {
        match self {
            Self::Triangle => MobSpec::new(self, 3, 30, 110.0, MobColor::from_rgb(0xff, 0x00, 0x00)),
            Self::Square => MobSpec::new(self, 4, 40, 100.0, MobColor::from_rgb(0xff, 0xa5, 0x00)),
            Self::Pentagon => MobSpec::new(self, 5, 50, 90.0, MobColor::from_rgb(0xff, 0xff, 0x00)),
            Self::Hexagon => MobSpec::new(self, 6, 60, 80.0, MobColor::from_rgb(0x00, 0x80, 0x00)),
            Self::Heptagon => MobSpec::new(self, 7, 70, 70.0, MobColor::from_rgb(0x00, 0x00, 0xff)),
            Self::Octagon => MobSpec::new(self, 8, 80, 60.0, MobColor::from_rgb(0x80, 0x00, 0x80)),
            Self::Boss => MobSpec::new(self, 10, 450, 50.0, MobColor::from_rgb(0xff, 0x00, 0xff)),
        }
    }

    /// Per-round count multiplier of a regular tier, in tenths.
    ///
    /// Bosses return `None`; their count follows [`boss_count`].
    #[must_use]
    pub const fn wave_multiplier_tenths(self) -> Option<u32> {
        match self {
            Self::Triangle => Some(15),
            Self::Square => Some(12),
            Self::Pentagon => Some(10),
            Self::Hexagon => Some(8),
            Self::Heptagon => Some(6),
            Self::Octagon => Some(4),
            Self::Boss => None,
        }
    }
}

/// Immutable description of a mob type.
///
/// Every spawned mob owns its own copy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobSpec {
    tier: MobTier,
    sides: u8,
    max_health: u32,
    speed: f32,
    color: MobColor,
    gold_reward: Gold,
}

impl MobSpec {
    const fn new(tier: MobTier, sides: u8, max_health: u32, speed: f32, color: MobColor) -> Self {
        Self {
            tier,
            sides,
            max_health,
            speed,
            color,
            gold_reward: MOB_GOLD_REWARD,
        }
    }

    /// Tier these parameters belong to.
    #[must_use]
    pub const fn tier(&self) -> MobTier {
        self.tier
    }

    /// Number of polygon sides used when drawing the mob.
    #[must_use]
    pub const fn sides(&self) -> u8 {
        self.sides
    }

    /// Health the mob spawns with.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Travel speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Base color of the mob.
    #[must_use]
    pub const fn color(&self) -> MobColor {
        self.color
    }

    /// Gold granted when the mob is destroyed.
    #[must_use]
    pub const fn gold_reward(&self) -> Gold {
        self.gold_reward
    }
}

/// Actions a player can pay for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Buying a tower.
    PlaceTower,
    /// Buying a helper.
    HireHelper,
}

impl PlayerAction {
    /// Price of the action.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::PlaceTower => TOWER_COST,
            Self::HireHelper => HELPER_COST,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaceTower => f.write_str("placing a tower"),
            Self::HireHelper => f.write_str("hiring a helper"),
        }
    }
}

/// Reasons a player action is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The player cannot afford the action.
    #[error("{action} costs {required} gold but only {available} is available")]
    InsufficientFunds {
        /// Action the player attempted.
        action: PlayerAction,
        /// Price of the action.
        required: Gold,
        /// Gold owned when the action was attempted.
        available: Gold,
    },
    /// The spot is occupied or does not exist.
    #[error("tower spot {spot} is not available")]
    SpotUnavailable {
        /// Spot named by the request.
        spot: TowerSpotId,
    },
}

/// Why a helper left the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HelperRetirement {
    /// The helper walked back to the start of the path.
    ReachedStart,
    /// The helper dealt its entire damage budget.
    BudgetSpent,
}

/// Transient messages shown across the top of the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BannerMessage {
    /// A boss round started.
    BossWave {
        /// Number of bosses in the wave.
        bosses: u32,
    },
    /// The player tried to buy something without enough gold.
    NotEnoughGold {
        /// Action that was refused.
        action: PlayerAction,
    },
    /// The player ran out of health.
    GameOver,
}

impl BannerMessage {
    /// How long the banner stays visible while fading out.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::BossWave { .. } => BOSS_BANNER_DURATION,
            Self::NotEnoughGold { .. } | Self::GameOver => BANNER_DURATION,
        }
    }
}

impl fmt::Display for BannerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BossWave { bosses } => {
                let suffix = if *bosses > 1 { "es" } else { "" };
                write!(f, "Boss Wave: {bosses} Boss{suffix} Incoming!")
            }
            Self::NotEnoughGold {
                action: PlayerAction::PlaceTower,
            } => f.write_str("Not enough gold to place a tower."),
            Self::NotEnoughGold {
                action: PlayerAction::HireHelper,
            } => f.write_str("Not enough gold to hire help."),
            Self::GameOver => f.write_str("Game Over"),
        }
    }
}

/// Immutable representation of a single mob used by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobSnapshot {
    /// Unique identifier assigned to the mob.
    pub id: MobId,
    /// Static parameters of the mob.
    pub spec: MobSpec,
    /// Remaining health.
    pub health: u32,
    /// Distance travelled along the path.
    pub distance: f32,
    /// Current position in world units.
    pub position: WorldPoint,
}

impl MobSnapshot {
    /// Remaining health as a fraction of the maximum.
    #[must_use]
    pub fn health_fraction(&self) -> f32 {
        let max = self.spec.max_health();
        if max == 0 {
            return 0.0;
        }
        self.health as f32 / max as f32
    }
}

/// Read-only view of every live mob, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct MobView {
    snapshots: Vec<MobSnapshot>,
}

impl MobView {
    /// Builds a view from snapshots, sorting them by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<MobSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &MobSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured mobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no mob is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<MobSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used by systems.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Unique identifier assigned to the tower.
    pub id: TowerId,
    /// Spot the tower occupies.
    pub spot: TowerSpotId,
    /// Position in world units.
    pub position: WorldPoint,
    /// Time accumulated since the tower last fired.
    pub since_last_attack: Duration,
}

impl TowerSnapshot {
    /// Reports whether the tower accumulated its full cooldown.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.since_last_attack >= TOWER_COOLDOWN
    }
}

/// Read-only view of every tower, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Builds a view from snapshots, sorting them by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Free tower spot projected onto the active playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotSnapshot {
    /// Identifier of the spot.
    pub id: TowerSpotId,
    /// Center of the spot in world units.
    pub position: WorldPoint,
}
