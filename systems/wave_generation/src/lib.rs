#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave generation system.
//!
//! Every requested round is answered with a shuffled spawn queue whose
//! composition grows with the round number. Bosses join every fifth round.

use std::iter;

use polygon_defence_core::{boss_count, Command, Event, MobSpec, MobTier};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_SHUFFLE: &str = "wave-shuffle";

/// Configuration parameters required to construct the wave generation system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided shuffle seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed every round's shuffle is derived from.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Number of mobs of a single tier in a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierCount {
    /// Tier the count refers to.
    pub tier: MobTier,
    /// Number of mobs of the tier.
    pub count: u32,
}

/// Pure system that answers wave requests with spawn queues.
#[derive(Debug)]
pub struct WaveGeneration {
    rng_seed: u64,
}

impl WaveGeneration {
    /// Creates a new wave generation system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_seed: config.rng_seed,
        }
    }

    /// Consumes `WaveRequested` events and emits matching `StartWave` commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::WaveRequested { round } = event {
                out.push(Command::StartWave {
                    round: *round,
                    spawn_queue: self.generate(*round),
                });
            }
        }
    }

    /// Builds the shuffled spawn queue of the provided round.
    #[must_use]
    pub fn generate(&self, round: u32) -> Vec<MobSpec> {
        let composition = wave_composition(round);
        let mut queue = Vec::with_capacity(wave_size(&composition));
        for entry in &composition {
            queue.extend(iter::repeat(entry.tier.spec()).take(entry.count as usize));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(derive_round_seed(self.rng_seed, round));
        queue.shuffle(&mut rng);
        queue
    }
}

/// Per-tier mob counts of the provided round, in tier order.
///
/// Regular tiers scale with `ceil(round × multiplier)`; tiers that would
/// contribute no mob are omitted.
#[must_use]
pub fn wave_composition(round: u32) -> Vec<TierCount> {
    let mut composition: Vec<TierCount> = MobTier::BASE
        .iter()
        .filter_map(|tier| {
            let tenths = tier.wave_multiplier_tenths()?;
            Some(TierCount {
                tier: *tier,
                count: ceil_tenths(round, tenths),
            })
        })
        .filter(|entry| entry.count > 0)
        .collect();

    let bosses = boss_count(round);
    if bosses > 0 {
        composition.push(TierCount {
            tier: MobTier::Boss,
            count: bosses,
        });
    }
    composition
}

fn ceil_tenths(round: u32, tenths: u32) -> u32 {
    round.saturating_mul(tenths).saturating_add(9) / 10
}

fn wave_size(composition: &[TierCount]) -> usize {
    composition
        .iter()
        .map(|entry| entry.count as usize)
        .sum()
}

fn derive_round_seed(global_seed: u64, round: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(round.to_le_bytes());
    hasher.update(RNG_STREAM_SHUFFLE.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
