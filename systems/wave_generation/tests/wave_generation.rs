use std::collections::BTreeMap;

use polygon_defence_core::{Command, Event, MobTier};
use polygon_defence_system_wave_generation::{wave_composition, Config, WaveGeneration};

fn tier_counts(round: u32, seed: u64) -> BTreeMap<MobTier, u32> {
    let generation = WaveGeneration::new(Config::new(seed));
    let mut counts = BTreeMap::new();
    for spec in generation.generate(round) {
        *counts.entry(spec.tier()).or_insert(0) += 1;
    }
    counts
}

#[test]
fn fifth_round_queues_twenty_nine_mobs() {
    let generation = WaveGeneration::new(Config::new(0));
    let queue = generation.generate(5);

    assert_eq!(queue.len(), 29, "28 regular mobs plus one boss");
    let counts = tier_counts(5, 0);
    assert_eq!(counts.get(&MobTier::Triangle), Some(&8));
    assert_eq!(counts.get(&MobTier::Square), Some(&6));
    assert_eq!(counts.get(&MobTier::Pentagon), Some(&5));
    assert_eq!(counts.get(&MobTier::Hexagon), Some(&4));
    assert_eq!(counts.get(&MobTier::Heptagon), Some(&3));
    assert_eq!(counts.get(&MobTier::Octagon), Some(&2));
    assert_eq!(counts.get(&MobTier::Boss), Some(&1));
}

#[test]
fn bosses_appear_only_on_every_fifth_round() {
    for round in 1..=30 {
        let bosses = tier_counts(round, 11)
            .get(&MobTier::Boss)
            .copied()
            .unwrap_or(0);
        let expected = if round % 5 == 0 { round / 5 } else { 0 };
        assert_eq!(bosses, expected, "unexpected boss count in round {round}");
    }
}

#[test]
fn queue_length_matches_composition() {
    for round in 1..=25 {
        let expected: u32 = wave_composition(round)
            .iter()
            .map(|entry| entry.count)
            .sum();
        let generation = WaveGeneration::new(Config::new(round.into()));
        assert_eq!(generation.generate(round).len(), expected as usize);
    }
}

#[test]
fn per_tier_counts_never_shrink_between_rounds() {
    let mut previous = tier_counts(1, 3);
    for round in 2..=40 {
        let current = tier_counts(round, 3);
        for tier in MobTier::BASE {
            let before = previous.get(&tier).copied().unwrap_or(0);
            let after = current.get(&tier).copied().unwrap_or(0);
            assert!(
                after >= before,
                "{tier:?} shrank from {before} to {after} in round {round}"
            );
        }
        previous = current;
    }
}

#[test]
fn identical_seeds_replay_identical_orders() {
    let first = WaveGeneration::new(Config::new(0xfeed_beef)).generate(12);
    let second = WaveGeneration::new(Config::new(0xfeed_beef)).generate(12);
    let other = WaveGeneration::new(Config::new(0x0bad_cafe)).generate(12);

    assert_eq!(first, second);
    assert_eq!(first.len(), other.len());
    assert_ne!(first, other, "different seeds should shuffle differently");
}

#[test]
fn wave_requests_are_answered_with_start_commands() {
    let mut generation = WaveGeneration::new(Config::new(42));
    let mut commands = Vec::new();

    generation.handle(
        &[
            Event::TimeAdvanced {
                dt: std::time::Duration::from_millis(16),
            },
            Event::WaveRequested { round: 3 },
        ],
        &mut commands,
    );

    match commands.as_slice() {
        [Command::StartWave { round, spawn_queue }] => {
            assert_eq!(*round, 3);
            assert_eq!(*spawn_queue, generation.generate(3));
        }
        other => panic!("unexpected commands emitted: {other:?}"),
    }
}
