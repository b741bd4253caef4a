//! Headless report of the waves a seed produces.

use std::io::Write;

use anyhow::{ensure, Context, Result};
use polygon_defence_core::{spawn_delay, MobTier};
use polygon_defence_system_wave_generation::{
    wave_composition, Config as WaveGenerationConfig, WaveGeneration,
};
use serde::Serialize;

/// Composition and spawn order of a single round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct WaveReport {
    round: u32,
    spawn_delay_ms: u64,
    total: usize,
    composition: Vec<TierEntry>,
    queue: Vec<MobTier>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
struct TierEntry {
    tier: MobTier,
    count: u32,
}

/// Builds the reports of every round in `from..=to`.
pub(crate) fn wave_reports(seed: u64, from: u32, to: u32) -> Result<Vec<WaveReport>> {
    ensure!(from >= 1, "rounds start at 1, got {from}");
    ensure!(from <= to, "empty round range {from}..={to}");

    let generation = WaveGeneration::new(WaveGenerationConfig::new(seed));
    Ok((from..=to)
        .map(|round| {
            let queue: Vec<MobTier> = generation
                .generate(round)
                .into_iter()
                .map(|spec| spec.tier())
                .collect();
            WaveReport {
                round,
                spawn_delay_ms: u64::try_from(spawn_delay(round).as_millis()).unwrap_or(u64::MAX),
                total: queue.len(),
                composition: wave_composition(round)
                    .into_iter()
                    .map(|entry| TierEntry {
                        tier: entry.tier,
                        count: entry.count,
                    })
                    .collect(),
                queue,
            }
        })
        .collect())
}

/// Writes one JSON document per line.
pub(crate) fn write_reports<W: Write>(reports: &[WaveReport], mut sink: W) -> Result<()> {
    for report in reports {
        serde_json::to_writer(&mut sink, report)
            .with_context(|| format!("failed to encode round {}", report.round))?;
        sink.write_all(b"\n").context("failed to write wave report")?;
    }
    sink.flush().context("failed to flush wave report")
}
