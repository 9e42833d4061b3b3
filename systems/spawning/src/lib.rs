#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system deciding how many mobs appear and where.
//!
//! Dungeon waves grow with every level cleared during a run. The overworld
//! trickles single mobs onto authored spawn tiles at a fixed cadence.

use log::debug;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use spooknloot_core::{CellCoord, ConfigError};

/// Wave sizing and overworld cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawningConfig {
    /// Smallest first wave of a run.
    pub base_min: u32,
    /// Largest first wave of a run; twice this caps later waves.
    pub base_max: u32,
    /// Smallest growth between consecutive waves.
    pub escalation_min: u32,
    /// Largest growth between consecutive waves.
    pub escalation_max: u32,
    /// Frames between overworld spawn batches.
    pub overworld_interval: u32,
    /// Mobs per overworld batch.
    pub overworld_batch: u32,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            base_min: 5,
            base_max: 10,
            escalation_min: 2,
            escalation_max: 5,
            overworld_interval: 500,
            overworld_batch: 1,
        }
    }
}

impl SpawningConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_min > self.base_max {
            return Err(ConfigError::SpawnRange {
                min: self.base_min,
                max: self.base_max,
            });
        }
        if self.escalation_min > self.escalation_max {
            return Err(ConfigError::SpawnRange {
                min: self.escalation_min,
                max: self.escalation_max,
            });
        }
        if self.overworld_interval == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "overworld_interval",
            });
        }
        Ok(())
    }

    /// Largest wave a run can reach.
    #[must_use]
    pub const fn wave_cap(&self) -> u32 {
        self.base_max.saturating_mul(2)
    }
}

/// Stateful spawner shared by a session.
#[derive(Clone, Debug)]
pub struct Spawning {
    config: SpawningConfig,
    wave_size: Option<u32>,
    accumulator: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub const fn new(config: SpawningConfig) -> Self {
        Self {
            config,
            wave_size: None,
            accumulator: 0,
        }
    }

    /// Size of the most recent wave, if one was rolled during this run.
    #[must_use]
    pub const fn current_wave_size(&self) -> Option<u32> {
        self.wave_size
    }

    /// Rolls the size of the next dungeon wave.
    pub fn next_wave_size<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let config = &self.config;
        let size = match self.wave_size {
            None => roll(rng, config.base_min, config.base_max),
            Some(previous) => {
                previous.saturating_add(roll(rng, config.escalation_min, config.escalation_max))
            }
        }
        .min(config.wave_cap());

        debug!("next wave holds {size} mobs");
        self.wave_size = Some(size);
        size
    }

    /// Restarts wave escalation and the overworld cadence.
    pub fn reset(&mut self) {
        self.wave_size = None;
        self.accumulator = 0;
    }

    /// Accumulates elapsed frames and returns how many overworld batches are due.
    pub fn overworld_spawns(&mut self, frames: u32) -> u32 {
        self.accumulator = self.accumulator.saturating_add(frames);
        self.resolve_spawn_attempts()
    }

    /// Picks `batches * overworld_batch` spawn tiles at random.
    pub fn pick_spawn_tiles<R: Rng + ?Sized>(
        &self,
        batches: u32,
        tiles: &[CellCoord],
        rng: &mut R,
        out: &mut Vec<CellCoord>,
    ) {
        if tiles.is_empty() {
            return;
        }

        let count = batches.saturating_mul(self.config.overworld_batch);
        for _ in 0..count {
            if let Some(tile) = tiles.choose(rng) {
                out.push(*tile);
            }
        }
    }

    fn resolve_spawn_attempts(&mut self) -> u32 {
        let interval = self.config.overworld_interval;
        if interval == 0 {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            attempts += 1;
        }
        attempts
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}
