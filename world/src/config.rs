use serde::{Deserialize, Serialize};
use spooknloot_core::ConfigError;
use spooknloot_system_horde::HordeConfig;
use spooknloot_system_level::{DecorConfig, LevelConfig};
use spooknloot_system_navigation::NavigatorConfig;
use spooknloot_system_spawning::SpawningConfig;

/// Timing of level clears and the road to the boss arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Ticks after entering a level before its exit can be taken.
    pub exit_cooldown_frames: u32,
    /// Consecutive ticks without a living mob before the exit is revealed.
    pub clear_confirm_frames: u32,
    /// Cleared levels after which the boss arena opens.
    pub levels_before_boss: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exit_cooldown_frames: 20,
            clear_confirm_frames: 6,
            levels_before_boss: 5,
        }
    }
}

impl ProgressionConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels_before_boss == 0 {
            return Err(ConfigError::NonPositive {
                field: "levels_before_boss",
            });
        }
        Ok(())
    }
}

/// Every tunable of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed of the session RNG; entropy is used when absent.
    pub seed: Option<u64>,
    /// Dungeon layout.
    pub level: LevelConfig,
    /// Cosmetic level content.
    pub decor: DecorConfig,
    /// Flow-field tuning shared by the mobs.
    pub navigator: NavigatorConfig,
    /// Mob behaviour.
    pub horde: HordeConfig,
    /// Wave sizing and overworld cadence.
    pub spawning: SpawningConfig,
    /// Level clears and boss unlock.
    pub progression: ProgressionConfig,
}

impl WorldConfig {
    /// Validates every section, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        self.decor.validate()?;
        self.navigator.validate()?;
        self.horde.validate()?;
        self.spawning.validate()?;
        self.progression.validate()
    }
}
