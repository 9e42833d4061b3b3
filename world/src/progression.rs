use log::info;
use spooknloot_core::Event;

use crate::config::ProgressionConfig;

/// What the session should do after a dungeon tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    Stay,
    NextLevel,
    EnterBoss,
}

/// Exit visibility and clear counting for the active run.
#[derive(Clone, Debug)]
pub(crate) struct Progression {
    config: ProgressionConfig,
    exit_cooldown: u32,
    clear_streak: u32,
    exit_visible: bool,
    levels_cleared: u32,
}

impl Progression {
    pub(crate) const fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            exit_cooldown: 0,
            clear_streak: 0,
            exit_visible: false,
            levels_cleared: 0,
        }
    }

    pub(crate) const fn levels_cleared(&self) -> u32 {
        self.levels_cleared
    }

    pub(crate) const fn is_exit_visible(&self) -> bool {
        self.exit_visible
    }

    /// Prepares for a freshly generated level.
    pub(crate) fn arm(&mut self) {
        self.exit_cooldown = self.config.exit_cooldown_frames;
        self.clear_streak = 0;
        self.exit_visible = false;
    }

    /// Forgets the run; called on player death.
    pub(crate) fn reset(&mut self) {
        self.arm();
        self.exit_cooldown = 0;
        self.levels_cleared = 0;
    }

    /// Advances one dungeon tick.
    pub(crate) fn observe(
        &mut self,
        any_alive: bool,
        player_on_exit: bool,
        out: &mut Vec<Event>,
    ) -> Verdict {
        self.exit_cooldown = self.exit_cooldown.saturating_sub(1);

        if any_alive {
            self.clear_streak = 0;
            if self.exit_visible {
                self.exit_visible = false;
                out.push(Event::ExitHidden);
            }
        } else {
            self.clear_streak = self
                .clear_streak
                .saturating_add(1)
                .min(self.config.clear_confirm_frames);
            if !self.exit_visible && self.clear_streak >= self.config.clear_confirm_frames {
                self.exit_visible = true;
                out.push(Event::ExitRevealed);
            }
        }

        if self.exit_cooldown > 0 || any_alive || !self.exit_visible || !player_on_exit {
            return Verdict::Stay;
        }

        self.levels_cleared = self.levels_cleared.saturating_add(1);
        info!("level cleared ({} this run)", self.levels_cleared);
        out.push(Event::LevelCleared {
            cleared: self.levels_cleared,
        });

        if self.levels_cleared >= self.config.levels_before_boss {
            Verdict::EnterBoss
        } else {
            Verdict::NextLevel
        }
    }
}
