//! Scripted player used to drive headless sessions.

use log::info;
use spooknloot_core::{Command, Event, Hitbox, Mode, Rect, Vec2};
use spooknloot_system_collision::resolve;
use spooknloot_system_navigation::{Navigator, NavigatorConfig};
use spooknloot_world::{query, World};

const HITBOX_SIZE: Vec2 = Vec2::new(6.0, 6.0);
const MOVE_SPEED: f32 = 1.2;
const MAX_HEALTH: f32 = 1.0;
const STRIKE_REACH: f32 = 20.0;
const STRIKE_DAMAGE: f32 = 1.0;
const STRIKE_COOLDOWN: u32 = 20;
const STANDOFF: f32 = 10.0;

/// Totals reported once the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub(crate) strikes_taken: u32,
    pub(crate) swings: u32,
    pub(crate) mobs_slain: u32,
    pub(crate) potions: u32,
    pub(crate) levels_cleared: u32,
    pub(crate) deaths: u32,
}

/// Player stand-in that hunts mobs and heads for the exit once it opens.
#[derive(Debug)]
pub(crate) struct Autopilot {
    position: Vec2,
    health: f32,
    navigator: Navigator,
    cooldown: u32,
    tally: Tally,
}

impl Autopilot {
    pub(crate) fn new(navigator: NavigatorConfig) -> Self {
        Self {
            position: Vec2::ZERO,
            health: MAX_HEALTH,
            navigator: Navigator::new(navigator),
            cooldown: 0,
            tally: Tally::default(),
        }
    }

    pub(crate) fn hitbox(&self) -> Rect {
        Rect::from_origin_and_size(self.position, HITBOX_SIZE)
    }

    pub(crate) const fn tally(&self) -> Tally {
        self.tally
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Swings at the closest mob when the previous swing has recovered.
    pub(crate) fn strike(&mut self, world: &World) -> Option<Command> {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.cooldown > 0 {
            return None;
        }

        let from = self.hitbox().center();
        let mob = query::closest_mob(world, from)?;
        if query::mob_hitbox_center(world, mob).distance(from) > STRIKE_REACH {
            return None;
        }

        self.cooldown = STRIKE_COOLDOWN;
        self.tally.swings += 1;
        Some(Command::StrikeClosest {
            from,
            reach: STRIKE_REACH,
            amount: STRIKE_DAMAGE,
        })
    }

    /// Walks one frame toward the closest mob, or the exit once it is shown.
    pub(crate) fn steer(&mut self, world: &World) {
        let center = self.hitbox().center();
        let goal = match query::closest_mob(world, center) {
            Some(mob) => query::mob_hitbox_center(world, mob),
            None if query::is_exit_visible(world) => match query::exit(world) {
                Some(exit) => exit.center(),
                None => return,
            },
            None => return,
        };

        let to_goal = goal - center;
        if to_goal.length() <= STANDOFF {
            return;
        }

        let _ = self.navigator.tick(goal);
        let direction = self
            .navigator
            .sample(center)
            .unwrap_or_else(|| to_goal.normalize_or_zero());
        let proposed = self.position + direction * MOVE_SPEED;
        let hitbox = Hitbox::new(Vec2::ZERO, HITBOX_SIZE);
        self.position = resolve(self.position, proposed, &hitbox, self.navigator.obstacles()).position;
    }

    /// Reacts to what the world reported during the last command.
    pub(crate) fn observe(&mut self, world: &World, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerRelocated { position } => self.position = *position,
                Event::LevelGenerated { .. } | Event::ModeChanged { .. } => {
                    self.navigator.set_obstacles(query::colliders(world).to_vec());
                }
                Event::PlayerStruck { damage, .. } => {
                    self.health -= damage;
                    self.tally.strikes_taken += 1;
                }
                Event::PotionCollected { heal_fraction } => {
                    let heal = (MAX_HEALTH * heal_fraction).min(MAX_HEALTH - self.health);
                    self.health += heal.max(0.0);
                    self.tally.potions += 1;
                }
                Event::MobDied { .. } => self.tally.mobs_slain += 1,
                Event::LevelCleared { cleared } => {
                    self.tally.levels_cleared = self.tally.levels_cleared.max(*cleared);
                }
                _ => {}
            }
        }
        if query::mode(world) == Mode::Overworld {
            self.navigator.clear_obstacles();
        }
    }

    /// Records a death and restores full health for the next run.
    pub(crate) fn respawn(&mut self) {
        self.tally.deaths += 1;
        self.health = MAX_HEALTH;
        self.cooldown = 0;
        info!("player died, {} deaths so far", self.tally.deaths);
    }
}
