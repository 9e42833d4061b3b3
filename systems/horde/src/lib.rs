#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mob population and its per-frame behaviour.
//!
//! The [`Horde`] owns every mob together with the navigator they share.
//! Each update advances animation and state timers, picks a movement vector
//! from the flow field (or straight at the target when the field has nothing
//! to offer), applies it in two half-steps, resolves collisions and runs the
//! melee swing against the target. Strikes and revivals are reported as core
//! events for the session to forward.

mod combat;
mod mob;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use spooknloot_core::{
    Colliders, ConfigError, Event, MobIndex, MobKind, MobView, Rect, Vec2,
};
use spooknloot_system_collision::{resolve, ColliderSource};
use spooknloot_system_navigation::{FlowFieldView, Navigator, NavigatorConfig};

pub use combat::DamageOutcome;
pub use mob::MobState;

use crate::mob::Mob;

/// Tuning for mob behaviour. Frame counts are measured in updates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HordeConfig {
    /// Pixels travelled per update.
    pub move_speed: f32,
    /// Mobs closer than this stop walking.
    pub engagement_min: f32,
    /// Mobs farther than this ignore the target.
    pub engagement_max: f32,
    /// Distance at which a swing starts.
    pub attack_range: f32,
    /// Length of a swing.
    pub attack_frames: u32,
    /// Minimum frames between two swing starts.
    pub attack_cooldown_frames: u32,
    /// Damage carried by a landed swing.
    pub strike_damage: f32,
    /// Length of the hurt flash.
    pub hurt_frames: u32,
    /// Length of the death animation.
    pub death_frames: u32,
    /// Whether dead mobs rise again with full health once the death animation ends.
    pub revive_after_death: bool,
    /// Updates between walk-cycle frames.
    pub animation_period: u32,
    /// Frames in the walk cycle.
    pub animation_frames: u32,
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.8,
            engagement_min: 8.0,
            engagement_max: 180.0,
            attack_range: 14.0,
            attack_frames: 30,
            attack_cooldown_frames: 60,
            strike_damage: 0.1,
            hurt_frames: 6,
            death_frames: 120,
            revive_after_death: true,
            animation_period: 10,
            animation_frames: 4,
        }
    }
}

impl HordeConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_speed <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "move_speed",
            });
        }
        if self.attack_range <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "attack_range",
            });
        }
        if self.engagement_min < 0.0 || self.engagement_min >= self.engagement_max {
            return Err(ConfigError::EngagementBand {
                min: self.engagement_min,
                max: self.engagement_max,
            });
        }
        if self.attack_frames == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "attack_frames",
            });
        }
        if self.death_frames == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "death_frames",
            });
        }
        if self.animation_period == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "animation_period",
            });
        }
        if self.animation_frames == 0 {
            return Err(ConfigError::NonPositive {
                field: "animation_frames",
            });
        }
        Ok(())
    }
}

/// Frames into a swing, counted from its start, at which the blow may land.
const STRIKE_WINDOW_START: u32 = 3;
const STRIKE_WINDOW_END: u32 = 6;

/// Explicit obstacles take precedence over overworld tiles.
struct Solids<'a> {
    obstacles: &'a [Rect],
    tiles: &'a Colliders,
}

impl ColliderSource for Solids<'_> {
    fn overlaps(&self, hitbox: &Rect) -> bool {
        if self.obstacles.is_empty() {
            self.tiles.overlaps(hitbox)
        } else {
            self.obstacles.overlaps(hitbox)
        }
    }
}

/// Owns the mob population and drives it every frame.
#[derive(Clone, Debug)]
pub struct Horde {
    config: HordeConfig,
    mobs: Vec<Mob>,
    navigator: Navigator,
    tile_colliders: Colliders,
    frame: u64,
}

impl Horde {
    /// Creates an empty horde.
    #[must_use]
    pub fn new(config: HordeConfig, navigator: NavigatorConfig) -> Self {
        Self {
            config,
            mobs: Vec::new(),
            navigator: Navigator::new(navigator),
            tile_colliders: Colliders::None,
            frame: 0,
        }
    }

    /// Installs explicit colliders and activates flow-field steering.
    pub fn set_external_colliders(&mut self, colliders: Vec<Rect>) {
        self.navigator.set_obstacles(colliders);
    }

    /// Removes explicit colliders; mobs steer directly and collide with tiles.
    pub fn clear_external_colliders(&mut self) {
        self.navigator.clear_obstacles();
    }

    /// Installs the tile colliders used while no explicit colliders are set.
    pub fn set_tile_colliders(&mut self, colliders: Colliders) {
        self.tile_colliders = colliders;
    }

    /// Navigator shared by the population.
    #[must_use]
    pub const fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Read-only view of the shared flow field.
    #[must_use]
    pub fn flow_field(&self) -> FlowFieldView<'_> {
        self.navigator.view()
    }

    /// Adds a mob with its sprite's top-left corner at `position`.
    pub fn spawn(&mut self, kind: MobKind, position: Vec2) -> MobIndex {
        self.mobs.push(Mob::spawn(kind, position));
        MobIndex::new(self.mobs.len() - 1)
    }

    /// Adds one mob per position and returns how many were added.
    pub fn spawn_at(&mut self, kind: MobKind, positions: &[Vec2]) -> usize {
        self.mobs
            .extend(positions.iter().map(|position| Mob::spawn(kind, *position)));
        positions.len()
    }

    /// Removes every mob. Indices handed out earlier become stale.
    pub fn reset(&mut self) {
        self.mobs.clear();
    }

    /// Number of mobs, dead or alive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mobs.len()
    }

    /// Reports whether the population is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mobs.is_empty()
    }

    /// Reports whether at least one mob is alive.
    #[must_use]
    pub fn is_any_alive(&self) -> bool {
        self.mobs.iter().any(|mob| !mob.is_dead())
    }

    /// Living mob closest to `target`, measured from hitbox centers.
    #[must_use]
    pub fn closest(&self, target: Vec2) -> Option<MobIndex> {
        combat::closest(&self.mobs, target).map(|(index, _)| index)
    }

    /// Living mob closest to `target` if it lies within `reach`.
    #[must_use]
    pub fn closest_within(&self, target: Vec2, reach: f32) -> Option<MobIndex> {
        combat::closest(&self.mobs, target)
            .filter(|(_, distance)| *distance <= reach)
            .map(|(index, _)| index)
    }

    /// Hitbox center of a mob, or the zero vector for stale indices.
    #[must_use]
    pub fn hitbox_center(&self, index: MobIndex) -> Vec2 {
        self.mobs
            .get(index.get())
            .map_or(Vec2::ZERO, Mob::hitbox_center)
    }

    /// Current and maximum health of a mob.
    #[must_use]
    pub fn health(&self, index: MobIndex) -> Option<(f32, f32)> {
        self.mobs
            .get(index.get())
            .map(|mob| (mob.health, mob.max_health))
    }

    /// Behaviour state of a mob.
    #[must_use]
    pub fn state(&self, index: MobIndex) -> Option<MobState> {
        self.mobs.get(index.get()).map(|mob| mob.state)
    }

    /// Render snapshots of every mob in index order.
    #[must_use]
    pub fn view(&self) -> MobView {
        MobView::from_snapshots(
            self.mobs
                .iter()
                .enumerate()
                .map(|(index, mob)| mob.snapshot(MobIndex::new(index)))
                .collect(),
        )
    }

    /// Applies damage to a mob. Stale indices and dead mobs are ignored.
    pub fn damage(&mut self, index: MobIndex, amount: f32) -> DamageOutcome {
        let Some(mob) = self.mobs.get_mut(index.get()) else {
            return DamageOutcome::Ignored;
        };
        combat::apply_damage(
            mob,
            index,
            amount,
            self.config.hurt_frames,
            self.config.death_frames,
        )
    }

    /// Advances every mob by one frame toward `target`.
    ///
    /// Landed swings are reported as [`Event::PlayerStruck`], mobs rising
    /// after their death animation as [`Event::MobRevived`].
    pub fn update(&mut self, target: Vec2, out: &mut Vec<Event>) {
        self.frame = self.frame.wrapping_add(1);
        if self.navigator.tick(target) {
            trace!("horde navigator rebuilt on frame {}", self.frame);
        }

        let Self {
            config,
            mobs,
            navigator,
            tile_colliders,
            frame,
        } = self;
        let solids = Solids {
            obstacles: navigator.obstacles(),
            tiles: tile_colliders,
        };

        for (index, mob) in mobs.iter_mut().enumerate() {
            let index = MobIndex::new(index);
            match mob.state {
                MobState::Dead { remaining } => {
                    revive_countdown(config, mob, index, remaining, out);
                    continue;
                }
                MobState::Damaged { remaining } => {
                    mob.advance_animation(config.animation_period, config.animation_frames);
                    mob.refresh_hitbox();
                    let remaining = remaining.saturating_sub(1);
                    mob.state = if remaining == 0 {
                        MobState::Idle
                    } else {
                        MobState::Damaged { remaining }
                    };
                    continue;
                }
                MobState::Attacking { remaining } => {
                    mob.advance_animation(config.animation_period, config.animation_frames);
                    mob.refresh_hitbox();
                    swing(config, mob, index, remaining, out);
                    continue;
                }
                MobState::Idle | MobState::Moving => {}
            }

            mob.advance_animation(config.animation_period, config.animation_frames);
            mob.refresh_hitbox();

            let to_target = target - mob.hitbox_center();
            let distance = to_target.length();

            if distance <= config.attack_range && cooldown_elapsed(config, mob, *frame) {
                mob.face(to_target);
                mob.state = MobState::Attacking {
                    remaining: config.attack_frames,
                };
                mob.last_attack = Some(*frame);
                mob.swing_landed = false;
                continue;
            }

            if distance <= config.engagement_min || distance >= config.engagement_max {
                mob.state = MobState::Idle;
                continue;
            }

            let sampled = navigator.sample(mob.hitbox_center());
            let direction = sampled.unwrap_or_else(|| to_target.normalize_or_zero());
            if direction == Vec2::ZERO {
                mob.state = MobState::Idle;
                continue;
            }

            mob.face(direction);
            let before = mob.position;
            step(config, mob, direction, &solids);
            if sampled.is_some() && mob.position == before {
                if let Some(center) = navigator.cell_center(mob.hitbox_center()) {
                    align(config, mob, direction, center, &solids);
                }
            }
            mob.state = MobState::Moving;
        }
    }
}

fn cooldown_elapsed(config: &HordeConfig, mob: &Mob, frame: u64) -> bool {
    mob.last_attack.map_or(true, |started| {
        frame.wrapping_sub(started) >= u64::from(config.attack_cooldown_frames)
    })
}

/// Moves in two half-steps, then resolves against the position held before
/// the first one.
fn step(config: &HordeConfig, mob: &mut Mob, direction: Vec2, solids: &Solids<'_>) {
    let previous = mob.position;
    let half = direction * config.move_speed * 0.5;

    mob.position += half;
    mob.refresh_hitbox();
    mob.position += half;
    mob.refresh_hitbox();

    let resolution = resolve(previous, mob.position, &mob.kind.hitbox(), solids);
    mob.position = resolution.position;
    mob.refresh_hitbox();
}

/// Slides a mob whose field step was fully blocked toward the middle of its
/// cell along the other axis, so its hitbox lines up with the corridor ahead.
fn align(
    config: &HordeConfig,
    mob: &mut Mob,
    direction: Vec2,
    cell_center: Vec2,
    solids: &Solids<'_>,
) {
    let offset = cell_center - mob.hitbox_center();
    let limit = config.move_speed;
    let nudge = if direction.x != 0.0 {
        Vec2::new(0.0, offset.y.max(-limit).min(limit))
    } else {
        Vec2::new(offset.x.max(-limit).min(limit), 0.0)
    };
    if nudge == Vec2::ZERO {
        return;
    }

    let previous = mob.position;
    let resolution = resolve(previous, previous + nudge, &mob.kind.hitbox(), solids);
    mob.position = resolution.position;
    mob.refresh_hitbox();
}

fn swing(config: &HordeConfig, mob: &mut Mob, index: MobIndex, remaining: u32, out: &mut Vec<Event>) {
    let remaining = remaining.saturating_sub(1);
    let elapsed = config.attack_frames.saturating_sub(remaining);

    if !mob.swing_landed && (STRIKE_WINDOW_START..=STRIKE_WINDOW_END).contains(&elapsed) {
        mob.swing_landed = true;
        out.push(Event::PlayerStruck {
            mob: index,
            damage: config.strike_damage,
        });
    }

    mob.state = if remaining == 0 {
        MobState::Idle
    } else {
        MobState::Attacking { remaining }
    };
}

fn revive_countdown(
    config: &HordeConfig,
    mob: &mut Mob,
    index: MobIndex,
    remaining: u32,
    out: &mut Vec<Event>,
) {
    let remaining = remaining.saturating_sub(1);
    mob.state = MobState::Dead { remaining };
    if remaining > 0 || !config.revive_after_death {
        return;
    }

    mob.health = mob.max_health;
    mob.state = MobState::Idle;
    mob.swing_landed = false;
    debug!("mob {} revived", index.get());
    out.push(Event::MobRevived { mob: index });
}
