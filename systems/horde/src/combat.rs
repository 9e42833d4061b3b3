//! Target selection and damage bookkeeping.

use log::debug;
use spooknloot_core::{MobIndex, Vec2};

use crate::mob::{Mob, MobState};

/// Result of applying damage to a mob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageOutcome {
    /// The index was stale or the mob was already dead.
    Ignored,
    /// The mob survived with the provided health.
    Wounded {
        /// Health remaining after the hit.
        health: f32,
    },
    /// The hit brought the mob's health to zero.
    Killed,
}

/// Living mob whose hitbox center lies closest to `target`. Ties keep the
/// lower index.
pub(crate) fn closest(mobs: &[Mob], target: Vec2) -> Option<(MobIndex, f32)> {
    let mut best: Option<(MobIndex, f32)> = None;
    for (index, mob) in mobs.iter().enumerate() {
        if mob.is_dead() || mob.health <= 0.0 {
            continue;
        }

        let distance = mob.hitbox_center().distance(target);
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((MobIndex::new(index), distance));
        }
    }
    best
}

pub(crate) fn apply_damage(
    mob: &mut Mob,
    index: MobIndex,
    amount: f32,
    hurt_frames: u32,
    death_frames: u32,
) -> DamageOutcome {
    if mob.is_dead() {
        return DamageOutcome::Ignored;
    }

    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    mob.health = (mob.health - amount).clamp(0.0, mob.max_health);

    if mob.health <= 0.0 {
        mob.state = MobState::Dead {
            remaining: death_frames,
        };
        mob.swing_landed = false;
        debug!("mob {} died", index.get());
        return DamageOutcome::Killed;
    }

    mob.state = MobState::Damaged {
        remaining: hurt_frames,
    };
    DamageOutcome::Wounded { health: mob.health }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spooknloot_core::MobKind;

    #[test]
    fn closest_skips_dead_mobs() {
        let mut mobs = vec![
            Mob::spawn(MobKind::Ghost, Vec2::new(10.0, 0.0)),
            Mob::spawn(MobKind::Ghost, Vec2::new(40.0, 0.0)),
        ];
        let target = mobs[0].hitbox_center();
        assert_eq!(closest(&mobs, target).map(|(index, _)| index), Some(MobIndex::new(0)));

        let _ = apply_damage(&mut mobs[0], MobIndex::new(0), 10.0, 6, 120);
        assert_eq!(closest(&mobs, target).map(|(index, _)| index), Some(MobIndex::new(1)));

        let _ = apply_damage(&mut mobs[1], MobIndex::new(1), 10.0, 6, 120);
        assert_eq!(closest(&mobs, target), None);
    }

    #[test]
    fn negative_damage_does_not_heal() {
        let mut mob = Mob::spawn(MobKind::Ghost, Vec2::ZERO);
        mob.health = 3.0;
        let outcome = apply_damage(&mut mob, MobIndex::new(0), -4.0, 6, 120);
        assert_eq!(outcome, DamageOutcome::Wounded { health: 3.0 });
    }
}
