use spooknloot_core::{
    Facing, HealthTier, MobIndex, MobKind, MobSnapshot, Pose, Rect, Vec2,
};

/// Behaviour state of a single mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MobState {
    /// Standing still, free to move or attack.
    Idle,
    /// Walked during the last update.
    Moving,
    /// Swinging at the target.
    Attacking {
        /// Frames left in the swing.
        remaining: u32,
    },
    /// Flashing after a hit; movement and new attacks are suppressed.
    Damaged {
        /// Frames left in the flash.
        remaining: u32,
    },
    /// Playing the death animation.
    Dead {
        /// Frames left before the mob may rise again.
        remaining: u32,
    },
}

impl MobState {
    /// Reports whether the state is [`MobState::Dead`].
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        matches!(self, Self::Dead { .. })
    }

    const fn pose(&self) -> Pose {
        match self {
            Self::Idle => Pose::Idle,
            Self::Moving => Pose::Walk,
            Self::Attacking { .. } => Pose::Attack,
            Self::Damaged { .. } => Pose::Hurt,
            Self::Dead { .. } => Pose::Dying,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Mob {
    pub(crate) kind: MobKind,
    pub(crate) position: Vec2,
    pub(crate) hitbox: Rect,
    pub(crate) facing: Facing,
    pub(crate) frame: u32,
    pub(crate) frame_counter: u32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) state: MobState,
    pub(crate) last_attack: Option<u64>,
    pub(crate) swing_landed: bool,
}

impl Mob {
    pub(crate) fn spawn(kind: MobKind, position: Vec2) -> Self {
        let mut mob = Self {
            kind,
            position,
            hitbox: Rect::default(),
            facing: Facing::Down,
            frame: 0,
            frame_counter: 0,
            health: kind.max_health(),
            max_health: kind.max_health(),
            state: MobState::Idle,
            last_attack: None,
            swing_landed: false,
        };
        mob.refresh_hitbox();
        mob
    }

    pub(crate) fn refresh_hitbox(&mut self) {
        self.hitbox = self.kind.hitbox().at(self.position);
    }

    pub(crate) fn hitbox_center(&self) -> Vec2 {
        self.hitbox.center()
    }

    pub(crate) const fn is_dead(&self) -> bool {
        self.state.is_dead()
    }

    /// Advances the walk cycle; the frame steps whenever the counter hits
    /// one past a multiple of the period.
    pub(crate) fn advance_animation(&mut self, period: u32, frames: u32) {
        if period > 0 && self.frame_counter % period == 1 {
            self.frame += 1;
        }
        if self.frame >= frames.max(1) {
            self.frame = 0;
        }
        self.frame_counter = self.frame_counter.wrapping_add(1);
    }

    pub(crate) fn face(&mut self, vector: Vec2) {
        if let Some(facing) = Facing::from_vector(vector) {
            self.facing = facing;
        }
    }

    pub(crate) fn snapshot(&self, index: MobIndex) -> MobSnapshot {
        MobSnapshot {
            index,
            kind: self.kind,
            position: self.position,
            hitbox: self.hitbox,
            facing: self.facing,
            pose: self.state.pose(),
            frame: self.frame,
            health: self.health,
            max_health: self.max_health,
            health_tier: HealthTier::from_health(self.health, self.max_health),
            dead: self.is_dead(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_cycles_through_frames() {
        let mut mob = Mob::spawn(MobKind::Ghost, Vec2::ZERO);
        let mut frames = Vec::new();
        for _ in 0..42 {
            mob.advance_animation(10, 4);
            frames.push(mob.frame);
        }

        assert_eq!(frames[0], 0);
        assert_eq!(frames[1], 1, "second update steps the frame");
        assert_eq!(frames[11], 2);
        assert_eq!(frames[21], 3);
        assert_eq!(frames[31], 0, "wraps after the last frame");
        assert_eq!(frames[41], 1);
    }

    #[test]
    fn zero_vector_keeps_facing() {
        let mut mob = Mob::spawn(MobKind::Ghost, Vec2::ZERO);
        mob.face(Vec2::new(-1.0, 0.2));
        mob.face(Vec2::ZERO);
        assert_eq!(mob.facing, Facing::Left);
    }
}
