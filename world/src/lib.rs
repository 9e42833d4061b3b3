#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Spook'n'Loot.
//!
//! The world owns one instance of every gameplay system, applies
//! [`Command`]s and reports what happened through [`Event`]s. Adapters read
//! state back through the [`query`] module.

mod config;
mod progression;

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spooknloot_core::{
    CellCoord, Colliders, Command, Event, MobIndex, MobKind, Mode, Rect, TileLayer, Vec2,
};
use spooknloot_system_horde::{DamageOutcome, Horde};
use spooknloot_system_level::{Level, LevelGenerator};
use spooknloot_system_spawning::Spawning;

pub use config::{ProgressionConfig, WorldConfig};

use crate::progression::{Progression, Verdict};

const POTION_HEAL_FRACTION: f32 = 0.6;

#[derive(Clone, Debug, Default)]
struct Overworld {
    tile_length: f32,
    colliders: Colliders,
    spawn_tiles: Vec<CellCoord>,
}

#[derive(Clone, Debug, Default)]
struct Arena {
    colliders: Vec<Rect>,
    player_spawn: Vec2,
    boss_spawn: Vec2,
}

/// Represents the authoritative session state.
#[derive(Debug)]
pub struct World {
    mode: Mode,
    generator: LevelGenerator,
    level: Option<Level>,
    potion: Option<CellCoord>,
    horde: Horde,
    spawning: Spawning,
    progression: Progression,
    overworld: Overworld,
    arena: Arena,
    boss: Option<MobIndex>,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a session in the overworld. The configuration is expected to
    /// have been validated by the caller.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            mode: Mode::Overworld,
            generator: LevelGenerator::new(config.level, config.decor),
            level: None,
            potion: None,
            horde: Horde::new(config.horde, config.navigator),
            spawning: Spawning::new(config.spawning),
            progression: Progression::new(config.progression),
            overworld: Overworld::default(),
            arena: Arena::default(),
            boss: None,
            rng,
            tick_index: 0,
        }
    }

    fn switch_mode(&mut self, mode: Mode, out: &mut Vec<Event>) {
        if self.mode != mode {
            info!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
            out.push(Event::ModeChanged { mode });
        }
    }

    fn enter_dungeon(&mut self, out: &mut Vec<Event>) {
        if self.mode != Mode::Overworld {
            debug!("ignoring dungeon entry while in {:?}", self.mode);
            return;
        }
        self.switch_mode(Mode::Dungeon, out);
        self.boss = None;
        self.horde.set_tile_colliders(Colliders::None);
        self.generate_level(out);
    }

    fn generate_level(&mut self, out: &mut Vec<Event>) {
        let level = self.generator.generate_with(&mut self.rng);
        let wave = self.spawning.next_wave_size(&mut self.rng);
        let positions = level.random_floor_positions(
            usize::try_from(wave).unwrap_or(usize::MAX),
            &MobKind::Ghost.hitbox(),
            &mut self.rng,
        );

        self.horde.reset();
        self.horde.set_external_colliders(level.colliders().to_vec());
        let count = self.horde.spawn_at(MobKind::Ghost, &positions);
        self.progression.arm();
        self.potion = level.decor().potion();

        let level_index = self.progression.levels_cleared();
        info!(
            "level {level_index} ready: {} rooms, {count} mobs",
            level.rooms().len()
        );
        out.push(Event::LevelGenerated {
            level_index,
            spawn: level.spawn(),
            exit: level.exit(),
            rooms: level.rooms().len(),
            fallback: level.is_fallback(),
        });
        out.push(Event::PlayerRelocated {
            position: level.spawn(),
        });
        out.push(Event::MobsSpawned { count });
        self.level = Some(level);
    }

    fn enter_boss_arena(&mut self, out: &mut Vec<Event>) {
        self.switch_mode(Mode::BossArena, out);
        self.level = None;
        self.potion = None;

        self.horde.reset();
        self.horde.set_tile_colliders(Colliders::None);
        if self.arena.colliders.is_empty() {
            self.horde.clear_external_colliders();
        } else {
            self.horde.set_external_colliders(self.arena.colliders.clone());
        }
        let boss = self.horde.spawn(MobKind::Boss, self.arena.boss_spawn);
        self.boss = Some(boss);

        out.push(Event::PlayerRelocated {
            position: self.arena.player_spawn,
        });
        out.push(Event::BossSpawned { mob: boss });
    }

    fn return_to_overworld(&mut self, out: &mut Vec<Event>) {
        self.switch_mode(Mode::Overworld, out);
        self.level = None;
        self.potion = None;
        self.boss = None;

        self.horde.reset();
        self.horde.clear_external_colliders();
        self.horde.set_tile_colliders(self.overworld.colliders.clone());
    }

    fn tick(&mut self, player_hitbox: Rect, out: &mut Vec<Event>) {
        self.tick_index = self.tick_index.wrapping_add(1);
        self.horde.update(player_hitbox.origin(), out);

        match self.mode {
            Mode::Overworld => self.trickle_spawns(out),
            Mode::Dungeon => self.dungeon_tick(&player_hitbox, out),
            Mode::BossArena => {}
        }
    }

    fn trickle_spawns(&mut self, out: &mut Vec<Event>) {
        if self.overworld.spawn_tiles.is_empty() {
            return;
        }
        let batches = self.spawning.overworld_spawns(1);
        if batches == 0 {
            return;
        }

        let mut tiles = Vec::new();
        self.spawning
            .pick_spawn_tiles(batches, &self.overworld.spawn_tiles, &mut self.rng, &mut tiles);
        let hitbox = MobKind::Ghost.hitbox();
        let positions: Vec<Vec2> = tiles
            .iter()
            .map(|tile| hitbox.sprite_origin_within(&tile.to_rect(self.overworld.tile_length)))
            .collect();
        let count = self.horde.spawn_at(MobKind::Ghost, &positions);
        if count > 0 {
            debug!("overworld spawned {count} mobs");
            out.push(Event::MobsSpawned { count });
        }
    }

    fn dungeon_tick(&mut self, player_hitbox: &Rect, out: &mut Vec<Event>) {
        let Some(level) = self.level.as_ref() else {
            return;
        };

        if let Some(cell) = self.potion {
            if cell.to_rect(level.tile_length()).overlaps(player_hitbox) {
                self.potion = None;
                debug!("potion collected at {cell:?}");
                out.push(Event::PotionCollected {
                    heal_fraction: POTION_HEAL_FRACTION,
                });
            }
        }

        let on_exit = level.exit_overlaps(player_hitbox);
        match self
            .progression
            .observe(self.horde.is_any_alive(), on_exit, out)
        {
            Verdict::Stay => {}
            Verdict::NextLevel => self.generate_level(out),
            Verdict::EnterBoss => self.enter_boss_arena(out),
        }
    }

    fn damage(&mut self, mob: MobIndex, amount: f32, out: &mut Vec<Event>) {
        match self.horde.damage(mob, amount) {
            DamageOutcome::Ignored => {}
            DamageOutcome::Wounded { health } => out.push(Event::MobDamaged { mob, health }),
            DamageOutcome::Killed => {
                if self.boss == Some(mob) {
                    info!("boss defeated");
                }
                out.push(Event::MobDamaged { mob, health: 0.0 });
                out.push(Event::MobDied { mob });
            }
        }
    }

    fn reset_run(&mut self, out: &mut Vec<Event>) {
        self.return_to_overworld(out);
        self.progression.reset();
        self.spawning.reset();
        info!("run reset");
    }

    fn configure_overworld(
        &mut self,
        tile_length: f32,
        collider_layers: &[TileLayer],
        spawn_tiles: Vec<CellCoord>,
    ) {
        self.overworld = Overworld {
            tile_length,
            colliders: Colliders::from_layers(tile_length, collider_layers),
            spawn_tiles,
        };
        if self.mode == Mode::Overworld {
            self.horde.set_tile_colliders(self.overworld.colliders.clone());
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureOverworld {
            tile_length,
            collider_layers,
            spawn_tiles,
        } => world.configure_overworld(tile_length, &collider_layers, spawn_tiles),
        Command::ConfigureBossArena {
            colliders,
            player_spawn,
            boss_spawn,
        } => {
            world.arena = Arena {
                colliders,
                player_spawn,
                boss_spawn,
            };
            if world.mode == Mode::BossArena && !world.arena.colliders.is_empty() {
                world
                    .horde
                    .set_external_colliders(world.arena.colliders.clone());
            }
        }
        Command::EnterDungeon => world.enter_dungeon(out_events),
        Command::LeaveDungeon => world.return_to_overworld(out_events),
        Command::Tick { player_hitbox } => world.tick(player_hitbox, out_events),
        Command::DamageMob { mob, amount } => world.damage(mob, amount, out_events),
        Command::StrikeClosest {
            from,
            reach,
            amount,
        } => {
            if let Some(mob) = world.horde.closest_within(from, reach) {
                world.damage(mob, amount, out_events);
            }
        }
        Command::ResetRun => world.reset_run(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use spooknloot_core::{Colliders, MobIndex, MobView, Mode, Rect, Vec2};
    use spooknloot_system_level::{Decor, Level, TileMap};
    use spooknloot_system_navigation::FlowFieldView;

    use super::World;

    /// Mode the session is simulating.
    #[must_use]
    pub fn mode(world: &World) -> Mode {
        world.mode
    }

    /// Active dungeon level, if any.
    #[must_use]
    pub fn level(world: &World) -> Option<&Level> {
        world.level.as_ref()
    }

    /// Tile codes of the active dungeon level.
    #[must_use]
    pub fn tile_map(world: &World) -> Option<&TileMap> {
        world.level.as_ref().map(Level::tiles)
    }

    /// Explicit colliders the mobs currently steer around.
    #[must_use]
    pub fn colliders(world: &World) -> &[Rect] {
        world.horde.navigator().obstacles()
    }

    /// Tile colliders of the overworld map.
    #[must_use]
    pub fn overworld_colliders(world: &World) -> &Colliders {
        &world.overworld.colliders
    }

    /// Player spawn point of the active level.
    #[must_use]
    pub fn spawn_point(world: &World) -> Option<Vec2> {
        world.level.as_ref().map(Level::spawn)
    }

    /// Exit rectangle of the active level, visible or not.
    #[must_use]
    pub fn exit(world: &World) -> Option<Rect> {
        world.level.as_ref().map(Level::exit)
    }

    /// Reports whether the exit of the active level is shown.
    #[must_use]
    pub fn is_exit_visible(world: &World) -> bool {
        world.level.is_some() && world.progression.is_exit_visible()
    }

    /// Reports whether a hitbox stands on the visible exit.
    #[must_use]
    pub fn is_player_at_exit(world: &World, player_hitbox: &Rect) -> bool {
        is_exit_visible(world)
            && world
                .level
                .as_ref()
                .is_some_and(|level| level.exit_overlaps(player_hitbox))
    }

    /// Tile rectangle of the potion still lying in the level.
    #[must_use]
    pub fn potion(world: &World) -> Option<Rect> {
        let level = world.level.as_ref()?;
        world
            .potion
            .map(|cell| cell.to_rect(level.tile_length()))
    }

    /// Cosmetic content of the active level.
    #[must_use]
    pub fn decor(world: &World) -> Option<&Decor> {
        world.level.as_ref().map(Level::decor)
    }

    /// Captures a read-only view of every mob.
    #[must_use]
    pub fn mob_view(world: &World) -> MobView {
        world.horde.view()
    }

    /// Reports whether at least one mob is alive.
    #[must_use]
    pub fn is_any_mob_alive(world: &World) -> bool {
        world.horde.is_any_alive()
    }

    /// Living mob closest to a point.
    #[must_use]
    pub fn closest_mob(world: &World, target: Vec2) -> Option<MobIndex> {
        world.horde.closest(target)
    }

    /// Hitbox center of a mob, or the zero vector for stale indices.
    #[must_use]
    pub fn mob_hitbox_center(world: &World, mob: MobIndex) -> Vec2 {
        world.horde.hitbox_center(mob)
    }

    /// Index of the boss while the arena is active.
    #[must_use]
    pub fn boss(world: &World) -> Option<MobIndex> {
        world.boss
    }

    /// Current and maximum health of the boss.
    #[must_use]
    pub fn boss_health(world: &World) -> Option<(f32, f32)> {
        world.boss.and_then(|boss| world.horde.health(boss))
    }

    /// Levels cleared during the current run.
    #[must_use]
    pub fn levels_cleared(world: &World) -> u32 {
        world.progression.levels_cleared()
    }

    /// Size of the most recent dungeon wave.
    #[must_use]
    pub fn wave_size(world: &World) -> Option<u32> {
        world.spawning.current_wave_size()
    }

    /// Read-only view of the mobs' flow field.
    #[must_use]
    pub fn flow_field(world: &World) -> FlowFieldView<'_> {
        world.horde.flow_field()
    }

    /// Number of ticks processed since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
