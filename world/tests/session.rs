use spooknloot_core::{
    CellCoord, Colliders, Command, Event, MobIndex, Mode, Rect, TileCode, TileLayer, Vec2,
};
use spooknloot_world::{apply, query, ProgressionConfig, World, WorldConfig};

const FAR_AWAY: Rect = Rect::new(-1000.0, -1000.0, 6.0, 6.0);

fn seeded(seed: u64) -> World {
    World::new(WorldConfig {
        seed: Some(seed),
        ..WorldConfig::default()
    })
}

fn tick(world: &mut World, player_hitbox: Rect, events: &mut Vec<Event>) {
    apply(world, Command::Tick { player_hitbox }, events);
}

fn kill_everything(world: &mut World, events: &mut Vec<Event>) {
    for snapshot in query::mob_view(world).into_vec() {
        apply(
            world,
            Command::DamageMob {
                mob: snapshot.index,
                amount: 1000.0,
            },
            events,
        );
    }
}

fn on_exit(world: &World) -> Rect {
    let exit = query::exit(world).expect("level has an exit");
    Rect::new(exit.x + 5.0, exit.y + 5.0, 6.0, 6.0)
}

#[test]
fn entering_dungeon_generates_level_and_wave() {
    let mut world = seeded(7);
    let mut events = Vec::new();

    apply(&mut world, Command::EnterDungeon, &mut events);

    assert_eq!(query::mode(&world), Mode::Dungeon);
    assert_eq!(events[0], Event::ModeChanged { mode: Mode::Dungeon });
    let spawn = query::spawn_point(&world).expect("spawn exists");
    match &events[1] {
        Event::LevelGenerated {
            level_index,
            spawn: generated,
            exit,
            ..
        } => {
            assert_eq!(*level_index, 0);
            assert_eq!(*generated, spawn);
            assert_eq!(Some(*exit), query::exit(&world));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[2], Event::PlayerRelocated { position: spawn });

    let wave = query::wave_size(&world).expect("wave rolled");
    assert!((5..=10).contains(&wave));
    let view = query::mob_view(&world);
    assert_eq!(events[3], Event::MobsSpawned { count: view.len() });
    assert_eq!(view.len(), wave as usize);

    let tiles = query::tile_map(&world).expect("tile map");
    for snapshot in view.iter() {
        let center = snapshot.hitbox.center();
        let cell = CellCoord::new((center.x / 16.0) as u32, (center.y / 16.0) as u32);
        assert_eq!(tiles.code_at(cell), Some(TileCode::Floor));
    }
    assert!(!query::colliders(&world).is_empty());
    assert!(!query::is_exit_visible(&world));
}

#[test]
fn wave_mobs_never_start_inside_walls() {
    for seed in 0..20 {
        let mut world = seeded(seed);
        let mut events = Vec::new();
        apply(&mut world, Command::EnterDungeon, &mut events);

        let walls = query::colliders(&world);
        for snapshot in query::mob_view(&world).iter() {
            assert!(
                !walls.iter().any(|wall| wall.overlaps(&snapshot.hitbox)),
                "seed {seed}: mob {:?} spawned with hitbox {:?} inside a wall",
                snapshot.index,
                snapshot.hitbox
            );
        }
    }
}

#[test]
fn entering_twice_keeps_the_current_level() {
    let mut world = seeded(3);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    let exit = query::exit(&world);
    let wave = query::wave_size(&world);
    let mobs = query::mob_view(&world).into_vec();
    events.clear();

    apply(&mut world, Command::EnterDungeon, &mut events);

    assert!(events.is_empty());
    assert_eq!(query::exit(&world), exit);
    assert_eq!(query::wave_size(&world), wave);
    assert_eq!(query::mob_view(&world).into_vec(), mobs);
}

#[test]
fn exit_opens_once_the_level_is_clear() {
    let mut world = seeded(11);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    events.clear();

    tick(&mut world, FAR_AWAY, &mut events);
    assert!(query::is_any_mob_alive(&world));
    assert!(!query::is_exit_visible(&world));

    kill_everything(&mut world, &mut events);
    assert!(!query::is_any_mob_alive(&world));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::MobDied { .. })));
    events.clear();

    for _ in 0..5 {
        tick(&mut world, FAR_AWAY, &mut events);
    }
    assert!(!query::is_exit_visible(&world));
    tick(&mut world, FAR_AWAY, &mut events);
    assert!(query::is_exit_visible(&world));
    assert_eq!(events, vec![Event::ExitRevealed]);

    for _ in 0..20 {
        tick(&mut world, FAR_AWAY, &mut events);
    }
    let player = on_exit(&world);
    assert!(query::is_player_at_exit(&world, &player));
    events.clear();

    tick(&mut world, player, &mut events);
    assert_eq!(events[0], Event::LevelCleared { cleared: 1 });
    assert!(matches!(
        events[1],
        Event::LevelGenerated { level_index: 1, .. }
    ));
    assert_eq!(query::levels_cleared(&world), 1);
    assert!(!query::is_exit_visible(&world));
    assert!(query::is_any_mob_alive(&world));

    let second_wave = query::wave_size(&world).expect("wave rolled");
    assert!((7..=15).contains(&second_wave));
}

#[test]
fn exit_is_ignored_while_cooldown_runs() {
    let mut world = World::new(WorldConfig {
        seed: Some(5),
        progression: ProgressionConfig {
            clear_confirm_frames: 1,
            ..ProgressionConfig::default()
        },
        ..WorldConfig::default()
    });
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    kill_everything(&mut world, &mut events);
    let player = on_exit(&world);
    events.clear();

    for _ in 0..19 {
        tick(&mut world, player, &mut events);
    }
    assert_eq!(query::levels_cleared(&world), 0);
    assert_eq!(events, vec![Event::ExitRevealed]);

    tick(&mut world, player, &mut events);
    assert_eq!(query::levels_cleared(&world), 1);
}

#[test]
fn boss_arena_follows_the_last_clear() {
    let mut world = World::new(WorldConfig {
        seed: Some(3),
        progression: ProgressionConfig {
            exit_cooldown_frames: 0,
            clear_confirm_frames: 1,
            levels_before_boss: 2,
        },
        ..WorldConfig::default()
    });
    let arena_walls = vec![Rect::new(0.0, 0.0, 320.0, 16.0)];
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureBossArena {
            colliders: arena_walls.clone(),
            player_spawn: Vec2::new(160.0, 200.0),
            boss_spawn: Vec2::new(128.0, 48.0),
        },
        &mut events,
    );
    apply(&mut world, Command::EnterDungeon, &mut events);

    for _ in 0..2 {
        kill_everything(&mut world, &mut events);
        tick(&mut world, FAR_AWAY, &mut events);
        assert!(query::is_exit_visible(&world));
        let player = on_exit(&world);
        events.clear();
        tick(&mut world, player, &mut events);
    }

    assert_eq!(query::mode(&world), Mode::BossArena);
    assert_eq!(events[0], Event::LevelCleared { cleared: 2 });
    assert_eq!(
        events[1],
        Event::ModeChanged {
            mode: Mode::BossArena
        }
    );
    assert_eq!(
        events[2],
        Event::PlayerRelocated {
            position: Vec2::new(160.0, 200.0)
        }
    );
    let boss = query::boss(&world).expect("boss spawned");
    assert_eq!(events[3], Event::BossSpawned { mob: boss });
    assert_eq!(query::boss_health(&world), Some((100.0, 100.0)));
    assert_eq!(query::mob_view(&world).len(), 1);
    assert_eq!(query::colliders(&world), arena_walls.as_slice());
    assert!(query::level(&world).is_none());

    events.clear();
    apply(
        &mut world,
        Command::DamageMob {
            mob: boss,
            amount: 25.0,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::MobDamaged {
            mob: boss,
            health: 75.0
        }]
    );
    assert_eq!(query::boss_health(&world), Some((75.0, 100.0)));
}

#[test]
fn player_death_resets_the_run() {
    let mut world = seeded(21);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    events.clear();

    apply(&mut world, Command::ResetRun, &mut events);

    assert_eq!(
        events,
        vec![Event::ModeChanged {
            mode: Mode::Overworld
        }]
    );
    assert_eq!(query::mode(&world), Mode::Overworld);
    assert_eq!(query::levels_cleared(&world), 0);
    assert_eq!(query::wave_size(&world), None);
    assert!(query::mob_view(&world).is_empty());
    assert!(query::level(&world).is_none());
    assert!(query::colliders(&world).is_empty());
}

#[test]
fn leaving_keeps_wave_escalation() {
    let mut world = seeded(8);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    let first = query::wave_size(&world);

    apply(&mut world, Command::LeaveDungeon, &mut events);
    assert_eq!(query::mode(&world), Mode::Overworld);
    assert!(query::mob_view(&world).is_empty());
    assert_eq!(query::wave_size(&world), first);

    events.clear();
    apply(&mut world, Command::LeaveDungeon, &mut events);
    assert!(events.is_empty(), "already in the overworld");
}

#[test]
fn potion_is_collected_once() {
    let mut world = seeded(13);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    let potion = query::potion(&world).expect("level holds a potion");
    let player = Rect::new(potion.x + 4.0, potion.y + 4.0, 6.0, 6.0);
    events.clear();

    tick(&mut world, player, &mut events);
    tick(&mut world, player, &mut events);

    let collected: Vec<&Event> = events
        .iter()
        .filter(|event| matches!(event, Event::PotionCollected { .. }))
        .collect();
    assert_eq!(
        collected,
        vec![&Event::PotionCollected { heal_fraction: 0.6 }]
    );
    assert_eq!(query::potion(&world), None);
}

#[test]
fn strikes_hit_the_closest_mob_in_reach() {
    let mut world = seeded(17);
    let mut events = Vec::new();
    apply(&mut world, Command::EnterDungeon, &mut events);
    let target = MobIndex::new(0);
    let center = query::mob_hitbox_center(&world, target);
    assert_eq!(query::closest_mob(&world, center), Some(target));
    events.clear();

    apply(
        &mut world,
        Command::StrikeClosest {
            from: center,
            reach: 1.0,
            amount: 1.0,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::MobDamaged {
            mob: target,
            health: 4.0
        }]
    );

    events.clear();
    apply(
        &mut world,
        Command::StrikeClosest {
            from: Vec2::new(-500.0, -500.0),
            reach: 10.0,
            amount: 1.0,
        },
        &mut events,
    );
    apply(
        &mut world,
        Command::DamageMob {
            mob: MobIndex::new(999),
            amount: 1.0,
        },
        &mut events,
    );
    assert!(events.is_empty());
}

#[test]
fn overworld_trickles_mobs_onto_spawn_tiles() {
    let mut world = seeded(1);
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::ConfigureOverworld {
            tile_length: 16.0,
            collider_layers: vec![TileLayer {
                name: "walls".to_owned(),
                cells: vec![CellCoord::new(0, 0), CellCoord::new(1, 0)],
            }],
            spawn_tiles: vec![CellCoord::new(3, 3)],
        },
        &mut events,
    );
    assert_ne!(query::overworld_colliders(&world), &Colliders::None);

    for _ in 0..499 {
        tick(&mut world, FAR_AWAY, &mut events);
    }
    assert!(events.is_empty());

    tick(&mut world, FAR_AWAY, &mut events);
    assert_eq!(events, vec![Event::MobsSpawned { count: 1 }]);
    let view = query::mob_view(&world).into_vec();
    assert_eq!(view[0].position, Vec2::new(48.0, 33.0));
    assert_eq!(view[0].hitbox, Rect::new(51.0, 51.0, 10.0, 10.0));
    assert_eq!(query::tick_index(&world), 500);
}
