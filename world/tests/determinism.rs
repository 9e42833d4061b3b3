use spooknloot_core::{Command, Event, MobSnapshot, Rect, Vec2};
use spooknloot_world::{apply, query, World, WorldConfig};

fn run_script(seed: u64) -> (Vec<Event>, Vec<Vec<MobSnapshot>>) {
    let mut world = World::new(WorldConfig {
        seed: Some(seed),
        ..WorldConfig::default()
    });
    let mut events = Vec::new();
    let mut snapshots = Vec::new();

    apply(&mut world, Command::EnterDungeon, &mut events);
    let spawn = query::spawn_point(&world).expect("dungeon has a spawn point");
    let mut player = Rect::from_origin_and_size(spawn, Vec2::new(6.0, 6.0));

    for frame in 0..240 {
        if let Some(mob) = query::closest_mob(&world, player.center()) {
            let toward = query::mob_hitbox_center(&world, mob) - player.center();
            player = Rect::from_origin_and_size(
                player.origin() + toward.normalize_or_zero(),
                player.size(),
            );
        }
        if frame % 15 == 0 {
            apply(
                &mut world,
                Command::StrikeClosest {
                    from: player.center(),
                    reach: 24.0,
                    amount: 1.0,
                },
                &mut events,
            );
        }
        apply(&mut world, Command::Tick { player_hitbox: player }, &mut events);
        snapshots.push(query::mob_view(&world).into_vec());
    }

    (events, snapshots)
}

#[test]
fn identical_seeds_replay_identically() {
    let (first_events, first_snapshots) = run_script(0xDEC0_DE);
    let (second_events, second_snapshots) = run_script(0xDEC0_DE);

    assert!(!first_events.is_empty());
    assert_eq!(first_events, second_events);
    assert_eq!(first_snapshots, second_snapshots);
}

#[test]
fn different_seeds_diverge() {
    let (first_events, _) = run_script(1);
    let (second_events, _) = run_script(2);

    assert_ne!(first_events[1], second_events[1], "level layouts differ");
}
