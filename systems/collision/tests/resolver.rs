use proptest::prelude::*;
use spooknloot_core::{Colliders, Hitbox, Rect, Vec2};
use spooknloot_system_collision::{resolve, ColliderSource, Outcome};

fn ghost_like_hitbox() -> Hitbox {
    Hitbox::new(Vec2::new(3.0, 18.0), Vec2::new(10.0, 10.0))
}

#[test]
fn moving_into_wall_slides_along_it() {
    // Vertical wall to the right of the mover.
    let walls = vec![Rect::new(32.0, 0.0, 16.0, 128.0)];
    let hitbox = Hitbox::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

    let resolution = resolve(
        Vec2::new(21.0, 40.0),
        Vec2::new(24.0, 43.0),
        &hitbox,
        walls.as_slice(),
    );

    assert_eq!(resolution.outcome, Outcome::SlidVertically);
    assert_eq!(resolution.position, Vec2::new(21.0, 43.0));
}

#[test]
fn moving_into_floor_slides_horizontally() {
    let walls = vec![Rect::new(0.0, 64.0, 256.0, 16.0)];
    let hitbox = Hitbox::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

    let resolution = resolve(
        Vec2::new(40.0, 53.0),
        Vec2::new(43.0, 57.0),
        &hitbox,
        walls.as_slice(),
    );

    assert_eq!(resolution.outcome, Outcome::SlidHorizontally);
    assert_eq!(resolution.position, Vec2::new(43.0, 53.0));
}

#[test]
fn corner_pocket_blocks_completely() {
    let walls = vec![
        Rect::new(32.0, 0.0, 16.0, 64.0),
        Rect::new(0.0, 32.0, 48.0, 16.0),
    ];
    let hitbox = Hitbox::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

    let previous = Vec2::new(21.0, 21.0);
    let resolution = resolve(previous, Vec2::new(24.0, 24.0), &hitbox, walls.as_slice());

    assert_eq!(resolution.outcome, Outcome::Blocked);
    assert_eq!(resolution.position, previous);
}

#[test]
fn touching_a_wall_is_not_a_collision() {
    let walls = Colliders::Rects(vec![Rect::new(10.0, 0.0, 16.0, 16.0)]);
    let hitbox = Hitbox::new(Vec2::ZERO, Vec2::new(10.0, 10.0));

    let resolution = resolve(Vec2::ZERO, Vec2::new(0.0, 2.0), &hitbox, &walls);
    assert_eq!(resolution.outcome, Outcome::Unobstructed);
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (0.0f32..200.0, 0.0f32..200.0, 1.0f32..48.0, 1.0f32..48.0)
        .prop_map(|(x, y, width, height)| Rect::new(x, y, width, height))
}

proptest! {
    #[test]
    fn resolved_hitbox_never_overlaps(
        walls in prop::collection::vec(rect_strategy(), 0..12),
        previous in (0.0f32..200.0, 0.0f32..200.0),
        step in (-6.0f32..6.0, -6.0f32..6.0),
    ) {
        let hitbox = ghost_like_hitbox();
        let previous = Vec2::new(previous.0, previous.1);
        prop_assume!(!walls.overlaps(&hitbox.at(previous)));

        let proposed = previous + Vec2::new(step.0, step.1);
        let resolution = resolve(previous, proposed, &hitbox, walls.as_slice());

        prop_assert!(!walls.overlaps(&hitbox.at(resolution.position)));
        if resolution.outcome == Outcome::Blocked {
            prop_assert_eq!(resolution.position, previous);
        }
    }

    #[test]
    fn resolving_in_place_is_identity(
        walls in prop::collection::vec(rect_strategy(), 0..12),
        position in (0.0f32..200.0, 0.0f32..200.0),
    ) {
        let hitbox = ghost_like_hitbox();
        let position = Vec2::new(position.0, position.1);
        prop_assume!(!walls.overlaps(&hitbox.at(position)));

        let resolution = resolve(position, position, &hitbox, walls.as_slice());
        prop_assert_eq!(resolution.position, position);
        prop_assert_eq!(resolution.outcome, Outcome::Unobstructed);
    }
}
