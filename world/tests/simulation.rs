use std::time::Duration;

use type_siege_core::{BarrierKind, Command, EnemyId, EnemyPhase, Event, GameOutcome, Rect};
use type_siege_world::{self as world, query, EnemySpawn, FieldLayout, World, WorldError};

const DT: Duration = Duration::from_millis(250);

fn layout() -> FieldLayout {
    FieldLayout::new(200.0, 100.0, 0.0, 600.0)
}

fn spawn(text: &str, x: f32, y: f32) -> EnemySpawn {
    EnemySpawn::new(text, Rect::new(x, y, 50.0, 20.0))
}

fn tick(world: &mut World, events: &mut Vec<Event>) {
    world::apply(world, Command::Tick { dt: DT }, events);
}

#[test]
fn construction_fails_fast_on_invalid_discovery_state() {
    assert_eq!(
        World::new(layout(), Vec::new(), 1).err(),
        Some(WorldError::EmptyRoster)
    );
    assert_eq!(
        World::new(
            FieldLayout::new(200.0, 100.0, 600.0, 0.0),
            vec![spawn("bug", 50.0, 400.0)],
            1,
        )
        .err(),
        Some(WorldError::InvalidBounds {
            left: 600.0,
            right: 0.0
        })
    );
    assert_eq!(
        World::new(
            FieldLayout::new(100.0, 200.0, 0.0, 600.0),
            vec![spawn("bug", 50.0, 400.0)],
            1,
        )
        .err(),
        Some(WorldError::InvalidThresholds {
            outer: 100.0,
            inner: 200.0
        })
    );
    assert_eq!(
        World::new(
            layout(),
            vec![spawn("bug", 50.0, 400.0), spawn("   ", 50.0, 430.0)],
            1,
        )
        .err(),
        Some(WorldError::BlankEnemyText { index: 1 })
    );
}

#[test]
fn destroyed_enemies_never_move_again() {
    let mut world = World::new(
        layout(),
        vec![spawn("alpha", 100.0, 400.0), spawn("beta", 300.0, 430.0)],
        7,
    )
    .expect("valid world");
    let mut events = Vec::new();

    for _ in 0..4 {
        tick(&mut world, &mut events);
    }

    let target = EnemyId::new(0);
    world::apply(&mut world, Command::DestroyEnemy { enemy: target }, &mut events);

    let frozen = query::enemy_view(&world)
        .get(target)
        .expect("snapshot")
        .clone();
    assert_eq!(frozen.phase, EnemyPhase::Destroyed);
    assert_eq!(frozen.opacity, 0.0);

    for _ in 0..40 {
        tick(&mut world, &mut events);
    }

    let after = query::enemy_view(&world)
        .get(target)
        .expect("snapshot")
        .clone();
    assert_eq!(after.transform, frozen.transform);
    assert_eq!(after.bounds, frozen.bounds);

    // The sibling kept moving.
    let sibling = query::enemy_view(&world)
        .get(EnemyId::new(1))
        .expect("snapshot")
        .clone();
    assert_ne!(sibling.bounds, frozen.bounds);
    assert_ne!(sibling.phase, EnemyPhase::Destroyed);
}

#[test]
fn reset_strike_on_a_never_struck_enemy_is_a_no_op() {
    let mut world = World::new(layout(), vec![spawn("alpha", 100.0, 400.0)], 7)
        .expect("valid world");
    let before = query::enemy_view(&world)
        .get(EnemyId::new(0))
        .expect("snapshot")
        .clone();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ResetStrike {
            enemy: EnemyId::new(0),
        },
        &mut events,
    );

    let after = query::enemy_view(&world)
        .get(EnemyId::new(0))
        .expect("snapshot")
        .clone();
    assert_eq!(after, before);
    assert!(after.strike.is_none());
}

#[test]
fn relentless_enemy_grinds_both_barriers_down_to_a_loss() {
    let mut world =
        World::new(layout(), vec![spawn("swarm", 275.0, 400.0)], 11).expect("valid world");
    let mut events = Vec::new();

    let mut ticks = 0;
    while query::outcome(&world).is_none() {
        tick(&mut world, &mut events);
        ticks += 1;
        assert!(ticks < 100_000, "loss never occurred");
    }

    assert_eq!(query::outcome(&world), Some(GameOutcome::Lost));
    assert!(query::field(&world).lost());
    assert!(query::field(&world).outer_broken());

    // Outer took ceil(100 / 10) = 10 hits, monotonically down to exactly zero.
    let outer_remaining: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            Event::BarrierDamaged {
                barrier: BarrierKind::Outer,
                remaining,
                ..
            } => Some(remaining.get()),
            _ => None,
        })
        .collect();
    assert_eq!(
        outer_remaining,
        vec![90, 80, 70, 60, 50, 40, 30, 20, 10, 0]
    );

    // Inner took ceil(200 / 10) = 20 hits, only after the outer broke.
    let inner_hits = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::BarrierDamaged {
                    barrier: BarrierKind::Inner,
                    ..
                }
            )
        })
        .count();
    assert_eq!(inner_hits, 20);

    let broken_outer = events
        .iter()
        .position(|event| {
            matches!(
                event,
                Event::BarrierBroken {
                    barrier: BarrierKind::Outer
                }
            )
        })
        .expect("outer broke");
    let first_inner_hit = events
        .iter()
        .position(|event| {
            matches!(
                event,
                Event::BarrierDamaged {
                    barrier: BarrierKind::Inner,
                    ..
                }
            )
        })
        .expect("inner was hit");
    assert!(broken_outer < first_inner_hit);

    // The ending fires exactly once, even under further ticks.
    for _ in 0..200 {
        tick(&mut world, &mut events);
    }
    let endings = events
        .iter()
        .filter(|event| matches!(event, Event::GameEnded { .. }))
        .count();
    assert_eq!(endings, 1);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::GameEnded {
            outcome: GameOutcome::Lost
        }
    )));
}

#[test]
fn destroying_the_whole_roster_wins_exactly_once() {
    let mut world = World::new(
        layout(),
        vec![spawn("alpha", 100.0, 400.0), spawn("beta", 300.0, 430.0)],
        3,
    )
    .expect("valid world");
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::DestroyEnemy {
            enemy: EnemyId::new(0),
        },
        &mut events,
    );
    assert_eq!(query::outcome(&world), None);

    // Redundant destroys are absorbed and do not advance the counter.
    world::apply(
        &mut world,
        Command::DestroyEnemy {
            enemy: EnemyId::new(0),
        },
        &mut events,
    );
    assert_eq!(query::outcome(&world), None);

    world::apply(
        &mut world,
        Command::DestroyEnemy {
            enemy: EnemyId::new(1),
        },
        &mut events,
    );
    assert_eq!(query::outcome(&world), Some(GameOutcome::Won));

    let destroyed_counts: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyDestroyed { destroyed, .. } => Some(*destroyed),
            _ => None,
        })
        .collect();
    assert_eq!(destroyed_counts, vec![1, 2]);

    let endings = events
        .iter()
        .filter(|event| matches!(event, Event::GameEnded { .. }))
        .count();
    assert_eq!(endings, 1);
}
