#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Type Siege session.
//!
//! The world owns the enemy roster, both barriers, and the shared field
//! record. Systems and adapters mutate it exclusively through
//! [`apply`], which executes a [`Command`] and broadcasts the resulting
//! [`Event`]s; read access goes through the [`query`] module.

mod barriers;
mod enemy;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use type_siege_core::{Command, EnemyId, Event, GameOutcome, Rect};

pub use barriers::{FieldLayout, FieldState};

use barriers::Barriers;
use enemy::Enemy;

/// Text and starting geometry for one enemy, captured at discovery time.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySpawn {
    text: String,
    origin: Rect,
}

impl EnemySpawn {
    /// Creates a new spawn record from an enemy's text and its on-page box.
    #[must_use]
    pub fn new<T>(text: T, origin: Rect) -> Self
    where
        T: Into<String>,
    {
        Self {
            text: text.into(),
            origin,
        }
    }
}

/// Errors surfaced while assembling a world from discovered page state.
///
/// Construction fails fast; after it succeeds no world operation is fallible.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    /// The discovery step produced no enemy texts.
    #[error("enemy roster is empty")]
    EmptyRoster,
    /// An enemy's text was blank after trimming.
    #[error("enemy {index} has blank text")]
    BlankEnemyText {
        /// Zero-based roster index of the offending spawn.
        index: usize,
    },
    /// The horizontal drift bounds do not describe a positive width.
    #[error("horizontal bounds are inverted (left {left}, right {right})")]
    InvalidBounds {
        /// Left bound received from discovery.
        left: f32,
        /// Right bound received from discovery.
        right: f32,
    },
    /// The inner barrier threshold is not up-screen of the outer one.
    #[error("inner threshold {inner} must sit above outer threshold {outer}")]
    InvalidThresholds {
        /// Outer barrier threshold.
        outer: f32,
        /// Inner barrier threshold.
        inner: f32,
    },
}

/// Represents the authoritative Type Siege session state.
#[derive(Debug)]
pub struct World {
    field: FieldState,
    barriers: Barriers,
    enemies: Vec<Enemy>,
    destroyed: usize,
    ended: bool,
}

impl World {
    /// Creates a new world from a validated layout and enemy roster.
    ///
    /// Enemy speeds are assigned from the index-tiered table using a
    /// deterministic RNG seeded with `rng_seed`.
    pub fn new(
        layout: FieldLayout,
        spawns: Vec<EnemySpawn>,
        rng_seed: u64,
    ) -> Result<Self, WorldError> {
        if spawns.is_empty() {
            return Err(WorldError::EmptyRoster);
        }
        if layout.right_bound() <= layout.left_bound() {
            return Err(WorldError::InvalidBounds {
                left: layout.left_bound(),
                right: layout.right_bound(),
            });
        }
        if layout.inner_threshold() >= layout.outer_threshold() {
            return Err(WorldError::InvalidThresholds {
                outer: layout.outer_threshold(),
                inner: layout.inner_threshold(),
            });
        }
        if let Some(index) = spawns.iter().position(|spawn| spawn.text.trim().is_empty()) {
            return Err(WorldError::BlankEnemyText { index });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let enemies = spawns
            .into_iter()
            .enumerate()
            .map(|(index, spawn)| {
                Enemy::new(
                    EnemyId::new(index as u32),
                    spawn.text,
                    spawn.origin,
                    index,
                    &mut rng,
                )
            })
            .collect();

        Ok(Self {
            field: FieldState::new(&layout),
            barriers: Barriers::new(),
            enemies,
            destroyed: 0,
            ended: false,
        })
    }

    /// Iterates the roster as `(id, text)` pairs for trie construction.
    pub fn roster(&self) -> impl Iterator<Item = (EnemyId, &str)> {
        self.enemies.iter().map(|enemy| (enemy.id(), enemy.text()))
    }

    fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id() == id)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            let dt = dt.as_secs_f32();

            // Enemies advance in creation order. A threshold crossing runs
            // the damage hook before the windup transition, so one crossing
            // counts exactly one hit.
            for enemy in world.enemies.iter_mut() {
                if let Some(kind) = enemy.threshold_crossing(&world.field) {
                    world.barriers.damage(kind, &mut world.field, out_events);
                    enemy.begin_windup();
                }
                enemy.step(dt, &world.field);
            }

            if world.field.lost() && !world.ended {
                world.ended = true;
                out_events.push(Event::GameEnded {
                    outcome: GameOutcome::Lost,
                });
            }
        }
        Command::Strike {
            enemy,
            length,
            mistyped,
        } => {
            if let Some(entity) = world.enemy_mut(enemy) {
                entity.strike(length, mistyped);
                out_events.push(Event::EnemyStruck {
                    enemy,
                    length,
                    mistyped,
                });
            }
        }
        Command::ResetStrike { enemy } => {
            if let Some(entity) = world.enemy_mut(enemy) {
                entity.reset_strike();
                out_events.push(Event::StrikeCleared { enemy });
            }
        }
        Command::DestroyEnemy { enemy } => {
            let total = world.enemies.len();
            let Some(entity) = world.enemy_mut(enemy) else {
                return;
            };
            if !entity.destroy() {
                return;
            }

            world.destroyed += 1;
            out_events.push(Event::EnemyDestroyed {
                enemy,
                destroyed: world.destroyed,
                total,
            });

            if world.destroyed == total && !world.ended {
                world.field.set_won();
                world.ended = true;
                out_events.push(Event::GameEnded {
                    outcome: GameOutcome::Won,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use crate::barriers::{FieldState, INNER_MAX, OUTER_MAX};
    use type_siege_core::{
        BarrierKind, EnemyId, EnemyPhase, GameOutcome, Health, Rect, StrikeState, Transform2,
    };

    /// Provides read-only access to the shared field record.
    #[must_use]
    pub fn field(world: &World) -> &FieldState {
        &world.field
    }

    /// Captures a read-only view of the enemy roster in creation order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView {
            snapshots: world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id(),
                    text: enemy.text().to_owned(),
                    phase: enemy.phase(),
                    strike: enemy.strike_state(),
                    transform: enemy.transform(),
                    opacity: enemy.opacity(),
                    bounds: enemy.bounding_box(),
                })
                .collect(),
        }
    }

    /// Captures the state of both barriers for presentation.
    #[must_use]
    pub fn barrier_view(world: &World) -> BarrierView {
        BarrierView {
            outer: BarrierSnapshot {
                kind: BarrierKind::Outer,
                remaining: world.barriers.outer(),
                max: OUTER_MAX,
                visible: !world.field.outer_broken(),
            },
            inner: BarrierSnapshot {
                kind: BarrierKind::Inner,
                remaining: world.barriers.inner(),
                max: INNER_MAX,
                visible: world.barriers.inner_shown() && !world.field.lost(),
            },
        }
    }

    /// Terminal outcome of the session, if it has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        if world.field.won() {
            Some(GameOutcome::Won)
        } else if world.field.lost() {
            Some(GameOutcome::Lost)
        } else {
            None
        }
    }

    /// Read-only snapshot describing the whole enemy roster.
    #[derive(Clone, Debug)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured snapshots in creation order.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Looks up a single enemy's snapshot by identifier.
        #[must_use]
        pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
            self.snapshots.iter().find(|snapshot| snapshot.id == id)
        }

        /// Number of enemies in the roster.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Whether the roster is empty (never true for a constructed world).
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Immutable representation of a single enemy used for presentation.
    #[derive(Clone, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Unique identifier assigned to the enemy.
        pub id: EnemyId,
        /// Immutable text snapshot captured at creation.
        pub text: String,
        /// Animation phase the enemy currently occupies.
        pub phase: EnemyPhase,
        /// Struck-prefix rendering state, if any.
        pub strike: Option<StrikeState>,
        /// Visual transform computed on the most recent tick.
        pub transform: Transform2,
        /// Opacity of the visual proxy (zero after destruction).
        pub opacity: f32,
        /// Current bounding box of the visual proxy.
        pub bounds: Rect,
    }

    /// Read-only snapshot of both barrier health pools.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BarrierView {
        /// First line of defence.
        pub outer: BarrierSnapshot,
        /// Final line of defence.
        pub inner: BarrierSnapshot,
    }

    /// Immutable representation of one barrier's presentation state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct BarrierSnapshot {
        /// Which barrier this snapshot describes.
        pub kind: BarrierKind,
        /// Health remaining in the pool.
        pub remaining: Health,
        /// Maximum health of the pool.
        pub max: Health,
        /// Whether the barrier (and its health bar) is currently shown.
        pub visible: bool,
    }

    impl BarrierSnapshot {
        /// Fraction of the pool that remains.
        #[must_use]
        pub fn fraction(&self) -> f32 {
            self.remaining.fraction_of(self.max)
        }
    }
}
