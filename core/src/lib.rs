#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Type Siege engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The match controller submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Adapters react to events (clearing the
//! typing input, presenting the ending banner) without reaching into world
//! internals.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder text shown in the typing input once the siege begins.
pub const BATTLE_PROMPT: &str = "DESTROY THEM ALL!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Marks the leading portion of an enemy's text as consumed by typing.
    Strike {
        /// Identifier of the enemy whose text is being struck.
        enemy: EnemyId,
        /// Number of typed characters covering the struck prefix.
        length: usize,
        /// Whether the typed text diverged from the enemy's text.
        mistyped: bool,
    },
    /// Restores an enemy's text to its original unstruck rendering.
    ResetStrike {
        /// Identifier of the enemy whose strike is cleared.
        enemy: EnemyId,
    },
    /// Requests the one-way destruction of a fully typed enemy.
    DestroyEnemy {
        /// Identifier of the enemy to destroy.
        enemy: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy's struck prefix was re-rendered.
    EnemyStruck {
        /// Identifier of the struck enemy.
        enemy: EnemyId,
        /// Number of typed characters covering the struck prefix.
        length: usize,
        /// Whether the strike carries the mistyped error coloring.
        mistyped: bool,
    },
    /// Confirms that an enemy's strike rendering was cleared.
    StrikeCleared {
        /// Identifier of the enemy whose strike was cleared.
        enemy: EnemyId,
    },
    /// Confirms that an enemy transitioned to its terminal destroyed phase.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Running count of destroyed enemies including this one.
        destroyed: usize,
        /// Total number of enemies in the roster.
        total: usize,
    },
    /// Reports that a barrier absorbed one hit.
    BarrierDamaged {
        /// Barrier that took the hit.
        barrier: BarrierKind,
        /// Health remaining after the hit.
        remaining: Health,
        /// Maximum health of the damaged barrier.
        max: Health,
    },
    /// Announces that a barrier's health pool reached zero.
    BarrierBroken {
        /// Barrier that broke.
        barrier: BarrierKind,
    },
    /// Announces the end of the session. Emitted exactly once.
    GameEnded {
        /// Whether the player repelled the swarm.
        outcome: GameOutcome,
    },
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Animation phase an enemy occupies within its state machine.
///
/// `Moving -> AttackWindup -> Attacking -> Moving` cycles while the enemy
/// lives; `Destroyed` is terminal and one-way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Advancing up-screen and drifting horizontally.
    Moving,
    /// Retreating a short standoff distance before striking a barrier.
    AttackWindup,
    /// Lunging back toward the barrier it just damaged.
    Attacking,
    /// Eliminated by typing; never moves again.
    Destroyed,
}

impl EnemyPhase {
    /// Returns `true` while the enemy is in either attack sub-phase.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        matches!(self, Self::AttackWindup | Self::Attacking)
    }
}

/// One of the two sequential defensive barriers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierKind {
    /// First line of defence; must break before the inner barrier is exposed.
    Outer,
    /// Final line of defence; its depletion loses the game.
    Inner,
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Every enemy was destroyed before the inner barrier fell.
    Won,
    /// The inner barrier's health reached zero.
    Lost,
}

/// Health pool value measured in whole points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health remaining after absorbing `amount` points.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether the pool has reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Fraction of `max` that remains, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn fraction_of(&self, max: Health) -> f32 {
        if max.0 == 0 {
            return 0.0;
        }
        (self.0 as f32 / max.0 as f32).clamp(0.0, 1.0)
    }
}

/// Strike rendering state carried by a struck enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrikeState {
    /// Number of typed characters covering the struck prefix.
    pub length: usize,
    /// Whether the strike carries the mistyped error coloring.
    pub mistyped: bool,
}

/// Axis-aligned rectangle in screen coordinates (y grows down-screen).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal coordinate of the left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.x
    }

    /// Horizontal coordinate of the right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Vertical coordinate of the top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.y
    }

    /// Vertical coordinate of the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width of the rectangle.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the rectangle.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Returns the rectangle shifted by the provided offsets.
    #[must_use]
    pub const fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
        }
    }
}

/// Combined 2-D visual transform applied to an enemy's proxy each tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2 {
    /// Horizontal translation in pixels.
    pub translate_x: f32,
    /// Vertical translation in pixels (negative moves up-screen).
    pub translate_y: f32,
    /// Jitter rotation in degrees.
    pub rotation_degrees: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
}

impl Transform2 {
    /// The identity transform: no translation, rotation, or scaling.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotation_degrees: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::{BarrierKind, EnemyId, EnemyPhase, GameOutcome, Health, Rect, Transform2};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn barrier_kind_round_trips_through_bincode() {
        assert_round_trip(&BarrierKind::Inner);
    }

    #[test]
    fn game_outcome_round_trips_through_bincode() {
        assert_round_trip(&GameOutcome::Lost);
    }

    #[test]
    fn health_damage_saturates_at_zero() {
        let pool = Health::new(15);
        let after = pool.damaged(10);
        assert_eq!(after, Health::new(5));
        assert_eq!(after.damaged(10), Health::new(0));
        assert!(after.damaged(10).is_depleted());
    }

    #[test]
    fn health_fraction_spans_unit_interval() {
        let max = Health::new(200);
        assert!((Health::new(200).fraction_of(max) - 1.0).abs() < f32::EPSILON);
        assert!((Health::new(50).fraction_of(max) - 0.25).abs() < f32::EPSILON);
        assert_eq!(Health::new(10).fraction_of(Health::new(0)), 0.0);
    }

    #[test]
    fn rect_edges_follow_origin_and_size() {
        let rect = Rect::new(10.0, 20.0, 30.0, 5.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 25.0);

        let shifted = rect.translated(-2.0, 4.0);
        assert_eq!(shifted.left(), 8.0);
        assert_eq!(shifted.bottom(), 29.0);
    }

    #[test]
    fn identity_transform_is_neutral() {
        let transform = Transform2::default();
        assert_eq!(transform, Transform2::IDENTITY);
        assert_eq!(transform.scale_x, 1.0);
        assert_eq!(transform.rotation_degrees, 0.0);
    }

    #[test]
    fn attack_sub_phases_report_attacking() {
        assert!(EnemyPhase::AttackWindup.is_attacking());
        assert!(EnemyPhase::Attacking.is_attacking());
        assert!(!EnemyPhase::Moving.is_attacking());
        assert!(!EnemyPhase::Destroyed.is_attacking());
    }
}
