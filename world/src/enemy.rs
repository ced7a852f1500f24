//! Enemy entity and its per-tick animation state machine.

use rand::Rng;
use std::f32::consts::{PI, TAU};
use type_siege_core::{BarrierKind, EnemyId, EnemyPhase, Rect, StrikeState, Transform2};

use crate::barriers::FieldState;

const WINDUP_SPEED: f32 = 10.0;
const ATTACK_SPEED: f32 = 80.0;
const BARRIER_STANDOFF: f32 = 15.0;

const JITTER_DEGREES: f32 = 2.0;
const JITTERS_PER_SECOND: f32 = 15.0;
const JITTER_WINDOW_SECONDS: i64 = 2;
const JITTER_BURST_SECONDS: f32 = 0.5;

const SCALE_AMPLITUDE: f32 = 0.05;
const SCALE_FREQUENCY_HZ: f32 = 0.5;
const TIME_OFFSET_RANGE_SECONDS: f32 = 10.0;

#[derive(Clone, Copy, Debug)]
struct SpeedTier {
    max_index: usize,
    base: f32,
    modifier: f32,
}

/// Index-tiered speed table scanned in ascending order; creation indices in
/// the gaps (3-5, 7-8) fall through to the next higher tier, and indices past
/// the last tier use the fastest one. Later enemies ramp the difficulty up.
const SPEED_TIERS: [SpeedTier; 4] = [
    SpeedTier {
        max_index: 0,
        base: 2.0,
        modifier: 0.0,
    },
    SpeedTier {
        max_index: 2,
        base: 5.0,
        modifier: 5.0,
    },
    SpeedTier {
        max_index: 6,
        base: 10.0,
        modifier: 5.0,
    },
    SpeedTier {
        max_index: 9,
        base: 20.0,
        modifier: 5.0,
    },
];

fn speed_tier(index: usize) -> SpeedTier {
    SPEED_TIERS
        .iter()
        .copied()
        .find(|tier| index <= tier.max_index)
        .unwrap_or(SPEED_TIERS[SPEED_TIERS.len() - 1])
}

/// One animated representation of a roster text the player must type.
#[derive(Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    text: String,
    origin: Rect,
    phase: EnemyPhase,
    y_speed: f32,
    x_speed: f32,
    traveled_x: f32,
    traveled_y: f32,
    scale_frequency: f32,
    time_offset: f32,
    elapsed: f32,
    strike: Option<StrikeState>,
    transform: Transform2,
    opacity: f32,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        text: String,
        origin: Rect,
        index: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let tier = speed_tier(index);
        let y_speed = (rng.gen::<f32>() * tier.modifier).round() + tier.base;
        let x_speed = rng.gen::<f32>() * 10.0 - 5.0;
        let time_offset = rng.gen::<f32>() * TIME_OFFSET_RANGE_SECONDS;

        Self {
            id,
            text,
            origin,
            phase: EnemyPhase::Moving,
            y_speed,
            x_speed,
            traveled_x: 0.0,
            traveled_y: 0.0,
            scale_frequency: SCALE_FREQUENCY_HZ,
            time_offset,
            elapsed: 0.0,
            strike: None,
            transform: Transform2::IDENTITY,
            opacity: 1.0,
        }
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) const fn phase(&self) -> EnemyPhase {
        self.phase
    }

    pub(crate) const fn strike_state(&self) -> Option<StrikeState> {
        self.strike
    }

    pub(crate) const fn transform(&self) -> Transform2 {
        self.transform
    }

    pub(crate) const fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Current bounding box of the enemy's visual proxy.
    pub(crate) const fn bounding_box(&self) -> Rect {
        self.origin.translated(self.traveled_x, -self.traveled_y)
    }

    /// Vertical position of the enemy's top edge.
    fn y_position(&self) -> f32 {
        self.origin.top() - self.traveled_y
    }

    /// Fully up-screen enemies stop animating; they never come back down.
    fn is_culled(&self) -> bool {
        self.bounding_box().bottom() < 0.0
    }

    /// Reports which barrier the enemy has just crossed, if any. The caller
    /// invokes the matching damage hook and only then starts the windup.
    pub(crate) fn threshold_crossing(&self, field: &FieldState) -> Option<BarrierKind> {
        if self.phase == EnemyPhase::Destroyed || self.phase.is_attacking() || self.is_culled() {
            return None;
        }

        if !field.outer_broken() && self.y_position() < field.outer_threshold() {
            Some(BarrierKind::Outer)
        } else if field.outer_broken() && !field.lost() && self.y_position() < field.inner_threshold()
        {
            Some(BarrierKind::Inner)
        } else {
            None
        }
    }

    pub(crate) fn begin_windup(&mut self) {
        self.phase = EnemyPhase::AttackWindup;
    }

    /// Advances the enemy by `dt` seconds and recomputes its visual transform.
    pub(crate) fn step(&mut self, dt: f32, field: &FieldState) {
        if self.phase == EnemyPhase::Destroyed || self.is_culled() {
            return;
        }

        self.elapsed += dt;
        let animation_time = self.elapsed + self.time_offset;

        let (translate_x, translate_y) = if self.phase.is_attacking() {
            self.step_attack(dt, field)
        } else {
            self.step_move(dt, field)
        };

        let (scale_x, scale_y) = self.scale_oscillation(animation_time);
        self.transform = Transform2 {
            translate_x,
            translate_y,
            rotation_degrees: self.jitter_rotation(animation_time),
            scale_x,
            scale_y,
        };
    }

    fn step_move(&mut self, dt: f32, field: &FieldState) -> (f32, f32) {
        self.traveled_y += dt * self.y_speed;
        self.traveled_x += dt * self.x_speed;

        let bounds = self.bounding_box();
        if bounds.right() >= field.right_bound() || bounds.left() <= field.left_bound() {
            self.x_speed = -self.x_speed;
        }

        (self.traveled_x.round(), -self.traveled_y.round())
    }

    fn step_attack(&mut self, dt: f32, field: &FieldState) -> (f32, f32) {
        let bound = field.active_threshold();

        match self.phase {
            EnemyPhase::AttackWindup => {
                self.traveled_y -= WINDUP_SPEED * dt;
                if self.y_position() > bound + BARRIER_STANDOFF {
                    self.phase = EnemyPhase::Attacking;
                }
            }
            EnemyPhase::Attacking => {
                self.traveled_y += ATTACK_SPEED * dt;
                if self.y_position() < bound {
                    self.phase = EnemyPhase::Moving;
                }
            }
            EnemyPhase::Moving | EnemyPhase::Destroyed => {}
        }

        (self.traveled_x, -self.traveled_y.round())
    }

    /// Jitter toggles at a fixed cadence during the first half of every
    /// two-second window; suppressed in windup, forced while attacking.
    fn jitter_rotation(&self, animation_time: f32) -> f32 {
        let in_burst = (animation_time.floor() as i64) % JITTER_WINDOW_SECONDS == 0
            && animation_time.fract() < JITTER_BURST_SECONDS;
        let should_jitter = self.phase == EnemyPhase::Attacking
            || (in_burst && self.phase != EnemyPhase::AttackWindup);
        if !should_jitter {
            return 0.0;
        }

        let progress = (animation_time.fract() * JITTERS_PER_SECOND).floor() as i64;
        if progress % 2 == 0 {
            JITTER_DEGREES
        } else {
            -JITTER_DEGREES
        }
    }

    /// Sinusoidal breathing: the X and Y scales oscillate half a period apart.
    fn scale_oscillation(&self, animation_time: f32) -> (f32, f32) {
        let theta = (animation_time * self.scale_frequency * TAU) % TAU;
        (
            1.0 + SCALE_AMPLITUDE * theta.sin(),
            1.0 + SCALE_AMPLITUDE * (theta + PI).sin(),
        )
    }

    pub(crate) fn strike(&mut self, length: usize, mistyped: bool) {
        self.strike = Some(StrikeState { length, mistyped });
    }

    pub(crate) fn reset_strike(&mut self) {
        self.strike = None;
    }

    /// One-way transition into the terminal phase. Returns whether this call
    /// performed the transition; repeats are absorbed.
    pub(crate) fn destroy(&mut self) -> bool {
        if self.phase == EnemyPhase::Destroyed {
            return false;
        }
        self.phase = EnemyPhase::Destroyed;
        self.opacity = 0.0;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{speed_tier, Enemy, SPEED_TIERS};
    use crate::barriers::{FieldLayout, FieldState};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use type_siege_core::{EnemyId, EnemyPhase, Rect};

    fn field() -> FieldState {
        FieldState::new(&FieldLayout::new(200.0, 100.0, 0.0, 600.0))
    }

    fn enemy_at(origin: Rect, index: usize) -> Enemy {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        Enemy::new(EnemyId::new(0), "fixture".to_owned(), origin, index, &mut rng)
    }

    #[test]
    fn speed_tiers_fall_through_gaps_to_the_next_higher_tier() {
        assert_eq!(speed_tier(0).base, 2.0);
        assert_eq!(speed_tier(1).base, 5.0);
        assert_eq!(speed_tier(2).base, 5.0);
        for index in 3..=6 {
            assert_eq!(speed_tier(index).base, 10.0);
        }
        for index in 7..=9 {
            assert_eq!(speed_tier(index).base, 20.0);
        }
        // Past the table the fastest tier applies.
        assert_eq!(speed_tier(10).base, SPEED_TIERS[3].base);
        assert_eq!(speed_tier(100).base, SPEED_TIERS[3].base);
    }

    #[test]
    fn vertical_speed_is_an_integer_within_the_tier_range() {
        for index in 0..12 {
            let enemy = enemy_at(Rect::new(0.0, 400.0, 50.0, 20.0), index);
            let tier = speed_tier(index);
            assert_eq!(enemy.y_speed, enemy.y_speed.round());
            assert!(enemy.y_speed >= tier.base);
            assert!(enemy.y_speed <= tier.base + tier.modifier);
            assert!(enemy.x_speed >= -5.0 && enemy.x_speed < 5.0);
            assert!(enemy.time_offset >= 0.0 && enemy.time_offset < 10.0);
        }
    }

    #[test]
    fn windup_retreats_then_attack_returns_to_the_threshold() {
        let field = field();
        let mut enemy = enemy_at(Rect::new(50.0, 400.0, 50.0, 20.0), 0);
        // Position the enemy just past the outer threshold.
        enemy.traveled_y = 201.0;
        enemy.begin_windup();

        // Windup retreats (traveled_y shrinks) until the standoff is reached.
        let mut steps = 0;
        while enemy.phase == EnemyPhase::AttackWindup {
            let before = enemy.traveled_y;
            enemy.step(0.1, &field);
            assert!(enemy.traveled_y < before);
            steps += 1;
            assert!(steps < 100, "windup never reached the standoff");
        }
        assert_eq!(enemy.phase, EnemyPhase::Attacking);
        assert!(enemy.y_position() > field.outer_threshold());

        // The attack lunge advances until the enemy is back at the threshold.
        let mut steps = 0;
        while enemy.phase == EnemyPhase::Attacking {
            let before = enemy.traveled_y;
            enemy.step(0.05, &field);
            assert!(enemy.traveled_y > before);
            steps += 1;
            assert!(steps < 100, "attack never returned to the threshold");
        }
        assert_eq!(enemy.phase, EnemyPhase::Moving);
    }

    #[test]
    fn jitter_is_suppressed_in_windup_and_forced_while_attacking() {
        let mut enemy = enemy_at(Rect::new(50.0, 400.0, 50.0, 20.0), 0);

        enemy.phase = EnemyPhase::AttackWindup;
        assert_eq!(enemy.jitter_rotation(0.1), 0.0);

        enemy.phase = EnemyPhase::Attacking;
        // Attacking jitters even outside the periodic burst window.
        assert_ne!(enemy.jitter_rotation(1.7), 0.0);

        enemy.phase = EnemyPhase::Moving;
        assert_ne!(enemy.jitter_rotation(0.1), 0.0);
        // Second half of the window is quiet, as is the odd second.
        assert_eq!(enemy.jitter_rotation(0.7), 0.0);
        assert_eq!(enemy.jitter_rotation(1.2), 0.0);
    }

    #[test]
    fn scale_oscillation_breathes_half_a_period_apart() {
        let enemy = enemy_at(Rect::new(50.0, 400.0, 50.0, 20.0), 0);
        let (scale_x, scale_y) = enemy.scale_oscillation(0.5);
        // sin(theta) and sin(theta + pi) are opposite.
        assert!((scale_x - 1.0 + (scale_y - 1.0)).abs() < 1e-4);
        assert!(scale_x >= 0.95 && scale_x <= 1.05);
        assert!(scale_y >= 0.95 && scale_y <= 1.05);
    }

    #[test]
    fn drift_bounces_at_the_right_bound() {
        let field = field();
        let mut enemy = enemy_at(Rect::new(520.0, 400.0, 50.0, 20.0), 0);
        enemy.x_speed = 5.0;
        enemy.y_speed = 0.0;

        let mut steps = 0;
        while enemy.x_speed > 0.0 {
            enemy.step(0.1, &field);
            steps += 1;
            assert!(steps < 1000, "drift never reached the right bound");
        }

        // Once inverted the enemy moves leftward.
        let before = enemy.bounding_box().left();
        enemy.step(0.1, &field);
        assert!(enemy.bounding_box().left() < before);
    }

    #[test]
    fn destroy_is_one_way_and_repeats_are_absorbed() {
        let mut enemy = enemy_at(Rect::new(50.0, 400.0, 50.0, 20.0), 0);
        assert!(enemy.destroy());
        assert!(!enemy.destroy());
        assert_eq!(enemy.phase(), EnemyPhase::Destroyed);
        assert_eq!(enemy.opacity(), 0.0);
    }

    #[test]
    fn off_screen_enemies_stop_animating() {
        let field = field();
        let mut enemy = enemy_at(Rect::new(50.0, 400.0, 50.0, 20.0), 0);
        // Push the whole proxy above the visibility cutoff.
        enemy.traveled_y = 500.0;
        let before = enemy.bounding_box();
        enemy.step(1.0, &field);
        assert_eq!(enemy.bounding_box(), before);
    }
}
