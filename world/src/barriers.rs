//! Sequential defensive barriers and the shared field state they guard.

use type_siege_core::{BarrierKind, Event, Health};

pub(crate) const OUTER_MAX: Health = Health::new(100);
pub(crate) const INNER_MAX: Health = Health::new(200);
const DAMAGE_PER_HIT: u32 = 10;

/// Shared game-session record read by enemies and mutated by the barriers.
///
/// Exactly one instance exists per [`World`](crate::World); it is threaded by
/// reference to the components that need it rather than looked up ambiently.
#[derive(Debug)]
pub struct FieldState {
    outer_broken: bool,
    outer_threshold: f32,
    inner_threshold: f32,
    left_bound: f32,
    right_bound: f32,
    won: bool,
    lost: bool,
}

impl FieldState {
    pub(crate) const fn new(layout: &FieldLayout) -> Self {
        Self {
            outer_broken: false,
            outer_threshold: layout.outer_threshold,
            inner_threshold: layout.inner_threshold,
            left_bound: layout.left_bound,
            right_bound: layout.right_bound,
            won: false,
            lost: false,
        }
    }

    /// Whether the outer barrier has been depleted and hidden.
    #[must_use]
    pub const fn outer_broken(&self) -> bool {
        self.outer_broken
    }

    /// Vertical threshold of the outer barrier's bottom edge.
    #[must_use]
    pub const fn outer_threshold(&self) -> f32 {
        self.outer_threshold
    }

    /// Vertical threshold of the inner barrier's bottom edge.
    #[must_use]
    pub const fn inner_threshold(&self) -> f32 {
        self.inner_threshold
    }

    /// Leftmost horizontal coordinate enemies may drift to.
    #[must_use]
    pub const fn left_bound(&self) -> f32 {
        self.left_bound
    }

    /// Rightmost horizontal coordinate enemies may drift to.
    #[must_use]
    pub const fn right_bound(&self) -> f32 {
        self.right_bound
    }

    /// Whether every enemy has been destroyed.
    #[must_use]
    pub const fn won(&self) -> bool {
        self.won
    }

    /// Whether the inner barrier has fallen.
    #[must_use]
    pub const fn lost(&self) -> bool {
        self.lost
    }

    /// Threshold attacking enemies retreat from and lunge at.
    #[must_use]
    pub(crate) const fn active_threshold(&self) -> f32 {
        if self.outer_broken {
            self.inner_threshold
        } else {
            self.outer_threshold
        }
    }

    pub(crate) fn set_won(&mut self) {
        self.won = true;
    }
}

/// Geometry resolved once by the page-discovery collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLayout {
    outer_threshold: f32,
    inner_threshold: f32,
    left_bound: f32,
    right_bound: f32,
}

impl FieldLayout {
    /// Creates a new field layout from barrier thresholds and drift bounds.
    ///
    /// The inner barrier sits up-screen of the outer one, so its threshold is
    /// the smaller coordinate. Validation happens in [`World::new`](crate::World::new).
    #[must_use]
    pub const fn new(
        outer_threshold: f32,
        inner_threshold: f32,
        left_bound: f32,
        right_bound: f32,
    ) -> Self {
        Self {
            outer_threshold,
            inner_threshold,
            left_bound,
            right_bound,
        }
    }

    pub(crate) const fn outer_threshold(&self) -> f32 {
        self.outer_threshold
    }

    pub(crate) const fn inner_threshold(&self) -> f32 {
        self.inner_threshold
    }

    pub(crate) const fn left_bound(&self) -> f32 {
        self.left_bound
    }

    pub(crate) const fn right_bound(&self) -> f32 {
        self.right_bound
    }
}

/// Two sequential health pools standing between the swarm and defeat.
#[derive(Debug)]
pub(crate) struct Barriers {
    outer: Health,
    inner: Health,
    inner_shown: bool,
}

impl Barriers {
    pub(crate) const fn new() -> Self {
        Self {
            outer: OUTER_MAX,
            inner: INNER_MAX,
            inner_shown: false,
        }
    }

    pub(crate) const fn outer(&self) -> Health {
        self.outer
    }

    pub(crate) const fn inner(&self) -> Health {
        self.inner
    }

    pub(crate) const fn inner_shown(&self) -> bool {
        self.inner_shown
    }

    /// Applies one hit to the given barrier. The damage hook mutates the
    /// shared field state before the caller transitions the enemy into its
    /// windup, matching the required update ordering.
    pub(crate) fn damage(
        &mut self,
        kind: BarrierKind,
        field: &mut FieldState,
        out_events: &mut Vec<Event>,
    ) {
        match kind {
            BarrierKind::Outer => self.damage_outer(field, out_events),
            BarrierKind::Inner => self.damage_inner(field, out_events),
        }
    }

    fn damage_outer(&mut self, field: &mut FieldState, out_events: &mut Vec<Event>) {
        if self.outer.is_depleted() {
            return;
        }

        self.outer = self.outer.damaged(DAMAGE_PER_HIT);
        out_events.push(Event::BarrierDamaged {
            barrier: BarrierKind::Outer,
            remaining: self.outer,
            max: OUTER_MAX,
        });

        if self.outer.is_depleted() {
            field.outer_broken = true;
            self.inner_shown = true;
            out_events.push(Event::BarrierBroken {
                barrier: BarrierKind::Outer,
            });
        }
    }

    fn damage_inner(&mut self, field: &mut FieldState, out_events: &mut Vec<Event>) {
        // Redundant hits before the inner barrier is revealed are absorbed.
        if !self.inner_shown || self.inner.is_depleted() {
            return;
        }

        self.inner = self.inner.damaged(DAMAGE_PER_HIT);
        out_events.push(Event::BarrierDamaged {
            barrier: BarrierKind::Inner,
            remaining: self.inner,
            max: INNER_MAX,
        });

        if self.inner.is_depleted() {
            field.lost = true;
            out_events.push(Event::BarrierBroken {
                barrier: BarrierKind::Inner,
            });
        }
    }
}
