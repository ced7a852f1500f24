#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering and page-discovery contracts for Type Siege adapters.

use anyhow::Result as AnyResult;
use std::{error::Error, fmt, time::Duration};
use type_siege_core::{BarrierKind, GameOutcome, StrikeState, Transform2};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Healthy-barrier and victory-banner green.
    pub const GREEN: Self = Self::from_rgb_u8(0x00, 0x6b, 0x3d);

    /// Warning yellow used once a barrier starts wearing down.
    pub const YELLOW: Self = Self::from_rgb_u8(0xff, 0xd3, 0x01);

    /// Critical red shared by failing barriers, mistyped strikes, and the
    /// defeat banner.
    pub const RED: Self = Self::from_rgb_u8(0xe0, 0x3c, 0x32);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Splits enemy text into its struck prefix and the remainder.
///
/// The strike length counts typed characters and may run past the end of the
/// text when the player keeps typing through a mistype, so the split is
/// clamped to the text's character count.
#[must_use]
pub fn split_struck(text: &str, strike: Option<StrikeState>) -> (&str, &str) {
    let length = strike.map_or(0, |strike| strike.length);
    let split = text
        .char_indices()
        .nth(length)
        .map_or(text.len(), |(offset, _)| offset);
    text.split_at(split)
}

/// Single enemy as the backend should draw it on this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Prefix of the enemy text covered by the current strike.
    pub struck: String,
    /// Rest of the enemy text, drawn in the plain text color.
    pub remaining: String,
    /// Whether the struck prefix should use the mistype color.
    pub mistyped: bool,
    /// Placement, rotation, and scale of the enemy's text node.
    pub transform: Transform2,
    /// Opacity in the range 0.0..=1.0.
    pub opacity: f32,
}

impl EnemyPresentation {
    /// Builds the presentation from enemy text and its current strike.
    #[must_use]
    pub fn new(
        text: &str,
        strike: Option<StrikeState>,
        transform: Transform2,
        opacity: f32,
    ) -> Self {
        let (struck, remaining) = split_struck(text, strike);
        Self {
            struck: struck.to_owned(),
            remaining: remaining.to_owned(),
            mistyped: strike.is_some_and(|strike| strike.mistyped),
            transform,
            opacity,
        }
    }

    /// Color of the struck prefix.
    #[must_use]
    pub fn struck_color(&self) -> Option<Color> {
        if self.mistyped {
            Some(Color::RED)
        } else {
            None
        }
    }
}

/// Health bar for one barrier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarrierPresentation {
    /// Which barrier this bar belongs to.
    pub kind: BarrierKind,
    /// Remaining health points.
    pub remaining: u32,
    /// Health points the barrier started with.
    pub max: u32,
    /// Whether the bar should be drawn at all.
    pub visible: bool,
}

impl BarrierPresentation {
    /// Creates a new barrier bar descriptor.
    #[must_use]
    pub const fn new(kind: BarrierKind, remaining: u32, max: u32, visible: bool) -> Self {
        Self {
            kind,
            remaining,
            max,
            visible,
        }
    }

    /// Remaining health as a fraction of the starting health.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.remaining as f32 / self.max as f32
        }
    }

    /// Fill color of the bar at its current health.
    ///
    /// The outer barrier turns yellow at 60% and red at 30%; the inner one
    /// holds out until 50% and 20%.
    #[must_use]
    pub fn color(&self) -> Color {
        let fraction = self.fraction();
        let (warn, critical) = match self.kind {
            BarrierKind::Outer => (0.6, 0.3),
            BarrierKind::Inner => (0.5, 0.2),
        };
        if fraction <= critical {
            Color::RED
        } else if fraction <= warn {
            Color::YELLOW
        } else {
            Color::GREEN
        }
    }
}

/// Full-screen banner shown once the game has ended.
#[derive(Clone, Debug, PartialEq)]
pub struct EndingBanner {
    /// Message displayed across the screen.
    pub message: String,
    /// Color of the message text.
    pub color: Color,
}

impl EndingBanner {
    /// Builds the banner for the given outcome.
    #[must_use]
    pub fn for_outcome(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Won => Self {
                message: "YOU HAVE HELD THE LINE!".to_owned(),
                color: Color::GREEN,
            },
            GameOutcome::Lost => Self {
                message: "THE ENEMIES HAVE BROKEN THROUGH!".to_owned(),
                color: Color::RED,
            },
        }
    }
}

/// Scene description combining enemies, barrier bars, and the ending banner.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    /// Enemies currently visible, in roster order.
    pub enemies: Vec<EnemyPresentation>,
    /// Barrier health bars, outer first.
    pub barriers: Vec<BarrierPresentation>,
    /// Banner to overlay once the game has ended.
    pub banner: Option<EndingBanner>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        enemies: Vec<EnemyPresentation>,
        barriers: Vec<BarrierPresentation>,
        banner: Option<EndingBanner>,
    ) -> Self {
        Self {
            enemies,
            barriers,
            banner,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Prompt text shown in the typing box before the first keystroke.
    pub prompt: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(prompt: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            prompt: prompt.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Type Siege scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and may
    /// mutate the scene before it is rendered, allowing adapters to animate
    /// world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

/// Page anchor the overlay mounts against, resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Distance from the top of the viewport to the anchor's bottom edge.
    pub bottom: f32,
    /// Left edge of the playable region.
    pub left: f32,
    /// Right edge of the playable region.
    pub right: f32,
}

/// Query naming the host-page element an anchor should resolve to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorQuery {
    /// Selector-like label understood by the hosting backend.
    pub selector: String,
}

impl AnchorQuery {
    /// Creates a query for the named element.
    #[must_use]
    pub fn new<T>(selector: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            selector: selector.into(),
        }
    }
}

/// One-shot lookup of the host-page anchors the overlay attaches to.
///
/// Resolution happens exactly once before the world is constructed. A
/// missing anchor fails startup; the contract deliberately has no retry or
/// re-discovery surface.
pub trait Discovery {
    /// Resolves the query to an anchor or reports why it cannot.
    fn wait_until_present(&mut self, query: &AnchorQuery) -> Result<Anchor, DiscoveryError>;
}

/// Errors that can occur while resolving page anchors.
#[derive(Debug, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The queried element does not exist on the host page.
    AnchorMissing {
        /// Selector that failed to resolve.
        selector: String,
    },
    /// The element exists but reports no usable geometry.
    AnchorEmpty {
        /// Selector of the degenerate element.
        selector: String,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnchorMissing { selector } => {
                write!(f, "anchor `{selector}` is not present on the page")
            }
            Self::AnchorEmpty { selector } => {
                write!(f, "anchor `{selector}` resolved to an empty bounding box")
            }
        }
    }
}

impl Error for DiscoveryError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn strike(length: usize, mistyped: bool) -> Option<StrikeState> {
        Some(StrikeState { length, mistyped })
    }

    #[test]
    fn split_struck_divides_at_the_typed_length() {
        assert_eq!(split_struck("monster", strike(3, false)), ("mon", "ster"));
    }

    #[test]
    fn split_struck_without_a_strike_leaves_the_text_whole() {
        assert_eq!(split_struck("monster", None), ("", "monster"));
    }

    #[test]
    fn split_struck_clamps_past_the_end_of_the_text() {
        assert_eq!(split_struck("cat", strike(7, true)), ("cat", ""));
    }

    #[test]
    fn split_struck_respects_multibyte_boundaries() {
        assert_eq!(split_struck("caféine", strike(4, false)), ("café", "ine"));
    }

    #[test]
    fn mistyped_strikes_use_the_mistype_color() {
        let clean = EnemyPresentation::new("cat", strike(2, false), Transform2::IDENTITY, 1.0);
        let botched = EnemyPresentation::new("cat", strike(2, true), Transform2::IDENTITY, 1.0);

        assert_eq!(clean.struck_color(), None);
        assert_eq!(botched.struck_color(), Some(Color::RED));
    }

    #[test]
    fn outer_barrier_colors_step_at_sixty_and_thirty_percent() {
        let bar = |remaining| BarrierPresentation::new(BarrierKind::Outer, remaining, 100, true);

        assert_eq!(bar(100).color(), Color::GREEN);
        assert_eq!(bar(61).color(), Color::GREEN);
        assert_eq!(bar(60).color(), Color::YELLOW);
        assert_eq!(bar(31).color(), Color::YELLOW);
        assert_eq!(bar(30).color(), Color::RED);
        assert_eq!(bar(0).color(), Color::RED);
    }

    #[test]
    fn inner_barrier_colors_step_at_fifty_and_twenty_percent() {
        let bar = |remaining| BarrierPresentation::new(BarrierKind::Inner, remaining, 200, true);

        assert_eq!(bar(200).color(), Color::GREEN);
        assert_eq!(bar(101).color(), Color::GREEN);
        assert_eq!(bar(100).color(), Color::YELLOW);
        assert_eq!(bar(41).color(), Color::YELLOW);
        assert_eq!(bar(40).color(), Color::RED);
    }

    #[test]
    fn ending_banners_match_the_outcome() {
        let won = EndingBanner::for_outcome(GameOutcome::Won);
        let lost = EndingBanner::for_outcome(GameOutcome::Lost);

        assert_eq!(won.color, Color::GREEN);
        assert_eq!(lost.color, Color::RED);
        assert_ne!(won.message, lost.message);
    }
}
