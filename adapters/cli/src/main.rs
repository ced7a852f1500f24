#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Type Siege session.
//!
//! The binary stands in for the browser overlay: it resolves synthetic page
//! anchors, builds the world from a word list, and lets a scripted typist
//! race the advancing enemies until one side wins or the session times out.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use type_siege_core::{Command, Event, GameOutcome, Rect, BATTLE_PROMPT};
use type_siege_rendering::{
    Anchor, AnchorQuery, BarrierPresentation, Discovery, DiscoveryError, EndingBanner,
    EnemyPresentation, Presentation, RenderingBackend, Scene,
};
use type_siege_system_clock::{run, CancelToken, GameClock};
use type_siege_system_matching::{InputDisposition, Matching, PrefixTrie};
use type_siege_world::{apply, query, EnemySpawn, FieldLayout, World};

/// Playable width of the synthetic page, in pixels.
const VIEWPORT_WIDTH: f32 = 800.0;

/// Vertical extent enemies spawn across, below the barriers.
const SPAWN_TOP: f32 = 420.0;

/// Headless Type Siege session driven by a scripted typist.
#[derive(Debug, Parser)]
#[command(name = "type-siege", version, about)]
struct Args {
    /// Enemy words; repeat the flag to add more.
    #[arg(long = "word", value_name = "TEXT")]
    words: Vec<String>,

    /// File containing whitespace-separated enemy words.
    #[arg(long, value_name = "PATH", conflicts_with = "words")]
    words_file: Option<PathBuf>,

    /// Seed for enemy speed and animation offsets.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Session cutoff; the run ends unresolved once this elapses.
    #[arg(long, default_value_t = 120)]
    duration_secs: u64,

    /// Keystrokes per second of the scripted typist. Zero disables typing,
    /// which plays the losing side out.
    #[arg(long, default_value_t = 8.0)]
    typing_speed: f64,
}

/// Stand-in page the CLI resolves anchors against.
///
/// A browser backend would look these up in the live document; here the
/// geometry is fixed so runs are reproducible.
struct SyntheticPage;

impl Discovery for SyntheticPage {
    fn wait_until_present(&mut self, query: &AnchorQuery) -> Result<Anchor, DiscoveryError> {
        match query.selector.as_str() {
            "page-header" => Ok(Anchor {
                bottom: 160.0,
                left: 0.0,
                right: VIEWPORT_WIDTH,
            }),
            "search-bar" => Ok(Anchor {
                bottom: 80.0,
                left: 0.0,
                right: VIEWPORT_WIDTH,
            }),
            other => Err(DiscoveryError::AnchorMissing {
                selector: other.to_owned(),
            }),
        }
    }
}

/// Scripted keyboard that types roster words one character at a time.
struct Typist {
    words: Vec<String>,
    next: usize,
    typed: String,
    interval: Option<Duration>,
    since_keystroke: Duration,
}

impl Typist {
    fn new(words: Vec<String>, keystrokes_per_second: f64) -> Self {
        let interval = (keystrokes_per_second > 0.0)
            .then(|| Duration::from_secs_f64(1.0 / keystrokes_per_second));
        Self {
            words,
            next: 0,
            typed: String::new(),
            interval,
            since_keystroke: Duration::ZERO,
        }
    }

    /// Advances the typist by a frame and returns each intermediate input
    /// state, oldest first.
    fn advance(&mut self, dt: Duration) -> Vec<String> {
        let Some(interval) = self.interval else {
            return Vec::new();
        };

        let mut inputs = Vec::new();
        self.since_keystroke += dt;
        while self.since_keystroke >= interval {
            self.since_keystroke -= interval;
            let Some(word) = self.words.get(self.next) else {
                break;
            };
            match word.chars().nth(self.typed.chars().count()) {
                Some(character) => self.typed.push(character),
                None => break,
            }
            inputs.push(self.typed.clone());
        }
        inputs
    }

    /// Clears the input box, moving on to the next word.
    fn clear(&mut self) {
        self.typed.clear();
        self.next += 1;
    }
}

/// Frame loop that plays the session without a display.
struct HeadlessBackend {
    fps: u32,
    duration: Duration,
    token: CancelToken,
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static,
    {
        info!(prompt = %presentation.prompt, "session open");
        let mut scene = presentation.scene;
        let frame_step = Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)));
        let deadline = self.duration;
        let mut elapsed = Duration::ZERO;

        let frames = move || {
            elapsed += frame_step;
            (elapsed <= deadline).then_some(elapsed)
        };

        let mut clock = GameClock::new();
        run(&mut clock, &self.token, frames, |command| {
            if let Command::Tick { dt } = command {
                update_scene(dt, &mut scene);
            }
        });
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let words = load_words(&args)?;
    let layout = resolve_layout(&mut SyntheticPage)?;
    let spawns = plan_spawns(&words);

    let mut world = World::new(layout, spawns, args.seed).context("building the world")?;
    let roster: Vec<(type_siege_core::EnemyId, String)> = world
        .roster()
        .map(|(id, text)| (id, text.to_owned()))
        .collect();
    let trie = PrefixTrie::build(roster.iter().map(|(id, text)| (*id, text.as_str())));
    let mut matching = Matching::new(trie);
    let mut typist = Typist::new(words, args.typing_speed);

    let token = CancelToken::new();
    let backend = HeadlessBackend {
        fps: args.fps,
        duration: Duration::from_secs(args.duration_secs),
        token: token.clone(),
    };

    let outcome: Arc<Mutex<Option<GameOutcome>>> = Arc::new(Mutex::new(None));
    let outcome_sink = Arc::clone(&outcome);

    let presentation = Presentation::new(BATTLE_PROMPT, build_scene(&world));
    backend.run(presentation, move |dt, scene| {
        let mut events = Vec::new();
        apply(&mut world, Command::Tick { dt }, &mut events);

        for input in typist.advance(dt) {
            debug!(input = %input, "keystroke");
            let mut commands = Vec::new();
            let disposition = matching.handle(&input, &mut commands);
            for command in commands {
                apply(&mut world, command, &mut events);
            }
            if disposition == InputDisposition::Clear {
                typist.clear();
                break;
            }
        }

        report(&events);
        if let Some(Event::GameEnded { outcome }) = events
            .iter()
            .find(|event| matches!(event, Event::GameEnded { .. }))
        {
            if let Ok(mut slot) = outcome_sink.lock() {
                *slot = Some(*outcome);
            }
            token.cancel();
        }

        *scene = build_scene(&world);
    })?;

    match outcome.lock().ok().and_then(|slot| *slot) {
        Some(outcome) => {
            let banner = EndingBanner::for_outcome(outcome);
            println!("{}", banner.message);
        }
        None => println!("Time ran out with the barriers still contested."),
    }
    Ok(())
}

/// Collects the enemy word list from the flags, with a built-in fallback.
fn load_words(args: &Args) -> Result<Vec<String>> {
    let words = if let Some(path) = &args.words_file {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading words from {}", path.display()))?;
        contents.split_whitespace().map(str::to_owned).collect()
    } else if !args.words.is_empty() {
        args.words.clone()
    } else {
        ["siege", "rampart", "bulwark", "onslaught", "citadel", "breach"]
            .map(str::to_owned)
            .to_vec()
    };
    anyhow::ensure!(!words.is_empty(), "the word list is empty");
    Ok(words)
}

/// Resolves both page anchors and derives the playable field from them.
fn resolve_layout(discovery: &mut dyn Discovery) -> Result<FieldLayout> {
    let header = discovery
        .wait_until_present(&AnchorQuery::new("page-header"))
        .context("locating the outer barrier anchor")?;
    let search_bar = discovery
        .wait_until_present(&AnchorQuery::new("search-bar"))
        .context("locating the inner barrier anchor")?;

    Ok(FieldLayout::new(
        header.bottom,
        search_bar.bottom,
        header.left,
        header.right,
    ))
}

/// Lays the words out in staggered rows below the barriers.
fn plan_spawns(words: &[String]) -> Vec<EnemySpawn> {
    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let column = (index % 4) as f32;
            let row = (index / 4) as f32;
            let width = word.chars().count() as f32 * 14.0;
            let x = 40.0 + column * 190.0;
            let y = SPAWN_TOP + row * 60.0;
            EnemySpawn::new(word.clone(), Rect::new(x, y, width, 24.0))
        })
        .collect()
}

/// Rebuilds the drawable scene from the world's query views.
fn build_scene(world: &World) -> Scene {
    let enemies = query::enemy_view(world)
        .iter()
        .filter(|snapshot| snapshot.opacity > 0.0)
        .map(|snapshot| {
            EnemyPresentation::new(
                &snapshot.text,
                snapshot.strike,
                snapshot.transform,
                snapshot.opacity,
            )
        })
        .collect();

    let barriers = query::barrier_view(world);
    let bars = vec![
        BarrierPresentation::new(
            barriers.outer.kind,
            barriers.outer.remaining.get(),
            barriers.outer.max.get(),
            barriers.outer.visible,
        ),
        BarrierPresentation::new(
            barriers.inner.kind,
            barriers.inner.remaining.get(),
            barriers.inner.max.get(),
            barriers.inner.visible,
        ),
    ];

    let banner = query::outcome(world).map(EndingBanner::for_outcome);
    Scene::new(enemies, bars, banner)
}

/// Logs the events that surfaced during one frame.
fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::EnemyDestroyed {
                enemy,
                destroyed,
                total,
            } => info!(?enemy, destroyed, total, "enemy destroyed"),
            Event::BarrierDamaged {
                barrier,
                remaining,
                max,
            } => info!(
                ?barrier,
                remaining = remaining.get(),
                max = max.get(),
                "barrier damaged"
            ),
            Event::BarrierBroken { barrier } => info!(?barrier, "barrier broken"),
            Event::GameEnded { outcome } => info!(?outcome, "game ended"),
            Event::TimeAdvanced { .. }
            | Event::EnemyStruck { .. }
            | Event::StrikeCleared { .. } => {
                debug!(?event, "frame event");
            }
        }
    }
}
