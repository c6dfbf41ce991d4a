//! Cardplay - headless demo binary
//!
//! Runs the interaction engine without a renderer: a scripted selection
//! session or a staggered open/close animation pass, driven through the
//! tick-based animation host, with session events printed as they fire.

use anyhow::{bail, Context};
use cardplay::anim::TickHost;
use cardplay::cardset::{Cardset, SelectConfig, SelectEvents};
use cardplay::core::{CardColor, CardData, CardType, ColorsPoints};
use cardplay::input::{InputEvent, Keyboard};
use cardplay::logger::{EventLogger, VerbosityLevel};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Verbosity level (names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "cardplay")]
#[command(about = "Card interaction engine - headless demo", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted selection session over a hand of cards
    Select {
        /// Load the hand from a JSON file instead of generating one
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,

        /// Number of random cards when no data file is given
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Color budget, e.g. "red=5,blue=3"
        #[arg(long)]
        budget: Option<String>,

        /// Maximum number of picks (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Starting cursor index
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Input script: f (forward), b (back), c (confirm), x (cancel)
        #[arg(long, default_value = "c f c x")]
        script: String,

        /// Output verbosity
        #[arg(long, default_value = "normal")]
        verbosity: VerbosityArg,

        /// RNG seed for the generated hand
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Stagger-open and stagger-close a hand of cards
    Animate {
        /// Number of random cards
        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Per-card delay increment in milliseconds
        #[arg(long, default_value_t = 100)]
        delay: u32,

        /// Output verbosity
        #[arg(long, default_value = "verbose")]
        verbosity: VerbosityArg,

        /// RNG seed for the generated hand
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Select {
            data,
            count,
            budget,
            limit,
            start,
            script,
            verbosity,
            seed,
        } => run_select(data, count, budget, limit, start, &script, verbosity.0, seed),
        Commands::Animate {
            count,
            delay,
            verbosity,
            seed,
        } => run_animate(count, delay, verbosity.0, seed),
    }
}

fn random_cards(count: usize, seed: u64) -> Vec<CardData> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let color = CardColor::ALL[rng.gen_range(0..CardColor::ALL.len())];
            let type_id = if rng.gen_range(0..3) == 0 {
                CardType::Power
            } else {
                CardType::Battle
            };
            let cost = rng.gen_range(1..=5);
            CardData {
                color,
                cost,
                attack_points: rng.gen_range(0..=9),
                health_points: rng.gen_range(1..=9),
                type_id,
                image: format!("card-{color}-{cost}"),
            }
        })
        .collect()
}

fn load_cards(data: Option<PathBuf>, count: usize, seed: u64) -> anyhow::Result<Vec<CardData>> {
    match data {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading card data from {}", path.display()))?;
            let records: Vec<CardData> =
                serde_json::from_str(&text).context("parsing card data JSON")?;
            Ok(records)
        }
        None => Ok(random_cards(count, seed)),
    }
}

fn parse_budget(arg: &str) -> anyhow::Result<ColorsPoints> {
    let mut points = ColorsPoints::new();
    for pair in arg.split(',').filter(|p| !p.trim().is_empty()) {
        let Some((color, value)) = pair.split_once('=') else {
            bail!("invalid budget entry '{pair}' (expected color=points)");
        };
        let color: CardColor = color.trim().parse()?;
        let value: u16 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid point value in '{pair}'"))?;
        points.set(color, value);
    }
    Ok(points)
}

fn parse_script(script: &str) -> anyhow::Result<Vec<InputEvent>> {
    script
        .split_whitespace()
        .map(|token| match token {
            "f" | "forward" | "right" => Ok(InputEvent::CursorForward),
            "b" | "back" | "left" => Ok(InputEvent::CursorBack),
            "c" | "confirm" | "enter" => Ok(InputEvent::Confirm),
            "x" | "cancel" | "esc" => Ok(InputEvent::Cancel),
            _ => bail!("unknown script token '{token}'"),
        })
        .collect()
}

fn describe(index: usize, data: &CardData) -> String {
    format!(
        "{index}: {} {} cost {} ({:02}/{:02})",
        data.color, data.type_id, data.cost, data.attack_points, data.health_points
    )
}

/// Drain queued animations until every card is static again.
fn settle(set: &mut Cardset, host: &mut TickHost) {
    for _ in 0..64 {
        host.run_to_completion();
        set.update(host);
        if set.cards().iter().all(|c| c.is_static()) {
            return;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_select(
    data: Option<PathBuf>,
    count: usize,
    budget: Option<String>,
    limit: usize,
    start: usize,
    script: &str,
    verbosity: VerbosityLevel,
    seed: u64,
) -> anyhow::Result<()> {
    let logger = Rc::new(EventLogger::with_verbosity(verbosity));
    let records = load_cards(data, count, seed)?;
    let events = parse_script(script)?;

    logger.minimal(format!("hand of {} cards:", records.len()));
    for (i, record) in records.iter().enumerate() {
        logger.minimal(format!("  {}", describe(i, record)));
    }

    let colors_points = match &budget {
        Some(arg) => {
            let points = parse_budget(arg)?;
            logger.minimal(format!("budget: {points}"));
            Some(Rc::new(RefCell::new(points)))
        }
        None => None,
    };

    let mut host = TickHost::new();
    let mut set = Cardset::from_data(&records);
    set.attach_keyboard(Keyboard::new());
    for card in set.cards_mut() {
        card.set_face_up(true);
    }

    let completed: Rc<RefCell<Option<Vec<usize>>>> = Rc::new(RefCell::new(None));
    let select_events = SelectEvents {
        on_change_index: Some(Box::new({
            let logger = Rc::clone(&logger);
            move |i| logger.input(format!("cursor moved to {i}"))
        })),
        on_marked: Some(Box::new({
            let logger = Rc::clone(&logger);
            move |i| logger.selection(format!("card {i} picked"))
        })),
        on_completed: Some(Box::new({
            let logger = Rc::clone(&logger);
            let completed = Rc::clone(&completed);
            move |indexes| {
                logger.selection(format!("session completed with picks {indexes:?}"));
                *completed.borrow_mut() = Some(indexes.to_vec());
            }
        })),
        on_leave: Some(Box::new({
            let logger = Rc::clone(&logger);
            move || logger.selection("session abandoned with no picks")
        })),
    };

    set.enter_select_mode(SelectConfig {
        events: select_events,
        colors_points: colors_points.clone(),
        select_limit: limit,
        start_index: start,
    })?;

    for event in events {
        logger.input(format!("{event:?}"));
        if let Some(keyboard) = set.keyboard_mut() {
            keyboard.push(event);
        }
        set.update(&mut host);
        if !set.is_select_mode() {
            break;
        }
    }
    settle(&mut set, &mut host);

    match completed.borrow().as_ref() {
        Some(indexes) => logger.minimal(format!("final selection: {indexes:?}")),
        None => logger.minimal("no selection committed"),
    }
    if let Some(points) = colors_points {
        logger.minimal(format!("remaining budget: {}", points.borrow()));
    }
    Ok(())
}

fn run_animate(count: usize, delay: u32, verbosity: VerbosityLevel, seed: u64) -> anyhow::Result<()> {
    let logger = Rc::new(EventLogger::with_verbosity(verbosity));
    let records = random_cards(count, seed);
    let mut host = TickHost::new();
    let mut set = Cardset::from_data(&records);

    logger.minimal(format!("opening {count} cards, {delay}ms stagger"));
    set.open_all(delay, {
        let logger = Rc::clone(&logger);
        Some(Box::new(move || logger.animation("all cards opened")))
    });
    settle(&mut set, &mut host);
    for card in set.cards() {
        logger.animation(format!(
            "card {} at ({}, {}) scale {}",
            card.id(),
            card.x,
            card.y,
            card.scale_x
        ));
    }

    logger.minimal("closing");
    set.close_all(delay, {
        let logger = Rc::clone(&logger);
        Some(Box::new(move || logger.animation("all cards closed")))
    });
    settle(&mut set, &mut host);

    logger.minimal(format!("done at t={}ms", host.now()));
    Ok(())
}
