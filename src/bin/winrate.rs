use std::collections::HashMap;
use std::error::Error;
use std::process;
use std::time::Instant;

use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use unobot::{Bot, Difficulty, Game, GameError, PlayerId, Rules};
use unobot::{create_bot_from_spec, label_for_spec};

/// Default base seed for deterministic runs.
const DEFAULT_SEED: u64 = 0xC0FFEE_u64 << 32 | 0x5EED_u64;

#[derive(Parser, Debug)]
#[command(
    name = "winrate",
    about = "Run many games and summarize per-bot win rates and points."
)]
struct Args {
    /// Number of games to simulate
    #[arg(short = 'g', long = "games", default_value_t = 200)]
    games: usize,

    /// Base RNG seed (deck + bot RNGs will be derived deterministically)
    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Safety cap on turns per game; games exceeding this are aborted (not counted as a win)
    #[arg(long = "max-turns", default_value_t = 2000)]
    max_turns: usize,

    /// Draw-two cards stack
    #[arg(long = "stack", action = ArgAction::SetTrue)]
    stack: bool,

    /// Sevens swap hands, zeros rotate all hands
    #[arg(long = "seven-zero", action = ArgAction::SetTrue)]
    seven_zero: bool,

    /// A playable card drawn voluntarily must be played
    #[arg(long = "forced-play", action = ArgAction::SetTrue)]
    forced_play: bool,

    /// Seats 0/2 play against seats 1/3 (four bots only)
    #[arg(long = "team", action = ArgAction::SetTrue)]
    team: bool,

    /// Easy difficulty for engine-side decisions
    #[arg(long = "easy", action = ArgAction::SetTrue)]
    easy: bool,

    /// Keep seating fixed instead of shuffling it every game
    #[arg(long = "fixed-seats", action = ArgAction::SetTrue)]
    fixed_seats: bool,

    /// Log engine events (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Bot specs, one per seat: e.g. hard easy random ai (3 or 4 total)
    bots: Vec<String>,
}

/// Totals collected per bot label.
#[derive(Default)]
struct LabelStats {
    seats: usize,
    wins: usize,
    points: i64,
    decisions: usize,
    decision_ns: u128,
}

fn main() {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if !(3..=4).contains(&args.bots.len()) {
        return Err(format!(
            "expected 3 or 4 bot specs (e.g. hard easy random ai), received {}",
            args.bots.len()
        )
        .into());
    }
    // A human seat would block waiting for input.
    if args
        .bots
        .iter()
        .any(|spec| label_for_spec(spec) == "human")
    {
        return Err("human players are not supported in winrate runs".into());
    }

    let rules = Rules {
        stack_draw_two: args.stack,
        seven_zero: args.seven_zero,
        forced_play: args.forced_play,
        team: args.team,
    };
    let difficulty = if args.easy {
        Difficulty::Easy
    } else {
        Difficulty::Hard
    };
    let seat_count = args.bots.len();
    let labels_for_spec: Vec<String> = args.bots.iter().map(|spec| label_for_spec(spec)).collect();

    let mut stats: HashMap<String, LabelStats> = HashMap::new();
    let mut aborted_games = 0usize;

    for game_idx in 0..args.games {
        let mut order: Vec<usize> = (0..seat_count).collect();
        if !args.fixed_seats {
            let mut seat_rng = StdRng::seed_from_u64(args.seed ^ 0x9E37_79B9 ^ (game_idx as u64));
            order.shuffle(&mut seat_rng);
        }

        let deck_seed = mix_seed(args.seed, game_idx as u64, 0x5EED_15);
        let mut game = Game::builder(seat_count)?
            .with_seed(deck_seed)
            .with_rules(rules)
            .with_difficulty(difficulty)
            .with_autopilot(true)
            .build()?;
        let seats: Vec<PlayerId> = game.ring().seats().collect();

        let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(seat_count);
        let mut labels: Vec<String> = Vec::with_capacity(seat_count);
        for (seat, src_idx) in seats.iter().zip(&order) {
            let bot_seed = mix_seed(args.seed, game_idx as u64, *seat as u64);
            bots.push(create_bot_from_spec(&args.bots[*src_idx], *seat, bot_seed)?);
            labels.push(labels_for_spec[*src_idx].clone());
        }
        for label in &labels {
            stats.entry(label.clone()).or_default().seats += 1;
        }

        let mut turns = 0usize;
        while !game.is_finished() && turns < args.max_turns {
            let current = game.current_player();
            let bot_index = seats
                .iter()
                .position(|seat| *seat == current)
                .ok_or(GameError::InvalidPlayer(current))?;
            let state = game.state_view(current)?;
            let legal = game.legal_actions(current)?;
            if legal.is_empty() {
                return Err(GameError::InvalidConfiguration("no legal actions available").into());
            }
            let started = Instant::now();
            let action = bots[bot_index].select_action(&state, &legal);
            let elapsed = started.elapsed();
            let entry = stats.entry(labels[bot_index].clone()).or_default();
            entry.decisions += 1;
            entry.decision_ns += elapsed.as_nanos();
            game.apply_action(current, action)?;
            turns += 1;
        }

        match game.winner() {
            Some(winner) => {
                let bot_index = seats
                    .iter()
                    .position(|seat| *seat == winner)
                    .ok_or(GameError::InvalidPlayer(winner))?;
                let points = game.scores()[winner];
                let entry = stats.entry(labels[bot_index].clone()).or_default();
                entry.wins += 1;
                entry.points += i64::from(points);
                debug!(game = game_idx, winner, points, turns, "game finished");
            }
            None => {
                warn!(game = game_idx, turns, "game aborted at turn cap");
                aborted_games += 1;
            }
        }
    }

    let mut results: Vec<(&String, &LabelStats)> = stats.iter().collect();
    results.sort_by(|a, b| {
        win_rate(b.1)
            .partial_cmp(&win_rate(a.1))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    println!("Win rates (per-seat) with scoring:");
    for (label, entry) in &results {
        let avg_points = if entry.seats > 0 {
            entry.points as f64 / entry.seats as f64
        } else {
            0.0
        };
        println!(
            "  {label:<12}  {}/{}  ({:.2}%)   avg pts: {:>7.2}   total pts: {}",
            entry.wins,
            entry.seats,
            win_rate(entry) * 100.0,
            avg_points,
            entry.points
        );
    }
    if aborted_games > 0 {
        println!("\nNote: {aborted_games} game(s) hit the turn cap without a winner.");
    }

    println!("\nDecision time (per bot label):");
    for (label, entry) in &results {
        let total_ms = entry.decision_ns as f64 / 1.0e6;
        let avg_ms = if entry.decisions > 0 {
            total_ms / entry.decisions as f64
        } else {
            0.0
        };
        println!(
            "  {label:<12}  decisions: {:<7}  total: {total_ms:.3} ms  avg: {avg_ms:.4} ms",
            entry.decisions
        );
    }

    Ok(())
}

fn win_rate(entry: &LabelStats) -> f64 {
    if entry.seats > 0 {
        entry.wins as f64 / entry.seats as f64
    } else {
        0.0
    }
}

fn mix_seed(base: u64, a: u64, b: u64) -> u64 {
    let mut z =
        base ^ (a.wrapping_mul(0x9E37_79B97F4A7C15)) ^ (b.wrapping_mul(0xBF58_476D1CE4E5B9));
    z ^= z >> 12;
    z ^= z << 25;
    z ^= z >> 27;
    z
}
