use std::env;
use std::error::Error;
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use unobot::{
    Bot, Difficulty, Game, GameError, PlayerId, Rules, create_bot_from_spec, describe_action,
    render_state,
};

const DEFAULT_SEED: u64 = 0xDEC0_1DED_5EED_F00D;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut visualize = false;
    let mut verbose = false;
    let mut seed = DEFAULT_SEED;
    let mut max_turns: Option<usize> = None;
    let mut rules = Rules::default();
    let mut difficulty = Difficulty::Hard;
    let mut autopilot = false;
    let mut bot_specs: Vec<String> = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--visualize" => visualize = true,
            "--verbose" | "-v" => verbose = true,
            "--stack" => rules.stack_draw_two = true,
            "--seven-zero" => rules.seven_zero = true,
            "--forced-play" => rules.forced_play = true,
            "--team" => rules.team = true,
            "--easy" => difficulty = Difficulty::Easy,
            "--autopilot" => autopilot = true,
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--max-turns" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--max-turns requires a value".to_string())?;
                max_turns = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid max-turns value: {value}"))?,
                );
            }
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => bot_specs.push(other.to_string()),
        }
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if bot_specs.is_empty() {
        bot_specs = ["human", "ai", "ai", "ai"].map(String::from).to_vec();
    }
    if !(3..=4).contains(&bot_specs.len()) {
        return Err(format!("expected 3 or 4 seats, received {}", bot_specs.len()).into());
    }

    let seat_count = bot_specs.len();
    let mut game = Game::builder(seat_count)?
        .with_seed(seed)
        .with_rules(rules)
        .with_difficulty(difficulty)
        .with_autopilot(autopilot)
        .build()?;

    // Specs fill the seated seats in order; seat 2 is empty with three seats.
    let seats: Vec<PlayerId> = game.ring().seats().collect();
    let mut bots: Vec<Box<dyn Bot>> = Vec::with_capacity(seat_count);
    for (spec, seat) in bot_specs.iter().zip(&seats) {
        bots.push(create_bot_from_spec(spec, *seat, seed)?);
    }

    println!("Starting UNO simulation with {seat_count} seats.\n");
    info!(seed, ?rules, "simulation started");
    let mut turns = 0usize;
    loop {
        if game.is_finished() {
            break;
        }
        if let Some(limit) = max_turns {
            if turns >= limit {
                println!("Max turn limit {limit} reached. Stopping simulation.");
                break;
            }
        }
        let current = game.current_player();
        let state = game.state_view(current)?;
        let legal_actions = game.legal_actions(current)?;
        if legal_actions.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "no legal actions available for current seat",
            )
            .into());
        }
        if visualize {
            println!("{}", render_state(&state));
        }
        let bot_index = seats
            .iter()
            .position(|seat| *seat == current)
            .ok_or(GameError::InvalidPlayer(current))?;
        let action = bots[bot_index].select_action(&state, &legal_actions);
        if visualize {
            println!(
                "Seat {current}: {}\n",
                describe_action(&state, &action)
            );
        }
        game.apply_action(current, action)?;
        turns += 1;
    }

    if let Some(winner) = game.winner() {
        println!("Game finished after {turns} turns. Winner: Seat {winner}.");
        let scores = game.scores();
        for seat in &seats {
            println!("  Seat {seat}: {} points", scores[*seat]);
        }
    } else {
        println!("Simulation stopped before completion.");
    }

    Ok(())
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS] [BOT ...]");
    println!("  --visualize           Show the game state and chosen actions each turn");
    println!("  --verbose, -v         Log engine events (RUST_LOG overrides)");
    println!("  --seed <u64>          Seed for shuffling (default: {DEFAULT_SEED:#x})");
    println!("  --max-turns <usize>   Stop after the specified number of turns");
    println!("  --stack               Draw-two cards stack");
    println!("  --seven-zero          Sevens swap hands, zeros rotate all hands");
    println!("  --forced-play         A playable card drawn voluntarily must be played");
    println!("  --team                Seats 0/2 play against seats 1/3 (four seats only)");
    println!("  --easy                Easy difficulty for engine-driven decisions");
    println!("  --autopilot           Let the engine auto-play forced draws for seat 0");
    println!("  --help                Show this help message");
    println!("Bot entries (3 or 4 total, seat 0 first):");
    println!("  human[:name]          Interactive human-controlled seat");
    println!("  random[:seed]         Random bot with optional per-bot seed");
    println!("  ai                    Heuristic bot following the table rules");
    println!("  easy|hard|sevenzero|team  Heuristic bot with a fixed strategy");
    println!("If no bots are provided, defaults to one human and three ai bots.");
}
