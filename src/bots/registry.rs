use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::ai::AiMode;
use crate::bot::Bot;
use crate::bots::{AiBot, HumanBot, RandomBot};

/// Returns a normalized label for a bot spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a bot instance from a CLI-style spec.
/// Supported specs:
/// - human[:name]
/// - random[:seed]
/// - ai (follows the table's rules and difficulty)
/// - easy
/// - hard
/// - sevenzero
/// - team
pub fn create_bot_from_spec(
    spec: &str,
    index: usize,
    seed: u64,
) -> Result<Box<dyn Bot>, Box<dyn Error>> {
    let per_seat = seed ^ ((index as u64 + 1) * 0x9E37_79B9);
    let label = label_for_spec(spec);
    let bot: Box<dyn Bot> = match label.as_str() {
        "human" => {
            let name = spec
                .split_once(':')
                .map(|(_, name)| name.trim().to_string())
                .unwrap_or_else(|| format!("Human {index}"));
            Box::new(HumanBot::new(name))
        }
        "random" => {
            let custom_seed = spec
                .split_once(':')
                .and_then(|(_, value)| value.trim().parse::<u64>().ok())
                .unwrap_or(per_seat);
            Box::new(RandomBot::new(StdRng::seed_from_u64(custom_seed)))
        }
        "ai" => Box::new(AiBot::new(per_seat)),
        "easy" => Box::new(AiBot::with_mode(AiMode::Easy, per_seat)),
        "hard" => Box::new(AiBot::with_mode(AiMode::Hard, per_seat)),
        "sevenzero" => Box::new(AiBot::with_mode(AiMode::SevenZero, per_seat)),
        "team" => Box::new(AiBot::with_mode(AiMode::Team, per_seat)),
        _ => return Err(format!("unrecognized bot spec: {spec}").into()),
    };
    Ok(bot)
}
